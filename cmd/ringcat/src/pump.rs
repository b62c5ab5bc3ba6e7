//! Burst writer and drain thread wired through a ring buffer pipe.

use std::io::{self, Write};
use std::thread;

use anyhow::{Context, Result, anyhow};
use ringpipe_buffer::pipe;

use crate::config::PipeConfig;

/// Totals for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub bursts: u64,
    pub written: u64,
    pub drained: u64,
}

/// Writes bursts into a ring buffer while a second thread drains it to `sink`.
///
/// Returns once `cfg.count` bursts have been written and the drain thread has
/// copied everything out. With `count` unset this only returns on error.
pub fn run<W>(cfg: &PipeConfig, sink: W) -> Result<Summary>
where
    W: Write + Send,
{
    let (mut writer, mut reader) = pipe(cfg.capacity).context("failed to create ring buffer")?;
    let burst = cfg.burst_bytes();

    thread::scope(|s| -> Result<Summary> {
        let drain = thread::Builder::new()
            .name("ringcat-drain".into())
            .spawn_scoped(s, move || -> io::Result<u64> {
                let mut sink = sink;
                let n = io::copy(&mut reader, &mut sink)?;
                sink.flush()?;
                Ok(n)
            })
            .context("failed to spawn drain thread")?;

        let mut bursts = 0u64;
        let mut written = 0u64;
        while cfg.count.is_none_or(|count| bursts < count) {
            thread::sleep(cfg.delay());

            tracing::debug!(bytes = burst.len(), "writing burst");
            writer
                .write_all(&burst)
                .context("drain side closed the pipe")?;
            bursts += 1;
            written += burst.len() as u64;
            tracing::debug!(burst = bursts, total = written, "burst accepted");

            if cfg.dump {
                tracing::info!("{}", writer.dump());
            }

            thread::sleep(cfg.pause());
        }

        // Dropping the writer closes the pipe; the drain thread sees EOF.
        writer.close();

        let drained = drain
            .join()
            .map_err(|_| anyhow!("drain thread panicked"))?
            .context("failed to copy buffer to output")?;

        Ok(Summary {
            bursts,
            written,
            drained,
        })
    })
}
