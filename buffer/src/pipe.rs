//! Single-producer single-consumer endpoints over a [`RingBuffer`].
//!
//! [`pipe`] hands out one [`PipeWriter`] and one [`PipeReader`]. Neither is
//! `Clone`, so at most one thread writes and one thread reads. Dropping either
//! end closes the buffer: the reader drains what is left and then sees
//! end-of-stream, a writer blocked on a full buffer is released.

use std::io;
use std::time::Duration;

use crate::error::BufferError;
use crate::ring_buffer::{Dump, RingBuffer};

/// Creates a pipe backed by a ring buffer of `capacity` bytes.
///
/// # Example
///
/// ```
/// use ringpipe_buffer::pipe;
/// use std::io::{Read, Write};
/// use std::thread;
///
/// let (mut writer, mut reader) = pipe(8).unwrap();
///
/// let producer = thread::spawn(move || {
///     writer.write_all(b"through the pipe").unwrap();
///     // writer dropped here, closing the pipe
/// });
///
/// let mut out = String::new();
/// reader.read_to_string(&mut out).unwrap();
/// producer.join().unwrap();
/// assert_eq!(out, "through the pipe");
/// ```
pub fn pipe(capacity: usize) -> Result<(PipeWriter, PipeReader), BufferError> {
    let buf = RingBuffer::try_new(capacity)?;
    Ok((PipeWriter { buf: buf.clone() }, PipeReader { buf }))
}

/// The producing end of a [`pipe`].
#[derive(Debug)]
pub struct PipeWriter {
    buf: RingBuffer,
}

impl PipeWriter {
    /// See [`RingBuffer::write`].
    pub fn write(&self, src: &[u8]) -> Result<usize, BufferError> {
        self.buf.write(src)
    }

    /// See [`RingBuffer::write_timeout`].
    pub fn write_timeout(&self, src: &[u8], timeout: Duration) -> Result<usize, BufferError> {
        self.buf.write_timeout(src, timeout)
    }

    /// Closes the pipe. Same as dropping the writer.
    pub fn close(self) {
        drop(self);
    }

    /// Returns true if the reading end has gone away or the pipe was closed.
    pub fn is_closed(&self) -> bool {
        self.buf.is_closed()
    }

    pub fn dump(&self) -> Dump {
        self.buf.dump()
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        self.buf.close();
    }
}

impl io::Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RingBuffer::write(&self.buf, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The consuming end of a [`pipe`].
#[derive(Debug)]
pub struct PipeReader {
    buf: RingBuffer,
}

impl PipeReader {
    /// See [`RingBuffer::read`].
    pub fn read(&self, dst: &mut [u8]) -> Result<usize, BufferError> {
        self.buf.read(dst)
    }

    /// See [`RingBuffer::read_timeout`].
    pub fn read_timeout(&self, dst: &mut [u8], timeout: Duration) -> Result<usize, BufferError> {
        self.buf.read_timeout(dst, timeout)
    }

    pub fn dump(&self) -> Dump {
        self.buf.dump()
    }
}

impl Drop for PipeReader {
    fn drop(&mut self) {
        self.buf.close();
    }
}

impl io::Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        RingBuffer::read(&self.buf, buf).map_err(io::Error::from)
    }
}
