//! Blocking fixed-capacity byte ring buffer.
//!
//! This crate moves bytes between one producer thread and one consumer thread
//! through a circular buffer of fixed capacity:
//!
//! - [`RingBuffer`]: the shared buffer. Reads block while it is empty, writes
//!   block while it is full.
//! - [`pipe`]: splits a buffer into a [`PipeWriter`] and a [`PipeReader`], one
//!   per side, that close the buffer when dropped.
//!
//! # Example
//!
//! ```
//! use ringpipe_buffer::RingBuffer;
//!
//! let buf = RingBuffer::new(4);
//! buf.write(b"AB").unwrap();
//!
//! let mut one = [0u8; 1];
//! assert_eq!(buf.read(&mut one).unwrap(), 1);
//! assert_eq!(&one, b"A");
//!
//! // Exactly three bytes are free, so this does not block
//! buf.write(b"CDE").unwrap();
//! assert!(buf.is_full());
//! ```
//!
//! # Closing
//!
//! [`RingBuffer::close`] marks end-of-stream. Data already buffered is still
//! delivered; once it is drained `read()` returns `Ok(0)`. A writer blocked on
//! a full buffer is woken by close and returns what it managed to write
//! instead of waiting forever.
//!
//! # Standard I/O
//!
//! [`RingBuffer`], `&RingBuffer`, [`PipeReader`] and [`PipeWriter`] implement
//! [`std::io::Read`] and/or [`std::io::Write`], so the buffer can feed
//! `io::copy` directly.
//!
//! # Tracing
//!
//! With the `trace` feature every park, wake, chunk transfer and close emits a
//! `tracing` event at `TRACE` level under the `ringpipe_buffer` target.
//! Without it the hooks compile to nothing. Cheap counters are always kept and
//! reported by [`RingBuffer::dump`].

mod error;
mod io;
mod pipe;
mod ring_buffer;
mod trace;

pub use error::BufferError;
pub use pipe::{PipeReader, PipeWriter, pipe};
pub use ring_buffer::{Dump, RingBuffer};
