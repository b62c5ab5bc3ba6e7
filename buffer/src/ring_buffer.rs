//! Fixed-capacity blocking byte ring buffer.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::BufferError;
use crate::trace::trace_event;

/// A thread-safe fixed-capacity blocking byte buffer.
///
/// `RingBuffer` moves bytes from one producer thread to one consumer thread
/// through a circular storage area of fixed capacity. Reads block while the
/// buffer is empty, writes block while it is full.
///
/// # Semantics
///
/// - **Read**: Blocks when empty, returns up to `dst.len()` bytes when
///   available, returns `Ok(0)` once the buffer is closed and drained
/// - **Write**: Blocks when full, returns once every byte has been accepted
/// - **Close**: Wakes every blocked caller. Readers drain what is left, then
///   see end-of-stream. A writer that still needs space returns early.
///
/// Writes after close are accepted while space is available and are still
/// delivered to readers.
///
/// # Example
///
/// ```
/// use ringpipe_buffer::RingBuffer;
/// use std::thread;
///
/// let buf = RingBuffer::new(4);
/// let producer_buf = buf.clone();
///
/// // Producer thread (blocks whenever the 4 byte buffer is full)
/// let producer = thread::spawn(move || {
///     producer_buf.write(b"hello, ring").unwrap();
///     producer_buf.close();
/// });
///
/// let mut out = Vec::new();
/// let mut chunk = [0u8; 3];
/// loop {
///     match buf.read(&mut chunk).unwrap() {
///         0 => break,
///         n => out.extend_from_slice(&chunk[..n]),
///     }
/// }
///
/// producer.join().unwrap();
/// assert_eq!(out, b"hello, ring");
/// ```
pub struct RingBuffer {
    inner: Arc<RingBufferInner>,
}

struct RingBufferInner {
    state: Mutex<RingBufferState>,
    readable: Condvar,
    writable: Condvar,
}

struct RingBufferState {
    // One slot more than the capacity. The spare slot is never filled, so
    // `rpos == wpos` always means empty.
    buf: Box<[u8]>,
    rpos: usize,
    wpos: usize,
    closed: bool,
    counters: Counters,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    bytes_read: u64,
    bytes_written: u64,
    read_waits: u64,
    write_waits: u64,
}

impl RingBufferState {
    fn slots(&self) -> usize {
        self.buf.len()
    }

    fn capacity(&self) -> usize {
        self.buf.len() - 1
    }

    fn len(&self) -> usize {
        (self.slots() + self.wpos - self.rpos) % self.slots()
    }

    fn free(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Copies `dst.len()` bytes out of the ring. Caller guarantees
    /// `dst.len() <= self.len()`.
    fn read_chunk(&mut self, dst: &mut [u8]) {
        let n = dst.len();
        let first = n.min(self.slots() - self.rpos);
        dst[..first].copy_from_slice(&self.buf[self.rpos..self.rpos + first]);
        dst[first..].copy_from_slice(&self.buf[..n - first]);
        self.rpos = (self.rpos + n) % self.slots();
        self.counters.bytes_read += n as u64;
    }

    /// Copies all of `src` into the ring. Caller guarantees
    /// `src.len() <= self.free()`.
    fn write_chunk(&mut self, src: &[u8]) {
        let n = src.len();
        let first = n.min(self.slots() - self.wpos);
        self.buf[self.wpos..self.wpos + first].copy_from_slice(&src[..first]);
        self.buf[..n - first].copy_from_slice(&src[first..]);
        self.wpos = (self.wpos + n) % self.slots();
        self.counters.bytes_written += n as u64;
    }
}

impl Clone for RingBuffer {
    fn clone(&self) -> Self {
        RingBuffer {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl RingBuffer {
    /// Creates a new RingBuffer that holds up to `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. Use [`RingBuffer::try_new`] to handle that
    /// case without panicking.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(buf) => buf,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a new RingBuffer, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity(capacity));
        }
        let slots = capacity
            .checked_add(1)
            .ok_or(BufferError::InvalidCapacity(capacity))?;

        Ok(RingBuffer {
            inner: Arc::new(RingBufferInner {
                state: Mutex::new(RingBufferState {
                    buf: vec![0u8; slots].into_boxed_slice(),
                    rpos: 0,
                    wpos: 0,
                    closed: false,
                    counters: Counters::default(),
                }),
                readable: Condvar::new(),
                writable: Condvar::new(),
            }),
        })
    }

    /// Returns the number of bytes the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.inner.state.lock().capacity()
    }

    /// Returns the number of unread bytes currently buffered.
    pub fn len(&self) -> usize {
        self.inner.state.lock().len()
    }

    /// Returns the number of bytes that can be written without blocking.
    pub fn free(&self) -> usize {
        self.inner.state.lock().free()
    }

    /// Returns true if there is no unread data.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a write would block.
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// Closes the buffer.
    ///
    /// Buffered data stays readable. Blocked readers wake, drain what is left
    /// and then read `Ok(0)`. Blocked writers wake and return whatever they
    /// managed to write. Closing twice is a no-op.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        if !state.closed {
            state.closed = true;
            trace_event!(rpos = state.rpos, wpos = state.wpos, len = state.len(), "closed");
        }
        drop(state);
        self.inner.readable.notify_all();
        self.inner.writable.notify_all();
    }

    /// Reads buffered bytes into `dst`.
    ///
    /// Blocks while the buffer is empty and open. Returns the number of bytes
    /// copied, which is at most `dst.len()`. `Ok(0)` means end-of-stream: the
    /// buffer is closed and drained. An empty `dst` returns `Ok(0)` at once.
    pub fn read(&self, dst: &mut [u8]) -> Result<usize, BufferError> {
        self.read_until(dst, None)
    }

    /// Like [`read`](Self::read), but waits at most `timeout` for data.
    ///
    /// Returns [`BufferError::Timeout`] if the buffer stayed empty and open
    /// for the whole duration.
    pub fn read_timeout(&self, dst: &mut [u8], timeout: Duration) -> Result<usize, BufferError> {
        self.read_until(dst, Some(Instant::now() + timeout))
    }

    /// Writes all of `src` into the buffer.
    ///
    /// Blocks while the buffer is full, copying whatever fits each time the
    /// reader frees space. Returns `src.len()` once everything is accepted.
    ///
    /// If the buffer is closed while this call still needs space, it returns
    /// the number of bytes already accepted, or [`BufferError::Closed`] if
    /// none were.
    pub fn write(&self, src: &[u8]) -> Result<usize, BufferError> {
        self.write_until(src, None)
    }

    /// Like [`write`](Self::write), but waits at most `timeout` in total for
    /// space.
    ///
    /// On timeout returns the number of bytes already accepted, or
    /// [`BufferError::Timeout`] if none were.
    pub fn write_timeout(&self, src: &[u8], timeout: Duration) -> Result<usize, BufferError> {
        self.write_until(src, Some(Instant::now() + timeout))
    }

    /// Returns a snapshot of the buffer's cursors and counters.
    pub fn dump(&self) -> Dump {
        let state = self.inner.state.lock();
        Dump {
            capacity: state.capacity(),
            allocated: state.slots(),
            read_pos: state.rpos,
            write_pos: state.wpos,
            len: state.len(),
            closed: state.closed,
            bytes_read: state.counters.bytes_read,
            bytes_written: state.counters.bytes_written,
            read_waits: state.counters.read_waits,
            write_waits: state.counters.write_waits,
        }
    }

    fn read_until(&self, dst: &mut [u8], deadline: Option<Instant>) -> Result<usize, BufferError> {
        if dst.is_empty() {
            return Ok(0);
        }

        let mut state = self.inner.state.lock();

        // Wait for data
        while state.len() == 0 && !state.closed {
            state.counters.read_waits += 1;
            trace_event!(rpos = state.rpos, wpos = state.wpos, "reader parked on empty buffer");
            match deadline {
                Some(deadline) => {
                    let timed_out = self.inner.readable.wait_until(&mut state, deadline).timed_out();
                    if timed_out && state.len() == 0 && !state.closed {
                        return Err(BufferError::Timeout);
                    }
                }
                None => self.inner.readable.wait(&mut state),
            }
        }

        let n = dst.len().min(state.len());
        if n == 0 {
            trace_event!(rpos = state.rpos, "end of stream");
            return Ok(0);
        }

        state.read_chunk(&mut dst[..n]);
        trace_event!(n, rpos = state.rpos, len = state.len(), "read chunk");
        drop(state);

        self.inner.writable.notify_one();
        Ok(n)
    }

    fn write_until(&self, src: &[u8], deadline: Option<Instant>) -> Result<usize, BufferError> {
        if src.is_empty() {
            return Ok(0);
        }

        let mut state = self.inner.state.lock();
        let mut written = 0;

        while written < src.len() {
            let free = state.free();
            if free == 0 {
                if state.closed {
                    trace_event!(written, left = src.len() - written, "write stopped, buffer closed");
                    return if written > 0 {
                        Ok(written)
                    } else {
                        Err(BufferError::Closed)
                    };
                }

                state.counters.write_waits += 1;
                trace_event!(
                    rpos = state.rpos,
                    wpos = state.wpos,
                    left = src.len() - written,
                    "writer parked on full buffer"
                );
                match deadline {
                    Some(deadline) => {
                        let timed_out =
                            self.inner.writable.wait_until(&mut state, deadline).timed_out();
                        if timed_out && state.free() == 0 && !state.closed {
                            return if written > 0 {
                                Ok(written)
                            } else {
                                Err(BufferError::Timeout)
                            };
                        }
                    }
                    None => self.inner.writable.wait(&mut state),
                }
                // rpos moved, re-measure free space
                continue;
            }

            let n = free.min(src.len() - written);
            state.write_chunk(&src[written..written + n]);
            written += n;
            trace_event!(n, wpos = state.wpos, len = state.len(), "wrote chunk");

            self.inner.readable.notify_one();
        }

        Ok(written)
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RingBuffer").field(&self.dump()).finish()
    }
}

/// Point-in-time view of a [`RingBuffer`], returned by [`RingBuffer::dump`].
///
/// The `Display` form is a single `key=value` line suitable for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dump {
    /// Usable capacity in bytes.
    pub capacity: usize,
    /// Allocated storage, one byte more than `capacity`.
    pub allocated: usize,
    pub read_pos: usize,
    pub write_pos: usize,
    /// Unread bytes.
    pub len: usize,
    pub closed: bool,
    pub bytes_read: u64,
    pub bytes_written: u64,
    /// Number of times a reader parked on an empty buffer.
    pub read_waits: u64,
    /// Number of times a writer parked on a full buffer.
    pub write_waits: u64,
}

impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity={} allocated={} rpos={} wpos={} len={} closed={} read={} written={} read_waits={} write_waits={}",
            self.capacity,
            self.allocated,
            self.read_pos,
            self.write_pos,
            self.len,
            self.closed,
            self.bytes_read,
            self.bytes_written,
            self.read_waits,
            self.write_waits,
        )
    }
}
