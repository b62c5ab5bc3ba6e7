//! `std::io` adapters.
//!
//! Lets a [`RingBuffer`] sit on either end of `io::copy`, `BufReader`,
//! `write_all` and friends. End-of-stream surfaces as `Ok(0)` from `read`, and
//! a write into a full closed buffer fails with `ErrorKind::BrokenPipe`.

use std::io;

use crate::RingBuffer;

impl io::Read for RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        RingBuffer::read(self, buf).map_err(io::Error::from)
    }
}

// Also implement for &RingBuffer so a shared handle can be read without cloning
impl io::Read for &RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        RingBuffer::read(*self, buf).map_err(io::Error::from)
    }
}

impl io::Write for RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RingBuffer::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RingBuffer::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
