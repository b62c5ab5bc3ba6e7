//! Error types for buffer operations.

use std::io;

/// Buffer operation error.
///
/// End-of-stream is not an error: [`RingBuffer::read`](crate::RingBuffer::read)
/// reports it as `Ok(0)` once the buffer is closed and drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// The requested capacity cannot hold any data.
    #[error("buffer: invalid capacity {0}, must be greater than 0")]
    InvalidCapacity(usize),
    /// The buffer is closed and full, so a write can make no progress.
    #[error("buffer: closed")]
    Closed,
    /// A timed read or write gave up before any progress was made.
    #[error("buffer: operation timed out")]
    Timeout,
}

impl From<BufferError> for io::Error {
    fn from(err: BufferError) -> Self {
        let kind = match err {
            BufferError::InvalidCapacity(_) => io::ErrorKind::InvalidInput,
            BufferError::Closed => io::ErrorKind::BrokenPipe,
            BufferError::Timeout => io::ErrorKind::TimedOut,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_error_display() {
        assert_eq!(format!("{}", BufferError::Closed), "buffer: closed");
        assert_eq!(
            format!("{}", BufferError::Timeout),
            "buffer: operation timed out"
        );
        assert!(format!("{}", BufferError::InvalidCapacity(0)).contains("invalid capacity 0"));
    }

    #[test]
    fn test_into_io_error_kind() {
        let err: io::Error = BufferError::Closed.into();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        let err: io::Error = BufferError::Timeout.into();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);

        let err: io::Error = BufferError::InvalidCapacity(0).into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err: io::Error = BufferError::Closed.into();
        let inner = err
            .get_ref()
            .and_then(|e| e.downcast_ref::<BufferError>())
            .copied();
        assert_eq!(inner, Some(BufferError::Closed));
    }
}
