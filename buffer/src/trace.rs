//! Observability hook for buffer state transitions.
//!
//! With the `trace` feature enabled, `trace_event!` forwards to
//! `tracing::trace!` under the `ringpipe_buffer` target. Without it the macro
//! expands to nothing and its arguments are never evaluated.

#[cfg(feature = "trace")]
macro_rules! trace_event {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "ringpipe_buffer", $($arg)*)
    };
}

#[cfg(not(feature = "trace"))]
macro_rules! trace_event {
    ($($arg:tt)*) => {};
}

pub(crate) use trace_event;
