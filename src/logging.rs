//! Feature-gated tracing macros used throughout the crate.
//!
//! With the `logging` feature the macros forward to `tracing`; without it
//! they expand to nothing, so arguments are never evaluated.
//!
//! ```rust,ignore
//! use crate::logging::{debug, trace};
//!
//! debug!(key = key, "storing list");
//! trace!(elements = count, "split encoded list");
//! ```

/// Emit one event at `$level`, e.g. `log_event!(debug, key = key, "...")`.
#[cfg(feature = "logging")]
macro_rules! log_event {
    ($level:ident, $($arg:tt)*) => { tracing::$level!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_event {
    ($level:ident, $($arg:tt)*) => {};
}

/// Per-element codec detail.
macro_rules! log_trace {
    ($($arg:tt)*) => { $crate::logging::log_event!(trace, $($arg)*) };
}

/// Individual store and get calls.
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::logging::log_event!(debug, $($arg)*) };
}

/// Opening backends, clearing namespaces.
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::logging::log_event!(info, $($arg)*) };
}

/// Failures about to be returned to the caller.
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::logging::log_event!(error, $($arg)*) };
}

pub(crate) use log_debug as debug;
pub(crate) use log_error as error;
pub(crate) use log_event;
pub(crate) use log_info as info;
pub(crate) use log_trace as trace;
