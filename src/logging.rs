//! Crate-internal logging macros.
//!
//! With the `logging` feature these forward to `tracing`; without it they
//! expand to nothing, so adapters can log on hot paths at no cost. The
//! library never installs a subscriber; that is left to the application
//! (the `unikv` CLI installs one).
//!
//! ```rust,ignore
//! use crate::logging::{debug, trace};
//!
//! debug!(path = %path.display(), "opening LMDB environment");
//! trace!(key = key, len = bytes.len(), "put");
//! ```

/// Per-operation detail: individual puts, gets and removes.
#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { ::tracing::trace!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

/// Opening, closing and clearing a database.
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Destructive lifecycle events such as wiping.
#[cfg(feature = "logging")]
#[allow(unused_macros)]
macro_rules! log_info {
    ($($arg:tt)*) => { ::tracing::info!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
#[allow(unused_macros)]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

/// Requests an engine refuses before touching storage.
#[cfg(feature = "logging")]
#[allow(unused_macros)]
macro_rules! log_warn {
    ($($arg:tt)*) => { ::tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
#[allow(unused_macros)]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// Engine failures that leave a store in a degraded state.
#[cfg(feature = "logging")]
#[allow(unused_macros)]
macro_rules! log_error {
    ($($arg:tt)*) => { ::tracing::error!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
#[allow(unused_macros)]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

pub(crate) use log_debug as debug;
#[allow(unused_imports)]
pub(crate) use log_error as error;
#[allow(unused_imports)]
pub(crate) use log_info as info;
pub(crate) use log_trace as trace;
#[allow(unused_imports)]
pub(crate) use log_warn as warn;
