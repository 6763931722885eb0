#![forbid(unsafe_code)]

//! Logging glue.
//!
//! With the `tracing` feature the engine emits `tracing` events under the
//! `scribble_core` target:
//!
//! | Level | Event |
//! |-------|-------|
//! | debug | scribble added / active / stopping / vanished |
//! | warn  | stop requested for unknown scribble |
//! | info  | scribble settings replaced |
//! | trace | per-frame summary, prune counts |
//!
//! Without the feature nothing is compiled in.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Filter used when `RUST_LOG` is unset.
#[cfg(feature = "tracing-json")]
pub const DEFAULT_FILTER: &str = "scribble_core=info";

/// Install a global JSON subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
}
