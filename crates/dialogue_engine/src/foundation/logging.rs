//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Default filter applied when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info";

/// Initialize the logging system
///
/// Honours `RUST_LOG`; falls back to `info` level otherwise.
///
/// # Panics
///
/// Panics if a global logger has already been installed. Use [`try_init`]
/// when embedding in a host that may own the logger.
pub fn init() {
    builder().init();
}

/// Initialize the logging system, ignoring an already-installed logger
///
/// Returns `false` when another logger was installed first.
pub fn try_init() -> bool {
    builder().try_init().is_ok()
}

fn builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
}
