//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Installs `env_logger` with an `Info` default filter. `RUST_LOG` still takes
/// precedence, so `RUST_LOG=tri_engine=trace` shows per-frame GL calls.
/// Calling this more than once keeps the first logger.
pub fn init() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
