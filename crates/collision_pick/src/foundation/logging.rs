//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn, LevelFilter};

/// Initialize the logging system
///
/// `RUST_LOG` overrides `default_level`. Safe to call more than once; only
/// the first call installs the logger.
pub fn init(default_level: LevelFilter) {
    let installed = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
    if installed.is_err() {
        trace!("Logger already initialized");
    }
}
