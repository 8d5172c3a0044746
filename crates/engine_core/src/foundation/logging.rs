//! Logging bootstrap
//!
//! The engine logs through the `log` facade; `env_logger` is installed as the
//! backend. `RUST_LOG` always wins over the configured default level.

pub use log::{debug, error, info, trace, warn};

use crate::core::config::EngineSettings;

/// Initialize the logging system with the `info` level as default
pub fn init() {
    init_with_level("info");
}

/// Initialize the logging system with the given default level
///
/// Safe to call more than once; only the first call installs a logger.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already installed, keeping existing configuration");
    }
}

/// Initialize the logging system with the level from the engine settings
pub fn init_from_settings(settings: &EngineSettings) {
    init_with_level(&settings.log_level);
}
