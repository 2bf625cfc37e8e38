//! Logging utilities
//!
//! Provides logging setup and configuration.

use crate::config::ClientConfig;

/// Setup logging for the client. `RUST_LOG` takes precedence over the
/// configured level. Logs go to stderr so they do not mix with shell output.
pub fn setup_logging(config: &ClientConfig) {
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());

    if let Err(e) = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
    {
        eprintln!("Logger already initialised: {}", e);
    }
}
