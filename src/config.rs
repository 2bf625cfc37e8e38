//! Configuration management for the session client
//!
//! Values come from built-in defaults, then an optional `session-client.toml`
//! in the working directory, then `SESSION_CLIENT_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::service::Uncertainty;

/// Config file looked up in the working directory (extension optional).
pub const CONFIG_FILE: &str = "session-client";

/// Environment variable prefix, e.g. `SESSION_CLIENT_TIMEOUT_SECS`.
pub const ENV_PREFIX: &str = "SESSION_CLIENT";

/// Which identity service implementation to talk to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process emulation, see [`crate::service::MemoryIdentityService`]
    Memory,
    /// Remote service over HTTP
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    // ═══ COLLABORATORS ═══
    pub backend: Backend,

    /// Base URL of the remote identity service (http backend)
    pub service_url: String,

    /// File the access token is persisted into
    pub token_file: String,

    // ═══ BEHAVIOR ═══
    /// Overall timeout of each login, sign-up or resume operation
    pub timeout_secs: u64,

    /// Default log filter, overridden by RUST_LOG
    pub log_level: String,

    // ═══ MEMORY BACKEND SIMULATION ═══
    pub simulated_delay_ms: u64,
    pub simulated_delay_deviation_ms: u64,
    pub no_connection_chance: f64,
    pub unknown_error_chance: f64,
}

impl ClientConfig {
    /// Load configuration from defaults, config file and environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Same as [`ClientConfig::load`] with an explicit config file path.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        Config::builder()
            .set_default("backend", "memory")?
            .set_default("service_url", "http://127.0.0.1:8080")?
            .set_default("token_file", ".session_token")?
            .set_default("timeout_secs", 10_i64)?
            .set_default("log_level", "info")?
            .set_default("simulated_delay_ms", 1500_i64)?
            .set_default("simulated_delay_deviation_ms", 500_i64)?
            .set_default("no_connection_chance", 0.0_f64)?
            .set_default("unknown_error_chance", 0.0_f64)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        for (name, chance) in [
            ("no_connection_chance", self.no_connection_chance),
            ("unknown_error_chance", self.unknown_error_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(config::ConfigError::Message(format!(
                    "{} must be between 0.0 and 1.0",
                    name
                )));
            }
        }

        if self.backend == Backend::Http && self.service_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "service_url cannot be empty with the http backend".into(),
            ));
        }

        if self.token_file.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "token_file cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Get operation timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Simulation parameters for the memory backend
    pub fn uncertainty(&self) -> Uncertainty {
        Uncertainty {
            no_connection_chance: self.no_connection_chance,
            unknown_error_chance: self.unknown_error_chance,
            average_delay: Duration::from_millis(self.simulated_delay_ms),
            delay_deviation: Duration::from_millis(self.simulated_delay_deviation_ms),
        }
    }
}
