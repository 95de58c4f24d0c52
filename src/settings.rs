//! Process configuration.
//!
//! Built-in defaults, overridden by `ORDERS_*` environment variables:
//!
//! ```text
//! ORDERS_SERVER_PORT=8080 ORDERS_REDIS_URL=redis://cache:6379 orders_api
//! ```

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "ORDERS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub redis_url: String,
    pub backend: BackendKind,
    /// Upper bound for a single backend command
    pub command_timeout_ms: u64,
    /// Grace period for in-flight requests on shutdown
    pub shutdown_timeout_secs: u64,
    /// Orders per listing page
    pub page_size: u64,
    pub startup_ping_attempts: u32,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server_port", 3000)?
            .set_default("redis_url", "redis://127.0.0.1:6379")?
            .set_default("backend", "redis")?
            .set_default("command_timeout_ms", 2000)?
            .set_default("shutdown_timeout_secs", 10)?
            .set_default("page_size", 50)?
            .set_default("startup_ping_attempts", 3)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Message("page_size must be positive".into()));
        }
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::Message("command_timeout_ms must be positive".into()));
        }
        if self.startup_ping_attempts == 0 {
            return Err(ConfigError::Message("startup_ping_attempts must be positive".into()));
        }
        Ok(())
    }
}
