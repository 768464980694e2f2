//! Process configuration, read from the environment.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigError;

/// Default port for the webhook + channel server.
pub const DEFAULT_PORT: u16 = 4246;

/// Default publish interval in milliseconds.
pub const DEFAULT_PUBLISH_INTERVAL_MS: u64 = 1000;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the webhook and channel server listens on.
    pub port: u16,
    /// Destination number → tenant account. Immutable after load; defines
    /// which tenants exist.
    pub routing: HashMap<String, String>,
    /// How often the periodic publisher pushes vote banks.
    pub publish_interval: Duration,
    /// Synthetic traffic injector, enabled for load testing only.
    pub synthetic: Option<SyntheticConfig>,
}

/// Synthetic traffic settings.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Delay between injected fake votes.
    pub rate: Duration,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// `NUMBER_MAP` is a JSON object of destination number → account, e.g.
    /// `{"+15551234567": "alice@example.com"}`. `TEST_MODE` (any value)
    /// enables the synthetic injector at `TEST_MODE_RATE_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".into(),
                message: format!("not a valid port: {raw}"),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let raw_map = std::env::var("NUMBER_MAP").unwrap_or_else(|_| "{}".to_string());
        let routing = parse_routing(&raw_map)?;

        let publish_interval = Duration::from_millis(env_millis(
            "PUBLISH_INTERVAL_MS",
            DEFAULT_PUBLISH_INTERVAL_MS,
        )?);

        let synthetic = if std::env::var("TEST_MODE").is_ok() {
            Some(SyntheticConfig {
                rate: Duration::from_millis(env_millis("TEST_MODE_RATE_MS", 1000)?),
            })
        } else {
            None
        };

        Ok(Self {
            port,
            routing,
            publish_interval,
            synthetic,
        })
    }
}

/// Parse the routing map from its serialized form.
fn parse_routing(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    serde_json::from_str(raw).map_err(|e| ConfigError::InvalidValue {
        key: "NUMBER_MAP".into(),
        message: e.to_string(),
    })
}

fn env_millis(key: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.into(),
            message: format!("not a millisecond count: {raw}"),
        }),
        Err(_) => Ok(default),
    }
}
