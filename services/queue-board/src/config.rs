//! Configuration for the queue board.

use crate::backend::keys::DEFAULT_PREFIX;
use crate::backend::ClientKind;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

/// Service configuration.
#[derive(Debug, Deserialize)]
pub struct BoardConfig {
    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,
    /// HTTP listener configuration.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Queues shown on the dashboard, in display order.
    #[serde(default)]
    pub queues: Vec<QueueConfig>,
}

/// Redis configuration.
#[derive(Debug, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// One queue to display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueConfig {
    /// Queue name, unique per deployment.
    pub name: String,
    /// Client generation that writes the queue.
    #[serde(default)]
    pub client: ClientKind,
    /// Redis key prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl BoardConfig {
    /// Load configuration from files and environment.
    ///
    /// # Errors
    ///
    /// Returns error if configuration cannot be loaded or parsed.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("config/default.toml"))
                .merge(Toml::file("config/local.toml"))
                .merge(Env::prefixed("QUEUE_BOARD_").split("__")),
        )
    }

    /// Extract configuration from an already assembled figment.
    ///
    /// # Errors
    ///
    /// Returns error if the figment cannot be deserialized.
    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config: Self = figment.extract()?;
        Ok(config)
    }
}
