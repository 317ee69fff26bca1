//! Process configuration, read from flags with environment fallbacks.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Errors raised while validating a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address {addr:?}: {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("snapshot file {0} does not exist")]
    MissingSnapshot(PathBuf),

    #[error("redis url must not be empty unless --memory-store is set")]
    EmptyRedisUrl,
}

/// Startup settings for the facade.
#[derive(Parser, Debug, Clone)]
#[command(name = "courtside")]
#[command(about = "Memoizing HTTP facade over a basketball statistics provider")]
#[command(version)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "COURTSIDE_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: String,

    /// Redis connection URL for the response cache
    #[arg(long, env = "REDIS_URL", default_value = "redis://localhost:6379/0")]
    pub redis_url: String,

    /// Keep cached responses in process memory instead of Redis
    #[arg(long, env = "COURTSIDE_MEMORY_STORE")]
    pub memory_store: bool,

    /// JSON snapshot answering provider queries
    #[arg(long, env = "COURTSIDE_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Prefix prepended to every cache key
    #[arg(long, env = "COURTSIDE_CACHE_NAMESPACE", default_value = "")]
    pub cache_namespace: String,
}

impl Config {
    /// Checks the settings that clap cannot check on its own.
    pub fn validate(&self) -> Result<SocketAddr, ConfigError> {
        let addr = self
            .addr
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidAddr {
                addr: self.addr.clone(),
                source,
            })?;

        if !self.memory_store && self.redis_url.trim().is_empty() {
            return Err(ConfigError::EmptyRedisUrl);
        }

        if let Some(path) = &self.snapshot {
            if !path.is_file() {
                return Err(ConfigError::MissingSnapshot(path.clone()));
            }
        }

        Ok(addr)
    }
}
