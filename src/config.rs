//! Process configuration loaded from the environment
//!
//! Everything is read and validated once at startup so misconfiguration
//! stops the process before it binds a socket.

use std::env;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "microservices=debug,tower_http=debug";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{field} has an invalid value {value:?}")]
    Invalid { field: &'static str, value: String },
}

/// Runtime configuration
///
/// # Environment Variables
///
/// - `DATABASE_URL` - Path to the database file (required)
/// - `PORT` - Server port number (default: 3000)
/// - `HOST` - Bind address (default: 0.0.0.0)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = read("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match read("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                field: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let host = read("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        Ok(Self {
            database_url,
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
