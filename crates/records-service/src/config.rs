//! Records service configuration.

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default bind address of the student service.
pub const DEFAULT_STUDENT_BIND_ADDRESS: &str = "0.0.0.0:8001";

/// Default bind address of the course service.
pub const DEFAULT_COURSE_BIND_ADDRESS: &str = "0.0.0.0:8002";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDRESS '{0}': expected host:port")]
    InvalidBindAddress(String),
}

/// Records service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server bind address.
    pub bind_address: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BIND_ADDRESS` is malformed.
    pub fn from_env(default_bind_address: &str) -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_vars(&vars, default_bind_address)
    }

    /// Load configuration from a map of variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BIND_ADDRESS` is malformed.
    pub fn from_vars(
        vars: &HashMap<String, String>,
        default_bind_address: &str,
    ) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| default_bind_address.to_string());

        if bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidBindAddress(bind_address));
        }

        Ok(Self { bind_address })
    }
}
