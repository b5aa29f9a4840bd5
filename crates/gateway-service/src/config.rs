//! Gateway configuration.
//!
//! Configuration is loaded from environment variables. Sensitive fields
//! (signing secret, admin password, database URL) are redacted in Debug
//! output.

use common::secret::SecretString;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Default access token lifetime issued by the login flow, in minutes.
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

/// Maximum access token lifetime, in minutes (one day).
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 1440;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Minimum accepted bcrypt cost factor.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Maximum accepted bcrypt cost factor.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Default per-call upstream timeout, in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 10;

/// Default connection drain period on shutdown, in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 0;

/// Maximum connection drain period on shutdown, in seconds.
pub const MAX_DRAIN_SECONDS: u64 = 300;

/// Minimum length of the token signing secret, in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Logical name of the student service.
pub const STUDENT_SERVICE: &str = "student";

/// Logical name of the course service.
pub const COURSE_SERVICE: &str = "course";

/// Default student service base URL.
pub const DEFAULT_STUDENT_SERVICE_URL: &str = "http://localhost:8001";

/// Default course service base URL.
pub const DEFAULT_COURSE_SERVICE_URL: &str = "http://localhost:8002";

/// Default seeded administrator username.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Default seeded administrator password.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Gateway configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8000").
    pub bind_address: String,

    /// HMAC secret used to sign and verify access tokens.
    pub jwt_secret: SecretString,

    /// Lifetime of tokens issued by `POST /auth/login`.
    pub access_token_ttl: Duration,

    /// bcrypt cost factor for password hashing.
    pub bcrypt_cost: u32,

    /// Per-call timeout for forwarded requests.
    pub upstream_timeout: Duration,

    /// Logical service name to base URL.
    pub services: BTreeMap<String, String>,

    /// Username of the administrator seeded at startup.
    pub admin_username: String,

    /// Password of the administrator seeded at startup.
    pub admin_password: SecretString,

    /// PostgreSQL URL for the user store. In-memory store when absent.
    pub database_url: Option<String>,

    /// Time to keep serving in-flight requests after a shutdown signal.
    pub drain_period: Duration,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("services", &self.services)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("drain_period", &self.drain_period)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),

    #[error("Invalid access token TTL configuration: {0}")]
    InvalidTokenTtl(String),

    #[error("Invalid bcrypt cost configuration: {0}")]
    InvalidBcryptCost(String),

    #[error("Invalid upstream timeout configuration: {0}")]
    InvalidUpstreamTimeout(String),

    #[error("Invalid service URL: {0}")]
    InvalidServiceUrl(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainPeriod(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::InvalidJwtSecret(format!(
                "Expected at least {} bytes, got {}",
                MIN_JWT_SECRET_BYTES,
                jwt_secret.len()
            )));
        }
        let jwt_secret = SecretString::from(jwt_secret.clone());

        let ttl_minutes = if let Some(value_str) = vars.get("ACCESS_TOKEN_TTL_MINUTES") {
            let value: i64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidTokenTtl(format!(
                    "ACCESS_TOKEN_TTL_MINUTES must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if !(1..=MAX_ACCESS_TOKEN_TTL_MINUTES).contains(&value) {
                return Err(ConfigError::InvalidTokenTtl(format!(
                    "ACCESS_TOKEN_TTL_MINUTES must be between 1 and {}, got {}",
                    MAX_ACCESS_TOKEN_TTL_MINUTES, value
                )));
            }

            value
        } else {
            DEFAULT_ACCESS_TOKEN_TTL_MINUTES
        };
        let access_token_ttl = Duration::from_secs(ttl_minutes.unsigned_abs() * 60);

        let bcrypt_cost = if let Some(value_str) = vars.get("BCRYPT_COST") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidBcryptCost(format!(
                    "BCRYPT_COST must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&value) {
                return Err(ConfigError::InvalidBcryptCost(format!(
                    "BCRYPT_COST must be between {} and {}, got {}",
                    MIN_BCRYPT_COST, MAX_BCRYPT_COST, value
                )));
            }

            value
        } else {
            DEFAULT_BCRYPT_COST
        };

        let upstream_timeout_secs = if let Some(value_str) = vars.get("UPSTREAM_TIMEOUT_SECONDS")
        {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidUpstreamTimeout(format!(
                    "UPSTREAM_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidUpstreamTimeout(
                    "UPSTREAM_TIMEOUT_SECONDS must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_UPSTREAM_TIMEOUT_SECONDS
        };

        let mut services = BTreeMap::new();
        for (name, var, default) in [
            (STUDENT_SERVICE, "STUDENT_SERVICE_URL", DEFAULT_STUDENT_SERVICE_URL),
            (COURSE_SERVICE, "COURSE_SERVICE_URL", DEFAULT_COURSE_SERVICE_URL),
        ] {
            let url = vars.get(var).cloned().unwrap_or_else(|| default.to_string());
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidServiceUrl(format!(
                    "{} must start with http:// or https://, got '{}'",
                    var, url
                )));
            }
            services.insert(name.to_string(), url);
        }

        let admin_username = vars
            .get("ADMIN_USERNAME")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());

        let admin_password = SecretString::from(
            vars.get("ADMIN_PASSWORD")
                .cloned()
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
        );

        let database_url = vars.get("DATABASE_URL").filter(|v| !v.is_empty()).cloned();

        let drain_secs = if let Some(value_str) = vars.get("GW_DRAIN_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidDrainPeriod(format!(
                    "GW_DRAIN_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value > MAX_DRAIN_SECONDS {
                return Err(ConfigError::InvalidDrainPeriod(format!(
                    "GW_DRAIN_SECONDS must be at most {}, got {}",
                    MAX_DRAIN_SECONDS, value
                )));
            }

            value
        } else {
            DEFAULT_DRAIN_SECONDS
        };

        Ok(Config {
            bind_address,
            jwt_secret,
            access_token_ttl,
            bcrypt_cost,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            services,
            admin_username,
            admin_password,
            database_url,
            drain_period: Duration::from_secs(drain_secs),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::ExposeSecret;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([("JWT_SECRET".to_string(), TEST_SECRET.to_string())])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.access_token_ttl, Duration::from_secs(30 * 60));
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(
            config.services.get("student").map(String::as_str),
            Some("http://localhost:8001")
        );
        assert_eq!(
            config.services.get("course").map(String::as_str),
            Some("http://localhost:8002")
        );
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.admin_password.expose_secret(), "admin123");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_from_vars_custom_values() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("ACCESS_TOKEN_TTL_MINUTES".to_string(), "5".to_string());
        vars.insert("BCRYPT_COST".to_string(), "10".to_string());
        vars.insert("UPSTREAM_TIMEOUT_SECONDS".to_string(), "3".to_string());
        vars.insert(
            "COURSE_SERVICE_URL".to_string(),
            "http://courses.internal:9002".to_string(),
        );
        vars.insert(
            "DATABASE_URL".to_string(),
            "postgresql://localhost/gateway".to_string(),
        );

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.access_token_ttl, Duration::from_secs(300));
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(
            config.services.get("course").map(String::as_str),
            Some("http://courses.internal:9002")
        );
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgresql://localhost/gateway")
        );
    }

    #[test]
    fn test_from_vars_missing_jwt_secret() {
        let result = Config::from_vars(&HashMap::new());
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "JWT_SECRET"));
    }

    #[test]
    fn test_from_vars_short_jwt_secret() {
        let vars = HashMap::from([("JWT_SECRET".to_string(), "too-short".to_string())]);
        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidJwtSecret(msg)) if msg.contains("got 9"))
        );
    }

    #[test]
    fn test_from_vars_invalid_ttl() {
        for value in ["abc", "0", "-5", "1441"] {
            let mut vars = base_vars();
            vars.insert("ACCESS_TOKEN_TTL_MINUTES".to_string(), value.to_string());
            let result = Config::from_vars(&vars);
            assert!(
                matches!(result, Err(ConfigError::InvalidTokenTtl(_))),
                "expected TTL '{}' to be rejected",
                value
            );
        }
    }

    #[test]
    fn test_from_vars_bcrypt_cost_out_of_range() {
        for value in ["4", "9", "15", "31"] {
            let mut vars = base_vars();
            vars.insert("BCRYPT_COST".to_string(), value.to_string());
            let result = Config::from_vars(&vars);
            assert!(
                matches!(result, Err(ConfigError::InvalidBcryptCost(ref msg)) if msg.contains("between 10 and 14")),
                "expected cost {} to be rejected",
                value
            );
        }
    }

    #[test]
    fn test_from_vars_zero_upstream_timeout() {
        let mut vars = base_vars();
        vars.insert("UPSTREAM_TIMEOUT_SECONDS".to_string(), "0".to_string());
        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidUpstreamTimeout(_))));
    }

    #[test]
    fn test_from_vars_service_url_without_scheme() {
        let mut vars = base_vars();
        vars.insert(
            "STUDENT_SERVICE_URL".to_string(),
            "localhost:8001".to_string(),
        );
        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidServiceUrl(msg)) if msg.contains("STUDENT_SERVICE_URL"))
        );
    }

    #[test]
    fn test_from_vars_drain_period() {
        let config = Config::from_vars(&base_vars()).unwrap();
        assert_eq!(config.drain_period, Duration::ZERO);

        let mut vars = base_vars();
        vars.insert("GW_DRAIN_SECONDS".to_string(), "15".to_string());
        let config = Config::from_vars(&vars).unwrap();
        assert_eq!(config.drain_period, Duration::from_secs(15));
    }

    #[test]
    fn test_from_vars_invalid_drain_period() {
        for value in ["soon", "-1", "301"] {
            let mut vars = base_vars();
            vars.insert("GW_DRAIN_SECONDS".to_string(), value.to_string());
            let result = Config::from_vars(&vars);
            assert!(
                matches!(result, Err(ConfigError::InvalidDrainPeriod(_))),
                "expected drain period '{}' to be rejected",
                value
            );
        }
    }

    #[test]
    fn test_from_vars_empty_database_url_is_none() {
        let mut vars = base_vars();
        vars.insert("DATABASE_URL".to_string(), String::new());
        let config = Config::from_vars(&vars).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut vars = base_vars();
        vars.insert(
            "DATABASE_URL".to_string(),
            "postgresql://user:pw@localhost/gateway".to_string(),
        );
        let config = Config::from_vars(&vars).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains(TEST_SECRET));
        assert!(!debug.contains("admin123"));
        assert!(!debug.contains("user:pw"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("0.0.0.0:8000"));
    }
}
