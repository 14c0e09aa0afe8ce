// Configuration management

use crate::core::errors::GateError;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables
///
/// All configuration is validated on load with clear error messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Path sandboxing configuration
    pub unsafe_staging_prefix: String,
    pub safe_staging_prefix: String,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    pub fn from_env() -> Result<Self, GateError> {
        // Load .env file if present (development)
        // Skip in test environment to avoid interfering with test environment variables
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok(); // Ignore errors (file may not exist)
        }

        let config = Self {
            bind_address: Self::get_env_or_default("BIND_ADDRESS", "0.0.0.0"),
            port: Self::parse_port()?,
            request_timeout_secs: Self::parse_u64_or_default("REQUEST_TIMEOUT_SECS", 30)?,
            body_size_limit_bytes: Self::parse_usize_or_default(
                "BODY_SIZE_LIMIT_BYTES",
                2 * 1024 * 1024,
            )?,
            unsafe_staging_prefix: Self::get_env_or_default("UNSAFE_STAGING_PREFIX", "/tmp/"),
            safe_staging_prefix: Self::get_env_or_default("SAFE_STAGING_PREFIX", "/safe/tmp/"),
            log_level: Self::get_env_or_default("LOG_LEVEL", "info"),
            log_format: Self::get_env_or_default("LOG_FORMAT", "json"),
        };

        // Post-load validation
        config.validate()?;

        Ok(config)
    }

    /// Get environment variable or return default value
    fn get_env_or_default(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Parse port from PORT environment variable
    fn parse_port() -> Result<u16, GateError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port = port_str.parse::<u16>().map_err(|e| {
            GateError::ConfigurationError(format!("Invalid PORT value '{}': {}", port_str, e))
        })?;

        if port == 0 {
            return Err(GateError::ConfigurationError(
                "PORT must be between 1 and 65535".to_string(),
            ));
        }

        Ok(port)
    }

    /// Parse u64 from environment variable or return default
    fn parse_u64_or_default(key: &str, default: u64) -> Result<u64, GateError> {
        match env::var(key) {
            Ok(value) => {
                let parsed = value.parse::<u64>().map_err(|e| {
                    GateError::ConfigurationError(format!(
                        "Invalid {} value '{}': {}",
                        key, value, e
                    ))
                })?;

                if parsed == 0 {
                    return Err(GateError::ConfigurationError(format!(
                        "{} must be greater than 0",
                        key
                    )));
                }

                Ok(parsed)
            }
            _ => Ok(default),
        }
    }

    /// Parse usize from environment variable or return default
    fn parse_usize_or_default(key: &str, default: usize) -> Result<usize, GateError> {
        match env::var(key) {
            Ok(value) => {
                let parsed = value.parse::<usize>().map_err(|e| {
                    GateError::ConfigurationError(format!(
                        "Invalid {} value '{}': {}",
                        key, value, e
                    ))
                })?;

                if parsed == 0 {
                    return Err(GateError::ConfigurationError(format!(
                        "{} must be greater than 0",
                        key
                    )));
                }

                Ok(parsed)
            }
            _ => Ok(default),
        }
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), GateError> {
        Self::validate_staging_prefix(&self.unsafe_staging_prefix, "UNSAFE_STAGING_PREFIX")?;
        Self::validate_staging_prefix(&self.safe_staging_prefix, "SAFE_STAGING_PREFIX")?;

        if self.unsafe_staging_prefix == self.safe_staging_prefix {
            return Err(GateError::ConfigurationError(
                "UNSAFE_STAGING_PREFIX and SAFE_STAGING_PREFIX must differ".to_string(),
            ));
        }

        Self::validate_log_level(&self.log_level)?;
        Self::validate_log_format(&self.log_format)?;

        Ok(())
    }

    /// Validate a staging prefix
    ///
    /// Prefixes must be absolute and directory-like: the rewrite is a
    /// plain prefix substitution, so a missing trailing slash would let
    /// `/tmpfoo` match the `/tmp` prefix.
    fn validate_staging_prefix(prefix: &str, key: &str) -> Result<(), GateError> {
        if !prefix.starts_with('/') {
            return Err(GateError::ConfigurationError(format!(
                "Invalid {} '{}': must be an absolute path",
                key, prefix
            )));
        }
        if !prefix.ends_with('/') {
            return Err(GateError::ConfigurationError(format!(
                "Invalid {} '{}': must end with '/'",
                key, prefix
            )));
        }
        Ok(())
    }

    /// Validate log level
    fn validate_log_level(level: &str) -> Result<(), GateError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(GateError::ConfigurationError(format!(
                "Invalid LOG_LEVEL '{}': must be one of {}",
                level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    /// Validate log format
    fn validate_log_format(format: &str) -> Result<(), GateError> {
        if format != "json" && format != "text" {
            return Err(GateError::ConfigurationError(format!(
                "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
                format
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Create a test configuration for unit tests
    ///
    /// This bypasses environment variable loading for use in tests that
    /// don't need real configuration.
    pub fn test_config() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            body_size_limit_bytes: 2 * 1024 * 1024,
            unsafe_staging_prefix: "/tmp/".to_string(),
            safe_staging_prefix: "/safe/tmp/".to_string(),
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}
