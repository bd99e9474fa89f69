//! Configuration management for the HubSpot MCP Server.
//!
//! The access token arrives as the single startup argument; everything else is
//! optional and read from environment variables. The binary loads a `.env`
//! file once at startup, before argument parsing; `Config::load` only reads
//! the process environment.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Default base URL for the HubSpot API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.hubapi.com";

/// Configuration for the HubSpot MCP Server.
#[derive(Clone)]
pub struct Config {
    /// HubSpot API base URL
    pub api_base_url: String,

    /// HubSpot private app / OAuth access token
    pub access_token: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("access_token", &"[MASKED]")
            .field("request_timeout", &self.request_timeout)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Build configuration from the startup access token and the environment.
    ///
    /// Optional environment variables:
    /// - `HUBSPOT_API_BASE_URL`: API base URL (default: `https://api.hubapi.com`)
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn load(access_token: &str) -> ConfigResult<Self> {
        let access_token = Self::validate_access_token(access_token)?;

        let api_base_url =
            env::var("HUBSPOT_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "HUBSPOT_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            api_base_url,
            access_token,
            request_timeout,
            log_level,
        })
    }

    /// Reject a missing or blank access token.
    fn validate_access_token(access_token: &str) -> ConfigResult<String> {
        let token = access_token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingVar(
                "HubSpot access token (pass it as the first argument)".to_string(),
            ));
        }
        Ok(token.to_string())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: String::new(),
            request_timeout: 10,
            log_level: "error".to_string(),
        }
    }
}
