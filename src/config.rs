//! Client configuration loaded from environment variables.

use std::env;

use crate::api::{API_URL_ENV, ApiConfig, MAX_TREND_DAYS, http::timeout_from_secs};
use crate::query::MAX_PAGE_SIZE;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_API_URL: &str = "http://localhost:8000";
    pub const DEV_PAGE_SIZE: u32 = 20;
    pub const DEV_TREND_DAYS: u32 = 7;
}

/// API base URL from the raw `TDASH_API_URL` value; blank or unset falls back
/// to the development default.
pub fn resolve_api_url(raw: Option<String>) -> String {
    raw.map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| defaults::DEV_API_URL.to_string())
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Base URL of the results API
    pub api_url: String,
    /// Total request timeout in seconds (unset: no timeout)
    pub http_timeout_secs: Option<u64>,
    /// Connect timeout in seconds (unset: no timeout)
    pub http_connect_timeout_secs: Option<u64>,
    /// Default run list page size (default: 20)
    pub page_size: u32,
    /// Default trend window in days (default: 7)
    pub trend_days: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode every variable has a default. In production mode the
    /// API URL must be set explicitly and use HTTPS.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production, default: development)
    /// - `TDASH_API_URL`: API base URL (default: http://localhost:8000)
    /// - `TDASH_HTTP_TIMEOUT_SECS`: Request timeout in seconds (optional)
    /// - `TDASH_HTTP_CONNECT_TIMEOUT_SECS`: Connect timeout in seconds (optional)
    /// - `TDASH_PAGE_SIZE`: Runs per page, 1-100 (default: 20)
    /// - `TDASH_TREND_DAYS`: Trend window, 1-30 (default: 7)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("RUST_ENV") {
            Some(value) => Environment::parse(&value).ok_or(ConfigError::InvalidValue(
                "RUST_ENV must be 'development' or 'production'",
            ))?,
            None => Environment::Development,
        };

        let api_url = resolve_api_url(lookup(API_URL_ENV));

        let http_timeout_secs = lookup("TDASH_HTTP_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| {
                ConfigError::InvalidValue("TDASH_HTTP_TIMEOUT_SECS must be a valid number")
            })?;

        let http_connect_timeout_secs = lookup("TDASH_HTTP_CONNECT_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| {
                ConfigError::InvalidValue("TDASH_HTTP_CONNECT_TIMEOUT_SECS must be a valid number")
            })?;

        let page_size = lookup("TDASH_PAGE_SIZE")
            .unwrap_or_else(|| defaults::DEV_PAGE_SIZE.to_string())
            .parse::<u32>()
            .ok()
            .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
            .ok_or(ConfigError::InvalidValue(
                "TDASH_PAGE_SIZE must be a number between 1 and 100",
            ))?;

        let trend_days = lookup("TDASH_TREND_DAYS")
            .unwrap_or_else(|| defaults::DEV_TREND_DAYS.to_string())
            .parse::<u32>()
            .ok()
            .filter(|days| (1..=MAX_TREND_DAYS).contains(days))
            .ok_or(ConfigError::InvalidValue(
                "TDASH_TREND_DAYS must be a number between 1 and 30",
            ))?;

        let config = Config {
            environment,
            api_url,
            http_timeout_secs,
            http_connect_timeout_secs,
            page_size,
            trend_days,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.api_url == defaults::DEV_API_URL {
            errors.push(format!(
                "TDASH_API_URL is using development default '{}'. Set the production API URL.",
                defaults::DEV_API_URL
            ));
        } else if !self.api_url.to_lowercase().starts_with("https://") {
            errors.push(format!(
                "TDASH_API_URL '{}' must use https in production.",
                self.api_url
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Connection settings for the API client.
    pub fn api(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            timeout: self.http_timeout_secs.and_then(timeout_from_secs),
            connect_timeout: self.http_connect_timeout_secs.and_then(timeout_from_secs),
        }
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
