use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const API_URL_VAR: &str = "MATELOG_API_URL";
const TIMEOUT_VAR: &str = "MATELOG_HTTP_TIMEOUT_SECS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API url `{value}`: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("invalid timeout `{0}`: expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Where the backend lives and how long to wait for it.
///
/// The base URL is kept without a trailing slash; endpoints are appended to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Reads `MATELOG_API_URL` and `MATELOG_HTTP_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = env::var(API_URL_VAR) {
            if !raw.trim().is_empty() {
                config = config.with_base_url(&raw)?;
            }
        }
        if let Ok(raw) = env::var(TIMEOUT_VAR) {
            config.timeout = parse_timeout(&raw)?;
        }
        Ok(config)
    }

    /// Replaces the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` for anything but an absolute http(s) URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
            value: raw.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                value: raw.to_string(),
                reason: "scheme must be http or https".into(),
            });
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint path such as `users/login/`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8000/api");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn endpoints_join_onto_the_base_path() {
        let config = ApiConfig::default()
            .with_base_url("https://matelog.example/api/")
            .unwrap();
        assert_eq!(config.base_url(), "https://matelog.example/api");
        assert_eq!(
            config.endpoint("/lessons/lecciones/"),
            "https://matelog.example/api/lessons/lecciones/"
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            ApiConfig::default().with_base_url("ftp://example.com"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(ApiConfig::default().with_base_url("not a url").is_err());
    }

    #[test]
    fn timeout_must_be_positive() {
        assert_eq!(parse_timeout(" 30 "), Ok(Duration::from_secs(30)));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }
}
