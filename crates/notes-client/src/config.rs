//! Client configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the notes API.
    pub api_url: String,
    /// File holding the persisted session token.
    pub token_path: PathBuf,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Per-request timeout. `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `NOTES_API_URL`: Base URL of the notes API
    ///
    /// Optional:
    /// - `NOTES_TOKEN_PATH`: Token file (default: `<data dir>/notes/token`)
    /// - `NOTES_LOG_LEVEL`: Logging level (default: "warn")
    /// - `NOTES_REQUEST_TIMEOUT_SECS`: Request timeout in seconds (default: none)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("NOTES_API_URL")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("NOTES_API_URL".to_string()))?;
        let api_url = normalize_api_url(&api_url)?;

        let token_path = match lookup("NOTES_TOKEN_PATH").filter(|s| !s.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_token_path(),
        };

        let log_level = lookup("NOTES_LOG_LEVEL").unwrap_or_else(|| "warn".to_string());

        let request_timeout = match lookup("NOTES_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    name: "NOTES_REQUEST_TIMEOUT_SECS".to_string(),
                    reason: format!("expected whole seconds, got {raw:?}"),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_url,
            token_path,
            log_level,
            request_timeout,
        })
    }
}

/// Default token location inside the platform data directory.
pub fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notes")
        .join(crate::token_store::TOKEN_KEY)
}

/// Check the scheme and strip trailing slashes so paths can be appended.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            name: "NOTES_API_URL".to_string(),
            reason: format!("expected an http or https URL, got {raw:?}"),
        });
    }
    Ok(trimmed.to_string())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config =
            ClientConfig::from_lookup(lookup(&[("NOTES_API_URL", "https://api.example.com/")]))
                .unwrap();

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.log_level, "warn");
        assert!(config.request_timeout.is_none());
        assert!(config.token_path.ends_with("notes/token"));
    }

    #[test]
    fn test_missing_url() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "NOTES_API_URL"));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err =
            ClientConfig::from_lookup(lookup(&[("NOTES_API_URL", "ftp://example.com")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("NOTES_API_URL", "http://localhost:4000"),
            ("NOTES_TOKEN_PATH", "/tmp/notes-token"),
            ("NOTES_LOG_LEVEL", "debug"),
            ("NOTES_REQUEST_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.token_path, PathBuf::from("/tmp/notes-token"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("NOTES_API_URL", "http://localhost:4000"),
            ("NOTES_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("NOTES_REQUEST_TIMEOUT_SECS"));
    }
}
