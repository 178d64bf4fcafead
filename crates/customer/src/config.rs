//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LAUNDRY_API_URL` - Base URL of the shop API (e.g., `https://api.example.ph`)
//!
//! ## Optional
//! - `LAUNDRY_SHOP_SLUG` - Shop slug prefixed to public page links
//! - `LAUNDRY_STATE_DIR` - Directory holding durable storage (default: `~/.laundry`)
//! - `LAUNDRY_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `LAUNDRY_PAYMENT_CACHE_SECS` - Payment method cache TTL (default: 300)
//! - `LAUNDRY_LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_STATE_DIR_NAME: &str = ".laundry";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_PAYMENT_CACHE_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Could not determine home directory; set LAUNDRY_STATE_DIR")]
    NoHomeDir,
    #[error("Env file error for {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Customer client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the shop API
    pub api_url: Url,
    /// Shop slug used to prefix public page links
    pub shop_slug: Option<String>,
    /// Directory holding the durable storage file
    pub state_dir: PathBuf,
    /// Timeout applied to every API request
    pub request_timeout: Duration,
    /// How long displayed payment methods are cached per shop
    pub payment_cache_ttl: Duration,
    /// Log line format written to stderr
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment name (e.g., "production")
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(
            &lookup("LAUNDRY_API_URL")
                .ok_or_else(|| ConfigError::MissingEnvVar("LAUNDRY_API_URL".to_string()))?,
        )?;

        let shop_slug = non_empty(lookup("LAUNDRY_SHOP_SLUG"))
            .map(|slug| parse_shop_slug(&slug))
            .transpose()?;

        let state_dir = match non_empty(lookup("LAUNDRY_STATE_DIR")) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or(ConfigError::NoHomeDir)?
                .join(DEFAULT_STATE_DIR_NAME),
        };

        let request_timeout = Duration::from_secs(parse_secs(
            &lookup,
            "LAUNDRY_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let payment_cache_ttl = Duration::from_secs(parse_secs(
            &lookup,
            "LAUNDRY_PAYMENT_CACHE_SECS",
            DEFAULT_PAYMENT_CACHE_SECS,
        )?);

        let log_format = match non_empty(lookup("LAUNDRY_LOG_FORMAT")).as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LAUNDRY_LOG_FORMAT".to_string(),
                    format!("expected `text` or `json`, got `{other}`"),
                ));
            }
        };

        Ok(Self {
            api_url,
            shop_slug,
            state_dir,
            request_timeout,
            payment_cache_ttl,
            log_format,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")).map(SecretString::from),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }

    /// Path of the durable storage file inside the state directory.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.state_dir.join(crate::storage::FileStorage::FILE_NAME)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("LAUNDRY_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "LAUNDRY_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_shop_slug(raw: &str) -> Result<String, ConfigError> {
    let slug = raw.trim().trim_matches('/');
    if slug.is_empty() || slug.contains('/') {
        return Err(ConfigError::InvalidEnvVar(
            "LAUNDRY_SHOP_SLUG".to_string(),
            "must be a single path segment".to_string(),
        ));
    }
    Ok(slug.to_string())
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    non_empty(lookup(key)).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

// =============================================================================
// .env.example generation
// =============================================================================

/// Strip the values from `.env` content, keeping comments and blank lines.
///
/// Every other line becomes `KEY=`, where `KEY` is everything before the
/// first `=`.
#[must_use]
pub fn env_example(content: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                line.to_string()
            } else {
                let key = line.split('=').next().unwrap_or_default();
                format!("{key}=")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate an example env file from an existing one.
///
/// # Errors
///
/// Returns `ConfigError::EnvFile` if the source cannot be read (including when
/// it does not exist) or the example cannot be written.
pub fn write_env_example(env_path: &Path, example_path: &Path) -> Result<(), ConfigError> {
    let content = std::fs::read_to_string(env_path).map_err(|source| ConfigError::EnvFile {
        path: env_path.to_path_buf(),
        source,
    })?;

    std::fs::write(example_path, env_example(&content)).map_err(|source| ConfigError::EnvFile {
        path: example_path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %example_path.display(), "Generated env example");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("LAUNDRY_API_URL", "https://api.example.ph"),
            ("LAUNDRY_STATE_DIR", "/tmp/laundry-state"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.as_str(), "https://api.example.ph/");
        assert_eq!(config.shop_slug, None);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.payment_cache_ttl, Duration::from_secs(300));
        assert_eq!(
            config.storage_path(),
            PathBuf::from("/tmp/laundry-state/storage.json")
        );
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_api_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "LAUNDRY_API_URL"));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            ("LAUNDRY_API_URL", "ftp://api.example.ph"),
            ("LAUNDRY_STATE_DIR", "/tmp/x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_shop_slug_is_trimmed() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("LAUNDRY_API_URL", "http://localhost:5000"),
            ("LAUNDRY_STATE_DIR", "/tmp/x"),
            ("LAUNDRY_SHOP_SLUG", "/sudsy/"),
        ]))
        .unwrap();
        assert_eq!(config.shop_slug.as_deref(), Some("sudsy"));

        let err = ClientConfig::from_lookup(lookup_from(&[
            ("LAUNDRY_API_URL", "http://localhost:5000"),
            ("LAUNDRY_STATE_DIR", "/tmp/x"),
            ("LAUNDRY_SHOP_SLUG", "a/b"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            ("LAUNDRY_API_URL", "http://localhost:5000"),
            ("LAUNDRY_STATE_DIR", "/tmp/x"),
            ("LAUNDRY_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "LAUNDRY_REQUEST_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_log_format() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("LAUNDRY_API_URL", "http://localhost:5000"),
            ("LAUNDRY_STATE_DIR", "/tmp/x"),
            ("LAUNDRY_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);

        let err = ClientConfig::from_lookup(lookup_from(&[
            ("LAUNDRY_API_URL", "http://localhost:5000"),
            ("LAUNDRY_STATE_DIR", "/tmp/x"),
            ("LAUNDRY_LOG_FORMAT", "yaml"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "LAUNDRY_LOG_FORMAT"));
    }

    #[test]
    fn test_env_example_strips_values() {
        let content = "# API\nLAUNDRY_API_URL=https://api.example.ph\n\nSENTRY_DSN=https://k@o.ingest/1\n";
        assert_eq!(
            env_example(content),
            "# API\nLAUNDRY_API_URL=\n\nSENTRY_DSN=\n"
        );
    }

    #[test]
    fn test_write_env_example() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join(".env");
        let example = dir.path().join(".env.example");
        std::fs::write(&env, "LAUNDRY_SHOP_SLUG=sudsy").unwrap();

        write_env_example(&env, &example).unwrap();
        assert_eq!(
            std::fs::read_to_string(&example).unwrap(),
            "LAUNDRY_SHOP_SLUG="
        );
    }

    #[test]
    fn test_write_env_example_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_env_example(&dir.path().join(".env"), &dir.path().join(".env.example"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }
}
