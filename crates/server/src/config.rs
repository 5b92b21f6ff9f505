//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PRICETATOR_SECRET_KEY` - Bearer token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `PRICETATOR_HOST` - Bind address (default: 127.0.0.1)
//! - `PRICETATOR_PORT` - Listen port (default: 5000)
//! - `PRICETATOR_ALLOWED_ORIGINS` - Comma-separated CORS origins
//!   (default: `http://localhost:3000,http://localhost:3001`)
//! - `PRICETATOR_UPLOAD_DIR` - Directory for uploaded images (default: static/uploads)
//! - `PRICETATOR_ALLOW_UNVERIFIED_IDENTITY` - Enable the unverified Google sign-in
//!   bootstrap (default: false, development and tests only)
//! - `SERPAPI_KEY` - SerpAPI key; search is disabled without it
//! - `SERPAPI_BASE_URL` - SerpAPI endpoint (default: <https://serpapi.com>)
//! - `SERPAPI_COUNTRY` - Google Shopping country code (default: in)
//! - `SERPAPI_TIMEOUT_SECS` - Upstream request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SECRET_KEY_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";
const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "change-this",
    "replace",
    "placeholder",
    "example",
    "dev-secret",
    "password",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Pricetator server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer token signing secret
    pub secret_key: SecretString,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,
    /// Serve `/api/auth/google` without verifying the identity assertion
    pub allow_unverified_identity: bool,
    /// Upstream shopping search configuration
    pub serpapi: SerpApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// SerpAPI (Google Shopping) configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SerpApiConfig {
    /// API key; `None` disables search
    pub api_key: Option<SecretString>,
    /// Base URL without trailing path (e.g., <https://serpapi.com>)
    pub base_url: String,
    /// Google country code sent as `gl`
    pub country: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for SerpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("country", &self.country)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SerpApiConfig {
    /// Whether an API key is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the secret key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PRICETATOR_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRICETATOR_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("PRICETATOR_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRICETATOR_PORT".to_string(), e.to_string())
            })?;

        let secret_key = get_validated_secret("PRICETATOR_SECRET_KEY")?;
        validate_secret_length(&secret_key, "PRICETATOR_SECRET_KEY")?;

        let allowed_origins = parse_origins(&get_env_or_default(
            "PRICETATOR_ALLOWED_ORIGINS",
            DEFAULT_ALLOWED_ORIGINS,
        ));
        let upload_dir = PathBuf::from(get_env_or_default(
            "PRICETATOR_UPLOAD_DIR",
            "static/uploads",
        ));
        let allow_unverified_identity = get_bool_env("PRICETATOR_ALLOW_UNVERIFIED_IDENTITY")?;

        let serpapi = SerpApiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            secret_key,
            allowed_origins,
            upload_dir,
            allow_unverified_identity,
            serpapi,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_f32_env("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_f32_env("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SerpApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = get_env_or_default("SERPAPI_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SERPAPI_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_key: get_optional_env("SERPAPI_KEY")
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            base_url: get_env_or_default("SERPAPI_BASE_URL", DEFAULT_SERPAPI_BASE_URL),
            country: get_env_or_default("SERPAPI_COUNTRY", "in"),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a boolean flag; unset means `false`.
fn get_bool_env(key: &str) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(false), |value| parse_bool(key, &value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn get_f32_env(key: &str, default: f32) -> Result<f32, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SECRET_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SECRET_KEY_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
