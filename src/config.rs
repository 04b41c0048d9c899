//! Process configuration
//!
//! Loaded once in `main` from the environment and handed to the components
//! through `Arc`s. Nothing in the crate reads the environment after startup.

use std::fmt;
use std::time::Duration;

use crate::error::{MomoError, Result};
use crate::logging::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Kept shorter than the provider's real TTL so a token never expires mid-flight
const DEFAULT_TOKEN_VALIDITY_SECS: u64 = 45 * 60;

/// Provider credentials and endpoints
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token_url: String,
    pub callback_url: String,
    pub api_endpoint: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .field("callback_url", &self.callback_url)
            .field("api_endpoint", &self.api_endpoint)
            .finish()
    }
}

/// Outbound HTTP settings shared by the token and payment calls
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub http: HttpConfig,
    pub token_validity: Duration,
    pub bind_addr: String,
    pub log_format: LogFormat,
    pub log_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            optional(key).ok_or_else(|| MomoError::Config(format!("{key} is required")))
        };
        let seconds = |key: &str, default: u64| -> Result<Duration> {
            match optional(key) {
                Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    MomoError::Config(format!("{key} must be a number of seconds, got {raw:?}"))
                }),
                None => Ok(Duration::from_secs(default)),
            }
        };

        let credentials = Credentials {
            consumer_key: required("MOMO_CONSUMER_KEY")?,
            consumer_secret: required("MOMO_CONSUMER_SECRET")?,
            token_url: required("MOMO_TOKEN_URL")?,
            callback_url: required("MOMO_CALLBACK_URL")?,
            api_endpoint: required("MOMO_API_ENDPOINT")?,
        };

        let http = HttpConfig {
            connect_timeout: seconds("MOMO_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
            timeout: seconds("MOMO_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
        };

        let token_validity = seconds("MOMO_TOKEN_VALIDITY_SECS", DEFAULT_TOKEN_VALIDITY_SECS)?;
        if token_validity.is_zero() {
            return Err(MomoError::Config(
                "MOMO_TOKEN_VALIDITY_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            credentials,
            http,
            token_validity,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            log_format: optional("LOG_FORMAT")
                .map(|v| LogFormat::from_str_lossy(&v))
                .unwrap_or(LogFormat::Pretty),
            log_file: optional("LOG_FILE"),
        })
    }
}
