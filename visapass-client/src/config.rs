/// Client configuration
///
/// # Environment Variables
///
/// - `VISAPASS_API_URL`: Base URL of the API (default: http://localhost:8080)
/// - `VISAPASS_API_TIMEOUT_SECS`: Per-request timeout (default: 15)

use crate::error::ClientError;
use std::env;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for [`crate::client::ApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    /// Configuration for `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a positive integer or the URL
    /// is not http(s).
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("VISAPASS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = match env::var("VISAPASS_API_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        let config = Self {
            timeout,
            ..Self::new(base_url)
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
            Ok(())
        } else {
            Err(ClientError::Config(format!(
                "VISAPASS_API_URL must be an http(s) URL, got {}",
                self.base_url
            )))
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ClientError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ClientError::Config(format!(
            "VISAPASS_API_TIMEOUT_SECS must be a positive integer, got {}",
            raw
        ))),
    }
}
