//! Chat service connection settings parsed from environment variables.

use super::ApiError;

pub const DEFAULT_CHAT_API_BASE_URL: &str = "http://localhost:81";
pub const DEFAULT_CHAT_API_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatApiConfig {
    /// Base address of the remote service, without trailing `/`.
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ChatApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHAT_API_BASE_URL.to_string(),
            connect_timeout_secs: DEFAULT_CHAT_API_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: None,
        }
    }
}

impl ChatApiConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `CHAT_API_BASE_URL`: default `http://localhost:81`
    /// - `CHAT_API_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CHAT_API_REQUEST_TIMEOUT_SECS`: unset by default
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is not an http(s) URL.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("CHAT_API_BASE_URL").unwrap_or_else(|_| DEFAULT_CHAT_API_BASE_URL.to_string());
        let connect_timeout_secs =
            env_parse_u64("CHAT_API_CONNECT_TIMEOUT_SECS").unwrap_or(DEFAULT_CHAT_API_CONNECT_TIMEOUT_SECS);
        let request_timeout_secs = env_parse_u64("CHAT_API_REQUEST_TIMEOUT_SECS");

        Ok(Self { base_url: normalize_base_url(&base_url)?, connect_timeout_secs, request_timeout_secs })
    }

    /// Replace the base URL, applying the same validation as [`Self::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is not an http(s) URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ApiError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }
}

fn env_parse_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse::<u64>().ok())
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::Config(format!("invalid CHAT_API_BASE_URL '{raw}' (expected http:// or https://)")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
