use crate::errors::KycError;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://datafabric.hiroshiaki.com";

/// Prefix carried by sandbox API keys.
pub const TEST_KEY_PREFIX: &str = "dfb_test_";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
}

/// Reads a duration written as (possibly fractional) seconds.
fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}

/// Settings used to build a [`KycClient`](crate::client::KycClient).
///
/// Can be deserialized from any serde source; only `api_key` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overall request timeout; read from `timeout_secs`.
    #[serde(
        rename = "timeout_secs",
        default = "default_timeout",
        deserialize_with = "duration_from_secs"
    )]
    pub timeout: Duration,
    /// Connection establishment timeout; read from `connect_timeout_secs`.
    #[serde(
        rename = "connect_timeout_secs",
        default = "default_connect_timeout",
        deserialize_with = "duration_from_secs"
    )]
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Base URL without trailing slashes, ready for path concatenation.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    pub fn is_test_mode(&self) -> bool {
        self.api_key.starts_with(TEST_KEY_PREFIX)
    }

    /// Checks the settings before a client is built from them.
    pub fn validate(&self) -> Result<(), KycError> {
        if self.api_key.trim().is_empty() {
            return Err(KycError::Validation("API key cannot be empty".to_string()));
        }
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(KycError::Validation("Base URL cannot be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(KycError::Validation(
                "Base URL must start with http:// or https://".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(KycError::Validation(
                "Request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("dfb_live_abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert!(!config.is_test_mode());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_value(serde_json::json!({ "api_key": "dfb_test_x" })).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert!(config.is_test_mode());
    }

    #[test]
    fn test_deserialize_fractional_seconds() {
        let config: ClientConfig = serde_json::from_value(serde_json::json!({
            "api_key": "k",
            "timeout_secs": 2.5,
            "connect_timeout_secs": 1
        }))
        .unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));

        let negative = serde_json::from_value::<ClientConfig>(serde_json::json!({
            "api_key": "k",
            "timeout_secs": -1
        }));
        assert!(negative.is_err());
    }

    #[test]
    fn test_sub_second_timeouts_kept() {
        let config = ClientConfig::new("k")
            .with_timeout(Duration::from_millis(1500))
            .with_connect_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Duration::from_millis(1500));
        assert_eq!(config.connect_timeout(), Duration::from_millis(500));

        let short = ClientConfig::new("k").with_timeout(Duration::from_millis(500));
        assert!(short.validate().is_ok());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("k").with_base_url("http://localhost:8000//");
        assert_eq!(config.normalized_base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(ClientConfig::new("  ").validate().is_err());
        assert!(ClientConfig::new("k")
            .with_base_url("ftp://example.com")
            .validate()
            .is_err());
        assert!(ClientConfig::new("k")
            .with_timeout(Duration::from_secs(0))
            .validate()
            .is_err());
    }
}
