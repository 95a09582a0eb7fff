//! Scraper client configuration.
//!
//! All configuration is supplied at construction time by the host
//! application (typically deserialized out of a job payload); there is no
//! config file or CLI surface here. Every section has serde defaults so a
//! partial payload yields a usable config.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// Default path for the persisted session file.
pub const DEFAULT_SESSION_FILE: &str = "./.scraper-session.json";

/// Default User-Agent presented to the upstream API.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Upstream search endpoint path.
pub const SEARCH_PATH: &str = "/svc/app/prospect/search";

/// Upstream profile-detail endpoint path.
pub const PROFILE_PATH: &str = "/svc/app/prospect/profile";

/// Top-level configuration for the scraping client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Base URL of the upstream API, e.g. `https://app.example.com`
    pub base_url: String,
    /// Path of the persisted cookie session file
    pub session_file: PathBuf,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Credential-based login; `None` disables the forced-reauth path
    pub auth: Option<AuthConfig>,
    /// Retry behavior for failed requests
    pub retry: RetryPolicy,
    /// Request admission policy
    pub rate_limit: RateLimitPolicy,
    /// Upstream endpoint paths
    pub endpoints: EndpointPaths,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auth: None,
            retry: RetryPolicy::default(),
            rate_limit: RateLimitPolicy::default(),
            endpoints: EndpointPaths::default(),
        }
    }
}

impl ScraperConfig {
    /// Create a configuration for the given base URL with defaults elsewhere.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the credential configuration.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the session file path.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the rate-limit policy.
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitPolicy) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Parse and return the configured base URL.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingBaseUrl`] when empty and
    /// [`ConfigError::InvalidBaseUrl`] when unparseable.
    pub fn parsed_base_url(&self) -> ConfigResult<Url> {
        if self.base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Validate the whole configuration.
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> ConfigResult<()> {
        self.parsed_base_url()?;

        if let Some(auth) = &self.auth {
            auth.validate()?;
        }

        if self.retry.base_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.base_delay_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.rate_limit.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rate_limit.concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.rate_limit.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rate_limit.interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// How login credentials are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// JSON request body
    Json,
    /// `application/x-www-form-urlencoded` request body
    Form,
}

/// Credential-based login configuration. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Body encoding for the login request
    pub mode: AuthMode,
    /// Path of the login endpoint, relative to the base URL
    pub login_path: String,
    /// Name of the username field in the login body
    pub username_field: String,
    /// Name of the password field in the login body
    pub password_field: String,
    /// Extra static fields merged into the login body
    pub additional_fields: HashMap<String, String>,
    /// Username credential value
    pub username: String,
    /// Password credential value
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::Json,
            login_path: "/login".to_string(),
            username_field: "username".to_string(),
            password_field: "password".to_string(),
            additional_fields: HashMap::new(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl AuthConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.username.is_empty() {
            return Err(ConfigError::MissingCredentials { field: "username" });
        }
        if self.password.is_empty() {
            return Err(ConfigError::MissingCredentials { field: "password" });
        }
        if self.login_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth.login_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Retry-with-backoff policy. Delays double per attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = `max_retries + 1`)
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retrying after failed attempt number `attempt`
    /// (zero-based): `base_delay_ms * 2^attempt`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> std::time::Duration {
        let factor = 2u64.saturating_pow(attempt);
        std::time::Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

/// Admission-window rate limit: at most `concurrency` request starts are
/// admitted per rolling `interval_ms` window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitPolicy {
    /// Admissions allowed per window
    pub concurrency: u32,
    /// Window length in milliseconds
    pub interval_ms: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            concurrency: 1,
            interval_ms: 1000,
        }
    }
}

/// Upstream endpoint paths, relative to the base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    /// Prospect search endpoint
    pub search: String,
    /// Prospect profile-detail endpoint
    pub profile: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            search: SEARCH_PATH.to_string(),
            profile: PROFILE_PATH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.rate_limit.concurrency, 1);
        assert_eq!(config.rate_limit.interval_ms, 1000);
        assert_eq!(config.endpoints.search, SEARCH_PATH);
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_validate_requires_base_url() {
        let config = ScraperConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingBaseUrl)
        ));

        let config = ScraperConfig::new("not a url");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let config = ScraperConfig::new("https://app.example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let config = ScraperConfig::new("https://app.example.com").with_auth(AuthConfig {
            username: "ops@example.com".to_string(),
            ..AuthConfig::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredentials { field: "password" })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_policies() {
        let mut config = ScraperConfig::new("https://app.example.com");
        config.rate_limit.concurrency = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "rate_limit.concurrency",
                ..
            })
        ));

        let mut config = ScraperConfig::new("https://app.example.com");
        config.retry.base_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_doubles() {
        let retry = RetryPolicy {
            max_retries: 3,
            base_delay_ms: 250,
        };
        assert_eq!(retry.delay_for_attempt(0).as_millis(), 250);
        assert_eq!(retry.delay_for_attempt(1).as_millis(), 500);
        assert_eq!(retry.delay_for_attempt(2).as_millis(), 1000);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: ScraperConfig =
            serde_json::from_str(r#"{"base_url": "https://app.example.com"}"#)
                .expect("deserialize config");
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_auth_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&AuthMode::Json).expect("serialize"),
            "\"json\""
        );
        assert_eq!(
            serde_json::to_string(&AuthMode::Form).expect("serialize"),
            "\"form\""
        );
    }
}
