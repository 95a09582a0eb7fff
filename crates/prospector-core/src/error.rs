//! Configuration error types.

use thiserror::Error;

/// Errors raised while validating a scraper configuration.
///
/// These surface at client construction time, before any network traffic.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No base URL was provided
    #[error("base URL is required")]
    MissingBaseUrl,

    /// Base URL could not be parsed as an absolute URL
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The offending value
        url: String,
        /// Parse failure detail
        reason: String,
    },

    /// Authentication is configured but a credential value is empty
    #[error("missing credential: {field}")]
    MissingCredentials {
        /// Which credential field is empty
        field: &'static str,
    },

    /// A configuration field holds an out-of-range or malformed value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
