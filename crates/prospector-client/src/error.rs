//! Error types for the scraping client.

use prospector_core::ConfigError;
use prospector_session::SessionError;
use thiserror::Error;

/// Errors that can occur while talking to the upstream API.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Invalid configuration at construction time
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session persistence failure
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Login request failed or was rejected
    #[error("authentication failed: {message}")]
    Authentication {
        /// HTTP status of the login response, when one was received
        status: Option<u16>,
        /// Failure detail
        message: String,
    },

    /// Upstream returned a non-2xx, non-auth status
    #[error("upstream returned status {status} for {path}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Request path
        path: String,
    },

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be decoded as the expected JSON shape
    #[error("failed to decode response from {path}: {message}")]
    Decode {
        /// Request path
        path: String,
        /// Decode failure detail
        message: String,
    },

    /// The retry budget was spent without a successful response
    #[error("retry budget exhausted after {attempts} attempts")]
    ExhaustedRetries {
        /// Total attempts made (`max_retries + 1`)
        attempts: u32,
        /// The error from the final attempt
        #[source]
        source: Box<ScrapeError>,
    },

    /// The operation was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type alias for scraping operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScrapeError::Status {
            status: 502,
            path: "/svc/app/prospect/search".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "upstream returned status 502 for /svc/app/prospect/search"
        );
    }

    #[test]
    fn test_exhausted_retries_carries_source() {
        let err = ScrapeError::ExhaustedRetries {
            attempts: 4,
            source: Box::new(ScrapeError::Status {
                status: 500,
                path: "/x".to_string(),
            }),
        };
        assert!(err.to_string().contains("4 attempts"));
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("500"));
    }

    #[test]
    fn test_authentication_display() {
        let err = ScrapeError::Authentication {
            status: Some(403),
            message: "login rejected with status 403".to_string(),
        };
        assert!(err.to_string().contains("login rejected"));
    }
}
