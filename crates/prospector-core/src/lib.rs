//! Prospector core - shared configuration for the scraping client.
//!
//! This crate carries the construction-time configuration surface used by
//! the rest of the workspace: upstream base URL, credentials, retry and
//! rate-limit policies, and endpoint paths. Validation happens here so that
//! misconfiguration fails at client construction, not mid-scrape.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;

pub use config::{
    AuthConfig, AuthMode, EndpointPaths, RateLimitPolicy, RetryPolicy, ScraperConfig,
    DEFAULT_SESSION_FILE, DEFAULT_USER_AGENT, PROFILE_PATH, SEARCH_PATH,
};
pub use error::{ConfigError, ConfigResult};
