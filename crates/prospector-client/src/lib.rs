//! Prospector client - outbound scraping client for the prospect-search API.
//!
//! Talks to a third-party prospect-search API over HTTP while managing
//! session cookies, credential login with transparent re-login, windowed
//! rate limiting, exponential-backoff retry, and cursor-based pagination
//! with optional per-item profile enrichment.
//!
//! # Example
//!
//! ```rust,no_run
//! use prospector_client::{ScraperClient, SearchOptions, SearchPayload};
//! use prospector_core::{AuthConfig, ScraperConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScraperConfig::new("https://app.example.com").with_auth(AuthConfig {
//!     username_field: "email".to_string(),
//!     username: "ops@example.com".to_string(),
//!     password: "secret".to_string(),
//!     ..AuthConfig::default()
//! });
//!
//! let client = ScraperClient::new(config).await?;
//! let result = client
//!     .search(
//!         SearchPayload::new(json!({"titles": ["CTO"]})),
//!         SearchOptions::default().with_max_pages(2).with_max_items(100),
//!     )
//!     .await?;
//!
//! println!("{} items over {} pages", result.items.len(), result.pages_fetched);
//! # Ok(())
//! # }
//! ```
//!
//! # Component stack
//!
//! ```text
//! ScraperClient → ScraperProvider → SearchOrchestrator
//!                                        ↓
//!                                   Transport (admission gate, retry)
//!                                        ↓
//!                             AuthCoordinator / SessionStore
//! ```
//!
//! Responses flow back up; cookie mutations are written through the
//! session store as a side effect of every transport call.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]

pub mod auth;
pub mod client;
pub mod error;
mod headers;
pub mod limiter;
pub mod payload;
pub mod provider;
pub mod search;
pub mod transport;

pub use auth::AuthCoordinator;
pub use client::ScraperClient;
pub use error::{Result, ScrapeError};
pub use limiter::AdmissionGate;
pub use payload::{
    ProfileEnvelope, SearchEnvelope, SearchOptions, SearchPage, SearchPayload, SearchResult,
    TotalRelation,
};
pub use provider::{ProspectProvider, ScraperProvider};
pub use search::SearchOrchestrator;
pub use transport::Transport;
