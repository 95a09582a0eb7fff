//! Provider dispatch.
//!
//! Providers form a closed set: each upstream source is a variant wrapping
//! its own search implementation, and calls dispatch by match arm. Adding a
//! provider means adding a variant and its arm.

use crate::error::Result;
use crate::payload::{SearchOptions, SearchPayload, SearchResult};
use crate::search::SearchOrchestrator;
use crate::transport::Transport;
use prospector_core::EndpointPaths;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The set of supported scraping providers.
#[derive(Debug)]
pub enum ScraperProvider {
    /// The prospect-search API
    Prospect(ProspectProvider),
}

impl ScraperProvider {
    /// Stable identifier of the provider.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Prospect(_) => "prospect",
        }
    }

    /// Run a paginated search against the provider.
    pub async fn search(
        &self,
        payload: SearchPayload,
        options: SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<SearchResult> {
        match self {
            Self::Prospect(provider) => provider.search(payload, options, cancel).await,
        }
    }

    /// Fetch a single profile detail from the provider.
    pub async fn profile(
        &self,
        profile_code: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>> {
        match self {
            Self::Prospect(provider) => provider.profile(profile_code, cancel).await,
        }
    }
}

/// Concrete provider for the prospect-search API.
#[derive(Debug)]
pub struct ProspectProvider {
    orchestrator: SearchOrchestrator,
}

impl ProspectProvider {
    /// Create the provider over a transport and its endpoint paths.
    #[must_use]
    pub fn new(transport: Arc<Transport>, endpoints: EndpointPaths) -> Self {
        Self {
            orchestrator: SearchOrchestrator::new(transport, endpoints),
        }
    }

    /// Run a paginated search.
    pub async fn search(
        &self,
        payload: SearchPayload,
        options: SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<SearchResult> {
        self.orchestrator.search(payload, options, cancel).await
    }

    /// Fetch a single profile detail.
    pub async fn profile(
        &self,
        profile_code: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>> {
        self.orchestrator.profile(profile_code, cancel).await
    }
}
