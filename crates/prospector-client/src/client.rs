//! Client construction and the public facade.
//!
//! Wiring is explicit and follows dependency order: session store, then
//! auth coordinator, then transport, then the provider. No container.

use crate::auth::AuthCoordinator;
use crate::error::Result;
use crate::limiter::AdmissionGate;
use crate::payload::{SearchOptions, SearchPayload, SearchResult};
use crate::provider::{ProspectProvider, ScraperProvider};
use crate::transport::Transport;
use prospector_core::ScraperConfig;
use prospector_session::SessionStore;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// The outbound scraping client.
#[derive(Debug)]
pub struct ScraperClient {
    session: Arc<SessionStore>,
    provider: ScraperProvider,
}

impl ScraperClient {
    /// Build a client from configuration.
    ///
    /// Validates the configuration, loads the persisted session (a missing
    /// session file is fine; any other load failure surfaces here), and
    /// wires the component stack.
    pub async fn new(config: ScraperConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;

        let session = Arc::new(SessionStore::new(&config.session_file));
        session.load().await?;

        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        let auth = config.auth.as_ref().map(|auth_config| {
            Arc::new(AuthCoordinator::new(
                http.clone(),
                base_url.clone(),
                config.user_agent.clone(),
                auth_config.clone(),
                session.clone(),
            ))
        });

        let transport = Arc::new(Transport::new(
            http,
            base_url,
            config.user_agent.clone(),
            session.clone(),
            auth,
            AdmissionGate::new(config.rate_limit),
            config.retry,
        ));

        let provider =
            ScraperProvider::Prospect(ProspectProvider::new(transport, config.endpoints));

        Ok(Self { session, provider })
    }

    /// The session store backing this client.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The provider this client dispatches to.
    #[must_use]
    pub fn provider(&self) -> &ScraperProvider {
        &self.provider
    }

    /// Run a paginated search.
    pub async fn search(
        &self,
        payload: SearchPayload,
        options: SearchOptions,
    ) -> Result<SearchResult> {
        self.provider
            .search(payload, options, &CancellationToken::new())
            .await
    }

    /// Run a paginated search that can be aborted through `cancel`.
    pub async fn search_with_cancel(
        &self,
        payload: SearchPayload,
        options: SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<SearchResult> {
        self.provider.search(payload, options, cancel).await
    }

    /// Fetch a single profile detail.
    pub async fn profile(&self, profile_code: &str) -> Result<Option<Value>> {
        self.provider
            .profile(profile_code, &CancellationToken::new())
            .await
    }

    /// Drop all session cookies and persist the empty jar.
    pub async fn reset_session(&self) -> Result<()> {
        self.session.clear().await?;
        Ok(())
    }
}
