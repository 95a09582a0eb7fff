//! Credential-based authentication with single-flight login.
//!
//! The upstream API authenticates via a login endpoint that answers with
//! session cookies. State transitions only through a successful login;
//! a forced re-authentication (after a mid-request 401/403) drops back to
//! unauthenticated and logs in again.
//!
//! Concurrent callers that observe "not authenticated" at the same time
//! must not fire duplicate logins. The state mutex makes login
//! single-flight: the first caller logs in while holding the lock, late
//! joiners block on the mutex and then see the authenticated state. Each
//! successful login bumps a generation counter; the forced-reauth path
//! skips its login when another caller already advanced the generation.

use crate::error::{Result, ScrapeError};
use crate::headers;
use prospector_core::{AuthConfig, AuthMode};
use prospector_session::SessionStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

#[derive(Debug, Default)]
struct AuthSlot {
    authenticated: bool,
    generation: u64,
}

/// Obtains and refreshes the authenticated session.
#[derive(Debug)]
pub struct AuthCoordinator {
    http: reqwest::Client,
    base_url: Url,
    user_agent: String,
    config: AuthConfig,
    session: Arc<SessionStore>,
    state: Mutex<AuthSlot>,
}

impl AuthCoordinator {
    /// Create a coordinator over an existing HTTP client and session store.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        base_url: Url,
        user_agent: String,
        config: AuthConfig,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            http,
            base_url,
            user_agent,
            config,
            session,
            state: Mutex::new(AuthSlot::default()),
        }
    }

    /// Ensure a live authenticated session, logging in when necessary.
    ///
    /// Returns the session generation the caller observed; pass it to
    /// [`reauthenticate`](Self::reauthenticate) if the request is later
    /// rejected, so an already-refreshed session is not refreshed twice.
    pub async fn ensure_authenticated(&self) -> Result<u64> {
        let mut slot = self.state.lock().await;
        if slot.authenticated {
            return Ok(slot.generation);
        }
        self.login().await?;
        slot.authenticated = true;
        slot.generation += 1;
        Ok(slot.generation)
    }

    /// Force a fresh login after the upstream rejected a request.
    ///
    /// `seen_generation` is the value returned by
    /// [`ensure_authenticated`](Self::ensure_authenticated) for the rejected
    /// request. When the current generation is newer, another caller already
    /// re-logged-in and the forced login is skipped.
    pub async fn reauthenticate(&self, seen_generation: u64) -> Result<u64> {
        let mut slot = self.state.lock().await;
        if slot.authenticated && slot.generation > seen_generation {
            tracing::debug!(
                generation = slot.generation,
                "session already refreshed by a concurrent caller"
            );
            return Ok(slot.generation);
        }
        slot.authenticated = false;
        self.login().await?;
        slot.authenticated = true;
        slot.generation += 1;
        Ok(slot.generation)
    }

    /// POST the credentials to the login endpoint and absorb the session
    /// cookies it issues.
    async fn login(&self) -> Result<()> {
        let url = self
            .base_url
            .join(&self.config.login_path)
            .map_err(|e| ScrapeError::Authentication {
                status: None,
                message: format!("invalid login path {:?}: {e}", self.config.login_path),
            })?;

        let body = build_login_body(&self.config);
        let builder = self.http.post(url.clone());
        let builder = headers::apply(
            builder,
            &self.user_agent,
            &self.base_url,
            &self.session,
            &url,
        )
        .await;
        let builder = match self.config.mode {
            AuthMode::Json => builder.json(&body),
            AuthMode::Form => builder.form(&body),
        };

        tracing::debug!(path = %self.config.login_path, mode = ?self.config.mode, "logging in");
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Authentication {
                status: Some(status.as_u16()),
                message: format!("login rejected with status {}", status.as_u16()),
            });
        }

        let set_cookies = headers::set_cookie_values(&response);
        self.session
            .absorb_set_cookie_headers(&set_cookies, &url)
            .await?;

        tracing::debug!(cookies = set_cookies.len(), "login succeeded");
        Ok(())
    }
}

/// Merge the credential fields with the configured static extras.
fn build_login_body(config: &AuthConfig) -> HashMap<String, String> {
    let mut body: HashMap<String, String> = config.additional_fields.clone();
    body.insert(config.username_field.clone(), config.username.clone());
    body.insert(config.password_field.clone(), config.password.clone());
    body
}
