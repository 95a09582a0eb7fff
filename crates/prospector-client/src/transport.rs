//! Rate-limited, retrying HTTP transport.
//!
//! Every call takes one admission from the [`AdmissionGate`], then runs an
//! iterative retry loop with exponential backoff. Retries of an admitted
//! call deliberately do not pass through the gate again: the admission
//! covers the logical call, not each attempt.
//!
//! Set-Cookie headers are absorbed into the session store on every
//! response, whatever its status. A 401/403 on an authenticated client
//! triggers one forced re-login and one immediate re-execution; a second
//! rejection of the same call surfaces as a status error without burning
//! the retry budget.

use crate::auth::AuthCoordinator;
use crate::error::{Result, ScrapeError};
use crate::headers;
use crate::limiter::AdmissionGate;
use prospector_core::RetryPolicy;
use prospector_session::SessionStore;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Outcome of one attempt, split by whether the retry loop may continue.
enum AttemptError {
    /// Retry with backoff while budget remains
    Retryable(ScrapeError),
    /// Surface immediately
    Fatal(ScrapeError),
}

/// HTTP transport for the upstream API.
#[derive(Debug)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
    user_agent: String,
    session: Arc<SessionStore>,
    auth: Option<Arc<AuthCoordinator>>,
    gate: AdmissionGate,
    retry: RetryPolicy,
}

impl Transport {
    /// Create a transport over pre-wired collaborators.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        base_url: Url,
        user_agent: String,
        session: Arc<SessionStore>,
        auth: Option<Arc<AuthCoordinator>>,
        gate: AdmissionGate,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http,
            base_url,
            user_agent,
            session,
            auth,
            gate,
            retry,
        }
    }

    /// The session store this transport writes cookies through.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// GET `path` and parse the JSON response body.
    pub async fn get(&self, path: &str, cancel: &CancellationToken) -> Result<Value> {
        self.request(Method::GET, path, None, cancel).await
    }

    /// POST `body` as JSON to `path` and parse the JSON response body.
    pub async fn post(&self, path: &str, body: &Value, cancel: &CancellationToken) -> Result<Value> {
        self.request(Method::POST, path, Some(body), cancel).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        self.gate.admit().await;

        let mut attempt: u32 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(ScrapeError::Cancelled);
            }

            match self.execute(&method, path, body, cancel).await {
                Ok(value) => return Ok(value),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retryable(e)) => {
                    if attempt >= self.retry.max_retries {
                        return Err(ScrapeError::ExhaustedRetries {
                            attempts: attempt + 1,
                            source: Box::new(e),
                        });
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        path,
                        attempt = attempt + 1,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "request failed, backing off"
                    );
                    tokio::select! {
                        () = cancel.cancelled() => return Err(ScrapeError::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// One execution of the logical call, including the single forced
    /// re-authentication retry on 401/403.
    async fn execute(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        cancel: &CancellationToken,
    ) -> std::result::Result<Value, AttemptError> {
        let url = self.base_url.join(path).map_err(|e| {
            AttemptError::Fatal(ScrapeError::Config(
                prospector_core::ConfigError::InvalidValue {
                    field: "endpoint path",
                    reason: format!("{path:?}: {e}"),
                },
            ))
        })?;

        let mut auth_retried = false;
        loop {
            let seen_generation = match &self.auth {
                Some(auth) => Some(
                    auth.ensure_authenticated()
                        .await
                        .map_err(AttemptError::Retryable)?,
                ),
                None => None,
            };

            let mut builder = self.http.request(method.clone(), url.clone());
            builder = headers::apply(
                builder,
                &self.user_agent,
                &self.base_url,
                &self.session,
                &url,
            )
            .await;
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let response = tokio::select! {
                () = cancel.cancelled() => return Err(AttemptError::Fatal(ScrapeError::Cancelled)),
                result = builder.send() => {
                    result.map_err(|e| AttemptError::Retryable(e.into()))?
                }
            };

            // Cookie mutations are a side effect of every response.
            let set_cookies = headers::set_cookie_values(&response);
            self.session
                .absorb_set_cookie_headers(&set_cookies, &url)
                .await
                .map_err(|e| AttemptError::Retryable(e.into()))?;

            let status = response.status();
            if let (Some(auth), true) = (&self.auth, status.as_u16() == 401 || status.as_u16() == 403)
            {
                let rejected = ScrapeError::Status {
                    status: status.as_u16(),
                    path: path.to_string(),
                };
                if auth_retried {
                    tracing::warn!(path, status = status.as_u16(), "rejected again after re-login");
                    return Err(AttemptError::Fatal(rejected));
                }
                tracing::warn!(path, status = status.as_u16(), "session rejected, re-authenticating");
                auth.reauthenticate(seen_generation.unwrap_or(0))
                    .await
                    .map_err(AttemptError::Retryable)?;
                auth_retried = true;
                continue;
            }

            if !status.is_success() {
                return Err(AttemptError::Retryable(ScrapeError::Status {
                    status: status.as_u16(),
                    path: path.to_string(),
                }));
            }

            return response.json::<Value>().await.map_err(|e| {
                AttemptError::Retryable(ScrapeError::Decode {
                    path: path.to_string(),
                    message: e.to_string(),
                })
            });
        }
    }
}
