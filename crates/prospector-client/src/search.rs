//! Paginated search orchestration with optional profile enrichment.
//!
//! Pages are strictly sequential: each next payload is built from the
//! previous response's cursor fields. Enrichment within a page fans out in
//! parallel (each call still passes the transport's admission gate) and
//! preserves item order.

use crate::error::{Result, ScrapeError};
use crate::payload::{
    ProfileEnvelope, SearchEnvelope, SearchOptions, SearchPayload, SearchResult,
};
use crate::transport::Transport;
use futures::future::join_all;
use prospector_core::EndpointPaths;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Item field carrying the stable key used for profile lookups.
const PROFILE_CODE_FIELD: &str = "profile_code";

/// Item field the enrichment detail is attached under.
const ENRICHED_FIELD: &str = "enriched";

/// Drives multi-page searches against the transport.
#[derive(Debug)]
pub struct SearchOrchestrator {
    transport: Arc<Transport>,
    endpoints: EndpointPaths,
}

impl SearchOrchestrator {
    /// Create an orchestrator over a transport.
    #[must_use]
    pub fn new(transport: Arc<Transport>, endpoints: EndpointPaths) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Run a paginated search, accumulating up to the configured bounds.
    ///
    /// Stops at the first empty page, at `max_pages`, or once `max_items`
    /// items are accumulated, whichever comes first. Result metadata is
    /// sourced from the last response received.
    pub async fn search(
        &self,
        payload: SearchPayload,
        options: SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<SearchResult> {
        let mut payload = payload;
        if let Some(page_size) = options.page_size {
            payload.page_size = Some(page_size);
        }
        let max_pages = options.max_pages.unwrap_or(u32::MAX);
        let max_items = options.max_items.unwrap_or(usize::MAX);

        let mut result = SearchResult {
            items: Vec::new(),
            pages_fetched: 0,
            total: 0,
            total_relation: Default::default(),
            query_id: None,
            last_scroll_token: None,
        };

        while result.pages_fetched < max_pages && result.items.len() < max_items {
            if cancel.is_cancelled() {
                return Err(ScrapeError::Cancelled);
            }

            let body = serde_json::to_value(&payload).map_err(|e| ScrapeError::Decode {
                path: self.endpoints.search.clone(),
                message: format!("failed to serialize search payload: {e}"),
            })?;
            let raw = self
                .transport
                .post(&self.endpoints.search, &body, cancel)
                .await?;
            let envelope: SearchEnvelope =
                serde_json::from_value(raw).map_err(|e| ScrapeError::Decode {
                    path: self.endpoints.search.clone(),
                    message: e.to_string(),
                })?;
            let mut page = envelope.body;

            result.total = page.total;
            result.total_relation = page.total_relation;
            result.query_id = page.query_id.clone();
            result.last_scroll_token = page.scroll_token.clone();

            if page.data.is_empty() {
                tracing::debug!(
                    pages_fetched = result.pages_fetched,
                    "empty page, stopping pagination"
                );
                break;
            }

            let headroom = max_items - result.items.len();
            let mut batch = std::mem::take(&mut page.data);
            batch.truncate(headroom);

            if options.enrich_profiles {
                batch = self.enrich_items(batch, cancel).await;
            }

            tracing::debug!(
                page = result.pages_fetched + 1,
                items = batch.len(),
                total = result.total,
                "fetched search page"
            );
            result.items.extend(batch);
            result.pages_fetched += 1;

            if result.items.len() >= max_items {
                break;
            }
            payload = payload.advance(&page);
        }

        Ok(result)
    }

    /// Fetch the profile detail for a profile code.
    ///
    /// Returns `Ok(None)` when the upstream answers without a detail body.
    pub async fn profile(
        &self,
        profile_code: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>> {
        let encoded: String =
            url::form_urlencoded::byte_serialize(profile_code.as_bytes()).collect();
        let path = format!("{}?profile_code={}", self.endpoints.profile, encoded);
        let raw = self.transport.get(&path, cancel).await?;
        let envelope: ProfileEnvelope =
            serde_json::from_value(raw).map_err(|e| ScrapeError::Decode {
                path: self.endpoints.profile.clone(),
                message: e.to_string(),
            })?;
        Ok(envelope.data.filter(|d| !d.is_null()))
    }

    /// Enrich a batch of items in parallel, preserving input order.
    ///
    /// Enrichment never fails the search: items without a profile code or
    /// with a failed lookup pass through unchanged.
    async fn enrich_items(&self, items: Vec<Value>, cancel: &CancellationToken) -> Vec<Value> {
        join_all(
            items
                .into_iter()
                .map(|item| self.enrich_item(item, cancel)),
        )
        .await
    }

    async fn enrich_item(&self, mut item: Value, cancel: &CancellationToken) -> Value {
        let Some(profile_code) = item
            .get(PROFILE_CODE_FIELD)
            .and_then(Value::as_str)
            .map(String::from)
        else {
            tracing::debug!("item has no profile_code, skipping enrichment");
            return item;
        };

        match self.profile(&profile_code, cancel).await {
            Ok(Some(detail)) => {
                if let Some(object) = item.as_object_mut() {
                    object.insert(ENRICHED_FIELD.to_string(), detail);
                }
            }
            Ok(None) => {
                tracing::warn!(profile_code, "empty profile response, item left unenriched");
            }
            Err(e) => {
                tracing::warn!(
                    profile_code,
                    error = %e,
                    "profile enrichment failed, item left unenriched"
                );
            }
        }
        item
    }
}
