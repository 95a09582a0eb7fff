//! Wire types for the prospect-search API.
//!
//! Field names mirror the upstream contract exactly: the search request
//! carries camel-free snake_case cursor fields, and responses arrive inside
//! a `{status, body}` envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request payload for the search endpoint.
///
/// `query` is the provider-specific query object and is never mutated;
/// pagination advances by overwriting only the cursor fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPayload {
    /// Provider-specific query object, passed through opaquely
    pub query: Value,
    /// Continuation token from the previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_token: Option<String>,
    /// Sort fields echoed from the previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_fields: Option<Vec<String>>,
    /// Last-sort values echoed from the previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_after: Option<Vec<String>>,
    /// Requested page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl SearchPayload {
    /// Create a payload for a fresh (first-page) search.
    #[must_use]
    pub fn new(query: Value) -> Self {
        Self {
            query,
            scroll_token: None,
            sort_fields: None,
            search_after: None,
            page_size: None,
        }
    }

    /// Set the requested page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Build the payload for the next page: same query, cursor fields
    /// overwritten from `page`.
    #[must_use]
    pub fn advance(&self, page: &SearchPage) -> Self {
        Self {
            query: self.query.clone(),
            scroll_token: page.scroll_token.clone(),
            sort_fields: page.sort_fields.clone(),
            search_after: page.last_sort.clone(),
            page_size: self.page_size,
        }
    }
}

/// Envelope every search response arrives in.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    /// Upstream status field, passed through untouched
    #[serde(default)]
    pub status: Option<Value>,
    /// The page itself
    pub body: SearchPage,
}

/// One page of search results.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchPage {
    /// Result items, provider-shaped JSON objects
    pub data: Vec<Value>,
    /// Total matching items reported by the provider
    pub total: u64,
    /// Whether `total` is exact or a lower bound
    pub total_relation: TotalRelation,
    /// Query identifier assigned by the provider
    pub query_id: Option<String>,
    /// Continuation token for the next page
    pub scroll_token: Option<String>,
    /// Sort fields to echo into the next request
    pub sort_fields: Option<Vec<String>>,
    /// Last-sort values to echo into the next request
    pub last_sort: Option<Vec<String>>,
    /// Whether the provider served `total` from cache
    pub cached_total: bool,
}

/// Relation of the reported total to the true count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalRelation {
    /// `total` is exact
    #[default]
    Eq,
    /// `total` is a lower bound
    Gte,
}

/// Envelope of the profile-detail response.
#[derive(Debug, Deserialize)]
pub struct ProfileEnvelope {
    /// Upstream status field, passed through untouched
    #[serde(default)]
    pub status: Option<Value>,
    /// Profile detail (`{profile, prospect, preview}`), opaque to us
    #[serde(default)]
    pub data: Option<Value>,
}

/// Aggregated outcome of a paginated search.
///
/// Metadata fields come from the last response received, not the first.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Accumulated items across pages, in upstream order
    pub items: Vec<Value>,
    /// Number of non-empty pages consumed
    pub pages_fetched: u32,
    /// Total reported by the last page
    pub total: u64,
    /// Relation of `total` to the true count
    pub total_relation: TotalRelation,
    /// Query identifier from the last page
    pub query_id: Option<String>,
    /// Continuation token from the last page
    pub last_scroll_token: Option<String>,
}

/// Options for a paginated search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Stop after this many pages (unbounded when `None`)
    pub max_pages: Option<u32>,
    /// Stop once this many items are accumulated (unbounded when `None`)
    pub max_items: Option<usize>,
    /// Override the payload's page size before the first request
    pub page_size: Option<u32>,
    /// Fetch per-item profile details and attach them as `enriched`
    pub enrich_profiles: bool,
}

impl SearchOptions {
    /// Limit the number of pages fetched.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Limit the number of items accumulated.
    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Override the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Enable per-item profile enrichment.
    #[must_use]
    pub fn with_enrichment(mut self) -> Self {
        self.enrich_profiles = true;
        self
    }
}
