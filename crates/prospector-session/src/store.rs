//! Durable cookie session store.
//!
//! The jar lives in memory behind a write lock; every mutation is written
//! through to the backing JSON file before the call returns, so the on-disk
//! state always reflects the last successful mutation. A missing file is
//! valid empty state. The file assumes single-process ownership.

use crate::cookie::Cookie;
use crate::error::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use url::Url;

/// Cookie jar with write-through JSON persistence.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    jar: RwLock<Vec<Cookie>>,
}

impl SessionStore {
    /// Create a store backed by `path`. No I/O happens until
    /// [`load`](Self::load) or the first mutation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            jar: RwLock::new(Vec::new()),
        }
    }

    /// Path of the backing session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the jar from disk, replacing in-memory state.
    ///
    /// A missing file is success with an empty jar; any other I/O or parse
    /// error is surfaced.
    pub async fn load(&self) -> Result<()> {
        let mut jar = self.jar.write().await;
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let cookies: Vec<Cookie> = serde_json::from_slice(&bytes)?;
                tracing::debug!(
                    path = %self.path.display(),
                    cookies = cookies.len(),
                    "loaded session file"
                );
                *jar = cookies;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no session file, starting empty");
                jar.clear();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the current jar to disk, creating parent directories as
    /// needed. The whole file is rewritten.
    pub async fn save(&self) -> Result<()> {
        let jar = self.jar.read().await;
        self.persist(&jar).await
    }

    /// Cookie header value applicable to `url`, `name=value` pairs joined
    /// with `"; "`. Empty string when nothing matches.
    pub async fn cookie_string(&self, url: &Url) -> String {
        let jar = self.jar.read().await;
        jar.iter()
            .filter(|c| c.matches(url))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Parse `Set-Cookie` header values in the context of `url`, merge them
    /// into the jar, and persist. Expired cookies delete their slot.
    pub async fn absorb_set_cookie_headers(&self, headers: &[String], url: &Url) -> Result<()> {
        if headers.is_empty() {
            return Ok(());
        }

        let mut jar = self.jar.write().await;
        let now = Utc::now();
        for header in headers {
            let Some(cookie) = Cookie::parse_set_cookie(header, url) else {
                tracing::warn!(header = %header, "ignoring unparseable Set-Cookie header");
                continue;
            };
            jar.retain(|existing| existing.slot() != cookie.slot());
            if !cookie.is_expired(now) {
                jar.push(cookie);
            }
        }
        self.persist(&jar).await
    }

    /// Reset the jar to empty and persist the empty state.
    pub async fn clear(&self) -> Result<()> {
        let mut jar = self.jar.write().await;
        jar.clear();
        self.persist(&jar).await
    }

    /// Number of cookies currently in the jar.
    pub async fn len(&self) -> usize {
        self.jar.read().await.len()
    }

    /// Whether the jar is empty.
    pub async fn is_empty(&self) -> bool {
        self.jar.read().await.is_empty()
    }

    async fn persist(&self, jar: &[Cookie]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(jar)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}
