//! Minimal cookie model for the scraping session.
//!
//! This is deliberately a small subset of RFC 6265: enough to round-trip
//! the session cookies the upstream API issues (name/value, `Domain`,
//! `Path`, `Secure`, `HttpOnly`, `Max-Age`/`Expires`). No public-suffix
//! checks; the jar belongs to a single trusted client, not a browser.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A single stored cookie, scoped to a domain and path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie applies to (no leading dot)
    pub domain: String,
    /// Path prefix the cookie applies to
    pub path: String,
    /// Only send over HTTPS
    pub secure: bool,
    /// Not exposed to scripts (informational for this client)
    pub http_only: bool,
    /// Absolute expiry; `None` means a session cookie
    pub expires_at: Option<DateTime<Utc>>,
}

impl Cookie {
    /// Parse a `Set-Cookie` header value in the context of the request URL.
    ///
    /// Returns `None` for headers without a `name=value` pair. Unknown
    /// attributes are ignored. `Max-Age` takes precedence over `Expires`.
    #[must_use]
    pub fn parse_set_cookie(header: &str, request_url: &Url) -> Option<Self> {
        let mut parts = header.split(';');

        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self {
            name: name.to_string(),
            value: value.trim().to_string(),
            domain: request_url.host_str().unwrap_or_default().to_string(),
            path: "/".to_string(),
            secure: false,
            http_only: false,
            expires_at: None,
        };

        let mut saw_max_age = false;
        for attr in parts {
            let attr = attr.trim();
            let (key, val) = match attr.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (attr, ""),
            };
            match key.to_ascii_lowercase().as_str() {
                "domain" => {
                    let domain = val.trim_start_matches('.');
                    if !domain.is_empty() {
                        cookie.domain = domain.to_ascii_lowercase();
                    }
                }
                "path" => {
                    if val.starts_with('/') {
                        cookie.path = val.to_string();
                    }
                }
                "secure" => cookie.secure = true,
                "httponly" => cookie.http_only = true,
                "max-age" => {
                    if let Ok(secs) = val.parse::<i64>() {
                        saw_max_age = true;
                        cookie.expires_at = Some(Utc::now() + chrono::Duration::seconds(secs));
                    }
                }
                "expires" => {
                    if !saw_max_age {
                        cookie.expires_at = parse_expires(val);
                    }
                }
                _ => {}
            }
        }

        Some(cookie)
    }

    /// Whether the cookie has expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Whether this cookie should be sent with a request to `url`.
    #[must_use]
    pub fn matches(&self, url: &Url) -> bool {
        if self.is_expired(Utc::now()) {
            return false;
        }
        if self.secure && url.scheme() != "https" {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        if !domain_matches(host, &self.domain) {
            return false;
        }

        path_matches(url.path(), &self.path)
    }

    /// Key identifying a cookie slot in the jar: same name, domain, and
    /// path replace each other.
    #[must_use]
    pub fn slot(&self) -> (&str, &str, &str) {
        (&self.name, &self.domain, &self.path)
    }
}

/// Host matches when identical to the cookie domain or a subdomain of it.
fn domain_matches(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == domain || host.strip_suffix(domain).is_some_and(|p| p.ends_with('.'))
}

/// Request path matches when the cookie path is a prefix on a `/` boundary.
fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    if cookie_path == "/" || request_path == cookie_path {
        return true;
    }
    request_path
        .strip_prefix(cookie_path)
        .is_some_and(|rest| cookie_path.ends_with('/') || rest.starts_with('/'))
}

/// Best-effort parse of an `Expires` attribute (RFC 2822 / RFC 1123 style).
fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
