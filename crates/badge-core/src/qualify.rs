//! # URL Qualification
//!
//! Badge data stores application-relative paths such as
//! `data/badges/example/badge.png`. Assertions are read by third-party
//! viewers, so those paths must be turned into root-relative
//! (`/issuer/data/...`) or absolute (`https://host/issuer/data/...`) URLs.
//!
//! [`UrlContext`] carries the two values that qualification needs for one
//! request: the origin (scheme, host and a non-default port) and the path
//! under which the application is mounted. It is constructed explicitly
//! per request and passed down, never cached globally.

use url::Url;

use crate::error::BadgeError;

/// Request-scoped origin and application root prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlContext {
    /// Scheme, host and non-default port, e.g. `https://badges.example.com`.
    origin: String,
    /// Root-relative mount path without trailing slash, e.g. `/issuer`.
    /// Empty when the application is mounted at `/`.
    root_prefix: String,
}

impl UrlContext {
    /// Build a context from an already-serialized origin and a root prefix.
    ///
    /// The origin loses any trailing slash; the prefix gains a leading slash
    /// and loses trailing ones, so `"issuer/"` becomes `"/issuer"` and `"/"`
    /// becomes `""`.
    pub fn new(origin: impl Into<String>, root_prefix: &str) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self {
            origin,
            root_prefix: normalize_root_prefix(root_prefix),
        }
    }

    /// Build a context from a public base URL such as `https://example.com:8443`.
    ///
    /// Default ports (80 for `http`, 443 for `https`) are omitted from the
    /// origin. Any path component of `base` is ignored; the root prefix is
    /// given separately.
    pub fn from_url(base: &Url, root_prefix: &str) -> Result<Self, BadgeError> {
        if base.host_str().is_none() {
            return Err(BadgeError::Validation(format!(
                "public origin has no host: {base}"
            )));
        }
        Ok(Self::new(base.origin().ascii_serialization(), root_prefix))
    }

    /// Build a context from a request scheme and `Host` header value.
    pub fn from_host(scheme: &str, host: &str, root_prefix: &str) -> Result<Self, BadgeError> {
        let host = host.trim();
        if host.is_empty() || host.contains(['/', '?', '#', '@', ' ']) {
            return Err(BadgeError::Validation(format!(
                "invalid host header: {host:?}"
            )));
        }
        let base = Url::parse(&format!("{scheme}://{host}"))
            .map_err(|e| BadgeError::Validation(format!("invalid origin {scheme}://{host}: {e}")))?;
        Self::from_url(&base, root_prefix)
    }

    /// The origin, e.g. `http://localhost:8080`.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The application root prefix, e.g. `/issuer`, or `""`.
    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    /// Qualify an optional URL.
    ///
    /// - `None` passes through unchanged.
    /// - URLs starting with `http:` or `https:` are already absolute.
    /// - `include_domain` implies `include_root_prefix`.
    /// - A URL starting with `/`, or any URL when no prefix is requested, is
    ///   used as is; otherwise it becomes `<root_prefix>/<url>`.
    /// - With `include_domain`, the origin is prepended with exactly one
    ///   `/` between origin and path.
    pub fn qualify(
        &self,
        url: Option<&str>,
        include_root_prefix: bool,
        include_domain: bool,
    ) -> Option<String> {
        url.map(|u| self.qualify_str(u, include_root_prefix, include_domain))
    }

    /// Qualify a URL that is known to be present. See [`UrlContext::qualify`].
    pub fn qualify_str(&self, url: &str, include_root_prefix: bool, include_domain: bool) -> String {
        if url.starts_with("http:") || url.starts_with("https:") {
            return url.to_string();
        }

        let include_root_prefix = include_root_prefix || include_domain;
        let mut qualified = if url.starts_with('/') || !include_root_prefix {
            url.to_string()
        } else {
            format!("{}/{url}", self.root_prefix)
        };

        if include_domain {
            if !qualified.starts_with('/') {
                qualified.insert(0, '/');
            }
            qualified.insert_str(0, &self.origin);
        }

        qualified
    }
}

fn normalize_root_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
