//! # Application State
//!
//! Shared across all handlers via Axum's `State` extractor. Everything in
//! it is immutable after startup apart from the catalog's manifest cache,
//! which guards itself.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use badge_assertion::{AssertionStore, Issuer};
use badge_catalog::BadgeCatalog;
use badge_core::{IssuerConfig, UrlContext};

use crate::error::AppError;

/// Header set by reverse proxies that terminate TLS.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<IssuerConfig>,
    pub catalog: Arc<BadgeCatalog>,
    pub issuer: Arc<Issuer>,
}

impl AppState {
    /// Build the catalog and issuer for `config`.
    pub fn new(config: IssuerConfig) -> Self {
        let layout = config.layout();
        let catalog = Arc::new(BadgeCatalog::new(&layout));
        let issuer = Issuer::new(catalog.clone(), AssertionStore::from_layout(&layout));
        Self::with_issuer(config, catalog, issuer)
    }

    /// Assemble state from prebuilt parts.
    pub fn with_issuer(config: IssuerConfig, catalog: Arc<BadgeCatalog>, issuer: Issuer) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            issuer: Arc::new(issuer),
        }
    }

    /// The URL context for a request.
    ///
    /// A configured public origin wins; otherwise the origin is rebuilt
    /// from the `Host` header and `X-Forwarded-Proto` (default `http`).
    pub fn url_context(&self, headers: &HeaderMap) -> Result<UrlContext, AppError> {
        let prefix = &self.config.root_prefix;
        if let Some(origin) = &self.config.public_origin {
            return UrlContext::from_url(origin, prefix)
                .map_err(|e| AppError::Internal(e.to_string()));
        }

        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::BadRequest("missing Host header".into()))?;
        let scheme = match headers.get(FORWARDED_PROTO).and_then(|v| v.to_str().ok()) {
            Some(proto) if proto.trim().eq_ignore_ascii_case("https") => "https",
            _ => "http",
        };
        UrlContext::from_host(scheme, host, prefix).map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn state(origin: Option<&str>) -> AppState {
        AppState::new(IssuerConfig {
            root_prefix: "/issuer".into(),
            public_origin: origin.map(|o| o.parse().unwrap()),
            ..IssuerConfig::default()
        })
    }

    #[test]
    fn configured_origin_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("evil.example"));
        let ctx = state(Some("https://badges.example.com"))
            .url_context(&headers)
            .unwrap();
        assert_eq!(ctx.origin(), "https://badges.example.com");
        assert_eq!(ctx.root_prefix(), "/issuer");
    }

    #[test]
    fn host_and_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:8080"));
        assert_eq!(
            state(None).url_context(&headers).unwrap().origin(),
            "http://localhost:8080"
        );

        headers.insert(FORWARDED_PROTO, HeaderValue::from_static("https"));
        headers.insert(header::HOST, HeaderValue::from_static("badges.example.com:443"));
        assert_eq!(
            state(None).url_context(&headers).unwrap().origin(),
            "https://badges.example.com"
        );
    }

    #[test]
    fn missing_host_is_a_bad_request() {
        let err = state(None).url_context(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
