//! # Catalog API
//!
//! Read access to the badge catalog and a refresh trigger that drops cached
//! template manifests so edits on disk are picked up without a restart.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use badge_core::BadgeSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Catalog entry: identifier and display name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntry {
    #[serde(rename = "badgeID")]
    pub badge_id: String,
    #[serde(rename = "badgeName")]
    pub badge_name: Option<String>,
}

/// Public view of a badge definition. Proof material is never included.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadgeSummaryResponse {
    #[serde(rename = "badgeID")]
    pub badge_id: String,
    pub badge_name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    #[serde(rename = "criteriaURL")]
    pub criteria_url: Option<String>,
    #[serde(rename = "issuerOriginURL")]
    pub issuer_origin_url: Option<String>,
    pub issuer_name: Option<String>,
    pub issuer_organization: Option<String>,
    pub issuer_email: Option<String>,
    /// Expiry as a Unix timestamp; `0` when the badge does not expire.
    pub expires_unix_time: i64,
}

impl From<BadgeSummary> for BadgeSummaryResponse {
    fn from(s: BadgeSummary) -> Self {
        Self {
            badge_id: s.badge_id,
            badge_name: s.badge_name,
            description: s.description,
            image_url: s.image_url,
            criteria_url: s.criteria_url,
            issuer_origin_url: s.issuer_origin_url,
            issuer_name: s.issuer_name,
            issuer_organization: s.issuer_organization,
            issuer_email: s.issuer_email,
            expires_unix_time: s.expires_unix_time,
        }
    }
}

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/catalog", get(list_catalog))
        .route("/v1/catalog/refresh", post(refresh_catalog))
        .route("/v1/badges", get(list_badges))
}

/// GET /v1/catalog: Identifier and name of every issuable badge.
#[utoipa::path(
    get,
    path = "/v1/catalog",
    responses(
        (status = 200, description = "Catalog entries", body = Vec<CatalogEntry>),
        (status = 500, description = "Catalog unreadable", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
pub(crate) async fn list_catalog(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    let catalog = state.catalog.clone();
    let names = tokio::task::spawn_blocking(move || catalog.list_badge_names()).await??;
    Ok(Json(
        names
            .into_iter()
            .map(|n| CatalogEntry {
                badge_id: n.badge_id.as_str().to_string(),
                badge_name: n.badge_name,
            })
            .collect(),
    ))
}

/// GET /v1/badges: Public summaries of every issuable badge.
#[utoipa::path(
    get,
    path = "/v1/badges",
    responses(
        (status = 200, description = "Badge summaries", body = Vec<BadgeSummaryResponse>),
        (status = 500, description = "Catalog unreadable", body = crate::error::ErrorBody),
    ),
    tag = "catalog"
)]
pub(crate) async fn list_badges(
    State(state): State<AppState>,
) -> Result<Json<Vec<BadgeSummaryResponse>>, AppError> {
    let catalog = state.catalog.clone();
    let badges = tokio::task::spawn_blocking(move || catalog.list_badges()).await??;
    Ok(Json(badges.into_iter().map(Into::into).collect()))
}

/// POST /v1/catalog/refresh: Drop cached template manifests.
#[utoipa::path(
    post,
    path = "/v1/catalog/refresh",
    responses(
        (status = 204, description = "Catalog cache cleared"),
    ),
    tag = "catalog"
)]
pub(crate) async fn refresh_catalog(State(state): State<AppState>) -> StatusCode {
    state.catalog.refresh();
    StatusCode::NO_CONTENT
}
