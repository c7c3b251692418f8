//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the issuer's HTTP surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Badge Issuer API",
        version = "0.1.0",
        description = "Issues Open Badges assertions for claimants who present valid proof, lists the badge catalog, and hosts issued assertions.",
        license(name = "GPL-3.0-or-later")
    ),
    paths(
        // Issue
        crate::routes::issue::issue_badge_get,
        crate::routes::issue::issue_badge_post,
        // Catalog
        crate::routes::catalog::list_catalog,
        crate::routes::catalog::list_badges,
        crate::routes::catalog::refresh_catalog,
        // Assertions
        crate::routes::assertions::get_assertion,
    ),
    components(schemas(
        crate::routes::issue::IssueParams,
        crate::routes::issue::IssueResponse,
        crate::routes::catalog::CatalogEntry,
        crate::routes::catalog::BadgeSummaryResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "issue", description = "Badge claims"),
        (name = "catalog", description = "Badge catalog"),
        (name = "assertions", description = "Hosted assertion documents"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/service/issue-badge",
            "/v1/catalog",
            "/v1/badges",
            "/v1/catalog/refresh",
            "/data/assertions/{file}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
