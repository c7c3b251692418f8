//! # Hosted Assertions
//!
//! Serves persisted assertion documents at the URL the issue endpoint
//! returns. Backpacks fetch these cross-origin, so the route allows any
//! origin for `GET`.

use axum::extract::{Path, State};
use axum::http::{header, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use badge_core::IssuedId;
use tower_http::cors::{Any, CorsLayer};

use crate::error::AppError;
use crate::state::AppState;

const JSON_SUFFIX: &str = ".json";

/// Build the assertion hosting router.
pub fn router() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);
    Router::new()
        .route("/data/assertions/{file}", get(get_assertion))
        .layer(cors)
}

/// GET /data/assertions/{file}: Fetch an issued assertion document.
#[utoipa::path(
    get,
    path = "/data/assertions/{file}",
    params(("file" = String, Path, description = "Issued id followed by `.json`")),
    responses(
        (status = 200, description = "Assertion document", content_type = "application/json"),
        (status = 404, description = "No such assertion", body = crate::error::ErrorBody),
    ),
    tag = "assertions"
)]
pub(crate) async fn get_assertion(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = file
        .strip_suffix(JSON_SUFFIX)
        .ok_or_else(|| AppError::NotFound(format!("assertion {file}")))?;
    let id = IssuedId::new(id);

    let issuer = state.issuer.clone();
    let lookup = id.clone();
    let bytes = tokio::task::spawn_blocking(move || issuer.store().load(&lookup))
        .await??
        .ok_or_else(|| AppError::NotFound(format!("assertion {id}")))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], bytes))
}
