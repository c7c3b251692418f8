//! # badge-api: Axum HTTP Service for the Badge Issuer
//!
//! Course pages claim badges through the issue endpoint; backpacks fetch
//! the resulting assertion documents from the hosted assertions route.
//!
//! ## API Surface
//!
//! | Path                          | Module                    | Purpose                 |
//! |-------------------------------|---------------------------|-------------------------|
//! | `/service/issue-badge`        | [`routes::issue`]         | Claim a badge           |
//! | `/v1/catalog`, `/v1/badges`   | [`routes::catalog`]       | Catalog listing         |
//! | `/v1/catalog/refresh`         | [`routes::catalog`]       | Drop cached manifests   |
//! | `/data/assertions/{id}.json`  | [`routes::assertions`]    | Issued assertions       |
//! | `/health/*`                   | this module               | Probes                  |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → (CorsLayer on /data/assertions) → Handler
//! ```
//!
//! Filesystem work runs on the blocking pool; handlers never touch the
//! disk from the async executor.
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI 3.1 spec via utoipa derive macros at `/openapi.json`.

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::issue::router())
        .merge(routes::catalog::router())
        .merge(routes::assertions::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api).with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the application root is reachable.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let root = state.config.app_root.clone();
    let present = tokio::task::spawn_blocking(move || root.is_dir()).await?;
    if present {
        Ok("ready")
    } else {
        Err(AppError::Unavailable(format!(
            "application root {} is not a directory",
            state.config.app_root.display()
        )))
    }
}
