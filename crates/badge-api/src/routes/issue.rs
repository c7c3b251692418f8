//! # Issue Endpoint
//!
//! `GET|POST /service/issue-badge` with fields `email`, `badge`, `proof`
//! (and optional `evidence`), from the query string or a form body.
//!
//! The endpoint always answers 200 with a JSON object:
//!
//! - `{"assertion": "<absolute URL>"}` when the badge was issued;
//! - `{"debug": "<stage message>"}` on failure when debug mode is on;
//! - `{}` otherwise.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Form, Json, Router};
use badge_assertion::{IssueError, IssueRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::state::AppState;

/// Debug text when the request origin cannot be determined.
const BAD_ORIGIN_DEBUG: &str = "Cannot create badge assertion!";

/// Claim fields accepted by the issue endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct IssueParams {
    /// Claimant email address.
    pub email: Option<String>,
    /// Badge identifier.
    pub badge: Option<String>,
    /// Proof that the claimant earned the badge.
    pub proof: Option<String>,
    /// Recipient-specific evidence URL.
    pub evidence: Option<String>,
}

impl IssueParams {
    /// Fill fields missing here from `fallback`.
    fn or(self, fallback: IssueParams) -> IssueParams {
        IssueParams {
            email: self.email.or(fallback.email),
            badge: self.badge.or(fallback.badge),
            proof: self.proof.or(fallback.proof),
            evidence: self.evidence.or(fallback.evidence),
        }
    }
}

/// Result of an issue request.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct IssueResponse {
    /// Absolute URL of the issued assertion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion: Option<String>,
    /// Failure stage, only in debug mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

/// Build the issue router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/service/issue-badge",
        get(issue_badge_get).post(issue_badge_post),
    )
}

/// GET /service/issue-badge: Issue a badge from query parameters.
#[utoipa::path(
    get,
    path = "/service/issue-badge",
    params(IssueParams),
    responses(
        (status = 200, description = "Issue outcome; `assertion` present on success", body = IssueResponse),
    ),
    tag = "issue"
)]
pub(crate) async fn issue_badge_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<IssueParams>, QueryRejection>,
) -> Json<IssueResponse> {
    let params = query.map(|Query(p)| p).unwrap_or_default();
    run_issue(state, headers, params).await
}

/// POST /service/issue-badge: Issue a badge from a form body.
///
/// Fields absent from the body are taken from the query string.
#[utoipa::path(
    post,
    path = "/service/issue-badge",
    request_body(content = IssueParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Issue outcome; `assertion` present on success", body = IssueResponse),
    ),
    tag = "issue"
)]
pub(crate) async fn issue_badge_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<IssueParams>, QueryRejection>,
    form: Result<Form<IssueParams>, FormRejection>,
) -> Json<IssueResponse> {
    let query = query.map(|Query(p)| p).unwrap_or_default();
    let params = form.map(|Form(p)| p).unwrap_or_default().or(query);
    run_issue(state, headers, params).await
}

async fn run_issue(state: AppState, headers: HeaderMap, params: IssueParams) -> Json<IssueResponse> {
    let debug = state.config.debug;
    let failure = |message: &str| {
        Json(IssueResponse {
            assertion: None,
            debug: debug.then(|| message.to_string()),
        })
    };

    let ctx = match state.url_context(&headers) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::warn!(error = %e, "cannot determine request origin");
            return failure(BAD_ORIGIN_DEBUG);
        }
    };

    let request = IssueRequest {
        email: params.email,
        badge_id: params.badge,
        proof: params.proof,
        evidence_url: params.evidence,
    };
    let issuer = state.issuer.clone();
    let outcome = tokio::task::spawn_blocking(move || issuer.issue(&request, &ctx, true)).await;

    match outcome {
        Ok(Ok(issued)) => Json(IssueResponse {
            assertion: Some(issued.assertion_url),
            debug: None,
        }),
        Ok(Err(e)) => {
            log_failure(&e);
            failure(e.debug_message())
        }
        Err(e) => {
            tracing::error!(error = %e, "issue task failed");
            Json(IssueResponse::default())
        }
    }
}

fn log_failure(err: &IssueError) {
    match err {
        IssueError::CreateBadge(_) | IssueError::CreateAssertion(_) | IssueError::Save(_) => {
            tracing::error!(error = %err, kind = %err.kind(), "badge issuance failed");
        }
        _ => tracing::info!(error = %err, kind = %err.kind(), "badge claim rejected"),
    }
}
