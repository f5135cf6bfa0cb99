//! Viewer resolution — maps a trusted identity header onto a `Viewer`.
//!
//! Authentication itself happens upstream (identity collaborator); this
//! module only translates "who the proxy says you are" into role/plan.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::accounts::types::Viewer;

use super::server::AppState;

/// Header the identity layer sets on every authenticated request.
pub const USER_HEADER: &str = "x-user-id";

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "admin role required" })),
    )
        .into_response()
}

/// 403 for writes against a record the viewer does not own.
pub fn not_owner() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "not the owner of this record" })),
    )
        .into_response()
}

/// 404 for notification calls without an open session.
pub fn no_session() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "no active session" })),
    )
        .into_response()
}

/// Resolve the requesting viewer or fail with 401.
pub async fn resolve_viewer(state: &AppState, headers: &HeaderMap) -> Result<Viewer, Response> {
    let user_id = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| unauthorized("missing identity header"))?;

    let user = state
        .directory
        .get_user(user_id)
        .await
        .map_err(|e| super::ApiError(e).into_response())?
        .ok_or_else(|| unauthorized("unknown identity"))?;

    Ok(Viewer::from(&user))
}

/// Resolve the viewer and require the admin role, or fail with 401/403.
pub async fn resolve_admin(state: &AppState, headers: &HeaderMap) -> Result<Viewer, Response> {
    let viewer = resolve_viewer(state, headers).await?;
    if !viewer.is_admin() {
        return Err(forbidden());
    }
    Ok(viewer)
}
