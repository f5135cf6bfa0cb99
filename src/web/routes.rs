//! HTTP route handlers for the tracker API.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::accounts::types::{NewTransaction, Plan, Role, UserStatus};
use crate::bankroll::{calculator, stats};
use crate::bets::types::{BetUpdate, NewBet};
use crate::db::queries;
use crate::events::bus::now_ts;
use crate::feed::assemble;

use super::server::AppState;
use super::viewer::{resolve_admin, resolve_viewer};
use super::ApiError;

/// Build all API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/bets", get(bets_list).post(bets_create).delete(bets_clear))
        .route("/api/bets/:id", put(bets_update).delete(bets_delete))
        .route("/api/stats", get(stats_overview))
        .route("/api/stats/series", get(stats_series))
        .route("/api/feed", get(feed))
        .route("/api/settings", get(settings_get).put(settings_put))
        .route("/api/session", post(session_open).delete(session_close))
        .route("/api/notifications", get(notifications))
        .route("/api/notifications/permission", post(notifications_permission))
        .route("/api/banners", get(banners_list))
        .route("/api/admin/stats", get(admin_stats))
        .route("/api/admin/users", get(admin_users).post(admin_upsert_user))
        .route("/api/admin/users/:id", delete(admin_delete_user))
        .route("/api/admin/users/:id/plan", put(admin_update_plan))
        .route("/api/admin/transactions", get(admin_transactions).post(admin_record_transaction))
        .route("/api/admin/banners", post(admin_create_banner))
        .route("/api/admin/banners/:id", delete(admin_delete_banner))
}

/// GET /health — simple health check.
async fn health() -> &'static str {
    "ok"
}

/// GET /api/status — service status.
async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "running",
        "active_sessions": state.hub.session_count(),
        "bus_subscribers": state.bus.subscriber_count(),
    }))
}

// ── Bets ─────────────────────────────────────────────────────────

/// GET /api/bets — the requesting owner's bets, oldest first.
async fn bets_list(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    match state.ledger.list_for_owner(&viewer.user_id).await {
        Ok(bets) => Json(json!({ "bets": bets })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// POST /api/bets — create a bet for the requesting owner.
async fn bets_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<NewBet>,
) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    match state.ledger.create(&viewer.user_id, draft).await {
        Ok(bet) => Json(json!({ "bet": bet })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// PUT /api/bets/:id — partial update; owner only.
async fn bets_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(update): Json<BetUpdate>,
) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    let existing = match state.ledger.get(id).await {
        Ok(bet) => bet,
        Err(e) => return ApiError(e).into_response(),
    };
    if existing.owner_id != viewer.user_id && !viewer.is_admin() {
        return super::viewer::not_owner();
    }
    match state.ledger.update(id, update).await {
        Ok(bet) => Json(json!({ "bet": bet })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// DELETE /api/bets/:id — hard delete; owner or admin.
async fn bets_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    let existing = match state.ledger.get(id).await {
        Ok(bet) => bet,
        Err(e) => return ApiError(e).into_response(),
    };
    if existing.owner_id != viewer.user_id && !viewer.is_admin() {
        return super::viewer::not_owner();
    }
    match state.ledger.delete(id).await {
        Ok(()) => Json(json!({ "deleted": id })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// DELETE /api/bets — clear the requesting owner's history.
async fn bets_clear(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    match state.ledger.clear_history(&viewer.user_id).await {
        Ok(removed) => Json(json!({ "removed": removed })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

// ── Stats & settings ─────────────────────────────────────────────

async fn load_settings(
    state: &AppState,
    owner_id: &str,
) -> Result<calculator::BankrollSettings, ApiError> {
    let row = queries::get_settings(&state.db, owner_id)
        .await
        .map_err(crate::error::TrackerError::from)?;
    Ok(row
        .map(calculator::BankrollSettings::from)
        .unwrap_or_else(|| (&state.bankroll_defaults).into()))
}

/// GET /api/stats — headline rollup plus currency figures.
async fn stats_overview(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    let bets = match state.ledger.list_for_owner(&viewer.user_id).await {
        Ok(bets) => bets,
        Err(e) => return ApiError(e).into_response(),
    };
    let settings = match load_settings(&state, &viewer.user_id).await {
        Ok(s) => s,
        Err(e) => return e.into_response(),
    };

    let rollup = stats::summarize(&bets);
    let unit_value = match calculator::unit_value(&settings) {
        Ok(v) => v,
        Err(e) => return ApiError(e).into_response(),
    };
    let profit_money = match calculator::to_currency(rollup.total_profit_units, &settings) {
        Ok(v) => v,
        Err(e) => return ApiError(e).into_response(),
    };
    let bankroll_money = match calculator::current_bankroll(&settings, rollup.total_profit_units) {
        Ok(v) => v,
        Err(e) => return ApiError(e).into_response(),
    };

    Json(json!({
        "stats": rollup,
        "unit_value": unit_value,
        "profit_money": profit_money,
        "current_bankroll": bankroll_money,
        "goal": {
            "progress": calculator::goal_progress(rollup.total_profit_units, &settings),
            "met": calculator::goal_met(rollup.total_profit_units, &settings),
        },
    }))
    .into_response()
}

/// GET /api/stats/series — cumulative-profit chart points.
async fn stats_series(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    match state.ledger.list_for_owner(&viewer.user_id).await {
        Ok(bets) => Json(json!({ "series": stats::profit_series(&bets) })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/feed — the shared feed, gate-filtered for the viewer.
async fn feed(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    match state.ledger.list_feed().await {
        Ok(bets) => {
            let items = assemble::assemble(&bets, &viewer);
            Json(json!({ "feed": items })).into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/settings — the owner's bankroll settings (or the defaults).
async fn settings_get(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    match load_settings(&state, &viewer.user_id).await {
        Ok(settings) => Json(json!({ "settings": settings })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PUT /api/settings — replace the owner's bankroll settings.
async fn settings_put(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(settings): Json<calculator::BankrollSettings>,
) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    // Reject configurations with an undefined unit value up front
    if let Err(e) = calculator::unit_value(&settings) {
        return ApiError(e).into_response();
    }
    match queries::upsert_settings(
        &state.db,
        &viewer.user_id,
        settings.start_bankroll,
        settings.unit_divisor,
        settings.profit_goal,
    )
    .await
    {
        Ok(()) => Json(json!({ "settings": settings })).into_response(),
        Err(e) => ApiError(crate::error::TrackerError::from(e)).into_response(),
    }
}

// ── Sessions & notifications ─────────────────────────────────────

/// POST /api/session — open a notification session for the viewer.
async fn session_open(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    let _ = state.directory.touch_login(&viewer.user_id).await;
    state.hub.register(viewer);
    Json(json!({ "active_sessions": state.hub.session_count() })).into_response()
}

/// DELETE /api/session — close the viewer's notification session.
async fn session_close(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    let closed = state.hub.remove(&viewer.user_id);
    Json(json!({ "closed": closed })).into_response()
}

/// GET /api/notifications — drain queued toasts and report celebration state.
async fn notifications(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    match state.hub.get(&viewer.user_id) {
        Some(center) => Json(json!({
            "toasts": center.drain_toasts(),
            "celebrating": center.celebrating(),
        }))
        .into_response(),
        None => Json(json!({ "toasts": [], "celebrating": false })).into_response(),
    }
}

/// POST /api/notifications/permission — request the system channel.
async fn notifications_permission(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let viewer = match resolve_viewer(&state, &headers).await {
        Ok(v) => v,
        Err(r) => return r,
    };
    match state.hub.get(&viewer.user_id) {
        Some(center) => {
            let permission = center.request_system_permission();
            Json(json!({ "permission": permission.as_str() })).into_response()
        }
        None => super::viewer::no_session(),
    }
}

// ── Banners ──────────────────────────────────────────────────────

/// GET /api/banners — active banners, newest first.
async fn banners_list(State(state): State<AppState>) -> Response {
    match queries::list_active_banners(&state.db).await {
        Ok(rows) => Json(json!({ "banners": rows })).into_response(),
        Err(e) => ApiError(crate::error::TrackerError::from(e)).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct NewBanner {
    title: String,
    media_url: String,
    media_type: String,
    link_url: Option<String>,
}

/// POST /api/admin/banners — publish a banner.
async fn admin_create_banner(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(banner): Json<NewBanner>,
) -> Response {
    if let Err(r) = resolve_admin(&state, &headers).await {
        return r;
    }
    match queries::insert_banner(
        &state.db,
        &banner.title,
        &banner.media_url,
        &banner.media_type,
        banner.link_url.as_deref(),
        now_ts(),
    )
    .await
    {
        Ok(row) => Json(json!({ "banner": row })).into_response(),
        Err(e) => ApiError(crate::error::TrackerError::from(e)).into_response(),
    }
}

/// DELETE /api/admin/banners/:id — retire a banner.
async fn admin_delete_banner(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(r) = resolve_admin(&state, &headers).await {
        return r;
    }
    match queries::delete_banner(&state.db, id).await {
        Ok(rows) => Json(json!({ "deleted": rows > 0 })).into_response(),
        Err(e) => ApiError(crate::error::TrackerError::from(e)).into_response(),
    }
}

// ── Admin ────────────────────────────────────────────────────────

/// GET /api/admin/stats — membership and revenue rollup.
async fn admin_stats(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(r) = resolve_admin(&state, &headers).await {
        return r;
    }
    match state.directory.admin_stats().await {
        Ok(stats) => Json(json!({ "stats": stats })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/admin/users — all users (expiry sweep applied).
async fn admin_users(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(r) = resolve_admin(&state, &headers).await {
        return r;
    }
    match state.directory.list_users().await {
        Ok(users) => Json(json!({ "users": users })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct UpsertUser {
    id: String,
    email: String,
    name: String,
    #[serde(default = "default_role")]
    role: Role,
    #[serde(default = "default_plan")]
    plan: Plan,
    #[serde(default = "default_status")]
    status: UserStatus,
}

fn default_role() -> Role {
    Role::User
}
fn default_plan() -> Plan {
    Plan::Free
}
fn default_status() -> UserStatus {
    UserStatus::Active
}

/// POST /api/admin/users — create or refresh an account record.
async fn admin_upsert_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(user): Json<UpsertUser>,
) -> Response {
    if let Err(r) = resolve_admin(&state, &headers).await {
        return r;
    }
    match state
        .directory
        .upsert_user(&user.id, &user.email, &user.name, user.role, user.plan, user.status)
        .await
    {
        Ok(user) => Json(json!({ "user": user })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct PlanChange {
    plan: Plan,
    #[serde(default = "default_status")]
    status: UserStatus,
}

/// PUT /api/admin/users/:id/plan — change a user's plan.
async fn admin_update_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(change): Json<PlanChange>,
) -> Response {
    if let Err(r) = resolve_admin(&state, &headers).await {
        return r;
    }
    match state.directory.update_plan(&id, change.plan, change.status).await {
        Ok(user) => Json(json!({ "user": user })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// DELETE /api/admin/users/:id — remove an account.
async fn admin_delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(r) = resolve_admin(&state, &headers).await {
        return r;
    }
    match state.directory.delete_user(&id).await {
        Ok(()) => Json(json!({ "deleted": id })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/admin/transactions — purchase history, newest first.
async fn admin_transactions(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(r) = resolve_admin(&state, &headers).await {
        return r;
    }
    match state.directory.list_transactions().await {
        Ok(rows) => Json(json!({ "transactions": rows })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// POST /api/admin/transactions — record a purchase (approved ones upgrade).
async fn admin_record_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(tx): Json<NewTransaction>,
) -> Response {
    if let Err(r) = resolve_admin(&state, &headers).await {
        return r;
    }
    match state.directory.record_transaction(tx).await {
        Ok(()) => Json(json!({ "recorded": true })).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
