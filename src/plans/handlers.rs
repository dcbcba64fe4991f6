use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::{internal, ApiResult},
    plans::{dto::PlanPatch, repo::Plan},
    state::AppState,
};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plans/save-current", post(save_current))
        .route("/plans/current", get(current))
        .route("/plans", get(list))
}

#[instrument(skip(state, patch))]
pub async fn save_current(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(patch): Json<PlanPatch>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let (plan, created) = Plan::upsert_current(&state.db, user_id, &patch)
        .await
        .map_err(internal)?;

    info!(user_id = %user_id, plan_id = %plan.id, created, "current plan saved");
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(json!({ "success": true, "data": plan }))))
}

#[instrument(skip(state))]
pub async fn current(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let plan = Plan::current(&state.db, user_id).await.map_err(internal)?;
    Ok(Json(json!({ "success": true, "data": plan })))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let plans = Plan::list(&state.db, user_id).await.map_err(internal)?;
    Ok(Json(json!({ "success": true, "data": plans })))
}
