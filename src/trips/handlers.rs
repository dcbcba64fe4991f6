use axum::{
    extract::{Host, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::{internal, ApiError, ApiResult},
    state::AppState,
    trips::{
        dto::{CommentRequest, ShareTripRequest},
        repo::{self, SharedTrip},
    },
};

pub fn trip_routes() -> Router<AppState> {
    Router::new()
        .route("/trips/share", post(share_trip))
        .route("/trips/share/:share_id", get(get_shared_trip))
        .route(
            "/trips/share/:share_id/comments",
            post(add_comment).get(list_comments),
        )
}

#[instrument(skip(state, payload))]
pub async fn share_trip(
    State(state): State<AppState>,
    Host(host): Host,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ShareTripRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if payload.trip_data.is_null() {
        return Err(ApiError::Validation("Trip data is required".into()));
    }

    let share_id = SharedTrip::create(&state.db, user_id, &payload.trip_data)
        .await
        .map_err(internal)?;

    info!(user_id = %user_id, share_id = %share_id, "trip shared");
    Ok(Json(json!({
        "success": true,
        "shareId": share_id,
        "shareLink": format!("http://{host}/pages/itinerary-planner.html?share={share_id}"),
    })))
}

#[instrument(skip(state))]
pub async fn get_shared_trip(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let trip_data = SharedTrip::fetch_unexpired(&state.db, &share_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("Trip not found or expired".into()))?;

    Ok(Json(json!({ "success": true, "tripData": trip_data })))
}

#[instrument(skip(state, payload))]
pub async fn add_comment(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CommentRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let comment = payload.comment.trim();
    if comment.is_empty() {
        return Err(ApiError::Validation("Comment is required".into()));
    }

    match SharedTrip::add_comment(&state.db, &share_id, user_id, comment).await {
        Ok(()) => {}
        Err(e) if repo::is_unknown_share(&e) => {
            return Err(ApiError::NotFound("Trip not found".into()));
        }
        Err(e) => return Err(internal(e)),
    }

    info!(user_id = %user_id, share_id = %share_id, "comment added");
    Ok(Json(json!({ "success": true, "message": "Comment added successfully" })))
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let comments = SharedTrip::comments(&state.db, &share_id)
        .await
        .map_err(internal)?;

    Ok(Json(json!({ "success": true, "comments": comments })))
}
