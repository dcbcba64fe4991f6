use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    bookings::{dto::BookHotelRequest, repo::Booking},
    error::{internal, ApiResult},
    state::AppState,
};

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/hotels/book", post(book_hotel))
        .route("/bookings", get(list))
}

#[instrument(skip(state, payload))]
pub async fn book_hotel(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<BookHotelRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let confirmation = Booking::finalize(&state.db, user_id, &payload)
        .await
        .map_err(internal)?;

    info!(user_id = %user_id, booking_id = %confirmation.booking_id, "booking finalized");
    Ok(Json(json!({ "success": true, "data": confirmation })))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let bookings = Booking::list(&state.db, user_id).await.map_err(internal)?;
    Ok(Json(json!({ "success": true, "data": bookings })))
}
