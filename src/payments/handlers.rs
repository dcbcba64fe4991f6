use axum::{extract::State, routing::post, Json, Router};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::AuthUser,
    error::{internal, ApiError, ApiResult},
    payments::{
        dto::{ConfirmPaymentRequest, CreatePaymentRequest},
        repo::Payment,
    },
    plans::Plan,
    state::AppState,
};

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(create_intent))
        .route("/confirm-payment", post(confirm))
}

#[instrument(skip(state, payload))]
pub async fn create_intent(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let payment = Payment::create(
        &state.db,
        user_id,
        payload.amount,
        payload.currency.as_deref(),
        &payload.metadata,
    )
    .await
    .map_err(internal)?;

    info!(user_id = %user_id, payment_id = %payment.payment_id, "payment intent created");
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    Ok(Json(json!({
        "success": true,
        "clientSecret": format!("secret_demo_{millis}"),
        "paymentIntent": {
            "paymentId": payment.payment_id,
            "amount": payment.amount,
            "currency": payment.currency,
        },
    })))
}

#[instrument(skip(state, payload))]
pub async fn confirm(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    Payment::find(&state.db, &payload.payment_intent_id, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("Payment not found".into()))?;

    let payment = Payment::mark_succeeded(&state.db, &payload.payment_intent_id)
        .await
        .map_err(internal)?;

    if let Some(plan_id) = payload.plan_id {
        let marked = Plan::mark_paid(&state.db, user_id, plan_id)
            .await
            .map_err(internal)?;
        if !marked {
            warn!(user_id = %user_id, plan_id = %plan_id, "no such plan to mark paid");
        }
    }

    info!(user_id = %user_id, payment_id = %payment.payment_id, "payment confirmed");
    Ok(Json(json!({ "success": true, "payment": payment })))
}
