use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, SearchEntry, SearchHistoryRequest},
        repo::User,
        services::{
            hash_password, is_valid_email, push_search_entry, verify_password, AuthUser, JwtKeys,
        },
    },
    error::{internal, ApiError, ApiResult},
    state::AppState,
};

const SEARCH_HISTORY_CAP: usize = 20;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile", get(profile))
        .route(
            "/users/search-history",
            post(add_search_history).get(get_search_history),
        )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.trim().is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("All fields are required".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email format".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    // Pre-check; a racing duplicate still trips the unique constraint below.
    if User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(internal)?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Validation("User already exists".into()));
    }

    let hash = hash_password(&payload.password).map_err(internal)?;

    let user = User::create(&state.db, payload.name.trim(), &payload.email, &hash)
        .await
        .map_err(internal)?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email).map_err(internal)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "user": user, "token": token })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Email and password required".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email format".into()));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Unauthorized("Invalid credentials".into())
        })?;

    let ok = verify_password(&payload.password, &user.password_hash).map_err(internal)?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email).map_err(internal)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(json!({ "success": true, "user": user, "token": token })))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(json!({ "success": true, "user": user })))
}

#[instrument(skip(state, payload))]
pub async fn add_search_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SearchHistoryRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let stored = User::search_history(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let history: Vec<SearchEntry> = serde_json::from_value(stored).unwrap_or_default();

    let entry = SearchEntry {
        destination: payload.destination,
        details: payload.details,
        timestamp: OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
    };
    let history = push_search_entry(history, entry, SEARCH_HISTORY_CAP);

    let value = serde_json::to_value(&history).map_err(internal)?;
    User::set_search_history(&state.db, user_id, &value)
        .await
        .map_err(internal)?;

    Ok(Json(json!({ "success": true, "searchHistory": history })))
}

#[instrument(skip(state))]
pub async fn get_search_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let history = User::search_history(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(json!({ "success": true, "searchHistory": history })))
}
