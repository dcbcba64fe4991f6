mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub use dto::{CommentRequest, ShareTripRequest};
pub use repo::{CommentView, SharedTrip};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::trip_routes())
}
