mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub use dto::{ConfirmPaymentRequest, CreatePaymentRequest};
pub use repo::Payment;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::payment_routes())
}
