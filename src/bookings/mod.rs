mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use dto::{BookHotelRequest, BookingConfirmation, BookingSummary};
pub use repo::Booking;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::booking_routes())
}
