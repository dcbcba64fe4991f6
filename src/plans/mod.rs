mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub use dto::PlanPatch;
pub use repo::Plan;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::plan_routes())
}
