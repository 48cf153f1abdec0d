use crate::state::AppState;
use axum::Router;

pub mod calculator;
pub mod dto;
pub mod handlers;
pub mod repo;
pub mod sync;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
