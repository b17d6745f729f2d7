pub mod dto;
pub mod handlers;
pub mod memory;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

/// Product routes; callers must wrap them in the auth layer.
pub fn router() -> Router<AppState> {
    handlers::product_routes()
}
