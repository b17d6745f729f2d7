pub mod dto;
pub mod handlers;
pub mod memory;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

/// Profile routes; callers must wrap them in the auth layer.
pub fn router() -> Router<AppState> {
    handlers::profile_routes()
}
