//! Route modules.

use axum::Router;

use crate::state::AppState;

pub mod board;
pub mod health;

/// Returns the full application router, as served by the binary.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/boards", board::router())
}
