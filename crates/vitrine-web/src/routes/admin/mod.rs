//! Administrative back office routes
//!
//! Every route here demands an authenticated identity plus the
//! permission bit guarding the operation.

pub mod content;
pub mod projects;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create admin API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(projects::routes())
        .merge(content::routes())
        .merge(users::routes())
}
