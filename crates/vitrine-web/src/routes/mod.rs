//! API routes

pub mod admin;
pub mod auth;
mod health;
mod site;
pub mod types;

use axum::{Router, middleware};

use crate::language::language_middleware;
use crate::state::AppState;

// Re-export commonly used extractors for external use
#[allow(unused_imports)]
pub use auth::{RequireAuth, require_permission};

/// Create the main router
///
/// Middleware order (outermost first): language negotiation, then the
/// identity gate, then the routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .merge(health::routes())
        // Public site API
        .merge(site::routes())
        // Login/logout/session
        .merge(auth::routes())
        // Back office API
        .merge(admin::routes())
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            vitrine_auth::identity_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            language_middleware,
        ))
        .with_state(state)
}
