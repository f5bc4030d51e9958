//! Vitrine HTTP API
//!
//! Axum-based HTTP layer: the public localized site API, the login and
//! session endpoints, and the administrative back office API.

pub mod collaborators;
pub mod error;
pub mod language;
pub mod routes;
pub mod state;

pub use collaborators::{DbRoleDirectory, DbUserStore};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
