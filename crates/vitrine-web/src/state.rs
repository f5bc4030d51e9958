//! Application state

use std::sync::Arc;
use vitrine_auth::{AuthGate, SessionIssuer};
use vitrine_core::ContentService;
use vitrine_db::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub content: ContentService,
    pub gate: Arc<AuthGate>,
    pub issuer: SessionIssuer,
    pub default_language: String,
}

impl AppState {
    pub fn new(
        db: Database,
        content: ContentService,
        gate: Arc<AuthGate>,
        issuer: SessionIssuer,
        default_language: String,
    ) -> Self {
        Self {
            db,
            content,
            gate,
            issuer,
            default_language,
        }
    }
}
