//! Profile and UI text management routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::put,
};
use tracing::debug;
use vitrine_auth::permission;
use vitrine_core::{FieldValidator, ProfileInput};

use crate::error::ApiError;
use crate::routes::auth::{RequireAuth, require_permission};
use crate::state::AppState;

use super::super::types::{UpdateProfileRequest, UpsertTextsRequest};

/// PUT /api/admin/profile
async fn update_profile(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<StatusCode, ApiError> {
    require_permission(&identity, permission::EDIT_PROFILE)?;

    let mut validator = FieldValidator::new();
    validator.required(&request.email, "email", "Email is required");
    validator.email(&request.email, "email", "Invalid email address");
    if validator.has_errors() {
        return Err(ApiError::Validation(validator.into_errors()));
    }

    debug!(user_id = identity.user_id(), "Updating profile");

    state
        .content
        .update_profile(ProfileInput {
            email: request.email,
            phone: request.phone,
            location: request.location,
            translations: request
                .translations
                .into_iter()
                .map(|t| (t.language, t.headline, t.bio))
                .collect(),
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/admin/texts
async fn upsert_texts(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<UpsertTextsRequest>,
) -> Result<StatusCode, ApiError> {
    require_permission(&identity, permission::EDIT_PROFILE)?;

    let mut validator = FieldValidator::new();
    for (index, entry) in request.entries.iter().enumerate() {
        let field = format!("entries.{}.key", index);
        validator.required(&entry.key, &field, "Key is required");
    }
    if validator.has_errors() {
        return Err(ApiError::Validation(validator.into_errors()));
    }

    debug!(
        user_id = identity.user_id(),
        count = request.entries.len(),
        "Storing UI texts"
    );

    for entry in &request.entries {
        state
            .content
            .set_ui_text(&entry.key, &entry.language, &entry.text)
            .await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Create content management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/profile", put(update_profile))
        .route("/api/admin/texts", put(upsert_texts))
}
