//! Project management routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use std::str::FromStr;
use tracing::debug;
use vitrine_auth::permission;
use vitrine_core::{FieldValidator, ProjectInput, TranslationInput};
use vitrine_db::ProjectStatus;

use crate::error::ApiError;
use crate::routes::auth::{RequireAuth, require_permission};
use crate::state::AppState;

use super::super::types::{
    CreatedProjectResponse, SaveProjectRequest, TranslationResponse,
};

// ==================== Input Validation ====================

const MAX_TITLE_LENGTH: usize = 200;

fn validate_and_convert(request: SaveProjectRequest) -> Result<ProjectInput, ApiError> {
    let mut validator = FieldValidator::new();

    validator.in_list(
        &request.status,
        &["current", "past"],
        "status",
        "Status must be 'current' or 'past'",
    );
    validator.required(&request.project_type, "project_type", "Project type is required");
    if let Some(date) = &request.start_date {
        validator.date(date, "start_date", "Start date must be YYYY-MM-DD");
    }
    if let Some(date) = &request.end_date {
        validator.date(date, "end_date", "End date must be YYYY-MM-DD");
    }
    if let Some(url) = &request.repo_url {
        validator.url(url, "repo_url", "Repository URL must be http(s)");
    }
    for translation in &request.translations {
        let field = format!("translations.{}.title", translation.language);
        validator.required(&translation.title, &field, "Title is required");
        validator.max_length(&translation.title, MAX_TITLE_LENGTH, &field, "Title is too long");
    }

    if validator.has_errors() {
        return Err(ApiError::Validation(validator.into_errors()));
    }

    // Status has been validated above.
    let status = ProjectStatus::from_str(&request.status)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(ProjectInput {
        status,
        project_type: request.project_type,
        start_date: request.start_date,
        end_date: request.end_date,
        repo_url: request.repo_url,
        translations: request
            .translations
            .into_iter()
            .map(|t| TranslationInput {
                language_code: t.language,
                title: t.title,
                subtitle: t.subtitle,
                description: t.description,
                skills: t.skills,
            })
            .collect(),
    })
}

// ==================== Project Routes ====================

/// POST /api/admin/projects
async fn create_project(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<SaveProjectRequest>,
) -> Result<(StatusCode, Json<CreatedProjectResponse>), ApiError> {
    require_permission(&identity, permission::EDIT_PROJECTS)?;

    let input = validate_and_convert(request)?;
    debug!(user_id = identity.user_id(), "Creating project");

    let id = state.content.create_project(input).await?;

    Ok((StatusCode::CREATED, Json(CreatedProjectResponse { id })))
}

/// PUT /api/admin/projects/{id}
async fn update_project(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SaveProjectRequest>,
) -> Result<StatusCode, ApiError> {
    require_permission(&identity, permission::EDIT_PROJECTS)?;

    let input = validate_and_convert(request)?;
    debug!(user_id = identity.user_id(), project_id = id, "Updating project");

    state.content.update_project(id, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/admin/projects/{id}
async fn delete_project(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&identity, permission::DELETE_PROJECTS)?;

    debug!(user_id = identity.user_id(), project_id = id, "Deleting project");

    state.content.delete_project(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/projects/{id}/translations
///
/// All stored translation rows, for the edit form.
async fn project_translations(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TranslationResponse>>, ApiError> {
    require_permission(&identity, permission::EDIT_PROJECTS)?;

    let translations = state.content.project_translations(id).await?;

    Ok(Json(
        translations
            .into_iter()
            .map(|t| TranslationResponse {
                language_id: t.language_id,
                title: t.title,
                subtitle: t.subtitle,
                description: t.description,
                skills: t.skills,
            })
            .collect(),
    ))
}

/// Create project management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/projects", post(create_project))
        .route("/api/admin/projects/{id}", put(update_project))
        .route("/api/admin/projects/{id}", delete(delete_project))
        .route("/api/admin/projects/{id}/translations", get(project_translations))
}
