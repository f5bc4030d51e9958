//! Public site routes
//!
//! Localized, read-only content. The language comes from the
//! negotiation middleware via the [`Lang`] extension.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use std::collections::HashMap;
use std::str::FromStr;
use vitrine_db::ProjectStatus;

use crate::error::ApiError;
use crate::language::Lang;
use crate::state::AppState;

use super::types::{LanguageResponse, ProfileResponse, ProjectResponse, ProjectsQuery};

/// GET /api/site/languages
async fn languages(State(state): State<AppState>) -> Result<Json<Vec<LanguageResponse>>, ApiError> {
    let languages = state.db.active_languages().await?;

    Ok(Json(
        languages
            .into_iter()
            .map(|l| LanguageResponse {
                code: l.code,
                name: l.name,
            })
            .collect(),
    ))
}

/// GET /api/site/projects
async fn list_projects(
    State(state): State<AppState>,
    Extension(Lang(lang)): Extension<Lang>,
    Query(query): Query<ProjectsQuery>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(ProjectStatus::from_str)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let projects = state.content.list_projects(&lang, status).await?;

    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// GET /api/site/projects/{id}
async fn get_project(
    State(state): State<AppState>,
    Extension(Lang(lang)): Extension<Lang>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = state.content.project(id, &lang).await?;
    Ok(Json(ProjectResponse::from(project)))
}

/// GET /api/site/profile
async fn profile(
    State(state): State<AppState>,
    Extension(Lang(lang)): Extension<Lang>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.content.profile(&lang).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// GET /api/site/texts
async fn texts(
    State(state): State<AppState>,
    Extension(Lang(lang)): Extension<Lang>,
) -> Result<Json<HashMap<String, String>>, ApiError> {
    Ok(Json(state.content.ui_texts(&lang).await?))
}

/// Create public site routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/site/languages", get(languages))
        .route("/api/site/projects", get(list_projects))
        .route("/api/site/projects/{id}", get(get_project))
        .route("/api/site/profile", get(profile))
        .route("/api/site/texts", get(texts))
}
