//! Request/Response DTOs for the HTTP API

use serde::{Deserialize, Serialize};
use vitrine_db::{LocalizedProfile, LocalizedProject, User};

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub expires_in: i64,
}

/// Current-session response
#[derive(Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acctype: Option<i64>,
}

// ==================== Site Types ====================

/// Language response
#[derive(Serialize)]
pub struct LanguageResponse {
    pub code: String,
    pub name: String,
}

/// Project listing query parameters
#[derive(Deserialize, Default)]
pub struct ProjectsQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// Localized project response
#[derive(Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub status: String,
    pub project_type: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub repo_url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub skills: Option<String>,
}

impl From<LocalizedProject> for ProjectResponse {
    fn from(project: LocalizedProject) -> Self {
        Self {
            id: project.id,
            status: project.status.as_str().to_string(),
            project_type: project.project_type,
            start_date: project.start_date,
            end_date: project.end_date,
            repo_url: project.repo_url,
            title: project.title,
            subtitle: project.subtitle,
            description: project.description,
            skills: project.skills,
        }
    }
}

/// Localized profile response
#[derive(Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
}

impl From<LocalizedProfile> for ProfileResponse {
    fn from(profile: LocalizedProfile) -> Self {
        Self {
            email: profile.email,
            phone: profile.phone,
            location: profile.location,
            headline: profile.headline,
            bio: profile.bio,
        }
    }
}

// ==================== Admin Project Types ====================

/// One language's translation fields in a project submission
#[derive(Deserialize)]
pub struct TranslationPayload {
    pub language: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
}

/// Create/update project request
#[derive(Deserialize)]
pub struct SaveProjectRequest {
    pub status: String,
    pub project_type: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub translations: Vec<TranslationPayload>,
}

/// Created-project response
#[derive(Serialize)]
pub struct CreatedProjectResponse {
    pub id: i64,
}

/// One stored translation row of a project
#[derive(Serialize)]
pub struct TranslationResponse {
    pub language_id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub skills: Option<String>,
}

// ==================== Admin Content Types ====================

/// One language's translation fields in a profile submission
#[derive(Deserialize)]
pub struct ProfileTranslationPayload {
    pub language: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Profile update request
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub translations: Vec<ProfileTranslationPayload>,
}

/// One UI text entry to store
#[derive(Deserialize)]
pub struct TextEntry {
    pub key: String,
    pub language: String,
    pub text: String,
}

/// UI text upsert request
#[derive(Deserialize)]
pub struct UpsertTextsRequest {
    pub entries: Vec<TextEntry>,
}

// ==================== Admin User Types ====================

/// Create user request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub acctype: i64,
}

/// Update user request
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub acctype: Option<i64>,
    #[serde(default)]
    pub password: Option<String>,
}

/// User response (without password hash)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub acctype: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            acctype: user.acctype,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}
