//! User management routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use tracing::{debug, info};
use vitrine_auth::{hash_password, permission};
use vitrine_core::FieldValidator;
use vitrine_db::NewUser;

use crate::error::ApiError;
use crate::routes::auth::{RequireAuth, require_permission};
use crate::state::AppState;

use super::super::types::{CreateUserRequest, UpdateUserRequest, UserResponse};

// ==================== Input Validation ====================

/// Minimum allowed password length
const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum allowed password length
const MAX_PASSWORD_LENGTH: usize = 256;

fn validate_password(validator: &mut FieldValidator, password: &str) {
    validator.min_length(
        password,
        MIN_PASSWORD_LENGTH,
        "password",
        "Password must be at least 8 characters long",
    );
    validator.max_length(
        password,
        MAX_PASSWORD_LENGTH,
        "password",
        "Password is too long",
    );
}

async fn validate_role(state: &AppState, acctype: i64) -> Result<(), ApiError> {
    if state.db.get_role(acctype).await?.is_none() {
        return Err(ApiError::BadRequest(format!("Invalid role: {}", acctype)));
    }
    Ok(())
}

// ==================== User Routes ====================

/// GET /api/admin/users
async fn list_users(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    require_permission(&identity, permission::MANAGE_USERS)?;

    let users = state.db.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/admin/users
async fn create_user(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_permission(&identity, permission::MANAGE_USERS)?;

    let mut validator = FieldValidator::new();
    validator.email(&request.email, "email", "Invalid email address");
    validate_password(&mut validator, &request.password);
    if validator.has_errors() {
        return Err(ApiError::Validation(validator.into_errors()));
    }
    validate_role(&state, request.acctype).await?;

    debug!("Creating user: {}", request.email);

    let password_hash = hash_password(&request.password)?;
    let user = state
        .db
        .insert_user(NewUser {
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            acctype: request.acctype,
        })
        .await?;

    info!("Created user: {}", user.email);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/admin/users/{id}
async fn get_user(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    require_permission(&identity, permission::MANAGE_USERS)?;

    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/admin/users/{id}
async fn update_user(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_permission(&identity, permission::MANAGE_USERS)?;

    // Verify user exists
    state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    if let Some(acctype) = request.acctype {
        validate_role(&state, acctype).await?;
        state.db.update_user_role(id, acctype).await?;
    }

    if let Some(password) = &request.password {
        let mut validator = FieldValidator::new();
        validate_password(&mut validator, password);
        if validator.has_errors() {
            return Err(ApiError::Validation(validator.into_errors()));
        }
        let password_hash = hash_password(password)?;
        state.db.update_user_password(id, &password_hash).await?;
    }

    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    info!("Updated user: {}", user.email);

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/admin/users/{id}
async fn delete_user(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&identity, permission::MANAGE_USERS)?;

    // Deleting one's own account would strand the session.
    if identity.user_id() == Some(id) {
        return Err(ApiError::BadRequest("Cannot delete the current user".to_string()));
    }

    debug!("Deleting user: {}", id);

    if state.db.delete_user(id).await? {
        info!("Deleted user: {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("User: {}", id)))
    }
}

/// Create user management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users", post(create_user))
        .route("/api/admin/users/{id}", get(get_user))
        .route("/api/admin/users/{id}", put(update_user))
        .route("/api/admin/users/{id}", delete(delete_user))
}
