//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use vitrine_core::FieldError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Core error: {0}")]
    Core(#[from] vitrine_core::CoreError),

    #[error("Database error: {0}")]
    Database(#[from] vitrine_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] vitrine_auth::AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Validation(fields) = &self {
            let body = axum::Json(json!({
                "error": "Validation failed",
                "fields": fields,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Validation(_) => unreachable!(),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::Core(e) => match e {
                vitrine_core::CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                vitrine_core::CoreError::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, msg.clone())
                }
                vitrine_core::CoreError::Database(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                ),
            },
            ApiError::Database(e) => match e {
                vitrine_db::DbError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                vitrine_db::DbError::Duplicate(msg) => (StatusCode::CONFLICT, msg.clone()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
            ApiError::Auth(e) => {
                let status = match e {
                    vitrine_auth::AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                    vitrine_auth::AuthError::InvalidToken
                    | vitrine_auth::AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
        };

        let body = axum::Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
