//! Authentication extractors and routes

use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::header::SET_COOKIE,
    http::request::Parts,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, info};
use vitrine_auth::{AuthError, Identity, verify_password};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse, SessionResponse};

// ==================== Auth Extractors ====================

/// Extractor for an authenticated identity (required)
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .unwrap_or_default();

        if !identity.is_authenticated() {
            return Err(ApiError::Unauthorized);
        }

        Ok(RequireAuth(identity))
    }
}

/// Reject with 403 unless the identity holds every bit in `bit`.
pub fn require_permission(identity: &Identity, bit: i64) -> Result<(), ApiError> {
    if identity.has_permission(bit) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

// ==================== Input Validation ====================

/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;

// ==================== Auth Routes ====================

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    // Validate input lengths to prevent DoS
    if request.email.is_empty() || request.email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::BadRequest("Invalid email".to_string()));
    }
    if request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }

    debug!("Login attempt for: {}", request.email);

    // Find user - but don't return early to prevent timing attacks
    let user_result = state.db.get_user_by_email(&request.email).await?;

    // Always perform verification to keep timing constant. The dummy
    // hash is a valid Argon2 hash that never matches.
    const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$K8rI5T7VdQ8xkO0GqK5K2w";

    let (hash_to_verify, user) = match user_result {
        Some(u) => (u.password_hash.clone(), Some(u)),
        None => (DUMMY_HASH.to_string(), None),
    };

    let password_valid = verify_password(&request.password, &hash_to_verify)?;

    // Success and failure stay symmetric for the caller: either path is
    // an ordinary 401, never an exception-driven flow.
    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => return Err(ApiError::Auth(AuthError::InvalidCredentials)),
    };

    let access = state.issuer.issue_access(user.id, user.acctype)?;
    let refresh = state.issuer.issue_refresh(user.id)?;

    info!("User {} logged in", user.email);

    Ok((
        AppendHeaders([
            (SET_COOKIE, access.cookie.header_value()),
            (SET_COOKIE, refresh.cookie.header_value()),
        ]),
        Json(LoginResponse {
            user_id: user.id,
            expires_in: state.issuer.access_ttl().num_seconds(),
        }),
    )
        .into_response())
}

/// POST /api/auth/logout
///
/// Instructs the client to discard both credentials. The credentials
/// themselves stay cryptographically valid until natural expiry.
async fn logout(State(state): State<AppState>) -> Response {
    let [access, refresh] = state.issuer.revoke_all();

    info!("Session revoked");

    (
        AppendHeaders([
            (SET_COOKIE, access.header_value()),
            (SET_COOKIE, refresh.header_value()),
        ]),
        Json(serde_json::json!({ "status": "logged_out" })),
    )
        .into_response()
}

/// GET /api/auth/session
async fn session(identity: axum::Extension<Identity>) -> Json<SessionResponse> {
    let identity = identity.0;
    Json(SessionResponse {
        authenticated: identity.is_authenticated(),
        user_id: identity.user_id(),
        acctype: identity.acctype(),
    })
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
}
