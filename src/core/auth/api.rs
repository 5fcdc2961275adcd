//! Auth API endpoints
//!
//! Provides REST API endpoints for authentication:
//! - POST /api/auth/register - Register a new user
//! - POST /api/auth/login - Login and get a bearer token
//! - POST /api/auth/logout - Logout (revoke the presented token)

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use std::sync::Arc;

use crate::core::auth::service::{AuthError, AuthService, LoginRequest, RegisterRequest};
use crate::core::db::models::UserResponse;

/// Auth API state containing the auth service
#[derive(Clone)]
pub struct AuthApiState {
    pub auth_service: AuthService,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Convert AuthError to API response
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::MissingCredentials => (StatusCode::BAD_REQUEST, "MISSING_CREDENTIALS"),
            AuthError::UsernameTooLong => (StatusCode::BAD_REQUEST, "USERNAME_TOO_LONG"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AuthError::UsernameTaken => (StatusCode::CONFLICT, "USERNAME_EXISTS"),
            AuthError::MissingAuthHeader => (StatusCode::BAD_REQUEST, "MISSING_AUTH_HEADER"),
            AuthError::TokenCreation => (StatusCode::INTERNAL_SERVER_ERROR, "TOKEN_CREATION"),
            AuthError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ApiError::new(self.to_string(), code);

        (status, Json(body)).into_response()
    }
}

/// Response for successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
    pub avatar_url: String,
}

/// Response for successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    pub username: String,
    pub avatar_url: String,
}

/// Response for logout
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Create the auth API router
pub fn auth_api_router(state: AuthApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .with_state(state)
}

/// POST /api/auth/register
/// Register a new user
async fn register_handler(
    State(state): State<Arc<AuthApiState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    tracing::info!("Registration attempt for username: {}", request.username);

    let user = state.auth_service.register(request).await?;

    tracing::info!("User registered successfully: {}", user.username);

    let user: UserResponse = user.into();
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
        }),
    ))
}

/// POST /api/auth/login
/// Authenticate and receive a bearer token
async fn login_handler(
    State(state): State<Arc<AuthApiState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    tracing::info!("Login attempt for username: {}", request.username);

    let outcome = state.auth_service.login(request).await?;

    tracing::info!("User logged in successfully: {}", outcome.user.username);

    Ok(Json(LoginResponse {
        token: outcome.token,
        id: outcome.user.id,
        username: outcome.user.username,
        avatar_url: outcome.user.avatar_url,
    }))
}

/// POST /api/auth/logout
/// Revoke the presented bearer token
async fn logout_handler(
    State(state): State<Arc<AuthApiState>>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, AuthError> {
    tracing::info!("Logout request");

    state.auth_service.logout(&headers)?;

    Ok(Json(LogoutResponse {
        message: "logged out".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("Something went wrong", "ERROR_CODE");
        let json = serde_json::to_string(&error).unwrap();

        assert!(json.contains("Something went wrong"));
        assert!(json.contains("ERROR_CODE"));
    }

    #[test]
    fn test_auth_error_status_mapping() {
        assert_eq!(
            AuthError::MissingCredentials.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::UsernameTaken.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::InternalError("db down".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_body_hides_detail_code() {
        // The response body carries the error display text and a stable code,
        // never a stack trace
        let response = AuthError::TokenCreation.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_login_response_serialization() {
        let response = LoginResponse {
            token: "eyJ.token.sig".to_string(),
            id: 7,
            username: "alice".to_string(),
            avatar_url: "https://example.com/a.png".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("eyJ.token.sig"));
        assert!(json.contains("alice"));
        assert!(json.contains("\"id\":7"));
    }

    #[test]
    fn test_register_response_serialization() {
        let response = RegisterResponse {
            id: 7,
            username: "alice".to_string(),
            avatar_url: "https://example.com/a.png".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_logout_response_serialization() {
        let response = LogoutResponse {
            message: "logged out".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("logged out"));
    }
}
