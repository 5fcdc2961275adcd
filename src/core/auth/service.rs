//! Authentication service
//!
//! Provides business logic for user registration, login, and logout.
//! Coordinates between the user repository, password hasher, token manager,
//! and revocation store.

use axum::http::HeaderMap;
use chrono::Utc;

use crate::core::auth::guard::extract_bearer_token;
use crate::core::auth::jwt::{TokenError, TokenManager};
use crate::core::auth::password;
use crate::core::auth::revocation::RevocationStore;
use crate::core::avatar::default_avatar_url;
use crate::core::db::models::User;
use crate::core::db::repositories::{UserRepository, UserRepositoryError};

/// Maximum username length, matching the column width
const MAX_USERNAME_LEN: usize = 50;

/// Authentication service error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error("username is too long (max 50 characters)")]
    UsernameTooLong,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username already exists")]
    UsernameTaken,

    #[error("authorization header required")]
    MissingAuthHeader,

    #[error("could not create token")]
    TokenCreation,

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<UserRepositoryError> for AuthError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UsernameAlreadyExists => AuthError::UsernameTaken,
            UserRepositoryError::DatabaseError(e) => AuthError::InternalError(e.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::SigningError(_) | TokenError::MissingSecret => AuthError::TokenCreation,
            other => AuthError::InternalError(other.to_string()),
        }
    }
}

/// Registration request data
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Login request data
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: the authenticated user and their bearer token
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    tokens: TokenManager,
    revocation: RevocationStore,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(users: UserRepository, tokens: TokenManager, revocation: RevocationStore) -> Self {
        Self {
            users,
            tokens,
            revocation,
        }
    }

    /// Validate registration input
    fn validate_registration(username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        if username.len() > MAX_USERNAME_LEN {
            return Err(AuthError::UsernameTooLong);
        }

        Ok(())
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let username = request.username.trim().to_string();
        Self::validate_registration(&username, &request.password)?;

        // bcrypt is deliberately slow; run it off the async runtime
        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        let avatar_url = default_avatar_url(&username);

        let user = self
            .users
            .create(&username, &password_hash, &avatar_url)
            .await?;

        Ok(user)
    }

    /// Authenticate a user and issue a bearer token
    ///
    /// Unknown username, wrong password, and an unreadable stored hash all
    /// collapse to the same "invalid credentials" failure so that callers
    /// cannot probe which usernames exist.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AuthError> {
        if request.username.is_empty() || request.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = request.password;
        let stored_hash = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || password::verify_password(&password, &stored_hash))
                .await
                .map_err(|e| AuthError::InternalError(e.to_string()))?;

        match verified {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "stored password hash unreadable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        let token = self
            .tokens
            .issue(&user.username, self.tokens.ttl(), user.id, &user.username)
            .map_err(|e| {
                tracing::error!(error = %e, "token issuance failed");
                AuthError::TokenCreation
            })?;

        Ok(LoginOutcome { user, token })
    }

    /// Revoke the bearer token carried by the given request headers
    ///
    /// The token is held in the revoked set until its natural expiry would
    /// have passed anyway. Revoking an already-revoked token is a no-op.
    pub fn logout(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = extract_bearer_token(headers).map_err(|_| AuthError::MissingAuthHeader)?;

        self.revocation
            .revoke(token.to_string(), Utc::now() + self.tokens.ttl());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_registration_valid() {
        assert!(AuthService::validate_registration("alice", "Password123").is_ok());
        assert!(AuthService::validate_registration("a", "p").is_ok());
    }

    #[test]
    fn test_validate_registration_missing_fields() {
        assert!(matches!(
            AuthService::validate_registration("", "Password123"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            AuthService::validate_registration("alice", ""),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            AuthService::validate_registration("", ""),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_validate_registration_username_too_long() {
        let long = "a".repeat(51);
        assert!(matches!(
            AuthService::validate_registration(&long, "Password123"),
            Err(AuthError::UsernameTooLong)
        ));

        let max = "a".repeat(50);
        assert!(AuthService::validate_registration(&max, "Password123").is_ok());
    }

    // ========================================================================
    // Error Conversion Tests
    // ========================================================================

    #[test]
    fn test_auth_error_from_user_repository_error() {
        let err: AuthError = UserRepositoryError::UsernameAlreadyExists.into();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[test]
    fn test_auth_error_from_token_error() {
        let err: AuthError = TokenError::SigningError("hs256".to_string()).into();
        assert!(matches!(err, AuthError::TokenCreation));

        let err: AuthError = TokenError::Expired.into();
        assert!(matches!(err, AuthError::InternalError(_)));
    }

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            format!("{}", AuthError::InvalidCredentials),
            "invalid credentials"
        );
        assert_eq!(
            format!("{}", AuthError::UsernameTaken),
            "username already exists"
        );
        assert_eq!(
            format!("{}", AuthError::MissingCredentials),
            "username and password are required"
        );
    }

    // ========================================================================
    // Request Deserialization Tests
    // ========================================================================

    #[test]
    fn test_register_request_deserialization() {
        let json = r#"{
            "username": "alice",
            "password": "Password123"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password, "Password123");
    }

    #[test]
    fn test_login_request_deserialization() {
        let json = r#"{
            "username": "alice",
            "password": "Password123"
        }"#;

        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password, "Password123");
    }
}
