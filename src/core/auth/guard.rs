//! Request admission for protected endpoints
//!
//! The guard gates every protected request: it extracts the bearer token,
//! consults the revocation store (when one is configured), then verifies the
//! token. Either the request is admitted with its claims attached, or it is
//! rejected with an unauthorized response and no handler logic runs.
//!
//! Rejection bodies are deliberately terse: an expired token and a forged one
//! are indistinguishable from the outside. The internal failure detail goes
//! to the debug log only.

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::core::auth::jwt::{Claims, TokenManager};
use crate::core::auth::revocation::RevocationStore;

/// Admission failure reasons
///
/// Variants are distinguishable internally; the response mapping collapses
/// all token-verification failures into one outward signal.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("missing or invalid authorization header")]
    MissingHeader,

    #[error("token revoked")]
    Revoked,

    #[error("invalid token")]
    InvalidToken,
}

/// Unauthorized response body
#[derive(Debug, Serialize)]
struct GuardErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let code = match &self {
            GuardError::MissingHeader => "UNAUTHORIZED",
            GuardError::Revoked => "TOKEN_REVOKED",
            GuardError::InvalidToken => "INVALID_TOKEN",
        };

        let body = GuardErrorBody {
            error: self.to_string(),
            code,
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Session guard composing token verification with optional revocation checks
///
/// Constructed without a revocation store, the guard performs pure stateless
/// validation; the revocation step is skipped, never an error. If the store
/// is ever replaced by a fallible backend, the check must fail closed
/// (treat store-unavailable as revoked).
#[derive(Clone)]
pub struct AuthGuard {
    tokens: TokenManager,
    revocation: Option<RevocationStore>,
}

impl AuthGuard {
    /// Create a guard over a token manager and an optional revocation store
    pub fn new(tokens: TokenManager, revocation: Option<RevocationStore>) -> Self {
        Self { tokens, revocation }
    }

    /// Admit or reject a request based on its `Authorization` header
    ///
    /// Runs the admission sequence: extract bearer token, check revocation,
    /// verify signature and expiry. Returns the request-scoped claims on
    /// admission.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, GuardError> {
        let token = extract_bearer_token(headers)?;

        if let Some(store) = &self.revocation
            && store.is_revoked(token)
        {
            tracing::debug!("rejected revoked token");
            return Err(GuardError::Revoked);
        }

        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "token verification failed");
            GuardError::InvalidToken
        })?;

        Ok(claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// Any other shape (missing header, wrong scheme, empty token) is a
/// `MissingHeader` rejection.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, GuardError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(GuardError::MissingHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(GuardError::MissingHeader)?;

    if token.is_empty() {
        return Err(GuardError::MissingHeader);
    }

    Ok(token)
}
