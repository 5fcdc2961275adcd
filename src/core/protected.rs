//! Profile endpoint for authenticated users
//!
//! - GET /api/protected/me - Echo the caller's claims

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;

use crate::core::auth::guard::{AuthGuard, GuardError};
use crate::core::auth::jwt::Claims;

/// State for the profile endpoint
#[derive(Clone)]
pub struct ProtectedApiState {
    pub guard: AuthGuard,
    pub app_name: String,
}

/// Response for the profile endpoint
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub claims: Claims,
    pub app: String,
}

/// Create the profile router
pub fn protected_api_router(state: ProtectedApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/protected/me", get(me_handler))
        .with_state(state)
}

/// GET /api/protected/me
/// Return the authenticated user's claims
async fn me_handler(
    State(state): State<Arc<ProtectedApiState>>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, GuardError> {
    let claims = state.guard.authenticate(&headers)?;

    Ok(Json(MeResponse {
        claims,
        app: state.app_name.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_me_response_serialization() {
        let response = MeResponse {
            claims: Claims {
                sub: "alice".to_string(),
                uid: 7,
                username: "alice".to_string(),
                iat: 1_700_000_000,
                exp: 1_700_086_400,
                iss: "taskdeck".to_string(),
            },
            app: "taskdeck".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"uid\":7"));
        assert!(json.contains("alice"));
        assert!(json.contains("\"app\":\"taskdeck\""));
    }
}
