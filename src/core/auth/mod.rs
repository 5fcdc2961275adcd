//! Authentication module
//!
//! This module provides authentication functionality including:
//! - Password hashing and verification (bcrypt)
//! - Bearer token issuance and validation (HS256 JWT)
//! - Server-side token revocation to back logout
//! - Request admission for protected endpoints
//! - REST API endpoints for register/login/logout

pub mod api;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod revocation;
pub mod service;

pub use api::{AuthApiState, auth_api_router};
pub use guard::{AuthGuard, GuardError, extract_bearer_token};
pub use jwt::{Claims, TokenConfig, TokenError, TokenManager};
pub use password::{PasswordError, hash_password, verify_password};
pub use revocation::RevocationStore;
pub use service::{AuthError, AuthService, LoginOutcome, LoginRequest, RegisterRequest};
