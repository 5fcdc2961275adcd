//! JWT issuance and verification
//!
//! Signed, time-bounded bearer tokens using the HS256 algorithm. The signing
//! secret and issuer identity are fixed at construction and shared between
//! issuance and verification, which live in the same process.
//!
//! Claims are a typed struct rather than a free-form map: the registered
//! claims (`iss`, `sub`, `iat`, `exp`) are set by [`TokenManager::issue`] and
//! cannot be overwritten by caller-supplied data, and the user identifier
//! decodes through a single `i64` path.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Default token lifetime in seconds (24 hours)
const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Default token issuer
const DEFAULT_ISSUER: &str = "taskdeck";

/// Token configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token issuer
    pub issuer: String,
    /// Token lifetime in seconds
    pub ttl_secs: i64,
}

impl TokenConfig {
    /// Create a new token configuration
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| TokenError::MissingSecret)?;

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());

        let ttl_secs = std::env::var("JWT_EXPIRATION_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        Ok(Self {
            secret,
            issuer,
            ttl_secs,
        })
    }

    /// Set issuer
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set token lifetime in seconds
    pub fn ttl_secs(mut self, secs: i64) -> Self {
        self.ttl_secs = secs;
        self
    }
}

/// Token errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT_SECRET environment variable not set")]
    MissingSecret,

    #[error("Token signing failed: {0}")]
    SigningError(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Unexpected signing algorithm")]
    InvalidAlgorithm,

    #[error("Malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => TokenError::InvalidAlgorithm,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// User identifier
    pub uid: i64,
    /// Username, duplicated as a custom claim for client convenience
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

/// Token manager encapsulating JWT signing and verification
#[derive(Clone)]
pub struct TokenManager {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenManager {
    /// Create a new token manager
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a token manager from environment variables
    pub fn from_env() -> Result<Self, TokenError> {
        let config = TokenConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Configured token lifetime
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.config.ttl_secs)
    }

    /// Sign a token for the given subject with the configured issuer
    ///
    /// `uid` and `username` travel as custom claims alongside the registered
    /// claim set.
    pub fn issue(
        &self,
        subject: &str,
        ttl: Duration,
        uid: i64,
        username: &str,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: subject.to_string(),
            uid,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningError(e.to_string()))
    }

    /// Parse and validate a token, returning its claims if valid
    ///
    /// Only HS256 is accepted; tokens claiming any other algorithm are
    /// rejected before the signature is checked. Expiry is enforced with
    /// zero leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}
