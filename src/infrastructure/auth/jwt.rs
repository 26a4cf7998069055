//! Session token validation for tokens issued by the auth service

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Audience, `authenticated` for signed-in users
    #[serde(default)]
    pub aud: Option<String>,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
}

impl SessionClaims {
    /// Get user ID from claims
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Configuration for session token validation
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret
    pub secret: String,
    /// Required `aud` claim
    pub audience: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            audience: audience.into(),
        }
    }
}

/// Validates HS256 session tokens
#[derive(Clone)]
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtValidator")
            .field("decoding_key", &"[hidden]")
            .field("audience", &self.validation.aud)
            .finish()
    }
}

impl JwtValidator {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[config.audience.as_str()]);

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<SessionClaims, DomainError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| DomainError::validation(format!("Invalid session token: {}", e)))
    }
}
