//! Session authorizer backed by signed tokens and account profiles

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::jwt::JwtValidator;
use crate::domain::{AccessCheck, DomainError, ProfileRepository, Session, SessionAuthorizer};

/// Authenticates the bearer token, then reads the admin flag from the profile
#[derive(Debug)]
pub struct JwtSessionAuthorizer {
    /// None when no signing secret is configured; nobody authenticates
    validator: Option<JwtValidator>,
    profiles: Arc<dyn ProfileRepository>,
}

impl JwtSessionAuthorizer {
    pub fn new(validator: Option<JwtValidator>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            validator,
            profiles,
        }
    }
}

#[async_trait]
impl SessionAuthorizer for JwtSessionAuthorizer {
    async fn check(&self, session: &Session) -> Result<AccessCheck, DomainError> {
        let (Some(validator), Some(token)) = (&self.validator, session.bearer.as_deref()) else {
            return Ok(AccessCheck::anonymous());
        };

        let claims = match validator.validate(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                return Ok(AccessCheck::anonymous());
            }
        };

        let is_admin = self
            .profiles
            .get(claims.user_id())
            .await?
            .is_some_and(|profile| profile.is_superadmin);

        debug!(user_id = %claims.user_id(), admin = is_admin, "Session authenticated");

        Ok(AccessCheck {
            authenticated: true,
            admin: is_admin,
        })
    }
}
