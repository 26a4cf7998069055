//! Caller authorization - who may run pipelines

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Caller session as presented on the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Raw bearer token, if any
    pub bearer: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer: Some(token.into()),
        }
    }
}

/// Outcome of checking a caller session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessCheck {
    pub authenticated: bool,
    pub admin: bool,
}

impl AccessCheck {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            admin: false,
        }
    }

    pub fn user() -> Self {
        Self {
            authenticated: true,
            admin: false,
        }
    }

    pub fn admin() -> Self {
        Self {
            authenticated: true,
            admin: true,
        }
    }
}

/// Account profile carrying the administrator capability flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub is_superadmin: bool,
}

/// Resolves a caller session to its access rights
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAuthorizer: Send + Sync + Debug {
    async fn check(&self, session: &Session) -> Result<AccessCheck, DomainError>;
}

/// Read-only profile lookup
#[async_trait]
pub trait ProfileRepository: Send + Sync + Debug {
    async fn get(&self, user_id: &str) -> Result<Option<Profile>, DomainError>;
}

/// In-memory implementation of ProfileRepository
pub mod in_memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    #[derive(Debug, Default)]
    pub struct InMemoryProfileRepository {
        profiles: RwLock<HashMap<String, Profile>>,
    }

    impl InMemoryProfileRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_profile(self, profile: Profile) -> Self {
            if let Ok(mut profiles) = self.profiles.write() {
                profiles.insert(profile.id.clone(), profile);
            }
            self
        }
    }

    #[async_trait]
    impl ProfileRepository for InMemoryProfileRepository {
        async fn get(&self, user_id: &str) -> Result<Option<Profile>, DomainError> {
            self.profiles
                .read()
                .map(|profiles| profiles.get(user_id).cloned())
                .map_err(|e| DomainError::internal(format!("Profile store lock poisoned: {}", e)))
        }
    }
}

pub use in_memory::InMemoryProfileRepository;
