//! Caller authentication adapters

mod jwt;
mod session;

pub use jwt::{JwtConfig, JwtValidator, SessionClaims};
pub use session::JwtSessionAuthorizer;

#[cfg(test)]
pub use jwt::test_support;
