//! Caller session extraction

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::domain::Session;

/// The caller's session as presented in the `Authorization: Bearer` header.
///
/// Never rejects; whether the session is good enough is decided by the
/// pipeline executor so that authorization happens before any loading.
#[derive(Debug, Clone)]
pub struct CallerSession(pub Session);

impl<S> FromRequestParts<S> for CallerSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = match extract_bearer_token(&parts.headers) {
            Some(token) => Session::bearer(token),
            None => Session::anonymous(),
        };

        Ok(CallerSession(session))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")), Some("abc.def".into()));
    }

    #[test]
    fn test_missing_or_blank_token() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
        assert_eq!(extract_bearer_token(&headers("Bearer   ")), None);
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
    }
}
