use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use sha2::{Digest, Sha256};

use crate::config;
use crate::error::ApiError;

/// Admin gate for mutating endpoints. Extracting this from a request proves
/// the caller presented the configured admin bearer secret; handlers that
/// mutate articles take it as their first argument.
///
/// A missing or non-bearer credential is 401; a present-but-wrong one is 403.
#[derive(Clone, Debug)]
pub struct AdminGate;

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminGate
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized: Admin token required"))?;

        let secret = &config::config().security.admin_token;
        if !token_matches(&token, secret) {
            return Err(ApiError::forbidden("Forbidden: Invalid admin token"));
        }

        Ok(AdminGate)
    }
}

/// Extract the bearer credential from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(str::to_string)
}

/// Compare the presented token against the configured secret by hashing both
/// sides, so the comparison cost is independent of where the strings differ.
fn token_matches(presented: &str, secret: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(secret.as_bytes());
    presented == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_yields_no_token() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn non_bearer_scheme_yields_no_token() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn bearer_token_extracted() {
        let headers = headers_with("Bearer sekrit");
        assert_eq!(extract_bearer_token(&headers), Some("sekrit".to_string()));
    }

    #[test]
    fn token_comparison() {
        assert!(token_matches("sekrit", "sekrit"));
        assert!(!token_matches("sekrit2", "sekrit"));
        assert!(!token_matches("", "sekrit"));
        // Empty configured secret never matches, even an empty presentation
        assert!(!token_matches("", ""));
    }
}
