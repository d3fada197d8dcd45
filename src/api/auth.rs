//! Write authorization for the timestamp API.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use super::validate::Rejection;

/// Scheme prefix expected on the Authorization header
const BASIC_PREFIX: &str = "Basic ";

/// Check the `Authorization` header of a write request.
///
/// The header must read `Basic <credentials>` with non-empty credentials
/// equal byte-for-byte to the configured secret; no decoding is performed on
/// the credentials. When no secret is configured every write is refused.
pub fn check_write_credentials(
    headers: &HeaderMap,
    expected: Option<&str>,
) -> Result<(), Rejection> {
    let Some(expected) = expected else {
        return Err(Rejection::MissingCredentials);
    };

    let supplied = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix(BASIC_PREFIX))
        .filter(|credentials| !credentials.is_empty());

    match supplied {
        Some(credentials) if credentials == expected => Ok(()),
        _ => Err(Rejection::MissingCredentials),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "writer-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_matching_credentials_pass() {
        let headers = headers_with("Basic writer-secret");
        assert!(check_write_credentials(&headers, Some(SECRET)).is_ok());
    }

    #[test]
    fn test_missing_header_is_refused() {
        let headers = HeaderMap::new();
        assert_eq!(
            check_write_credentials(&headers, Some(SECRET)),
            Err(Rejection::MissingCredentials)
        );
    }

    #[test]
    fn test_wrong_credentials_are_refused() {
        let headers = headers_with("Basic someone-else");
        assert_eq!(
            check_write_credentials(&headers, Some(SECRET)),
            Err(Rejection::MissingCredentials)
        );
    }

    #[test]
    fn test_wrong_scheme_is_refused() {
        let headers = headers_with("Bearer writer-secret");
        assert_eq!(
            check_write_credentials(&headers, Some(SECRET)),
            Err(Rejection::MissingCredentials)
        );
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        let headers = headers_with("basic writer-secret");
        assert_eq!(
            check_write_credentials(&headers, Some(SECRET)),
            Err(Rejection::MissingCredentials)
        );
    }

    #[test]
    fn test_empty_credentials_are_refused() {
        let headers = headers_with("Basic ");
        assert_eq!(
            check_write_credentials(&headers, Some(SECRET)),
            Err(Rejection::MissingCredentials)
        );
    }

    #[test]
    fn test_unconfigured_secret_refuses_all_writes() {
        let headers = headers_with("Basic writer-secret");
        assert_eq!(
            check_write_credentials(&headers, None),
            Err(Rejection::MissingCredentials)
        );
    }
}
