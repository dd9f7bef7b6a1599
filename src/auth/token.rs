//
//  cydarm-connector
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bearer Token Handling
//!
//! Cydarm issues short-lived bearer tokens in exchange for a username and
//! password. The exchange itself is performed by
//! [`CydarmClient::generate_bearer_token`](crate::api::CydarmClient::generate_bearer_token);
//! this module holds the pieces around it: the login body, the header names, and
//! the conversion of the token into a header value.
//!
//! Tokens are never cached. Each authenticated session performs its own login.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;

use super::to_base64;
use crate::api::common::ApiError;

/// Path of the password exchange endpoint, relative to the API base URL.
pub const AUTH_PATH: &str = "/auth/password";

/// Response header carrying the freshly issued token.
pub const ACCESS_TOKEN_HEADER: &str = "Access-Token";

/// Request header that authenticates calls with a bearer token.
pub const AUTHZ_HEADER: &str = "x-cydarm-authz";

/// Body of the password exchange.
///
/// Both fields hold the base64 encoding of the plaintext value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordLogin {
    /// base64(username)
    pub username: String,
    /// base64(password)
    pub password: String,
}

impl PasswordLogin {
    /// Encodes plaintext credentials into a login body.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cydarm_connector::auth::PasswordLogin;
    ///
    /// let login = PasswordLogin::new("user", "pass");
    /// assert_eq!(login.username, "dXNlcg==");
    /// assert_eq!(login.password, "cGFzcw==");
    /// ```
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: to_base64(username),
            password: to_base64(password),
        }
    }
}

/// Reads the bearer token out of the login response headers.
///
/// # Errors
///
/// Returns [`ApiError::MissingAccessToken`] when the header is absent or not
/// valid visible ASCII.
pub fn access_token_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or(ApiError::MissingAccessToken)
}

/// Converts a token into a header value flagged as sensitive.
///
/// Sensitive values print as `Sensitive` in `Debug` output, which keeps the
/// token out of request logs.
pub fn bearer_header_value(token: &str) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(token)?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("access-token", HeaderValue::from_static("jwt"));
        assert_eq!(access_token_from_headers(&headers).unwrap(), "jwt");
    }

    #[test]
    fn test_missing_access_token() {
        let headers = HeaderMap::new();
        assert!(matches!(
            access_token_from_headers(&headers),
            Err(ApiError::MissingAccessToken)
        ));
    }

    #[test]
    fn test_bearer_value_is_hidden_from_debug() {
        let value = bearer_header_value("secret-token").unwrap();
        assert!(value.is_sensitive());
        assert!(!format!("{:?}", value).contains("secret-token"));
    }

    #[test]
    fn test_login_body_serialization() {
        let body = serde_json::to_value(PasswordLogin::new("user", "pass")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"username": "dXNlcg==", "password": "cGFzcw=="})
        );
    }
}
