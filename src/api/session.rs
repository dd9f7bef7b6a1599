//
//  cydarm-connector
//  api/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Sessions
//!
//! A [`Session`] is one `reqwest` client plus the authentication it carries:
//! optional Basic credentials and, once logged in, the `x-cydarm-authz` bearer
//! header. Sessions are cheap and short-lived; the API client builds a new one
//! for every top-level call.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder};

use crate::api::common::ApiError;
use crate::auth::{bearer_header_value, BasicCredentials, AUTHZ_HEADER};

/// An HTTP session with its authentication headers.
#[derive(Debug)]
pub struct Session {
    http: Client,
    basic_auth: Option<BasicCredentials>,
    headers: HeaderMap,
}

impl Session {
    /// Creates an unauthenticated session, optionally carrying Basic credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    /// (for example when the TLS backend fails to initialise).
    pub fn new(basic_auth: Option<BasicCredentials>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()?;

        Ok(Self {
            http,
            basic_auth,
            headers: HeaderMap::new(),
        })
    }

    /// Attaches a bearer token as the `x-cydarm-authz` header.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cydarm_connector::api::Session;
    ///
    /// let session = Session::new(None)?.with_bearer_token("jwt")?;
    /// assert_eq!(session.bearer_token(), Some("jwt"));
    /// # Ok::<(), cydarm_connector::api::ApiError>(())
    /// ```
    pub fn with_bearer_token(mut self, token: &str) -> Result<Self, ApiError> {
        self.headers
            .insert(AUTHZ_HEADER, bearer_header_value(token)?);
        Ok(self)
    }

    /// The Basic credentials this session sends, if any.
    pub fn basic_auth(&self) -> Option<&BasicCredentials> {
        self.basic_auth.as_ref()
    }

    /// Headers added to every request of this session.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The bearer token, if this session is logged in.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHZ_HEADER)
            .and_then(|value| value.to_str().ok())
    }

    /// Starts a request on this session with all auth headers applied.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self.http.request(method, url).headers(self.headers.clone());
        if let Some(basic) = &self.basic_auth {
            request = basic.apply_to_request(request);
        }
        request
    }

    /// Short description of the auth state for request logs.
    pub fn auth_description(&self) -> String {
        match &self.basic_auth {
            Some(basic) => format!("Basic({})", basic.username),
            None => "None".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_no_auth_headers() {
        let session = Session::new(None).unwrap();
        assert!(session.headers().is_empty());
        assert!(session.basic_auth().is_none());
        assert_eq!(session.auth_description(), "None");
    }

    #[test]
    fn test_bearer_token_header() {
        let session = Session::new(None)
            .unwrap()
            .with_bearer_token("bearer token jwt")
            .unwrap();
        assert_eq!(session.bearer_token(), Some("bearer token jwt"));
        assert!(session.headers().get(AUTHZ_HEADER).unwrap().is_sensitive());
    }

    #[test]
    fn test_basic_auth_in_description() {
        let session = Session::new(Some(BasicCredentials::new("proxy", "secret"))).unwrap();
        assert_eq!(session.auth_description(), "Basic(proxy)");
    }

    #[test]
    fn test_request_applies_basic_auth() {
        let session = Session::new(Some(BasicCredentials::new("basic", "basic"))).unwrap();
        let request = session
            .request(Method::GET, "http://localhost/case/1")
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Basic YmFzaWM6YmFzaWM="
        );
    }

    #[test]
    fn test_request_without_basic_auth_has_no_authorization() {
        let session = Session::new(None).unwrap().with_bearer_token("t").unwrap();
        let request = session
            .request(Method::GET, "http://localhost/case/1")
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
        assert_eq!(request.headers().get(AUTHZ_HEADER).unwrap(), "t");
    }
}
