//
//  cydarm-connector
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the Cydarm API
//!
//! This module provides [`CydarmClient`], which owns the connection settings and
//! turns every domain operation into a single HTTP call.
//!
//! ## Features
//!
//! - Session factory with optional Basic auth and bearer token login
//! - One request executor used by every endpoint
//! - Request logging through `tracing` and an optional callback
//! - Error bodies turned into readable messages
//!
//! ## Request Flow
//!
//! Every call made through [`CydarmClient::rest_call`] creates a fresh session,
//! which performs its own login first. A typical operation therefore costs two
//! round trips: `POST /auth/password`, then the operation itself. Nothing is
//! cached and nothing is retried.

use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::api::common::ApiError;
use crate::api::session::Session;
use crate::auth::{access_token_from_headers, BasicCredentials, PasswordLogin, AUTH_PATH};

/// Callback that receives one human readable line per request.
pub type LogFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Parses a Cydarm error response and extracts a user-friendly message.
///
/// Cydarm returns errors either as `{"error": "..."}`, `{"message": "..."}`,
/// `{"error": {"message": "..."}}` or `{"detail": "..."}`, depending on which
/// service behind the gateway rejected the call. If none of those shapes match,
/// the raw body is used.
///
/// # Example
///
/// ```rust
/// use cydarm_connector::api::client::format_api_error;
/// use reqwest::StatusCode;
///
/// let err = format_api_error(StatusCode::NOT_FOUND, r#"{"error": "no such case"}"#);
/// assert_eq!(err.to_string(), "HTTP 404 Not Found: no such case");
/// ```
pub fn format_api_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(Value::as_str)))
                .or_else(|| json.get("message").and_then(Value::as_str))
                .or_else(|| json.get("detail").and_then(Value::as_str))
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });

    ApiError::Http { status, message }
}

/// Options attached to a single request.
///
/// # Example
///
/// ```rust
/// use cydarm_connector::api::RequestOptions;
/// use serde_json::json;
///
/// let options = RequestOptions::new()
///     .json(&json!({"searchString": "CVE"}))?
///     .query("page[size]", "10");
/// assert!(options.body().is_some());
/// # Ok::<(), cydarm_connector::api::ApiError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    body: Option<Value>,
    query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Creates empty options: no body, no query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Appends a query parameter, keeping insertion order.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends several query parameters.
    pub fn queries(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// The JSON body, if one was set.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl fmt::Display for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self
            .body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "None".to_string());
        write!(f, "{{json: {}, params: {:?}}}", body, self.query)
    }
}

/// Status and headers of a response whose body was not parsed.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status (always 2xx; failures become errors).
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
}

/// What the executor hands back.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Parsed JSON body. An empty body is `Value::Null`.
    Json(Value),
    /// Unparsed response, for endpoints that answer with no body.
    Raw(RawResponse),
}

impl Reply {
    /// Returns the JSON body, or `Value::Null` for raw responses.
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Raw(_) => Value::Null,
        }
    }

    /// Returns the raw response, if this reply is raw.
    pub fn into_raw(self) -> Option<RawResponse> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Json(_) => None,
        }
    }

    /// Returns the status code for raw responses.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Raw(raw) => Some(raw.status),
            Self::Json(_) => None,
        }
    }
}

/// The Cydarm API client.
///
/// Holds the immutable connection settings. Every domain operation (see the
/// `cases`, `playbooks` and `directory` modules) goes through
/// [`rest_call`](Self::rest_call).
///
/// # Example
///
/// ```rust,no_run
/// use cydarm_connector::api::CydarmClient;
/// use cydarm_connector::auth::BasicCredentials;
///
/// # async fn example() -> Result<(), cydarm_connector::api::ApiError> {
/// let client = CydarmClient::new("https://acme.cydarm.io/cydarm_api", "analyst", "s3cret")
///     .with_basic_auth(BasicCredentials::new("proxy", "proxy-pass"))
///     .with_log_fn(|line| eprintln!("{line}"));
///
/// let case = client.get_case("00e99897-f141-4819-a371-e3cd03290cd9").await?;
/// println!("{}", case["description"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CydarmClient {
    /// Base URL without a trailing slash, e.g. `https://acme.cydarm.io/cydarm_api`
    base_url: String,
    /// Cydarm username used for the password exchange
    username: String,
    /// Cydarm password used for the password exchange
    password: String,
    /// Optional static Basic credentials
    basic_auth: Option<BasicCredentials>,
    /// Optional request log sink
    log_fn: Option<LogFn>,
}

impl CydarmClient {
    /// Creates a client without Basic auth or logging callback.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.strip_suffix('/').unwrap_or(&base_url).to_string(),
            username: username.into(),
            password: password.into(),
            basic_auth: None,
            log_fn: None,
        }
    }

    /// Sends Basic credentials on every session.
    pub fn with_basic_auth(mut self, creds: BasicCredentials) -> Self {
        self.basic_auth = Some(creds);
        self
    }

    /// Sets the callback that receives request log lines.
    pub fn with_log_fn<F>(mut self, log_fn: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.log_fn = Some(Arc::new(log_fn));
        self
    }

    /// Shares an existing callback.
    pub fn with_shared_log_fn(mut self, log_fn: LogFn) -> Self {
        self.log_fn = Some(log_fn);
        self
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The Cydarm username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The configured Basic credentials.
    pub fn basic_auth(&self) -> Option<&BasicCredentials> {
        self.basic_auth.as_ref()
    }

    /// Exchanges the configured username and password for a bearer token.
    ///
    /// Runs on an unauthenticated session (which still carries Basic
    /// credentials when configured).
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] if the server rejects the credentials
    /// - [`ApiError::MissingAccessToken`] if no `Access-Token` header came back
    /// - [`ApiError::Network`] on transport failures
    pub async fn generate_bearer_token(&self) -> Result<String, ApiError> {
        let session = Session::new(self.basic_auth.clone())?;
        let options =
            RequestOptions::new().json(&PasswordLogin::new(&self.username, &self.password))?;
        let reply = self
            .rest_call_with_session(&session, Method::POST, AUTH_PATH, false, options)
            .await?;

        match reply {
            Reply::Raw(raw) => access_token_from_headers(&raw.headers),
            Reply::Json(_) => Err(ApiError::MissingAccessToken),
        }
    }

    /// Builds a session, logging in first when `with_bearer_token` is set.
    ///
    /// Each call with `with_bearer_token == true` performs a new login.
    pub async fn create_session(&self, with_bearer_token: bool) -> Result<Session, ApiError> {
        let session = Session::new(self.basic_auth.clone())?;

        if with_bearer_token {
            let token = self.generate_bearer_token().await?;
            return session.with_bearer_token(&token);
        }
        Ok(session)
    }

    /// Issues one request on `session`.
    ///
    /// The URL is `base_url + path`. A log line is emitted before sending.
    /// Non-2xx responses fail immediately. With `return_json` the body is
    /// parsed; otherwise status and headers are returned untouched.
    pub async fn rest_call_with_session(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        return_json: bool,
        options: RequestOptions,
    ) -> Result<Reply, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        self.log_request(session, &method, &url, &options);

        let mut request = session.request(method, &url);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format_api_error(status, &text));
        }

        if !return_json {
            return Ok(Reply::Raw(RawResponse {
                status,
                headers: response.headers().clone(),
            }));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Reply::Json(Value::Null));
        }
        Ok(Reply::Json(serde_json::from_str(&text)?))
    }

    /// Issues one request on a freshly authenticated session.
    pub async fn rest_call(
        &self,
        method: Method,
        path: &str,
        return_json: bool,
        options: RequestOptions,
    ) -> Result<Reply, ApiError> {
        let session = self.create_session(true).await?;
        self.rest_call_with_session(&session, method, path, return_json, options)
            .await
    }

    /// `GET` returning the parsed body.
    pub async fn rest_get(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        Ok(self
            .rest_call(Method::GET, path, true, options)
            .await?
            .into_json())
    }

    /// `POST` returning the parsed body.
    pub async fn rest_post(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        Ok(self
            .rest_call(Method::POST, path, true, options)
            .await?
            .into_json())
    }

    /// `PUT` returning the raw response.
    pub async fn rest_put(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<RawResponse, ApiError> {
        self.rest_raw(Method::PUT, path, options).await
    }

    /// `DELETE` returning the raw response.
    pub async fn rest_delete(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<RawResponse, ApiError> {
        self.rest_raw(Method::DELETE, path, options).await
    }

    /// Any method, returning the raw response.
    pub async fn rest_raw(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<RawResponse, ApiError> {
        let reply = self.rest_call(method, path, false, options).await?;
        // rest_call with return_json == false always answers Raw
        reply
            .into_raw()
            .ok_or_else(|| ApiError::Decode(serde::de::Error::custom("expected a raw response")))
    }

    fn log_request(&self, session: &Session, method: &Method, url: &str, options: &RequestOptions) {
        let line = format!(
            "HTTP {} request to {} with auth={}, headers={:?} and options={}",
            method,
            url,
            session.auth_description(),
            session.headers(),
            options
        );
        tracing::debug!("{}", line);
        if let Some(log_fn) = &self.log_fn {
            log_fn(&line);
        }
    }
}

impl fmt::Debug for CydarmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CydarmClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"********")
            .field("basic_auth", &self.basic_auth)
            .field("log_fn", &self.log_fn.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::to_base64;
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::Mutex;

    const USERNAME: &str = "user";
    const PASSWORD: &str = "pass";
    const BEARER_TOKEN: &str = "bearer token jwt";

    fn login_body() -> Matcher {
        Matcher::Json(json!({
            "username": to_base64(USERNAME),
            "password": to_base64(PASSWORD),
        }))
    }

    #[tokio::test]
    async fn test_bearer_token_without_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/password")
            .match_body(login_body())
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_header("Access-Token", BEARER_TOKEN)
            .create_async()
            .await;

        let client = CydarmClient::new(server.url(), USERNAME, PASSWORD);
        let token = client.generate_bearer_token().await.unwrap();

        assert_eq!(token, BEARER_TOKEN);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bearer_token_with_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/password")
            .match_body(login_body())
            .match_header(
                "authorization",
                format!("Basic {}", to_base64("basic:basic")).as_str(),
            )
            .with_status(200)
            .with_header("Access-Token", BEARER_TOKEN)
            .create_async()
            .await;

        let client = CydarmClient::new(server.url(), USERNAME, PASSWORD)
            .with_basic_auth(BasicCredentials::new("basic", "basic"));
        let token = client.generate_bearer_token().await.unwrap();

        assert_eq!(token, BEARER_TOKEN);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bearer_token_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/password")
            .with_status(401)
            .with_body(r#"{"error": "invalid credentials"}"#)
            .create_async()
            .await;

        let client = CydarmClient::new(server.url(), USERNAME, "wrong");
        let err = client.generate_bearer_token().await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(err.to_string().contains("invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_without_token_header() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/password")
            .with_status(200)
            .create_async()
            .await;

        let client = CydarmClient::new(server.url(), USERNAME, PASSWORD);
        let err = client.generate_bearer_token().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingAccessToken));
    }

    #[tokio::test]
    async fn test_every_authenticated_session_logs_in_again() {
        let mut server = mockito::Server::new_async().await;
        let auth = server
            .mock("POST", "/auth/password")
            .with_status(200)
            .with_header("Access-Token", BEARER_TOKEN)
            .expect(2)
            .create_async()
            .await;

        let client = CydarmClient::new(server.url(), USERNAME, PASSWORD);
        let first = client.create_session(true).await.unwrap();
        let second = client.create_session(true).await.unwrap();

        assert_eq!(first.bearer_token(), Some(BEARER_TOKEN));
        assert_eq!(second.bearer_token(), Some(BEARER_TOKEN));
        auth.assert_async().await;
    }

    #[tokio::test]
    async fn test_rest_call_sends_bearer_header() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/password")
            .with_status(200)
            .with_header("Access-Token", BEARER_TOKEN)
            .create_async()
            .await;
        let mock = server
            .mock("GET", "/case/abc123")
            .match_header("x-cydarm-authz", BEARER_TOKEN)
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"uuid": "abc123"}"#)
            .create_async()
            .await;

        let client = CydarmClient::new(server.url(), USERNAME, PASSWORD);
        let value = client
            .rest_get("/case/abc123", RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(value, json!({"uuid": "abc123"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_raw_reply_keeps_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/password")
            .with_status(200)
            .with_header("Access-Token", BEARER_TOKEN)
            .create_async()
            .await;
        server
            .mock("PUT", "/case/abc123/history")
            .with_status(204)
            .create_async()
            .await;

        let client = CydarmClient::new(server.url(), USERNAME, PASSWORD);
        let raw = client
            .rest_put("/case/abc123/history", RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(raw.status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/password")
            .with_status(200)
            .with_header("Access-Token", BEARER_TOKEN)
            .create_async()
            .await;
        let failing = server
            .mock("GET", "/case/missing")
            .with_status(404)
            .with_body("not found")
            .expect(1)
            .create_async()
            .await;

        let client = CydarmClient::new(server.url(), USERNAME, PASSWORD);
        let err = client
            .rest_get("/case/missing", RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "HTTP 404 Not Found: not found");
        failing.assert_async().await;
    }

    #[tokio::test]
    async fn test_log_fn_receives_request_line() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/password")
            .with_status(200)
            .with_header("Access-Token", BEARER_TOKEN)
            .create_async()
            .await;

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let client = CydarmClient::new(server.url(), USERNAME, PASSWORD)
            .with_basic_auth(BasicCredentials::new("proxy", "proxy-pass"))
            .with_log_fn(move |line| sink.lock().unwrap().push(line.to_string()));

        client.generate_bearer_token().await.unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with(&format!("HTTP POST request to {}/auth/password", server.url())));
        assert!(lines[0].contains("auth=Basic(proxy)"));
        assert!(!lines[0].contains("proxy-pass"));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = CydarmClient::new("https://acme.cydarm.io/cydarm_api/", "u", "p");
        assert_eq!(client.base_url(), "https://acme.cydarm.io/cydarm_api");
    }

    #[test]
    fn test_format_api_error_shapes() {
        let nested = format_api_error(StatusCode::BAD_REQUEST, r#"{"error": {"message": "bad"}}"#);
        assert_eq!(nested.to_string(), "HTTP 400 Bad Request: bad");

        let plain = format_api_error(StatusCode::BAD_REQUEST, r#"{"message": "nope"}"#);
        assert_eq!(plain.to_string(), "HTTP 400 Bad Request: nope");

        let empty = format_api_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(
            empty.to_string(),
            "HTTP 500 Internal Server Error: Internal Server Error"
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let client = CydarmClient::new("https://x", "u", "topsecret");
        assert!(!format!("{:?}", client).contains("topsecret"));
    }
}
