//
//  cydarm-connector
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Cydarm deployments use two independent authentication layers:
//!
//! - **Basic Authentication**: an optional static `Authorization: Basic ...` header,
//!   typically enforced by a reverse proxy in front of the API.
//! - **Bearer Token**: obtained by exchanging the Cydarm username and password
//!   (each base64 encoded) at `/auth/password`. The token comes back in the
//!   `Access-Token` response header and is sent on later requests as
//!   `x-cydarm-authz`.
//!
//! ## Module Structure
//!
//! - [`token`]: Password login body and bearer header handling
//!
//! ## Example
//!
//! ```rust
//! use cydarm_connector::auth::{to_base64, BasicCredentials};
//!
//! let creds = BasicCredentials::new("proxy-user", "proxy-pass");
//! assert_eq!(creds.header_value(), format!("Basic {}", to_base64("proxy-user:proxy-pass")));
//! ```

mod token;

pub use token::*;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::RequestBuilder;

/// Encodes a string as standard (padded) base64.
///
/// # Example
///
/// ```rust
/// use cydarm_connector::auth::to_base64;
///
/// assert_eq!(to_base64("user"), "dXNlcg==");
/// ```
pub fn to_base64(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

/// Static HTTP Basic credentials attached to every session.
///
/// The password is never included in the `Debug` output, so sessions can be
/// logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// The Basic auth username.
    pub username: String,
    /// The Basic auth password.
    pub password: String,
}

impl BasicCredentials {
    /// Creates a new credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds a pair only when both halves are present and non-empty.
    ///
    /// Mirrors how the asset configuration treats Basic auth: a username
    /// without a password (or the reverse) disables it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cydarm_connector::auth::BasicCredentials;
    ///
    /// assert!(BasicCredentials::from_optional(Some("u"), Some("p")).is_some());
    /// assert!(BasicCredentials::from_optional(Some("u"), Some("")).is_none());
    /// assert!(BasicCredentials::from_optional(None, Some("p")).is_none());
    /// ```
    pub fn from_optional(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        match (username, password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some(Self::new(user, pass))
            }
            _ => None,
        }
    }

    /// The value of the `Authorization` header these credentials produce.
    pub fn header_value(&self) -> String {
        format!(
            "Basic {}",
            to_base64(&format!("{}:{}", self.username, self.password))
        )
    }

    /// Adds the `Authorization: Basic` header to a request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base64() {
        assert_eq!(to_base64("pass"), "cGFzcw==");
        assert_eq!(to_base64(""), "");
    }

    #[test]
    fn test_basic_header_value() {
        let creds = BasicCredentials::new("basic", "basic");
        assert_eq!(creds.header_value(), "Basic YmFzaWM6YmFzaWM=");
    }

    #[test]
    fn test_debug_masks_password() {
        let creds = BasicCredentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
