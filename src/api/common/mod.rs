//
//  cydarm-connector
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Cydarm REST API
//!
//! This module provides the error type shared by every Cydarm API operation and
//! the pagination structures used by the filtered case search.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`CasePage`] - A single page of the filtered case search
//! - [`CaseFilter`] - Filter and page size for the filtered case search
//!
//! # Example
//!
//! ```rust
//! use cydarm_connector::api::common::ApiError;
//! use reqwest::StatusCode;
//!
//! fn describe(err: &ApiError) -> &'static str {
//!     match err {
//!         ApiError::Http { status, .. } if *status == StatusCode::UNAUTHORIZED => "bad credentials",
//!         ApiError::Http { .. } => "rejected by Cydarm",
//!         ApiError::Network(_) => "network problem",
//!         _ => "other",
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - Nothing in this crate retries; every error is surfaced to the caller as-is
//! - `Network` converts automatically from `reqwest::Error`

use reqwest::StatusCode;
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Unified error type for all Cydarm API operations.
///
/// # Variants
///
/// | Variant | Description |
/// |---------|-------------|
/// | `Http` | The server answered with a non-2xx status |
/// | `Network` | Connection, TLS or body read failure |
/// | `MissingAccessToken` | Login succeeded but no `Access-Token` header came back |
/// | `InvalidHeader` | A credential could not be encoded as a header value |
/// | `Decode` | A response body was not the JSON we expected |
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-success status code.
    ///
    /// The message is extracted from the JSON error body when possible,
    /// otherwise it is the raw body text.
    #[error("HTTP {status}: {message}")]
    Http {
        /// The HTTP status returned by Cydarm
        status: StatusCode,
        /// Human readable reason
        message: String,
    },

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The password exchange returned 2xx without an `Access-Token` header.
    #[error("Authentication response did not include an Access-Token header")]
    MissingAccessToken,

    /// A header value (token or credential) contained bytes HTTP cannot carry.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// A response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Returns the HTTP status for `Http` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(err) => err.status(),
            _ => None,
        }
    }

    /// Whether this error came out of authentication (401/403 or a missing token).
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::MissingAccessToken)
            || matches!(
                self.status(),
                Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
            )
    }
}
