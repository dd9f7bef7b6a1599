//
//  cydarm-connector
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for Cydarm's REST API.
//!
//! ## Architecture
//!
//! - [`client`]: Client settings, session factory and the request executor
//! - [`session`]: A single HTTP session with its auth headers
//! - [`cases`]: Case, tag, comment, search and case-playbook operations
//! - [`playbooks`]: Playbook, playbook action and action-instance operations
//! - [`directory`]: User and ACL lookups
//! - [`common`]: Error type and pagination
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cydarm_connector::api::CydarmClient;
//!
//! # async fn example() -> Result<(), cydarm_connector::api::ApiError> {
//! let client = CydarmClient::new("https://acme.cydarm.io/cydarm_api", "analyst", "s3cret");
//! let user = client.get_user("901ab104-fb6d-498b-b456-dabb1c2dfdac").await?;
//! println!("{}", user["username"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`ApiError`]. Non-2xx responses become
//! `ApiError::Http` with the message pulled out of the error body.

/// Client settings, session factory and request executor.
pub mod client;

/// HTTP sessions.
pub mod session;

/// Case operations.
pub mod cases;

/// Playbook operations.
pub mod playbooks;

/// User and ACL lookups.
pub mod directory;

/// Errors and pagination shared by every endpoint.
pub mod common;

pub use cases::{CommentData, NewCase};
pub use client::{CydarmClient, LogFn, RawResponse, Reply, RequestOptions};
pub use common::{ApiError, CaseFilter, CasePage};
pub use playbooks::AtcFields;
pub use session::Session;
