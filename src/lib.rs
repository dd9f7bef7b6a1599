//
//  cydarm-connector
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Cydarm Connector Library
//!
//! A REST client for the Cydarm case-management API and a SOAR action
//! dispatcher built on top of it.
//!
//! ## Overview
//!
//! A SOAR host invokes named actions ("get a case", "add a tag", "create a
//! playbook") with a flat parameter map. This library turns each invocation
//! into an authenticated HTTP call against Cydarm and returns an action result
//! with status, records and a summary.
//!
//! ## Features
//!
//! - **Authentication**: password exchange for a bearer token, optional Basic
//!   auth in front of the API
//! - **Cases**: read, search, create, update, tag, comment, watchers, members
//! - **Playbooks**: playbooks, playbook actions, case playbooks
//! - **Directory**: users and ACLs
//! - **Pagination**: filtered case search walks every page
//! - **Dispatcher**: 24 actions, each with typed parameters
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client and the Cydarm operations
//! - [`auth`]: credential encoding and bearer token headers
//! - [`config`]: connection settings from file, environment and host input
//! - [`connector`]: action table, parameter narrowing, dispatch, results
//! - [`cli`]: command-line interface definitions using clap
//! - [`output`]: terminal output (tables, JSON, status lines)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cydarm_connector::{ConnectorConfig, CydarmConnector};
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ConnectorConfig::load(None)?;
//! let connector = CydarmConnector::from_config(&config)?;
//!
//! let params = json!({"search_string": "phishing"});
//! let result = connector
//!     .handle_action("get_case_quick_search", params.as_object().unwrap())
//!     .await?;
//! println!("{} cases", result.data.len());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// HTTP client for the Cydarm API.
///
/// One executor ([`api::CydarmClient::rest_call`]) backs every operation. Each
/// call logs in again; nothing is cached or retried.
pub mod api;

/// Credential encoding and authentication headers.
pub mod auth;

/// Connection settings.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/cydarm/config.toml`
/// - macOS: `~/Library/Application Support/cydarm/config.toml`
/// - Windows: `%APPDATA%\cydarm\config.toml`
pub mod config;

/// SOAR action dispatch.
pub mod connector;

/// Output formatting for the CLI.
pub mod output;

pub use api::CydarmClient;
pub use cli::Cli;
pub use config::ConnectorConfig;
pub use connector::{ActionResult, CydarmConnector};

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "cydarm";

/// Application version constant, taken from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use cydarm_connector::VERSION;
///
/// println!("cydarm version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication and configuration issues
/// - `8`: Unknown action identifier
pub mod exit_codes {
    /// Successful execution; every action invocation succeeded.
    pub const SUCCESS: i32 = 0;

    /// General error, or at least one action invocation failed.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// The command was invoked with invalid arguments or options.
    /// Use `--help` to see correct usage.
    pub const USAGE: i32 = 2;

    /// Configuration missing or invalid, or the login was rejected.
    pub const AUTH_ERROR: i32 = 4;

    /// The action identifier is not in the action table.
    ///
    /// Run `cydarm actions` for the list of identifiers.
    pub const UNKNOWN_ACTION: i32 = 8;
}
