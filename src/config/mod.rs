//
//  cydarm-connector
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Connection settings for a Cydarm instance. The keys are the same ones a SOAR
//! host stores in its asset configuration, so a host `config` object can be
//! deserialized directly into [`ConnectorConfig`].
//!
//! ## Sources
//!
//! Lowest to highest precedence:
//!
//! 1. TOML file (`--config <path>`, or the default location below)
//! 2. Environment variables
//! 3. The `config` object of a host input file
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/cydarm/config.toml`
//! - **macOS**: `~/Library/Application Support/cydarm/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\cydarm\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! cydarm_api_base_url = "https://acme.cydarm.io/cydarm_api"
//! cydarm_username = "soar-bot"
//! cydarm_password = "s3cret"
//!
//! # Optional; only used when both are set
//! basic_auth_username = "proxy"
//! basic_auth_password = "proxy-pass"
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Key |
//! |----------|-----|
//! | `CYDARM_API_BASE_URL` | `cydarm_api_base_url` |
//! | `CYDARM_USERNAME` | `cydarm_username` |
//! | `CYDARM_PASSWORD` | `cydarm_password` |
//! | `CYDARM_BASIC_AUTH_USERNAME` | `basic_auth_username` |
//! | `CYDARM_BASIC_AUTH_PASSWORD` | `basic_auth_password` |

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::api::CydarmClient;
use crate::auth::BasicCredentials;

/// Every configuration key, in display order.
pub const CONFIG_KEYS: [&str; 5] = [
    "cydarm_api_base_url",
    "cydarm_username",
    "cydarm_password",
    "basic_auth_username",
    "basic_auth_password",
];

const ENV_VARS: [(&str, &str); 5] = [
    ("CYDARM_API_BASE_URL", "cydarm_api_base_url"),
    ("CYDARM_USERNAME", "cydarm_username"),
    ("CYDARM_PASSWORD", "cydarm_password"),
    ("CYDARM_BASIC_AUTH_USERNAME", "basic_auth_username"),
    ("CYDARM_BASIC_AUTH_PASSWORD", "basic_auth_password"),
];

/// Errors raised while loading or applying configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required key has no value.
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    /// The base URL does not parse.
    #[error("Invalid Cydarm API base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The base URL is not http(s).
    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    /// `config set` / `config get` with a key we do not know.
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// An explicitly requested config file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// No platform config directory could be determined.
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write configuration file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid host configuration: {0}")]
    Host(#[from] serde_json::Error),
}

/// Connection settings for one Cydarm instance.
///
/// Every field is optional so partial sources can be layered with
/// [`merge`](Self::merge); [`build_client`](Self::build_client) checks that
/// the required ones ended up set.
///
/// # Example
///
/// ```rust
/// use cydarm_connector::config::ConnectorConfig;
///
/// let config: ConnectorConfig = toml::from_str(r#"
///     cydarm_api_base_url = "https://acme.cydarm.io/cydarm_api"
///     cydarm_username = "bot"
///     cydarm_password = "pw"
/// "#).unwrap();
///
/// let client = config.build_client().unwrap();
/// assert_eq!(client.base_url(), "https://acme.cydarm.io/cydarm_api");
/// assert!(client.basic_auth().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// API base URL, e.g. `https://acme.cydarm.io/cydarm_api`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cydarm_api_base_url: Option<String>,

    /// Cydarm username for the bearer token exchange
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cydarm_username: Option<String>,

    /// Cydarm password for the bearer token exchange
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cydarm_password: Option<String>,

    /// Optional Basic auth username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth_username: Option<String>,

    /// Optional Basic auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth_password: Option<String>,
}

impl ConnectorConfig {
    /// Loads the TOML file and applies environment overrides.
    ///
    /// With `path == None` the default location is used if it exists; a
    /// missing default file is not an error. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_file = match path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(from_file.with_env(|name| std::env::var(name).ok()))
    }

    /// Reads one TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Reads a host asset configuration object.
    ///
    /// Unknown keys (hosts add their own bookkeeping entries) are ignored.
    pub fn from_host_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Writes this configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Default config file path.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME).ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Empty variables are ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in ENV_VARS {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                // ENV_VARS only names known keys
                let _ = self.set(key, value);
            }
        }
        self
    }

    /// Layers `other` on top of `self`: every value set in `other` wins.
    pub fn merge(self, other: ConnectorConfig) -> Self {
        Self {
            cydarm_api_base_url: other.cydarm_api_base_url.or(self.cydarm_api_base_url),
            cydarm_username: other.cydarm_username.or(self.cydarm_username),
            cydarm_password: other.cydarm_password.or(self.cydarm_password),
            basic_auth_username: other.basic_auth_username.or(self.basic_auth_username),
            basic_auth_password: other.basic_auth_password.or(self.basic_auth_password),
        }
    }

    /// Reads a value by key.
    pub fn get(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        let value = match key {
            "cydarm_api_base_url" => &self.cydarm_api_base_url,
            "cydarm_username" => &self.cydarm_username,
            "cydarm_password" => &self.cydarm_password,
            "basic_auth_username" => &self.basic_auth_username,
            "basic_auth_password" => &self.basic_auth_password,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value.as_deref())
    }

    /// Sets a value by key.
    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        let slot = match key {
            "cydarm_api_base_url" => &mut self.cydarm_api_base_url,
            "cydarm_username" => &mut self.cydarm_username,
            "cydarm_password" => &mut self.cydarm_password,
            "basic_auth_username" => &mut self.basic_auth_username,
            "basic_auth_password" => &mut self.basic_auth_password,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        *slot = Some(value);
        Ok(())
    }

    /// Basic credentials, present only when both halves are non-empty.
    pub fn basic_auth(&self) -> Option<BasicCredentials> {
        BasicCredentials::from_optional(
            self.basic_auth_username.as_deref(),
            self.basic_auth_password.as_deref(),
        )
    }

    /// Whether a username is configured without a password.
    pub fn needs_password(&self) -> bool {
        self.cydarm_username.as_deref().is_some_and(|u| !u.is_empty())
            && self.cydarm_password.as_deref().map_or(true, str::is_empty)
    }

    /// Checks the base URL and returns it.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .cydarm_api_base_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("cydarm_api_base_url"))?;

        let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Builds an API client from these settings.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] when the base URL, username or password is unset
    /// - [`ConfigError::InvalidUrl`] / [`ConfigError::UnsupportedScheme`] for a bad base URL
    pub fn build_client(&self) -> Result<CydarmClient, ConfigError> {
        // keep the configured spelling; Url normalises an empty path to "/"
        self.base_url()?;
        let base_url = self.cydarm_api_base_url.clone().unwrap_or_default();
        let username = self
            .cydarm_username
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("cydarm_username"))?;
        let password = self
            .cydarm_password
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("cydarm_password"))?;

        let mut client = CydarmClient::new(base_url, username, password);
        if let Some(basic) = self.basic_auth() {
            client = client.with_basic_auth(basic);
        }
        Ok(client)
    }

    /// A copy with both passwords replaced, for display.
    pub fn masked(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "********".to_string());
        Self {
            cydarm_password: mask(&self.cydarm_password),
            basic_auth_password: mask(&self.basic_auth_password),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full() -> ConnectorConfig {
        ConnectorConfig {
            cydarm_api_base_url: Some("https://acme.cydarm.io/cydarm_api".to_string()),
            cydarm_username: Some("bot".to_string()),
            cydarm_password: Some("pw".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_client_requires_password() {
        let config = ConnectorConfig {
            cydarm_password: None,
            ..full()
        };
        assert!(matches!(
            config.build_client(),
            Err(ConfigError::Missing("cydarm_password"))
        ));
        assert!(config.needs_password());
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ConnectorConfig {
            cydarm_api_base_url: Some("not a url".to_string()),
            ..full()
        };
        assert!(matches!(config.build_client(), Err(ConfigError::InvalidUrl { .. })));

        let ftp = ConnectorConfig {
            cydarm_api_base_url: Some("ftp://acme.cydarm.io".to_string()),
            ..full()
        };
        assert!(matches!(ftp.build_client(), Err(ConfigError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_basic_auth_needs_both_fields() {
        let half = ConnectorConfig {
            basic_auth_username: Some("proxy".to_string()),
            ..full()
        };
        assert!(half.basic_auth().is_none());
        assert!(half.build_client().unwrap().basic_auth().is_none());

        let both = ConnectorConfig {
            basic_auth_password: Some("proxy-pass".to_string()),
            ..half
        };
        assert_eq!(
            both.build_client().unwrap().basic_auth(),
            Some(&BasicCredentials::new("proxy", "proxy-pass"))
        );
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("CYDARM_USERNAME", "env-user"),
            ("CYDARM_PASSWORD", ""),
        ]
        .into_iter()
        .collect();

        let config = full().with_env(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.cydarm_username.as_deref(), Some("env-user"));
        // empty variables do not clobber
        assert_eq!(config.cydarm_password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_merge_prefers_other() {
        let host = ConnectorConfig {
            cydarm_username: Some("host-user".to_string()),
            ..Default::default()
        };
        let merged = full().merge(host);
        assert_eq!(merged.cydarm_username.as_deref(), Some("host-user"));
        assert_eq!(merged.cydarm_password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_host_value_ignores_unknown_keys() {
        let value = serde_json::json!({
            "cydarm_api_base_url": "https://x.cydarm.io/api",
            "cydarm_username": "u",
            "cydarm_password": "p",
            "directory": "/opt/apps/cydarm",
            "main_module": "cydarm_connector.py"
        });
        let config = ConnectorConfig::from_host_value(&value).unwrap();
        assert_eq!(config.cydarm_username.as_deref(), Some("u"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        full().save(&path).unwrap();

        let loaded = ConnectorConfig::from_file(&path).unwrap();
        assert_eq!(loaded, full());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            ConnectorConfig::load(Some(&missing)),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_get_set_unknown_key() {
        let mut config = ConnectorConfig::default();
        assert!(matches!(
            config.set("editor", "vim".to_string()),
            Err(ConfigError::UnknownKey(_))
        ));
        config.set("cydarm_username", "bot".to_string()).unwrap();
        assert_eq!(config.get("cydarm_username").unwrap(), Some("bot"));
    }

    #[test]
    fn test_masked_hides_passwords() {
        let masked = ConnectorConfig {
            basic_auth_password: Some("proxy-pass".to_string()),
            ..full()
        }
        .masked();
        assert_eq!(masked.cydarm_password.as_deref(), Some("********"));
        assert_eq!(masked.basic_auth_password.as_deref(), Some("********"));
        assert_eq!(masked.cydarm_username.as_deref(), Some("bot"));
    }
}
