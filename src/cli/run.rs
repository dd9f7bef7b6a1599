//
//  cydarm-connector
//  cli/run.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Host input runner
//!
//! Reads the JSON document a SOAR host hands its connectors and runs the
//! action once per parameter set.
//!
//! ## Input
//!
//! ```json
//! {
//!   "identifier": "get_case",
//!   "config": {
//!     "cydarm_api_base_url": "https://acme.cydarm.io/cydarm_api",
//!     "cydarm_username": "soar-bot",
//!     "cydarm_password": "s3cret"
//!   },
//!   "parameters": [{"case_uuid": "00e99897-f141-4819-a371-e3cd03290cd9"}]
//! }
//! ```
//!
//! The `config` object is layered over the configuration file and environment.
//! The results are printed as a JSON array, one entry per parameter set.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::ConnectorConfig;
use crate::connector::{ActionId, ActionResult};
use crate::output::write_json;

use super::{build_connector, resolve_config, CommandError, GlobalOptions};

/// Run an action from a host input file
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Host input file (- for stdin)
    pub input: String,
}

/// A host input document.
#[derive(Debug, Clone, Deserialize)]
pub struct HostInput {
    /// Action identifier
    pub identifier: String,

    /// Asset configuration, layered over file and environment settings
    #[serde(default)]
    pub config: Option<Value>,

    /// One parameter map per invocation
    #[serde(default)]
    pub parameters: Vec<Map<String, Value>>,
}

impl HostInput {
    /// Parses a host input document.
    pub fn from_json(text: &str) -> Result<Self, CommandError> {
        serde_json::from_str(text)
            .map_err(|e| CommandError::Usage(format!("Invalid host input: {}", e)))
    }

    /// The parameter sets to run; an empty list runs once with no parameters.
    pub fn parameter_sets(&self) -> Vec<Map<String, Value>> {
        if self.parameters.is_empty() {
            vec![Map::new()]
        } else {
            self.parameters.clone()
        }
    }
}

impl RunCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let input = HostInput::from_json(&self.read_input()?)?;

        // unknown identifiers fail before any configuration is needed
        let action: ActionId = input.identifier.parse()?;

        let host_config = input
            .config
            .as_ref()
            .map(ConnectorConfig::from_host_value)
            .transpose()?;
        let config = resolve_config(global, host_config)?;
        let (connector, spinner) = build_connector(&config, global)?;

        let mut results: Vec<ActionResult> = Vec::new();
        for params in input.parameter_sets() {
            results.push(connector.handle_action(action.identifier(), &params).await?);
        }

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        write_json(&results)?;

        let failed = results.iter().filter(|r| !r.is_success()).count();
        if failed > 0 {
            return Err(CommandError::ActionsFailed {
                failed,
                total: results.len(),
            }
            .into());
        }
        Ok(())
    }

    fn read_input(&self) -> Result<String> {
        if self.input == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            return Ok(buffer);
        }
        std::fs::read_to_string(Path::new(&self.input))
            .with_context(|| format!("Failed to read input file {}", self.input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_host_input_parses() {
        let input = HostInput::from_json(
            r#"{
                "identifier": "get_case",
                "config": {"cydarm_api_base_url": "https://x", "directory": "/opt"},
                "parameters": [{"case_uuid": "a"}, {"case_uuid": "b"}]
            }"#,
        )
        .unwrap();

        assert_eq!(input.identifier, "get_case");
        assert_eq!(input.parameter_sets().len(), 2);
        assert_eq!(input.parameter_sets()[1]["case_uuid"], json!("b"));

        let config = ConnectorConfig::from_host_value(input.config.as_ref().unwrap()).unwrap();
        assert_eq!(config.cydarm_api_base_url.as_deref(), Some("https://x"));
    }

    #[test]
    fn test_empty_parameters_run_once() {
        let input = HostInput::from_json(r#"{"identifier": "test_connectivity"}"#).unwrap();
        assert!(input.config.is_none());
        assert_eq!(input.parameter_sets(), vec![Map::new()]);
    }

    #[test]
    fn test_missing_identifier_is_a_usage_error() {
        let err = HostInput::from_json(r#"{"parameters": []}"#).unwrap_err();
        assert!(matches!(err, CommandError::Usage(msg) if msg.contains("identifier")));
    }
}
