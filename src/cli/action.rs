//
//  cydarm-connector
//  cli/action.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Single action command
//!
//! Runs one action with parameters given on the command line, without a host
//! input file.
//!
//! ## Examples
//!
//! ```bash
//! # Fetch a case
//! cydarm action get_case -F case_uuid=00e99897-f141-4819-a371-e3cd03290cd9
//!
//! # Create a case; -F values are typed, so severity is a number
//! cydarm action create_case -F description="Phishing report" -F org=Acme -F severity=3
//!
//! # Keep a numeric-looking value as a string
//! cydarm action add_case_tag -F case_uuid=... --raw-field tag_value=2024
//! ```

use anyhow::Result;
use clap::Args;
use console::style;
use serde_json::{Map, Value};

use crate::connector::ActionId;
use crate::output::{OutputFormat, OutputWriter};

use super::{build_connector, resolve_config, CommandError, GlobalOptions};

/// Run one action
#[derive(Args, Debug)]
pub struct ActionCommand {
    /// Action identifier (see `cydarm actions`)
    pub identifier: String,

    /// Parameters as key=value; values are parsed like JSON scalars, arrays and objects
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Parameters as key=value; values stay strings
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,
}

impl ActionCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let action: ActionId = self.identifier.parse()?;
        let params = self.build_params()?;

        let config = resolve_config(global, None)?;
        let (connector, spinner) = build_connector(&config, global)?;

        let result = connector.handle_action(action.identifier(), &params).await?;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let writer = OutputWriter::new(OutputFormat::from_json_flag(global.json));
        if writer.is_json() {
            writer.write_json(&result)?;
        } else if result.is_success() {
            let count = result.data.len();
            writer.write_success(&format!(
                "{} succeeded ({} record{})",
                style(action).cyan(),
                count,
                if count == 1 { "" } else { "s" }
            ));
            if let Some(message) = &result.message {
                writer.write_info(message);
            }
            for record in &result.data {
                writer.write_json(record)?;
            }
        } else {
            writer.write_error(result.message.as_deref().unwrap_or("action failed"));
        }

        if !result.is_success() {
            return Err(CommandError::ActionsFailed {
                failed: 1,
                total: 1,
            }
            .into());
        }
        Ok(())
    }

    /// Collects `-F` then `--raw-field` values; later keys win.
    fn build_params(&self) -> Result<Map<String, Value>, CommandError> {
        let mut params = Map::new();
        for field in &self.field {
            let (key, value) = parse_field(field)?;
            params.insert(key, value);
        }
        for field in &self.raw_field {
            let (key, value) = parse_raw_field(field)?;
            params.insert(key, Value::String(value));
        }
        Ok(params)
    }
}

fn parse_raw_field(field: &str) -> Result<(String, String), CommandError> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(CommandError::Usage(format!(
            "Invalid field format: {}. Expected key=value",
            field
        ))),
    }
}

/// Splits `key=value` and types the value like a JSON literal.
fn parse_field(field: &str) -> Result<(String, Value), CommandError> {
    let (key, value_str) = parse_raw_field(field)?;

    let value = if value_str == "true" {
        Value::Bool(true)
    } else if value_str == "false" {
        Value::Bool(false)
    } else if value_str == "null" {
        Value::Null
    } else if let Ok(n) = value_str.parse::<i64>() {
        Value::Number(n.into())
    } else if let Ok(n) = value_str.parse::<f64>() {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::String(value_str.clone()))
    } else if value_str.starts_with('[') || value_str.starts_with('{') {
        serde_json::from_str(&value_str).unwrap_or(Value::String(value_str.clone()))
    } else {
        Value::String(value_str)
    };

    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_types_values() {
        assert_eq!(parse_field("severity=3").unwrap(), ("severity".into(), json!(3)));
        assert_eq!(parse_field("editable=false").unwrap(), ("editable".into(), json!(false)));
        assert_eq!(parse_field("acl=null").unwrap(), ("acl".into(), Value::Null));
        assert_eq!(
            parse_field("tags=[\"a\",\"b\"]").unwrap(),
            ("tags".into(), json!(["a", "b"]))
        );
        assert_eq!(
            parse_field("description=Phish = bad").unwrap(),
            ("description".into(), json!("Phish = bad"))
        );
    }

    #[test]
    fn test_parse_field_rejects_missing_equals() {
        assert!(matches!(parse_field("case_uuid"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_field("=value"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_raw_fields_stay_strings_and_win() {
        let cmd = ActionCommand {
            identifier: "add_case_tag".to_string(),
            field: vec!["case_uuid=c1".to_string(), "tag_value=2024".to_string()],
            raw_field: vec!["tag_value=2024".to_string()],
        };
        let params = cmd.build_params().unwrap();
        assert_eq!(params["case_uuid"], json!("c1"));
        assert_eq!(params["tag_value"], json!("2024"));
    }
}
