//
//  cydarm-connector
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! `show` prints the effective settings (file plus environment), `get` and
//! `set` read and write single keys of the configuration file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::config::{ConnectorConfig, CONFIG_KEYS};
use crate::output::{OutputFormat, OutputWriter, TableBuilder};

use super::GlobalOptions;

/// Manage connection settings
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Show the effective configuration (passwords masked)
    #[command(visible_alias = "list")]
    Show,

    /// Get a value from the configuration file
    Get(GetArgs),

    /// Set a value in the configuration file
    Set(SetArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Show => self.show(global),
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    fn file_path(global: &GlobalOptions) -> Result<PathBuf> {
        match &global.config {
            Some(path) => Ok(path.clone()),
            None => Ok(ConnectorConfig::config_path()?),
        }
    }

    /// The file alone, without environment overrides; a missing file is empty.
    fn load_file(path: &Path) -> Result<ConnectorConfig> {
        if path.exists() {
            Ok(ConnectorConfig::from_file(path)?)
        } else {
            Ok(ConnectorConfig::default())
        }
    }

    fn show(&self, global: &GlobalOptions) -> Result<()> {
        let config = ConnectorConfig::load(global.config.as_deref())?.masked();
        let writer = OutputWriter::new(OutputFormat::from_json_flag(global.json));

        if writer.is_json() {
            return writer.write_json(&config);
        }

        let mut rows = Vec::new();
        for key in CONFIG_KEYS {
            let value = config.get(key)?.unwrap_or("").to_string();
            rows.push([key.to_string(), value]);
        }
        TableBuilder::new()
            .color(writer.color_enabled())
            .headers(["KEY", "VALUE"])
            .rows(rows)
            .print();
        Ok(())
    }

    fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let config = Self::load_file(&Self::file_path(global)?)?;
        let value = config.get(&args.key)?;

        if global.json {
            let result = serde_json::json!({
                "key": args.key,
                "value": value,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if let Some(v) = value {
            println!("{}", v);
        }
        Ok(())
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let path = Self::file_path(global)?;
        let mut config = Self::load_file(&path)?;
        config.set(&args.key, args.value.clone())?;
        if args.key == "cydarm_api_base_url" {
            config.base_url()?;
        }
        config.save(&path)?;

        let shown = if args.key.ends_with("password") {
            "********"
        } else {
            args.value.as_str()
        };

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "key": args.key,
                "value": shown,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                style(&args.key).cyan(),
                shown
            );
        }
        Ok(())
    }

    fn path(&self, global: &GlobalOptions) -> Result<()> {
        let path = Self::file_path(global)?;

        if global.json {
            let result = serde_json::json!({
                "path": path.display().to_string(),
                "exists": path.exists(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", path.display());
        }
        Ok(())
    }
}
