//
//  cydarm-connector
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod action;
mod actions;
mod completion;
mod config;
mod run;

pub use action::ActionCommand;
pub use actions::ActionsCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use run::{HostInput, RunCommand};

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use crate::config::ConnectorConfig;
use crate::connector::CydarmConnector;
use crate::output::truncate;

/// Cydarm connector - run SOAR actions against Cydarm from the command line
#[derive(Parser, Debug)]
#[command(
    name = "cydarm",
    version,
    about = "Run Cydarm SOAR actions from the command line",
    long_about = "cydarm drives the Cydarm case-management API.\n\n\
                  It runs the same actions a SOAR host would, either from a host input \
                  file or one at a time with key=value parameters.",
    propagate_version = true,
    after_help = "Use 'cydarm <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, short = 'c', global = true, env = "CYDARM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long, global = true, env = "CYDARM_NO_PROMPT")]
    pub no_prompt: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an action from a host input file
    Run(RunCommand),

    /// Run one action with key=value parameters
    #[command(visible_alias = "a")]
    Action(ActionCommand),

    /// List supported actions
    #[command(visible_alias = "ls")]
    Actions(ActionsCommand),

    /// Manage connection settings
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}

/// Command failures that carry their own exit code.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Malformed arguments or input
    #[error("{0}")]
    Usage(String),

    /// At least one action invocation returned a failed result
    #[error("{failed} of {total} action invocation(s) failed")]
    ActionsFailed { failed: usize, total: usize },
}

/// Loads the effective configuration.
///
/// File and environment first, then `host` on top. Prompts for the Cydarm
/// password when a username has none and a user is at the terminal.
pub(crate) fn resolve_config(
    global: &GlobalOptions,
    host: Option<ConnectorConfig>,
) -> Result<ConnectorConfig> {
    let mut config = ConnectorConfig::load(global.config.as_deref())?;
    if let Some(host) = host {
        config = config.merge(host);
    }

    if config.needs_password() && !global.no_prompt && console::user_attended_stderr() {
        let username = config.cydarm_username.clone().unwrap_or_default();
        let password = Password::new()
            .with_prompt(format!("Cydarm password for {}", username))
            .interact()?;
        config.cydarm_password = Some(password);
    }

    Ok(config)
}

/// Builds the dispatcher, with a spinner showing progress on interactive
/// terminals.
pub(crate) fn build_connector(
    config: &ConnectorConfig,
    global: &GlobalOptions,
) -> Result<(CydarmConnector, Option<ProgressBar>)> {
    let connector = CydarmConnector::from_config(config)?;

    if global.json || !console::user_attended_stderr() {
        return Ok((connector, None));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let sink = spinner.clone();
    let connector = connector.with_progress(move |message| sink.set_message(truncate(message, 100)));
    Ok((connector, Some(spinner)))
}
