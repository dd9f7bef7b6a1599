//
//  cydarm-connector
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cydarm_connector::cli::{Cli, Commands, CommandError};
use cydarm_connector::config::ConfigError;
use cydarm_connector::connector::ConnectorError;
use cydarm_connector::exit_codes;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    let result = run(cli).await;

    // Handle result and exit
    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code_for(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("CYDARM_DEBUG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Maps an error to the process exit code
fn exit_code_for(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ConnectorError>().is_some() {
        exit_codes::UNKNOWN_ACTION
    } else if error.downcast_ref::<ConfigError>().is_some() {
        exit_codes::AUTH_ERROR
    } else if let Some(CommandError::Usage(_)) = error.downcast_ref::<CommandError>() {
        exit_codes::USAGE
    } else {
        exit_codes::ERROR
    }
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(cmd) => cmd.run(&cli.global).await,
        Commands::Action(cmd) => cmd.run(&cli.global).await,
        Commands::Actions(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("cydarm version {}", cydarm_connector::VERSION);
            Ok(())
        }
    }
}
