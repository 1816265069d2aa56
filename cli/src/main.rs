// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Secrets Manager Provider CLI
//!
//! The `secretsmanager` binary inspects a provider configuration and the
//! vault it points at, using the same code paths the provider runs.
//!
//! ## Commands
//!
//! - `secretsmanager config show|validate|generate` - Configuration management
//! - `secretsmanager record get|list` - Record lookups and projections
//! - `secretsmanager folder list|get` - Folder tree
//! - `secretsmanager field get` - Notation value lookup
//! - `secretsmanager uid validate|generate` - Record UID helpers
//! - `secretsmanager password generate` - Password generation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use secretsmanager_cli::commands::{
    self, ConfigCommand, FieldCommand, FolderCommand, PasswordCommand, RecordCommand, UidCommand,
};

/// Secrets Manager provider tooling
#[derive(Parser)]
#[command(name = "secretsmanager")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "SECRETSMANAGER_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SECRETSMANAGER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Record lookups
    #[command(name = "record")]
    Record {
        #[command(subcommand)]
        command: RecordCommand,
    },

    /// Folder lookups
    #[command(name = "folder")]
    Folder {
        #[command(subcommand)]
        command: FolderCommand,
    },

    /// Field value lookups
    #[command(name = "field")]
    Field {
        #[command(subcommand)]
        command: FieldCommand,
    },

    /// Record UID helpers
    #[command(name = "uid")]
    Uid {
        #[command(subcommand)]
        command: UidCommand,
    },

    /// Password generation
    #[command(name = "password")]
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Record { command }) => {
            commands::record::handle_command(command, cli.config).await
        }
        Some(Commands::Folder { command }) => {
            commands::folder::handle_command(command, cli.config).await
        }
        Some(Commands::Field { command }) => {
            commands::field::handle_command(command, cli.config).await
        }
        Some(Commands::Uid { command }) => commands::uid::handle_command(command).await,
        Some(Commands::Password { command }) => {
            commands::password::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
