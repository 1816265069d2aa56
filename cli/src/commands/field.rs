// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Field value commands

use anyhow::Result;
use clap::Subcommand;
use serde_json::{Map, Value};
use std::path::PathBuf;

use secretsmanager_core::domain::schema::FIELD_DATA_SOURCE;

use super::{into_state, load_provider};

#[derive(Subcommand)]
pub enum FieldCommand {
    /// Print the value addressed by a notation such as `<UID>/field/login`
    Get {
        #[arg(value_name = "NOTATION")]
        path: String,

        /// Record title substituted for a `*` UID
        #[arg(short, long)]
        title: Option<String>,
    },
}

pub async fn handle_command(command: FieldCommand, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        FieldCommand::Get { path, title } => get(config_path, path, title).await,
    }
}

async fn get(config_path: Option<PathBuf>, path: String, title: Option<String>) -> Result<()> {
    let provider = load_provider(config_path)?;

    let mut config = Map::new();
    config.insert("path".to_string(), Value::String(path));
    if let Some(title) = title {
        config.insert("title".to_string(), Value::String(title));
    }
    let state = into_state(provider.read_data_source(FIELD_DATA_SOURCE, config).await)?;
    println!(
        "{}",
        state.get("value").and_then(Value::as_str).unwrap_or_default()
    );
    Ok(())
}
