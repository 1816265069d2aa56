// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Folder commands
//!
//! Commands: list, get

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use secretsmanager_core::domain::schema::{FOLDERS_DATA_SOURCE, FOLDER_DATA_SOURCE};

use super::{into_state, load_provider, print_state};

#[derive(Subcommand)]
pub enum FolderCommand {
    /// List every folder visible to the application
    List,

    /// Show the single folder matching UID and/or name
    Get {
        #[arg(long)]
        uid: Option<String>,

        #[arg(long)]
        name: Option<String>,

        /// Restrict the match to children of this folder
        #[arg(long)]
        parent_uid: Option<String>,
    },
}

pub async fn handle_command(command: FolderCommand, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        FolderCommand::List => list(config_path).await,
        FolderCommand::Get {
            uid,
            name,
            parent_uid,
        } => get(config_path, uid, name, parent_uid).await,
    }
}

async fn list(config_path: Option<PathBuf>) -> Result<()> {
    let provider = load_provider(config_path)?;
    let state = into_state(provider.read_data_source(FOLDERS_DATA_SOURCE, Map::new()).await)?;

    let folders = state
        .get("folders")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if folders.is_empty() {
        println!("{}", "No folders found".dimmed());
        return Ok(());
    }

    println!(
        "{:<24} {:<24} {:<7} {}",
        "UID".bold(),
        "PARENT".bold(),
        "SHARED".bold(),
        "NAME".bold()
    );
    for folder in &folders {
        let text = |key: &str| folder.get(key).and_then(Value::as_str).unwrap_or("").to_string();
        let shared = folder.get("shared").and_then(Value::as_bool).unwrap_or(false);
        println!(
            "{:<24} {:<24} {:<7} {}",
            text("uid"),
            text("parent_uid"),
            if shared { "yes" } else { "no" },
            text("name")
        );
    }
    Ok(())
}

async fn get(
    config_path: Option<PathBuf>,
    uid: Option<String>,
    name: Option<String>,
    parent_uid: Option<String>,
) -> Result<()> {
    if uid.is_none() && name.is_none() {
        anyhow::bail!("at least one of --uid or --name is required");
    }
    let provider = load_provider(config_path)?;

    let mut config = Map::new();
    for (key, value) in [("uid", uid), ("name", name), ("parent_uid", parent_uid)] {
        if let Some(value) = value {
            config.insert(key.to_string(), Value::String(value));
        }
    }
    let state = into_state(provider.read_data_source(FOLDER_DATA_SOURCE, config).await)?;
    print_state(&state)
}
