// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Record commands
//!
//! Commands: get, list

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use secretsmanager_core::application::lookup::RecordLookup;
use secretsmanager_core::domain::record::RecordType;
use secretsmanager_core::domain::schema::PROVIDER_NAME;

use super::{into_state, load_provider, print_state};

#[derive(Subcommand)]
pub enum RecordCommand {
    /// Show one record, by UID or by title
    Get {
        /// Record UID, or `*` to look up by --title
        #[arg(value_name = "UID", default_value = "*")]
        uid: String,

        /// Record title (used when UID is `*`)
        #[arg(short, long)]
        title: Option<String>,

        /// Project through the data source of this record type (e.g. login, sshKeys)
        #[arg(long = "as", value_name = "TYPE")]
        as_type: Option<String>,
    },

    /// List accessible records
    List {
        /// Only records of this type
        #[arg(long = "type", value_name = "TYPE")]
        record_type: Option<String>,
    },
}

pub async fn handle_command(command: RecordCommand, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        RecordCommand::Get {
            uid,
            title,
            as_type,
        } => get(config_path, uid, title, as_type).await,
        RecordCommand::List { record_type } => list(config_path, record_type).await,
    }
}

/// Data source type name for a vault record type name
fn data_source_name(record_type: &str) -> Result<String> {
    let record_type = RecordType::parse(record_type)
        .with_context(|| format!("unknown record type '{}'", record_type))?;
    Ok(format!("{}_{}", PROVIDER_NAME, record_type.snake_name()))
}

async fn get(
    config_path: Option<PathBuf>,
    uid: String,
    title: Option<String>,
    as_type: Option<String>,
) -> Result<()> {
    let provider = load_provider(config_path)?;
    let title = title.unwrap_or_default();

    if let Some(record_type) = as_type {
        let mut config = Map::new();
        config.insert("path".to_string(), Value::String(uid));
        config.insert("title".to_string(), Value::String(title));
        let result = provider
            .read_data_source(&data_source_name(&record_type)?, config)
            .await;
        return print_state(&into_state(result)?);
    }

    let lookup = RecordLookup::new(provider.client().clone());
    let record = lookup.get_record(&uid, &title).await?;
    let json = serde_json::to_string_pretty(&record).context("Failed to render record")?;
    println!("{}", json);
    Ok(())
}

async fn list(config_path: Option<PathBuf>, record_type: Option<String>) -> Result<()> {
    let provider = load_provider(config_path)?;
    let lookup = RecordLookup::new(provider.client().clone());

    let records = lookup.all_records().await?;
    let records: Vec<_> = records
        .into_iter()
        .filter(|r| record_type.as_deref().is_none_or(|t| r.record_type() == t))
        .collect();

    if records.is_empty() {
        println!("{}", "No records found".dimmed());
        return Ok(());
    }

    println!("{:<24} {:<22} {}", "UID".bold(), "TYPE".bold(), "TITLE".bold());
    for record in &records {
        println!("{:<24} {:<22} {}", record.uid, record.record_type(), record.title());
    }
    println!();
    println!("{} record(s)", records.len());
    Ok(())
}
