// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Secrets Manager CLI

pub mod config;
pub mod field;
pub mod folder;
pub mod password;
pub mod record;
pub mod uid;

pub use self::config::ConfigCommand;
pub use self::field::FieldCommand;
pub use self::folder::FolderCommand;
pub use self::password::PasswordCommand;
pub use self::record::RecordCommand;
pub use self::uid::UidCommand;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::debug;

use secretsmanager_core::domain::config::ProviderConfigManifest;
use secretsmanager_core::domain::diagnostics::Diagnostics;
use secretsmanager_core::presentation::{OperationResult, SecretsManagerProvider};

/// Load configuration (discovery unless overridden) and configure the provider.
pub fn load_provider(config_path: Option<PathBuf>) -> Result<SecretsManagerProvider> {
    let manifest = ProviderConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;
    debug!(provider = %manifest.metadata.name, "Configuring provider");
    SecretsManagerProvider::configure(&manifest)
}

/// Turn an operation result into its state, failing on the first error diagnostic.
pub fn into_state(result: OperationResult) -> Result<Map<String, Value>> {
    report_warnings(&result.diagnostics);
    if let Some(error) = result.diagnostics.first_error() {
        anyhow::bail!("{}", error.summary);
    }
    result
        .state
        .ok_or_else(|| anyhow::anyhow!("operation returned no state"))
}

pub fn report_warnings(diagnostics: &Diagnostics) {
    use colored::Colorize;
    for warning in diagnostics.warnings() {
        eprintln!("{}", format!("⚠ {}", warning.summary).yellow());
        if !warning.detail.is_empty() {
            eprintln!("  {}", warning.detail.dimmed());
        }
    }
}

/// Pretty JSON of an attribute map
pub fn print_state(state: &Map<String, Value>) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Failed to render state")?;
    println!("{}", json);
    Ok(())
}
