// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use secretsmanager_core::domain::config::{ProviderConfigManifest, ENV_CONFIG_PATH};
use secretsmanager_core::infrastructure::credential::Credential;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,

        /// Print the effective manifest as YAML (credential redacted)
        #[arg(long)]
        yaml: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./secretsmanager-config.yaml)
        #[arg(short, long, default_value = "./secretsmanager-config.yaml")]
        output: PathBuf,

        /// Include comments for every setting
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths, yaml } => show(config_override, paths, yaml).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool, as_yaml: bool) -> Result<()> {
    let config = ProviderConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if as_yaml {
        println!("{}", redacted_yaml(&config)?);
        return Ok(());
    }

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            ENV_CONFIG_PATH,
            std::env::var(ENV_CONFIG_PATH)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./secretsmanager-config.yaml");
        println!("  4. ~/.secretsmanager/config.yaml");
        println!("  5. /etc/secretsmanager/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();
    println!("  Name: {}", config.metadata.name);
    if let Some(version) = &config.metadata.version {
        println!("  Version: {}", version);
    }
    println!();

    println!("{}", "Vault:".bold());
    match config.spec.credential.as_deref().map(Credential::decode) {
        Some(Ok(credential)) => println!(
            "  Credential: {} (host: {})",
            "set".green(),
            credential.hostname().unwrap_or("(default)")
        ),
        Some(Err(e)) => println!("  Credential: {} ({})", "invalid".red(), e),
        None => println!("  Credential: {}", "(not set)".dimmed()),
    }
    match &config.spec.vault_file {
        Some(path) => println!("  Snapshot: {}", path.display()),
        None => println!("  Snapshot: {}", "(not set)".dimmed()),
    }
    println!();

    println!("{}", "Passwords:".bold());
    println!("  Default length: {}", config.spec.default_password_length);
    println!();

    Ok(())
}

fn redacted_yaml(config: &ProviderConfigManifest) -> Result<String> {
    let mut config = config.clone();
    if config.spec.credential.is_some() {
        config.spec.credential = Some("<redacted>".to_string());
    }
    serde_yaml::to_string(&config).context("Failed to render configuration")
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ProviderConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    };

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_parse() {
        for template in [
            include_str!("../../templates/config-minimal.yaml"),
            include_str!("../../templates/config-with-examples.yaml"),
        ] {
            let manifest = ProviderConfigManifest::from_yaml_str(template).unwrap();
            assert!(manifest.validate().is_ok());
        }
    }

    #[test]
    fn test_yaml_output_hides_credential() {
        let mut config = ProviderConfigManifest::default();
        config.spec.credential = Some("c2VjcmV0".to_string());
        let yaml = redacted_yaml(&config).unwrap();
        assert!(yaml.contains("<redacted>"));
        assert!(!yaml.contains("c2VjcmV0"));
    }

    #[tokio::test]
    async fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("config.yaml");
        generate(output.clone(), false).await.unwrap();
        assert!(ProviderConfigManifest::from_yaml_file(&output).is_ok());
    }
}
