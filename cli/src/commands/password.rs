// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Password generation commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use secretsmanager_core::domain::client::PasswordGenerator;
use secretsmanager_core::domain::complexity::PasswordComplexity;
use secretsmanager_core::domain::config::ProviderConfigManifest;
use secretsmanager_core::infrastructure::password_generator::RandomPasswordGenerator;

#[derive(Subcommand)]
pub enum PasswordCommand {
    /// Generate a password with the given complexity
    Generate(ComplexityArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ComplexityArgs {
    /// Total length (default: spec.default_password_length)
    #[arg(short, long)]
    length: Option<i64>,

    /// Minimum uppercase letters
    #[arg(long, default_value_t = 0)]
    caps: i64,

    /// Minimum lowercase letters
    #[arg(long, default_value_t = 0)]
    lowercase: i64,

    /// Minimum digits
    #[arg(long, default_value_t = 0)]
    digits: i64,

    /// Minimum special characters
    #[arg(long, default_value_t = 0)]
    special: i64,
}

impl ComplexityArgs {
    fn complexity(&self, default_length: i64) -> PasswordComplexity {
        PasswordComplexity {
            length: self.length.unwrap_or(default_length),
            caps: self.caps,
            lowercase: self.lowercase,
            digits: self.digits,
            special: self.special,
        }
    }
}

pub async fn handle_command(command: PasswordCommand, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        PasswordCommand::Generate(args) => generate(config_path, args).await,
    }
}

async fn generate(config_path: Option<PathBuf>, args: ComplexityArgs) -> Result<()> {
    let default_length = match args.length {
        Some(length) => length,
        None => {
            ProviderConfigManifest::load_or_default(config_path)
                .context("Failed to load configuration")?
                .spec
                .default_password_length
        }
    };
    let complexity = args.complexity(default_length);
    complexity.validate()?;

    let password = RandomPasswordGenerator::new().generate(&complexity)?;
    println!("{}", password);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_length_wins() {
        let args = ComplexityArgs {
            length: Some(32),
            caps: 2,
            lowercase: 0,
            digits: 4,
            special: 0,
        };
        let complexity = args.complexity(16);
        assert_eq!(complexity.length, 32);
        assert_eq!(complexity.sum(), 6);
        assert!(complexity.validate().is_ok());
    }
}
