// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Record UID commands

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use secretsmanager_core::domain::uid::{generate_uid, validate_uid};

#[derive(Subcommand)]
pub enum UidCommand {
    /// Check that a value is a well-formed record UID
    Validate {
        #[arg(value_name = "UID")]
        uid: String,
    },

    /// Print freshly generated record UIDs
    Generate {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
}

pub async fn handle_command(command: UidCommand) -> Result<()> {
    match command {
        UidCommand::Validate { uid } => {
            if !validate_uid(&uid) {
                anyhow::bail!(
                    "invalid UID format - use unpadded base64url encoded value (RFC 4648): '{}'",
                    uid
                );
            }
            println!("{}", "✓ UID is valid".green());
            Ok(())
        }
        UidCommand::Generate { count } => {
            for _ in 0..count {
                println!("{}", generate_uid());
            }
            Ok(())
        }
    }
}
