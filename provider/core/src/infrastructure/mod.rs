// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod credential;
pub mod memory_vault;
pub mod password_generator;
pub mod totp;

pub use memory_vault::{InMemorySecretsManager, VaultSnapshot};
pub use password_generator::RandomPasswordGenerator;
pub use totp::OtpAuthTotpGenerator;
