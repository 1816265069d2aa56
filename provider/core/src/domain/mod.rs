// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer (`secretsmanager-core`)
//!
//! Vault records, their typed fields, and the provider-side attribute
//! representation. Vault access is only described here, as ports in
//! [`client`].
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Entities, value objects, ports and errors

pub mod field_type;
pub mod field_value;
pub mod field;
pub mod complexity;
pub mod attributes;
pub mod record;
pub mod folder;
pub mod uid;
pub mod schema;
pub mod client;
pub mod diagnostics;
pub mod error;
pub mod config;

pub use error::{ProviderError, ProviderResult};
