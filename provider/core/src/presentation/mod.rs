// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`secretsmanager-core`)
//!
//! Provider surface that translates host requests into application service
//! calls. No business logic lives here; all real work is delegated to
//! application services in `crate::application`.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`provider`] | Type registry, CRUD and data source entry points over JSON attribute state |

pub mod provider;

pub use provider::{OperationResult, SecretsManagerProvider};
