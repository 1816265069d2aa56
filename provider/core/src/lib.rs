// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Record field conversion and resource lifecycle for the Secrets Manager
//! Terraform provider.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Crate root wiring the DDD layers

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use presentation::{OperationResult, SecretsManagerProvider};
