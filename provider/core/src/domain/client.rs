// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Vault Client Ports
//!
//! Contracts for the external secrets-manager client. The domain and
//! application layers only talk to the vault through these traits;
//! implementations live in `crate::infrastructure`.
//!
//! | Trait | Concern | Implementations |
//! |-------|---------|-----------------|
//! | `SecretsManagerClient` | records, folders, file content | `InMemorySecretsManager` |
//! | `PasswordGenerator` | password generation | `RandomPasswordGenerator` |
//! | `TotpGenerator` | one-time codes | `OtpAuthTotpGenerator` |
//!
//! Implementations must report every failure as a [`ClientError`]; a failing
//! vendor call never unwinds through the caller.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::complexity::PasswordComplexity;
use crate::domain::folder::Folder;
use crate::domain::record::{Record, RecordData, VaultFile};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The vault answered with an empty status, its way of saying the
    /// record or folder does not exist (or is no longer shared).
    #[error("{0}: unexpected status: ''")]
    NotFound(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("vault request failed: {0}")]
    Request(String),

    #[error("malformed vault payload: {0}")]
    Payload(String),

    #[error("password generation failed: {0}")]
    PasswordGeneration(String),

    #[error("totp error: {0}")]
    Totp(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

/// Record, folder and file access of the vendor client.
#[async_trait]
pub trait SecretsManagerClient: Send + Sync {
    /// Records by UID. An empty slice fetches every accessible record.
    async fn get_secrets(&self, uids: &[String]) -> Result<Vec<Record>, ClientError>;

    /// Persist the full record (title, notes and both field lists).
    async fn save(&self, record: &Record) -> Result<(), ClientError>;

    /// Create a record with a caller-chosen UID in `folder_uid`; returns the UID.
    async fn create_secret_with_record_data(
        &self,
        uid: &str,
        folder_uid: &str,
        data: &RecordData,
    ) -> Result<String, ClientError>;

    async fn delete_secrets(&self, uids: &[String]) -> Result<(), ClientError>;

    async fn get_folders(&self) -> Result<Vec<Folder>, ClientError>;

    /// Create a sub-folder of `parent_uid`; returns the new folder UID.
    async fn create_folder(&self, parent_uid: &str, name: &str) -> Result<String, ClientError>;

    async fn update_folder(&self, folder_uid: &str, name: &str) -> Result<(), ClientError>;

    /// Delete folders; `force` also removes non-empty folders.
    async fn delete_folders(&self, folder_uids: &[String], force: bool) -> Result<(), ClientError>;

    /// Download and decrypt an attachment of `record_uid`.
    async fn file_data(&self, record_uid: &str, file: &VaultFile) -> Result<Vec<u8>, ClientError>;
}

pub trait PasswordGenerator: Send + Sync {
    fn generate(&self, complexity: &PasswordComplexity) -> Result<String, ClientError>;
}

/// A one-time code and the seconds it stays valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpCode {
    pub code: String,
    pub seconds_remaining: u64,
}

pub trait TotpGenerator: Send + Sync {
    fn generate(&self, url: &str) -> Result<TotpCode, ClientError>;
}
