// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provider Errors
//!
//! Error taxonomy shared by every provider operation. Presentation entry
//! points turn these into error diagnostics; the refresh and delete paths
//! inspect [`ProviderError::is_not_found`] to downgrade drift instead.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Typed failures of lookups, validation and vault calls

use thiserror::Error;

use crate::domain::client::ClientError;
use crate::domain::complexity::ComplexityError;
use crate::domain::field::FieldError;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Lookup by UID or title found nothing. Carries the lookup key,
    /// e.g. `UID: abc` or `title: Prod DB`.
    #[error("record not found - {0}")]
    RecordNotFound(String),

    #[error("{0}")]
    FolderNotFound(String),

    /// Title or name lookup matched more than one entity
    #[error("{0}")]
    AmbiguousMatch(String),

    #[error("record type '{actual}' is not the expected type '{expected}' for this data source")]
    TypeMismatch { actual: String, expected: String },

    #[error("invalid UID format - use unpadded base64url encoded value (RFC 4648): '{0}'")]
    InvalidUid(String),

    #[error(transparent)]
    InvalidComplexity(#[from] ComplexityError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Vendor(#[from] ClientError),

    /// Missing or conflicting arguments of an operation
    #[error("{0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    pub fn validation(message: impl Into<String>) -> Self {
        ProviderError::Validation(message.into())
    }

    /// Record lookups that found nothing, or vault calls that reported the
    /// target as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ProviderError::RecordNotFound(_) | ProviderError::FolderNotFound(_) => true,
            ProviderError::Vendor(e) => e.is_not_found(),
            _ => false,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
