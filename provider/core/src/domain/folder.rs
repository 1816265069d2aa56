// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Vault Folder
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Folder value object with its derived shared status

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub folder_uid: String,
    /// Empty for shared folders directly granted to the application
    #[serde(default)]
    pub parent_uid: String,
    #[serde(default)]
    pub name: String,
}

impl Folder {
    pub fn new(
        folder_uid: impl Into<String>,
        parent_uid: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            folder_uid: folder_uid.into(),
            parent_uid: parent_uid.into(),
            name: name.into(),
        }
    }

    pub fn is_shared(&self) -> bool {
        self.parent_uid.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_is_derived_from_parent() {
        assert!(Folder::new("f1", "", "Root").is_shared());
        assert!(Folder::new("f1", "  ", "Root").is_shared());
        assert!(!Folder::new("f2", "f1", "Child").is_shared());
    }
}
