// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Record and Folder Lookup
//!
//! Locates records by UID or title and folders by UID, name and parent.
//! Every vault access of the resource and data source services goes through
//! here, so a failing vendor call always surfaces as a [`ProviderError`].
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Vault queries shared by resources and data sources
//!
//! # Title lookups
//!
//! `path == "*"` with a non-empty title selects lookup by title. The record
//! lookup requires exactly one title match; [`RecordLookup::records_with_title`]
//! returns every match and leaves the policy to the caller.

use std::sync::Arc;

use tracing::debug;

use crate::domain::client::SecretsManagerClient;
use crate::domain::error::{ProviderError, ProviderResult};
use crate::domain::folder::Folder;
use crate::domain::record::Record;

#[derive(Clone)]
pub struct RecordLookup {
    client: Arc<dyn SecretsManagerClient>,
}

impl RecordLookup {
    pub fn new(client: Arc<dyn SecretsManagerClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &dyn SecretsManagerClient {
        self.client.as_ref()
    }

    /// Every record shared with the application
    pub async fn all_records(&self) -> ProviderResult<Vec<Record>> {
        let records = self.client.get_secrets(&[]).await?;
        debug!(count = records.len(), "Fetched all records");
        Ok(records)
    }

    pub async fn records_with_title(&self, title: &str) -> ProviderResult<Vec<Record>> {
        Ok(self
            .all_records()
            .await?
            .into_iter()
            .filter(|r| r.title() == title)
            .collect())
    }

    /// Fetch one record by UID, or by title when `path` is `*`.
    pub async fn get_record(&self, path: &str, title: &str) -> ProviderResult<Record> {
        let path = path.trim();
        let title = title.trim();

        if !title.is_empty() && path == "*" {
            let mut matches = self.records_with_title(title).await?.into_iter();
            let Some(record) = matches.next() else {
                return Err(ProviderError::RecordNotFound(format!("title: {}", title)));
            };
            if matches.next().is_some() {
                return Err(ProviderError::AmbiguousMatch(format!(
                    "more that one records match the search query - title: {}",
                    title
                )));
            }
            return Ok(record);
        }

        let mut records = self.client.get_secrets(&[path.to_string()]).await?;
        debug!(record_uid = path, count = records.len(), "Fetched record by UID");
        match records.len() {
            0 => Err(ProviderError::RecordNotFound(format!("UID: {}", path))),
            1 => Ok(records.remove(0)),
            n => Err(ProviderError::AmbiguousMatch(format!(
                "expected 1 record - found {} records for UID: {}",
                n, path
            ))),
        }
    }

    /// Resolve the folder a new record goes into. An empty or `*` folder UID
    /// selects the folder of the first record that has one.
    pub async fn get_template_folder(&self, folder_uid: &str) -> ProviderResult<String> {
        let folder_uid = folder_uid.trim();
        let resolved = if folder_uid.is_empty() || folder_uid == "*" {
            self.all_records()
                .await?
                .into_iter()
                .map(|r| r.folder_uid)
                .find(|f| !f.is_empty())
                .unwrap_or_default()
        } else {
            folder_uid.to_string()
        };

        if resolved.is_empty() || resolved == "*" {
            return Err(ProviderError::FolderNotFound(
                "template folder not found".to_string(),
            ));
        }
        Ok(resolved)
    }

    pub async fn get_folders(&self) -> ProviderResult<Vec<Folder>> {
        let folders = self.client.get_folders().await?;
        debug!(count = folders.len(), "Fetched folders");
        Ok(folders)
    }

    /// Folders matching every non-empty criterion
    pub async fn find_folder(
        &self,
        parent_uid: &str,
        uid: &str,
        name: &str,
    ) -> ProviderResult<Vec<Folder>> {
        let (parent_uid, uid, name) = (parent_uid.trim(), uid.trim(), name.trim());
        Ok(self
            .get_folders()
            .await?
            .into_iter()
            .filter(|f| uid.is_empty() || f.folder_uid == uid)
            .filter(|f| name.is_empty() || f.name == name)
            .filter(|f| parent_uid.is_empty() || f.parent_uid == parent_uid)
            .collect())
    }

    /// Sub-folder lookup: by UID anywhere in the tree when a UID is given
    /// (the caller checks the parent), otherwise by name under `parent_uid`.
    pub async fn find_sub_folder(
        &self,
        parent_uid: &str,
        uid: &str,
        name: &str,
    ) -> ProviderResult<Vec<Folder>> {
        let (parent_uid, uid, name) = (parent_uid.trim(), uid.trim(), name.trim());
        let folders = self.get_folders().await?;
        Ok(if !uid.is_empty() {
            folders.into_iter().filter(|f| f.folder_uid == uid).collect()
        } else {
            folders
                .into_iter()
                .filter(|f| f.name == name && f.parent_uid == parent_uid)
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RecordData;
    use crate::infrastructure::memory_vault::InMemorySecretsManager;

    const UID_A: &str = "KEndJhRb5TzYShFu-zJqDA";
    const UID_B: &str = "5dWX0-UOKMAFVjzXhhxu9A";
    const UID_C: &str = "jYQ9jjIAJhKXHGkmeaBa5g";

    fn vault() -> Arc<InMemorySecretsManager> {
        let vault = InMemorySecretsManager::new();
        vault.insert_record(Record::new(UID_A, "", RecordData::new("login", "Prod DB")));
        vault.insert_record(Record::new(UID_B, "folder1", RecordData::new("login", "Dup")));
        vault.insert_record(Record::new(UID_C, "folder1", RecordData::new("login", "Dup")));
        vault.insert_folder(Folder::new("folder1", "", "Shared"));
        vault.insert_folder(Folder::new("folder2", "folder1", "Child"));
        vault.insert_folder(Folder::new("folder3", "folder1", "Child2"));
        Arc::new(vault)
    }

    #[tokio::test]
    async fn test_get_record_by_uid() {
        let lookup = RecordLookup::new(vault());
        let record = lookup.get_record(UID_A, "").await.unwrap();
        assert_eq!(record.title(), "Prod DB");

        let err = lookup.get_record("AAAAAAAAAAAAAAAAAAAAAA", "").await.unwrap_err();
        assert_eq!(err.to_string(), "record not found - UID: AAAAAAAAAAAAAAAAAAAAAA");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_record_by_title() {
        let lookup = RecordLookup::new(vault());
        assert_eq!(lookup.get_record("*", " Prod DB ").await.unwrap().uid, UID_A);

        let err = lookup.get_record("*", "nothing").await.unwrap_err();
        assert_eq!(err.to_string(), "record not found - title: nothing");

        let err = lookup.get_record("*", "Dup").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "more that one records match the search query - title: Dup"
        );
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_records_with_title_returns_all_matches() {
        let lookup = RecordLookup::new(vault());
        assert_eq!(lookup.records_with_title("Dup").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_template_folder() {
        let lookup = RecordLookup::new(vault());
        assert_eq!(lookup.get_template_folder("*").await.unwrap(), "folder1");
        assert_eq!(lookup.get_template_folder("explicit").await.unwrap(), "explicit");

        let empty = RecordLookup::new(Arc::new(InMemorySecretsManager::new()));
        let err = empty.get_template_folder("").await.unwrap_err();
        assert_eq!(err.to_string(), "template folder not found");
    }

    #[tokio::test]
    async fn test_find_folders() {
        let lookup = RecordLookup::new(vault());
        assert_eq!(lookup.find_folder("", "", "Child").await.unwrap().len(), 1);
        assert_eq!(lookup.find_folder("folder1", "", "").await.unwrap().len(), 2);
        assert_eq!(lookup.find_sub_folder("", "folder3", "").await.unwrap()[0].name, "Child2");
        assert_eq!(lookup.find_sub_folder("folder1", "", "Child").await.unwrap().len(), 1);
        assert!(lookup.find_sub_folder("", "", "Child").await.unwrap().is_empty());
    }
}
