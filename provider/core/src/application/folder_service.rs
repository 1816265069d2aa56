// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Folder Resource and Data Sources
//!
//! Sub-folders are managed as resources inside a parent folder. Root shared
//! folders (no parent) are granted to the application from outside and can
//! only be read, never created or imported.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Folder lifecycle and folder queries
//! - **Collaborators:**
//!   - Domain: Folder value object, ChangeSet
//!   - Application: RecordLookup

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::application::lookup::RecordLookup;
use crate::application::record_resource::RefreshOutcome;
use crate::domain::attributes::ChangeSet;
use crate::domain::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::error::{ProviderError, ProviderResult};
use crate::domain::folder::Folder;
use crate::domain::uid::validate_uid;

fn required_parent(changes: &ChangeSet, message: &str) -> ProviderResult<String> {
    let parent_uid = changes.get_trimmed("parent_uid");
    if parent_uid.is_empty() {
        return Err(ProviderError::validation(message));
    }
    if !validate_uid(&parent_uid) {
        return Err(ProviderError::InvalidUid(parent_uid));
    }
    Ok(parent_uid)
}

fn folder_item(folder: &Folder) -> Value {
    let mut item = Map::new();
    item.insert("uid".to_string(), Value::String(folder.folder_uid.clone()));
    item.insert("name".to_string(), Value::String(folder.name.clone()));
    item.insert("parent_uid".to_string(), Value::String(folder.parent_uid.clone()));
    item.insert("shared".to_string(), Value::Bool(folder.is_shared()));
    Value::Object(item)
}

#[async_trait]
pub trait FolderResourceUseCase: Send + Sync {
    async fn create(&self, changes: &mut ChangeSet) -> ProviderResult<()>;
    async fn read(&self, changes: &mut ChangeSet) -> ProviderResult<RefreshOutcome>;
    async fn update(&self, changes: &mut ChangeSet) -> ProviderResult<()>;
    async fn delete(&self, changes: &ChangeSet) -> ProviderResult<Diagnostics>;
    async fn import(&self, uid: &str) -> ProviderResult<Map<String, Value>>;
}

pub struct StandardFolderResourceUseCase {
    lookup: RecordLookup,
}

impl StandardFolderResourceUseCase {
    pub fn new(lookup: RecordLookup) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl FolderResourceUseCase for StandardFolderResourceUseCase {
    async fn create(&self, changes: &mut ChangeSet) -> ProviderResult<()> {
        let parent_uid = required_parent(changes, "'parent_uid' is required to create new resource")?;
        let name = changes.get_str("name").unwrap_or_default().to_string();
        if name.is_empty() {
            return Err(ProviderError::validation("'name' is required to create new resource"));
        }

        let folder_uid = self.lookup.client().create_folder(&parent_uid, &name).await?;
        changes.set("uid", Value::String(folder_uid.clone()));
        changes.set("id", Value::String(folder_uid.clone()));
        info!(folder_uid = %folder_uid, parent_uid = %parent_uid, "Created folder");
        Ok(())
    }

    async fn read(&self, changes: &mut ChangeSet) -> ProviderResult<RefreshOutcome> {
        let parent_uid = required_parent(changes, "'parent_uid' is required to locate the sub-folder")?;
        let uid = changes.get_trimmed("uid");
        let name = changes.get_str("name").unwrap_or_default().to_string();
        if uid.is_empty() && name.is_empty() {
            return Err(ProviderError::validation(
                "folder UID and/or name required to locate the folder",
            ));
        }

        let mut folders = self.lookup.find_sub_folder(&parent_uid, &uid, &name).await?;
        let folder = match folders.len() {
            0 => {
                warn!(folder_uid = %uid, name = %name, "Folder not found, removing from state");
                return Ok(RefreshOutcome::Removed);
            }
            1 => folders.remove(0),
            _ => {
                return Err(ProviderError::AmbiguousMatch(format!(
                    "multilpe subfolders with same name '{}' found in parent folder UID '{}'",
                    name, parent_uid
                )))
            }
        };
        if folder.parent_uid != parent_uid {
            return Err(ProviderError::validation(format!(
                "folder UID '{}' found but in different parent folder UID '{}'",
                folder.folder_uid, folder.parent_uid
            )));
        }

        changes.set("uid", Value::String(folder.folder_uid.clone()));
        changes.set("name", Value::String(folder.name.clone()));
        changes.set("id", Value::String(folder.folder_uid));
        Ok(RefreshOutcome::Present)
    }

    async fn update(&self, changes: &mut ChangeSet) -> ProviderResult<()> {
        if changes.get_trimmed("parent_uid").is_empty() {
            return Err(ProviderError::validation(
                "'parent_uid' is required to update existing resource",
            ));
        }
        let uid = changes.get_trimmed("uid");
        if uid.is_empty() {
            return Err(ProviderError::validation(
                "'uid' is required to update existing resource",
            ));
        }
        if changes.has_change("parent_uid") || changes.has_change("uid") {
            return Err(ProviderError::validation(
                "changes to parent_uid and uid are not allowed",
            ));
        }

        if changes.has_change("name") {
            let name = changes.get_trimmed("name");
            self.lookup.client().update_folder(&uid, &name).await?;
            info!(folder_uid = %uid, "Renamed folder");
        }
        changes.set("id", Value::String(uid));
        Ok(())
    }

    async fn delete(&self, changes: &ChangeSet) -> ProviderResult<Diagnostics> {
        let uid = changes.get_trimmed("uid");
        if uid.is_empty() {
            return Err(ProviderError::validation(
                "'uid' is required to delete existing resource",
            ));
        }
        let force = changes
            .get("force_delete")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut diagnostics = Diagnostics::new();
        match self.lookup.client().delete_folders(&[uid.clone()], force).await {
            Ok(()) => info!(folder_uid = %uid, force, "Deleted folder"),
            Err(e) if e.is_not_found() => {
                warn!(folder_uid = %uid, "Folder already deleted");
                diagnostics.push(Diagnostic::warning(
                    format!("Folder UID: {} not found - probably already deleted (externally)", uid),
                    format!(
                        "Delete Folder UID: {} returned empty status. That usually means the folder doesn't exist - either already deleted (externally), or no longer shared to the corresponding KSM Application.",
                        uid
                    ),
                ));
            }
            Err(e) => return Err(e.into()),
        }
        Ok(diagnostics)
    }

    async fn import(&self, uid: &str) -> ProviderResult<Map<String, Value>> {
        let uid = uid.trim();
        let folders = self.lookup.find_sub_folder("", uid, "").await?;
        let Some(folder) = folders.first() else {
            return Err(ProviderError::FolderNotFound(format!(
                "failed to import folder UID='{}' - folder not found.",
                uid
            )));
        };
        if folder.is_shared() {
            return Err(ProviderError::validation(format!(
                "cannot import root shared folder UID='{}' - directly shared to KSM App.",
                uid
            )));
        }

        let mut state = Map::new();
        state.insert("uid".to_string(), Value::String(uid.to_string()));
        state.insert("parent_uid".to_string(), Value::String(folder.parent_uid.clone()));
        let mut changes = ChangeSet::from_state(state);
        match self.read(&mut changes).await? {
            RefreshOutcome::Present => Ok(changes.into_planned()),
            RefreshOutcome::Removed => Err(ProviderError::FolderNotFound(format!(
                "failed to import folder UID='{}' - folder not found.",
                uid
            ))),
        }
    }
}

/// `secretsmanager_folder` and `secretsmanager_folders` data sources
pub struct FolderDataSources {
    lookup: RecordLookup,
}

impl FolderDataSources {
    pub fn new(lookup: RecordLookup) -> Self {
        Self { lookup }
    }

    /// Exactly one folder matching the given parent, uid and name
    pub async fn read_folder(&self, changes: &mut ChangeSet) -> ProviderResult<()> {
        let parent_uid = changes.get_trimmed("parent_uid");
        let uid = changes.get_trimmed("uid");
        let name = changes.get_trimmed("name");

        let mut folders = self.lookup.find_folder(&parent_uid, &uid, &name).await?;
        let folder = match folders.len() {
            0 => {
                return Err(ProviderError::FolderNotFound(format!(
                    "folder UID: '{}', Name: '{}' not found",
                    uid, name
                )))
            }
            1 => folders.remove(0),
            n => {
                return Err(ProviderError::AmbiguousMatch(format!(
                    "multiple folders ({}) match folder UID: '{}', Name: '{}'",
                    n, uid, name
                )))
            }
        };

        changes.set("parent_uid", Value::String(folder.parent_uid.clone()));
        changes.set("shared", Value::Bool(folder.is_shared()));
        if uid.is_empty() {
            changes.set("uid", Value::String(folder.folder_uid.clone()));
        }
        if name.is_empty() {
            changes.set("name", Value::String(folder.name.clone()));
        }
        changes.set("id", Value::String(folder.folder_uid));
        Ok(())
    }

    /// Every folder visible to the application
    pub async fn read_folders(&self, changes: &mut ChangeSet) -> ProviderResult<()> {
        let folders = self.lookup.get_folders().await?;
        changes.set(
            "folders",
            Value::Array(folders.iter().map(folder_item).collect()),
        );
        if changes.get("id").is_none() {
            let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
            changes.set("id", Value::String(format!("{:x}", nanos)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_vault::InMemorySecretsManager;
    use serde_json::json;
    use std::sync::Arc;

    const ROOT: &str = "KEndJhRb5TzYShFu-zJqDA";
    const CHILD: &str = "5dWX0-UOKMAFVjzXhhxu9A";

    fn vault() -> Arc<InMemorySecretsManager> {
        let vault = InMemorySecretsManager::new();
        vault.insert_folder(Folder::new(ROOT, "", "Shared"));
        vault.insert_folder(Folder::new(CHILD, ROOT, "Child"));
        Arc::new(vault)
    }

    fn planned(value: Value) -> ChangeSet {
        ChangeSet::from_planned(value.as_object().cloned().unwrap())
    }

    #[tokio::test]
    async fn test_create_and_read() {
        let resource = StandardFolderResourceUseCase::new(RecordLookup::new(vault()));
        let mut changes = planned(json!({"parent_uid": ROOT, "name": "New"}));
        resource.create(&mut changes).await.unwrap();
        let uid = changes.get_str("uid").unwrap().to_string();

        let mut changes = planned(json!({"parent_uid": ROOT, "uid": uid}));
        assert_eq!(resource.read(&mut changes).await.unwrap(), RefreshOutcome::Present);
        assert_eq!(changes.get_str("name"), Some("New"));
    }

    #[tokio::test]
    async fn test_create_requires_parent_and_name() {
        let resource = StandardFolderResourceUseCase::new(RecordLookup::new(vault()));
        let mut changes = planned(json!({"name": "x"}));
        assert_eq!(
            resource.create(&mut changes).await.unwrap_err().to_string(),
            "'parent_uid' is required to create new resource"
        );
        let mut changes = planned(json!({"parent_uid": ROOT}));
        assert_eq!(
            resource.create(&mut changes).await.unwrap_err().to_string(),
            "'name' is required to create new resource"
        );
    }

    #[tokio::test]
    async fn test_read_in_wrong_parent() {
        let resource = StandardFolderResourceUseCase::new(RecordLookup::new(vault()));
        let mut changes = planned(json!({"parent_uid": CHILD, "uid": CHILD}));
        let err = resource.read(&mut changes).await.unwrap_err();
        assert!(err.to_string().contains("found but in different parent folder UID"));
    }

    #[tokio::test]
    async fn test_import() {
        let resource = StandardFolderResourceUseCase::new(RecordLookup::new(vault()));
        let state = resource.import(CHILD).await.unwrap();
        assert_eq!(state["parent_uid"], json!(ROOT));
        assert_eq!(state["name"], json!("Child"));

        let err = resource.import(ROOT).await.unwrap_err();
        assert!(err.to_string().starts_with("cannot import root shared folder"));

        let err = resource.import("jYQ9jjIAJhKXHGkmeaBa5g").await.unwrap_err();
        assert!(err.to_string().ends_with("folder not found."));
    }

    #[tokio::test]
    async fn test_delete_missing_folder_warns() {
        let resource = StandardFolderResourceUseCase::new(RecordLookup::new(vault()));
        let changes = planned(json!({"uid": "jYQ9jjIAJhKXHGkmeaBa5g"}));
        let diagnostics = resource.delete(&changes).await.unwrap();
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[tokio::test]
    async fn test_folder_data_sources() {
        let sources = FolderDataSources::new(RecordLookup::new(vault()));

        let mut changes = planned(json!({"name": "Child"}));
        sources.read_folder(&mut changes).await.unwrap();
        assert_eq!(changes.get_str("uid"), Some(CHILD));
        assert_eq!(changes.planned()["shared"], json!(false));

        let mut changes = planned(json!({"name": "Nope"}));
        assert!(sources.read_folder(&mut changes).await.is_err());

        let mut changes = ChangeSet::default();
        sources.read_folders(&mut changes).await.unwrap();
        let folders = changes.get("folders").unwrap().as_array().unwrap();
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0]["shared"], json!(true));
    }
}
