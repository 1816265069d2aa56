// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! In-Memory Vault
//!
//! [`SecretsManagerClient`] over process memory. Backs the test suites and
//! the CLI's offline mode, where the vault is loaded from and written back to
//! a JSON snapshot:
//!
//! ```json
//! {
//!   "records": [{"uid": "...", "folderUid": "...", "data": {...}, "files": [...]}],
//!   "folders": [{"folderUid": "...", "parentUid": "", "name": "Shared"}],
//!   "files": {"<file uid>": "<base64 content>"}
//! }
//! ```
//!
//! Missing records and folders are reported as [`ClientError::NotFound`],
//! matching how the hosted vault answers with an empty status.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Offline and test implementation of the vault client port

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::client::{ClientError, SecretsManagerClient};
use crate::domain::folder::Folder;
use crate::domain::record::{Record, RecordData, VaultFile};
use crate::domain::uid::generate_uid;

/// Serialized form of an [`InMemorySecretsManager`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultSnapshot {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// Attachment content keyed by file UID, base64 (standard alphabet)
    #[serde(default)]
    pub files: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct VaultState {
    records: Vec<Record>,
    folders: Vec<Folder>,
    files: HashMap<String, Vec<u8>>,
}

impl VaultState {
    fn record_index(&self, uid: &str) -> Option<usize> {
        self.records.iter().position(|r| r.uid == uid)
    }

    fn folder_index(&self, uid: &str) -> Option<usize> {
        self.folders.iter().position(|f| f.folder_uid == uid)
    }

    /// `root` and all folders below it
    fn subtree(&self, root: &str) -> HashSet<String> {
        let mut found: HashSet<String> = HashSet::from([root.to_string()]);
        loop {
            let before = found.len();
            for folder in &self.folders {
                if found.contains(&folder.parent_uid) {
                    found.insert(folder.folder_uid.clone());
                }
            }
            if found.len() == before {
                return found;
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemorySecretsManager {
    state: Arc<RwLock<VaultState>>,
}

impl InMemorySecretsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: VaultSnapshot) -> Result<Self> {
        let mut files = HashMap::with_capacity(snapshot.files.len());
        for (uid, content) in snapshot.files {
            let bytes = STANDARD
                .decode(content.as_bytes())
                .with_context(|| format!("Invalid base64 content for file {}", uid))?;
            files.insert(uid, bytes);
        }
        Ok(Self {
            state: Arc::new(RwLock::new(VaultState {
                records: snapshot.records,
                folders: snapshot.folders,
                files,
            })),
        })
    }

    pub fn snapshot(&self) -> VaultSnapshot {
        let state = self.state.read();
        VaultSnapshot {
            records: state.records.clone(),
            folders: state.folders.clone(),
            files: state
                .files
                .iter()
                .map(|(uid, bytes)| (uid.clone(), STANDARD.encode(bytes)))
                .collect(),
        }
    }

    /// Load a vault snapshot from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vault file: {:?}", path))?;
        let snapshot: VaultSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse vault file: {:?}", path))?;
        let vault = Self::from_snapshot(snapshot)?;
        info!(
            path = %path.display(),
            records = vault.state.read().records.len(),
            "Loaded vault snapshot"
        );
        Ok(vault)
    }

    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(&self.snapshot())
            .context("Failed to serialize vault snapshot")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write vault file: {:?}", path))?;
        Ok(())
    }

    /// Add a record, replacing any record with the same UID
    pub fn insert_record(&self, record: Record) {
        let mut state = self.state.write();
        match state.record_index(&record.uid) {
            Some(i) => state.records[i] = record,
            None => state.records.push(record),
        }
    }

    pub fn insert_folder(&self, folder: Folder) {
        let mut state = self.state.write();
        match state.folder_index(&folder.folder_uid) {
            Some(i) => state.folders[i] = folder,
            None => state.folders.push(folder),
        }
    }

    pub fn put_file_content(&self, file_uid: &str, content: Vec<u8>) {
        self.state.write().files.insert(file_uid.to_string(), content);
    }

    pub fn record(&self, uid: &str) -> Option<Record> {
        let state = self.state.read();
        state.record_index(uid).map(|i| state.records[i].clone())
    }

    pub fn record_count(&self) -> usize {
        self.state.read().records.len()
    }
}

#[async_trait]
impl SecretsManagerClient for InMemorySecretsManager {
    async fn get_secrets(&self, uids: &[String]) -> Result<Vec<Record>, ClientError> {
        let state = self.state.read();
        let records: Vec<Record> = state
            .records
            .iter()
            .filter(|r| uids.is_empty() || uids.contains(&r.uid))
            .cloned()
            .collect();
        debug!(requested = uids.len(), found = records.len(), "get_secrets");
        Ok(records)
    }

    async fn save(&self, record: &Record) -> Result<(), ClientError> {
        let mut state = self.state.write();
        let index = state
            .record_index(&record.uid)
            .ok_or_else(|| ClientError::NotFound(format!("save record UID: {}", record.uid)))?;
        state.records[index] = record.clone();
        debug!(record_uid = %record.uid, "Saved record");
        Ok(())
    }

    async fn create_secret_with_record_data(
        &self,
        uid: &str,
        folder_uid: &str,
        data: &RecordData,
    ) -> Result<String, ClientError> {
        let mut state = self.state.write();
        if state.record_index(uid).is_some() {
            return Err(ClientError::Request(format!(
                "record UID {} already exists",
                uid
            )));
        }
        if state.folder_index(folder_uid).is_none() {
            return Err(ClientError::NotFound(format!(
                "create record in folder UID: {}",
                folder_uid
            )));
        }
        state.records.push(Record::new(uid, folder_uid, data.clone()));
        debug!(record_uid = uid, folder_uid, record_type = %data.record_type, "Created record");
        Ok(uid.to_string())
    }

    async fn delete_secrets(&self, uids: &[String]) -> Result<(), ClientError> {
        let mut state = self.state.write();
        if let Some(missing) = uids.iter().find(|uid| state.record_index(uid).is_none()) {
            return Err(ClientError::NotFound(format!("delete record UID: {}", missing)));
        }
        state.records.retain(|r| !uids.contains(&r.uid));
        debug!(count = uids.len(), "Deleted records");
        Ok(())
    }

    async fn get_folders(&self) -> Result<Vec<Folder>, ClientError> {
        Ok(self.state.read().folders.clone())
    }

    async fn create_folder(&self, parent_uid: &str, name: &str) -> Result<String, ClientError> {
        let mut state = self.state.write();
        if state.folder_index(parent_uid).is_none() {
            return Err(ClientError::NotFound(format!(
                "create folder in parent UID: {}",
                parent_uid
            )));
        }
        let uid = generate_uid();
        state.folders.push(Folder::new(uid.clone(), parent_uid, name));
        debug!(folder_uid = %uid, parent_uid, "Created folder");
        Ok(uid)
    }

    async fn update_folder(&self, folder_uid: &str, name: &str) -> Result<(), ClientError> {
        let mut state = self.state.write();
        let index = state
            .folder_index(folder_uid)
            .ok_or_else(|| ClientError::NotFound(format!("update folder UID: {}", folder_uid)))?;
        state.folders[index].name = name.to_string();
        debug!(folder_uid, "Renamed folder");
        Ok(())
    }

    async fn delete_folders(&self, folder_uids: &[String], force: bool) -> Result<(), ClientError> {
        let mut state = self.state.write();
        for uid in folder_uids {
            if state.folder_index(uid).is_none() {
                return Err(ClientError::NotFound(format!("delete folder UID: {}", uid)));
            }
            let subtree = state.subtree(uid);
            let occupied = subtree.len() > 1
                || state.records.iter().any(|r| subtree.contains(&r.folder_uid));
            if occupied && !force {
                return Err(ClientError::Request(format!(
                    "folder UID {} is not empty",
                    uid
                )));
            }
            state.records.retain(|r| !subtree.contains(&r.folder_uid));
            state.folders.retain(|f| !subtree.contains(&f.folder_uid));
            debug!(folder_uid = %uid, removed_folders = subtree.len(), "Deleted folder");
        }
        Ok(())
    }

    async fn file_data(&self, record_uid: &str, file: &VaultFile) -> Result<Vec<u8>, ClientError> {
        self.state
            .read()
            .files
            .get(&file.uid)
            .cloned()
            .ok_or_else(|| {
                ClientError::NotFound(format!(
                    "file UID: {} of record UID: {}",
                    file.uid, record_uid
                ))
            })
    }
}
