// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! File Reference Resolver
//!
//! Expands the UIDs of a record's `fileRef` field into full file blocks by
//! matching them against the record's attachments and downloading content.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Attachment metadata and content for `file_ref` attributes

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{TimeZone, Utc};
use futures::future::join_all;
use serde_json::Value;
use tracing::warn;

use crate::application::projector::project_field;
use crate::domain::attributes::{BlockValue, FileBlock};
use crate::domain::client::SecretsManagerClient;
use crate::domain::field::FieldError;
use crate::domain::field_type::FieldType;
use crate::domain::record::{Record, RecordSection, VaultFile};

/// RFC 3339 (UTC) timestamp of an epoch-millisecond value, truncated to the
/// second.
pub fn format_last_modified(millis: i64) -> String {
    let seconds = millis.div_euclid(1000);
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_default()
}

async fn describe_file(
    client: &dyn SecretsManagerClient,
    record_uid: &str,
    file: &VaultFile,
) -> FileBlock {
    let content = match client.file_data(record_uid, file).await {
        Ok(bytes) => STANDARD.encode(bytes),
        Err(e) => {
            warn!(record_uid, file_uid = %file.uid, error = %e, "Failed to download file content");
            String::new()
        }
    };
    FileBlock {
        uid: file.uid.clone(),
        title: Some(file.title.clone()),
        name: Some(file.name.clone()),
        file_type: Some(file.file_type.clone()),
        size: Some(file.size),
        last_modified: Some(format_last_modified(file.last_modified)),
        content_base64: Some(content),
    }
}

/// Resource-state `file_ref` attribute.
///
/// Projects the first `fileRef` field and fills every UID that matches an
/// attachment. UIDs without an attachment stay uid-only. Returns `[]` when
/// the record has no `fileRef` field.
pub async fn resolve_file_refs(
    client: &dyn SecretsManagerClient,
    record: &Record,
) -> Result<Value, FieldError> {
    let Some(mut block) = project_field(FieldType::FileRef, RecordSection::Fields, record)? else {
        return Ok(Value::Array(Vec::new()));
    };

    if let Some(BlockValue::Files(files)) = block.value.take() {
        let resolved = join_all(files.into_iter().map(|file| async move {
            match record.file(&file.uid) {
                Some(attachment) => describe_file(client, &record.uid, attachment).await,
                None => file,
            }
        }))
        .await;
        block.value = Some(BlockValue::Files(resolved));
    }
    Ok(block.to_attribute())
}

/// Data-source `file_ref` list: every attachment of the record, whether or
/// not a `fileRef` field points at it.
pub async fn file_items(client: &dyn SecretsManagerClient, record: &Record) -> Value {
    let blocks = join_all(
        record
            .files
            .iter()
            .map(|file| describe_file(client, &record.uid, file)),
    )
    .await;
    Value::Array(blocks.iter().map(FileBlock::to_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RecordData;
    use crate::infrastructure::memory_vault::InMemorySecretsManager;
    use serde_json::json;

    fn record_with_files() -> Record {
        let data: RecordData = serde_json::from_value(json!({
            "type": "file",
            "title": "certs",
            "fields": [{"type": "fileRef", "label": "docs", "value": ["f1", "missing", ""]}]
        }))
        .unwrap();
        let mut record = Record::new("KEndJhRb5TzYShFu-zJqDA", "folder", data);
        record.files.push(VaultFile {
            uid: "f1".to_string(),
            title: "Cert".to_string(),
            name: "cert.pem".to_string(),
            file_type: "application/x-pem-file".to_string(),
            size: 5,
            last_modified: 1_700_000_000_999,
        });
        record.files.push(VaultFile {
            uid: "f2".to_string(),
            name: "unreferenced.txt".to_string(),
            ..VaultFile::default()
        });
        record
    }

    #[test]
    fn test_format_last_modified_truncates_millis() {
        assert_eq!(format_last_modified(1_700_000_000_999), "2023-11-14T22:13:20Z");
        assert_eq!(format_last_modified(0), "1970-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_resolve_file_refs() {
        let vault = InMemorySecretsManager::new();
        let record = record_with_files();
        vault.put_file_content("f1", b"hello".to_vec());

        let value = resolve_file_refs(&vault, &record).await.unwrap();
        let block = &value[0];
        assert_eq!(block["type"], json!("fileRef"));
        assert_eq!(block["label"], json!("docs"));

        let files = block["value"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["name"], json!("cert.pem"));
        assert_eq!(files[0]["last_modified"], json!("2023-11-14T22:13:20Z"));
        assert_eq!(files[0]["content_base64"], json!("aGVsbG8="));
        assert_eq!(files[1], json!({"uid": "missing"}));
    }

    #[tokio::test]
    async fn test_no_file_ref_field() {
        let vault = InMemorySecretsManager::new();
        let record = Record::new("KEndJhRb5TzYShFu-zJqDA", "f", RecordData::new("login", "t"));
        assert_eq!(resolve_file_refs(&vault, &record).await.unwrap(), json!([]));
    }

    #[test]
    fn test_file_items_lists_every_attachment() {
        let vault = InMemorySecretsManager::new();
        let items = tokio_test::block_on(file_items(&vault, &record_with_files()));
        let items = items.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["name"], json!("unreferenced.txt"));
        assert_eq!(items[1]["content_base64"], json!(""));
    }
}
