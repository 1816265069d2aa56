// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Batch Records Data Source
//!
//! Fetches many records of any template at once, by `uids` and/or `titles`.
//! Every requested UID and title must be found. Unlike the single-record
//! lookup, a title may match several records and all of them are returned.
//!
//! Each record is exposed with its raw field lists in a generic form
//! (`type`, `label`, JSON-encoded `value`), its attachments under `file_ref`,
//! and again JSON-encoded under `records_by_uid`. The data source id is the
//! hex SHA-256 of the sorted record UIDs joined by `,`.

use std::collections::HashSet;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::application::file_resolver::file_items;
use crate::application::lookup::RecordLookup;
use crate::domain::attributes::ChangeSet;
use crate::domain::error::{ProviderError, ProviderResult};
use crate::domain::field::Field;
use crate::domain::record::{Record, RecordSection};

fn string_list(changes: &ChangeSet, key: &str) -> Vec<String> {
    changes
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Generic `{type, label, value}` items of one record section
fn generic_items(record: &Record, section: RecordSection) -> Value {
    let items = record
        .section(section)
        .iter()
        .map(|raw| {
            let mut item = Map::new();
            item.insert(
                "type".to_string(),
                Value::String(Field::raw_type(raw).unwrap_or_default().to_string()),
            );
            if let Some(label) = raw.get("label").and_then(Value::as_str) {
                item.insert("label".to_string(), Value::String(label.to_string()));
            }
            let value = raw.get("value").cloned().unwrap_or(Value::Array(Vec::new()));
            item.insert("value".to_string(), Value::String(value.to_string()));
            Value::Object(item)
        })
        .collect();
    Value::Array(items)
}

/// Hex SHA-256 of the sorted UIDs joined by `,`
pub fn records_id(uids: &[String]) -> String {
    let mut sorted: Vec<&str> = uids.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    hex::encode(Sha256::digest(sorted.join(",").as_bytes()))
}

pub struct RecordsDataSource {
    lookup: RecordLookup,
}

impl RecordsDataSource {
    pub fn new(lookup: RecordLookup) -> Self {
        Self { lookup }
    }

    async fn fetch(&self, uids: &[String], titles: &[String]) -> ProviderResult<Vec<Record>> {
        if titles.is_empty() {
            let records = self.lookup.client().get_secrets(uids).await?;
            let found: HashSet<&str> = records.iter().map(|r| r.uid.as_str()).collect();
            if let Some(missing) = uids.iter().find(|uid| !found.contains(uid.as_str())) {
                return Err(ProviderError::RecordNotFound(format!("UID: {}", missing)));
            }
            return Ok(records);
        }

        let records: Vec<Record> = self
            .lookup
            .all_records()
            .await?
            .into_iter()
            .filter(|r| uids.contains(&r.uid) || titles.iter().any(|t| t == r.title()))
            .collect();

        let found_uids: HashSet<&str> = records.iter().map(|r| r.uid.as_str()).collect();
        let found_titles: HashSet<&str> = records.iter().map(Record::title).collect();
        if let Some(missing) = uids.iter().find(|uid| !found_uids.contains(uid.as_str())) {
            return Err(ProviderError::RecordNotFound(format!("UID: {}", missing)));
        }
        if let Some(missing) = titles.iter().find(|t| !found_titles.contains(t.as_str())) {
            return Err(ProviderError::RecordNotFound(format!("title: {}", missing)));
        }
        Ok(records)
    }

    pub async fn read(&self, changes: &mut ChangeSet) -> ProviderResult<()> {
        let uids = string_list(changes, "uids");
        let titles = string_list(changes, "titles");
        if uids.is_empty() && titles.is_empty() {
            return Err(ProviderError::validation(
                "at least one of 'uids' or 'titles' must be provided",
            ));
        }

        let records = self.fetch(&uids, &titles).await?;
        debug!(uids = uids.len(), titles = titles.len(), found = records.len(), "Fetched records");

        let mut list = Vec::with_capacity(records.len());
        let mut by_uid = Map::new();
        for record in &records {
            let mut item = Map::new();
            item.insert("uid".to_string(), Value::String(record.uid.clone()));
            item.insert("type".to_string(), Value::String(record.record_type().to_string()));
            item.insert("title".to_string(), Value::String(record.title().to_string()));
            item.insert("notes".to_string(), Value::String(record.notes().to_string()));
            item.insert("fields".to_string(), generic_items(record, RecordSection::Fields));
            item.insert("custom".to_string(), generic_items(record, RecordSection::Custom));
            item.insert("file_ref".to_string(), file_items(self.lookup.client(), record).await);

            let item = Value::Object(item);
            by_uid.insert(record.uid.clone(), Value::String(item.to_string()));
            list.push(item);
        }

        let uids: Vec<String> = records.iter().map(|r| r.uid.clone()).collect();
        changes.set("records", Value::Array(list));
        changes.set("records_by_uid", Value::Object(by_uid));
        changes.set("id", Value::String(records_id(&uids)));
        Ok(())
    }
}
