// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Record Data Source Use Case
//!
//! Read-only view of one record by `path` (a record UID, or `*` together
//! with `title`). Data sources expose flattened values rather than field
//! blocks: scalars as strings, dates as RFC 3339 strings, structured fields
//! as a list holding the first value, and every attachment under `file_ref`.
//!
//! Cross-record references (`address_ref`, `card_ref`) are resolved when the
//! referenced record is reachable and degrade to a uid-only entry otherwise.
//! A `totp` attribute carries the current code of the `oneTimeCode` field.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Per-template data source reads

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::warn;

use crate::application::file_resolver::{file_items, format_last_modified};
use crate::application::lookup::RecordLookup;
use crate::application::projector::{project_address_ref, project_card_ref, structured_items};
use crate::domain::attributes::ChangeSet;
use crate::domain::client::TotpGenerator;
use crate::domain::error::{ProviderError, ProviderResult};
use crate::domain::field_type::{FieldType, ValueKind};
use crate::domain::record::{Record, RecordSection, RecordType};
use crate::domain::schema::record_schema;

#[async_trait]
pub trait RecordDataSourceUseCase: Send + Sync {
    async fn read(&self, record_type: RecordType, changes: &mut ChangeSet) -> ProviderResult<()>;
}

pub struct StandardRecordDataSourceUseCase {
    lookup: RecordLookup,
    totp: Arc<dyn TotpGenerator>,
}

impl StandardRecordDataSourceUseCase {
    pub fn new(lookup: RecordLookup, totp: Arc<dyn TotpGenerator>) -> Self {
        Self { lookup, totp }
    }

    /// The referenced record, if it can still be fetched
    async fn referenced(&self, uid: &str) -> Option<Record> {
        match self.lookup.client().get_secrets(&[uid.to_string()]).await {
            Ok(records) => {
                let found = records.into_iter().next();
                if found.is_none() {
                    warn!(referenced_uid = uid, "Referenced record not found");
                }
                found
            }
            Err(e) => {
                warn!(referenced_uid = uid, error = %e, "Failed to fetch referenced record");
                None
            }
        }
    }

    fn totp_items(&self, record: &Record) -> ProviderResult<Value> {
        let url = record.field_value_str(FieldType::OneTimeCode);
        let url = url.trim();
        if url.is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        let code = self.totp.generate(url)?;
        let mut item = Map::new();
        item.insert("url".to_string(), Value::String(url.to_string()));
        item.insert("token".to_string(), Value::String(code.code));
        item.insert("ttl".to_string(), Value::from(code.seconds_remaining));
        Ok(Value::Array(vec![Value::Object(item)]))
    }

    async fn attribute(
        &self,
        record: &Record,
        name: &str,
        field_type: FieldType,
    ) -> ProviderResult<Option<Value>> {
        let value = match field_type {
            FieldType::FileRef => file_items(self.lookup.client(), record).await,
            FieldType::OneTimeCode if name == "totp" => self.totp_items(record)?,
            FieldType::AddressRef | FieldType::CardRef => {
                let uid = record.field_value_str(field_type);
                let uid = uid.trim();
                if uid.is_empty() {
                    return Ok(None);
                }
                let referenced = self.referenced(uid).await;
                if field_type == FieldType::AddressRef {
                    project_address_ref(uid, referenced.as_ref())
                } else {
                    project_card_ref(uid, referenced.as_ref())
                }
            }
            _ => match field_type.value_kind() {
                ValueKind::Structured => structured_items(record, field_type)?,
                ValueKind::Date => {
                    let date = record
                        .first_field(RecordSection::Fields, field_type)?
                        .and_then(|f| f.value)
                        .and_then(|v| v.first_date());
                    match date {
                        Some(millis) => Value::String(format_last_modified(millis)),
                        None => return Ok(None),
                    }
                }
                _ => Value::String(record.field_value_str(field_type)),
            },
        };
        Ok(Some(value))
    }
}

#[async_trait]
impl RecordDataSourceUseCase for StandardRecordDataSourceUseCase {
    async fn read(&self, record_type: RecordType, changes: &mut ChangeSet) -> ProviderResult<()> {
        let schema = record_schema(record_type);
        let path = changes.get_trimmed("path");
        let title = changes.get_trimmed("title");

        let record = self.lookup.get_record(&path, &title).await?;
        if record.record_type() != record_type.as_str() {
            return Err(ProviderError::TypeMismatch {
                actual: record.record_type().to_string(),
                expected: record_type.as_str().to_string(),
            });
        }

        changes.set("type", Value::String(record.record_type().to_string()));
        changes.set("title", Value::String(record.title().to_string()));
        changes.set("notes", Value::String(record.notes().to_string()));

        for attribute in schema.attributes {
            match self.attribute(&record, attribute.name, attribute.field_type).await? {
                Some(value) => changes.set(attribute.name, value),
                None => changes.remove(attribute.name),
            }
        }

        changes.set("id", Value::String(path));
        Ok(())
    }
}
