// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Record Resource Use Case
//!
//! Create, read, update, delete and import for every record template. The
//! per-template behavior comes entirely from the attribute table in
//! [`crate::domain::schema`]; the operations themselves are shared.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Record lifecycle against the vault
//! - **Collaborators:**
//!   - Domain: Record aggregate, ChangeSet, RecordSchema
//!   - Application: RecordLookup, ChangeApplier, builder, projector, file resolver
//!
//! # State
//!
//! Every operation works on a [`ChangeSet`]: prior holds the last known
//! state, planned holds the configuration with computed attributes carried
//! over from prior. Computed attributes (`uid`, `type`, `folder_uid`, `id`
//! and the `type` member of each field block) are written back into planned.
//!
//! # Error Handling
//!
//! - Read of a record that no longer exists is [`RefreshOutcome::Removed`],
//!   not an error
//! - Delete of a record the vault no longer knows is a warning diagnostic

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::application::builder::build_block;
use crate::application::change_applier::ChangeApplier;
use crate::application::file_resolver::resolve_file_refs;
use crate::application::lookup::RecordLookup;
use crate::application::projector::{attribute_value, merge_password, project_field};
use crate::domain::attributes::{ChangeSet, FieldBlock};
use crate::domain::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::error::{ProviderError, ProviderResult};
use crate::domain::field_type::FieldType;
use crate::domain::record::{RecordData, RecordSection, RecordType};
use crate::domain::schema::record_schema;
use crate::domain::uid::{generate_uid, validate_uid};

/// Result of refreshing a resource from the vault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// State was refreshed from the record
    Present,
    /// The record is gone; the host should drop the resource from state
    Removed,
}

/// Write the computed field type into the first block of `attribute`.
fn set_block_type(changes: &mut ChangeSet, attribute: &str, field_type: FieldType) {
    if let Some(Value::Array(mut items)) = changes.get(attribute).cloned() {
        if let Some(Value::Object(block)) = items.first_mut() {
            block.insert(
                "type".to_string(),
                Value::String(field_type.as_str().to_string()),
            );
            changes.set(attribute, Value::Array(items));
        }
    }
}

#[async_trait]
pub trait RecordResourceUseCase: Send + Sync {
    async fn create(&self, record_type: RecordType, changes: &mut ChangeSet) -> ProviderResult<()>;

    async fn read(
        &self,
        record_type: RecordType,
        changes: &mut ChangeSet,
    ) -> ProviderResult<RefreshOutcome>;

    async fn update(&self, record_type: RecordType, changes: &mut ChangeSet) -> ProviderResult<()>;

    async fn delete(&self, record_type: RecordType, changes: &ChangeSet) -> ProviderResult<Diagnostics>;

    /// Import by record UID; returns the refreshed state.
    async fn import(&self, record_type: RecordType, uid: &str) -> ProviderResult<Map<String, Value>>;
}

pub struct StandardRecordResourceUseCase {
    lookup: RecordLookup,
    applier: Arc<ChangeApplier>,
}

impl StandardRecordResourceUseCase {
    pub fn new(lookup: RecordLookup, applier: Arc<ChangeApplier>) -> Self {
        Self { lookup, applier }
    }
}

#[async_trait]
impl RecordResourceUseCase for StandardRecordResourceUseCase {
    async fn create(&self, record_type: RecordType, changes: &mut ChangeSet) -> ProviderResult<()> {
        let schema = record_schema(record_type);

        let mut uid = changes.get_trimmed("uid");
        if uid.is_empty() {
            uid = generate_uid();
        }
        if !validate_uid(&uid) {
            return Err(ProviderError::InvalidUid(uid));
        }

        let requested_folder = changes.get_trimmed("folder_uid");
        if requested_folder.is_empty() {
            return Err(ProviderError::validation(
                "'folder_uid' is required to create new resource",
            ));
        }

        let mut data = RecordData::new(record_type.as_str(), "");
        if let Some(title) = changes.get_str("title") {
            data.title = title.to_string();
        }
        if let Some(notes) = changes.get_str("notes") {
            data.notes = notes.to_string();
        }

        for attribute in schema.attributes {
            let field_type = attribute.field_type;
            let Some(raw) = changes.get(attribute.name).cloned() else {
                continue;
            };
            let Some(mut block) = FieldBlock::parse(field_type, &raw)? else {
                continue;
            };
            let mut field = build_block(field_type, &block)?;
            if field_type.supports_generation()
                && self.applier.apply_generate_password(&mut block, &mut field)?
            {
                changes.set(attribute.name, block.to_attribute());
            }
            data.fields.push(field.to_json());
            set_block_type(changes, attribute.name, field_type);
        }

        let folder_uid = if requested_folder == "*" {
            let resolved = self.lookup.get_template_folder(&requested_folder).await?;
            changes.set("folder_uid", Value::String(resolved.clone()));
            resolved
        } else {
            requested_folder
        };

        let uid = self
            .lookup
            .client()
            .create_secret_with_record_data(&uid, &folder_uid, &data)
            .await?;

        changes.set("uid", Value::String(uid.clone()));
        changes.set("type", Value::String(record_type.as_str().to_string()));
        changes.set("id", Value::String(uid.clone()));
        info!(record_uid = %uid, record_type = %record_type, folder_uid = %folder_uid, "Created record");
        Ok(())
    }

    async fn read(
        &self,
        record_type: RecordType,
        changes: &mut ChangeSet,
    ) -> ProviderResult<RefreshOutcome> {
        let schema = record_schema(record_type);

        let uid = changes.get_trimmed("uid");
        let title = changes.get_trimmed("title");
        if uid.is_empty() && title.is_empty() {
            return Err(ProviderError::validation(
                "record UID and/or title required to locate the record",
            ));
        }

        let path = if uid.is_empty() { "*" } else { uid.as_str() };
        let record = match self.lookup.get_record(path, &title).await {
            Ok(record) => record,
            Err(ProviderError::RecordNotFound(key)) => {
                warn!(lookup = %key, record_type = %record_type, "Record not found, removing from state");
                return Ok(RefreshOutcome::Removed);
            }
            Err(e) => return Err(e),
        };

        if record.record_type() != record_type.as_str() {
            return Err(ProviderError::TypeMismatch {
                actual: record.record_type().to_string(),
                expected: record_type.as_str().to_string(),
            });
        }

        if uid.is_empty() {
            changes.set("uid", Value::String(record.uid.clone()));
        }
        if !record.folder_uid.is_empty() {
            changes.set("folder_uid", Value::String(record.folder_uid.clone()));
        }
        changes.set("type", Value::String(record.record_type().to_string()));
        changes.set("title", Value::String(record.title().to_string()));
        changes.set("notes", Value::String(record.notes().to_string()));

        for attribute in schema.attributes {
            let field_type = attribute.field_type;
            let value = if field_type == FieldType::FileRef {
                resolve_file_refs(self.lookup.client(), &record).await?
            } else {
                let mut projected = project_field(field_type, RecordSection::Fields, &record)?;
                if field_type.supports_generation() {
                    let state = changes.block(attribute.name, field_type)?;
                    merge_password(state.as_ref(), projected.as_mut());
                }
                attribute_value(projected.as_ref())
            };
            changes.set(attribute.name, value);
        }

        changes.set("id", Value::String(record.uid.clone()));
        Ok(RefreshOutcome::Present)
    }

    async fn update(&self, record_type: RecordType, changes: &mut ChangeSet) -> ProviderResult<()> {
        let schema = record_schema(record_type);

        let uid = changes.get_trimmed("uid");
        if uid.is_empty() {
            return Err(ProviderError::validation(
                "'uid' is required to update existing resource",
            ));
        }
        if ["folder_uid", "uid", "type"].iter().any(|k| changes.has_change(k)) {
            return Err(ProviderError::validation(
                "changes to folder_uid, uid, and type are not allowed",
            ));
        }

        let title = changes.get_trimmed("title");
        let mut record = self.lookup.get_record(&uid, &title).await?;

        if changes.has_change("title") {
            record.set_title(changes.get_str("title").unwrap_or_default());
        }
        if changes.has_change("notes") {
            record.set_notes(changes.get_str("notes").unwrap_or_default());
        }

        let mut modified = 0;
        for attribute in schema.attributes {
            if changes.has_change(attribute.name) {
                modified += self.applier.apply_field_change(
                    RecordSection::Fields.as_str(),
                    attribute.name,
                    Some(&mut *changes),
                    Some(&mut record),
                )?;
            }
        }

        self.lookup.client().save(&record).await?;
        changes.set("id", Value::String(uid.clone()));
        info!(record_uid = %uid, record_type = %record_type, modified, "Updated record");
        Ok(())
    }

    async fn delete(&self, record_type: RecordType, changes: &ChangeSet) -> ProviderResult<Diagnostics> {
        let uid = changes.get_trimmed("uid");
        if uid.is_empty() {
            return Err(ProviderError::validation(
                "'uid' is required to delete existing resource",
            ));
        }

        let mut diagnostics = Diagnostics::new();
        match self.lookup.client().delete_secrets(&[uid.clone()]).await {
            Ok(()) => {
                info!(record_uid = %uid, record_type = %record_type, "Deleted record");
            }
            Err(e) if e.is_not_found() => {
                warn!(record_uid = %uid, "Record already deleted");
                diagnostics.push(Diagnostic::warning(
                    format!("Record UID: {} not found - probably already deleted (externally)", uid),
                    format!(
                        "Delete record UID: {} returned empty status. That usually means the record doesn't exist - either already deleted (externally), or no longer shared to the corresponding KSM Application.",
                        uid
                    ),
                ));
            }
            Err(e) => return Err(e.into()),
        }
        Ok(diagnostics)
    }

    async fn import(&self, record_type: RecordType, uid: &str) -> ProviderResult<Map<String, Value>> {
        let mut state = Map::new();
        state.insert("uid".to_string(), Value::String(uid.trim().to_string()));
        let mut changes = ChangeSet::from_state(state);

        match self.read(record_type, &mut changes).await? {
            RefreshOutcome::Present => Ok(changes.into_planned()),
            RefreshOutcome::Removed => Err(ProviderError::RecordNotFound(format!(
                "UID: {}",
                uid.trim()
            ))),
        }
    }
}
