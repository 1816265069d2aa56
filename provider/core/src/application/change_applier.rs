// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Field Change Applier
//!
//! Applies one changed attribute to a fetched record: removes the field when
//! the attribute is no longer configured, otherwise builds the field and
//! upserts it. Password attributes whose `generate` flag moves to a new
//! non-empty value get a freshly generated secret, which is also written back
//! into the planned state.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Per-attribute record mutation for Update

use std::sync::Arc;

use tracing::debug;

use crate::application::builder::build_block;
use crate::application::name_mapper::schema_and_record_names;
use crate::domain::attributes::{BlockValue, ChangeSet, FieldBlock};
use crate::domain::client::PasswordGenerator;
use crate::domain::complexity::PasswordComplexity;
use crate::domain::error::{ProviderError, ProviderResult};
use crate::domain::field::Field;
use crate::domain::field_type::FieldType;
use crate::domain::field_value::FieldValue;
use crate::domain::record::{Record, RecordSection};

/// Interpret a `generate` attribute: empty or unset is false, "true" and
/// "yes" are true, anything else is rejected.
pub fn parse_generate(generate: Option<&str>) -> ProviderResult<bool> {
    match generate {
        None | Some("") => Ok(false),
        Some("true") | Some("yes") => Ok(true),
        Some(other) => Err(ProviderError::validation(format!(
            "generate = {} - expected one of ('true', 'yes' or '')",
            other
        ))),
    }
}

pub struct ChangeApplier {
    generator: Arc<dyn PasswordGenerator>,
    default_password_length: i64,
}

impl ChangeApplier {
    pub fn new(generator: Arc<dyn PasswordGenerator>, default_password_length: i64) -> Self {
        Self {
            generator,
            default_password_length,
        }
    }

    /// Generate a password into `field` and `block` when the block asks for it.
    ///
    /// A present complexity is validated even when nothing is generated.
    pub fn apply_generate_password(
        &self,
        block: &mut FieldBlock,
        field: &mut Field,
    ) -> ProviderResult<bool> {
        let complexity = match field.complexity {
            Some(complexity) => {
                complexity.validate()?;
                complexity
            }
            None => PasswordComplexity::with_length(self.default_password_length),
        };

        if !parse_generate(block.generate.as_deref())? {
            return Ok(false);
        }

        let password = self.generator.generate(&complexity)?;
        field.value = Some(FieldValue::Text(vec![password.clone()]));
        block.value = Some(BlockValue::Scalar(password));
        debug!(field_type = %field.field_type, length = complexity.length, "Generated password");
        Ok(true)
    }

    /// Apply the attribute `name` of `changes` to `record`.
    ///
    /// Returns the number of record fields inserted, updated or removed.
    pub fn apply_field_change(
        &self,
        section: &str,
        name: &str,
        changes: Option<&mut ChangeSet>,
        record: Option<&mut Record>,
    ) -> ProviderResult<usize> {
        let (Some(changes), Some(record)) = (changes, record) else {
            return Err(ProviderError::validation(
                "apply change expects both schema and record to be non empty",
            ));
        };
        let section: RecordSection = section.parse().map_err(|_| {
            ProviderError::validation(format!(
                "apply change expects field section to be one of ['fields', 'custom'] - got '{}'",
                section
            ))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ProviderError::validation(
                "apply change expects field name to be non empty",
            ));
        }

        let (schema_name, record_name) = schema_and_record_names(name).ok_or_else(|| {
            ProviderError::validation(format!(
                "apply change was unable to find schema field name for field '{}'",
                name
            ))
        })?;

        // Unconfigured attributes are always dropped from `fields`
        let Some(raw) = changes.get(schema_name).cloned() else {
            let removed = record.remove_field_named(RecordSection::Fields, record_name, false);
            debug!(
                record_uid = %record.uid,
                field_type = record_name,
                removed,
                "Removed unconfigured field"
            );
            return Ok(removed);
        };

        let field_type: FieldType = record_name.parse()?;
        let mut block = FieldBlock::parse(field_type, &raw)?.ok_or_else(|| {
            ProviderError::validation(format!(
                "apply change failed to get field data from schema - field: '{}', data: '{}'",
                schema_name, raw
            ))
        })?;

        let generate = if field_type.supports_generation() {
            let new = block.generate.clone().unwrap_or_default();
            let old = changes
                .prior_block(schema_name, field_type)?
                .and_then(|b| b.generate)
                .unwrap_or_default();
            !new.is_empty() && new != old
        } else {
            false
        };

        let mut field = build_block(field_type, &block)?;
        if generate && self.apply_generate_password(&mut block, &mut field)? {
            changes.set(schema_name, block.to_attribute());
        }

        if record.field_exists(section, field_type) {
            record.update_field(section, &field);
            debug!(record_uid = %record.uid, field_type = %field_type, %section, "Updated field");
        } else {
            record.insert_field(section, &field);
            debug!(record_uid = %record.uid, field_type = %field_type, %section, "Inserted field");
        }
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::ClientError;
    use crate::domain::record::RecordData;
    use serde_json::{json, Map, Value};

    struct FixedPassword;

    impl PasswordGenerator for FixedPassword {
        fn generate(&self, complexity: &PasswordComplexity) -> Result<String, ClientError> {
            Ok("x".repeat(complexity.length as usize))
        }
    }

    fn applier() -> ChangeApplier {
        ChangeApplier::new(Arc::new(FixedPassword), 16)
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn record(fields: Value) -> Record {
        let data: RecordData =
            serde_json::from_value(json!({"type": "sshKeys", "title": "t", "fields": fields})).unwrap();
        Record::new("KEndJhRb5TzYShFu-zJqDA", "f", data)
    }

    #[test]
    fn test_preconditions() {
        let applier = applier();
        let mut changes = ChangeSet::default();
        let mut rec = record(json!([]));

        let err = applier
            .apply_field_change("fields", "login", None, Some(&mut rec))
            .unwrap_err();
        assert_eq!(err.to_string(), "apply change expects both schema and record to be non empty");

        let err = applier
            .apply_field_change("notes", "login", Some(&mut changes), Some(&mut rec))
            .unwrap_err();
        assert!(err.to_string().contains("got 'notes'"));

        let err = applier
            .apply_field_change("fields", "  ", Some(&mut changes), Some(&mut rec))
            .unwrap_err();
        assert_eq!(err.to_string(), "apply change expects field name to be non empty");

        let err = applier
            .apply_field_change("fields", "color", Some(&mut changes), Some(&mut rec))
            .unwrap_err();
        assert!(err.to_string().contains("'color'"));
    }

    #[test]
    fn test_absent_attribute_removes_field() {
        let applier = applier();
        let mut rec = record(json!([{"type": "login", "value": ["a"]}, {"type": "host", "value": []}]));
        let mut changes = ChangeSet::new(object(json!({"login": [{"value": "a"}]})), Map::new());

        let count = applier
            .apply_field_change("fields", "login", Some(&mut changes), Some(&mut rec))
            .unwrap();
        assert_eq!(count, 1);
        assert!(!rec.field_exists(RecordSection::Fields, FieldType::Login));

        let count = applier
            .apply_field_change("fields", "login", Some(&mut changes), Some(&mut rec))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_absent_attribute_removed_from_fields_for_custom_section() {
        let applier = applier();
        let mut rec = record(json!([{"type": "login", "value": ["a"]}]));
        rec.data.custom.push(json!({"type": "login", "value": ["c"]}));
        let mut changes = ChangeSet::default();

        let count = applier
            .apply_field_change("custom", "login", Some(&mut changes), Some(&mut rec))
            .unwrap();
        assert_eq!(count, 1);
        assert!(!rec.field_exists(RecordSection::Fields, FieldType::Login));
        assert!(rec.field_exists(RecordSection::Custom, FieldType::Login));
    }

    #[test]
    fn test_upsert() {
        let applier = applier();
        let mut rec = record(json!([{"type": "login", "value": ["old"]}]));
        let mut changes = ChangeSet::from_planned(object(json!({
            "login": [{"value": "new"}],
            "host": [{"value": [{"host_name": "db", "port": "22"}]}]
        })));

        assert_eq!(
            applier.apply_field_change("fields", "login", Some(&mut changes), Some(&mut rec)).unwrap(),
            1
        );
        assert_eq!(
            applier.apply_field_change("fields", "host", Some(&mut changes), Some(&mut rec)).unwrap(),
            1
        );
        assert_eq!(rec.field_value_str(FieldType::Login), "new");
        assert_eq!(rec.data.fields.len(), 2);
    }

    #[test]
    fn test_passphrase_generation_writes_back() {
        let applier = applier();
        let mut rec = record(json!([{"type": "password", "value": ["old"]}]));
        let mut changes = ChangeSet::new(
            object(json!({"passphrase": [{"value": "old"}]})),
            object(json!({"passphrase": [{"generate": "yes", "complexity": [{"length": 20}]}]})),
        );

        applier
            .apply_field_change("fields", "passphrase", Some(&mut changes), Some(&mut rec))
            .unwrap();

        let generated = "x".repeat(20);
        assert_eq!(rec.field_value_str(FieldType::Password), generated);
        assert_eq!(changes.get("passphrase").unwrap()[0]["value"], json!(generated));
    }

    #[test]
    fn test_unchanged_generate_does_not_regenerate() {
        let applier = applier();
        let mut rec = record(json!([]));
        let mut changes = ChangeSet::new(
            object(json!({"password": [{"generate": "yes", "value": "kept"}]})),
            object(json!({"password": [{"generate": "yes", "value": "kept", "label": "l"}]})),
        );

        applier
            .apply_field_change("fields", "password", Some(&mut changes), Some(&mut rec))
            .unwrap();
        assert_eq!(rec.field_value_str(FieldType::Password), "kept");
    }

    #[test]
    fn test_invalid_complexity_rejected() {
        let applier = applier();
        let mut rec = record(json!([]));
        let mut changes = ChangeSet::from_planned(object(json!({
            "password": [{"generate": "true", "complexity": [{"length": 10, "caps": 6, "lowercase": 5}]}]
        })));

        let err = applier
            .apply_field_change("fields", "password", Some(&mut changes), Some(&mut rec))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidComplexity(_)));
    }

    #[test]
    fn test_parse_generate() {
        assert!(!parse_generate(None).unwrap());
        assert!(!parse_generate(Some("")).unwrap());
        assert!(parse_generate(Some("yes")).unwrap());
        assert!(parse_generate(Some("true")).unwrap());
        assert!(parse_generate(Some("always")).is_err());
    }
}
