// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Attribute to Record Field Builder
//!
//! Inverse of [`crate::application::projector`]: turns an attribute block into
//! a vault field, copying only members present in the block so that unset
//! flags stay out of the vault's sparse field model.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Provider attribute to vault field conversion

use serde_json::Value;

use crate::domain::attributes::{BlockValue, FieldBlock};
use crate::domain::field::{Field, FieldError};
use crate::domain::field_type::{FieldType, ValueKind};
use crate::domain::field_value::FieldValue;

/// Build a field of `field_type_name` from a raw attribute value.
///
/// Returns `Ok(None)` when the attribute holds no block (empty list or null).
pub fn build_field(field_type_name: &str, raw: &Value) -> Result<Option<Field>, FieldError> {
    if !crate::domain::attributes::is_set(raw) {
        return Ok(None);
    }
    let field_type: FieldType = field_type_name.parse()?;
    match FieldBlock::parse(field_type, raw)? {
        Some(block) => build_block(field_type, &block).map(Some),
        None => Ok(None),
    }
}

/// Build a field of `field_type` from a parsed block
pub fn build_block(field_type: FieldType, block: &FieldBlock) -> Result<Field, FieldError> {
    let mut field = Field::new(field_type);
    field.label = block.label.clone();
    field.required = block.required;
    if field_type.supports_privacy_screen() {
        field.privacy_screen = block.privacy_screen;
    }
    if field_type.supports_generation() {
        field.enforce_generation = block.enforce_generation;
        field.complexity = block.complexity;
    }
    if let Some(value) = &block.value {
        field.value = Some(build_value(field_type, value)?);
    }
    Ok(field)
}

fn build_value(field_type: FieldType, value: &BlockValue) -> Result<FieldValue, FieldError> {
    let mismatch = || FieldError::Malformed {
        field_type: field_type.to_string(),
        reason: "attribute value does not match the field type".to_string(),
    };
    match (field_type.value_kind(), value) {
        (ValueKind::Text, BlockValue::Scalar(text)) => Ok(FieldValue::Text(
            Some(text.clone()).filter(|t| !t.is_empty()).into_iter().collect(),
        )),
        (ValueKind::Date, BlockValue::Integer(millis)) => Ok(FieldValue::Date(vec![*millis])),
        (ValueKind::Structured, BlockValue::Structured(items)) => {
            match items.iter().find(|item| !item.is_empty()) {
                Some(first) => FieldValue::structured_from_attributes(field_type, first),
                None => Ok(FieldValue::empty(field_type)),
            }
        }
        (ValueKind::FileRefs, BlockValue::Files(files)) => Ok(FieldValue::FileRefs(
            files.iter().map(|f| f.uid.clone()).collect(),
        )),
        _ => Err(mismatch()),
    }
}
