// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Attribute Representation
//!
//! The provider-side view of record fields. Every field attribute is a
//! single-element list holding a [`FieldBlock`]; the block's members are
//! snake_case and optional, mirroring the vault field's presence. A
//! [`ChangeSet`] carries the prior state and the planned configuration of one
//! provider operation.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Attribute blocks and change tracking for CRUD operations

use serde_json::{Map, Value};

use crate::domain::complexity::PasswordComplexity;
use crate::domain::field::FieldError;
use crate::domain::field_type::{FieldType, ValueKind};

/// An attached file as exposed in `file_ref` blocks.
///
/// Only `uid` is configurable; everything else is computed from the record's
/// attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBlock {
    pub uid: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub file_type: Option<String>,
    pub size: Option<i64>,
    pub last_modified: Option<String>,
    pub content_base64: Option<String>,
}

impl FileBlock {
    pub fn uid_only(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("uid".to_string(), Value::String(self.uid.clone()));
        let strings = [
            ("title", &self.title),
            ("name", &self.name),
            ("type", &self.file_type),
            ("last_modified", &self.last_modified),
            ("content_base64", &self.content_base64),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        if let Some(size) = self.size {
            map.insert("size".to_string(), Value::from(size));
        }
        Value::Object(map)
    }

    /// Entries without a non-empty uid are skipped by callers.
    pub fn from_json(raw: &Value) -> Option<Self> {
        let map = raw.as_object()?;
        let uid = map.get("uid").and_then(Value::as_str)?.trim();
        if uid.is_empty() {
            return None;
        }
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            uid: uid.to_string(),
            title: text("title"),
            name: text("name"),
            file_type: text("type"),
            size: map.get("size").and_then(Value::as_i64),
            last_modified: text("last_modified"),
            content_base64: text("content_base64"),
        })
    }
}

/// The `value` member of a field block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockValue {
    Scalar(String),
    Integer(i64),
    /// Structured sub-objects keyed by snake_case attribute names
    Structured(Vec<Map<String, Value>>),
    Files(Vec<FileBlock>),
}

impl BlockValue {
    pub fn to_json(&self) -> Value {
        match self {
            BlockValue::Scalar(s) => Value::String(s.clone()),
            BlockValue::Integer(i) => Value::from(*i),
            BlockValue::Structured(items) => {
                Value::Array(items.iter().cloned().map(Value::Object).collect())
            }
            BlockValue::Files(files) => Value::Array(files.iter().map(FileBlock::to_json).collect()),
        }
    }

    fn parse(field_type: FieldType, raw: &Value) -> Result<Option<Self>, FieldError> {
        let malformed = |reason: String| FieldError::Malformed {
            field_type: field_type.to_string(),
            reason,
        };
        if raw.is_null() {
            return Ok(None);
        }
        match field_type.value_kind() {
            ValueKind::Text => match raw {
                Value::String(s) => Ok(Some(BlockValue::Scalar(s.clone()))),
                other => Err(malformed(format!("value expects a string, got {}", other))),
            },
            ValueKind::Date => raw
                .as_i64()
                .or_else(|| raw.as_f64().map(|f| f as i64))
                .map(|i| Some(BlockValue::Integer(i)))
                .ok_or_else(|| malformed(format!("value expects an integer, got {}", raw))),
            ValueKind::Structured => match raw {
                Value::Array(items) => {
                    let mut maps = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::Object(map) => maps.push(map.clone()),
                            Value::Null => {}
                            other => {
                                return Err(malformed(format!(
                                    "value expects a list of objects, got {}",
                                    other
                                )))
                            }
                        }
                    }
                    Ok(Some(BlockValue::Structured(maps)))
                }
                other => Err(malformed(format!("value expects a list, got {}", other))),
            },
            ValueKind::FileRefs => match raw {
                Value::Array(items) => Ok(Some(BlockValue::Files(
                    items.iter().filter_map(FileBlock::from_json).collect(),
                ))),
                other => Err(malformed(format!("value expects a list, got {}", other))),
            },
        }
    }
}

/// One field attribute, as held in state or configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBlock {
    /// Computed field type name
    pub field_type: Option<String>,
    pub label: Option<String>,
    pub required: Option<bool>,
    pub privacy_screen: Option<bool>,
    pub enforce_generation: Option<bool>,
    /// Password only. "true" or "yes" requests generation.
    pub generate: Option<String>,
    pub complexity: Option<PasswordComplexity>,
    pub value: Option<BlockValue>,
}

/// Unwrap the single-element list convention; an empty list is "not set".
pub fn single_block(raw: &Value) -> Option<&Map<String, Value>> {
    match raw {
        Value::Array(items) => items.first().and_then(Value::as_object),
        Value::Object(map) => Some(map),
        _ => None,
    }
}

impl FieldBlock {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Parse an attribute value (`[ {...} ]` or a bare object) for a field of
    /// `field_type`. Returns `None` for an empty list or null.
    pub fn parse(field_type: FieldType, raw: &Value) -> Result<Option<Self>, FieldError> {
        let Some(map) = single_block(raw) else {
            return Ok(None);
        };
        let malformed = |key: &str, expected: &str, got: &Value| FieldError::Malformed {
            field_type: field_type.to_string(),
            reason: format!("'{}' expects {}, got {}", key, expected, got),
        };

        let text = |key: &str| -> Result<Option<String>, FieldError> {
            match map.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(malformed(key, "a string", other)),
            }
        };
        let flag = |key: &str| -> Result<Option<bool>, FieldError> {
            match map.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::Bool(b)) => Ok(Some(*b)),
                Some(other) => Err(malformed(key, "a boolean", other)),
            }
        };

        let complexity = map
            .get("complexity")
            .and_then(single_block)
            .map(PasswordComplexity::from_attributes);

        let value = match map.get("value") {
            None => None,
            Some(raw_value) => BlockValue::parse(field_type, raw_value)?,
        };

        Ok(Some(Self {
            field_type: text("type")?,
            label: text("label")?,
            required: flag("required")?,
            privacy_screen: flag("privacy_screen")?,
            enforce_generation: flag("enforce_generation")?,
            generate: text("generate")?,
            complexity,
            value,
        }))
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(field_type) = &self.field_type {
            map.insert("type".to_string(), Value::String(field_type.clone()));
        }
        if let Some(label) = &self.label {
            map.insert("label".to_string(), Value::String(label.clone()));
        }
        if let Some(required) = self.required {
            map.insert("required".to_string(), Value::Bool(required));
        }
        if let Some(privacy_screen) = self.privacy_screen {
            map.insert("privacy_screen".to_string(), Value::Bool(privacy_screen));
        }
        if let Some(enforce_generation) = self.enforce_generation {
            map.insert(
                "enforce_generation".to_string(),
                Value::Bool(enforce_generation),
            );
        }
        if let Some(generate) = &self.generate {
            map.insert("generate".to_string(), Value::String(generate.clone()));
        }
        if let Some(complexity) = &self.complexity {
            map.insert(
                "complexity".to_string(),
                Value::Array(vec![Value::Object(complexity.to_attributes())]),
            );
        }
        if let Some(value) = &self.value {
            map.insert("value".to_string(), value.to_json());
        }
        Value::Object(map)
    }

    /// The single-element list form used for attribute values
    pub fn to_attribute(&self) -> Value {
        Value::Array(vec![self.to_json()])
    }

    pub fn scalar(&self) -> Option<&str> {
        match &self.value {
            Some(BlockValue::Scalar(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Whether an attribute value counts as configured.
///
/// Null, empty strings and empty lists or objects are treated as unset.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Prior state and planned configuration of a single provider operation.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    prior: Map<String, Value>,
    planned: Map<String, Value>,
}

impl ChangeSet {
    pub fn new(prior: Map<String, Value>, planned: Map<String, Value>) -> Self {
        Self { prior, planned }
    }

    /// A change set for Create: nothing prior.
    pub fn from_planned(planned: Map<String, Value>) -> Self {
        Self::new(Map::new(), planned)
    }

    /// A change set for Read: the current state is both prior and planned.
    pub fn from_state(state: Map<String, Value>) -> Self {
        Self::new(state.clone(), state)
    }

    /// Planned value of `key`, if configured
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.planned.get(key).filter(|v| is_set(v))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Planned string value trimmed, empty if unset
    pub fn get_trimmed(&self, key: &str) -> String {
        self.get_str(key).map(str::trim).unwrap_or_default().to_string()
    }

    pub fn get_prior(&self, key: &str) -> Option<&Value> {
        self.prior.get(key).filter(|v| is_set(v))
    }

    /// (prior, planned) values of `key`
    pub fn get_change(&self, key: &str) -> (Option<&Value>, Option<&Value>) {
        (self.get_prior(key), self.get(key))
    }

    pub fn has_change(&self, key: &str) -> bool {
        let (old, new) = self.get_change(key);
        old != new
    }

    /// Keys whose value differs between prior and planned, sorted
    pub fn changed_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .prior
            .keys()
            .chain(self.planned.keys())
            .filter(|k| self.has_change(k))
            .cloned()
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.planned.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) {
        self.planned.remove(key);
    }

    /// Parse the field block configured under `key`
    pub fn block(&self, key: &str, field_type: FieldType) -> Result<Option<FieldBlock>, FieldError> {
        match self.get(key) {
            Some(raw) => FieldBlock::parse(field_type, raw),
            None => Ok(None),
        }
    }

    pub fn prior_block(
        &self,
        key: &str,
        field_type: FieldType,
    ) -> Result<Option<FieldBlock>, FieldError> {
        match self.get_prior(key) {
            Some(raw) => FieldBlock::parse(field_type, raw),
            None => Ok(None),
        }
    }

    pub fn planned(&self) -> &Map<String, Value> {
        &self.planned
    }

    pub fn into_planned(self) -> Map<String, Value> {
        self.planned
    }
}
