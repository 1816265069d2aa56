// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Vault Record Field
//!
//! A single typed entry of a record's `fields` or `custom` list, as the vault
//! stores it. Optional members are `None` when the vault JSON did not carry
//! them, which keeps sparse fields sparse when written back.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Field entity and its vault JSON conversion

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::complexity::PasswordComplexity;
use crate::domain::field_type::FieldType;
use crate::domain::field_value::FieldValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unable to create unknown field type {0}")]
    UnknownFieldType(String),

    #[error("malformed {field_type} field: {reason}")]
    Malformed { field_type: String, reason: String },

    #[error("field section must be one of ['fields', 'custom'] - got '{0}'")]
    UnknownSection(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub field_type: FieldType,
    pub label: Option<String>,
    pub required: Option<bool>,
    pub privacy_screen: Option<bool>,
    pub enforce_generation: Option<bool>,
    pub complexity: Option<PasswordComplexity>,
    pub value: Option<FieldValue>,
}

fn optional_bool(
    object: &Map<String, Value>,
    key: &str,
    field_type: FieldType,
) -> Result<Option<bool>, FieldError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(FieldError::Malformed {
            field_type: field_type.to_string(),
            reason: format!("'{}' expects a boolean, got {}", key, other),
        }),
    }
}

impl Field {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            label: None,
            required: None,
            privacy_screen: None,
            enforce_generation: None,
            complexity: None,
            value: None,
        }
    }

    pub fn with_value(field_type: FieldType, value: FieldValue) -> Self {
        Self {
            value: Some(value),
            ..Self::new(field_type)
        }
    }

    /// Raw `type` tag of a vault field entry, without parsing the rest
    pub fn raw_type(raw: &Value) -> Option<&str> {
        raw.get("type").and_then(Value::as_str)
    }

    /// Parse a vault field entry.
    pub fn from_json(raw: &Value) -> Result<Self, FieldError> {
        let object = raw.as_object().ok_or_else(|| FieldError::Malformed {
            field_type: "unknown".to_string(),
            reason: format!("expected a field object, got {}", raw),
        })?;

        let type_name = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| FieldError::Malformed {
                field_type: "unknown".to_string(),
                reason: "field has no type".to_string(),
            })?;
        let field_type: FieldType = type_name.parse()?;

        let label = match object.get("label") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(FieldError::Malformed {
                    field_type: field_type.to_string(),
                    reason: format!("'label' expects a string, got {}", other),
                })
            }
        };

        let complexity = match object.get("complexity") {
            None | Some(Value::Null) => None,
            Some(value @ Value::Object(_)) => Some(
                serde_json::from_value::<PasswordComplexity>(value.clone()).map_err(|e| {
                    FieldError::Malformed {
                        field_type: field_type.to_string(),
                        reason: format!("invalid complexity: {}", e),
                    }
                })?,
            ),
            Some(other) => {
                return Err(FieldError::Malformed {
                    field_type: field_type.to_string(),
                    reason: format!("'complexity' expects an object, got {}", other),
                })
            }
        };

        let value = match object.get("value") {
            None => None,
            Some(raw_value) => Some(FieldValue::from_json(field_type, raw_value)?),
        };

        Ok(Self {
            field_type,
            label,
            required: optional_bool(object, "required", field_type)?,
            privacy_screen: optional_bool(object, "privacyScreen", field_type)?,
            enforce_generation: optional_bool(object, "enforceGeneration", field_type)?,
            complexity,
            value,
        })
    }

    /// Vault JSON for this field. `value` is always written, empty if unset.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert(
            "type".to_string(),
            Value::String(self.field_type.as_str().to_string()),
        );
        if let Some(label) = &self.label {
            object.insert("label".to_string(), Value::String(label.clone()));
        }
        if let Some(required) = self.required {
            object.insert("required".to_string(), Value::Bool(required));
        }
        if let Some(privacy_screen) = self.privacy_screen {
            object.insert("privacyScreen".to_string(), Value::Bool(privacy_screen));
        }
        if let Some(enforce_generation) = self.enforce_generation {
            object.insert(
                "enforceGeneration".to_string(),
                Value::Bool(enforce_generation),
            );
        }
        if let Some(complexity) = &self.complexity {
            object.insert(
                "complexity".to_string(),
                serde_json::to_value(complexity).unwrap_or(Value::Null),
            );
        }
        let value = self
            .value
            .as_ref()
            .map(FieldValue::to_json)
            .unwrap_or_else(|| Value::Array(Vec::new()));
        object.insert("value".to_string(), value);
        Value::Object(object)
    }

    /// Replace the value with a single text entry
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.value = Some(FieldValue::Text(vec![text.into()]));
    }

    pub fn first_text(&self) -> Option<&str> {
        self.value.as_ref().and_then(FieldValue::first_text)
    }
}
