// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Record to Attribute Projection
//!
//! Reads the first field of a given type from a record section and produces
//! its attribute block. Only members present on the vault field are copied;
//! structured sub-values are renamed through each type's attribute table.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Vault field to provider attribute conversion

use serde_json::{Map, Value};

use crate::domain::attributes::{BlockValue, FieldBlock, FileBlock};
use crate::domain::field::{Field, FieldError};
use crate::domain::field_type::FieldType;
use crate::domain::field_value::FieldValue;
use crate::domain::record::{Record, RecordSection};

/// Attribute block of an already parsed field
pub fn project(field: &Field) -> FieldBlock {
    let mut block = FieldBlock::new(field.field_type);
    block.label = field.label.clone();
    block.required = field.required;
    block.privacy_screen = field.privacy_screen;
    block.enforce_generation = field.enforce_generation;
    block.complexity = field.complexity;
    block.value = field.value.as_ref().and_then(project_value);
    block
}

fn project_value(value: &FieldValue) -> Option<BlockValue> {
    match value {
        FieldValue::Text(_) => value
            .first_text()
            .map(|text| BlockValue::Scalar(text.to_string())),
        FieldValue::Date(_) => value.first_date().map(BlockValue::Integer),
        FieldValue::FileRefs(uids) => {
            let files: Vec<FileBlock> = uids
                .iter()
                .filter(|uid| !uid.is_empty())
                .map(|uid| FileBlock::uid_only(uid.as_str()))
                .collect();
            (!files.is_empty()).then_some(BlockValue::Files(files))
        }
        _ => value
            .first_structured_attributes()
            .map(|attributes| BlockValue::Structured(vec![attributes])),
    }
}

/// Project the first `field_type` field of `section`.
///
/// A missing field is `Ok(None)`; a field whose JSON does not fit its type
/// is an error.
pub fn project_field(
    field_type: FieldType,
    section: RecordSection,
    record: &Record,
) -> Result<Option<FieldBlock>, FieldError> {
    Ok(record.first_field(section, field_type)?.map(|f| project(&f)))
}

/// Attribute value of an optional block: `[block]` or `[]`
pub fn attribute_value(block: Option<&FieldBlock>) -> Value {
    match block {
        Some(block) => block.to_attribute(),
        None => Value::Array(Vec::new()),
    }
}

/// Resource-state form of [`project_field`]
pub fn project_field_value(
    field_type: FieldType,
    section: RecordSection,
    record: &Record,
) -> Result<Value, FieldError> {
    Ok(attribute_value(project_field(field_type, section, record)?.as_ref()))
}

/// Sub-attributes of the first structured `field_type` value in `fields`,
/// as a data source list (`[{...}]` or `[]`).
pub fn structured_items(record: &Record, field_type: FieldType) -> Result<Value, FieldError> {
    let attributes = record
        .first_field(RecordSection::Fields, field_type)?
        .and_then(|f| f.value)
        .and_then(|v| v.first_structured_attributes());
    Ok(match attributes {
        Some(map) => Value::Array(vec![Value::Object(map)]),
        None => Value::Array(Vec::new()),
    })
}

/// Resolved `address_ref` for data sources.
///
/// `referenced` is the record behind `uid`, if it could be fetched. A missing
/// reference degrades to a uid-only entry.
pub fn project_address_ref(uid: &str, referenced: Option<&Record>) -> Value {
    let mut item = Map::new();
    item.insert("uid".to_string(), Value::String(uid.to_string()));
    if let Some(record) = referenced {
        if let Ok(Some(Field {
            value: Some(value), ..
        })) = record.first_field(RecordSection::Fields, FieldType::Address)
        {
            if let Some(address) = value.first_structured_attributes() {
                item.extend(address);
            }
        }
    }
    Value::Array(vec![Value::Object(item)])
}

/// Resolved `card_ref` for data sources: payment card, cardholder name and
/// PIN of the referenced bank card, or a uid-only entry.
pub fn project_card_ref(uid: &str, referenced: Option<&Record>) -> Value {
    let mut item = Map::new();
    item.insert("uid".to_string(), Value::String(uid.to_string()));
    if let Some(record) = referenced {
        let cards = structured_items(record, FieldType::PaymentCard)
            .unwrap_or_else(|_| Value::Array(Vec::new()));
        item.insert("payment_card".to_string(), cards);
        item.insert(
            "cardholder_name".to_string(),
            Value::String(record.field_value_str(FieldType::Text)),
        );
        item.insert(
            "pin_code".to_string(),
            Value::String(record.field_value_str(FieldType::PinCode)),
        );
    }
    Value::Array(vec![Value::Object(item)])
}

/// Carry the state-only `generate` flag into a freshly projected password.
pub fn merge_password(state: Option<&FieldBlock>, projected: Option<&mut FieldBlock>) {
    if let (Some(state), Some(projected)) = (state, projected) {
        if let Some(generate) = &state.generate {
            projected.generate = Some(generate.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RecordData;
    use serde_json::json;

    fn record(fields: Value) -> Record {
        let data: RecordData =
            serde_json::from_value(json!({"type": "login", "title": "t", "fields": fields})).unwrap();
        Record::new("KEndJhRb5TzYShFu-zJqDA", "f", data)
    }

    #[test]
    fn test_absent_field_projects_to_empty_list() {
        let record = record(json!([{"type": "login", "value": ["admin"]}]));
        let value = project_field_value(FieldType::Url, RecordSection::Fields, &record).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn test_only_present_members_are_projected() {
        let record = record(json!([{"type": "login", "required": true, "value": ["admin"]}]));
        let value = project_field_value(FieldType::Login, RecordSection::Fields, &record).unwrap();
        assert_eq!(value, json!([{"type": "login", "required": true, "value": "admin"}]));
    }

    #[test]
    fn test_structured_names_are_mapped() {
        let record = record(json!([{
            "type": "bankAccount",
            "value": [{"accountType": "Checking", "routingNumber": "123", "bogus": "x"}]
        }]));
        let value =
            project_field_value(FieldType::BankAccount, RecordSection::Fields, &record).unwrap();
        assert_eq!(
            value,
            json!([{"type": "bankAccount", "value": [{"account_type": "Checking", "routing_number": "123"}]}])
        );
    }

    #[test]
    fn test_only_first_structured_value_is_kept() {
        let record = record(json!([{
            "type": "phone",
            "value": [{}, {"number": "1"}, {"number": "2"}]
        }]));
        let block = project_field(FieldType::Phone, RecordSection::Fields, &record)
            .unwrap()
            .unwrap();
        assert_eq!(block.value, Some(BlockValue::Structured(vec![
            json!({"number": "1"}).as_object().cloned().unwrap()
        ])));
    }

    #[test]
    fn test_float_dates_are_truncated() {
        let record = record(json!([{"type": "birthDate", "value": [1700000000999.0]}]));
        let block = project_field(FieldType::BirthDate, RecordSection::Fields, &record)
            .unwrap()
            .unwrap();
        assert_eq!(block.value, Some(BlockValue::Integer(1_700_000_000_999)));
    }

    #[test]
    fn test_malformed_field_is_an_error() {
        let record = record(json!([{"type": "host", "value": [42]}]));
        assert!(project_field(FieldType::Host, RecordSection::Fields, &record).is_err());
    }

    #[test]
    fn test_custom_section() {
        let data: RecordData = serde_json::from_value(json!({
            "type": "login",
            "title": "t",
            "custom": [{"type": "text", "label": "env", "value": ["prod"]}]
        }))
        .unwrap();
        let record = Record::new("u", "f", data);
        let block = project_field(FieldType::Text, RecordSection::Custom, &record)
            .unwrap()
            .unwrap();
        assert_eq!(block.label.as_deref(), Some("env"));
        assert!(project_field(FieldType::Text, RecordSection::Fields, &record).unwrap().is_none());
    }

    #[test]
    fn test_missing_reference_degrades_to_uid() {
        assert_eq!(project_address_ref("abc", None), json!([{"uid": "abc"}]));
        assert_eq!(project_card_ref("abc", None), json!([{"uid": "abc"}]));
    }

    #[test]
    fn test_address_ref_resolution() {
        let data: RecordData = serde_json::from_value(json!({
            "type": "address",
            "title": "HQ",
            "fields": [{"type": "address", "value": [{"street1": "1 Main", "city": "Springfield"}]}]
        }))
        .unwrap();
        let address = Record::new("abc", "f", data);
        assert_eq!(
            project_address_ref("abc", Some(&address)),
            json!([{"uid": "abc", "street1": "1 Main", "city": "Springfield"}])
        );
    }

    #[test]
    fn test_merge_password_keeps_generate() {
        let state = FieldBlock {
            generate: Some("yes".to_string()),
            ..FieldBlock::default()
        };
        let mut projected = FieldBlock::new(FieldType::Password);
        merge_password(Some(&state), Some(&mut projected));
        assert_eq!(projected.generate.as_deref(), Some("yes"));
    }
}
