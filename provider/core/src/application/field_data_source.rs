// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Field Value Data Source
//!
//! Reads a single value out of any record through a small notation:
//!
//! ```text
//! <uid>/type | <uid>/title | <uid>/notes
//! <uid>/field/<type or label>[index][property]
//! <uid>/custom_field/<type or label>[index][property]
//! ```
//!
//! `*` in place of the UID is replaced by the UID of the one record whose
//! title equals the `title` attribute. A single resulting value is returned
//! as-is when it is a string and JSON-encoded otherwise; several values are
//! returned as a JSON array.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Notation based single value lookup

use serde_json::Value;
use tracing::debug;

use crate::application::lookup::RecordLookup;
use crate::domain::attributes::ChangeSet;
use crate::domain::error::{ProviderError, ProviderResult};
use crate::domain::field::Field;
use crate::domain::record::{Record, RecordSection};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    RecordType,
    Title,
    Notes,
    Field {
        section: RecordSection,
        name: String,
        index: Option<usize>,
        property: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notation {
    uid: String,
    selector: Selector,
}

fn notation_error(path: &str, reason: &str) -> ProviderError {
    ProviderError::validation(format!("invalid notation '{}': {}", path, reason))
}

/// Split `name[0][street1]` into the name and its bracketed parameters.
fn split_parameters(path: &str, spec: &str) -> ProviderResult<(String, Vec<String>)> {
    let (name, mut rest) = match spec.find('[') {
        Some(i) => (&spec[..i], &spec[i..]),
        None => (spec, ""),
    };
    let mut parameters = Vec::new();
    while !rest.is_empty() {
        let close = rest
            .find(']')
            .filter(|_| rest.starts_with('['))
            .ok_or_else(|| notation_error(path, "unbalanced brackets"))?;
        parameters.push(rest[1..close].to_string());
        rest = &rest[close + 1..];
    }
    if name.is_empty() {
        return Err(notation_error(path, "missing field type or label"));
    }
    Ok((name.to_string(), parameters))
}

fn parse_notation(path: &str) -> ProviderResult<Notation> {
    let mut parts = path.splitn(3, '/');
    let uid = parts.next().unwrap_or_default().trim();
    let kind = parts.next().unwrap_or_default();
    let spec = parts.next();
    if uid.is_empty() {
        return Err(notation_error(path, "missing record UID"));
    }

    let selector = match (kind, spec) {
        ("type", None) => Selector::RecordType,
        ("title", None) => Selector::Title,
        ("notes", None) => Selector::Notes,
        ("field", Some(spec)) | ("custom_field", Some(spec)) => {
            let section = if kind == "field" {
                RecordSection::Fields
            } else {
                RecordSection::Custom
            };
            let (name, parameters) = split_parameters(path, spec)?;
            let mut index = None;
            let mut property = None;
            for parameter in parameters {
                match parameter.parse::<usize>() {
                    Ok(i) if index.is_none() && property.is_none() => index = Some(i),
                    _ if property.is_none() => property = Some(parameter),
                    _ => return Err(notation_error(path, "too many parameters")),
                }
            }
            Selector::Field {
                section,
                name,
                index,
                property,
            }
        }
        _ => {
            return Err(notation_error(
                path,
                "expected type, title, notes, field/<name> or custom_field/<name>",
            ))
        }
    };
    Ok(Notation {
        uid: uid.to_string(),
        selector,
    })
}

fn select_values(
    path: &str,
    record: &Record,
    section: RecordSection,
    name: &str,
    index: Option<usize>,
    property: Option<&str>,
) -> ProviderResult<Vec<Value>> {
    let raw = record
        .section(section)
        .iter()
        .find(|raw| {
            Field::raw_type(raw) == Some(name)
                || raw.get("label").and_then(Value::as_str) == Some(name)
        })
        .ok_or_else(|| notation_error(path, &format!("field '{}' not found", name)))?;

    let values = raw
        .get("value")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let values = match index {
        Some(i) => vec![values
            .get(i)
            .cloned()
            .ok_or_else(|| notation_error(path, &format!("index {} out of range", i)))?],
        None => values,
    };
    match property {
        None => Ok(values),
        Some(property) => values
            .iter()
            .map(|v| {
                v.get(property).cloned().ok_or_else(|| {
                    notation_error(path, &format!("property '{}' not found", property))
                })
            })
            .collect(),
    }
}

fn render(values: Vec<Value>) -> String {
    match values.as_slice() {
        [Value::String(s)] => s.clone(),
        [single] => single.to_string(),
        _ => Value::Array(values).to_string(),
    }
}

pub struct FieldDataSource {
    lookup: RecordLookup,
}

impl FieldDataSource {
    pub fn new(lookup: RecordLookup) -> Self {
        Self { lookup }
    }

    pub async fn read(&self, changes: &mut ChangeSet) -> ProviderResult<()> {
        let mut path = changes.get_trimmed("path");
        let title = changes.get_trimmed("title");

        if !title.is_empty() && path.contains('*') {
            let matches = self.lookup.records_with_title(&title).await?;
            if matches.len() != 1 {
                return Err(ProviderError::AmbiguousMatch(format!(
                    "expected 1 record - found {} records with title: {}",
                    matches.len(),
                    title
                )));
            }
            path = path.replacen('*', &matches[0].uid, 1);
            changes.set("path", Value::String(path.clone()));
        }

        let notation = parse_notation(&path)?;
        let record = self.lookup.get_record(&notation.uid, "").await?;
        let value = match &notation.selector {
            Selector::RecordType => record.record_type().to_string(),
            Selector::Title => record.title().to_string(),
            Selector::Notes => record.notes().to_string(),
            Selector::Field {
                section,
                name,
                index,
                property,
            } => render(select_values(
                &path,
                &record,
                *section,
                name,
                *index,
                property.as_deref(),
            )?),
        };
        debug!(record_uid = %record.uid, "Resolved field notation");

        changes.set("value", Value::String(value));
        changes.set("id", Value::String(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RecordData;
    use crate::infrastructure::memory_vault::InMemorySecretsManager;
    use serde_json::json;
    use std::sync::Arc;

    const UID: &str = "KEndJhRb5TzYShFu-zJqDA";

    fn source() -> FieldDataSource {
        let vault = InMemorySecretsManager::new();
        let data: RecordData = serde_json::from_value(json!({
            "type": "login",
            "title": "Prod DB",
            "fields": [
                {"type": "login", "value": ["admin"]},
                {"type": "url", "value": ["https://a", "https://b"]},
                {"type": "host", "value": [{"hostName": "db", "port": "5432"}]}
            ],
            "custom": [{"type": "text", "label": "env", "value": ["prod"]}]
        }))
        .unwrap();
        vault.insert_record(Record::new(UID, "f", data));
        vault.insert_record(Record::new("5dWX0-UOKMAFVjzXhhxu9A", "f", RecordData::new("login", "Dup")));
        vault.insert_record(Record::new("jYQ9jjIAJhKXHGkmeaBa5g", "f", RecordData::new("login", "Dup")));
        FieldDataSource::new(RecordLookup::new(Arc::new(vault)))
    }

    async fn value(path: &str) -> ProviderResult<String> {
        let mut changes = ChangeSet::default();
        changes.set("path", json!(path));
        source().read(&mut changes).await?;
        Ok(changes.get_str("value").unwrap_or_default().to_string())
    }

    #[tokio::test]
    async fn test_notation_values() {
        assert_eq!(value(&format!("{}/field/login", UID)).await.unwrap(), "admin");
        assert_eq!(value(&format!("{}/title", UID)).await.unwrap(), "Prod DB");
        assert_eq!(value(&format!("{}/field/url[1]", UID)).await.unwrap(), "https://b");
        assert_eq!(
            value(&format!("{}/field/url", UID)).await.unwrap(),
            r#"["https://a","https://b"]"#
        );
        assert_eq!(value(&format!("{}/field/host[0][port]", UID)).await.unwrap(), "5432");
        assert_eq!(value(&format!("{}/custom_field/env", UID)).await.unwrap(), "prod");
    }

    #[tokio::test]
    async fn test_notation_errors() {
        assert!(value(&format!("{}/field/password", UID)).await.is_err());
        assert!(value(&format!("{}/field/url[5]", UID)).await.is_err());
        assert!(value(&format!("{}/secret", UID)).await.is_err());
        assert!(value(&format!("{}/field/url[0", UID)).await.is_err());
    }

    #[tokio::test]
    async fn test_title_substitution() {
        let source = source();
        let mut changes = ChangeSet::default();
        changes.set("path", json!("*/field/login"));
        changes.set("title", json!("Prod DB"));
        source.read(&mut changes).await.unwrap();
        assert_eq!(changes.get_str("path").unwrap(), format!("{}/field/login", UID));
        assert_eq!(changes.get_str("value"), Some("admin"));

        let mut changes = ChangeSet::default();
        changes.set("path", json!("*/title"));
        changes.set("title", json!("Dup"));
        let err = source.read(&mut changes).await.unwrap_err();
        assert_eq!(err.to_string(), "expected 1 record - found 2 records with title: Dup");
    }

    #[test]
    fn test_parse_notation() {
        let notation = parse_notation("abc/field/name[0][first]").unwrap();
        assert_eq!(
            notation.selector,
            Selector::Field {
                section: RecordSection::Fields,
                name: "name".to_string(),
                index: Some(0),
                property: Some("first".to_string()),
            }
        );
        assert!(parse_notation("/title").is_err());
        assert!(parse_notation("abc/field").is_err());
    }
}
