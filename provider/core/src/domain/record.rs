// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Vault Record Aggregate
//!
//! A record keeps its `fields` and `custom` lists as raw vault JSON. Typed
//! [`Field`] parsing happens on access, so entries of field types this crate
//! does not model survive a read-modify-save cycle untouched.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Record aggregate, record templates and field-bag operations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::field::{Field, FieldError};
use crate::domain::field_type::FieldType;

/// The two field lists of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSection {
    Fields,
    Custom,
}

impl RecordSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSection::Fields => "fields",
            RecordSection::Custom => "custom",
        }
    }
}

impl fmt::Display for RecordSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordSection {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fields" => Ok(RecordSection::Fields),
            "custom" => Ok(RecordSection::Custom),
            other => Err(FieldError::UnknownSection(other.to_string())),
        }
    }
}

/// Record templates the provider exposes as resources and data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    Address,
    BankAccount,
    BankCard,
    BirthCertificate,
    Contact,
    DatabaseCredentials,
    DriverLicense,
    EncryptedNotes,
    File,
    General,
    HealthInsurance,
    Login,
    Membership,
    Passport,
    Photo,
    ServerCredentials,
    SoftwareLicense,
    SshKeys,
    SsnCard,
}

impl RecordType {
    pub const ALL: [RecordType; 19] = [
        RecordType::Address,
        RecordType::BankAccount,
        RecordType::BankCard,
        RecordType::BirthCertificate,
        RecordType::Contact,
        RecordType::DatabaseCredentials,
        RecordType::DriverLicense,
        RecordType::EncryptedNotes,
        RecordType::File,
        RecordType::General,
        RecordType::HealthInsurance,
        RecordType::Login,
        RecordType::Membership,
        RecordType::Passport,
        RecordType::Photo,
        RecordType::ServerCredentials,
        RecordType::SoftwareLicense,
        RecordType::SshKeys,
        RecordType::SsnCard,
    ];

    /// Template name stored in the record's `type`
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Address => "address",
            RecordType::BankAccount => "bankAccount",
            RecordType::BankCard => "bankCard",
            RecordType::BirthCertificate => "birthCertificate",
            RecordType::Contact => "contact",
            RecordType::DatabaseCredentials => "databaseCredentials",
            RecordType::DriverLicense => "driverLicense",
            RecordType::EncryptedNotes => "encryptedNotes",
            RecordType::File => "file",
            RecordType::General => "general",
            RecordType::HealthInsurance => "healthInsurance",
            RecordType::Login => "login",
            RecordType::Membership => "membership",
            RecordType::Passport => "passport",
            RecordType::Photo => "photo",
            RecordType::ServerCredentials => "serverCredentials",
            RecordType::SoftwareLicense => "softwareLicense",
            RecordType::SshKeys => "sshKeys",
            RecordType::SsnCard => "ssnCard",
        }
    }

    /// snake_case name used in resource and data source type names
    pub fn snake_name(&self) -> &'static str {
        match self {
            RecordType::Address => "address",
            RecordType::BankAccount => "bank_account",
            RecordType::BankCard => "bank_card",
            RecordType::BirthCertificate => "birth_certificate",
            RecordType::Contact => "contact",
            RecordType::DatabaseCredentials => "database_credentials",
            RecordType::DriverLicense => "driver_license",
            RecordType::EncryptedNotes => "encrypted_notes",
            RecordType::File => "file",
            RecordType::General => "general",
            RecordType::HealthInsurance => "health_insurance",
            RecordType::Login => "login",
            RecordType::Membership => "membership",
            RecordType::Passport => "passport",
            RecordType::Photo => "photo",
            RecordType::ServerCredentials => "server_credentials",
            RecordType::SoftwareLicense => "software_license",
            RecordType::SshKeys => "ssh_keys",
            RecordType::SsnCard => "ssn_card",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        RecordType::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    pub fn from_snake_name(name: &str) -> Option<Self> {
        RecordType::ALL.iter().copied().find(|t| t.snake_name() == name)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decrypted record payload as the vault stores it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordData {
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default)]
    pub fields: Vec<Value>,
    #[serde(default)]
    pub custom: Vec<Value>,
}

impl RecordData {
    pub fn new(record_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

/// File attachment metadata. Content is fetched on demand through the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFile {
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub file_type: String,
    #[serde(default)]
    pub size: i64,
    /// Epoch milliseconds
    #[serde(default)]
    pub last_modified: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub uid: String,
    #[serde(default)]
    pub folder_uid: String,
    pub data: RecordData,
    #[serde(default)]
    pub files: Vec<VaultFile>,
}

impl Record {
    pub fn new(uid: impl Into<String>, folder_uid: impl Into<String>, data: RecordData) -> Self {
        Self {
            uid: uid.into(),
            folder_uid: folder_uid.into(),
            data,
            files: Vec::new(),
        }
    }

    pub fn record_type(&self) -> &str {
        &self.data.record_type
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    pub fn notes(&self) -> &str {
        &self.data.notes
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.data.title = title.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.data.notes = notes.into();
    }

    pub fn section(&self, section: RecordSection) -> &[Value] {
        match section {
            RecordSection::Fields => &self.data.fields,
            RecordSection::Custom => &self.data.custom,
        }
    }

    fn section_mut(&mut self, section: RecordSection) -> &mut Vec<Value> {
        match section {
            RecordSection::Fields => &mut self.data.fields,
            RecordSection::Custom => &mut self.data.custom,
        }
    }

    fn matches(raw: &Value, field_type: FieldType) -> bool {
        Field::raw_type(raw) == Some(field_type.as_str())
    }

    /// Raw vault JSON of the first field of `field_type`
    pub fn first_raw_field(&self, section: RecordSection, field_type: FieldType) -> Option<&Value> {
        self.section(section)
            .iter()
            .find(|raw| Self::matches(raw, field_type))
    }

    pub fn field_exists(&self, section: RecordSection, field_type: FieldType) -> bool {
        self.first_raw_field(section, field_type).is_some()
    }

    pub fn first_field(
        &self,
        section: RecordSection,
        field_type: FieldType,
    ) -> Result<Option<Field>, FieldError> {
        self.first_raw_field(section, field_type)
            .map(Field::from_json)
            .transpose()
    }

    pub fn fields_by_type(
        &self,
        section: RecordSection,
        field_type: FieldType,
    ) -> Result<Vec<Field>, FieldError> {
        self.section(section)
            .iter()
            .filter(|raw| Self::matches(raw, field_type))
            .map(Field::from_json)
            .collect()
    }

    pub fn insert_field(&mut self, section: RecordSection, field: &Field) {
        self.section_mut(section).push(field.to_json());
    }

    /// Replace the first field of the same type in place.
    /// Returns false when the record has no such field.
    pub fn update_field(&mut self, section: RecordSection, field: &Field) -> bool {
        let field_type = field.field_type;
        match self
            .section_mut(section)
            .iter_mut()
            .find(|raw| Self::matches(raw, field_type))
        {
            Some(slot) => {
                *slot = field.to_json();
                true
            }
            None => false,
        }
    }

    /// Remove the first (or every) field of `field_type`; returns the count removed.
    pub fn remove_field(
        &mut self,
        section: RecordSection,
        field_type: FieldType,
        remove_all: bool,
    ) -> usize {
        self.remove_field_named(section, field_type.as_str(), remove_all)
    }

    /// [`Record::remove_field`] by raw type name, for types outside [`FieldType`]
    pub fn remove_field_named(
        &mut self,
        section: RecordSection,
        type_name: &str,
        remove_all: bool,
    ) -> usize {
        let matches = |raw: &Value| Field::raw_type(raw) == Some(type_name);
        let entries = self.section_mut(section);
        if remove_all {
            let before = entries.len();
            entries.retain(|raw| !matches(raw));
            before - entries.len()
        } else if let Some(position) = entries.iter().position(|raw| matches(raw)) {
            entries.remove(position);
            1
        } else {
            0
        }
    }

    /// First non-empty text value of the first `fields` entry of `field_type`,
    /// or an empty string.
    pub fn field_value_str(&self, field_type: FieldType) -> String {
        match self.first_field(RecordSection::Fields, field_type) {
            Ok(Some(field)) => field.first_text().unwrap_or_default().to_string(),
            _ => String::new(),
        }
    }

    pub fn file(&self, uid: &str) -> Option<&VaultFile> {
        self.files.iter().find(|f| f.uid == uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        let data: RecordData = serde_json::from_value(json!({
            "type": "login",
            "title": "Prod DB",
            "fields": [
                {"type": "login", "value": ["admin"]},
                {"type": "password", "value": ["pw1"]},
                {"type": "checkbox", "value": [true]},
                {"type": "password", "label": "old", "value": ["pw0"]}
            ],
            "custom": [{"type": "text", "label": "env", "value": ["prod"]}]
        }))
        .unwrap();
        Record::new("KEndJhRb5TzYShFu-zJqDA", "folder", data)
    }

    #[test]
    fn test_section_parse() {
        assert_eq!("custom".parse::<RecordSection>().unwrap(), RecordSection::Custom);
        assert!(matches!(
            "notes".parse::<RecordSection>(),
            Err(FieldError::UnknownSection(_))
        ));
    }

    #[test]
    fn test_field_value_str() {
        let record = sample();
        assert_eq!(record.field_value_str(FieldType::Password), "pw1");
        assert_eq!(record.field_value_str(FieldType::Url), "");
    }

    #[test]
    fn test_update_replaces_first_same_type_field() {
        let mut record = sample();
        let mut field = Field::new(FieldType::Password);
        field.set_text("pw2");
        assert!(record.update_field(RecordSection::Fields, &field));
        assert_eq!(record.data.fields[1], json!({"type": "password", "value": ["pw2"]}));
        assert_eq!(record.data.fields[3]["label"], json!("old"));
    }

    #[test]
    fn test_remove_field_counts() {
        let mut record = sample();
        assert_eq!(record.remove_field(RecordSection::Fields, FieldType::Password, true), 2);
        assert_eq!(record.remove_field(RecordSection::Fields, FieldType::Password, false), 0);
        assert_eq!(record.remove_field(RecordSection::Custom, FieldType::Text, false), 1);
    }

    #[test]
    fn test_foreign_field_types_survive() {
        let record = sample();
        let json = serde_json::to_value(&record.data).unwrap();
        assert_eq!(json["fields"][2], json!({"type": "checkbox", "value": [true]}));
    }

    #[test]
    fn test_record_type_names() {
        for record_type in RecordType::ALL {
            assert_eq!(RecordType::parse(record_type.as_str()), Some(record_type));
            assert_eq!(RecordType::from_snake_name(record_type.snake_name()), Some(record_type));
        }
    }
}
