// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Record Type Schemas
//!
//! Per-template attribute tables driving the generic record resource and
//! data source. Every field attribute is a single-element block list; the
//! record-level attributes (`folder_uid`, `uid`, `type`, `title`, `notes`)
//! are shared by all templates and are not listed here.
//!
//! | Template | Field attributes |
//! |----------|------------------|
//! | `login` / `general` | login, password, url, totp, file_ref |
//! | `bankAccount` | bank_account, name, login, password, url, card_ref, totp, file_ref |
//! | `sshKeys` | login, key_pair, passphrase, host, file_ref |
//! | ... | see [`RECORD_SCHEMAS`] |
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Declarative attribute tables for resources and data sources

use crate::domain::field_type::FieldType;
use crate::domain::record::RecordType;

pub const PROVIDER_NAME: &str = "secretsmanager";

/// One field attribute of a record template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub field_type: FieldType,
    /// Redacted by the host in plans and logs
    pub sensitive: bool,
}

const fn attr(name: &'static str, field_type: FieldType) -> AttributeSchema {
    AttributeSchema {
        name,
        field_type,
        sensitive: false,
    }
}

const fn secret(name: &'static str, field_type: FieldType) -> AttributeSchema {
    AttributeSchema {
        name,
        field_type,
        sensitive: true,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    pub record_type: RecordType,
    pub attributes: &'static [AttributeSchema],
    /// `general` is read-only: data source without a resource
    pub has_resource: bool,
}

impl RecordSchema {
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn resource_name(&self) -> String {
        format!("{}_{}", PROVIDER_NAME, self.record_type.snake_name())
    }

    /// Sensitive attribute names, for host-side redaction
    pub fn sensitive_attributes(&self) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.sensitive)
            .map(|a| a.name)
            .collect()
    }
}

const FILE_REF: AttributeSchema = secret("file_ref", FieldType::FileRef);
const TOTP: AttributeSchema = secret("totp", FieldType::OneTimeCode);
const PASSWORD: AttributeSchema = secret("password", FieldType::Password);
const LOGIN: AttributeSchema = attr("login", FieldType::Login);
const URL: AttributeSchema = attr("url", FieldType::Url);
const NAME: AttributeSchema = attr("name", FieldType::Name);
const BIRTH_DATE: AttributeSchema = attr("birth_date", FieldType::BirthDate);
const ADDRESS_REF: AttributeSchema = attr("address_ref", FieldType::AddressRef);
const EXPIRATION_DATE: AttributeSchema = attr("expiration_date", FieldType::ExpirationDate);
const ACCOUNT_NUMBER: AttributeSchema = attr("account_number", FieldType::AccountNumber);
const HOST: AttributeSchema = attr("host", FieldType::Host);

pub static RECORD_SCHEMAS: [RecordSchema; 19] = [
    RecordSchema {
        record_type: RecordType::Address,
        attributes: &[attr("address", FieldType::Address), FILE_REF],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::BankAccount,
        attributes: &[
            secret("bank_account", FieldType::BankAccount),
            NAME,
            LOGIN,
            PASSWORD,
            URL,
            attr("card_ref", FieldType::CardRef),
            TOTP,
            FILE_REF,
        ],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::BankCard,
        attributes: &[
            secret("payment_card", FieldType::PaymentCard),
            attr("cardholder_name", FieldType::Text),
            secret("pin_code", FieldType::PinCode),
            ADDRESS_REF,
            FILE_REF,
        ],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::BirthCertificate,
        attributes: &[NAME, BIRTH_DATE, FILE_REF],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::Contact,
        attributes: &[
            NAME,
            attr("company", FieldType::Text),
            attr("email", FieldType::Email),
            attr("phone", FieldType::Phone),
            ADDRESS_REF,
            FILE_REF,
        ],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::DatabaseCredentials,
        attributes: &[
            attr("db_type", FieldType::Text),
            HOST,
            LOGIN,
            PASSWORD,
            FILE_REF,
        ],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::DriverLicense,
        attributes: &[
            attr("driver_license_number", FieldType::AccountNumber),
            NAME,
            BIRTH_DATE,
            ADDRESS_REF,
            EXPIRATION_DATE,
            FILE_REF,
        ],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::EncryptedNotes,
        attributes: &[
            secret("note", FieldType::Note),
            attr("date", FieldType::Date),
            FILE_REF,
        ],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::File,
        attributes: &[FILE_REF],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::General,
        attributes: &[LOGIN, PASSWORD, URL, TOTP, FILE_REF],
        has_resource: false,
    },
    RecordSchema {
        record_type: RecordType::HealthInsurance,
        attributes: &[ACCOUNT_NUMBER, NAME, LOGIN, PASSWORD, URL, FILE_REF],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::Login,
        attributes: &[LOGIN, PASSWORD, URL, TOTP, FILE_REF],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::Membership,
        attributes: &[ACCOUNT_NUMBER, NAME, PASSWORD, FILE_REF],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::Passport,
        attributes: &[
            attr("passport_number", FieldType::AccountNumber),
            NAME,
            BIRTH_DATE,
            ADDRESS_REF,
            EXPIRATION_DATE,
            attr("date_issued", FieldType::Date),
            PASSWORD,
            FILE_REF,
        ],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::Photo,
        attributes: &[FILE_REF],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::ServerCredentials,
        attributes: &[HOST, LOGIN, PASSWORD, FILE_REF],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::SoftwareLicense,
        attributes: &[
            secret("license_number", FieldType::LicenseNumber),
            attr("activation_date", FieldType::Date),
            EXPIRATION_DATE,
            FILE_REF,
        ],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::SshKeys,
        attributes: &[
            LOGIN,
            secret("key_pair", FieldType::KeyPair),
            secret("passphrase", FieldType::Password),
            HOST,
            FILE_REF,
        ],
        has_resource: true,
    },
    RecordSchema {
        record_type: RecordType::SsnCard,
        attributes: &[
            secret("identity_number", FieldType::AccountNumber),
            NAME,
            FILE_REF,
        ],
        has_resource: true,
    },
];

pub fn record_schema(record_type: RecordType) -> &'static RecordSchema {
    RECORD_SCHEMAS
        .iter()
        .find(|s| s.record_type == record_type)
        .unwrap_or(&RECORD_SCHEMAS[0])
}

/// Provider-level resource name (`secretsmanager_<name>`) to record template
pub fn record_type_for(resource_name: &str) -> Option<RecordType> {
    resource_name
        .strip_prefix(PROVIDER_NAME)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(RecordType::from_snake_name)
}

pub const FOLDER_RESOURCE: &str = "secretsmanager_folder";
pub const FOLDER_DATA_SOURCE: &str = "secretsmanager_folder";
pub const FOLDERS_DATA_SOURCE: &str = "secretsmanager_folders";
pub const FIELD_DATA_SOURCE: &str = "secretsmanager_field";
pub const RECORDS_DATA_SOURCE: &str = "secretsmanager_records";

/// Every resource type name the provider registers, sorted
pub fn resource_names() -> Vec<String> {
    let mut names: Vec<String> = RECORD_SCHEMAS
        .iter()
        .filter(|s| s.has_resource)
        .map(RecordSchema::resource_name)
        .collect();
    names.push(FOLDER_RESOURCE.to_string());
    names.sort();
    names
}

/// Every data source type name the provider registers, sorted
pub fn data_source_names() -> Vec<String> {
    let mut names: Vec<String> = RECORD_SCHEMAS
        .iter()
        .map(RecordSchema::resource_name)
        .collect();
    names.extend(
        [
            FOLDER_DATA_SOURCE,
            FOLDERS_DATA_SOURCE,
            FIELD_DATA_SOURCE,
            RECORDS_DATA_SOURCE,
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_has_a_schema() {
        for record_type in RecordType::ALL {
            assert_eq!(record_schema(record_type).record_type, record_type);
        }
    }

    #[test]
    fn test_general_is_data_source_only() {
        let resources = resource_names();
        assert!(!resources.contains(&"secretsmanager_general".to_string()));
        assert!(resources.contains(&"secretsmanager_folder".to_string()));
        assert_eq!(resources.len(), 19);

        let data_sources = data_source_names();
        assert!(data_sources.contains(&"secretsmanager_general".to_string()));
        assert_eq!(data_sources.len(), 23);
    }

    #[test]
    fn test_resource_name_lookup() {
        assert_eq!(record_type_for("secretsmanager_ssh_keys"), Some(RecordType::SshKeys));
        assert_eq!(record_type_for("secretsmanager_nope"), None);
        assert_eq!(record_type_for("other_login"), None);
    }

    #[test]
    fn test_ssh_keys_passphrase_is_a_password() {
        let schema = record_schema(RecordType::SshKeys);
        let passphrase = schema.attribute("passphrase").unwrap();
        assert_eq!(passphrase.field_type, FieldType::Password);
        assert!(passphrase.sensitive);
    }
}
