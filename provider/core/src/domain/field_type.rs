// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Field Type Registry
//!
//! The closed set of record field types a vault record can carry, and the
//! value shape each one stores.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Field type identifiers and their value kinds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::field::FieldError;

/// Shape of the `value` array a field type stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain strings (logins, URLs, notes, record UIDs for references)
    Text,
    /// Millisecond epoch timestamps
    Date,
    /// Sub-objects with a fixed per-type attribute list
    Structured,
    /// File UIDs resolved against the record's attachments
    FileRefs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    AccountNumber,
    Address,
    AddressRef,
    BankAccount,
    BirthDate,
    CardRef,
    Date,
    Email,
    ExpirationDate,
    FileRef,
    Host,
    KeyPair,
    LicenseNumber,
    Login,
    Multiline,
    Name,
    Note,
    OneTimeCode,
    Password,
    PaymentCard,
    Phone,
    PinCode,
    Secret,
    SecurityQuestion,
    Text,
    Url,
}

impl FieldType {
    pub const ALL: [FieldType; 26] = [
        FieldType::AccountNumber,
        FieldType::Address,
        FieldType::AddressRef,
        FieldType::BankAccount,
        FieldType::BirthDate,
        FieldType::CardRef,
        FieldType::Date,
        FieldType::Email,
        FieldType::ExpirationDate,
        FieldType::FileRef,
        FieldType::Host,
        FieldType::KeyPair,
        FieldType::LicenseNumber,
        FieldType::Login,
        FieldType::Multiline,
        FieldType::Name,
        FieldType::Note,
        FieldType::OneTimeCode,
        FieldType::Password,
        FieldType::PaymentCard,
        FieldType::Phone,
        FieldType::PinCode,
        FieldType::Secret,
        FieldType::SecurityQuestion,
        FieldType::Text,
        FieldType::Url,
    ];

    /// Name used in the vault record JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::AccountNumber => "accountNumber",
            FieldType::Address => "address",
            FieldType::AddressRef => "addressRef",
            FieldType::BankAccount => "bankAccount",
            FieldType::BirthDate => "birthDate",
            FieldType::CardRef => "cardRef",
            FieldType::Date => "date",
            FieldType::Email => "email",
            FieldType::ExpirationDate => "expirationDate",
            FieldType::FileRef => "fileRef",
            FieldType::Host => "host",
            FieldType::KeyPair => "keyPair",
            FieldType::LicenseNumber => "licenseNumber",
            FieldType::Login => "login",
            FieldType::Multiline => "multiline",
            FieldType::Name => "name",
            FieldType::Note => "note",
            FieldType::OneTimeCode => "oneTimeCode",
            FieldType::Password => "password",
            FieldType::PaymentCard => "paymentCard",
            FieldType::Phone => "phone",
            FieldType::PinCode => "pinCode",
            FieldType::Secret => "secret",
            FieldType::SecurityQuestion => "securityQuestion",
            FieldType::Text => "text",
            FieldType::Url => "url",
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            FieldType::BirthDate | FieldType::Date | FieldType::ExpirationDate => ValueKind::Date,
            FieldType::Address
            | FieldType::BankAccount
            | FieldType::Host
            | FieldType::KeyPair
            | FieldType::Name
            | FieldType::PaymentCard
            | FieldType::Phone
            | FieldType::SecurityQuestion => ValueKind::Structured,
            FieldType::FileRef => ValueKind::FileRefs,
            _ => ValueKind::Text,
        }
    }

    /// File references carry no privacy screen flag.
    pub fn supports_privacy_screen(&self) -> bool {
        !matches!(self, FieldType::FileRef)
    }

    /// Only passwords carry complexity and generation settings.
    pub fn supports_generation(&self) -> bool {
        matches!(self, FieldType::Password)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FieldError::UnknownFieldType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_registered_type() {
        for field_type in FieldType::ALL {
            let parsed: FieldType = field_type.as_str().parse().unwrap();
            assert_eq!(parsed, field_type);
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = "checkbox".parse::<FieldType>().unwrap_err();
        assert!(matches!(err, FieldError::UnknownFieldType(ref t) if t == "checkbox"));
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(FieldType::BirthDate.value_kind(), ValueKind::Date);
        assert_eq!(FieldType::Host.value_kind(), ValueKind::Structured);
        assert_eq!(FieldType::FileRef.value_kind(), ValueKind::FileRefs);
        assert_eq!(FieldType::CardRef.value_kind(), ValueKind::Text);
    }

    #[test]
    fn test_serde_uses_record_names() {
        let json = serde_json::to_string(&FieldType::SecurityQuestion).unwrap();
        assert_eq!(json, "\"securityQuestion\"");
    }
}
