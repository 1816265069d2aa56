// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Attribute Name Mapper
//!
//! Translates provider attribute names (`driver_license_number`) to vault
//! field type names (`accountNumber`) and back. Several attributes alias the
//! same field type; a reverse lookup by field type returns the canonical
//! attribute, i.e. the first entry of the table for that type.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Immutable bidirectional attribute/field-type table

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// (attribute name, field type name). Canonical entries precede aliases.
const ATTRIBUTE_FIELD_TYPES: &[(&str, &str)] = &[
    ("account_number", "accountNumber"),
    ("address", "address"),
    ("address_ref", "addressRef"),
    ("bank_account", "bankAccount"),
    ("birth_date", "birthDate"),
    ("card_ref", "cardRef"),
    ("date", "date"),
    ("email", "email"),
    ("expiration_date", "expirationDate"),
    ("file_ref", "fileRef"),
    ("group_number", "groupNumber"),
    ("host", "host"),
    ("key_pair", "keyPair"),
    ("license_number", "licenseNumber"),
    ("login", "login"),
    ("multiline", "multiline"),
    ("name", "name"),
    ("note", "note"),
    ("one_time_code", "oneTimeCode"),
    ("password", "password"),
    ("payment_card", "paymentCard"),
    ("phone", "phone"),
    ("pin_code", "pinCode"),
    ("secret", "secret"),
    ("security_question", "securityQuestion"),
    ("text", "text"),
    ("title", "title"),
    ("url", "url"),
    // attributes distinguished by label rather than field type
    ("company", "text"),
    ("cardholder_name", "text"),
    ("db_type", "text"),
    ("driver_license_number", "accountNumber"),
    ("totp", "oneTimeCode"),
    ("passport_number", "accountNumber"),
    ("date_issued", "date"),
    ("activation_date", "date"),
    ("passphrase", "password"),
    ("identity_number", "accountNumber"),
];

#[derive(Debug)]
pub struct NameMapper {
    forward: HashMap<&'static str, &'static str>,
    reverse: HashMap<&'static str, &'static str>,
}

static NAME_MAPPER: Lazy<NameMapper> = Lazy::new(|| NameMapper::new(ATTRIBUTE_FIELD_TYPES));

impl NameMapper {
    fn new(table: &'static [(&'static str, &'static str)]) -> Self {
        let mut forward = HashMap::with_capacity(table.len());
        let mut reverse = HashMap::new();
        for (attribute, field_type) in table {
            forward.insert(*attribute, *field_type);
            reverse.entry(*field_type).or_insert(*attribute);
        }
        Self { forward, reverse }
    }

    pub fn global() -> &'static NameMapper {
        &NAME_MAPPER
    }

    /// `(attribute name, field type name)` for an attribute name or, failing
    /// that, a field type name. `None` when neither matches.
    pub fn resolve(&self, name: &str) -> Option<(&'static str, &'static str)> {
        if let Some((attribute, field_type)) = self.forward.get_key_value(name) {
            return Some((*attribute, *field_type));
        }
        self.reverse
            .get_key_value(name)
            .map(|(field_type, attribute)| (*attribute, *field_type))
    }

    pub fn field_type_name(&self, attribute: &str) -> Option<&'static str> {
        self.forward.get(attribute).copied()
    }
}

/// Shorthand for [`NameMapper::resolve`] on the global table
pub fn schema_and_record_names(name: &str) -> Option<(&'static str, &'static str)> {
    NameMapper::global().resolve(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_lookup() {
        assert_eq!(
            schema_and_record_names("driver_license_number"),
            Some(("driver_license_number", "accountNumber"))
        );
        assert_eq!(schema_and_record_names("passphrase"), Some(("passphrase", "password")));
    }

    #[test]
    fn test_reverse_lookup_is_canonical() {
        assert_eq!(schema_and_record_names("accountNumber"), Some(("account_number", "accountNumber")));
        assert_eq!(schema_and_record_names("text"), Some(("text", "text")));
        assert_eq!(schema_and_record_names("oneTimeCode"), Some(("one_time_code", "oneTimeCode")));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(schema_and_record_names("favorite_color"), None);
        assert_eq!(schema_and_record_names(""), None);
    }
}
