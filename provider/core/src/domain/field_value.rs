// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Field Values
//!
//! Typed representation of a field's `value` array. Each structured field
//! type declares its sub-attributes once, pairing the vault record name with
//! the snake_case attribute name exposed to Terraform. Every sub-attribute is
//! optional so that a value only carries what was actually present.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Tagged union over all field value shapes

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::field::FieldError;
use crate::domain::field_type::{FieldType, ValueKind};

/// A structured (sub-object) field value with a fixed attribute table.
pub trait StructuredValue: Sized + Serialize + DeserializeOwned {
    const FIELD_TYPE: FieldType;

    /// Attribute map keyed by snake_case names, present sub-attributes only
    fn to_attributes(&self) -> Map<String, Value>;

    /// Parse from an attribute map keyed by snake_case names.
    /// Keys outside the table are ignored.
    fn from_attributes(map: &Map<String, Value>) -> Result<Self, FieldError>;

    fn is_empty(&self) -> bool;
}

fn attribute_string(
    map: &Map<String, Value>,
    key: &str,
    field_type: FieldType,
) -> Result<Option<String>, FieldError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(FieldError::Malformed {
            field_type: field_type.to_string(),
            reason: format!("attribute '{}' expects a string, got {}", key, other),
        }),
    }
}

macro_rules! structured_value {
    (
        $(#[$meta:meta])*
        $name:ident => $field_type:expr, {
            $( $field:ident : $vendor:literal => $attribute:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(
                #[serde(rename = $vendor, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )+
        }

        impl StructuredValue for $name {
            const FIELD_TYPE: FieldType = $field_type;

            fn to_attributes(&self) -> Map<String, Value> {
                let mut map = Map::new();
                $(
                    if let Some(value) = &self.$field {
                        map.insert($attribute.to_string(), Value::String(value.clone()));
                    }
                )+
                map
            }

            fn from_attributes(map: &Map<String, Value>) -> Result<Self, FieldError> {
                Ok(Self {
                    $( $field: attribute_string(map, $attribute, $field_type)?, )+
                })
            }

            fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )+
            }
        }
    };
}

structured_value! {
    /// Postal address
    Address => FieldType::Address, {
        street1: "street1" => "street1",
        street2: "street2" => "street2",
        city: "city" => "city",
        state: "state" => "state",
        zip: "zip" => "zip",
        country: "country" => "country",
    }
}

structured_value! {
    BankAccount => FieldType::BankAccount, {
        account_type: "accountType" => "account_type",
        routing_number: "routingNumber" => "routing_number",
        account_number: "accountNumber" => "account_number",
        other_type: "otherType" => "other_type",
    }
}

structured_value! {
    Host => FieldType::Host, {
        host_name: "hostName" => "host_name",
        port: "port" => "port",
    }
}

structured_value! {
    /// SSH key material
    KeyPair => FieldType::KeyPair, {
        public_key: "publicKey" => "public_key",
        private_key: "privateKey" => "private_key",
    }
}

structured_value! {
    Name => FieldType::Name, {
        first: "first" => "first",
        middle: "middle" => "middle",
        last: "last" => "last",
    }
}

structured_value! {
    PaymentCard => FieldType::PaymentCard, {
        card_number: "cardNumber" => "card_number",
        card_expiration_date: "cardExpirationDate" => "card_expiration_date",
        card_security_code: "cardSecurityCode" => "card_security_code",
    }
}

structured_value! {
    /// Phone number. `phone_type` is one of Home, Mobile or Work.
    Phone => FieldType::Phone, {
        region: "region" => "region",
        number: "number" => "number",
        ext: "ext" => "ext",
        phone_type: "type" => "type",
    }
}

structured_value! {
    SecurityQuestion => FieldType::SecurityQuestion, {
        question: "question" => "question",
        answer: "answer" => "answer",
    }
}

pub const PHONE_TYPES: [&str; 3] = ["Home", "Mobile", "Work"];

/// The `value` array of a field, one variant per value shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Vec<String>),
    Date(Vec<i64>),
    FileRefs(Vec<String>),
    Address(Vec<Address>),
    BankAccount(Vec<BankAccount>),
    Host(Vec<Host>),
    KeyPair(Vec<KeyPair>),
    Name(Vec<Name>),
    PaymentCard(Vec<PaymentCard>),
    Phone(Vec<Phone>),
    SecurityQuestion(Vec<SecurityQuestion>),
}

fn malformed(field_type: FieldType, reason: impl Into<String>) -> FieldError {
    FieldError::Malformed {
        field_type: field_type.to_string(),
        reason: reason.into(),
    }
}

fn parse_structured<T: StructuredValue>(items: &[Value]) -> Result<Vec<T>, FieldError> {
    items
        .iter()
        .map(|item| {
            if !item.is_object() {
                return Err(malformed(
                    T::FIELD_TYPE,
                    format!("expected an object value, got {}", item),
                ));
            }
            serde_json::from_value::<T>(item.clone())
                .map_err(|e| malformed(T::FIELD_TYPE, e.to_string()))
        })
        .collect()
}

fn structured_json<T: StructuredValue>(items: &[T]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| serde_json::to_value(item).unwrap_or(Value::Null))
            .collect(),
    )
}

impl FieldValue {
    /// An empty value of the shape `field_type` stores
    pub fn empty(field_type: FieldType) -> Self {
        match field_type.value_kind() {
            ValueKind::Text => FieldValue::Text(Vec::new()),
            ValueKind::Date => FieldValue::Date(Vec::new()),
            ValueKind::FileRefs => FieldValue::FileRefs(Vec::new()),
            ValueKind::Structured => match field_type {
                FieldType::Address => FieldValue::Address(Vec::new()),
                FieldType::BankAccount => FieldValue::BankAccount(Vec::new()),
                FieldType::Host => FieldValue::Host(Vec::new()),
                FieldType::KeyPair => FieldValue::KeyPair(Vec::new()),
                FieldType::Name => FieldValue::Name(Vec::new()),
                FieldType::PaymentCard => FieldValue::PaymentCard(Vec::new()),
                FieldType::Phone => FieldValue::Phone(Vec::new()),
                _ => FieldValue::SecurityQuestion(Vec::new()),
            },
        }
    }

    /// Parse the raw `value` array of a vault field.
    ///
    /// The accepted element shape is fixed by `field_type`; anything else is
    /// a malformed field. JSON numbers for date fields are truncated to whole
    /// milliseconds.
    pub fn from_json(field_type: FieldType, raw: &Value) -> Result<Self, FieldError> {
        let items = match raw {
            Value::Array(items) => items,
            Value::Null => return Ok(FieldValue::empty(field_type)),
            other => {
                return Err(malformed(
                    field_type,
                    format!("expected a value array, got {}", other),
                ))
            }
        };

        match field_type.value_kind() {
            ValueKind::Text | ValueKind::FileRefs => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => values.push(s.clone()),
                        other => {
                            return Err(malformed(
                                field_type,
                                format!("expected a string value, got {}", other),
                            ))
                        }
                    }
                }
                if field_type.value_kind() == ValueKind::FileRefs {
                    Ok(FieldValue::FileRefs(values))
                } else {
                    Ok(FieldValue::Text(values))
                }
            }
            ValueKind::Date => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    let millis = item
                        .as_i64()
                        .or_else(|| item.as_f64().map(|f| f as i64))
                        .ok_or_else(|| {
                            malformed(field_type, format!("expected a numeric value, got {}", item))
                        })?;
                    values.push(millis);
                }
                Ok(FieldValue::Date(values))
            }
            ValueKind::Structured => Ok(match field_type {
                FieldType::Address => FieldValue::Address(parse_structured(items)?),
                FieldType::BankAccount => FieldValue::BankAccount(parse_structured(items)?),
                FieldType::Host => FieldValue::Host(parse_structured(items)?),
                FieldType::KeyPair => FieldValue::KeyPair(parse_structured(items)?),
                FieldType::Name => FieldValue::Name(parse_structured(items)?),
                FieldType::PaymentCard => FieldValue::PaymentCard(parse_structured(items)?),
                FieldType::Phone => FieldValue::Phone(parse_structured(items)?),
                _ => FieldValue::SecurityQuestion(parse_structured(items)?),
            }),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(values) | FieldValue::FileRefs(values) => Value::Array(
                values.iter().map(|v| Value::String(v.clone())).collect(),
            ),
            FieldValue::Date(values) => {
                Value::Array(values.iter().map(|v| Value::from(*v)).collect())
            }
            FieldValue::Address(items) => structured_json(items),
            FieldValue::BankAccount(items) => structured_json(items),
            FieldValue::Host(items) => structured_json(items),
            FieldValue::KeyPair(items) => structured_json(items),
            FieldValue::Name(items) => structured_json(items),
            FieldValue::PaymentCard(items) => structured_json(items),
            FieldValue::Phone(items) => structured_json(items),
            FieldValue::SecurityQuestion(items) => structured_json(items),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldValue::Text(v) | FieldValue::FileRefs(v) => v.len(),
            FieldValue::Date(v) => v.len(),
            FieldValue::Address(v) => v.len(),
            FieldValue::BankAccount(v) => v.len(),
            FieldValue::Host(v) => v.len(),
            FieldValue::KeyPair(v) => v.len(),
            FieldValue::Name(v) => v.len(),
            FieldValue::PaymentCard(v) => v.len(),
            FieldValue::Phone(v) => v.len(),
            FieldValue::SecurityQuestion(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First non-empty text value, if this is a text field
    pub fn first_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(values) => values.iter().map(String::as_str).find(|v| !v.is_empty()),
            _ => None,
        }
    }

    /// First date value, if this is a date field
    pub fn first_date(&self) -> Option<i64> {
        match self {
            FieldValue::Date(values) => values.first().copied(),
            _ => None,
        }
    }

    /// Attribute map of the first non-empty structured entry
    pub fn first_structured_attributes(&self) -> Option<Map<String, Value>> {
        fn first<T: StructuredValue>(items: &[T]) -> Option<Map<String, Value>> {
            items.iter().find(|i| !i.is_empty()).map(StructuredValue::to_attributes)
        }
        match self {
            FieldValue::Address(items) => first(items),
            FieldValue::BankAccount(items) => first(items),
            FieldValue::Host(items) => first(items),
            FieldValue::KeyPair(items) => first(items),
            FieldValue::Name(items) => first(items),
            FieldValue::PaymentCard(items) => first(items),
            FieldValue::Phone(items) => first(items),
            FieldValue::SecurityQuestion(items) => first(items),
            _ => None,
        }
    }

    /// Build a single-entry structured value from an attribute map
    pub fn structured_from_attributes(
        field_type: FieldType,
        map: &Map<String, Value>,
    ) -> Result<Self, FieldError> {
        Ok(match field_type {
            FieldType::Address => FieldValue::Address(vec![Address::from_attributes(map)?]),
            FieldType::BankAccount => {
                FieldValue::BankAccount(vec![BankAccount::from_attributes(map)?])
            }
            FieldType::Host => FieldValue::Host(vec![Host::from_attributes(map)?]),
            FieldType::KeyPair => FieldValue::KeyPair(vec![KeyPair::from_attributes(map)?]),
            FieldType::Name => FieldValue::Name(vec![Name::from_attributes(map)?]),
            FieldType::PaymentCard => {
                FieldValue::PaymentCard(vec![PaymentCard::from_attributes(map)?])
            }
            FieldType::Phone => FieldValue::Phone(vec![Phone::from_attributes(map)?]),
            FieldType::SecurityQuestion => {
                FieldValue::SecurityQuestion(vec![SecurityQuestion::from_attributes(map)?])
            }
            other => {
                return Err(malformed(other, "field type does not hold structured values"))
            }
        })
    }
}
