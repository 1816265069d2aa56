// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Password Complexity
//!
//! Length and per-character-class minimums used when a password field is
//! (re)generated.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Complexity value object and its validation rule

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: i64 = 8;
pub const MAX_PASSWORD_LENGTH: i64 = 100;
pub const DEFAULT_PASSWORD_LENGTH: i64 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "expected - length in [8..100], charset_len in [0..length], and the sum of all lengths in [0..length], got length: {length}, sum: {sum} = {caps} + {lowercase} + {digits} + {special}"
)]
pub struct ComplexityError {
    pub length: i64,
    pub sum: i128,
    pub caps: i64,
    pub lowercase: i64,
    pub digits: i64,
    pub special: i64,
}

/// Password complexity as stored on a vault password field.
///
/// Counts are signed so that negative input coming from configuration is
/// reported by [`PasswordComplexity::validate`] instead of failing to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordComplexity {
    #[serde(default)]
    pub length: i64,
    #[serde(default)]
    pub caps: i64,
    #[serde(default)]
    pub lowercase: i64,
    #[serde(default)]
    pub digits: i64,
    #[serde(default)]
    pub special: i64,
}

impl PasswordComplexity {
    pub fn with_length(length: i64) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// Sum of the class minimums, widened so configured extremes cannot overflow
    pub fn sum(&self) -> i128 {
        [self.caps, self.lowercase, self.digits, self.special]
            .iter()
            .map(|&n| i128::from(n))
            .sum()
    }

    /// Length must be in [8, 100]; every class minimum and their sum must
    /// be in [0, length].
    pub fn validate(&self) -> Result<(), ComplexityError> {
        let sum = self.sum();
        let in_range = |n: i64| (0..=self.length).contains(&n);
        let valid = (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&self.length)
            && in_range(self.caps)
            && in_range(self.lowercase)
            && in_range(self.digits)
            && in_range(self.special)
            && (0..=i128::from(self.length)).contains(&sum);

        if valid {
            Ok(())
        } else {
            Err(ComplexityError {
                length: self.length,
                sum,
                caps: self.caps,
                lowercase: self.lowercase,
                digits: self.digits,
                special: self.special,
            })
        }
    }

    /// Attribute map of the `complexity` block
    pub fn to_attributes(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("length".to_string(), Value::from(self.length));
        map.insert("caps".to_string(), Value::from(self.caps));
        map.insert("lowercase".to_string(), Value::from(self.lowercase));
        map.insert("digits".to_string(), Value::from(self.digits));
        map.insert("special".to_string(), Value::from(self.special));
        map
    }

    /// Missing or non-numeric entries count as zero.
    pub fn from_attributes(map: &Map<String, Value>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
                .unwrap_or(0)
        };
        Self {
            length: get("length"),
            caps: get("caps"),
            lowercase: get("lowercase"),
            digits: get("digits"),
            special: get("special"),
        }
    }
}

/// Validate a complexity given as separate counts
pub fn validate_complexity(
    length: i64,
    caps: i64,
    lowercase: i64,
    digits: i64,
    special: i64,
) -> Result<(), ComplexityError> {
    PasswordComplexity {
        length,
        caps,
        lowercase,
        digits,
        special,
    }
    .validate()
}
