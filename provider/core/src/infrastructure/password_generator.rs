// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Random Password Generator
//!
//! Draws the per-class minimums first, fills the remaining length from the
//! union of all classes and shuffles the result. Randomness comes from the
//! operating system RNG.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use crate::domain::client::{ClientError, PasswordGenerator};
use crate::domain::complexity::PasswordComplexity;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"\"!@#$%()+;<>=?[]{}^.,";

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPasswordGenerator;

impl RandomPasswordGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordGenerator for RandomPasswordGenerator {
    fn generate(&self, complexity: &PasswordComplexity) -> Result<String, ClientError> {
        complexity
            .validate()
            .map_err(|e| ClientError::PasswordGeneration(e.to_string()))?;

        let mut rng = OsRng;
        let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SPECIAL].concat();
        let classes = [
            (UPPERCASE, complexity.caps),
            (LOWERCASE, complexity.lowercase),
            (DIGITS, complexity.digits),
            (SPECIAL, complexity.special),
        ];

        let mut chars: Vec<u8> = Vec::with_capacity(complexity.length as usize);
        for (alphabet, count) in classes {
            for _ in 0..count {
                chars.extend(alphabet.choose(&mut rng));
            }
        }
        while (chars.len() as i64) < complexity.length {
            chars.extend(all.choose(&mut rng));
        }
        chars.shuffle(&mut rng);

        String::from_utf8(chars).map_err(|e| ClientError::PasswordGeneration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(password: &str, alphabet: &[u8]) -> i64 {
        password.bytes().filter(|b| alphabet.contains(b)).count() as i64
    }

    #[test]
    fn test_length_and_class_minimums() {
        let complexity = PasswordComplexity {
            length: 20,
            caps: 3,
            lowercase: 2,
            digits: 4,
            special: 5,
        };
        let password = RandomPasswordGenerator::new().generate(&complexity).unwrap();
        assert_eq!(password.len(), 20);
        assert!(count(&password, UPPERCASE) >= 3);
        assert!(count(&password, LOWERCASE) >= 2);
        assert!(count(&password, DIGITS) >= 4);
        assert!(count(&password, SPECIAL) >= 5);
    }

    #[test]
    fn test_default_length() {
        let password = RandomPasswordGenerator::new()
            .generate(&PasswordComplexity::with_length(16))
            .unwrap();
        assert_eq!(password.len(), 16);
    }

    #[test]
    fn test_invalid_complexity_rejected() {
        let err = RandomPasswordGenerator::new()
            .generate(&PasswordComplexity::with_length(4))
            .unwrap_err();
        assert!(matches!(err, ClientError::PasswordGeneration(_)));
    }
}
