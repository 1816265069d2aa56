// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Record and Folder UIDs
//!
//! UIDs are 16 random bytes encoded as unpadded base64url (RFC 4648 §5).
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** UID validation and generation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use once_cell::sync::Lazy;
use rand::RngCore;
use regex::Regex;

pub const UID_BYTES: usize = 16;

static BASE64_URL_SAFE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z\d\-_]{4})*(?:[A-Za-z\d\-_]{3}=?|[A-Za-z\d\-_]{2}(?:==)?)?$")
        .expect("UID pattern is a valid regex")
});

/// Decode a base64url UID, padded or not.
pub fn uid_bytes(uid: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(uid.trim().trim_end_matches('=')).ok()
}

/// True when `uid` (surrounding whitespace ignored) is base64url and
/// decodes to exactly 16 bytes.
pub fn validate_uid(uid: &str) -> bool {
    let uid = uid.trim();
    if uid.is_empty() || !BASE64_URL_SAFE.is_match(uid) {
        return false;
    }
    matches!(uid_bytes(uid), Some(bytes) if bytes.len() == UID_BYTES)
}

pub fn generate_uid() -> String {
    let mut bytes = [0u8; UID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_good_uid() {
        assert!(validate_uid("KEndJhRb5TzYShFu-zJqDA"));
        assert!(validate_uid("  KEndJhRb5TzYShFu-zJqDA "));
    }

    #[test]
    fn test_short_uid_rejected() {
        assert!(!validate_uid("short"));
        assert!(!validate_uid(""));
        assert!(!validate_uid("   "));
    }

    #[test]
    fn test_seventeen_bytes_rejected() {
        let uid = URL_SAFE_NO_PAD.encode([7u8; 17]);
        assert!(!validate_uid(&uid));
    }

    #[test]
    fn test_standard_alphabet_rejected() {
        assert!(!validate_uid("KEndJhRb5TzYShFu+zJqDA"));
    }

    #[test]
    fn test_generated_uids_are_valid() {
        for _ in 0..32 {
            let uid = generate_uid();
            assert_eq!(uid.len(), 22);
            assert!(validate_uid(&uid));
        }
    }
}
