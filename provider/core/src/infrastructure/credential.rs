// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provider Credential
//!
//! The credential is the application's key/value configuration, handed over
//! either as base64-encoded JSON or as plain JSON. `appKey`, `clientId` and
//! `privateKey` must be present and non-empty.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::domain::error::{ProviderError, ProviderResult};

pub const KEY_APP_KEY: &str = "appKey";
pub const KEY_CLIENT_ID: &str = "clientId";
pub const KEY_PRIVATE_KEY: &str = "privateKey";
pub const KEY_HOSTNAME: &str = "hostname";

const REQUIRED_KEYS: [&str; 3] = [KEY_APP_KEY, KEY_CLIENT_ID, KEY_PRIVATE_KEY];

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    values: BTreeMap<String, String>,
}

// Key material stays out of logs and error messages
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Credential {
    pub fn decode(credential: &str) -> ProviderResult<Self> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(ProviderError::Configuration("empty credential".to_string()));
        }

        let json = match STANDARD.decode(credential.as_bytes()) {
            Ok(bytes) => String::from_utf8(bytes).map_err(|_| {
                ProviderError::Configuration("bad credential: not valid UTF-8".to_string())
            })?,
            Err(_) => credential.to_string(),
        };

        let values: BTreeMap<String, serde_json::Value> = serde_json::from_str(&json)
            .map_err(|e| ProviderError::Configuration(format!("bad credential: {}", e)))?;
        let values: BTreeMap<String, String> = values
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
            .collect();

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| values.get(*key).map_or(true, |v| v.trim().is_empty()))
            .collect();
        if !missing.is_empty() {
            return Err(ProviderError::Configuration(format!(
                "bad credential: missing {}",
                missing.join(", ")
            )));
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.get(KEY_HOSTNAME)
    }
}
