// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Provider Configuration Types
//
// Defines the configuration manifest for the Secrets Manager provider:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Vault credential (base64 encoded key/value config)
// - Optional offline vault snapshot
// - Password generation defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::complexity::{DEFAULT_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

pub const API_VERSION: &str = "100monkeys.ai/v1";
pub const KIND: &str = "ProviderConfig";

pub const ENV_CONFIG_PATH: &str = "SECRETSMANAGER_CONFIG_PATH";
pub const ENV_CREDENTIAL: &str = "KEEPER_CREDENTIAL";
pub const ENV_VAULT_FILE: &str = "SECRETSMANAGER_VAULT_FILE";
pub const ENV_PASSWORD_LENGTH: &str = "SECRETSMANAGER_DEFAULT_PASSWORD_LENGTH";

/// Top-level provider configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfigManifest {
    /// API version (must be "100monkeys.ai/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ProviderConfig")
    pub kind: String,

    pub metadata: ConfigMetadata,

    pub spec: ProviderConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfigSpec {
    /// Base64 encoded vault client configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,

    /// JSON vault snapshot served by the in-memory client instead of a live vault
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_file: Option<PathBuf>,

    /// Length used when a generated password has no complexity block
    #[serde(default = "default_password_length")]
    pub default_password_length: i64,
}

fn default_password_length() -> i64 {
    DEFAULT_PASSWORD_LENGTH
}

impl Default for ProviderConfigSpec {
    fn default() -> Self {
        Self {
            credential: None,
            vault_file: None,
            default_password_length: DEFAULT_PASSWORD_LENGTH,
        }
    }
}

impl Default for ProviderConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ConfigMetadata {
                name: "secretsmanager".to_string(),
                version: Some("1.0.0".to_string()),
            },
            spec: ProviderConfigSpec::default(),
        }
    }
}

impl ProviderConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. SECRETSMANAGER_CONFIG_PATH environment variable
    /// 2. ./secretsmanager-config.yaml (working directory)
    /// 3. ~/.secretsmanager/config.yaml (user home)
    /// 4. /etc/secretsmanager/config.yaml (system, Unix) or C:\ProgramData\SecretsManager\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./secretsmanager-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".secretsmanager").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/secretsmanager/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\SecretsManager\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must load
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(ENV_CREDENTIAL) {
            if !val.trim().is_empty() {
                tracing::info!("Environment override: {} (value hidden)", ENV_CREDENTIAL);
                self.spec.credential = Some(val);
            }
        }

        if let Ok(val) = std::env::var(ENV_VAULT_FILE) {
            if !val.trim().is_empty() {
                tracing::info!("Environment override: {}={}", ENV_VAULT_FILE, val);
                self.spec.vault_file = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var(ENV_PASSWORD_LENGTH) {
            match val.trim().parse::<i64>() {
                Ok(length) => {
                    tracing::info!("Environment override: {}={}", ENV_PASSWORD_LENGTH, length);
                    self.spec.default_password_length = length;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for {}: '{}'. Expected an integer. Ignoring.",
                        ENV_PASSWORD_LENGTH,
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let length = self.spec.default_password_length;
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
            anyhow::bail!(
                "spec.default_password_length must be in [{}..{}], got {}",
                MIN_PASSWORD_LENGTH,
                MAX_PASSWORD_LENGTH,
                length
            );
        }

        let credential = self
            .spec
            .credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        match credential {
            Some(credential) => {
                crate::infrastructure::credential::Credential::decode(credential)?;
            }
            None if self.spec.vault_file.is_none() => {
                anyhow::bail!("empty credential");
            }
            None => {}
        }

        Ok(())
    }
}
