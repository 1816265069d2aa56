// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Data sources and folder resources against the in-memory vault.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use secretsmanager_core::domain::config::ProviderConfigManifest;
use secretsmanager_core::domain::folder::Folder;
use secretsmanager_core::domain::record::{Record, RecordData};
use secretsmanager_core::infrastructure::InMemorySecretsManager;
use secretsmanager_core::presentation::SecretsManagerProvider;

const ROOT: &str = "KEndJhRb5TzYShFu-zJqDA";
const PROD: &str = "5dWX0-UOKMAFVjzXhhxu9A";
const STAGING: &str = "jYQ9jjIAJhKXHGkmeaBa5g";
const KEYS: &str = "Q5hZ3fTYrx8AHKeILaPNAg";

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn login(uid: &str, title: &str, user: &str) -> Record {
    let data: RecordData = serde_json::from_value(json!({
        "type": "login",
        "title": title,
        "fields": [
            {"type": "login", "value": [user]},
            {"type": "password", "value": ["hunter2"]},
            {"type": "oneTimeCode", "value": ["otpauth://totp/ACME:ops?secret=JBSWY3DPEHPK3PXP&issuer=ACME"]}
        ],
        "custom": [{"type": "text", "label": "env", "value": ["prod"]}]
    }))
    .unwrap();
    Record::new(uid, ROOT, data)
}

fn vault() -> Arc<InMemorySecretsManager> {
    let vault = InMemorySecretsManager::new();
    vault.insert_folder(Folder::new(ROOT, "", "Shared"));
    vault.insert_record(login(PROD, "Prod DB", "admin"));
    vault.insert_record(login(STAGING, "Staging DB", "stage"));
    vault.insert_record(Record::new(KEYS, ROOT, RecordData::new("sshKeys", "Staging DB")));
    Arc::new(vault)
}

fn provider() -> SecretsManagerProvider {
    SecretsManagerProvider::with_client(vault(), 16)
}

#[tokio::test]
async fn test_login_data_source_by_uid() {
    let result = provider()
        .read_data_source("secretsmanager_login", object(json!({"path": PROD})))
        .await;
    let state = result.state.unwrap();
    assert_eq!(state["id"], json!(PROD));
    assert_eq!(state["title"], json!("Prod DB"));
    assert_eq!(state["login"], json!("admin"));
    assert_eq!(state["password"], json!("hunter2"));

    let totp = &state["totp"][0];
    assert_eq!(totp["token"].as_str().unwrap().len(), 6);
    assert!(totp["ttl"].as_u64().unwrap() <= 30);
}

#[tokio::test]
async fn test_login_data_source_title_lookup() {
    let provider = provider();

    let result = provider
        .read_data_source("secretsmanager_login", object(json!({"path": "*", "title": "Prod DB"})))
        .await;
    assert_eq!(result.state.unwrap()["login"], json!("admin"));

    // Two records carry this title
    let result = provider
        .read_data_source(
            "secretsmanager_login",
            object(json!({"path": "*", "title": "Staging DB"})),
        )
        .await;
    assert_eq!(
        result.diagnostics.first_error().unwrap().summary,
        "more that one records match the search query - title: Staging DB"
    );

    let result = provider
        .read_data_source("secretsmanager_login", object(json!({"path": "*", "title": "Nope"})))
        .await;
    assert_eq!(
        result.diagnostics.first_error().unwrap().summary,
        "record not found - title: Nope"
    );
}

#[tokio::test]
async fn test_records_data_source_accepts_every_title_match() {
    let result = provider()
        .read_data_source(
            "secretsmanager_records",
            object(json!({"titles": ["Staging DB"]})),
        )
        .await;
    let state = result.state.unwrap();
    let records = state["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(state["records_by_uid"].get(KEYS).is_some());
}

#[tokio::test]
async fn test_field_data_source() {
    let provider = provider();

    let result = provider
        .read_data_source(
            "secretsmanager_field",
            object(json!({"path": format!("{}/field/login", PROD)})),
        )
        .await;
    assert_eq!(result.state.unwrap()["value"], json!("admin"));

    let result = provider
        .read_data_source(
            "secretsmanager_field",
            object(json!({"path": "*/custom_field/env", "title": "Prod DB"})),
        )
        .await;
    let state = result.state.unwrap();
    assert_eq!(state["value"], json!("prod"));
    assert_eq!(state["path"], json!(format!("{}/custom_field/env", PROD)));
}

#[tokio::test]
async fn test_folder_resource_lifecycle() {
    let vault = vault();
    let provider = SecretsManagerProvider::with_client(vault.clone(), 16);

    let result = provider
        .create_resource(
            "secretsmanager_folder",
            object(json!({"parent_uid": ROOT, "name": "Apps"})),
        )
        .await;
    let state = result.state.unwrap();
    let uid = state["uid"].as_str().unwrap().to_string();

    let mut planned = state.clone();
    planned.insert("name".to_string(), json!("Services"));
    let state = provider
        .update_resource("secretsmanager_folder", state, planned)
        .await
        .state
        .unwrap();

    let state = provider
        .read_resource("secretsmanager_folder", state)
        .await
        .state
        .unwrap();
    assert_eq!(state["name"], json!("Services"));

    // The folders data source derives the shared flag from the parent
    let folders = provider
        .read_data_source("secretsmanager_folders", Map::new())
        .await
        .state
        .unwrap();
    let shared: Vec<(String, bool)> = folders["folders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| (f["uid"].as_str().unwrap().to_string(), f["shared"].as_bool().unwrap()))
        .collect();
    assert!(shared.contains(&(ROOT.to_string(), true)));
    assert!(shared.contains(&(uid.clone(), false)));

    // Occupied folders need force_delete
    vault.insert_record(Record::new(
        "Rk0w8-LNhOBiRlzVyqVBUQ",
        &uid,
        RecordData::new("login", "inside"),
    ));
    let diagnostics = provider
        .delete_resource("secretsmanager_folder", state.clone())
        .await;
    assert!(diagnostics.has_error());

    let mut forced = state.clone();
    forced.insert("force_delete".to_string(), json!(true));
    let diagnostics = provider.delete_resource("secretsmanager_folder", forced).await;
    assert!(diagnostics.is_empty());
    assert!(vault.record("Rk0w8-LNhOBiRlzVyqVBUQ").is_none());

    let result = provider.read_resource("secretsmanager_folder", state).await;
    assert!(result.state.is_none());
    assert!(!result.diagnostics.has_error());
}

#[tokio::test]
async fn test_configure_from_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("vault.json");
    vault().store(&snapshot).unwrap();

    let mut manifest = ProviderConfigManifest::default();
    manifest.spec.vault_file = Some(snapshot);
    let provider = SecretsManagerProvider::configure(&manifest).unwrap();

    assert!(provider.resource_names().contains(&"secretsmanager_folder".to_string()));
    assert!(!provider.resource_names().contains(&"secretsmanager_general".to_string()));
    assert!(provider.data_source_names().contains(&"secretsmanager_general".to_string()));

    let result = provider
        .read_data_source("secretsmanager_login", object(json!({"path": STAGING})))
        .await;
    assert_eq!(result.state.unwrap()["login"], json!("stage"));
}
