// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end record resource lifecycle against the in-memory vault.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use secretsmanager_core::application::builder::build_field;
use secretsmanager_core::application::projector::project_field_value;
use secretsmanager_core::domain::field_type::FieldType;
use secretsmanager_core::domain::folder::Folder;
use secretsmanager_core::domain::record::{Record, RecordData, RecordSection};
use secretsmanager_core::infrastructure::InMemorySecretsManager;
use secretsmanager_core::presentation::SecretsManagerProvider;

const FOLDER: &str = "KEndJhRb5TzYShFu-zJqDA";
const LOGIN_RESOURCE: &str = "secretsmanager_login";

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn setup() -> (Arc<InMemorySecretsManager>, SecretsManagerProvider) {
    let vault = Arc::new(InMemorySecretsManager::new());
    vault.insert_folder(Folder::new(FOLDER, "", "Shared"));
    let provider = SecretsManagerProvider::with_client(vault.clone(), 16);
    (vault, provider)
}

async fn create_login(provider: &SecretsManagerProvider) -> Map<String, Value> {
    let planned = object(json!({
        "folder_uid": FOLDER,
        "title": "Prod DB",
        "notes": "primary",
        "login": [{"value": "admin"}],
        "password": [{
            "generate": "true",
            "complexity": [{"length": 20, "caps": 2, "lowercase": 2, "digits": 2, "special": 2}]
        }],
        "url": [{"value": "https://db.example.com"}]
    }));
    let result = provider.create_resource(LOGIN_RESOURCE, planned).await;
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    result.state.unwrap()
}

#[tokio::test]
async fn test_login_full_lifecycle() {
    let (vault, provider) = setup();

    // Create: uid generated, password generated with the requested complexity
    let state = create_login(&provider).await;
    let uid = state["uid"].as_str().unwrap().to_string();
    assert_eq!(state["id"], json!(uid));
    assert_eq!(state["type"], json!("login"));
    let password = state["password"][0]["value"].as_str().unwrap().to_string();
    assert_eq!(password.chars().count(), 20);
    assert!(password.chars().filter(char::is_ascii_digit).count() >= 2);
    assert_eq!(vault.record(&uid).unwrap().field_value_str(FieldType::Password), password);

    // Read: projection keeps the state-only generate flag
    let result = provider.read_resource(LOGIN_RESOURCE, state).await;
    let state = result.state.unwrap();
    assert_eq!(state["title"], json!("Prod DB"));
    assert_eq!(state["login"][0]["value"], json!("admin"));
    assert_eq!(state["password"][0]["value"], json!(password));
    assert_eq!(state["password"][0]["generate"], json!("true"));
    assert_eq!(state["file_ref"], json!([]));

    // Update: rename and drop the url block
    let mut planned = state.clone();
    planned.insert("title".to_string(), json!("Prod DB (primary)"));
    planned.insert("url".to_string(), json!([]));
    let result = provider.update_resource(LOGIN_RESOURCE, state, planned).await;
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let record = vault.record(&uid).unwrap();
    assert_eq!(record.title(), "Prod DB (primary)");
    assert!(!record.field_exists(RecordSection::Fields, FieldType::Url));
    assert_eq!(record.field_value_str(FieldType::Password), password);

    // Delete, then a refresh drops the resource without an error
    let state = result.state.unwrap();
    let diagnostics = provider.delete_resource(LOGIN_RESOURCE, state.clone()).await;
    assert!(diagnostics.is_empty());
    let result = provider.read_resource(LOGIN_RESOURCE, state.clone()).await;
    assert!(result.state.is_none());
    assert!(!result.diagnostics.has_error());

    // A second delete only warns
    let diagnostics = provider.delete_resource(LOGIN_RESOURCE, state).await;
    assert!(!diagnostics.has_error());
    assert_eq!(diagnostics.warnings().count(), 1);
}

#[tokio::test]
async fn test_regenerate_on_generate_flip() {
    let (vault, provider) = setup();
    let state = create_login(&provider).await;
    let uid = state["uid"].as_str().unwrap().to_string();
    let first = vault.record(&uid).unwrap().field_value_str(FieldType::Password);

    let mut planned = state.clone();
    planned.insert("password".to_string(), json!([{"generate": "yes"}]));
    let result = provider.update_resource(LOGIN_RESOURCE, state, planned).await;
    let state = result.state.unwrap();

    let second = vault.record(&uid).unwrap().field_value_str(FieldType::Password);
    assert_ne!(first, second);
    assert_eq!(second.chars().count(), 16);
    assert_eq!(state["password"][0]["value"], json!(second));
}

#[tokio::test]
async fn test_update_rejects_folder_move() {
    let (_, provider) = setup();
    let state = create_login(&provider).await;

    let mut planned = state.clone();
    planned.insert("folder_uid".to_string(), json!("5dWX0-UOKMAFVjzXhhxu9A"));
    let result = provider.update_resource(LOGIN_RESOURCE, state, planned).await;
    assert!(result.state.is_none());
    assert_eq!(
        result.diagnostics.first_error().unwrap().summary,
        "changes to folder_uid, uid, and type are not allowed"
    );
}

#[tokio::test]
async fn test_invalid_complexity_fails_create() {
    let (vault, provider) = setup();
    let planned = object(json!({
        "folder_uid": FOLDER,
        "title": "Weak",
        "password": [{"generate": "true", "complexity": [{"length": 6}]}]
    }));
    let result = provider.create_resource(LOGIN_RESOURCE, planned).await;
    assert!(result.diagnostics.has_error());
    assert!(result
        .diagnostics
        .first_error()
        .unwrap()
        .summary
        .starts_with("expected - length in [8..100]"));
    assert_eq!(vault.record_count(), 0);
}

#[tokio::test]
async fn test_import_record_and_missing_record() {
    let (vault, provider) = setup();
    let uid = "5dWX0-UOKMAFVjzXhhxu9A";

    let err = provider.import_resource(LOGIN_RESOURCE, uid).await.unwrap_err();
    assert_eq!(err, format!("record not found - UID: {}", uid));

    vault.insert_record(Record::new(uid, FOLDER, RecordData::new("login", "Imported")));
    let state = provider.import_resource(LOGIN_RESOURCE, uid).await.unwrap();
    assert_eq!(state["title"], json!("Imported"));
    assert_eq!(state["folder_uid"], json!(FOLDER));

    let err = provider
        .import_resource("secretsmanager_ssh_keys", uid)
        .await
        .unwrap_err();
    assert!(err.contains("is not the expected type 'sshKeys'"));
}

#[test]
fn test_structured_field_build_and_project() {
    let field = build_field(
        "host",
        &json!([{"label": "db", "value": [{"host_name": "db.local", "port": "5432"}]}]),
    )
    .unwrap()
    .unwrap();

    let mut record = Record::new(FOLDER, "", RecordData::new("serverCredentials", "srv"));
    record.insert_field(RecordSection::Fields, &field);
    assert_eq!(
        record.section(RecordSection::Fields)[0],
        json!({"type": "host", "label": "db", "value": [{"hostName": "db.local", "port": "5432"}]})
    );

    let projected = project_field_value(FieldType::Host, RecordSection::Fields, &record).unwrap();
    assert_eq!(
        projected,
        json!([{"type": "host", "label": "db", "value": [{"host_name": "db.local", "port": "5432"}]}])
    );
}
