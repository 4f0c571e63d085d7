//! Persistence edge case tests.
//!
//! File shapes on disk, legacy files, corrupt files, and reload behavior
//! across the stores.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::contact_store::ContactStore;
use crate::persistence::{ensure_dir, load_json, load_json_or_default, save_json};
use crate::provider_store::ProviderStore;
use crate::settings_store::{LogLevel, Settings, SettingsStore};
use sinpe_providers::ProviderRegistry;
use sinpe_transport::TransportKind;

// ============================================================================
// JSON Helpers
// ============================================================================

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("a").join("b").join("data.json");

    save_json(&nested, &serde_json::json!({"key": "value"})).await.unwrap();
    assert!(nested.exists());
}

#[tokio::test]
async fn test_save_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");

    save_json(&path, &vec![1, 2, 3]).await.unwrap();
    save_json(&path, &vec![4]).await.unwrap();

    let names: Vec<String> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["data.json"]);
    let loaded: Vec<i32> = load_json(&path).await.unwrap();
    assert_eq!(loaded, [4]);
}

#[tokio::test]
async fn test_load_missing_and_corrupt() {
    let missing = PathBuf::from("/nonexistent/sinpe/settings.json");
    assert!(load_json::<Settings>(&missing).await.is_err());
    assert_eq!(load_json_or_default::<Settings>(&missing).await, Settings::default());

    let temp_dir = TempDir::new().unwrap();
    let corrupt = temp_dir.path().join("settings.json");
    tokio::fs::write(&corrupt, "{ not json").await.unwrap();
    assert!(load_json::<Settings>(&corrupt).await.is_err());
}

#[tokio::test]
async fn test_ensure_dir_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("nested").join("dir");
    ensure_dir(&dir).await.unwrap();
    ensure_dir(&dir).await.unwrap();
    assert!(dir.is_dir());
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_settings_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    tokio::fs::write(&path, r#"{"reply_timeout_secs": 30, "transport": "loopback"}"#)
        .await
        .unwrap();

    let settings = SettingsStore::load(path).await.get().await;
    assert_eq!(settings.reply_timeout_secs, 30);
    assert_eq!(settings.transport, TransportKind::Loopback);
    assert_eq!(settings.min_motive_len, Settings::default().min_motive_len);
    assert_eq!(settings.log_level, LogLevel::default());
}

#[tokio::test]
async fn test_settings_corrupt_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    tokio::fs::write(&path, "{{{").await.unwrap();

    assert_eq!(SettingsStore::load(path).await.get().await, Settings::default());
}

#[tokio::test]
async fn test_settings_round_trip_through_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(path.clone()).await;
    store.set("min_motive_len", "5").await.unwrap();
    store.set("history_enabled", "false").await.unwrap();

    let reloaded = SettingsStore::load(path).await.get().await;
    assert_eq!(reloaded.min_motive_len, 5);
    assert!(!reloaded.history_enabled);
}

// ============================================================================
// Providers
// ============================================================================

#[tokio::test]
async fn test_provider_file_shape() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("providers.json");

    let store = ProviderStore::load(path.clone()).await.unwrap();
    store.select("BCR").await.unwrap();

    let raw: serde_json::Value = load_json(&path).await.unwrap();
    assert_eq!(raw["selectedProvider"], "3");
    assert_eq!(raw["allProviders"].as_array().unwrap().len(), 4);
    assert_eq!(raw["allProviders"][3]["value"], "2627");
    assert!(raw.get("customProviders").is_none());
}

#[tokio::test]
async fn test_legacy_custom_providers_migrate_once() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("providers.json");
    tokio::fs::write(
        &path,
        r#"{"customProviders": [
            {"id": "1700000000000", "label": "Coope", "value": "7070"},
            {"id": "1700000000001", "label": "BN again", "value": "2627"}
        ]}"#,
    )
    .await
    .unwrap();

    let store = ProviderStore::load(path.clone()).await.unwrap();
    let providers = store.list().await;
    assert_eq!(providers.len(), ProviderRegistry::count() + 1);
    assert_eq!(providers.last().unwrap().label, "Coope");

    let raw: serde_json::Value = load_json(&path).await.unwrap();
    assert!(raw.get("customProviders").is_none());
    assert_eq!(raw["allProviders"].as_array().unwrap().len(), 5);

    let reloaded = ProviderStore::load(path).await.unwrap();
    assert_eq!(reloaded.list().await, providers);
}

#[tokio::test]
async fn test_corrupt_provider_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("providers.json");
    tokio::fs::write(&path, "garbage").await.unwrap();

    let store = ProviderStore::load(path).await.unwrap();
    assert_eq!(store.list().await, ProviderRegistry::defaults());
}

#[tokio::test]
async fn test_provider_changes_survive_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("providers.json");

    let store = ProviderStore::load(path.clone()).await.unwrap();
    let added = store.add("Coope", "7070").await.unwrap();
    store.delete("2").await.unwrap();
    store.select(&added.id).await.unwrap();

    let reloaded = ProviderStore::load(path).await.unwrap();
    assert_eq!(reloaded.selected_provider().await.unwrap(), added);
    assert!(reloaded.find("BAC").await.is_none());
}

// ============================================================================
// Contacts
// ============================================================================

#[tokio::test]
async fn test_contact_file_shape() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("contacts.json");

    let store = ContactStore::load(path.clone()).await;
    store.add_local("Juan", "88889999").await.unwrap();

    let raw: serde_json::Value = load_json(&path).await.unwrap();
    assert_eq!(raw["local"][0]["type"], "local");
    assert_eq!(raw["local"][0]["number"], "88889999");
    assert_eq!(raw["device"].as_array().unwrap().len(), 0);
}
