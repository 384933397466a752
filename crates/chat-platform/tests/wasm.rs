//! WASM-target tests for chat-platform (Node.js runtime).
//!
//! Tests MemoryStorage and the repository round-trip on top of it
//! under wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! localStorage and fetch need a browser context and are exercised
//! manually through the app.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use chat_core::ports::StoragePort;
use chat_core::repository::SessionRepository;
use chat_platform::storage::MemoryStorage;
use chat_types::session::ChatSession;
use std::rc::Rc;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    let result = storage.get("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_set_and_get() {
    let storage = MemoryStorage::new();
    storage.set("key1", b"value1").await.unwrap();
    let result = storage.get("key1").await.unwrap();
    assert_eq!(result, Some(b"value1".to_vec()));
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("key", b"v1").await.unwrap();
    storage.set("key", b"v2").await.unwrap();
    let result = storage.get("key").await.unwrap();
    assert_eq!(result, Some(b"v2".to_vec()));
}

#[wasm_bindgen_test]
async fn memory_storage_delete() {
    let storage = MemoryStorage::new();
    storage.set("key", b"val").await.unwrap();
    storage.delete("key").await.unwrap();
    let result = storage.get("key").await.unwrap();
    assert!(result.is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_list_keys() {
    let storage = MemoryStorage::new();
    storage.set("chat_sessions_a", b"1").await.unwrap();
    storage.set("chat_sessions_b", b"2").await.unwrap();
    storage.set("chat_users", b"3").await.unwrap();

    let mut keys = storage.list_keys("chat_sessions_").await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["chat_sessions_a", "chat_sessions_b"]);
}

#[wasm_bindgen_test]
async fn memory_storage_exists() {
    let storage = MemoryStorage::new();
    storage.set("key", b"val").await.unwrap();
    assert!(storage.exists("key").await.unwrap());
    assert!(!storage.exists("other").await.unwrap());
}

// ─── Repository on MemoryStorage ─────────────────────────

#[wasm_bindgen_test]
async fn repository_round_trip_on_memory() {
    let repo = SessionRepository::new(Rc::new(MemoryStorage::new()));
    let sessions = vec![ChatSession::new()];

    repo.save("u1", &sessions).await.unwrap();
    let loaded = repo.load("u1").await;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, sessions[0].id);

    repo.remove("u1", &sessions[0].id).await.unwrap();
    assert!(repo.load("u1").await.is_empty());
}
