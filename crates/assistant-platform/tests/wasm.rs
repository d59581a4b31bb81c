//! WASM-target tests for assistant-platform (Node.js runtime).
//!
//! Tests MemoryStorage, backend selection, SessionStore on top of a real
//! backend, and the HTTP helpers under wasm32-unknown-unknown via
//! `wasm-pack test --node`.
//!
//! localStorage and fetch need a browser; they are exercised by the app.

use wasm_bindgen_test::*;

use assistant_core::ports::StoragePort;
use assistant_core::store::SessionStore;
use assistant_platform::http::{endpoint, error_message, remote_session, with_timeout};
use assistant_platform::storage::{MemoryStorage, auto_detect_storage};
use assistant_types::AppError;
use assistant_types::config::{StorageBackendType, StorageConfig};
use assistant_types::session::{SessionState, TopicFilter};
use assistant_types::turn::{Answer, ConversationTurn};
use std::rc::Rc;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
    assert!(storage.is_empty());
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
    assert_eq!(storage.len(), 1);
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("key", b"v1").await.unwrap();
    storage.set("key", b"v2").await.unwrap();
    let result = storage.get("key").await.unwrap();
    assert_eq!(result, Some(b"v2".to_vec()));
    assert_eq!(storage.len(), 1);
}

// ─── Backend Selection Tests ─────────────────────────────

#[wasm_bindgen_test]
fn memory_backend_when_configured() {
    let config = StorageConfig { backend: StorageBackendType::Memory };
    assert_eq!(auto_detect_storage(&config).backend_name(), "memory");
}

#[wasm_bindgen_test]
fn auto_falls_back_without_window() {
    // Node has no window, so localStorage cannot open
    let storage = auto_detect_storage(&StorageConfig::default());
    assert_eq!(storage.backend_name(), "memory");
}

// ─── SessionStore Tests ──────────────────────────────────

#[wasm_bindgen_test]
async fn session_store_roundtrip_on_memory() {
    let store = SessionStore::new(Rc::new(MemoryStorage::new()), "user123");
    assert_eq!(store.key(), "chat:user123");
    assert_eq!(store.backend_name(), "memory");
    assert!(store.load().await.is_none());

    let state = SessionState {
        conversations: vec![ConversationTurn::new("q", Answer::text("a"))],
        search_history: vec!["q".to_string()],
        selected_index: TopicFilter::ToolRecommendations,
        pending_query: None,
    };
    store.save(&state).await.unwrap();
    assert_eq!(store.load().await, Some(state));
}

#[wasm_bindgen_test]
async fn session_stores_are_per_user() {
    let storage: Rc<MemoryStorage> = Rc::new(MemoryStorage::new());
    let alice = SessionStore::new(storage.clone(), "alice");
    let bob = SessionStore::new(storage.clone(), "bob");

    let state = SessionState {
        search_history: vec!["alice only".to_string()],
        ..SessionState::default()
    };
    alice.save(&state).await.unwrap();
    assert!(bob.load().await.is_none());
    assert_eq!(storage.len(), 1);
}

// ─── HTTP Helper Tests ───────────────────────────────────

#[wasm_bindgen_test]
fn endpoint_joins_without_double_slash() {
    assert_eq!(endpoint("http://localhost:5002", "chat"), "http://localhost:5002/chat");
    assert_eq!(endpoint("http://localhost:5002/", "/chat"), "http://localhost:5002/chat");
    assert_eq!(
        endpoint("https://example.com/base/", "api/user/u1"),
        "https://example.com/base/api/user/u1"
    );
}

#[wasm_bindgen_test]
fn error_message_prefers_json_message() {
    assert_eq!(
        error_message(r#"{"message":"User not found"}"#, "Not Found"),
        "User not found"
    );
    assert_eq!(
        error_message(r#"{"message":"Error submitting form","error":"x"}"#, "Internal Server Error"),
        "Error submitting form"
    );
    assert_eq!(error_message("  plain text  ", "Bad Gateway"), "plain text");
    assert_eq!(error_message("", "Bad Gateway"), "Bad Gateway");
}

#[wasm_bindgen_test]
async fn with_timeout_gives_up_after_bound() {
    let result = with_timeout(10, futures::future::pending::<assistant_types::Result<String>>()).await;
    assert_eq!(result, Err(AppError::Timeout(10)));
}

#[wasm_bindgen_test]
async fn with_timeout_passes_through_fast_result() {
    let result = with_timeout(1_000, async { Ok::<_, AppError>(7) }).await;
    assert_eq!(result, Ok(7));

    let result = with_timeout(1_000, async {
        Err::<u8, _>(AppError::Network("offline".to_string()))
    })
    .await;
    assert_eq!(result, Err(AppError::Network("offline".to_string())));
}

// ─── Remote Session Decoding ─────────────────────────────

#[wasm_bindgen_test]
fn remote_session_not_found_is_none() {
    let missing = remote_session(Err(AppError::Http {
        status: 404,
        message: "User not found".to_string(),
    }));
    assert_eq!(missing, Ok(None));
    assert_eq!(remote_session(Ok("null".to_string())), Ok(None));
}

#[wasm_bindgen_test]
fn remote_session_other_errors_propagate() {
    let server_error = AppError::Http { status: 500, message: "Server error".to_string() };
    assert_eq!(remote_session(Err(server_error.clone())), Err(server_error));
    assert!(matches!(
        remote_session(Ok("not json".to_string())),
        Err(AppError::Serialization(_))
    ));
}

#[wasm_bindgen_test]
fn remote_session_decodes_record() {
    let body = r#"{"_id":"abc","userId":"u1","conversations":[{"question":"q","text":"a","products":null}],"searchHistory":["q"],"selectedIndex":"tool-recommendations"}"#;
    let state = remote_session(Ok(body.to_string())).unwrap().unwrap();
    assert_eq!(state.conversations.len(), 1);
    assert_eq!(state.search_history, vec!["q"]);
    assert_eq!(state.selected_index, TopicFilter::ToolRecommendations);
    assert!(state.pending_query.is_none());
}
