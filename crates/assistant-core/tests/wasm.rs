//! WASM-target tests for assistant-core.
//!
//! Runs EventBus, SessionStore, and ConversationManager tests
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use assistant_core::conversation::*;
use assistant_core::event_bus::EventBus;
use assistant_core::ports::*;
use assistant_core::store::SessionStore;
use assistant_types::AppError;
use assistant_types::catalog::Product;
use assistant_types::config::RetryPolicy;
use assistant_types::event::{AssistantEvent, RestoreSource};
use assistant_types::session::*;
use assistant_types::turn::*;

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

// ─── Mocks ───────────────────────────────────────────────

#[derive(Default)]
struct MockStorage {
    data: RefCell<HashMap<String, Vec<u8>>>,
}

#[async_trait(?Send)]
impl StoragePort for MockStorage {
    async fn get(&self, key: &str) -> assistant_types::Result<Option<Vec<u8>>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> assistant_types::Result<()> {
        self.data.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

/// Echoes the query, or fails every call when `fail` is set.
#[derive(Default)]
struct MockGateway {
    fail: bool,
    calls: Cell<usize>,
}

#[async_trait(?Send)]
impl InferencePort for MockGateway {
    async fn ask(&self, req: AskRequest) -> assistant_types::Result<Answer> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(AppError::Timeout(30_000));
        }
        Ok(Answer::text(format!("re: {}", req.query)))
    }

    async fn list_documents(&self) -> assistant_types::Result<Vec<Product>> {
        Ok(vec![])
    }
}

struct NoRemote;

#[async_trait(?Send)]
impl UserDataPort for NoRemote {
    async fn load_remote(&self, _user_id: &str) -> assistant_types::Result<Option<SessionState>> {
        Ok(None)
    }

    async fn save_remote(&self, _user_id: &str, _record: &RemoteRecord) -> assistant_types::Result<()> {
        Ok(())
    }
}

async fn ready_manager(storage: Rc<MockStorage>) -> ConversationManager {
    let manager = ConversationManager::new("u1", storage, RetryPolicy::default(), EventBus::new());
    manager.initialize(&NoRemote).await;
    manager
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_new_is_empty() {
    let bus = EventBus::new();
    assert!(!bus.has_pending());
    assert!(bus.drain().is_empty());
}

#[wasm_bindgen_test]
fn event_bus_clone_shares_state() {
    let bus1 = EventBus::new();
    let bus2 = bus1.clone();
    bus1.emit(AssistantEvent::ConversationReset);
    assert!(bus2.has_pending());
    assert_eq!(bus2.drain().len(), 1);
    assert!(!bus1.has_pending());
}

// ─── SessionStore Tests ──────────────────────────────────

#[wasm_bindgen_test]
async fn store_roundtrip() {
    let store = SessionStore::new(Rc::new(MockStorage::default()), "u1");
    let state = SessionState {
        search_history: vec!["q".to_string()],
        pending_query: Some("q".to_string()),
        ..SessionState::default()
    };
    store.save(&state).await.unwrap();
    assert_eq!(store.load().await, Some(state));
}

#[wasm_bindgen_test]
async fn store_ignores_corrupt_blob() {
    let storage = Rc::new(MockStorage::default());
    storage.data.borrow_mut().insert("chat:u1".to_string(), b"[1,2".to_vec());
    let store = SessionStore::new(storage, "u1");
    assert_eq!(store.load().await, None);
}

// ─── ConversationManager Tests ───────────────────────────

#[wasm_bindgen_test]
async fn manager_starts_empty() {
    let manager = ConversationManager::new(
        "u1",
        Rc::new(MockStorage::default()),
        RetryPolicy::default(),
        EventBus::new(),
    );
    assert_eq!(manager.initialize(&NoRemote).await, RestoreSource::Empty);
    assert!(manager.show_initial_prompts());
}

#[wasm_bindgen_test]
async fn manager_answer_appends_and_persists() {
    let storage = Rc::new(MockStorage::default());
    let manager = ready_manager(storage.clone()).await;
    let gateway = MockGateway::default();

    let outcome = manager.submit_query("router bits?", &gateway).await;
    assert_eq!(outcome, SearchOutcome::Answered { turn_index: 0 });

    let blob = storage.data.borrow().get("chat:u1").cloned().unwrap();
    let saved: SessionState = serde_json::from_slice(&blob).unwrap();
    assert_eq!(saved, manager.snapshot());
    assert_eq!(saved.conversations[0].text, "re: router bits?");
}

#[wasm_bindgen_test]
async fn manager_failure_sets_pending() {
    let manager = ready_manager(Rc::new(MockStorage::default())).await;
    let gateway = MockGateway { fail: true, ..MockGateway::default() };

    manager.submit_query("q", &gateway).await;
    assert_eq!(manager.pending_query().as_deref(), Some("q"));
    assert_eq!(manager.turn_count(), 0);
    assert!(!manager.is_searching());
}

#[wasm_bindgen_test]
async fn manager_retries_stop_at_budget() {
    let manager = ready_manager(Rc::new(MockStorage::default())).await;
    let gateway = MockGateway { fail: true, ..MockGateway::default() };
    manager.submit_query("q", &gateway).await;

    while manager.schedule_retry().is_some() {
        manager.retry_pending(&gateway).await;
    }
    assert_eq!(gateway.calls.get(), 1 + RetryPolicy::default().max_attempts as usize);
}

#[wasm_bindgen_test]
async fn manager_reset_keeps_history() {
    let manager = ready_manager(Rc::new(MockStorage::default())).await;
    let gateway = MockGateway::default();
    manager.submit_query("a", &gateway).await;
    manager.reset_conversation().await;

    assert_eq!(manager.turn_count(), 0);
    assert_eq!(manager.snapshot().search_history, vec!["a"]);
}

#[wasm_bindgen_test]
async fn manager_ignores_after_shutdown() {
    let manager = ready_manager(Rc::new(MockStorage::default())).await;
    manager.shutdown();
    let gateway = MockGateway::default();
    assert_eq!(
        manager.submit_query("q", &gateway).await,
        SearchOutcome::Ignored(IgnoreReason::ShutDown)
    );
    assert_eq!(gateway.calls.get(), 0);
}
