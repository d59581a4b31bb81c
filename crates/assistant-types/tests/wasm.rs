//! WASM-target tests for assistant-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use serde_json::json;

use assistant_types::catalog::*;
use assistant_types::config::*;
use assistant_types::contact::*;
use assistant_types::error::*;
use assistant_types::session::*;
use assistant_types::turn::*;
use assistant_types::wire::*;

// ─── Session Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn session_roundtrip() {
    let state = SessionState {
        conversations: vec![ConversationTurn::new("q", Answer::text("a"))],
        search_history: vec!["q".to_string()],
        selected_index: TopicFilter::ShopImprovement,
        pending_query: Some("p".to_string()),
    };
    let json = serde_json::to_string(&state).unwrap();
    let restored: SessionState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
}

#[wasm_bindgen_test]
fn session_empty_object_defaults() {
    let state: SessionState = serde_json::from_str("{}").unwrap();
    assert!(state.is_empty());
    assert_eq!(state.selected_index, TopicFilter::All);
}

// ─── Wire Tests ──────────────────────────────────────────

#[wasm_bindgen_test]
fn chat_request_body_shape() {
    let body = ChatRequestBody::new("Best tools for beginners?", TopicFilter::ToolRecommendations, &[]);
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "message": "Best tools for beginners?",
            "selected_index": "tool-recommendations",
            "chat_history": []
        })
    );
}

#[wasm_bindgen_test]
fn chat_response_without_video_links() {
    let body: ChatResponseBody = serde_json::from_str(r#"{"response":"ok","urls":[]}"#).unwrap();
    let answer = body.into_answer();
    assert_eq!(answer.text, "ok");
    assert!(answer.video_links.is_empty());
}

// ─── Catalog / Contact Tests ─────────────────────────────

#[wasm_bindgen_test]
fn product_from_catalog_row() {
    let product = Product::from_value(&json!(["3", "Router", "power tools", "https://x/router"])).unwrap();
    assert_eq!(product.title, "Router");
    assert!(product.image.is_none());
}

#[wasm_bindgen_test]
fn contact_requires_name() {
    let form = ContactSubmission {
        email: "a@b.co".to_string(),
        subject: "s".to_string(),
        message: "m".to_string(),
        ..ContactSubmission::default()
    };
    assert!(matches!(form.normalized(), Err(AppError::Validation { .. })));
}

// ─── Config Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn default_config_timeout() {
    assert_eq!(AppConfig::default().gateway.timeout_ms, 30_000);
}

#[wasm_bindgen_test]
fn ensure_user_id_generates_uuid() {
    let mut config = AppConfig::default();
    assert!(config.ensure_user_id());
    assert_eq!(config.user_data.user_id.len(), 36);
}
