//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `assistant-core` (pure Rust).
//! Implementations live in `assistant-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use assistant_types::{
    Result,
    catalog::Product,
    contact::{ContactReceipt, ContactSubmission},
    session::{RemoteRecord, SessionState, TopicFilter},
    turn::{Answer, HistoryPair},
    wire::ChatRequestBody,
};

// ─── Inference Port ──────────────────────────────────────────

/// One query to the chat service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub query: String,
    pub topic: TopicFilter,
    /// Every prior turn, oldest first
    pub history: Vec<HistoryPair>,
}

impl AskRequest {
    /// Body for `POST /chat`
    pub fn to_wire(&self) -> ChatRequestBody {
        ChatRequestBody::new(&self.query, self.topic, &self.history)
    }
}

/// The external chat service. A dumb transport: implementations enforce a
/// timeout but never retry.
#[async_trait(?Send)]
pub trait InferencePort {
    async fn ask(&self, req: AskRequest) -> Result<Answer>;

    /// Product catalog for the shop view
    async fn list_documents(&self) -> Result<Vec<Product>>;
}

// ─── User Data Port ──────────────────────────────────────────

#[async_trait(?Send)]
pub trait UserDataPort {
    /// `Ok(None)` when the service has no record for this user
    async fn load_remote(&self, user_id: &str) -> Result<Option<SessionState>>;

    /// Upsert the durable copy
    async fn save_remote(&self, user_id: &str, record: &RemoteRecord) -> Result<()>;
}

// ─── Contact Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait ContactPort {
    async fn submit_contact(&self, form: &ContactSubmission) -> Result<ContactReceipt>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
