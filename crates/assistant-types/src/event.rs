use serde::{Deserialize, Serialize};

use crate::session::TopicFilter;

/// Where the session came from at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestoreSource {
    Local,
    Remote,
    Empty,
}

/// Events emitted by the conversation manager.
/// UI subscribes to these for status updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssistantEvent {
    /// Session loaded and ready for writes
    Restored { source: RestoreSource, turns: usize },

    /// A query was sent to the chat service
    SearchStarted { query: String },

    /// The service answered and a turn was appended
    TurnAppended { index: usize },

    /// The service could not answer; the query is now pending.
    /// `unreachable` is false when the service answered with an error.
    SearchFailed { query: String, message: String, unreachable: bool },

    /// A pending query will be resent after a delay
    RetryScheduled { query: String, attempt: u32, delay_ms: u64 },

    /// Automatic retries used up; the query stays pending
    RetriesExhausted { query: String },

    /// In-flight request dropped by shutdown
    SearchCancelled { query: String },

    ConversationReset,

    TopicChanged { topic: TopicFilter },

    /// Writing the local blob failed
    PersistFailed { message: String },

    /// Pushing to the user-data service failed
    RemoteSyncFailed { message: String },
}
