//! UI-level state that drives rendering.
//! The conversation itself lives in the ConversationManager; this holds the
//! widgets' own state plus a projection of manager events, updated each
//! frame by draining the EventBus.

use assistant_types::{
    Result,
    catalog::Product,
    contact::{ContactReceipt, ContactSubmission},
    event::{AssistantEvent, RestoreSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Chat,
    Shop,
    Contact,
}

impl View {
    pub fn all() -> &'static [View] {
        &[View::Chat, View::Shop, View::Contact]
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Chat => "Chat",
            View::Shop => "Shop",
            View::Contact => "Contact",
        }
    }
}

/// Result message shown next to a button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub success: bool,
}

impl Feedback {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { message: message.into(), success: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), success: false }
    }
}

/// Shop catalog, fetched once on first visit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShopState {
    #[default]
    NotLoaded,
    Loading,
    Loaded(Vec<Product>),
    Failed(String),
}

impl ShopState {
    pub fn needs_fetch(&self) -> bool {
        matches!(self, ShopState::NotLoaded)
    }

    pub fn finish(&mut self, result: Result<Vec<Product>>) {
        *self = match result {
            Ok(products) => ShopState::Loaded(products),
            Err(e) => {
                log::warn!("Catalog fetch failed: {}", e);
                ShopState::Failed("Failed to fetch products. Please try again later.".to_string())
            }
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub fields: ContactSubmission,
    pub sending: bool,
    pub feedback: Option<Feedback>,
}

impl ContactForm {
    /// Validate and mark as sending. Returns the normalized form to post,
    /// or `None` (with feedback set) when validation fails or a submission
    /// is already underway.
    pub fn begin_submit(&mut self) -> Option<ContactSubmission> {
        if self.sending {
            return None;
        }
        match self.fields.normalized() {
            Ok(form) => {
                self.sending = true;
                self.feedback = None;
                Some(form)
            }
            Err(e) => {
                self.feedback = Some(Feedback::error(e.to_string()));
                None
            }
        }
    }

    pub fn finish(&mut self, result: Result<ContactReceipt>) {
        self.sending = false;
        match result {
            Ok(receipt) => {
                self.fields = ContactSubmission::default();
                self.feedback = Some(Feedback::ok(receipt.message));
            }
            Err(e) => {
                self.feedback = Some(Feedback::error(format!("Error submitting form: {}", e)));
            }
        }
    }
}

/// State visible to UI panels
pub struct UiState {
    pub view: View,
    /// Input field content
    pub input_text: String,
    /// Whether settings panel is open
    pub show_settings: bool,
    /// Status line text
    pub status_text: String,
    /// Query currently waiting on the chat service
    pub searching_query: Option<String>,
    /// Last failure reported for a query
    pub last_error: Option<String>,
    /// Automatic retry progress for the pending query
    pub retry_notice: Option<String>,
    /// Set when the session could not be written to storage
    pub storage_warning: Option<String>,
    pub shop: ShopState,
    pub contact: ContactForm,
    pub settings_feedback: Option<Feedback>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            view: View::Chat,
            input_text: String::new(),
            show_settings: false,
            status_text: "Loading...".to_string(),
            searching_query: None,
            last_error: None,
            retry_notice: None,
            storage_warning: None,
            shop: ShopState::NotLoaded,
            contact: ContactForm::default(),
            settings_feedback: None,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<AssistantEvent>) {
        for event in events {
            match event {
                AssistantEvent::Restored { source, turns } => {
                    self.status_text = match source {
                        RestoreSource::Local => format!("Restored {} turns", turns),
                        RestoreSource::Remote => format!("Restored {} turns from your account", turns),
                        RestoreSource::Empty => "Ready".to_string(),
                    };
                }
                AssistantEvent::SearchStarted { query } => {
                    self.searching_query = Some(query);
                    self.last_error = None;
                    self.status_text = "Searching...".to_string();
                }
                AssistantEvent::TurnAppended { .. } => {
                    self.searching_query = None;
                    self.retry_notice = None;
                    self.status_text = "Ready".to_string();
                }
                AssistantEvent::SearchFailed { message, unreachable, .. } => {
                    self.searching_query = None;
                    self.status_text = if unreachable {
                        "Assistant unreachable".to_string()
                    } else {
                        "Assistant returned an error".to_string()
                    };
                    self.last_error = Some(message);
                }
                AssistantEvent::RetryScheduled { attempt, delay_ms, .. } => {
                    self.retry_notice = Some(format!(
                        "Retrying in {}s (attempt {})",
                        delay_ms.div_ceil(1000),
                        attempt
                    ));
                }
                AssistantEvent::RetriesExhausted { .. } => {
                    self.retry_notice =
                        Some("Automatic retries used up. Use Retry now to try again.".to_string());
                }
                AssistantEvent::SearchCancelled { .. } => {
                    self.searching_query = None;
                    self.status_text = "Stopped".to_string();
                }
                AssistantEvent::ConversationReset => {
                    self.input_text.clear();
                    self.status_text = "New conversation".to_string();
                }
                AssistantEvent::TopicChanged { topic } => {
                    self.status_text = format!("Topic: {}", topic.label());
                }
                AssistantEvent::PersistFailed { message } => {
                    self.storage_warning = Some(format!("Could not save this conversation: {}", message));
                }
                AssistantEvent::RemoteSyncFailed { message } => {
                    log::debug!("Remote sync failed: {}", message);
                    self.status_text = "Saved locally only".to_string();
                }
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.searching_query.is_some()
    }

    /// Clear the input once `query` has been taken. A query sent from a
    /// prompt button leaves the typed draft alone.
    pub fn query_accepted(&mut self, query: &str) {
        if self.input_text.trim() == query {
            self.input_text.clear();
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
