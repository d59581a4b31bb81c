//! Conversation manager: the single owner of SessionState.
//!
//! Query lifecycle:
//! 1. Reject blank input and take the single-flight guard
//! 2. Ask the chat service with the current topic and the full history
//! 3. Append a turn on success, park the query as pending on failure
//! 4. Release the guard and write the whole session through to storage
//!
//! Shared as `Rc<ConversationManager>`. Every method takes `&self` and no
//! RefCell borrow is held across an await, so a second submission made while
//! the first is outstanding sees the guard and returns.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{abortable, AbortHandle};
use assistant_types::{
    AppError, Result,
    config::RetryPolicy,
    event::{AssistantEvent, RestoreSource},
    session::{RemoteRecord, SessionState, TopicFilter},
    turn::{Answer, ConversationTurn},
};
use crate::event_bus::EventBus;
use crate::ports::{AskRequest, InferencePort, StoragePort, UserDataPort};
use crate::store::SessionStore;

/// Why a submission did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyQuery,
    InFlight,
    ShutDown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Ignored(IgnoreReason),
    Answered { turn_index: usize },
    /// The query is now the pending query
    Failed { query: String, error: AppError },
    /// Response dropped because the manager was shut down
    Discarded,
}

/// A retry the host should run after `delay_ms`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryTicket {
    pub query: String,
    pub attempt: u32,
    pub delay_ms: u64,
}

pub struct ConversationManager {
    user_id: String,
    store: SessionStore,
    retry: RetryPolicy,
    event_bus: EventBus,
    state: RefCell<SessionState>,
    show_initial_prompts: Cell<bool>,
    restored_from: Cell<Option<RestoreSource>>,
    searching: Cell<bool>,
    retry_attempts: Cell<u32>,
    retry_scheduled: Cell<bool>,
    in_flight: RefCell<Option<AbortHandle>>,
    shut_down: Cell<bool>,
}

impl ConversationManager {
    pub fn new(
        user_id: impl Into<String>,
        storage: Rc<dyn StoragePort>,
        retry: RetryPolicy,
        event_bus: EventBus,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            store: SessionStore::new(storage, &user_id),
            user_id,
            retry,
            event_bus,
            state: RefCell::new(SessionState::default()),
            show_initial_prompts: Cell::new(true),
            restored_from: Cell::new(None),
            searching: Cell::new(false),
            retry_attempts: Cell::new(0),
            retry_scheduled: Cell::new(false),
            in_flight: RefCell::new(None),
            shut_down: Cell::new(false),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Read the state without cloning it (rendering).
    pub fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn turn_count(&self) -> usize {
        self.state.borrow().conversations.len()
    }

    pub fn pending_query(&self) -> Option<String> {
        self.state.borrow().pending_query.clone()
    }

    pub fn topic(&self) -> TopicFilter {
        self.state.borrow().selected_index
    }

    pub fn is_searching(&self) -> bool {
        self.searching.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.restored_from.get().is_some()
    }

    pub fn show_initial_prompts(&self) -> bool {
        self.show_initial_prompts.get()
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts.get()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.get()
    }

    // ─── Startup ─────────────────────────────────────────────

    /// Load the session: local blob first, then the user-data service, then
    /// empty. Writes are enabled only once this has run. Call once; later
    /// calls return the original source without reloading.
    pub async fn initialize(&self, remote: &dyn UserDataPort) -> RestoreSource {
        if let Some(source) = self.restored_from.get() {
            return source;
        }

        let (state, source) = match self.store.load().await {
            Some(local) => (local, RestoreSource::Local),
            None => match remote.load_remote(&self.user_id).await {
                Ok(Some(record)) => (record, RestoreSource::Remote),
                Ok(None) => (SessionState::default(), RestoreSource::Empty),
                Err(e) => {
                    log::warn!("Fetching user data for {} failed: {}", self.user_id, e);
                    (SessionState::default(), RestoreSource::Empty)
                }
            },
        };

        let turns = state.conversations.len();
        self.show_initial_prompts.set(turns == 0);
        *self.state.borrow_mut() = state;
        self.restored_from.set(Some(source));

        log::info!(
            "Session restored from {:?} ({} turns, backend {})",
            source,
            turns,
            self.store.backend_name()
        );
        self.event_bus.emit(AssistantEvent::Restored { source, turns });

        self.persist().await;
        source
    }

    // ─── Queries ─────────────────────────────────────────────

    /// Why `submit_query` would ignore `text` right now, if it would.
    pub fn ignore_reason(&self, text: &str) -> Option<IgnoreReason> {
        if self.shut_down.get() {
            Some(IgnoreReason::ShutDown)
        } else if text.trim().is_empty() {
            Some(IgnoreReason::EmptyQuery)
        } else if self.searching.get() {
            Some(IgnoreReason::InFlight)
        } else {
            None
        }
    }

    pub async fn submit_query(&self, text: &str, gateway: &dyn InferencePort) -> SearchOutcome {
        if let Some(reason) = self.ignore_reason(text) {
            return SearchOutcome::Ignored(reason);
        }

        self.searching.set(true);
        let req = {
            let state = self.state.borrow();
            AskRequest {
                query: text.to_string(),
                topic: state.selected_index,
                history: state.history(),
            }
        };
        self.event_bus.emit(AssistantEvent::SearchStarted {
            query: text.to_string(),
        });

        let (call, handle) = abortable(gateway.ask(req));
        *self.in_flight.borrow_mut() = Some(handle);
        let result = call.await;
        self.in_flight.borrow_mut().take();
        self.searching.set(false);

        match result {
            Err(_aborted) => {
                log::info!("Query dropped on shutdown: {}", text);
                self.event_bus.emit(AssistantEvent::SearchCancelled {
                    query: text.to_string(),
                });
                SearchOutcome::Discarded
            }
            Ok(_) if self.shut_down.get() => SearchOutcome::Discarded,
            Ok(Ok(answer)) => self.record_answer(text, answer).await,
            Ok(Err(e)) => self.record_failure(text, e).await,
        }
    }

    async fn record_answer(&self, query: &str, answer: Answer) -> SearchOutcome {
        let turn_index = {
            let mut state = self.state.borrow_mut();
            state.conversations.push(ConversationTurn::new(query, answer));
            state.search_history.push(query.to_string());
            state.pending_query = None;
            state.conversations.len() - 1
        };
        self.show_initial_prompts.set(false);
        self.retry_attempts.set(0);

        log::info!("Turn {} appended", turn_index);
        self.event_bus.emit(AssistantEvent::TurnAppended { index: turn_index });
        self.persist().await;
        SearchOutcome::Answered { turn_index }
    }

    async fn record_failure(&self, query: &str, error: AppError) -> SearchOutcome {
        let unreachable = error.is_transport();
        if unreachable {
            log::warn!("Chat service unreachable, keeping query pending: {}", error);
        } else {
            log::warn!("Chat service rejected query, keeping it pending: {}", error);
        }

        let is_new = {
            let mut state = self.state.borrow_mut();
            let is_new = state.pending_query.as_deref() != Some(query);
            state.pending_query = Some(query.to_string());
            is_new
        };
        if is_new {
            self.retry_attempts.set(0);
        }

        self.event_bus.emit(AssistantEvent::SearchFailed {
            query: query.to_string(),
            message: error.to_string(),
            unreachable,
        });
        if self.retry_attempts.get() >= self.retry.max_attempts {
            self.event_bus.emit(AssistantEvent::RetriesExhausted {
                query: query.to_string(),
            });
        }

        self.persist().await;
        SearchOutcome::Failed {
            query: query.to_string(),
            error,
        }
    }

    // ─── Retry ───────────────────────────────────────────────

    /// Announce the next automatic retry, if one is due. Returns `None`
    /// while a retry is already scheduled, so repeated calls on every state
    /// change schedule at most one timer.
    pub fn schedule_retry(&self) -> Option<RetryTicket> {
        if self.shut_down.get() || !self.is_initialized() || self.searching.get() {
            return None;
        }
        if self.retry_scheduled.get() {
            return None;
        }
        let query = self.pending_query()?;
        let attempt = self.retry_attempts.get() + 1;
        if attempt > self.retry.max_attempts {
            return None;
        }

        let ticket = RetryTicket {
            delay_ms: self.retry.delay_ms(attempt),
            query,
            attempt,
        };
        self.retry_scheduled.set(true);
        self.event_bus.emit(AssistantEvent::RetryScheduled {
            query: ticket.query.clone(),
            attempt: ticket.attempt,
            delay_ms: ticket.delay_ms,
        });
        Some(ticket)
    }

    /// Resend the pending query, consuming one attempt. `None` when there
    /// is nothing to retry or the budget is spent.
    pub async fn retry_pending(&self, gateway: &dyn InferencePort) -> Option<SearchOutcome> {
        self.retry_scheduled.set(false);
        if self.shut_down.get() || self.searching.get() {
            return None;
        }
        let query = self.pending_query()?;
        let attempt = self.retry_attempts.get() + 1;
        if attempt > self.retry.max_attempts {
            return None;
        }

        self.retry_attempts.set(attempt);
        log::info!(
            "Retrying pending query (attempt {}/{})",
            attempt,
            self.retry.max_attempts
        );
        Some(self.submit_query(&query, gateway).await)
    }

    /// User-triggered retry: refills the attempt budget first.
    pub async fn retry_now(&self, gateway: &dyn InferencePort) -> Option<SearchOutcome> {
        self.retry_attempts.set(0);
        self.retry_pending(gateway).await
    }

    // ─── Other mutations ─────────────────────────────────────

    /// Start over: drops the turns, keeps search history and topic.
    pub async fn reset_conversation(&self) {
        self.state.borrow_mut().conversations.clear();
        self.show_initial_prompts.set(true);
        self.event_bus.emit(AssistantEvent::ConversationReset);
        self.persist().await;
    }

    /// Applies from the next submission on.
    pub async fn set_topic_filter(&self, topic: TopicFilter) {
        {
            let mut state = self.state.borrow_mut();
            if state.selected_index == topic {
                return;
            }
            state.selected_index = topic;
        }
        self.event_bus.emit(AssistantEvent::TopicChanged { topic });
        self.persist().await;
    }

    /// Best-effort push of the durable copy to the user-data service.
    pub async fn sync_remote(&self, remote: &dyn UserDataPort) -> Result<()> {
        let record = RemoteRecord::from(&*self.state.borrow());
        if let Err(e) = remote.save_remote(&self.user_id, &record).await {
            log::warn!("Syncing session for {} failed: {}", self.user_id, e);
            self.event_bus.emit(AssistantEvent::RemoteSyncFailed {
                message: e.to_string(),
            });
            return Err(e);
        }
        Ok(())
    }

    /// Abort any outstanding request and stop accepting work. A response
    /// that arrives afterwards changes nothing.
    pub fn shutdown(&self) {
        if self.shut_down.replace(true) {
            return;
        }
        if let Some(handle) = self.in_flight.borrow_mut().take() {
            handle.abort();
        }
        log::info!("Conversation manager for {} shut down", self.user_id);
    }

    async fn persist(&self) {
        if !self.is_initialized() || self.shut_down.get() {
            return;
        }
        let snapshot = self.snapshot();
        if let Err(e) = self.store.save(&snapshot).await {
            log::warn!("Persisting session to {} failed: {}", self.store.key(), e);
            self.event_bus.emit(AssistantEvent::PersistFailed {
                message: e.to_string(),
            });
        }
    }
}
