//! Event bus between the conversation manager and the UI.
//!
//! Single-threaded (WASM constraint), interior mutability via RefCell.
//! The manager emits; the UI drains once per frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use assistant_types::event::AssistantEvent;

/// Shared event bus, clone-cheap via Rc.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<AssistantEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: AssistantEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<AssistantEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }
}
