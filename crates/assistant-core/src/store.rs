//! Session persistence on top of StoragePort.
//!
//! One JSON blob per user under `chat:<user_id>`. Reads are forgiving
//! (unreadable data counts as absent); writes report errors to the caller.

use std::rc::Rc;
use assistant_types::{Result, session::SessionState};
use crate::ports::StoragePort;

const SESSION_KEY_PREFIX: &str = "chat:";

pub struct SessionStore {
    storage: Rc<dyn StoragePort>,
    key: String,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn StoragePort>, user_id: &str) -> Self {
        Self {
            storage,
            key: format!("{}{}", SESSION_KEY_PREFIX, user_id),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend_name(&self) -> &str {
        self.storage.backend_name()
    }

    pub async fn load(&self) -> Option<SessionState> {
        let bytes = match self.storage.get(&self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Reading {} from {} failed: {}", self.key, self.backend_name(), e);
                return None;
            }
        };

        match serde_json::from_slice::<SessionState>(&bytes) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("Discarding unreadable session blob {}: {}", self.key, e);
                None
            }
        }
    }

    pub async fn save(&self, state: &SessionState) -> Result<()> {
        let json = serde_json::to_vec(state)?;
        self.storage.set(&self.key, &json).await
    }
}
