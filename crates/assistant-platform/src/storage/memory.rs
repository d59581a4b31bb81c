//! In-memory storage backend.
//! Lives as long as the tab; nothing survives a reload.

use std::cell::RefCell;
use std::collections::HashMap;
use async_trait::async_trait;
use assistant_core::ports::StoragePort;
use assistant_types::Result;

#[derive(Default)]
pub struct MemoryStorage {
    data: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }
}

#[async_trait(?Send)]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
