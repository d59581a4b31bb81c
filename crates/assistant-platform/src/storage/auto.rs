//! Pick a storage backend from configuration.
//!
//! Auto: localStorage → Memory (fallback)

use std::rc::Rc;
use assistant_core::ports::StoragePort;
use assistant_types::config::{StorageBackendType, StorageConfig};
use super::{MemoryStorage, WebStorage};

/// Open the configured backend. Never fails: when localStorage cannot be
/// used the session lives in memory for this tab.
pub fn auto_detect_storage(config: &StorageConfig) -> Rc<dyn StoragePort> {
    match config.backend {
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory (configured)");
            Rc::new(MemoryStorage::new())
        }
        StorageBackendType::Auto | StorageBackendType::Local => match WebStorage::open() {
            Ok(web) => {
                log::info!("Storage backend: localStorage");
                Rc::new(web)
            }
            Err(e) => {
                log::warn!("localStorage unavailable ({}), falling back to memory", e);
                Rc::new(MemoryStorage::new())
            }
        },
    }
}
