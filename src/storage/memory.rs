//! In-memory storage backend.
//!
//! Used when no SQLite file is configured, and by tests that need a storage
//! which survives a registry being dropped and rebuilt.

use super::{PersistedLists, StorageService};
use crate::error::StorageError;
use async_trait::async_trait;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<PersistedLists>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lists(lists: PersistedLists) -> Self {
        Self {
            items: RwLock::new(lists),
        }
    }
}

#[async_trait]
impl StorageService for MemoryStorage {
    async fn load_all(&self) -> Result<PersistedLists, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Poisoned)?;
        Ok(items.clone())
    }

    async fn save_all(&self, lists: &PersistedLists) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        *items = lists.clone();
        Ok(())
    }
}
