pub mod memory;
pub mod sqlite;
pub mod writer;

pub use self::memory::MemoryStorage;
pub use self::sqlite::SqliteStorage;
pub use self::writer::{PersistStats, Persister};

use crate::error::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Storage key of the permanent white list.
pub const WHITE_LIST_KEY: &str = "whiteList";
/// Storage key of the permanent black list.
pub const BLACK_LIST_KEY: &str = "blackList";

/// The two permanent lists as they sit in storage.
///
/// A `None` field means the key was never written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedLists {
    #[serde(rename = "whiteList", default, skip_serializing_if = "Option::is_none")]
    pub white_list: Option<Vec<String>>,
    #[serde(rename = "blackList", default, skip_serializing_if = "Option::is_none")]
    pub black_list: Option<Vec<String>>,
}

impl PersistedLists {
    pub fn new(white_list: Vec<String>, black_list: Vec<String>) -> Self {
        Self {
            white_list: Some(white_list),
            black_list: Some(black_list),
        }
    }
}

/// Key-value persistence for the permanent lists.
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn load_all(&self) -> Result<PersistedLists, StorageError>;

    /// Replaces everything previously stored.
    async fn save_all(&self, lists: &PersistedLists) -> Result<(), StorageError>;
}
