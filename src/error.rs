use thiserror::Error;

use crate::host::TabId;

/// Failures of the persistence collaborator. These surface through
/// `Persister` counters and startup logging, never through event handling.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored list is not valid JSON: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("persistence writer has shut down")]
    WriterClosed,
}

/// Failures reported by the browser host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("tab {0} not found")]
    TabNotFound(TabId),

    #[error("host call failed: {0}")]
    Call(String),
}

/// Everything that can go wrong while handling one browser event.
///
/// None of these cross the controller's public boundary; they are logged at a
/// level matching their severity and the event is dropped.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("url {0:?} has no usable domain")]
    InvalidInput(String),

    #[error("no active tab")]
    NoActiveTab,

    #[error("notification button {index} was not offered ({offered} buttons)")]
    InvalidOverrideIndex { index: usize, offered: usize },

    #[error(transparent)]
    Host(#[from] HostError),
}
