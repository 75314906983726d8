//! Tab audio-policy engine.
//!
//! Decides, for every browser tab that starts playing audio, whether it is
//! muted or allowed, from four domain lists (permanent and temporary white and
//! black lists). The browser itself is reached through the traits in
//! [`host`]; persistence goes through [`storage::StorageService`].

pub mod config;
pub mod controller;
pub mod domain;
pub mod engine;
pub mod error;
pub mod host;
pub mod init;
pub mod storage;

pub use controller::{AudioPolicyController, BrowserEvent};
pub use engine::{IconState, ListRegistry, TabPolicy};
pub use error::{HostError, PolicyError, StorageError};
