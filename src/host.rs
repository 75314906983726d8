//! Capabilities the engine needs from the browser.

use async_trait::async_trait;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::error::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub i32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TabId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TabId)
    }
}

/// A tab as the host reports it at the time of the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSnapshot {
    pub id: TabId,
    pub url: String,
    pub active: bool,
    pub muted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteReason {
    /// Changed by the user through the browser's own UI.
    User,
    /// Changed by an extension (including this one).
    Extension,
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutedInfo {
    pub muted: bool,
    pub reason: Option<MuteReason>,
}

/// The fields of a tab update the engine cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabChange {
    pub audible: Option<bool>,
    pub muted_info: Option<MutedInfo>,
}

impl TabChange {
    pub fn became_audible(&self) -> bool {
        self.audible == Some(true)
    }

    pub fn user_mute_change(&self) -> bool {
        matches!(
            self.muted_info,
            Some(MutedInfo {
                reason: Some(MuteReason::User),
                ..
            })
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub context_message: String,
    pub icon_url: String,
    pub buttons: Vec<String>,
}

#[async_trait]
pub trait TabService: Send + Sync {
    async fn query_active_tab(&self) -> Result<Option<TabSnapshot>, HostError>;
    async fn get_tab(&self, id: TabId) -> Result<TabSnapshot, HostError>;
    async fn set_muted(&self, id: TabId, muted: bool) -> Result<(), HostError>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn show(&self, id: &str, notification: Notification) -> Result<(), HostError>;
    async fn clear(&self, id: &str) -> Result<(), HostError>;
}

#[async_trait]
pub trait IconService: Send + Sync {
    async fn set_icon(&self, path: &str) -> Result<(), HostError>;
    async fn set_title(&self, text: &str) -> Result<(), HostError>;
}
