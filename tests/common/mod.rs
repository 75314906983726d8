#![allow(dead_code)]

use async_trait::async_trait;
use clever_mute::controller::HostServices;
use clever_mute::host::{
    IconService, Notification, NotificationService, TabId, TabService, TabSnapshot,
};
use clever_mute::HostError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SetMuted(TabId, bool),
    Show(String, Notification),
    Clear(String),
    SetIcon(String),
    SetTitle(String),
}

/// In-process browser that records every command it receives.
#[derive(Default)]
pub struct MockHost {
    tabs: Mutex<BTreeMap<TabId, TabSnapshot>>,
    active: Mutex<Option<TabId>>,
    calls: Mutex<Vec<HostCall>>,
    pub fail_mute: AtomicBool,
    pub fail_icon: AtomicBool,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn services(self: &Arc<Self>) -> HostServices {
        HostServices {
            tabs: self.clone(),
            notifications: self.clone(),
            icons: self.clone(),
        }
    }

    /// Opens a tab; an active tab becomes the focused one.
    pub fn open_tab(&self, id: i32, url: &str, active: bool) -> TabSnapshot {
        let tab = TabSnapshot {
            id: TabId(id),
            url: url.to_string(),
            active,
            muted: false,
        };
        self.tabs.lock().unwrap().insert(tab.id, tab.clone());
        if active {
            *self.active.lock().unwrap() = Some(tab.id);
        }
        tab
    }

    pub fn close_all_tabs(&self) {
        self.tabs.lock().unwrap().clear();
        *self.active.lock().unwrap() = None;
    }

    pub fn tab(&self, id: i32) -> TabSnapshot {
        self.tabs.lock().unwrap()[&TabId(id)].clone()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn mute_commands(&self) -> Vec<(TabId, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::SetMuted(id, muted) => Some((id, muted)),
                _ => None,
            })
            .collect()
    }

    pub fn shown(&self) -> Vec<(String, Notification)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Show(id, n) => Some((id, n)),
                _ => None,
            })
            .collect()
    }

    pub fn cleared(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Clear(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn icons_set(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::SetIcon(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TabService for MockHost {
    async fn query_active_tab(&self) -> Result<Option<TabSnapshot>, HostError> {
        let active = *self.active.lock().unwrap();
        Ok(active.and_then(|id| self.tabs.lock().unwrap().get(&id).cloned()))
    }

    async fn get_tab(&self, id: TabId) -> Result<TabSnapshot, HostError> {
        self.tabs
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(HostError::TabNotFound(id))
    }

    async fn set_muted(&self, id: TabId, muted: bool) -> Result<(), HostError> {
        self.record(HostCall::SetMuted(id, muted));
        if self.fail_mute.load(Ordering::SeqCst) {
            return Err(HostError::Call("tabs.update rejected".into()));
        }
        if let Some(tab) = self.tabs.lock().unwrap().get_mut(&id) {
            tab.muted = muted;
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationService for MockHost {
    async fn show(&self, id: &str, notification: Notification) -> Result<(), HostError> {
        self.record(HostCall::Show(id.to_string(), notification));
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<(), HostError> {
        self.record(HostCall::Clear(id.to_string()));
        Ok(())
    }
}

#[async_trait]
impl IconService for MockHost {
    async fn set_icon(&self, path: &str) -> Result<(), HostError> {
        self.record(HostCall::SetIcon(path.to_string()));
        if self.fail_icon.load(Ordering::SeqCst) {
            return Err(HostError::Call("browserAction.setIcon rejected".into()));
        }
        Ok(())
    }

    async fn set_title(&self, text: &str) -> Result<(), HostError> {
        self.record(HostCall::SetTitle(text.to_string()));
        Ok(())
    }
}
