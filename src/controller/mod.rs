mod events;
mod notifications;

pub use self::events::{run_event_loop, BrowserEvent};
pub use self::notifications::NotificationKind;

use crate::config::IconConfig;
use crate::engine::{compute_icon_state, IconState, ListRegistry, TabPolicy};
use crate::error::PolicyError;
use crate::host::{IconService, NotificationService, TabId, TabService, TabSnapshot};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Buttons assumed when a click arrives for a notification this process never
/// showed.
const MAX_BUTTONS: usize = 2;

/// The browser capabilities the controller drives.
#[derive(Clone)]
pub struct HostServices {
    pub tabs: Arc<dyn TabService>,
    pub notifications: Arc<dyn NotificationService>,
    pub icons: Arc<dyn IconService>,
}

/// Turns browser events into mute commands, list changes, notifications and
/// icon updates.
///
/// Host failures are logged and dropped. Every event recomputes policy from
/// the lists, so a lost command is corrected by the next relevant event.
pub struct AudioPolicyController {
    registry: ListRegistry,
    host: HostServices,
    icons: IconConfig,
    current_icon: Option<IconState>,
    offered: FxHashMap<TabId, NotificationKind>,
}

impl AudioPolicyController {
    pub fn new(registry: ListRegistry, host: HostServices, icons: IconConfig) -> Self {
        Self {
            registry,
            host,
            icons,
            current_icon: None,
            offered: FxHashMap::default(),
        }
    }

    pub fn registry(&self) -> &ListRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ListRegistry {
        &mut self.registry
    }

    /// Whether a notification shown for `tab_id` is still awaiting a click.
    pub fn has_pending_notification(&self, tab_id: TabId) -> bool {
        self.offered.contains_key(&tab_id)
    }

    /// The icon last applied to the toolbar, if any.
    pub fn current_icon(&self) -> Option<IconState> {
        self.current_icon
    }

    pub async fn handle_event(&mut self, event: BrowserEvent) {
        let result = match event {
            BrowserEvent::TabCreated
            | BrowserEvent::TabActivated
            | BrowserEvent::WindowFocusChanged => Ok(()),
            BrowserEvent::TabUpdated { tab, change } => {
                if change.user_mute_change() {
                    self.send_mute(tab.id, tab.muted).await;
                    self.record_mute(&tab.url, tab.muted);
                }
                if change.became_audible() {
                    self.evaluate_audible(&tab).await
                } else {
                    Ok(())
                }
            }
            BrowserEvent::TabRemoved { tab_id } => {
                if self.offered.remove(&tab_id).is_some() {
                    self.clear_notification(&tab_id.to_string()).await;
                }
                Ok(())
            }
            BrowserEvent::IconClicked { tab } => self.toggle_mute(tab.id, !tab.muted).await,
            BrowserEvent::NotificationButtonClicked {
                notification_id,
                button_index,
            } => match notification_id.parse::<TabId>() {
                Ok(tab_id) => self.press_button(tab_id, button_index).await,
                Err(_) => {
                    self.clear_notification(&notification_id).await;
                    Err(PolicyError::InvalidInput(notification_id))
                }
            },
            BrowserEvent::NotificationClosed { notification_id } => {
                if let Ok(tab_id) = notification_id.parse::<TabId>() {
                    self.offered.remove(&tab_id);
                }
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(e);
        }
        self.refresh_icon().await;
    }

    /// A tab started playing audio.
    pub async fn on_tab_audible(&mut self, tab: &TabSnapshot) {
        if let Err(e) = self.evaluate_audible(tab).await {
            self.report(e);
        }
        self.refresh_icon().await;
    }

    /// The user asked for `tab_id` to be muted or unmuted from the toolbar.
    pub async fn on_user_mute_toggle(&mut self, tab_id: TabId, desired_muted: bool) {
        if let Err(e) = self.toggle_mute(tab_id, desired_muted).await {
            self.report(e);
        }
        self.refresh_icon().await;
    }

    /// Button 0 whitelists the tab's domain for good, button 1 allows it for
    /// this session.
    pub async fn on_notification_button(&mut self, tab_id: TabId, button_index: usize) {
        if let Err(e) = self.press_button(tab_id, button_index).await {
            self.report(e);
        }
        self.refresh_icon().await;
    }

    pub fn compute_icon_state(&self, tab: &TabSnapshot) -> IconState {
        compute_icon_state(&self.registry, &tab.url)
    }

    /// Re-evaluates the icon for the active tab, touching the toolbar only when
    /// the icon actually changes.
    pub async fn refresh_icon(&mut self) {
        if let Err(e) = self.try_refresh_icon().await {
            self.report(e);
        }
    }

    async fn evaluate_audible(&mut self, tab: &TabSnapshot) -> Result<(), PolicyError> {
        if self.registry.policy(&tab.url) == TabPolicy::Allowed {
            debug!(tab = %tab.id, url = %tab.url, "Audio allowed");
            self.send_mute(tab.id, false).await;
            return Ok(());
        }

        let already_blacklisted = self.registry.is_on_permanent_black(&tab.url);

        self.send_mute(tab.id, true).await;
        self.registry.add_to_permanent_black(&tab.url);
        info!(tab = %tab.id, url = %tab.url, "Audio blocked");

        if tab.active && !already_blacklisted {
            self.notify(tab, NotificationKind::AudioBlocked).await?;
        }
        Ok(())
    }

    async fn toggle_mute(&mut self, tab_id: TabId, desired_muted: bool) -> Result<(), PolicyError> {
        self.send_mute(tab_id, desired_muted).await;

        let tab = self.host.tabs.get_tab(tab_id).await?;
        self.record_mute(&tab.url, desired_muted);

        if !desired_muted && !self.registry.is_on_permanent_white(&tab.url) {
            self.registry.remove_from_permanent_black(&tab.url);
            self.notify(&tab, NotificationKind::OfferWhitelist).await?;
        }
        Ok(())
    }

    async fn press_button(&mut self, tab_id: TabId, button_index: usize) -> Result<(), PolicyError> {
        let offered = self
            .offered
            .remove(&tab_id)
            .map_or(MAX_BUTTONS, NotificationKind::button_count);

        let result = if button_index < offered {
            self.apply_override(tab_id, button_index).await
        } else {
            Err(PolicyError::InvalidOverrideIndex {
                index: button_index,
                offered,
            })
        };

        self.clear_notification(&tab_id.to_string()).await;
        result
    }

    async fn apply_override(&mut self, tab_id: TabId, button_index: usize) -> Result<(), PolicyError> {
        let tab = self.host.tabs.get_tab(tab_id).await;

        if let Ok(tab) = &tab {
            if button_index == 0 {
                self.registry.add_to_permanent_white(&tab.url);
                info!(tab = %tab_id, url = %tab.url, "Domain whitelisted from notification");
            } else {
                self.registry.remove_from_permanent_black(&tab.url);
                info!(tab = %tab_id, url = %tab.url, "Domain allowed once from notification");
            }
            self.record_mute(&tab.url, false);
        }

        // Unmute even when the tab lookup failed.
        self.send_mute(tab_id, false).await;
        tab.map(|_| ()).map_err(PolicyError::from)
    }

    async fn try_refresh_icon(&mut self) -> Result<(), PolicyError> {
        let tab = self
            .host
            .tabs
            .query_active_tab()
            .await?
            .ok_or(PolicyError::NoActiveTab)?;

        let state = compute_icon_state(&self.registry, &tab.url);
        if self.current_icon == Some(state) {
            return Ok(());
        }

        let appearance = self.icons.appearance(state);
        self.host.icons.set_icon(&appearance.path).await?;
        self.host.icons.set_title(&appearance.tooltip).await?;
        self.current_icon = Some(state);
        debug!(icon = ?state, "Toolbar icon updated");
        Ok(())
    }

    fn record_mute(&mut self, url: &str, muted: bool) {
        if muted {
            self.registry.add_to_temp_black(url);
        } else {
            self.registry.add_to_temp_white(url);
        }
    }

    async fn send_mute(&self, tab_id: TabId, muted: bool) {
        if let Err(e) = self.host.tabs.set_muted(tab_id, muted).await {
            warn!(tab = %tab_id, muted, "Failed to set tab mute state: {}", e);
        }
    }

    async fn notify(&mut self, tab: &TabSnapshot, kind: NotificationKind) -> Result<(), PolicyError> {
        let domain = self.registry.domain_of(&tab.url);
        self.host
            .notifications
            .show(&tab.id.to_string(), kind.build(&domain))
            .await?;
        self.offered.insert(tab.id, kind);
        Ok(())
    }

    async fn clear_notification(&self, id: &str) {
        if let Err(e) = self.host.notifications.clear(id).await {
            warn!(notification = id, "Failed to clear notification: {}", e);
        }
    }

    fn report(&self, err: PolicyError) {
        match err {
            PolicyError::NoActiveTab
            | PolicyError::InvalidInput(_)
            | PolicyError::InvalidOverrideIndex { .. } => debug!("Event ignored: {}", err),
            PolicyError::Host(e) => warn!("Browser call failed: {}", e),
        }
    }
}
