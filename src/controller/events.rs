use super::AudioPolicyController;
use crate::host::{TabChange, TabId, TabSnapshot};
use tokio::sync::mpsc;
use tracing::info;

/// Browser signals the controller subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    TabCreated,
    TabActivated,
    WindowFocusChanged,
    TabUpdated { tab: TabSnapshot, change: TabChange },
    TabRemoved { tab_id: TabId },
    /// The toolbar icon was clicked while `tab` was active.
    IconClicked { tab: TabSnapshot },
    NotificationButtonClicked {
        notification_id: String,
        button_index: usize,
    },
    /// Dismissed by the user or the system without a button press.
    NotificationClosed { notification_id: String },
}

/// Drives `controller` from `rx` until every sender is dropped.
///
/// Events are handled one at a time in delivery order.
pub async fn run_event_loop(
    controller: &mut AudioPolicyController,
    mut rx: mpsc::Receiver<BrowserEvent>,
) {
    while let Some(event) = rx.recv().await {
        controller.handle_event(event).await;
    }
    info!("Browser event channel closed, policy loop stopping.");
}
