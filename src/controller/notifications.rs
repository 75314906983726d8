use crate::host::Notification;

const NEVER_MUTE: &str = "NEVER MUTE";
const ALLOW_ONCE: &str = "ALLOW ONCE";
const CONTEXT_MESSAGE: &str = "What should we do?";

/// The notifications the controller can put in front of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A tab was muted because its domain is not allowed.
    /// Buttons: never mute, allow once.
    AudioBlocked,
    /// The user unmuted a tab by hand.
    /// Buttons: never mute.
    OfferWhitelist,
}

impl NotificationKind {
    pub fn button_count(self) -> usize {
        match self {
            NotificationKind::AudioBlocked => 2,
            NotificationKind::OfferWhitelist => 1,
        }
    }

    pub fn build(self, domain: &str) -> Notification {
        let domain = domain.to_uppercase();
        match self {
            NotificationKind::AudioBlocked => Notification {
                title: format!("AUDIO BLOCKED: {}", domain),
                message: "The domain wants to play audio.".to_string(),
                context_message: CONTEXT_MESSAGE.to_string(),
                icon_url: "resources/shared/images/warning_image_250.png".to_string(),
                buttons: vec![NEVER_MUTE.to_string(), ALLOW_ONCE.to_string()],
            },
            NotificationKind::OfferWhitelist => Notification {
                title: format!("ALLOWED AUDIO: {}", domain),
                message: "The domain has been temporarily unmuted".to_string(),
                context_message: CONTEXT_MESSAGE.to_string(),
                icon_url: "resources/shared/images/warning_icon_128.png".to_string(),
                buttons: vec![NEVER_MUTE.to_string()],
            },
        }
    }
}
