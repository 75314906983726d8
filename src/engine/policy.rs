use super::registry::ListRegistry;

/// Whether a tab's url may play audio under the current lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabPolicy {
    Allowed,
    Blocked,
}

/// What the toolbar icon should show for the active tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconState {
    /// On the permanent black list, regardless of any white list.
    Blacklisted,
    Whitelisted,
    AllowedDefault,
    BlockedDefault,
}

pub fn evaluate_policy(registry: &ListRegistry, url: &str) -> TabPolicy {
    if registry.is_allowed_to_play(url) {
        TabPolicy::Allowed
    } else {
        TabPolicy::Blocked
    }
}

pub fn compute_icon_state(registry: &ListRegistry, url: &str) -> IconState {
    if registry.is_on_permanent_black(url) {
        return IconState::Blacklisted;
    }

    match evaluate_policy(registry, url) {
        TabPolicy::Allowed if registry.is_on_permanent_white(url) => IconState::Whitelisted,
        TabPolicy::Allowed => IconState::AllowedDefault,
        TabPolicy::Blocked => IconState::BlockedDefault,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_follows_white_lists_only() {
        let mut registry = ListRegistry::new();
        assert_eq!(evaluate_policy(&registry, "http://a.com"), TabPolicy::Blocked);

        registry.add_to_temp_white("http://a.com");
        assert_eq!(evaluate_policy(&registry, "http://a.com"), TabPolicy::Allowed);

        registry.add_to_temp_black("http://a.com");
        assert_eq!(evaluate_policy(&registry, "http://a.com"), TabPolicy::Blocked);
    }

    #[test]
    fn test_icon_states() {
        let mut registry = ListRegistry::new();
        registry.add_to_permanent_black("http://black.com");
        registry.add_to_permanent_white("http://white.com");
        registry.add_to_temp_white("http://temp.com");

        assert_eq!(
            compute_icon_state(&registry, "http://black.com/x"),
            IconState::Blacklisted
        );
        assert_eq!(
            compute_icon_state(&registry, "http://white.com/x"),
            IconState::Whitelisted
        );
        assert_eq!(
            compute_icon_state(&registry, "http://temp.com/x"),
            IconState::AllowedDefault
        );
        assert_eq!(
            compute_icon_state(&registry, "http://unknown.com/x"),
            IconState::BlockedDefault
        );
    }

    #[test]
    fn test_blacklist_icon_wins_over_temp_white() {
        let mut registry = ListRegistry::new();
        registry.add_to_permanent_black("http://both.com");
        // Temp white does not clear the permanent black list.
        registry.add_to_temp_white("http://both.com");

        assert_eq!(evaluate_policy(&registry, "http://both.com"), TabPolicy::Allowed);
        assert_eq!(
            compute_icon_state(&registry, "http://both.com"),
            IconState::Blacklisted
        );
    }
}
