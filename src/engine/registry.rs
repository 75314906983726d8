use super::matcher::DomainList;
use super::policy::{evaluate_policy, TabPolicy};
use crate::domain::{canonical_url, HostnameExtractor, UrlDomainExtractor};
use crate::error::{PolicyError, StorageError};
use crate::storage::{PersistedLists, Persister, StorageService};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    PermanentWhite,
    PermanentBlack,
    TempWhite,
    TempBlack,
}

impl ListKind {
    pub const ALL: [ListKind; 4] = [
        ListKind::PermanentWhite,
        ListKind::PermanentBlack,
        ListKind::TempWhite,
        ListKind::TempBlack,
    ];

    pub fn is_permanent(self) -> bool {
        matches!(self, ListKind::PermanentWhite | ListKind::PermanentBlack)
    }

    pub fn is_white(self) -> bool {
        matches!(self, ListKind::PermanentWhite | ListKind::TempWhite)
    }
}

/// Owner of the four domain lists.
///
/// Adding a domain to one list first removes it from the opposing lists:
///
/// | added to        | removed from                    |
/// |-----------------|---------------------------------|
/// | permanent white | temp black, permanent black     |
/// | permanent black | temp white, permanent white     |
/// | temp white      | temp black                      |
/// | temp black      | temp white, permanent white     |
///
/// Temp white leaves the permanent black list alone, so a domain can sit on
/// both; white lists take precedence in [`ListRegistry::policy`].
pub struct ListRegistry {
    extractor: Arc<dyn UrlDomainExtractor>,
    permanent_white: DomainList,
    permanent_black: DomainList,
    temp_white: DomainList,
    temp_black: DomainList,
    persister: Option<Persister>,
}

impl Default for ListRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ListRegistry {
    /// Empty, memory-only registry using [`HostnameExtractor`].
    pub fn new() -> Self {
        Self {
            extractor: Arc::new(HostnameExtractor),
            permanent_white: DomainList::new(),
            permanent_black: DomainList::new(),
            temp_white: DomainList::new(),
            temp_black: DomainList::new(),
            persister: None,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn UrlDomainExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Writes both permanent lists through `persister` after every change.
    pub fn with_persister(mut self, persister: Persister) -> Self {
        self.persister = Some(persister);
        self
    }

    /// Replaces the permanent lists with whatever storage holds. Keys that
    /// were never written leave the matching list untouched.
    pub async fn load_from_storage(
        &mut self,
        storage: &dyn StorageService,
    ) -> Result<(), StorageError> {
        let stored = storage.load_all().await?;

        if let Some(white) = stored.white_list {
            self.permanent_white = DomainList::from_domains(white);
        }
        if let Some(black) = stored.black_list {
            self.permanent_black = DomainList::from_domains(black);
        }

        info!(
            "Loaded lists from storage: {} whitelisted, {} blacklisted",
            self.permanent_white.len(),
            self.permanent_black.len()
        );
        Ok(())
    }

    pub fn add_to_permanent_white(&mut self, url: &str) -> bool {
        self.add(
            ListKind::PermanentWhite,
            url,
            &[ListKind::TempBlack, ListKind::PermanentBlack],
        )
    }

    pub fn add_to_permanent_black(&mut self, url: &str) -> bool {
        self.add(
            ListKind::PermanentBlack,
            url,
            &[ListKind::TempWhite, ListKind::PermanentWhite],
        )
    }

    pub fn add_to_temp_white(&mut self, url: &str) -> bool {
        self.add(ListKind::TempWhite, url, &[ListKind::TempBlack])
    }

    pub fn add_to_temp_black(&mut self, url: &str) -> bool {
        self.add(
            ListKind::TempBlack,
            url,
            &[ListKind::TempWhite, ListKind::PermanentWhite],
        )
    }

    pub fn remove_from_permanent_white(&mut self, url: &str) -> bool {
        self.remove(ListKind::PermanentWhite, url)
    }

    /// Also drops the domain from the temp black list.
    pub fn remove_from_permanent_black(&mut self, url: &str) -> bool {
        self.remove(ListKind::PermanentBlack, url)
    }

    pub fn remove_from_temp_white(&mut self, url: &str) -> bool {
        self.remove(ListKind::TempWhite, url)
    }

    pub fn remove_from_temp_black(&mut self, url: &str) -> bool {
        self.remove(ListKind::TempBlack, url)
    }

    pub fn is_on(&self, kind: ListKind, url: &str) -> bool {
        self.list(kind).matches(url)
    }

    pub fn is_on_permanent_white(&self, url: &str) -> bool {
        self.permanent_white.matches(url)
    }

    pub fn is_on_permanent_black(&self, url: &str) -> bool {
        self.permanent_black.matches(url)
    }

    pub fn is_on_temp_white(&self, url: &str) -> bool {
        self.temp_white.matches(url)
    }

    pub fn is_on_temp_black(&self, url: &str) -> bool {
        self.temp_black.matches(url)
    }

    pub fn is_allowed_to_play(&self, url: &str) -> bool {
        self.is_on_permanent_white(url) || self.is_on_temp_white(url)
    }

    pub fn policy(&self, url: &str) -> TabPolicy {
        evaluate_policy(self, url)
    }

    pub fn domain_of(&self, url: &str) -> String {
        self.extractor.domain_of(url)
    }

    pub fn domains(&self, kind: ListKind) -> &[String] {
        self.list(kind).as_slice()
    }

    pub fn snapshot(&self) -> PersistedLists {
        PersistedLists::new(self.permanent_white.to_vec(), self.permanent_black.to_vec())
    }

    fn list(&self, kind: ListKind) -> &DomainList {
        match kind {
            ListKind::PermanentWhite => &self.permanent_white,
            ListKind::PermanentBlack => &self.permanent_black,
            ListKind::TempWhite => &self.temp_white,
            ListKind::TempBlack => &self.temp_black,
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut DomainList {
        match kind {
            ListKind::PermanentWhite => &mut self.permanent_white,
            ListKind::PermanentBlack => &mut self.permanent_black,
            ListKind::TempWhite => &mut self.temp_white,
            ListKind::TempBlack => &mut self.temp_black,
        }
    }

    /// Canonical url and its domain.
    fn normalize(&self, url: &str) -> Result<(String, String), PolicyError> {
        let url = canonical_url(url);
        let domain = self.extractor.domain_of(&url);
        if domain.is_empty() {
            return Err(PolicyError::InvalidInput(url));
        }
        Ok((url, domain))
    }

    fn add(&mut self, target: ListKind, url: &str, opposing: &[ListKind]) -> bool {
        let (url, domain) = match self.normalize(url) {
            Ok(normalized) => normalized,
            Err(e) => {
                debug!(list = ?target, "Ignoring add: {}", e);
                return false;
            }
        };

        if self.list(target).matches(&url) {
            return false;
        }

        let mut permanent_changed = target.is_permanent();
        for &kind in opposing {
            if self.remove_matching(kind, &url, &domain) && kind.is_permanent() {
                permanent_changed = true;
            }
        }

        debug!(list = ?target, domain = %domain, "Domain added");
        self.list_mut(target).push(domain);

        if permanent_changed {
            self.persist();
        }
        true
    }

    fn remove(&mut self, target: ListKind, url: &str) -> bool {
        let (url, domain) = match self.normalize(url) {
            Ok(normalized) => normalized,
            Err(e) => {
                debug!(list = ?target, "Ignoring remove: {}", e);
                return false;
            }
        };

        if !self.list(target).matches(&url) {
            return false;
        }

        if target == ListKind::PermanentBlack {
            self.remove_matching(ListKind::TempBlack, &url, &domain);
        }

        let removed = self.list_mut(target).remove(&domain);
        if removed {
            debug!(list = ?target, domain = %domain, "Domain removed");
            if target.is_permanent() {
                self.persist();
            }
        }
        removed
    }

    fn remove_matching(&mut self, kind: ListKind, url: &str, domain: &str) -> bool {
        if !self.list(kind).matches(url) {
            return false;
        }
        let removed = self.list_mut(kind).remove(domain);
        if removed {
            debug!(list = ?kind, domain = %domain, "Domain removed from opposing list");
        }
        removed
    }

    fn persist(&self) {
        if let Some(persister) = &self.persister {
            persister.save(self.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_add_is_idempotent() {
        let mut registry = ListRegistry::new();
        assert!(registry.add_to_permanent_white("http://www.example.com/a"));
        assert!(!registry.add_to_permanent_white("http://www.example.com/a"));
        assert_eq!(
            registry.domains(ListKind::PermanentWhite),
            ["example.com".to_string()]
        );
    }

    #[test]
    fn test_urls_without_domain_are_ignored() {
        let mut registry = ListRegistry::new();
        assert!(!registry.add_to_permanent_white(""));
        assert!(!registry.add_to_temp_black("chrome://newtab"));
        assert!(!registry.remove_from_permanent_black("not a url"));
        for kind in ListKind::ALL {
            assert!(registry.domains(kind).is_empty());
        }
    }

    #[test]
    fn test_adding_black_clears_white_lists() {
        let mut registry = ListRegistry::new();
        registry.add_to_permanent_white("http://a.com");
        registry.add_to_temp_white("http://a.com");

        registry.add_to_permanent_black("http://a.com");

        assert!(!registry.is_on_permanent_white("http://a.com"));
        assert!(!registry.is_on_temp_white("http://a.com"));
        assert!(registry.is_on_permanent_black("http://a.com"));
    }

    #[test]
    fn test_temp_black_also_clears_permanent_white() {
        let mut registry = ListRegistry::new();
        registry.add_to_permanent_white("http://a.com");

        registry.add_to_temp_black("http://a.com");

        assert!(!registry.is_on_permanent_white("http://a.com"));
        assert!(registry.is_on_temp_black("http://a.com"));
        assert_eq!(registry.policy("http://a.com"), TabPolicy::Blocked);
    }

    #[test]
    fn test_temp_white_keeps_permanent_black() {
        let mut registry = ListRegistry::new();
        registry.add_to_permanent_black("http://a.com");
        registry.add_to_temp_black("http://a.com");

        registry.add_to_temp_white("http://a.com");

        assert!(!registry.is_on_temp_black("http://a.com"));
        assert!(registry.is_on_permanent_black("http://a.com"));
        assert!(registry.is_allowed_to_play("http://a.com"));
    }

    #[test]
    fn test_removing_permanent_black_cascades_to_temp_black() {
        let mut registry = ListRegistry::new();
        registry.add_to_permanent_black("http://a.com");
        registry.add_to_temp_black("http://a.com");

        assert!(registry.remove_from_permanent_black("http://a.com"));

        assert!(!registry.is_on_permanent_black("http://a.com"));
        assert!(!registry.is_on_temp_black("http://a.com"));
    }

    #[test]
    fn test_remove_uses_url_domain_not_matching_entry() {
        let mut registry = ListRegistry::new();
        registry.add_to_permanent_white("http://example.com");

        // Matches by substring, but its own domain was never stored.
        assert!(registry.is_on_permanent_white("http://notexample.com"));
        assert!(!registry.remove_from_permanent_white("http://notexample.com"));
        assert!(registry.is_on_permanent_white("http://example.com"));
    }

    #[test]
    fn test_internationalized_host_is_stored_once_and_matches() {
        let mut registry = ListRegistry::new();
        assert!(registry.add_to_permanent_white("http://münchen.de/"));
        assert!(!registry.add_to_permanent_white("http://münchen.de/"));
        assert!(!registry.add_to_permanent_white("http://xn--mnchen-3ya.de/"));

        assert_eq!(
            registry.domains(ListKind::PermanentWhite),
            ["xn--mnchen-3ya.de".to_string()]
        );
        assert!(registry.is_on_permanent_white("http://münchen.de/"));
        assert!(registry.is_allowed_to_play("https://www.münchen.de/stadtplan"));

        assert!(registry.remove_from_permanent_white("http://münchen.de/"));
        assert!(registry.domains(ListKind::PermanentWhite).is_empty());
    }

    #[test]
    fn test_scenarios_a_and_b() {
        let mut registry = ListRegistry::new();

        registry.add_to_permanent_black("http://ads.example.com");
        assert!(!registry.is_allowed_to_play("http://ads.example.com"));
        assert!(registry.is_on_permanent_black("http://ads.example.com"));

        registry.add_to_permanent_white("http://ads.example.com");
        assert!(!registry.is_on_permanent_black("http://ads.example.com"));
        assert!(registry.is_allowed_to_play("http://ads.example.com"));
    }

    #[tokio::test]
    async fn test_load_overwrites_only_stored_keys() {
        let storage = crate::storage::MemoryStorage::with_lists(PersistedLists {
            white_list: Some(vec!["w.com".into()]),
            black_list: None,
        });

        let mut registry = ListRegistry::new();
        registry.add_to_permanent_black("http://b.com");
        registry.load_from_storage(&storage).await.unwrap();

        assert_eq!(registry.domains(ListKind::PermanentWhite), ["w.com".to_string()]);
        assert_eq!(registry.domains(ListKind::PermanentBlack), ["b.com".to_string()]);
    }
}
