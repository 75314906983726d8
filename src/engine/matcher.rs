use crate::domain::canonical_url;

/// An ordered list of domains with the loose membership test used for every
/// policy decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainList {
    domains: Vec<String>,
}

impl DomainList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_domains(domains: Vec<String>) -> Self {
        Self { domains }
    }

    /// True if any non-empty stored domain is a substring of the canonical
    /// url. `example.com` matches `http://sub.example.com/` and also
    /// `http://notexample.com/`.
    pub fn matches(&self, url: &str) -> bool {
        let url = canonical_url(url);
        self.domains
            .iter()
            .any(|domain| !domain.is_empty() && url.contains(domain.as_str()))
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }

    pub fn push(&mut self, domain: String) {
        self.domains.push(domain);
    }

    /// Removes every entry equal to `domain`, returning whether any was found.
    pub fn remove(&mut self, domain: &str) -> bool {
        let before = self.domains.len();
        self.domains.retain(|d| d != domain);
        self.domains.len() != before
    }

    pub fn as_slice(&self) -> &[String] {
        &self.domains
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.domains.clone()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
