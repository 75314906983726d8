//! URL to domain normalization.

use url::{Host, Url};

/// Extracts the registrable domain lists are keyed by.
pub trait UrlDomainExtractor: Send + Sync {
    /// Lowercase registrable domain, or an empty string when the url has none.
    fn domain_of(&self, url: &str) -> String;
}

/// Default extractor built on the `url` crate.
///
/// `http://sub.google.com/path` gives `google.com`. Hosts with more than two
/// labels lose their leading label only, so `www.bbc.co.uk` gives
/// `bbc.co.uk`. Single-label hosts (`localhost`, `chrome://newtab`) give an
/// empty string.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostnameExtractor;

impl UrlDomainExtractor for HostnameExtractor {
    fn domain_of(&self, url: &str) -> String {
        let url = url.trim();
        if url.is_empty() {
            return String::new();
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return String::new(),
        };

        match parsed.host() {
            Some(Host::Domain(host)) => reduce_host(&host.to_lowercase()),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => ip.to_string(),
            None => String::new(),
        }
    }
}

/// The form urls are compared in: re-serialized by the `url` crate, so
/// internationalized hosts appear in punycode like extracted domains do, then
/// lowercased. Input that does not parse is only lowercased.
pub fn canonical_url(url: &str) -> String {
    let url = url.trim();
    match Url::parse(url) {
        Ok(parsed) => parsed.as_str().to_lowercase(),
        Err(_) => url.to_lowercase(),
    }
}

fn reduce_host(host: &str) -> String {
    let host = host.trim_end_matches('.');
    let labels: Vec<&str> = host.split('.').collect();

    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return String::new();
    }
    if labels.len() > 2 {
        return labels[1..].join(".");
    }
    host.to_string()
}
