//! Origin classification for proxied asset URLs.

use std::net::{Ipv4Addr, Ipv6Addr};

use shelf_core::ShowcaseConfig;
use url::{Host, Url};

/// How an asset URL is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginKind {
    /// Signed URLs from the content service's storage; may expire.
    Managed,
    /// Anything else; fetched as-is and never refreshed.
    PassThrough,
}

/// Host patterns that identify managed storage.
///
/// Patterns are exact hostnames or a single leading wildcard such as
/// `*.amazonaws.com`. A wildcard never matches the bare suffix; list it
/// separately when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedHosts {
    patterns: Vec<String>,
}

impl ManagedHosts {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &ShowcaseConfig) -> Self {
        Self::new(&config.managed_hosts)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.patterns.iter().any(|p| matches_pattern(&host, p))
    }

    pub fn classify(&self, url: &Url) -> OriginKind {
        match url.host_str() {
            Some(host) if self.matches(host) => OriginKind::Managed,
            _ => OriginKind::PassThrough,
        }
    }
}

fn matches_pattern(host: &str, pattern: &str) -> bool {
    if !pattern.contains('*') {
        return host == pattern;
    }

    match pattern.split_once('*') {
        // "*.example.com"
        Some(("", suffix)) if !suffix.contains('*') => {
            host.len() > suffix.len() && host.ends_with(suffix)
        }
        // "cdn.*"
        Some((prefix, "")) => host.starts_with(prefix),
        // "img-*.example.com"
        Some((prefix, suffix)) if !suffix.contains('*') => {
            host.len() >= prefix.len() + suffix.len()
                && host.starts_with(prefix)
                && host.ends_with(suffix)
        }
        _ => false,
    }
}

/// Loopback, private-range, link-local and unspecified addresses, plus
/// `localhost` names.
pub fn is_private_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(addr)) => is_private_ipv4(addr),
        Some(Host::Ipv6(addr)) => is_private_ipv6(addr),
        None => false,
    }
}

fn is_private_ipv4(addr: Ipv4Addr) -> bool {
    addr.is_private() || addr.is_loopback() || addr.is_link_local() || addr.is_unspecified()
}

fn is_private_ipv6(addr: Ipv6Addr) -> bool {
    if let Some(mapped) = addr.to_ipv4_mapped() {
        return is_private_ipv4(mapped);
    }
    let first = addr.segments()[0];
    addr.is_loopback()
        || addr.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ManagedHosts {
        ManagedHosts::from_config(&ShowcaseConfig::default())
    }

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_default_managed_hosts() {
        let hosts = defaults();
        assert!(hosts.matches("prod-files-secure.s3.us-west-2.amazonaws.com"));
        assert!(hosts.matches("www.notion.so"));
        assert!(hosts.matches("notion.so"));
        assert!(hosts.matches("S3.AMAZONAWS.COM"));
        assert!(!hosts.matches("images.unsplash.com"));
        assert!(!hosts.matches("notion.so.evil.example"));
        assert!(!hosts.matches("evilamazonaws.com"));
    }

    #[test]
    fn test_classify_uses_host_only() {
        let hosts = defaults();
        assert_eq!(
            hosts.classify(&url("https://s3.amazonaws.com/x.png")),
            OriginKind::Managed
        );
        assert_eq!(
            hosts.classify(&url("https://cdn.example/notion.so/amazonaws.com.png")),
            OriginKind::PassThrough
        );
    }

    #[test]
    fn test_wildcard_forms() {
        assert!(matches_pattern("api.example.com", "api.*"));
        assert!(matches_pattern("img-1.cdn.example", "img-*.cdn.example"));
        assert!(!matches_pattern("example.com", "*.example.com"));
        assert!(!matches_pattern("a.example.com", "*.*.com"));
    }

    #[test]
    fn test_private_hosts() {
        assert!(is_private_host(&url("http://localhost:3000/a.png")));
        assert!(is_private_host(&url("http://app.localhost/a.png")));
        assert!(is_private_host(&url("http://127.0.0.1/a.png")));
        assert!(is_private_host(&url("http://10.1.2.3/a.png")));
        assert!(is_private_host(&url("http://172.16.0.1/a.png")));
        assert!(is_private_host(&url("http://192.168.1.1/a.png")));
        assert!(is_private_host(&url("http://169.254.169.254/latest")));
        assert!(is_private_host(&url("http://0.0.0.0/a.png")));
        assert!(is_private_host(&url("http://[::1]/a.png")));
        assert!(is_private_host(&url("http://[fd00::1]/a.png")));
        assert!(is_private_host(&url("http://[::ffff:10.0.0.1]/a.png")));

        assert!(!is_private_host(&url("https://images.unsplash.com/a.png")));
        assert!(!is_private_host(&url("http://172.32.0.1/a.png")));
        assert!(!is_private_host(&url("http://8.8.8.8/a.png")));
    }
}
