//! Domain allowlist for proxy targets

use wildmatch::WildMatch;

/// Audio and image CDNs of the supported music platforms
pub const DEFAULT_DOMAINS: &[&str] = &[
    "sycdn.kuwo.cn",
    "kwcdn.kuwo.cn",
    "img1.kwcdn.kuwo.cn",
    "img2.kwcdn.kuwo.cn",
    "img3.kwcdn.kuwo.cn",
    "img4.kwcdn.kuwo.cn",
    "music.163.com",
    "y.qq.com",
    "ws.stream.qqmusic.qq.com",
    "isure.stream.qqmusic.qq.com",
    "dl.stream.qqmusic.qq.com",
];

/// Matcher for permitted target hostnames
///
/// A host is permitted when it equals an entry or is a subdomain of one,
/// with the boundary on a dot: `cdn.y.qq.com` matches `y.qq.com`, while
/// `evily.qq.com` does not. Matching is case-sensitive.
#[derive(Debug, Clone)]
pub struct Allowlist {
    domains: Vec<String>,
    patterns: Vec<WildMatch>,
}

impl Allowlist {
    /// Build an allowlist from plain domain names
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowlist = Self {
            domains: Vec::new(),
            patterns: Vec::new(),
        };
        for domain in domains {
            allowlist.add_domain(domain);
        }
        allowlist
    }

    /// Add a domain; both the domain itself and its subdomains are permitted
    pub fn add_domain(&mut self, domain: impl Into<String>) {
        let domain = domain.into();
        self.patterns.push(WildMatch::new(&domain));
        self.patterns.push(WildMatch::new(&format!("*.{}", domain)));
        self.domains.push(domain);
    }

    /// Check if a hostname is a permitted target
    pub fn is_allowed(&self, host: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(host))
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAINS.iter().copied())
    }
}
