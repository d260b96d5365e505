//! Domain Resolver: bare hostname from the active tab URL.

use serde::Serialize;
use std::fmt;
use url::Url;

/// Normalized hostname: lowercase, no leading `www.`, no scheme or path, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DomainString(String);

impl DomainString {
    /// Normalizes a domain handed to the relay as a query value: trimmed, lowercased,
    /// one leading `www.` removed. Returns `None` when nothing is left.
    pub fn normalize(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_lowercase();
        Self::from_host(&lower)
    }

    fn from_host(host: &str) -> Option<Self> {
        let bare = host.strip_prefix("www.").unwrap_or(host);
        if bare.is_empty() {
            None
        } else {
            Some(Self(bare.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DomainString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the active tab URL to a domain. `None` means "unavailable": no tab URL,
/// a non-http(s) scheme, or a URL that does not parse.
pub fn resolve_domain(tab_url: Option<&str>) -> Option<DomainString> {
    let raw = tab_url?;
    let url = match Url::parse(raw) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(url = %raw, error = %e, "invalid tab URL");
            return None;
        }
    };
    if !matches!(url.scheme(), "http" | "https") {
        tracing::debug!(scheme = url.scheme(), "tab is not a web page");
        return None;
    }
    // The parser has already lowercased the host; only an exact `www.` prefix is removed.
    DomainString::from_host(url.host_str()?)
}
