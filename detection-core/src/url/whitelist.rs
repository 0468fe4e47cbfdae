//! Trusted-domain whitelist with fast-path legitimacy decisions.
//!
//! The set is populated once at process start from a line-oriented text
//! artifact and never mutated afterwards. A missing or unreadable artifact
//! leaves the whitelist empty; requests must never fail because of it.

use std::collections::HashSet;
use std::path::Path;

use url::Url;

use super::normalize::{ensure_scheme, normalize};

/// Process-wide set of trusted domains.
#[derive(Debug, Clone, Default)]
pub struct WhitelistSet {
    entries: HashSet<String>,
}

impl WhitelistSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw entries. Each entry is normalized on the way in so the
    /// artifact may list `https://www.google.com/` and still match hosts.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| normalize(entry.as_ref().trim()))
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { entries }
    }

    /// Load from a line-oriented text artifact. Lines starting with `#` are
    /// skipped. Fails open: any I/O problem yields an empty set.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let set = Self::from_entries(
                    content.lines().filter(|line| !line.trim_start().starts_with('#')),
                );
                tracing::info!(
                    "Loaded {} whitelist entries from {}",
                    set.len(),
                    path.display()
                );
                set
            }
            Err(e) => {
                tracing::warn!(
                    "Whitelist artifact {} unavailable ({}); continuing with empty whitelist",
                    path.display(),
                    e
                );
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fast-path trust decision.
    ///
    /// True when the URL's host exactly equals an entry or is a subdomain of
    /// one: `mail.google.com` matches entry `google.com`, `evilgoogle.com`
    /// does not. Unparseable input is never trusted.
    pub fn is_trusted(&self, url: &str) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let host = match extract_host(url) {
            Some(host) => host,
            None => return false,
        };
        self.entries
            .iter()
            .any(|entry| host == *entry || host.ends_with(&format!(".{}", entry)))
    }
}

/// Pull the authority host out of a URL, tolerating a missing scheme.
fn extract_host(url: &str) -> Option<String> {
    let candidate = ensure_scheme(url.trim());
    let parsed = Url::parse(&candidate).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    Some(host.to_lowercase())
}
