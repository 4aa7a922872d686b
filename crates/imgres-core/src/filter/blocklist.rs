//! Static host blocklist.
//!
//! Social media hosts routinely refuse hotlinking or require a login, so
//! their image URLs are never accepted.

/// Built-in entries. Entries without a dot match anywhere in the host, so
/// `instagram` also covers CDN hosts like `scontent-lax3-1.cdninstagram.com`.
pub const SOCIAL_MEDIA: &[&str] = &["pinterest", "facebook", "instagram", "tiktok"];

#[derive(Debug, Clone)]
pub struct HostBlocklist {
    entries: Vec<String>,
}

impl Default for HostBlocklist {
    fn default() -> Self {
        Self::social_media()
    }
}

impl HostBlocklist {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn social_media() -> Self {
        Self::empty().with_extra(SOCIAL_MEDIA.iter().copied())
    }

    /// Add entries. `example.com` blocks that domain and its subdomains;
    /// a bare name like `tiktok` blocks every host containing it
    /// (`tiktokcdn-us.com` included).
    pub fn with_extra<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for h in hosts {
            let h = h.as_ref().trim().trim_matches('.').to_ascii_lowercase();
            if !h.is_empty() && !self.entries.contains(&h) {
                self.entries.push(h);
            }
        }
        self
    }

    pub fn is_blocked_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.entries.iter().any(|entry| {
            if entry.contains('.') {
                host == *entry
                    || host
                        .strip_suffix(entry.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            } else {
                host.contains(entry.as_str())
            }
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercased host of an absolute URL, if it has one.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}
