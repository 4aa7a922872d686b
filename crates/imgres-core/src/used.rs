//! Run-wide set of image URLs already handed out.

use std::collections::HashSet;

/// Insert-only set of resolved URLs for one run.
///
/// Owned by the driver; the filter only ever gets a shared borrow, so the
/// check (filter) and the reserve (driver) cannot interleave with another
/// resolution.
#[derive(Debug, Default)]
pub struct UsedUrls {
    urls: HashSet<String>,
}

impl UsedUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Reserve `url`. Returns false if it was already present.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent_and_reports_duplicates() {
        let mut used = UsedUrls::new();
        assert!(used.is_empty());
        assert!(used.insert("https://cdn.example.com/a.jpg"));
        assert!(!used.insert("https://cdn.example.com/a.jpg"));
        assert!(used.contains("https://cdn.example.com/a.jpg"));
        assert!(!used.contains("https://cdn.example.com/b.jpg"));
        assert_eq!(used.len(), 1);
    }
}
