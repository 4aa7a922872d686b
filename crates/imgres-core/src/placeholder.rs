//! Deterministic synthetic image references.
//!
//! Used as the last stage of the fallback chain. The URL depends only on the
//! template and the entity name, so it is byte-identical across runs.

use serde::{Deserialize, Serialize};

const PLACEHOLDER_BASE: &str = "https://placehold.co";

/// Visual template for placeholder images (size and colors as hex without `#`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderTemplate {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub foreground: String,
}

impl Default for PlaceholderTemplate {
    fn default() -> Self {
        Self {
            width: 800,
            height: 1000,
            background: "1a1a1a".to_string(),
            foreground: "d4af37".to_string(),
        }
    }
}

impl PlaceholderTemplate {
    /// `https://placehold.co/{w}x{h}/{bg}/{fg}?text={percent-encoded text}`
    pub fn url_for(&self, text: &str) -> String {
        format!(
            "{PLACEHOLDER_BASE}/{}x{}/{}/{}?text={}",
            self.width,
            self.height,
            self.background.trim_start_matches('#'),
            self.foreground.trim_start_matches('#'),
            urlencoding::encode(text.trim())
        )
    }
}
