//! CSS selectors for the image results page.
//!
//! Update this file when the provider changes its result markup.

use scraper::Selector;
use std::sync::LazyLock;

/// One result tile; carries the metadata payload.
pub static RESULT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.iusc").expect("static selector"));

/// Attribute holding the per-result JSON payload.
pub const METADATA_ATTR: &str = "m";

/// Key of the full-size image URL inside the payload.
pub const IMAGE_URL_KEY: &str = "murl";
