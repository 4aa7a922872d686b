//! Search query construction.
//!
//! A query is the entity name plus either the category modifier (primary,
//! on-brand) or the flow's generic quality modifier (secondary, widened).
//! Both are deterministic; the provider URL adds the size/aspect filters.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntity, ResolutionProfile};

/// Which query the fallback chain is issuing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Primary,
    Secondary,
}

/// Provider image size filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeFilter {
    #[default]
    Large,
    Wallpaper,
}

impl SizeFilter {
    fn as_filter(self) -> &'static str {
        match self {
            SizeFilter::Large => "imagesize-large",
            SizeFilter::Wallpaper => "imagesize-wallpaper",
        }
    }
}

/// Provider aspect ratio filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Tall,
    Wide,
    Square,
}

impl Aspect {
    fn as_filter(self) -> &'static str {
        match self {
            Aspect::Tall => "aspect-tall",
            Aspect::Wide => "aspect-wide",
            Aspect::Square => "aspect-square",
        }
    }
}

fn join_words(name: &str, modifier: &str) -> String {
    let name = name.trim();
    let modifier = modifier.trim();
    match (name.is_empty(), modifier.is_empty()) {
        (_, true) => name.to_string(),
        (true, false) => modifier.to_string(),
        (false, false) => format!("{name} {modifier}"),
    }
}

/// Builds the search query for an entity in the given mode.
///
/// - `Primary`: `"{name} {query_modifier}"`
/// - `Secondary`: `"{name} {profile.secondary_modifier}"`
pub fn build_query(entity: &CatalogEntity, mode: QueryMode, profile: &ResolutionProfile) -> String {
    match mode {
        QueryMode::Primary => join_words(&entity.name, &entity.query_modifier),
        QueryMode::Secondary => join_words(&entity.name, &profile.secondary_modifier),
    }
}

/// Builds the provider results URL for a query.
///
/// `endpoint?q=<percent-encoded query>&qft=+filterui:<size>[+filterui:<aspect>]`
pub fn search_url(endpoint: &str, query: &str, size: SizeFilter, aspect: Option<Aspect>) -> String {
    let mut qft = format!("+filterui:{}", size.as_filter());
    if let Some(a) = aspect {
        qft.push_str("+filterui:");
        qft.push_str(a.as_filter());
    }
    let sep = if endpoint.contains('?') { '&' } else { '?' };
    format!(
        "{endpoint}{sep}q={}&qft={qft}",
        urlencoding::encode(query)
    )
}
