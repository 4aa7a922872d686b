//! Candidate extraction from a loaded results page.
//!
//! [`candidates`] returns a lazy iterator over the first `k` result tiles, in
//! provider order. A tile whose payload is missing or unparsable is skipped
//! (it still counts toward `k`); the iterator never fails as a whole.

use scraper::html::Select;
use serde_json::{Map, Value};

use crate::search::selectors::{IMAGE_URL_KEY, METADATA_ATTR, RESULT};
use crate::search::ResultsPage;

/// Unvalidated image reference plus whatever else the tile carried.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub raw_url: String,
    /// The tile's full JSON payload (thumbnail URL, source page, sizes, ...).
    pub metadata: Map<String, Value>,
}

impl Candidate {
    pub fn new(raw_url: impl Into<String>) -> Self {
        Self {
            raw_url: raw_url.into(),
            metadata: Map::new(),
        }
    }
}

/// Why a tile produced no candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Malformed {
    MissingPayload,
    BadJson(String),
    MissingUrl,
}

fn parse_payload(raw: Option<&str>) -> Result<Candidate, Malformed> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(Malformed::MissingPayload)?;
    let metadata: Map<String, Value> =
        serde_json::from_str(raw).map_err(|e| Malformed::BadJson(e.to_string()))?;
    let raw_url = metadata
        .get(IMAGE_URL_KEY)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(Malformed::MissingUrl)?
        .to_string();
    Ok(Candidate { raw_url, metadata })
}

/// Lazy, ordered, bounded candidate sequence over one page.
///
/// Consumed by value; there is no way to rewind it.
pub struct Candidates<'a> {
    tiles: std::iter::Take<Select<'a, 'static>>,
    position: usize,
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        for tile in self.tiles.by_ref() {
            self.position += 1;
            match parse_payload(tile.value().attr(METADATA_ATTR)) {
                Ok(c) => return Some(c),
                Err(why) => {
                    tracing::debug!(position = self.position, ?why, "skipping malformed result");
                }
            }
        }
        None
    }
}

/// Candidates from the first `look_ahead` result tiles of `page`.
pub fn candidates(page: &ResultsPage, look_ahead: usize) -> Candidates<'_> {
    Candidates {
        tiles: page.document().select(&RESULT).take(look_ahead),
        position: 0,
    }
}
