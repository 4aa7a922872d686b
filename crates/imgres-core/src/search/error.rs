//! Errors raised by a search session.

use std::time::Duration;

use crate::retry::{classify_curl_error, classify_http_status, ErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The results page never showed a result element within the bounded wait.
    #[error("no results within {0:?}")]
    NoResults(Duration),
    /// curl reported a transport failure (timeout, DNS, connection, ...).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    /// The provider answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The session itself is unusable (could not be opened, already closed).
    #[error("search session: {0}")]
    Session(String),
}

impl SearchError {
    /// Retry classification for page loads.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Transport(e) => classify_curl_error(e),
            SearchError::Http(code) => classify_http_status(*code),
            SearchError::NoResults(_) | SearchError::Session(_) => ErrorKind::Other,
        }
    }

    /// True when the page simply had nothing to offer.
    pub fn is_no_results(&self) -> bool {
        matches!(self, SearchError::NoResults(_))
    }
}
