//! Search session: the provider-facing collaborator.
//!
//! The pipeline only sees the [`SearchSession`] trait: load a results URL,
//! get back a parsed [`ResultsPage`] that contains at least one result
//! element, or a [`SearchError`]. [`CurlSearchSession`] is the shipped
//! implementation; tests substitute scripted sessions.

mod curl_session;
mod error;
mod guard;
mod page;
pub(crate) mod selectors;

pub use curl_session::{CurlSearchSession, SessionOptions};
pub use error::SearchError;
pub use guard::SessionGuard;
pub use page::ResultsPage;

/// A stateful, single-caller session against the image search provider.
pub trait SearchSession {
    /// Load `url` and return the page once it contains result elements.
    ///
    /// Implementations bound the wait and return [`SearchError::NoResults`]
    /// when nothing shows up in time.
    fn load(&mut self, url: &str) -> Result<ResultsPage, SearchError>;

    /// Release the session. Called once by [`SessionGuard`]; must be idempotent.
    fn close(&mut self) {}
}
