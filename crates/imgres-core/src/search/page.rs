//! A loaded results page.

use scraper::Html;

use super::selectors;

/// Parsed DOM of one results page, as returned by a [`super::SearchSession`].
pub struct ResultsPage {
    url: String,
    document: Html,
}

impl ResultsPage {
    pub fn from_html(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }

    /// URL the page was loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Number of result elements on the page.
    pub fn result_count(&self) -> usize {
        self.document.select(&selectors::RESULT).count()
    }

    pub fn has_results(&self) -> bool {
        self.document.select(&selectors::RESULT).next().is_some()
    }
}

impl std::fmt::Debug for ResultsPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultsPage")
            .field("url", &self.url)
            .field("results", &self.result_count())
            .finish()
    }
}
