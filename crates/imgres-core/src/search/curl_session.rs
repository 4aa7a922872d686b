//! Results page loading over libcurl.
//!
//! One `Easy` handle is kept for the whole run so connection reuse and
//! provider cookies carry over between queries. The page is fetched as plain
//! HTML and parsed with `scraper`. Each `load` is a single fetch: a page
//! without result tiles is reported as `NoResults`, and the caller paces the
//! next query.

use std::time::{Duration, Instant};

use crate::config::ImgresConfig;
use crate::retry::{run_with_retry, RetryPolicy};

use super::{ResultsPage, SearchError, SearchSession};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_REDIRECTS: u32 = 5;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub user_agent: String,
    /// Whole-request timeout for a single fetch; also bounds the wait for results.
    pub page_timeout: Duration,
    pub retry: RetryPolicy,
}

impl SessionOptions {
    pub fn from_config(cfg: &ImgresConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            page_timeout: cfg.page_timeout(),
            retry: cfg.retry_policy(),
        }
    }
}

pub struct CurlSearchSession {
    easy: Option<curl::easy::Easy>,
    opts: SessionOptions,
}

impl CurlSearchSession {
    /// Configure the shared handle. Failure here is fatal for the run.
    pub fn open(opts: SessionOptions) -> Result<Self, SearchError> {
        let mut easy = curl::easy::Easy::new();
        easy.useragent(&opts.user_agent)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        // Empty path turns on the in-memory cookie engine.
        easy.cookie_file("")?;
        easy.accept_encoding("")?;
        easy.connect_timeout(CONNECT_TIMEOUT.min(opts.page_timeout))?;
        easy.timeout(opts.page_timeout)?;
        tracing::debug!(user_agent = %opts.user_agent, "search session opened");
        Ok(Self {
            easy: Some(easy),
            opts,
        })
    }

    fn fetch(&mut self, url: &str) -> Result<String, SearchError> {
        let easy = self
            .easy
            .as_mut()
            .ok_or_else(|| SearchError::Session("session already closed".to_string()))?;
        easy.url(url)?;
        easy.get(true)?;

        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(SearchError::Http(code));
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl SearchSession for CurlSearchSession {
    fn load(&mut self, url: &str) -> Result<ResultsPage, SearchError> {
        let started = Instant::now();
        let policy = self.opts.retry;
        let html = run_with_retry(&policy, || self.fetch(url), SearchError::kind)?;
        let page = ResultsPage::from_html(url, &html);
        if !page.has_results() {
            tracing::debug!(url, "results page has no result tiles");
            return Err(SearchError::NoResults(self.opts.page_timeout));
        }
        tracing::debug!(
            url,
            results = page.result_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "results page loaded"
        );
        Ok(page)
    }

    fn close(&mut self) {
        self.easy.take();
    }
}
