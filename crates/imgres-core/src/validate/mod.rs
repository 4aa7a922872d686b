//! Reachability validation: does a URL actually serve an image?
//!
//! The [`Validator`] contract never fails: transport problems come back as
//! [`Reachability::Unreachable`]. [`CurlValidator`] answers with a HEAD
//! request bounded by a timeout.

mod parse;

use std::time::Duration;

pub use parse::{parse_headers, ProbeHeaders};

/// Outcome of a reachability check. Only `ReachableImage` passes the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    ReachableImage,
    NotImage,
    Unreachable,
}

impl Reachability {
    pub fn passes(self) -> bool {
        matches!(self, Reachability::ReachableImage)
    }
}

pub trait Validator {
    fn check(&self, url: &str) -> Reachability;
}

/// HEAD-based validator over libcurl.
#[derive(Debug, Clone)]
pub struct CurlValidator {
    timeout: Duration,
    user_agent: Option<String>,
}

impl CurlValidator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Performs the HEAD request and returns the final status and headers.
    ///
    /// Follows redirects; header lines from every hop are collected, so only
    /// the lines after the last status line are parsed.
    fn probe(&self, url: &str) -> Result<(u32, ProbeHeaders), curl::Error> {
        let mut lines: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.nobody(true)?; // HEAD request
        easy.follow_location(true)?;
        easy.connect_timeout(self.timeout)?;
        easy.timeout(self.timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = std::str::from_utf8(data) {
                    let line = s.trim_end();
                    if line.starts_with("HTTP/") {
                        lines.clear();
                    }
                    lines.push(line.to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, parse_headers(&lines)))
    }
}

impl Validator for CurlValidator {
    fn check(&self, url: &str) -> Reachability {
        match self.probe(url) {
            Ok((code, headers)) => {
                let verdict = classify(code, &headers);
                tracing::debug!(url, code, content_type = ?headers.content_type, ?verdict, "validated");
                verdict
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "validation failed");
                Reachability::Unreachable
            }
        }
    }
}

/// 200 with an `image/*` content type passes; any other 2xx is `NotImage`.
pub fn classify(code: u32, headers: &ProbeHeaders) -> Reachability {
    if code != 200 {
        return if (200..300).contains(&code) {
            Reachability::NotImage
        } else {
            Reachability::Unreachable
        };
    }
    if headers.is_image() {
        Reachability::ReachableImage
    } else {
        Reachability::NotImage
    }
}
