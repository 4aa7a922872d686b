//! Candidate filtering.
//!
//! Checks run left to right and stop at the first failure:
//! well-formed → unused → host not blocked → (optionally) reachable image.
//! The filter only reads [`UsedUrls`]; reserving the winner is the driver's job.

mod blocklist;

pub use blocklist::{host_of, HostBlocklist, SOCIAL_MEDIA};

use crate::extract::Candidate;
use crate::used::UsedUrls;
use crate::validate::{Reachability, Validator};

/// Why a candidate was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not an absolute http(s) URL with a host.
    Malformed,
    /// Already resolved for another entity this run.
    Duplicate,
    /// Host is on the blocklist.
    Blocked,
    /// Validation was required and did not report a reachable image.
    Invalid(Reachability),
}

/// Winning candidate and whether it went through validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    pub candidate: Candidate,
    pub validated: bool,
}

pub struct CandidateFilter<'a> {
    used: &'a UsedUrls,
    blocklist: &'a HostBlocklist,
    validator: Option<&'a dyn Validator>,
}

impl<'a> CandidateFilter<'a> {
    /// `validator` is `Some` only for stages that require validation.
    pub fn new(
        used: &'a UsedUrls,
        blocklist: &'a HostBlocklist,
        validator: Option<&'a dyn Validator>,
    ) -> Self {
        Self {
            used,
            blocklist,
            validator,
        }
    }

    fn well_formed(url: &str) -> Option<String> {
        let http = ["http://", "https://"].iter().any(|scheme| {
            url.as_bytes()
                .get(..scheme.len())
                .is_some_and(|p| p.eq_ignore_ascii_case(scheme.as_bytes()))
        });
        if !http {
            return None;
        }
        host_of(url)
    }

    /// Run every enabled check against one candidate.
    pub fn check(&self, candidate: &Candidate) -> Result<(), Rejection> {
        let url = candidate.raw_url.as_str();
        let host = Self::well_formed(url).ok_or(Rejection::Malformed)?;
        if self.used.contains(url) {
            return Err(Rejection::Duplicate);
        }
        if self.blocklist.is_blocked_host(&host) {
            return Err(Rejection::Blocked);
        }
        if let Some(v) = self.validator {
            let verdict = v.check(url);
            if !verdict.passes() {
                return Err(Rejection::Invalid(verdict));
            }
        }
        Ok(())
    }

    /// First candidate passing all checks, or `None` once the sequence is exhausted.
    pub fn first_acceptable<I>(&self, candidates: I) -> Option<Accepted>
    where
        I: IntoIterator<Item = Candidate>,
    {
        for candidate in candidates {
            match self.check(&candidate) {
                Ok(()) => {
                    return Some(Accepted {
                        candidate,
                        validated: self.validator.is_some(),
                    })
                }
                Err(why) => {
                    tracing::debug!(url = %candidate.raw_url, ?why, "candidate rejected");
                }
            }
        }
        None
    }
}
