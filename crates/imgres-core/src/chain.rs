//! Fallback chain for a single entity.
//!
//! StrictValidated (primary query) → LooseUnvalidated (secondary query) →
//! Placeholder. Each search stage yields a [`StageOutcome`]; only `Found`
//! stops the chain, and the placeholder stage cannot fail.

use serde::Serialize;

use crate::catalog::{CatalogEntity, ResolutionProfile};
use crate::extract::candidates;
use crate::filter::{Accepted, CandidateFilter, HostBlocklist};
use crate::query::{build_query, search_url, QueryMode};
use crate::result::ResolutionResult;
use crate::search::SearchSession;
use crate::used::UsedUrls;
use crate::validate::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    StrictValidated,
    LooseUnvalidated,
    Placeholder,
}

impl Stage {
    /// Stages that query the provider, in the order they are tried.
    pub const SEARCH: [Stage; 2] = [Stage::StrictValidated, Stage::LooseUnvalidated];

    fn query_mode(self) -> QueryMode {
        match self {
            Stage::StrictValidated => QueryMode::Primary,
            Stage::LooseUnvalidated | Stage::Placeholder => QueryMode::Secondary,
        }
    }

    fn validates(self, profile: &ResolutionProfile) -> bool {
        match self {
            Stage::StrictValidated => profile.validate_primary,
            Stage::LooseUnvalidated => profile.validate_fallback,
            Stage::Placeholder => false,
        }
    }
}

/// Result of one search stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Found(Accepted),
    /// No acceptable candidate, or the page had no results in time.
    Exhausted,
    /// Any other provider failure; logged and treated like `Exhausted`.
    TransientError(String),
}

/// What the chain produced for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    pub result: ResolutionResult,
    /// The stage that produced `result`.
    pub stage: Stage,
    /// Every stage entered, in order (always ends with `stage`).
    pub attempted: Vec<Stage>,
}

/// Shared, read-only collaborators for running the chain.
pub struct FallbackChain<'a> {
    endpoint: &'a str,
    blocklist: &'a HostBlocklist,
    validator: &'a dyn Validator,
}

impl<'a> FallbackChain<'a> {
    pub fn new(endpoint: &'a str, blocklist: &'a HostBlocklist, validator: &'a dyn Validator) -> Self {
        Self {
            endpoint,
            blocklist,
            validator,
        }
    }

    /// Run one search stage: build the query, load the page, filter.
    pub fn run_stage<S: SearchSession + ?Sized>(
        &self,
        session: &mut S,
        entity: &CatalogEntity,
        profile: &ResolutionProfile,
        used: &UsedUrls,
        stage: Stage,
    ) -> StageOutcome {
        let query = build_query(entity, stage.query_mode(), profile);
        let url = search_url(self.endpoint, &query, profile.size, profile.aspect);
        tracing::debug!(entity = %entity.name, ?stage, %query, "querying provider");

        let page = match session.load(&url) {
            Ok(page) => page,
            Err(e) if e.is_no_results() => {
                tracing::debug!(entity = %entity.name, ?stage, "no results");
                return StageOutcome::Exhausted;
            }
            Err(e) => {
                tracing::warn!(entity = %entity.name, ?stage, error = %e, "provider error");
                return StageOutcome::TransientError(e.to_string());
            }
        };

        let validator = stage.validates(profile).then_some(self.validator);
        let filter = CandidateFilter::new(used, self.blocklist, validator);
        match filter.first_acceptable(candidates(&page, profile.look_ahead)) {
            Some(accepted) => StageOutcome::Found(accepted),
            None => StageOutcome::Exhausted,
        }
    }

    /// Resolve one entity. `after_query` runs after every provider query,
    /// whatever its outcome (the driver paces there).
    pub fn resolve<S: SearchSession + ?Sized>(
        &self,
        session: &mut S,
        entity: &CatalogEntity,
        profile: &ResolutionProfile,
        used: &UsedUrls,
        after_query: &mut dyn FnMut(),
    ) -> ChainOutcome {
        let mut attempted = Vec::with_capacity(3);
        for stage in Stage::SEARCH {
            attempted.push(stage);
            let outcome = self.run_stage(session, entity, profile, used, stage);
            after_query();
            if let StageOutcome::Found(accepted) = outcome {
                return ChainOutcome {
                    result: ResolutionResult::Resolved {
                        url: accepted.candidate.raw_url,
                        validated: accepted.validated,
                    },
                    stage,
                    attempted,
                };
            }
        }

        attempted.push(Stage::Placeholder);
        ChainOutcome {
            result: ResolutionResult::Placeholder {
                synthetic_url: profile.placeholder.url_for(&entity.name),
            },
            stage: Stage::Placeholder,
            attempted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{ResultsPage, SearchError};
    use crate::validate::Reachability;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Answers loads from a script, in order, and records requested URLs.
    struct Scripted {
        replies: VecDeque<Result<String, SearchError>>,
        loaded: Vec<String>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, SearchError>>) -> Self {
            Self {
                replies: replies.into(),
                loaded: Vec::new(),
            }
        }
    }

    impl SearchSession for Scripted {
        fn load(&mut self, url: &str) -> Result<ResultsPage, SearchError> {
            self.loaded.push(url.to_string());
            match self.replies.pop_front() {
                Some(Ok(html)) => Ok(ResultsPage::from_html(url, &html)),
                Some(Err(e)) => Err(e),
                None => Err(SearchError::NoResults(Duration::ZERO)),
            }
        }
    }

    struct OnlyValid(&'static str);

    impl Validator for OnlyValid {
        fn check(&self, url: &str) -> Reachability {
            if url == self.0 {
                Reachability::ReachableImage
            } else {
                Reachability::Unreachable
            }
        }
    }

    fn results_html(urls: &[&str]) -> String {
        let tiles: String = urls
            .iter()
            .map(|u| format!("<a class=\"iusc\" m='{{\"murl\":\"{u}\"}}'></a>"))
            .collect();
        format!("<html><body>{tiles}</body></html>")
    }

    fn bracelet() -> CatalogEntity {
        CatalogEntity {
            name: "Diamond Bracelet".to_string(),
            category_id: "cat-2".to_string(),
            query_modifier: "luxury gold jewelry".to_string(),
            base_price: 1200,
        }
    }

    fn run(session: &mut Scripted, validator: &dyn Validator, used: &UsedUrls) -> (ChainOutcome, u32) {
        run_profile(session, validator, used, &ResolutionProfile::default())
    }

    fn run_profile(
        session: &mut Scripted,
        validator: &dyn Validator,
        used: &UsedUrls,
        profile: &ResolutionProfile,
    ) -> (ChainOutcome, u32) {
        let blocklist = HostBlocklist::social_media();
        let chain = FallbackChain::new("https://search.test/images", &blocklist, validator);
        let mut queries = 0;
        let out = chain.resolve(session, &bracelet(), profile, used, &mut || queries += 1);
        (out, queries)
    }

    #[test]
    fn strict_stage_resolves_validated_candidate() {
        let mut s = Scripted::new(vec![Ok(results_html(&[
            "https://pinterest.com/x.jpg",
            "https://cdn.example.com/y.jpg",
        ]))]);
        let (out, queries) = run(&mut s, &OnlyValid("https://cdn.example.com/y.jpg"), &UsedUrls::new());
        assert_eq!(
            out.result,
            ResolutionResult::Resolved {
                url: "https://cdn.example.com/y.jpg".to_string(),
                validated: true,
            }
        );
        assert_eq!(out.attempted, vec![Stage::StrictValidated]);
        assert_eq!(queries, 1);
        assert!(s.loaded[0].contains("q=Diamond%20Bracelet%20luxury%20gold%20jewelry"));
    }

    #[test]
    fn loose_stage_skips_validation_and_uses_secondary_query() {
        let mut s = Scripted::new(vec![
            Ok(results_html(&["https://cdn.example.com/dead.jpg"])),
            Ok(results_html(&["https://cdn.example.com/alt.jpg"])),
        ]);
        let (out, queries) = run(&mut s, &OnlyValid("none"), &UsedUrls::new());
        assert_eq!(
            out.result,
            ResolutionResult::Resolved {
                url: "https://cdn.example.com/alt.jpg".to_string(),
                validated: false,
            }
        );
        assert_eq!(out.stage, Stage::LooseUnvalidated);
        assert_eq!(queries, 2);
        assert!(s.loaded[1].contains("q=Diamond%20Bracelet%20luxury&"));
    }

    #[test]
    fn validated_fallback_skips_dead_candidates() {
        let profile = ResolutionProfile {
            validate_fallback: true,
            ..ResolutionProfile::default()
        };
        let mut s = Scripted::new(vec![
            Ok(results_html(&["https://cdn.example.com/dead.jpg"])),
            Ok(results_html(&[
                "https://cdn.example.com/also-dead.jpg",
                "https://cdn.example.com/good.jpg",
            ])),
        ]);
        let (out, queries) = run_profile(
            &mut s,
            &OnlyValid("https://cdn.example.com/good.jpg"),
            &UsedUrls::new(),
            &profile,
        );
        assert_eq!(
            out.result,
            ResolutionResult::Resolved {
                url: "https://cdn.example.com/good.jpg".to_string(),
                validated: true,
            }
        );
        assert_eq!(out.stage, Stage::LooseUnvalidated);
        assert_eq!(queries, 2);
    }

    #[test]
    fn validated_fallback_with_only_dead_candidates_ends_in_placeholder() {
        let profile = ResolutionProfile {
            validate_fallback: true,
            ..ResolutionProfile::default()
        };
        let mut s = Scripted::new(vec![
            Ok(results_html(&["https://cdn.example.com/dead.jpg"])),
            Ok(results_html(&["https://cdn.example.com/dead.jpg"])),
        ]);
        let (out, _) = run_profile(&mut s, &OnlyValid("none"), &UsedUrls::new(), &profile);
        assert!(out.result.is_placeholder());
        assert_eq!(
            out.attempted,
            vec![Stage::StrictValidated, Stage::LooseUnvalidated, Stage::Placeholder]
        );
    }

    #[test]
    fn placeholder_only_after_both_search_stages() {
        let mut s = Scripted::new(vec![
            Err(SearchError::NoResults(Duration::from_secs(10))),
            Err(SearchError::Http(503)),
        ]);
        let (out, queries) = run(&mut s, &OnlyValid("none"), &UsedUrls::new());
        assert_eq!(
            out.result,
            ResolutionResult::Placeholder {
                synthetic_url: "https://placehold.co/800x1000/1a1a1a/d4af37?text=Diamond%20Bracelet"
                    .to_string(),
            }
        );
        assert_eq!(
            out.attempted,
            vec![Stage::StrictValidated, Stage::LooseUnvalidated, Stage::Placeholder]
        );
        assert_eq!(queries, 2);
    }

    #[test]
    fn used_urls_push_entity_to_fallback() {
        let mut used = UsedUrls::new();
        used.insert("https://cdn.example.com/y.jpg");
        let mut s = Scripted::new(vec![
            Ok(results_html(&["https://cdn.example.com/y.jpg"])),
            Ok(results_html(&["https://cdn.example.com/y.jpg"])),
        ]);
        let (out, _) = run(&mut s, &OnlyValid("https://cdn.example.com/y.jpg"), &used);
        assert!(out.result.is_placeholder());
    }

    #[test]
    fn transient_error_is_reported_as_stage_outcome() {
        let blocklist = HostBlocklist::social_media();
        let v = OnlyValid("none");
        let chain = FallbackChain::new("https://search.test/images", &blocklist, &v);
        let mut s = Scripted::new(vec![Err(SearchError::Http(500))]);
        let outcome = chain.run_stage(
            &mut s,
            &bracelet(),
            &ResolutionProfile::default(),
            &UsedUrls::new(),
            Stage::StrictValidated,
        );
        assert_eq!(outcome, StageOutcome::TransientError("HTTP 500".to_string()));
    }
}
