//! Run driver: walks the catalog in order and resolves every entity.
//!
//! One search session is opened per run and closed by [`SessionGuard`] on
//! every exit path. The used-URL set lives only for the duration of
//! [`ResolutionDriver::run_with`]; results are recorded into it as they are
//! produced, so entities processed later cannot reuse an earlier URL.

use anyhow::{Context, Result};

use crate::catalog::{Catalog, CatalogEntity};
use crate::chain::FallbackChain;
use crate::config::ImgresConfig;
use crate::filter::HostBlocklist;
use crate::pacing::{Pacer, Sleeper, ThreadSleeper};
use crate::result::{CategoryResultSet, EntityResolution, FlowReport, ResolutionResult, RunReport};
use crate::search::{SearchError, SearchSession, SessionGuard};
use crate::used::UsedUrls;
use crate::validate::{CurlValidator, Validator};

/// Per-entity progress passed to the run observer.
#[derive(Debug)]
pub struct Progress<'a> {
    pub flow: &'a str,
    pub category_id: &'a str,
    /// 1-based position of this entity within the whole run.
    pub position: usize,
    pub total: usize,
    pub resolution: &'a EntityResolution,
}

pub struct ResolutionDriver<V: Validator, P: Sleeper = ThreadSleeper> {
    endpoint: String,
    blocklist: HostBlocklist,
    validator: V,
    pacer: Pacer<P>,
}

impl ResolutionDriver<CurlValidator> {
    /// Driver wired to the real validator and thread-sleeping pacer.
    pub fn from_config(cfg: &ImgresConfig) -> Self {
        let blocklist =
            HostBlocklist::social_media().with_extra(cfg.extra_blocked_hosts.iter().cloned());
        let validator =
            CurlValidator::new(cfg.validate_timeout()).with_user_agent(cfg.user_agent.clone());
        let pacer = Pacer::new(cfg.query_delay_secs, cfg.category_delay_secs);
        Self::new(cfg.search_endpoint.clone(), blocklist, validator, pacer)
    }
}

impl<V: Validator, P: Sleeper> ResolutionDriver<V, P> {
    pub fn new(
        endpoint: impl Into<String>,
        blocklist: HostBlocklist,
        validator: V,
        pacer: Pacer<P>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            blocklist,
            validator,
            pacer,
        }
    }

    pub fn pacer(&self) -> &Pacer<P> {
        &self.pacer
    }

    /// Resolve the whole catalog. See [`Self::run_with`].
    pub fn run<S, F>(&mut self, catalog: &Catalog, open_session: F) -> Result<RunReport>
    where
        S: SearchSession,
        F: FnOnce() -> Result<S, SearchError>,
    {
        self.run_with(catalog, open_session, |_| {})
    }

    /// Resolve the whole catalog, calling `observe` after each entity.
    ///
    /// Failing to open the session is the only error; once the run starts
    /// every entity ends with a result (a placeholder at worst).
    pub fn run_with<S, F, O>(
        &mut self,
        catalog: &Catalog,
        open_session: F,
        mut observe: O,
    ) -> Result<RunReport>
    where
        S: SearchSession,
        F: FnOnce() -> Result<S, SearchError>,
        O: FnMut(&Progress<'_>),
    {
        let total = catalog.entity_count();
        tracing::info!(
            "resolution run: {} flow(s), {} entit(ies)",
            catalog.flows.len(),
            total
        );

        let session = open_session().context("open search session")?;
        let mut session = SessionGuard::new(session);

        let Self {
            endpoint,
            blocklist,
            validator,
            pacer,
        } = self;
        let chain = FallbackChain::new(endpoint.as_str(), &*blocklist, &*validator);
        let mut used = UsedUrls::new();
        let mut report = RunReport::default();
        let mut position = 0;
        let mut first_category = true;

        for flow in &catalog.flows {
            tracing::info!("flow {} ({} entities)", flow.name, flow.entity_count());
            let mut flow_report = FlowReport::for_flow(flow);

            for category in &flow.categories {
                if !first_category {
                    pacer.between_categories();
                }
                first_category = false;
                tracing::info!(
                    "category {} ({}): {} entities",
                    category.id,
                    category.display_name,
                    category.entities.len()
                );

                let mut set = CategoryResultSet::for_category(category);
                for entity in &category.entities {
                    let outcome = chain.resolve(
                        &mut *session,
                        entity,
                        &flow.profile,
                        &used,
                        &mut || {
                            pacer.after_query();
                        },
                    );
                    record_used(&mut used, entity, &outcome.result);
                    tracing::debug!(
                        entity = %entity.name,
                        stage = ?outcome.stage,
                        attempted = outcome.attempted.len(),
                        url = outcome.result.url(),
                        "entity resolved"
                    );

                    set.push(EntityResolution {
                        entity: entity.clone(),
                        result: outcome.result,
                        stage: outcome.stage,
                    });
                    position += 1;
                    if let Some(resolution) = set.results.last() {
                        observe(&Progress {
                            flow: &flow.name,
                            category_id: &category.id,
                            position,
                            total,
                            resolution,
                        });
                    }
                }
                flow_report.categories.push(set);
            }
            report.flows.push(flow_report);
        }

        let s = report.summary();
        tracing::info!(
            "run finished: {} resolved ({} validated, {} via fallback), {} placeholder(s), {} unique URL(s)",
            s.resolved,
            s.validated,
            s.from_fallback,
            s.placeholders,
            used.len()
        );
        Ok(report)
    }
}

/// Record a resolved URL so no later entity can take it. Placeholders are
/// synthetic and never recorded.
fn record_used(used: &mut UsedUrls, entity: &CatalogEntity, result: &ResolutionResult) {
    if let ResolutionResult::Resolved { url, .. } = result {
        if !used.insert(url) {
            tracing::warn!("{}: URL already recorded: {}", entity.name, url);
        }
    }
}
