//! Resolution results, grouped the way artifacts consume them.

use serde::Serialize;

use crate::catalog::{CatalogEntity, Category, Flow};
use crate::chain::Stage;

/// Final outcome for one entity. Never mutated once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionResult {
    Resolved { url: String, validated: bool },
    Placeholder { synthetic_url: String },
}

impl ResolutionResult {
    pub fn url(&self) -> &str {
        match self {
            ResolutionResult::Resolved { url, .. } => url,
            ResolutionResult::Placeholder { synthetic_url } => synthetic_url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ResolutionResult::Placeholder { .. })
    }
}

/// One entity's result plus the stage that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct EntityResolution {
    pub entity: CatalogEntity,
    pub result: ResolutionResult,
    pub stage: Stage,
}

/// Results for one category, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResultSet {
    pub category_id: String,
    pub slug: String,
    pub display_name: String,
    pub description: Option<String>,
    pub results: Vec<EntityResolution>,
}

impl CategoryResultSet {
    pub fn for_category(category: &Category) -> Self {
        Self {
            category_id: category.id.clone(),
            slug: category.slug.clone(),
            display_name: category.display_name.clone(),
            description: category.description.clone(),
            results: Vec::with_capacity(category.entities.len()),
        }
    }

    pub fn push(&mut self, resolution: EntityResolution) {
        self.results.push(resolution);
    }

    /// Image URLs in entity order (index `i` belongs to entity `i`).
    pub fn urls(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.result.url()).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub flow: String,
    pub artifact: String,
    pub categories: Vec<CategoryResultSet>,
}

impl FlowReport {
    pub fn for_flow(flow: &Flow) -> Self {
        Self {
            flow: flow.name.clone(),
            artifact: flow.artifact.clone(),
            categories: Vec::with_capacity(flow.categories.len()),
        }
    }

    pub fn results(&self) -> impl Iterator<Item = &EntityResolution> {
        self.categories.iter().flat_map(|c| c.results.iter())
    }
}

/// Counts over a run, for the closing log line and the CLI summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub entities: usize,
    pub resolved: usize,
    pub validated: usize,
    pub from_fallback: usize,
    pub placeholders: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub flows: Vec<FlowReport>,
}

impl RunReport {
    pub fn results(&self) -> impl Iterator<Item = &EntityResolution> {
        self.flows.iter().flat_map(FlowReport::results)
    }

    pub fn summary(&self) -> RunSummary {
        let mut s = RunSummary::default();
        for r in self.results() {
            s.entities += 1;
            match &r.result {
                ResolutionResult::Resolved { validated, .. } => {
                    s.resolved += 1;
                    if *validated {
                        s.validated += 1;
                    }
                    if r.stage == Stage::LooseUnvalidated {
                        s.from_fallback += 1;
                    }
                }
                ResolutionResult::Placeholder { .. } => s.placeholders += 1,
            }
        }
        s
    }
}
