//! Catalog definitions: what to resolve and how.
//!
//! A catalog is an ordered list of flows. Each flow groups categories that
//! share a [`ResolutionProfile`] and an output artifact; each category holds
//! its entities in display order. Everything here is immutable data built
//! once at start-up from TOML (see [`load`]).

mod load;

pub use load::{load_catalog, load_default, parse_catalog};

use serde::{Deserialize, Serialize};

use crate::placeholder::PlaceholderTemplate;
use crate::query::{Aspect, SizeFilter};

/// One named thing that needs an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntity {
    pub name: String,
    pub category_id: String,
    /// Appended to `name` to form the primary query.
    pub query_modifier: String,
    /// Carried through to artifacts; not used for resolution.
    pub base_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub display_name: String,
    pub slug: String,
    pub description: Option<String>,
    pub entities: Vec<CatalogEntity>,
}

/// Per-flow knobs for the fallback chain and the provider query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionProfile {
    /// How many result elements the extractor looks at per query.
    pub look_ahead: usize,
    pub size: SizeFilter,
    pub aspect: Option<Aspect>,
    /// Require reachability validation on the strict (primary) stage.
    pub validate_primary: bool,
    /// Require reachability validation on the loose (secondary) stage.
    pub validate_fallback: bool,
    /// Generic modifier used by the secondary query.
    pub secondary_modifier: String,
    pub placeholder: PlaceholderTemplate,
}

impl Default for ResolutionProfile {
    fn default() -> Self {
        Self {
            look_ahead: 20,
            size: SizeFilter::Large,
            aspect: None,
            validate_primary: true,
            validate_fallback: false,
            secondary_modifier: "luxury".to_string(),
            placeholder: PlaceholderTemplate::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flow {
    pub name: String,
    /// File stem of the artifacts written for this flow.
    pub artifact: String,
    pub profile: ResolutionProfile,
    pub categories: Vec<Category>,
}

impl Flow {
    pub fn entity_count(&self) -> usize {
        self.categories.iter().map(|c| c.entities.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub flows: Vec<Flow>,
}

impl Catalog {
    pub fn entity_count(&self) -> usize {
        self.flows.iter().map(Flow::entity_count).sum()
    }

    pub fn flow(&self, name: &str) -> Option<&Flow> {
        self.flows.iter().find(|f| f.name == name)
    }

    /// Keep only the named flows, preserving catalog order. Unknown names are an error.
    pub fn retain_flows(&mut self, names: &[String]) -> anyhow::Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        for n in names {
            if self.flow(n).is_none() {
                anyhow::bail!("unknown flow: {n}");
            }
        }
        self.flows.retain(|f| names.contains(&f.name));
        Ok(())
    }

    /// Turn off reachability validation on every flow.
    pub fn disable_validation(&mut self) {
        for flow in &mut self.flows {
            flow.profile.validate_primary = false;
            flow.profile.validate_fallback = false;
        }
    }
}
