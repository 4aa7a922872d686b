use anyhow::{Context, Result};
use serde::Serialize;

use crate::chain::Stage;
use crate::result::{CategoryResultSet, EntityResolution, FlowReport, ResolutionResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    flow: &'a str,
    artifact: &'a str,
    categories: Vec<CategoryEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryEntry<'a> {
    id: &'a str,
    name: &'a str,
    slug: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    items: Vec<ItemEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemEntry<'a> {
    name: &'a str,
    base_price: i64,
    image: &'a str,
    placeholder: bool,
    validated: bool,
    stage: Stage,
}

impl<'a> From<&'a EntityResolution> for ItemEntry<'a> {
    fn from(r: &'a EntityResolution) -> Self {
        Self {
            name: &r.entity.name,
            base_price: r.entity.base_price,
            image: r.result.url(),
            placeholder: r.result.is_placeholder(),
            validated: matches!(r.result, ResolutionResult::Resolved { validated: true, .. }),
            stage: r.stage,
        }
    }
}

impl<'a> From<&'a CategoryResultSet> for CategoryEntry<'a> {
    fn from(c: &'a CategoryResultSet) -> Self {
        Self {
            id: &c.category_id,
            name: &c.display_name,
            slug: &c.slug,
            description: c.description.as_deref(),
            items: c.results.iter().map(ItemEntry::from).collect(),
        }
    }
}

/// Pretty-printed JSON manifest for one flow.
pub fn render_manifest(flow: &FlowReport) -> Result<String> {
    let manifest = Manifest {
        flow: &flow.flow,
        artifact: &flow.artifact,
        categories: flow.categories.iter().map(CategoryEntry::from).collect(),
    };
    let mut text = serde_json::to_string_pretty(&manifest)
        .with_context(|| format!("serialize manifest for flow {}", flow.flow))?;
    text.push('\n');
    Ok(text)
}
