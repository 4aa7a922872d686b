//! Catalog TOML schema and conversion into [`Catalog`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use super::{Catalog, CatalogEntity, Category, Flow, ResolutionProfile};
use crate::placeholder::PlaceholderTemplate;
use crate::query::{Aspect, SizeFilter};

const DEFAULT_CATALOG: &str = include_str!("default.toml");

/// Upper bound for `look_ahead`; the provider's first screen holds about 20 tiles.
const LOOK_AHEAD_MAX: usize = 20;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    flows: Vec<FlowDef>,
}

#[derive(Debug, Deserialize)]
struct FlowDef {
    name: String,
    artifact: Option<String>,
    #[serde(default = "default_look_ahead")]
    look_ahead: usize,
    #[serde(default)]
    size: SizeFilter,
    #[serde(default)]
    aspect: Option<Aspect>,
    #[serde(default = "default_true")]
    validate_primary: bool,
    #[serde(default)]
    validate_fallback: bool,
    #[serde(default = "default_secondary_modifier")]
    secondary_modifier: String,
    #[serde(default)]
    placeholder: Option<PlaceholderTemplate>,
    categories: Vec<CategoryDef>,
}

#[derive(Debug, Deserialize)]
struct CategoryDef {
    id: String,
    slug: String,
    display_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    query_modifier: String,
    #[serde(default)]
    base_price: i64,
    #[serde(default)]
    price_step: i64,
    entities: Vec<String>,
}

fn default_look_ahead() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_secondary_modifier() -> String {
    "luxury".to_string()
}

impl CategoryDef {
    fn into_category(self) -> Category {
        let entities = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, name)| CatalogEntity {
                name: name.trim().to_string(),
                category_id: self.id.clone(),
                query_modifier: self.query_modifier.clone(),
                base_price: self.base_price + self.price_step * i as i64,
            })
            .collect();
        Category {
            id: self.id,
            display_name: self.display_name,
            slug: self.slug,
            description: self.description,
            entities,
        }
    }
}

impl FlowDef {
    fn into_flow(self) -> Flow {
        let profile = ResolutionProfile {
            look_ahead: self.look_ahead,
            size: self.size,
            aspect: self.aspect,
            validate_primary: self.validate_primary,
            validate_fallback: self.validate_fallback,
            secondary_modifier: self.secondary_modifier,
            placeholder: self.placeholder.unwrap_or_default(),
        };
        Flow {
            artifact: self.artifact.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            profile,
            categories: self
                .categories
                .into_iter()
                .map(CategoryDef::into_category)
                .collect(),
        }
    }
}

/// Parse and validate a catalog from TOML text.
pub fn parse_catalog(text: &str) -> Result<Catalog> {
    let file: CatalogFile = toml::from_str(text).context("parse catalog TOML")?;
    let catalog = Catalog {
        flows: file.flows.into_iter().map(FlowDef::into_flow).collect(),
    };
    validate(&catalog)?;
    Ok(catalog)
}

/// The catalog compiled into the binary.
pub fn load_default() -> Result<Catalog> {
    parse_catalog(DEFAULT_CATALOG)
}

/// Load the catalog at `path`, or the embedded default when `path` is `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("read catalog: {}", p.display()))?;
            parse_catalog(&text).with_context(|| format!("catalog {}", p.display()))
        }
        None => load_default(),
    }
}

fn validate(catalog: &Catalog) -> Result<()> {
    if catalog.flows.is_empty() {
        anyhow::bail!("catalog has no flows");
    }
    let mut flow_names = HashSet::new();
    let mut artifacts = HashSet::new();
    let mut category_ids = HashSet::new();
    for flow in &catalog.flows {
        if !flow_names.insert(flow.name.as_str()) {
            anyhow::bail!("duplicate flow name: {}", flow.name);
        }
        if !artifacts.insert(flow.artifact.as_str()) {
            anyhow::bail!("duplicate artifact name: {}", flow.artifact);
        }
        if flow.profile.look_ahead == 0 || flow.profile.look_ahead > LOOK_AHEAD_MAX {
            anyhow::bail!(
                "flow {}: look_ahead must be in 1..={}, got {}",
                flow.name,
                LOOK_AHEAD_MAX,
                flow.profile.look_ahead
            );
        }
        for cat in &flow.categories {
            if !category_ids.insert(cat.id.as_str()) {
                anyhow::bail!("duplicate category id: {}", cat.id);
            }
            if let Some(empty) = cat.entities.iter().position(|e| e.name.is_empty()) {
                anyhow::bail!("category {}: entity #{} has an empty name", cat.id, empty + 1);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_parses_with_expected_shape() {
        let c = load_default().unwrap();
        let names: Vec<&str> = c.flows.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["womens", "mens", "category-cards", "category-heroes", "story"]
        );
        assert_eq!(c.flow("womens").unwrap().entity_count(), 125);
        assert_eq!(c.flow("mens").unwrap().entity_count(), 100);
        assert_eq!(c.entity_count(), 125 + 100 + 5 + 5 + 1);
    }

    #[test]
    fn default_catalog_jewelry_entity() {
        let c = load_default().unwrap();
        let jewelry = &c.flow("womens").unwrap().categories[1];
        assert_eq!(jewelry.slug, "jewelry");
        let first = &jewelry.entities[0];
        assert_eq!(first.name, "Diamond Bracelet");
        assert_eq!(first.category_id, "cat-2");
        assert_eq!(first.query_modifier, "luxury gold jewelry");
        assert_eq!(first.base_price, 1200);
        assert_eq!(jewelry.entities[2].base_price, 1200 + 2 * 150);
    }

    #[test]
    fn flow_defaults_apply() {
        let c = parse_catalog(
            r#"
            [[flows]]
            name = "mini"
            [[flows.categories]]
            id = "c1"
            slug = "ties"
            display_name = "Ties"
            entities = ["Silk Tie"]
            "#,
        )
        .unwrap();
        let flow = &c.flows[0];
        assert_eq!(flow.artifact, "mini");
        assert_eq!(flow.profile, ResolutionProfile::default());
        assert_eq!(flow.categories[0].entities[0].query_modifier, "");
    }

    #[test]
    fn rejects_duplicate_category_ids() {
        let err = parse_catalog(
            r#"
            [[flows]]
            name = "a"
            [[flows.categories]]
            id = "c1"
            slug = "x"
            display_name = "X"
            entities = ["One"]
            [[flows]]
            name = "b"
            [[flows.categories]]
            id = "c1"
            slug = "y"
            display_name = "Y"
            entities = ["Two"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate category id"));
    }

    #[test]
    fn rejects_bad_look_ahead_and_empty_names() {
        let zero = r#"
            [[flows]]
            name = "a"
            look_ahead = 0
            [[flows.categories]]
            id = "c1"
            slug = "x"
            display_name = "X"
            entities = ["One"]
        "#;
        assert!(parse_catalog(zero).is_err());

        let flow_with = |n: usize| {
            format!(
                r#"
            [[flows]]
            name = "a"
            look_ahead = {n}
            [[flows.categories]]
            id = "c1"
            slug = "x"
            display_name = "X"
            entities = ["One"]
        "#
            )
        };
        assert_eq!(parse_catalog(&flow_with(20)).unwrap().flows[0].profile.look_ahead, 20);
        let err = parse_catalog(&flow_with(21)).unwrap_err();
        assert!(err.to_string().contains("look_ahead must be in 1..=20"));

        let blank = r#"
            [[flows]]
            name = "a"
            [[flows.categories]]
            id = "c1"
            slug = "x"
            display_name = "X"
            entities = ["One", "  "]
        "#;
        let err = parse_catalog(blank).unwrap_err();
        assert!(err.to_string().contains("entity #2"));
    }

    #[test]
    fn retain_flows_filters_and_rejects_unknown() {
        let mut c = load_default().unwrap();
        c.retain_flows(&["story".to_string()]).unwrap();
        assert_eq!(c.flows.len(), 1);
        let mut c = load_default().unwrap();
        assert!(c.retain_flows(&["nope".to_string()]).is_err());
    }
}
