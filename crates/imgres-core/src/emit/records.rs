//! Joined category records: one entry per category slug holding the card image
//! from one flow and the hero banner from another.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;

use super::typescript::literal;
use crate::result::FlowReport;

/// Which flows feed a joined record artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordJoin {
    pub artifact: &'static str,
    pub image_flow: &'static str,
    pub hero_flow: &'static str,
}

/// `mockCategories`: category cards joined with category heroes.
pub const CATEGORY_RECORDS: RecordJoin = RecordJoin {
    artifact: "mockCategories",
    image_flow: "category-cards",
    hero_flow: "category-heroes",
};

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord<'a> {
    #[serde(rename = "_id")]
    pub id: &'a str,
    pub name: &'a str,
    pub slug: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub image: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<&'a str>,
}

/// One record per category of `cards`, in its order. The hero image is the
/// first result of the `heroes` category with the same slug, if any.
pub fn join_records<'a>(cards: &'a FlowReport, heroes: &'a FlowReport) -> Vec<CategoryRecord<'a>> {
    cards
        .categories
        .iter()
        .filter_map(|card| {
            let image = card.results.first()?.result.url();
            let hero_image = heroes
                .categories
                .iter()
                .find(|h| h.slug == card.slug)
                .and_then(|h| h.results.first())
                .map(|r| r.result.url());
            Some(CategoryRecord {
                id: &card.category_id,
                name: &card.display_name,
                slug: &card.slug,
                description: card.description.as_deref(),
                image,
                hero_image,
            })
        })
        .collect()
}

pub fn render_records_json(records: &[CategoryRecord<'_>]) -> Result<String> {
    let mut text = serde_json::to_string_pretty(records).context("serialize category records")?;
    text.push('\n');
    Ok(text)
}

pub fn render_records_module(artifact: &str, records: &[CategoryRecord<'_>]) -> Result<String> {
    let mut ts = String::from("// Generated by imgres. Do not edit.\n\n");
    ts.push_str(
        "export interface Category {
    _id: string;
    name: string;
    slug: string;
    description?: string;
    image: string;
    heroImage?: string;
}
",
    );

    let _ = writeln!(ts, "\nexport const {artifact}: Category[] = [");
    for rec in records {
        ts.push_str("    {\n");
        let _ = writeln!(ts, "        _id: {},", literal(rec.id)?);
        let _ = writeln!(ts, "        name: {},", literal(rec.name)?);
        let _ = writeln!(ts, "        slug: {},", literal(rec.slug)?);
        if let Some(desc) = rec.description {
            let _ = writeln!(ts, "        description: {},", literal(desc)?);
        }
        let _ = writeln!(ts, "        image: {},", literal(rec.image)?);
        if let Some(hero) = rec.hero_image {
            let _ = writeln!(ts, "        heroImage: {},", literal(hero)?);
        }
        ts.push_str("    },\n");
    }
    ts.push_str("];\n");
    let _ = writeln!(ts, "\nexport default {artifact};");
    Ok(ts)
}
