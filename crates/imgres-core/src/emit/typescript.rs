use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fmt::Write as _;

use crate::result::FlowReport;

const PREAMBLE: &str = "\
export interface CategoryImages {
    _id: string;
    name: string;
    slug: string;
    description?: string;
    names: string[];
    basePrices: number[];
    images: string[];
}
";

/// JS string literal (JSON strings are valid TypeScript literals).
pub(super) fn literal(s: &str) -> Result<String> {
    serde_json::to_string(s).context("encode string literal")
}

/// camelCase identifier from a slug such as `mens-watches`.
fn ident(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut upper = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if out.is_empty() && ch.is_ascii_digit() {
                out.push('_');
            }
            if upper && !out.is_empty() {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
            upper = false;
        } else {
            upper = true;
        }
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// TypeScript module for one flow: an image array per category (index `i`
/// belongs to entity `i`) and an exported category record list named after
/// the artifact.
pub fn render_module(flow: &FlowReport) -> Result<String> {
    let mut ts = String::new();
    let _ = writeln!(
        ts,
        "// Generated by imgres from flow {}. Do not edit.\n",
        literal(&flow.flow)?
    );
    ts.push_str(PREAMBLE);

    let mut taken = HashSet::new();
    let mut vars = Vec::with_capacity(flow.categories.len());
    for cat in &flow.categories {
        let base = format!("{}Images", ident(&cat.slug));
        let mut var = base.clone();
        let mut n = 2;
        while !taken.insert(var.clone()) {
            var = format!("{base}{n}");
            n += 1;
        }

        let _ = writeln!(ts, "\n// {}", cat.display_name);
        let _ = writeln!(ts, "const {var} = [");
        for url in cat.urls() {
            let _ = writeln!(ts, "    {},", literal(url)?);
        }
        ts.push_str("];\n");
        vars.push(var);
    }

    let export = ident(&flow.artifact);
    let _ = writeln!(ts, "\nexport const {export}: CategoryImages[] = [");
    for (cat, var) in flow.categories.iter().zip(&vars) {
        ts.push_str("    {\n");
        let _ = writeln!(ts, "        _id: {},", literal(&cat.category_id)?);
        let _ = writeln!(ts, "        name: {},", literal(&cat.display_name)?);
        let _ = writeln!(ts, "        slug: {},", literal(&cat.slug)?);
        if let Some(desc) = &cat.description {
            let _ = writeln!(ts, "        description: {},", literal(desc)?);
        }
        let names = cat
            .results
            .iter()
            .map(|r| literal(&r.entity.name))
            .collect::<Result<Vec<_>>>()?;
        let _ = writeln!(ts, "        names: [{}],", names.join(", "));
        let prices: Vec<String> = cat
            .results
            .iter()
            .map(|r| r.entity.base_price.to_string())
            .collect();
        let _ = writeln!(ts, "        basePrices: [{}],", prices.join(", "));
        let _ = writeln!(ts, "        images: {var},");
        ts.push_str("    },\n");
    }
    ts.push_str("];\n");
    let _ = writeln!(ts, "\nexport default {export};");
    Ok(ts)
}
