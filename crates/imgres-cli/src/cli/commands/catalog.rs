//! `imgres catalog` – list flows, categories and entity counts.

use anyhow::Result;
use imgres_core::catalog::Catalog;

pub fn run_catalog(catalog: &Catalog) -> Result<()> {
    println!(
        "{:<18} {:<18} {:<6} {:<8} {}",
        "FLOW", "ARTIFACT", "CATS", "ENTITIES", "VALIDATE"
    );
    for flow in &catalog.flows {
        let validate = match (flow.profile.validate_primary, flow.profile.validate_fallback) {
            (true, true) => "both",
            (true, false) => "primary",
            (false, true) => "fallback",
            (false, false) => "off",
        };
        println!(
            "{:<18} {:<18} {:<6} {:<8} {}",
            flow.name,
            flow.artifact,
            flow.categories.len(),
            flow.entity_count(),
            validate
        );
        for cat in &flow.categories {
            println!("    {:<12} {:<20} {}", cat.id, cat.slug, cat.entities.len());
        }
    }
    println!("total entities: {}", catalog.entity_count());
    Ok(())
}
