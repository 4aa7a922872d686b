//! `imgres queries` – dry run: show what would be searched, without network.

use anyhow::Result;
use imgres_core::catalog::Catalog;
use imgres_core::query::{build_query, search_url, QueryMode};

pub fn run_queries(catalog: &Catalog, endpoint: &str, show_urls: bool) -> Result<()> {
    for flow in &catalog.flows {
        let profile = &flow.profile;
        println!("# {} -> {}", flow.name, flow.artifact);
        for cat in &flow.categories {
            println!("## {} ({})", cat.display_name, cat.id);
            for entity in &cat.entities {
                let primary = build_query(entity, QueryMode::Primary, profile);
                let secondary = build_query(entity, QueryMode::Secondary, profile);
                println!("{}", entity.name);
                println!("    primary:     {primary}");
                println!("    fallback:    {secondary}");
                println!("    placeholder: {}", profile.placeholder.url_for(&entity.name));
                if show_urls {
                    println!(
                        "    url:         {}",
                        search_url(endpoint, &primary, profile.size, profile.aspect)
                    );
                }
            }
        }
    }
    Ok(())
}
