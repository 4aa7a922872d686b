//! `imgres run` (and bare `imgres`) – resolve the catalog and write artifacts.

use anyhow::Result;
use std::path::Path;

use imgres_core::catalog::Catalog;
use imgres_core::chain::Stage;
use imgres_core::config::ImgresConfig;
use imgres_core::driver::{Progress, ResolutionDriver};
use imgres_core::emit;
use imgres_core::search::{CurlSearchSession, SessionOptions};

const URL_PREVIEW: usize = 60;

fn preview(url: &str) -> String {
    if url.chars().count() <= URL_PREVIEW {
        return url.to_string();
    }
    let head: String = url.chars().take(URL_PREVIEW).collect();
    format!("{head}...")
}

fn print_progress(p: &Progress<'_>) {
    let r = p.resolution;
    let tag = match r.stage {
        Stage::StrictValidated => "found",
        Stage::LooseUnvalidated => "fallback",
        Stage::Placeholder => "placeholder",
    };
    println!(
        "[{}/{}] {} {:<40} {:<11} {}",
        p.position,
        p.total,
        p.category_id,
        r.entity.name,
        tag,
        preview(r.result.url())
    );
}

pub fn run_resolution(cfg: &ImgresConfig, catalog: &Catalog, out_dir: &Path) -> Result<()> {
    println!(
        "Resolving {} entities across {} flow(s)",
        catalog.entity_count(),
        catalog.flows.len()
    );

    let mut driver = ResolutionDriver::from_config(cfg);
    let opts = SessionOptions::from_config(cfg);
    let report = driver.run_with(catalog, || CurlSearchSession::open(opts), print_progress)?;

    let written = emit::write_artifacts(out_dir, &report)?;
    for path in &written {
        println!("wrote {}", path.display());
    }

    let s = report.summary();
    println!(
        "done: {} entities, {} resolved ({} validated, {} via fallback), {} placeholder(s)",
        s.entities, s.resolved, s.validated, s.from_fallback, s.placeholders
    );
    Ok(())
}
