//! Artifact emitters: one JSON manifest and one TypeScript module per flow,
//! plus the joined category records when both category flows ran.
//!
//! Files are written to `<name>.part` first and renamed into place, so a
//! failed run never leaves a half-written artifact behind.

mod json;
mod records;
mod typescript;

pub use json::render_manifest;
pub use records::{
    join_records, render_records_json, render_records_module, CategoryRecord, RecordJoin,
    CATEGORY_RECORDS,
};
pub use typescript::render_module;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::result::{FlowReport, RunReport};

/// Temporary suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Write both artifacts for every flow in `report`. Returns the paths written.
pub fn write_artifacts(out_dir: &Path, report: &RunReport) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir: {}", out_dir.display()))?;
    let mut written = Vec::with_capacity(report.flows.len() * 2);
    for flow in &report.flows {
        written.extend(write_flow(out_dir, flow)?);
    }
    if let Some(paths) = write_records(out_dir, report, CATEGORY_RECORDS)? {
        written.extend(paths);
    }
    Ok(written)
}

/// Joined records are only written when both source flows are in `report`,
/// so a partial run never replaces a complete file.
fn write_records(out_dir: &Path, report: &RunReport, join: RecordJoin) -> Result<Option<[PathBuf; 2]>> {
    let find = |name: &str| report.flows.iter().find(|f| f.flow == name);
    let (Some(cards), Some(heroes)) = (find(join.image_flow), find(join.hero_flow)) else {
        tracing::debug!(artifact = join.artifact, "source flows not in run; skipping joined records");
        return Ok(None);
    };
    let records = join_records(cards, heroes);
    let json_path = out_dir.join(format!("{}.json", join.artifact));
    let ts_path = out_dir.join(format!("{}.ts", join.artifact));
    write_atomic(&json_path, &render_records_json(&records)?)?;
    write_atomic(&ts_path, &render_records_module(join.artifact, &records)?)?;
    tracing::info!(
        "joined {} and {}: wrote {} ({} records)",
        join.image_flow,
        join.hero_flow,
        ts_path.display(),
        records.len()
    );
    Ok(Some([json_path, ts_path]))
}

fn write_flow(out_dir: &Path, flow: &FlowReport) -> Result<[PathBuf; 2]> {
    let json_path = out_dir.join(format!("{}.json", flow.artifact));
    let ts_path = out_dir.join(format!("{}.ts", flow.artifact));
    write_atomic(&json_path, &render_manifest(flow)?)?;
    write_atomic(&ts_path, &render_module(flow)?)?;
    tracing::info!(
        "flow {}: wrote {} and {}",
        flow.flow,
        json_path.display(),
        ts_path.display()
    );
    Ok([json_path, ts_path])
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(TEMP_SUFFIX);
    let temp = PathBuf::from(temp);
    std::fs::write(&temp, contents)
        .with_context(|| format!("write artifact: {}", temp.display()))?;
    std::fs::rename(&temp, path).with_context(|| {
        format!("rename {} -> {}", temp.display(), path.display())
    })?;
    Ok(())
}
