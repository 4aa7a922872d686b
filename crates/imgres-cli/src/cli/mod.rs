//! CLI for the imgres catalog image resolver.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use imgres_core::catalog::{self, Catalog};
use imgres_core::config::{self, ImgresConfig};
use std::path::PathBuf;

use commands::{run_catalog, run_queries, run_resolution};

/// Top-level CLI. With no subcommand, performs one full run.
#[derive(Debug, Parser)]
#[command(name = "imgres")]
#[command(
    about = "imgres: resolve a unique image URL for every catalog entity",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Catalog selection shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    /// Catalog TOML file (default: config `catalog_path`, else the built-in catalog).
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Only process the named flow (repeatable).
    #[arg(long = "flow", value_name = "NAME")]
    pub flows: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve images for the catalog and write artifacts (the default).
    Run {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output directory for artifacts (default: config `output_dir`).
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Skip reachability checks on every stage.
        #[arg(long)]
        no_validate: bool,
    },

    /// List flows, categories and entity counts.
    Catalog {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Print the queries and placeholders each entity would use (no network).
    Queries {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Also print the full search URL for the primary query.
        #[arg(long)]
        urls: bool,
    },
}

impl Default for CliCommand {
    fn default() -> Self {
        CliCommand::Run {
            catalog: CatalogArgs::default(),
            out_dir: None,
            no_validate: false,
        }
    }
}

fn load_catalog(cfg: &ImgresConfig, args: &CatalogArgs) -> Result<Catalog> {
    let path = args.catalog.as_deref().or(cfg.catalog_path.as_deref());
    let mut catalog = catalog::load_catalog(path)?;
    catalog.retain_flows(&args.flows)?;
    Ok(catalog)
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command.unwrap_or_default() {
            CliCommand::Run {
                catalog,
                out_dir,
                no_validate,
            } => {
                let mut catalog = load_catalog(&cfg, &catalog)?;
                if no_validate {
                    catalog.disable_validation();
                }
                let out_dir = out_dir.unwrap_or_else(|| cfg.output_dir.clone());
                run_resolution(&cfg, &catalog, &out_dir)?;
            }
            CliCommand::Catalog { catalog } => run_catalog(&load_catalog(&cfg, &catalog)?)?,
            CliCommand::Queries { catalog, urls } => {
                run_queries(&load_catalog(&cfg, &catalog)?, &cfg.search_endpoint, urls)?;
            }
        }

        Ok(())
    }
}
