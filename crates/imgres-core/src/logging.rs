//! Tracing setup for the CLI.
//!
//! Events go to `$XDG_STATE_HOME/imgres/imgres.log`; when that file cannot be
//! opened the caller switches to [`init_logging_stderr`].

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset or does not parse.
const DEFAULT_DIRECTIVES: &str = "info,imgres=debug,imgres_core=debug";

const LOG_FILE_NAME: &str = "imgres.log";

/// Log file location below a state home directory.
pub fn log_file_in(state_home: &Path) -> PathBuf {
    state_home.join("imgres").join(LOG_FILE_NAME)
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating log dir {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

fn install(writer: BoxMakeWriter) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

/// Log to the state-dir file. Errors leave no subscriber installed.
pub fn init_logging() -> Result<()> {
    let state_home = xdg::BaseDirectories::new()?.get_state_home();
    let path = log_file_in(&state_home);
    let file = open_append(&path)?;

    // Mutex<File> is a MakeWriter; each event holds the lock for one write.
    install(BoxMakeWriter::new(Mutex::new(file)));
    tracing::info!(log_file = %path.display(), "imgres logging initialized");
    Ok(())
}

pub fn init_logging_stderr() {
    install(BoxMakeWriter::new(std::io::stderr));
}
