//! Log setup: `tracing` events go to a file under the XDG state dir, or to
//! stderr when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,sfwsdl=debug,sfwsdl_core=debug";

/// Where log output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Install the global subscriber. Never fails: if the log file is unusable
/// the subscriber writes to stderr, and the reason is logged there.
pub fn init() -> LogTarget {
    match open_log_file() {
        Ok((file, path)) => {
            install(LogFile(Arc::new(file)));
            tracing::info!("sfwsdl logging initialized at {}", path.display());
            LogTarget::File(path)
        }
        Err(err) => {
            install(io::stderr);
            tracing::warn!("log file unavailable, logging to stderr: {:#}", err);
            LogTarget::Stderr
        }
    }
}

/// `~/.local/state/sfwsdl/sfwsdl.log`
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sfwsdl")?;
    Ok(xdg_dirs.get_state_home().join("sfwsdl").join("sfwsdl.log"))
}

fn open_log_file() -> Result<(File, PathBuf)> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    Ok((file, path))
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn install<W>(writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    // A subscriber may already be set (tests, embedding); keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
}

/// Appending log file shared by every event; `&File` implements `Write`,
/// so no clone of the handle is needed per event.
struct LogFile(Arc<File>);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = &'a File;

    fn make_writer(&'a self) -> Self::Writer {
        &self.0
    }
}
