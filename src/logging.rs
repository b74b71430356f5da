use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use todoist_tui::config::Config;

const DEFAULT_FILTER: &str = "todoist_tui=debug,warn";

/// Rotation threshold and how many trailing lines survive it.
const MAX_LOG_LINES: usize = 1000;
const KEPT_LOG_LINES: usize = 750;

pub fn rotate_log(config: &Config) {
    let path = config.log_path();
    if let Some(tail) = read_tail(&path) {
        if let Err(e) = std::fs::write(&path, tail) {
            eprintln!("todoist-tui: could not rotate {}: {}", path.display(), e);
        }
    }
}

/// Trailing lines of an oversized log, or `None` if it can stay as is.
fn read_tail(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= MAX_LOG_LINES {
        return None;
    }
    let mut tail = lines[lines.len() - KEPT_LOG_LINES..].join("\n");
    tail.push('\n');
    Some(tail)
}

/// Route `tracing` output to the log file. The terminal is owned by the
/// interface, so nothing goes to stderr. `RUST_LOG` overrides the filter.
pub fn setup_logging(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.base_dir)
        .with_context(|| format!("Failed to create {}", config.base_dir.display()))?;

    let path = config.log_path();
    let writer = append_to(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!(path = %path.display(), version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(())
}

fn append_to(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
