//! Saving rendered reports to disk.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use color_eyre::eyre::{Context, Result};

/// Directory reports are saved to when no output path is given.
pub const DEFAULT_DIR: &str = ".act-lens";

/// Save a report as `failure_<YYYYmmdd_HHMMSS>.md` inside `dir`.
///
/// The directory is created if needed. If a report was already saved in the
/// same second, a numeric suffix (`_1`, `_2`, ...) keeps the earlier report
/// from being overwritten.
#[tracing::instrument(skip(content))]
pub fn save_report(content: &str, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create report directory: {dir:?}"))?;

    let stem = format!("failure_{}", Local::now().format("%Y%m%d_%H%M%S"));
    let mut attempt = 0usize;
    loop {
        let name = match attempt {
            0 => format!("{stem}.md"),
            n => format!("{stem}_{n}.md"),
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(content.as_bytes())
                    .with_context(|| format!("write report: {path:?}"))?;
                tracing::debug!(?path, "saved report");
                return Ok(path);
            }
            Err(error) if error.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(error) => return Err(error).with_context(|| format!("create report: {path:?}")),
        }
    }
}

/// Write a report to an explicit path, creating parent directories as needed.
#[tracing::instrument(skip(content))]
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create directory: {parent:?}"))?;
    }
    fs::write(path, content).with_context(|| format!("write report: {path:?}"))
}
