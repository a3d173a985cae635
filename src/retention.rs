//! Local retention sweep
//!
//! Deletes screenshots whose embedded timestamp is older than the retention
//! window. Only the local directory is touched.

use chrono::NaiveDateTime;
use log::{error, info, warn};
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capture::{is_screenshot_name, parse_screenshot_name};

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Whether a file captured at `captured` has outlived `retention` at `now`
pub fn is_expired(captured: NaiveDateTime, now: NaiveDateTime, retention: Duration) -> bool {
    match chrono::Duration::from_std(retention) {
        Ok(retention) => now - captured > retention,
        Err(_) => false,
    }
}

/// Delete every `screen_*.png` in `dir` older than `retention`.
///
/// Per-file failures are logged and skipped; they never end the sweep.
pub fn cleanup(dir: &Path, now: NaiveDateTime, retention: Duration) -> CleanupReport {
    match fs::read_dir(dir) {
        Ok(entries) => sweep(dir, entries, now, retention),
        Err(e) => {
            error!("Error during cleanup of {}: {}", dir.display(), e);
            CleanupReport::default()
        }
    }
}

fn sweep<I>(dir: &Path, entries: I, now: NaiveDateTime, retention: Duration) -> CleanupReport
where
    I: IntoIterator<Item = io::Result<DirEntry>>,
{
    let mut report = CleanupReport::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Could not read entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_screenshot_name(&name) {
            continue;
        }

        let captured = match parse_screenshot_name(&name) {
            Ok(captured) => captured,
            Err(e) => {
                warn!("Could not parse timestamp for {}: {}", name, e);
                report.skipped.push(path);
                continue;
            }
        };

        if !is_expired(captured, now, retention) {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted old screenshot: {}", name);
                report.deleted.push(path);
            }
            Err(e) => {
                warn!("Could not delete {}: {}", name, e);
                report.skipped.push(path);
            }
        }
    }

    report
}
