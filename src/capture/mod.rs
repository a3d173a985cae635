//! Capture module for periodic screenshots
//!
//! Screenshots are written to disk as `screen_YYYYMMDD_HHMMSS.png`, where the
//! embedded timestamp is local time at capture. The same naming scheme is
//! parsed back by the retention sweep.

pub mod screen;

pub use screen::{PrimaryMonitor, ScreenSource};

use chrono::NaiveDateTime;
use image::ImageFormat;
use log::info;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "screen_";
const FILE_EXTENSION: &str = ".png";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no monitors available")]
    NoMonitor,
    #[error("failed to capture screen: {0}")]
    Os(String),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A screenshot written to local storage
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub path: PathBuf,
    pub timestamp: NaiveDateTime,
}

impl Snapshot {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// File name for a screenshot taken at `timestamp`
pub fn screenshot_file_name(timestamp: NaiveDateTime) -> String {
    format!(
        "{}{}{}",
        FILE_PREFIX,
        timestamp.format(TIMESTAMP_FORMAT),
        FILE_EXTENSION
    )
}

/// Whether `name` follows the `screen_*.png` pattern
pub fn is_screenshot_name(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_EXTENSION)
}

/// Parse the capture timestamp out of a screenshot file name
pub fn parse_screenshot_name(name: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let stem = name
        .strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(FILE_EXTENSION))
        .unwrap_or(name);
    NaiveDateTime::parse_from_str(stem, TIMESTAMP_FORMAT)
}

/// Grab the screen and save it as a PNG in `dir`
pub fn capture(
    dir: &Path,
    source: &dyn ScreenSource,
    now: NaiveDateTime,
) -> Result<Snapshot, CaptureError> {
    let file_name = screenshot_file_name(now);
    let path = dir.join(&file_name);

    let image = source.grab()?;
    image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|source| CaptureError::Write {
            path: path.clone(),
            source,
        })?;

    info!("Screenshot taken: {}", file_name);
    Ok(Snapshot {
        path,
        timestamp: now,
    })
}
