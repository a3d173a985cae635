use chrono::Local;
use log::{debug, error};
use std::path::PathBuf;
use std::time::Duration;

use crate::capture::{self, ScreenSource};
use crate::retention;
use crate::upload::Uploader;

/// Notification sent to the UI after a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEvent {
    pub message: String,
    pub display_time: String,
    pub url: String,
}

/// One unit of scheduled work
pub trait Cycle: Send + Sync {
    /// Run to completion, returning an event only if something was uploaded
    fn run(&self) -> Option<UploadEvent>;
}

/// Capture, upload, then sweep expired local files
pub struct CaptureCycle {
    dir: PathBuf,
    source: Box<dyn ScreenSource>,
    uploader: Uploader,
    retention: Duration,
}

impl CaptureCycle {
    pub fn new(
        dir: PathBuf,
        source: Box<dyn ScreenSource>,
        uploader: Uploader,
        retention: Duration,
    ) -> Self {
        Self {
            dir,
            source,
            uploader,
            retention,
        }
    }

    fn capture_and_upload(&self) -> Option<UploadEvent> {
        let now = Local::now().naive_local();
        let snapshot = match capture::capture(&self.dir, self.source.as_ref(), now) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Failed to take screenshot: {}", e);
                return None;
            }
        };

        debug!(
            "Uploading {} captured at {}",
            snapshot.file_name(),
            snapshot.timestamp.format("%H:%M:%S")
        );
        let url = self.uploader.upload(&snapshot.path)?;
        Some(UploadEvent {
            message: format!("Uploaded: {}", snapshot.file_name()),
            display_time: Local::now().format("%H:%M:%S").to_string(),
            url,
        })
    }
}

impl Cycle for CaptureCycle {
    fn run(&self) -> Option<UploadEvent> {
        let event = self.capture_and_upload();
        let report = retention::cleanup(&self.dir, Local::now().naive_local(), self.retention);
        debug!(
            "Retention pass: {} deleted, {} skipped",
            report.deleted.len(),
            report.skipped.len()
        );
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureError;
    use crate::upload::tests::MemoryStore;
    use image::{Rgba, RgbaImage};
    use std::fs;

    struct SolidSource;

    impl ScreenSource for SolidSource {
        fn grab(&self) -> Result<RgbaImage, CaptureError> {
            Ok(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])))
        }
    }

    struct BrokenSource;

    impl ScreenSource for BrokenSource {
        fn grab(&self) -> Result<RgbaImage, CaptureError> {
            Err(CaptureError::NoMonitor)
        }
    }

    const RETENTION: Duration = Duration::from_secs(1800);

    #[test]
    fn test_successful_cycle_emits_event() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::default();
        let cycle = CaptureCycle::new(
            dir.path().to_path_buf(),
            Box::new(SolidSource),
            Uploader::new(Box::new(store.clone())),
            RETENTION,
        );

        let event = cycle.run().unwrap();

        assert!(event.message.starts_with("Uploaded: screen_"));
        assert!(event.message.ends_with(".png"));
        assert_eq!(event.display_time.len(), 8);
        assert_eq!(store.records.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_upload_emits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore {
            fail_put: true,
            ..Default::default()
        };
        let cycle = CaptureCycle::new(
            dir.path().to_path_buf(),
            Box::new(SolidSource),
            Uploader::new(Box::new(store)),
            RETENTION,
        );

        assert!(cycle.run().is_none());
        // The capture itself stays on disk until retention removes it
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_capture_failure_still_sweeps() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("screen_20000101_000000.png");
        fs::write(&stale, b"png").unwrap();

        let cycle = CaptureCycle::new(
            dir.path().to_path_buf(),
            Box::new(BrokenSource),
            Uploader::disabled(),
            RETENTION,
        );

        assert!(cycle.run().is_none());
        assert!(!stale.exists());
    }
}
