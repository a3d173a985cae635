//! Screen capture module using xcap library
//!
//! This module grabs the primary monitor as an RGBA image.

use image::RgbaImage;
use log::debug;
use xcap::Monitor;

use super::CaptureError;

/// Something that can produce a full-screen image
pub trait ScreenSource: Send + Sync {
    fn grab(&self) -> Result<RgbaImage, CaptureError>;
}

/// Information about a monitor
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

impl MonitorInfo {
    /// Create MonitorInfo from xcap Monitor
    fn from_xcap(monitor: &Monitor) -> Result<Self, CaptureError> {
        Ok(Self {
            name: monitor.name().map_err(os_error)?,
            width: monitor.width().map_err(os_error)?,
            height: monitor.height().map_err(os_error)?,
            is_primary: monitor.is_primary().map_err(os_error)?,
        })
    }
}

/// Captures the primary monitor, falling back to the first one listed
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryMonitor;

impl ScreenSource for PrimaryMonitor {
    fn grab(&self) -> Result<RgbaImage, CaptureError> {
        let monitor = primary_monitor()?;
        if let Ok(info) = MonitorInfo::from_xcap(&monitor) {
            debug!(
                "Capturing monitor {} ({}x{}, primary: {})",
                info.name, info.width, info.height, info.is_primary
            );
        }

        monitor.capture_image().map_err(os_error)
    }
}

/// Get the primary monitor
fn primary_monitor() -> Result<Monitor, CaptureError> {
    let monitors = Monitor::all().map_err(os_error)?;

    let primary = monitors
        .iter()
        .position(|m| m.is_primary().unwrap_or(false))
        .unwrap_or(0);

    monitors
        .into_iter()
        .nth(primary)
        .ok_or(CaptureError::NoMonitor)
}

fn os_error(e: xcap::XCapError) -> CaptureError {
    CaptureError::Os(e.to_string())
}
