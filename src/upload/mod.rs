//! Upload of screenshots to the hosted backend
//!
//! The [`Uploader`] owns an optional [`ObjectStore`]. When the backend could
//! not be initialized every upload is a logged no-op.

mod supabase;

pub use supabase::{BackendError, SupabaseStore};

use chrono::{SecondsFormat, Utc};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use log::{error, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const PNG_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Row written to the `screenshot_log` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRecord {
    pub image_url: String,
    pub created_at: String,
}

impl UploadRecord {
    pub fn now(image_url: String) -> Self {
        Self {
            image_url,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

/// Storage and table operations the uploader needs from a backend
pub trait ObjectStore: Send + Sync {
    fn put_object(&self, name: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), UploadError>;

    fn public_url(&self, name: &str) -> String;

    fn insert_record(&self, record: &UploadRecord) -> Result<(), UploadError>;
}

pub struct Uploader {
    store: Option<Box<dyn ObjectStore>>,
}

impl Uploader {
    pub fn new(store: Box<dyn ObjectStore>) -> Self {
        Self { store: Some(store) }
    }

    /// An uploader whose backend failed to initialize
    pub fn disabled() -> Self {
        Self { store: None }
    }

    #[allow(dead_code)]
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Upload `path` and record it, returning the public URL on success.
    pub fn upload(&self, path: &Path) -> Option<String> {
        let Some(store) = self.store.as_deref() else {
            error!("Backend client not initialized; skipping upload");
            return None;
        };

        match upload_with(store, path) {
            Ok(url) => {
                info!("Uploaded to backend: {}", url);
                Some(url)
            }
            Err(UploadError::NotFound(path)) => {
                error!("File not found: {}", path.display());
                None
            }
            Err(e) => {
                error!("Failed to upload {}: {}", path.display(), e);
                None
            }
        }
    }
}

fn upload_with(store: &dyn ObjectStore, path: &Path) -> Result<String, UploadError> {
    if !path.is_file() {
        return Err(UploadError::NotFound(path.to_path_buf()));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| UploadError::NotFound(path.to_path_buf()))?;

    let bytes = normalize_png(path)?;
    store.put_object(&name, bytes, PNG_CONTENT_TYPE)?;

    let url = store.public_url(&name);
    store.insert_record(&UploadRecord::now(url.clone()))?;
    Ok(url)
}

/// Re-encode an image file as an optimized 8-bit RGB PNG
pub fn normalize_png(path: &Path) -> Result<Vec<u8>, UploadError> {
    let rgb = image::open(path)?.to_rgb8();

    let mut bytes = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive);
    rgb.write_with_encoder(encoder)?;
    Ok(bytes)
}
