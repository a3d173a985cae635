//! Application configuration
//!
//! Backend credentials are layered, highest precedence first:
//! environment variables (including any `.env` found from the working
//! directory), `<app dir>/.env`, then `<app dir>/config.json`.

use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Delay between the start of one cycle and the next
pub const CAPTURE_INTERVAL: Duration = Duration::from_secs(30);

/// Maximum age of a local screenshot before it is deleted
pub const RETENTION_PERIOD: Duration = Duration::from_secs(30 * 60);

pub const DEFAULT_BUCKET: &str = "screenshots";

const APP_DIR_NAME: &str = "LiveScreenUploader";
const TEMP_DIR_NAME: &str = "temp";
const CONFIG_FILE_NAME: &str = "config.json";
const DOTENV_FILE_NAME: &str = ".env";

const ENV_URL: &str = "SUPABASE_URL";
const ENV_API_KEY: &str = "SUPABASE_API_KEY";
const ENV_BUCKET: &str = "BUCKET_NAME";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoHomeDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Values that may appear in `config.json`
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct FileConfig {
    supabase_url: Option<String>,
    supabase_api_key: Option<String>,
    bucket_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: Option<String>,
    pub supabase_api_key: Option<String>,
    pub bucket: String,
    pub app_dir: PathBuf,
    pub temp_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration rooted at `<home>/LiveScreenUploader`.
    pub fn load() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        // Existing variables are never overridden by the file
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring .env file: {}", e),
        }
        Self::load_from(&home.join(APP_DIR_NAME), |key| env::var(key).ok())
    }

    /// Load configuration from `app_dir`, using `lookup` for the environment.
    pub fn load_from<F>(app_dir: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match read_config_file(&app_dir.join(CONFIG_FILE_NAME)) {
            Ok(file) => file,
            Err(e) => {
                warn!("Ignoring config file: {}", e);
                FileConfig::default()
            }
        };
        let dotenv = read_dotenv(&app_dir.join(DOTENV_FILE_NAME));

        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let layered = |key: &str, from_file: Option<String>| {
            non_empty(lookup(key))
                .or_else(|| non_empty(dotenv.get(key).cloned()))
                .or_else(|| non_empty(from_file))
        };

        Ok(Self {
            supabase_url: layered(ENV_URL, file.supabase_url),
            supabase_api_key: layered(ENV_API_KEY, file.supabase_api_key),
            bucket: layered(ENV_BUCKET, file.bucket_name)
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            app_dir: app_dir.to_path_buf(),
            temp_dir: app_dir.join(TEMP_DIR_NAME),
        })
    }

    /// Create the application and temp directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [&self.app_dir, &self.temp_dir] {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        info!("Screenshots are stored in {}", self.temp_dir.display());
        Ok(())
    }
}

/// Read `KEY=value` pairs from a dotenv file without touching the process environment
fn read_dotenv(path: &Path) -> HashMap<String, String> {
    if !path.is_file() {
        return HashMap::new();
    }

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            warn!("Ignoring {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    let mut values = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                values.insert(key, value);
            }
            Err(e) => warn!("Skipping malformed line in {}: {}", path.display(), e),
        }
    }
    values
}

fn read_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
