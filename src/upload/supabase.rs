//! Supabase storage and REST backend

use log::debug;
use reqwest::blocking::{Client, ClientBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;

use super::{ObjectStore, UploadError, UploadRecord};
use crate::app::AppConfig;

const LOG_TABLE: &str = "screenshot_log";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend configuration missing; set SUPABASE_URL and SUPABASE_API_KEY")]
    MissingCredentials,
    #[error("invalid backend URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid API key")]
    InvalidKey,
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct SupabaseStore {
    client: Client,
    base_url: Url,
    bucket: String,
}

impl SupabaseStore {
    pub fn connect(config: &AppConfig) -> Result<Self, BackendError> {
        Self::with_builder(config, Client::builder())
    }

    fn with_builder(config: &AppConfig, builder: ClientBuilder) -> Result<Self, BackendError> {
        let (Some(url), Some(key)) = (&config.supabase_url, &config.supabase_api_key) else {
            return Err(BackendError::MissingCredentials);
        };

        let base_url = parse_base_url(url)?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(key).map_err(|_| BackendError::InvalidKey)?;
        let bearer =
            HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|_| BackendError::InvalidKey)?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = builder.default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url,
            bucket: config.bucket.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

impl ObjectStore for SupabaseStore {
    fn put_object(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), UploadError> {
        let url = self.endpoint(&format!("storage/v1/object/{}/{}", self.bucket, name));
        debug!("PUT object {} ({} bytes)", url, bytes.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()?;
        check_status(response)
    }

    fn public_url(&self, name: &str) -> String {
        public_object_url(&self.base_url, &self.bucket, name)
    }

    fn insert_record(&self, record: &UploadRecord) -> Result<(), UploadError> {
        let url = self.endpoint(&format!("rest/v1/{}", LOG_TABLE));

        let response = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()?;
        check_status(response)
    }
}

fn parse_base_url(url: &str) -> Result<Url, BackendError> {
    let parsed = Url::parse(url).map_err(|e| BackendError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(BackendError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn public_object_url(base_url: &Url, bucket: &str, name: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        base_url.as_str().trim_end_matches('/'),
        bucket,
        name
    )
}

fn check_status(response: Response) -> Result<(), UploadError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().unwrap_or_default();
    Err(UploadError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::PathBuf;
    use std::thread::{self, JoinHandle};

    /// Request line and lowercased headers, plus the raw body
    struct Captured {
        head: String,
        body: Vec<u8>,
    }

    /// Accept one connection on a loopback port and answer it with `status` and `body`
    fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let head_end = loop {
                let n = stream.read(&mut chunk).unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            while buf.len() < head_end + content_length {
                let n = stream.read(&mut chunk).unwrap();
                assert!(n > 0, "connection closed before body");
                buf.extend_from_slice(&chunk[..n]);
            }

            let reply = format!(
                "HTTP/1.1 {} Stub\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).unwrap();

            Captured {
                head,
                body: buf[head_end..head_end + content_length].to_vec(),
            }
        });

        (url, handle)
    }

    fn local_store(url: &str) -> SupabaseStore {
        SupabaseStore::with_builder(&config(Some(url), Some("key")), Client::builder().no_proxy())
            .unwrap()
    }

    fn config(url: Option<&str>, key: Option<&str>) -> AppConfig {
        AppConfig {
            supabase_url: url.map(str::to_string),
            supabase_api_key: key.map(str::to_string),
            bucket: "screenshots".into(),
            app_dir: PathBuf::from("/tmp/LiveScreenUploader"),
            temp_dir: PathBuf::from("/tmp/LiveScreenUploader/temp"),
        }
    }

    #[test]
    fn test_missing_credentials() {
        assert!(matches!(
            SupabaseStore::connect(&config(None, Some("key"))),
            Err(BackendError::MissingCredentials)
        ));
        assert!(matches!(
            SupabaseStore::connect(&config(Some("https://abc.supabase.co"), None)),
            Err(BackendError::MissingCredentials)
        ));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            SupabaseStore::connect(&config(Some("not a url"), Some("key"))),
            Err(BackendError::InvalidUrl { .. })
        ));
        assert!(matches!(
            SupabaseStore::connect(&config(Some("ftp://abc.supabase.co"), Some("key"))),
            Err(BackendError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_public_url_layout() {
        let store =
            SupabaseStore::connect(&config(Some("https://abc.supabase.co/"), Some("key"))).unwrap();

        assert_eq!(
            store.public_url("screen_20240101_000000.png"),
            "https://abc.supabase.co/storage/v1/object/public/screenshots/screen_20240101_000000.png"
        );
        assert_eq!(
            store.endpoint("rest/v1/screenshot_log"),
            "https://abc.supabase.co/rest/v1/screenshot_log"
        );
    }

    #[test]
    fn test_put_object_request() {
        let (url, server) = serve_once(200, r#"{"Key":"screenshots/screen_x.png"}"#);
        let store = local_store(&url);

        store
            .put_object("screen_x.png", vec![1, 2, 3, 4], "image/png")
            .unwrap();

        let request = server.join().unwrap();
        assert!(request
            .head
            .starts_with("post /storage/v1/object/screenshots/screen_x.png http/1.1\r\n"));
        assert!(request.head.contains("\r\napikey: key\r\n"));
        assert!(request.head.contains("\r\nauthorization: bearer key\r\n"));
        assert!(request.head.contains("\r\ncontent-type: image/png\r\n"));
        assert!(!request.head.contains("x-upsert"));
        assert_eq!(request.body, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_insert_record_request() {
        let (url, server) = serve_once(201, "");
        let store = local_store(&url);
        let record = UploadRecord {
            image_url: format!("{}/storage/v1/object/public/screenshots/screen_x.png", url),
            created_at: "2024-01-01T00:00:00.000000Z".into(),
        };

        store.insert_record(&record).unwrap();

        let request = server.join().unwrap();
        assert!(request
            .head
            .starts_with("post /rest/v1/screenshot_log http/1.1\r\n"));
        assert!(request.head.contains("\r\nprefer: return=minimal\r\n"));
        assert!(request.head.contains("\r\ncontent-type: application/json\r\n"));
        let json: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(json["image_url"], record.image_url);
        assert_eq!(json["created_at"], "2024-01-01T00:00:00.000000Z");
    }

    #[test]
    fn test_error_status_keeps_code_and_body() {
        let (url, server) = serve_once(401, "invalid api key");
        let result = local_store(&url).put_object("screen_x.png", vec![0], "image/png");
        server.join().unwrap();
        match result {
            Err(UploadError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected status error, got {:?}", other),
        }

        let (url, server) = serve_once(500, "storage unavailable");
        let record = UploadRecord::now("https://abc.supabase.co/x.png".into());
        let result = local_store(&url).insert_record(&record);
        server.join().unwrap();
        assert!(matches!(
            result,
            Err(UploadError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_record_serializes_table_columns() {
        let record = UploadRecord {
            image_url: "https://abc.supabase.co/x.png".into(),
            created_at: "2024-01-01T00:00:00.000000Z".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["image_url"], "https://abc.supabase.co/x.png");
        assert_eq!(json["created_at"], "2024-01-01T00:00:00.000000Z");
    }
}
