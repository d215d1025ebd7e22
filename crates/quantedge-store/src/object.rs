//! Object-storage seam with a GCS implementation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use quantedge_core::{HttpClient, HttpRequest};

use crate::error::StoreError;

pub const PARQUET_CONTENT_TYPE: &str = "application/octet-stream";

const GCS_UPLOAD_BASE: &str = "https://storage.googleapis.com/upload/storage/v1";

/// Stores a byte payload at a path, overwriting if present.
pub trait ObjectStore: Send + Sync {
    fn put<'a>(
        &'a self,
        path: &'a str,
        bytes: Vec<u8>,
        content_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;
}

/// Google Cloud Storage sink using the JSON API media upload.
///
/// Authentication setup is out of scope; an already-acquired bearer
/// token is passed in, and `quota_project` populates the
/// `x-goog-user-project` header when billing needs to be pinned.
pub struct GcsStore {
    http: Arc<dyn HttpClient>,
    bucket: String,
    bearer_token: Option<String>,
    quota_project: Option<String>,
    upload_base: String,
}

impl GcsStore {
    pub fn new(http: Arc<dyn HttpClient>, bucket: impl Into<String>) -> Self {
        Self {
            http,
            bucket: bucket.into(),
            bearer_token: None,
            quota_project: None,
            upload_base: String::from(GCS_UPLOAD_BASE),
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_quota_project(mut self, project: impl Into<String>) -> Self {
        self.quota_project = Some(project.into());
        self
    }

    pub fn with_upload_base(mut self, base: impl Into<String>) -> Self {
        self.upload_base = base.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn upload_url(&self, path: &str) -> String {
        format!(
            "{}/b/{}/o?uploadType=media&name={}",
            self.upload_base.trim_end_matches('/'),
            urlencoding::encode(&self.bucket),
            urlencoding::encode(path)
        )
    }
}

impl ObjectStore for GcsStore {
    fn put<'a>(
        &'a self,
        path: &'a str,
        bytes: Vec<u8>,
        content_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let mut request = HttpRequest::post(self.upload_url(path))
                .with_header("content-type", content_type)
                .with_body(bytes);
            if let Some(token) = &self.bearer_token {
                request = request.with_header("authorization", format!("Bearer {token}"));
            }
            if let Some(project) = &self.quota_project {
                request = request.with_header("x-goog-user-project", project);
            }

            let response = self.http.execute(request).await.map_err(|e| {
                StoreError::Upload {
                    bucket: self.bucket.clone(),
                    path: path.to_owned(),
                    detail: e.message().to_owned(),
                }
            })?;

            if !response.is_success() {
                return Err(StoreError::Upload {
                    bucket: self.bucket.clone(),
                    path: path.to_owned(),
                    detail: format!("status {}", response.status),
                });
            }

            Ok(())
        })
    }
}

/// In-memory store for tests and dry runs; later puts overwrite.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("memory store mutex poisoned")
            .get(path)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects
            .lock()
            .expect("memory store mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryStore {
    fn put<'a>(
        &'a self,
        path: &'a str,
        bytes: Vec<u8>,
        _content_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        self.objects
            .lock()
            .expect("memory store mutex poisoned")
            .insert(path.to_owned(), bytes);
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantedge_core::{HttpError, HttpResponse};

    struct FixedResponseClient {
        status: u16,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl HttpClient for FixedResponseClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.seen.lock().unwrap().push(request);
            let status = self.status;
            Box::pin(async move { Ok(HttpResponse::with_status(status, "{}")) })
        }
    }

    #[tokio::test]
    async fn uploads_with_auth_and_content_type() {
        let client = Arc::new(FixedResponseClient {
            status: 200,
            seen: Mutex::new(Vec::new()),
        });
        let store = GcsStore::new(client.clone(), "raw-bucket")
            .with_bearer_token("tok")
            .with_quota_project("proj-1");

        store
            .put("ohlcv/BTCUSDT/1h/2024-06-15/data.parquet", vec![1, 2, 3], PARQUET_CONTENT_TYPE)
            .await
            .expect("must upload");

        let seen = client.seen.lock().unwrap();
        let request = &seen[0];
        assert!(request.url.contains("/b/raw-bucket/o?uploadType=media&name="));
        assert!(request.url.contains("ohlcv%2FBTCUSDT%2F1h%2F2024-06-15%2Fdata.parquet"));
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer tok")
        );
        assert_eq!(
            request.headers.get("x-goog-user-project").map(String::as_str),
            Some("proj-1")
        );
        assert_eq!(request.body.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[tokio::test]
    async fn non_2xx_surfaces_destination_identity() {
        let client = Arc::new(FixedResponseClient {
            status: 403,
            seen: Mutex::new(Vec::new()),
        });
        let store = GcsStore::new(client, "raw-bucket");

        let err = store
            .put("a/b/data.parquet", Vec::new(), PARQUET_CONTENT_TYPE)
            .await
            .expect_err("must fail");
        let message = err.to_string();
        assert!(message.contains("gs://raw-bucket/a/b/data.parquet"));
        assert!(message.contains("403"));
    }

    #[tokio::test]
    async fn memory_store_overwrites() {
        let store = MemoryStore::new();
        store.put("p", vec![1], PARQUET_CONTENT_TYPE).await.unwrap();
        store.put("p", vec![2], PARQUET_CONTENT_TYPE).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("p"), Some(vec![2]));
    }
}
