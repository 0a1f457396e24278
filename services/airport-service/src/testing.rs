//! Local stand-ins for the storage provider, bound on ephemeral ports.

use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, StatusCode, Uri},
    routing::put,
    Router,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    net::TcpListener,
    sync::{Mutex, Notify},
};

use crate::storage::{public_url, ObjectStore, StorageError, BUCKET};

#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub path: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Parks the first PUT until released.
#[derive(Default)]
struct Gate {
    armed: AtomicBool,
    arrived: Notify,
    release: Notify,
}

#[derive(Clone)]
struct BucketState {
    status: StatusCode,
    uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
    gate: Arc<Gate>,
}

/// Accepts any PUT, records it, and answers with a fixed status.
pub struct FakeBucket {
    base: String,
    uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
    gate: Arc<Gate>,
}

impl FakeBucket {
    pub async fn start(status: StatusCode) -> Self {
        Self::start_with_gate(status, false).await
    }

    /// Like [`FakeBucket::start`], but the first PUT blocks until
    /// [`FakeBucket::release_first_upload`] is called.
    pub async fn start_holding_first_upload(status: StatusCode) -> Self {
        Self::start_with_gate(status, true).await
    }

    async fn start_with_gate(status: StatusCode, hold_first: bool) -> Self {
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new(Gate::default());
        gate.armed.store(hold_first, Ordering::SeqCst);
        let state = BucketState {
            status,
            uploads: uploads.clone(),
            gate: gate.clone(),
        };
        let app = Router::new()
            .route("/*key", put(receive))
            .layer(DefaultBodyLimit::disable())
            .with_state(state);
        let base = serve(app).await;
        Self {
            base,
            uploads,
            gate,
        }
    }

    /// Resolves once the held PUT has reached the bucket.
    pub async fn first_upload_arrived(&self) {
        self.gate.arrived.notified().await;
    }

    pub fn release_first_upload(&self) {
        self.gate.release.notify_one();
    }

    pub fn url_for(&self, key: &str) -> String {
        let mut url = reqwest::Url::parse(&self.base).expect("fake bucket url");
        url.path_segments_mut()
            .expect("base url")
            .pop_if_empty()
            .push(key);
        url.query_pairs_mut().append_pair("X-Amz-Expires", "900");
        url.to_string()
    }

    pub async fn uploads(&self) -> Vec<ReceivedUpload> {
        self.uploads.lock().await.clone()
    }
}

async fn receive(
    State(state): State<BucketState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if state.gate.armed.swap(false, Ordering::SeqCst) {
        state.gate.arrived.notify_one();
        state.gate.release.notified().await;
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.uploads.lock().await.push(ReceivedUpload {
        path: uri.path().to_string(),
        body: body.to_vec(),
        content_type,
    });
    state.status
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nowhere,
    Credentials,
    Presign,
}

/// Presigns into a [`FakeBucket`] and records every request it sees.
pub struct FakeStore {
    pub bucket: FakeBucket,
    fail_at: FailAt,
    presigned: Mutex<Vec<(String, Duration)>>,
}

impl FakeStore {
    pub async fn start(status: StatusCode, fail_at: FailAt) -> Self {
        Self::with_bucket(FakeBucket::start(status).await, fail_at)
    }

    pub fn with_bucket(bucket: FakeBucket, fail_at: FailAt) -> Self {
        Self {
            bucket,
            fail_at,
            presigned: Mutex::new(Vec::new()),
        }
    }

    pub async fn presigned(&self) -> Vec<(String, Duration)> {
        self.presigned.lock().await.clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn resolve_credentials(&self) -> Result<Credentials, StorageError> {
        if self.fail_at == FailAt::Credentials {
            return Err(StorageError::AuthConfig("no key pair".to_string()));
        }
        Ok(Credentials::new("test", "test", None, None, "fake"))
    }

    async fn presign_put(
        &self,
        _credentials: Credentials,
        key: &str,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        if self.fail_at == FailAt::Presign {
            return Err(StorageError::Presign("signer rejected".to_string()));
        }
        self.presigned.lock().await.push((key.to_string(), ttl));
        Ok(self.bucket.url_for(key))
    }

    fn public_url(&self, key: &str) -> String {
        public_url(BUCKET, key)
    }
}

/// Serve `app` on 127.0.0.1 and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/")
}
