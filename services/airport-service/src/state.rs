use std::sync::Arc;

use crate::storage::ObjectStore;
use crate::store::AirportStore;

/// Request body cap for image updates; base64 inflates the image by a third.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub airports: Arc<AirportStore>,
    pub storage: Arc<dyn ObjectStore>,
    pub http: reqwest::Client,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(airports: AirportStore, storage: Arc<dyn ObjectStore>, http: reqwest::Client) -> Self {
        Self {
            airports: Arc::new(airports),
            storage,
            http,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
