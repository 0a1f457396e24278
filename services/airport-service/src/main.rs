mod app;
mod handlers;
mod models;
mod service;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod testing;

use airport_common::{bind_listener, env_or, init_tracing, shutdown_signal};
use std::{sync::Arc, time::Duration};

use crate::state::{AppState, DEFAULT_MAX_UPLOAD_BYTES};
use crate::storage::{S3Storage, StorageConfig};
use crate::store::AirportStore;

#[tokio::main]
async fn main() {
    let _guards = init_tracing("airport-service");

    let port = env_or("PORT", 8080u16);
    let upload_timeout = Duration::from_secs(env_or("UPLOAD_TIMEOUT_SECS", 60u64));
    let max_upload_bytes = env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES);

    let storage_config = StorageConfig::from_env();
    if storage_config.access_key.is_none() || storage_config.secret_key.is_none() {
        // Listing still works; image updates fail until the key pair is provided.
        tracing::warn!("storage credentials missing, image updates will be rejected");
    }
    let storage = S3Storage::new(storage_config).await;

    let http = reqwest::Client::builder()
        .timeout(upload_timeout)
        .build()
        .expect("http client");

    let state = AppState::new(AirportStore::seeded(), Arc::new(storage), http)
        .with_max_upload_bytes(max_upload_bytes);
    let app = app::build_router(state);
    let listener = bind_listener(port).await.expect("bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("serve");
}
