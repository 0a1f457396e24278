use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{airports, airports_v2, healthz, home, readyz, update_airport_image};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/airports", get(airports))
        .route("/airports_v2", get(airports_v2))
        .route(
            "/update_airport_image",
            post(update_airport_image).layer(upload_limit),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
