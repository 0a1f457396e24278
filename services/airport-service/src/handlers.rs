use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::models::UpdateImageRequest;
use crate::service::{self, ServiceError};
use crate::state::AppState;

pub async fn home() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Status: OK")
}

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub async fn readyz() -> StatusCode {
    StatusCode::OK
}

pub async fn airports(State(state): State<AppState>) -> impl IntoResponse {
    Json(service::list_airports(&state).await)
}

pub async fn airports_v2(State(state): State<AppState>) -> impl IntoResponse {
    Json(service::list_airports_v2(&state).await)
}

pub async fn update_airport_image(
    State(state): State<AppState>,
    payload: Result<Json<UpdateImageRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let err = body_rejection(&rejection, state.max_upload_bytes);
            return (err.status, Json(err.body)).into_response();
        }
    };

    match service::update_airport_image(&state, payload).await {
        Ok(airport) => (StatusCode::OK, Json(airport)).into_response(),
        Err(err) => {
            let err = ServiceError::from(err);
            (err.status, Json(err.body)).into_response()
        }
    }
}

// An oversized body is well formed, just too big for the configured cap.
fn body_rejection(rejection: &JsonRejection, max_upload_bytes: usize) -> ServiceError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(limit = max_upload_bytes, "image update body over limit");
        return ServiceError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            format!("Request body exceeds {max_upload_bytes} bytes"),
        );
    }
    ServiceError::new(
        StatusCode::BAD_REQUEST,
        "invalid_request",
        format!("Invalid request body: {}", rejection.body_text()),
    )
}
