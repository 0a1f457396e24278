use axum::http::StatusCode;
use base64::{engine::general_purpose, Engine};
use thiserror::Error;

use crate::models::{Airport, AirportV2, ErrorResponse, UpdateImageRequest};
use crate::state::AppState;
use crate::storage::{object_key, upload_presigned, StorageError, PRESIGN_TTL};

pub struct ServiceError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ServiceError {
    pub fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            body: ErrorResponse { code, message },
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateImageError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("airport not found")]
    NotFound,
    #[error("storage credentials unavailable: {0}")]
    AuthConfig(String),
    #[error("presign failed: {0}")]
    Presign(String),
    #[error("upload failed: {0}")]
    Upload(String),
}

impl From<StorageError> for UpdateImageError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AuthConfig(message) => Self::AuthConfig(message),
            StorageError::Presign(message) => Self::Presign(message),
            StorageError::Upload(message) => Self::Upload(message),
        }
    }
}

impl From<UpdateImageError> for ServiceError {
    fn from(err: UpdateImageError) -> Self {
        match err {
            UpdateImageError::InvalidRequest(message) => {
                ServiceError::new(StatusCode::BAD_REQUEST, "invalid_request", message)
            }
            UpdateImageError::NotFound => ServiceError::new(
                StatusCode::NOT_FOUND,
                "not_found",
                "Airport not found".to_string(),
            ),
            UpdateImageError::AuthConfig(detail) => {
                tracing::error!(error = %detail, "storage session setup failed");
                ServiceError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "auth_config_error",
                    "Failed to create storage session".to_string(),
                )
            }
            UpdateImageError::Presign(detail) => {
                tracing::error!(error = %detail, "presign failed");
                ServiceError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "presign_error",
                    "Failed to generate presigned URL".to_string(),
                )
            }
            UpdateImageError::Upload(detail) => {
                tracing::warn!(error = %detail, "image upload failed");
                ServiceError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upload_error",
                    "Failed to upload image".to_string(),
                )
            }
        }
    }
}

pub async fn list_airports(state: &AppState) -> Vec<Airport> {
    state.airports.list().await
}

pub async fn list_airports_v2(state: &AppState) -> Vec<AirportV2> {
    state.airports.list_v2().await
}

/// Upload a new image for the named airport and point its `image_url` at it.
///
/// Steps run strictly in order and stop at the first failure. The record is
/// written only after the storage endpoint confirms the upload, so a failed
/// run leaves it untouched. Two concurrent runs for the same airport are not
/// serialized against each other: whichever commit lands last wins.
pub async fn update_airport_image(
    state: &AppState,
    payload: UpdateImageRequest,
) -> Result<Airport, UpdateImageError> {
    let airport = state
        .airports
        .find(&payload.name)
        .await
        .ok_or(UpdateImageError::NotFound)?;

    let image = decode_image(&payload.image_data)?;
    let key = object_key(&airport.name)
        .map_err(|err| UpdateImageError::InvalidRequest(err.to_string()))?;

    let credentials = state.storage.resolve_credentials().await?;
    let upload_url = state
        .storage
        .presign_put(credentials, &key, PRESIGN_TTL)
        .await?;

    let size = image.len();
    upload_presigned(&state.http, &upload_url, image).await?;
    tracing::info!(airport = %airport.name, key = %key, bytes = size, "image uploaded");

    let image_url = state.storage.public_url(&key);
    state
        .airports
        .set_image_url(&airport.name, image_url)
        .await
        .ok_or(UpdateImageError::NotFound)
}

fn decode_image(encoded: &str) -> Result<Vec<u8>, UpdateImageError> {
    let image = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|err| UpdateImageError::InvalidRequest(format!("image_data: {err}")))?;
    if image.is_empty() {
        return Err(UpdateImageError::InvalidRequest(
            "image_data is empty".to_string(),
        ));
    }
    Ok(image)
}
