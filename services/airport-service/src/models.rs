use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub name: String,
    pub city: String,
    pub iata: String,
    pub image_url: String,
}

/// Airport plus runway length in meters, served by `/airports_v2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportV2 {
    #[serde(flatten)]
    pub airport: Airport,
    pub runway_length: u32,
}

/// `image_data` carries the raw image as standard base64.
#[derive(Deserialize)]
pub struct UpdateImageRequest {
    pub name: String,
    pub image_data: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}
