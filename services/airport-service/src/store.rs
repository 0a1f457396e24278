use tokio::sync::RwLock;

use crate::models::{Airport, AirportV2};

/// In-memory airport records, kept in insertion order for the process lifetime.
///
/// Lookups match the first record whose name is equal; names are not unique keys.
/// Every method holds the lock only for its own read or write, so callers must
/// not assume a record is unchanged between `find` and `set_image_url`.
pub struct AirportStore {
    records: RwLock<Vec<AirportV2>>,
}

impl AirportStore {
    pub fn new(records: Vec<AirportV2>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_records())
    }

    pub async fn list(&self) -> Vec<Airport> {
        let records = self.records.read().await;
        records.iter().map(|record| record.airport.clone()).collect()
    }

    pub async fn list_v2(&self) -> Vec<AirportV2> {
        self.records.read().await.clone()
    }

    pub async fn find(&self, name: &str) -> Option<Airport> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|record| record.airport.name == name)
            .map(|record| record.airport.clone())
    }

    /// Returns the updated record, or `None` when no record has that name.
    pub async fn set_image_url(&self, name: &str, image_url: String) -> Option<Airport> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.airport.name == name)?;
        record.airport.image_url = image_url;
        Some(record.airport.clone())
    }
}

fn record(name: &str, city: &str, iata: &str, image_url: &str, runway_length: u32) -> AirportV2 {
    AirportV2 {
        airport: Airport {
            name: name.to_string(),
            city: city.to_string(),
            iata: iata.to_string(),
            image_url: image_url.to_string(),
        },
        runway_length,
    }
}

// Mock data for airports in Bangladesh.
fn seed_records() -> Vec<AirportV2> {
    vec![
        record(
            "Hazrat Shahjalal International Airport",
            "Dhaka",
            "DAC",
            "https://storage.googleapis.com/bd-airport-data/dac.jpg",
            3200,
        ),
        record(
            "Shah Amanat International Airport",
            "Chittagong",
            "CGP",
            "https://storage.googleapis.com/bd-airport-data/cgp.jpg",
            2900,
        ),
        record(
            "Osmani International Airport",
            "Sylhet",
            "ZYL",
            "https://storage.googleapis.com/bd-airport-data/zyl.jpg",
            2500,
        ),
    ]
}
