use async_trait::async_trait;
use chrono::Utc;
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;

use crate::{
    mock::MockGenerator,
    model::{RawProviderPayload, SearchCandidate},
    provider::{FetchError, WeatherProvider, validate_coordinates},
};

/// Offline provider serving seeded synthetic payloads. Lookups never fail
/// apart from out-of-range coordinates.
#[derive(Debug)]
pub struct MockProvider {
    generator: Mutex<MockGenerator<ChaCha8Rng>>,
}

impl MockProvider {
    pub fn seeded(seed: u64) -> Self {
        Self {
            generator: Mutex::new(MockGenerator::seeded(seed)),
        }
    }

    async fn payload(&self, city: &str, country: &str) -> RawProviderPayload {
        self.generator.lock().await.raw_payload(city, country, Utc::now())
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn fetch_current_by_name(
        &self,
        place: &str,
        country_hint: Option<&str>,
    ) -> Result<RawProviderPayload, FetchError> {
        Ok(self.payload(place.trim(), country_hint.unwrap_or_default()).await)
    }

    async fn fetch_current_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<RawProviderPayload, FetchError> {
        validate_coordinates(lat, lon)?;

        let mut payload = self.payload("Current Location", "").await;
        if let Some(coord) = payload.current.coord.as_mut() {
            coord.lat = Some(lat);
            coord.lon = Some(lon);
        }
        Ok(payload)
    }

    /// Echoes the query back as a single candidate.
    async fn search_places(&self, query: &str) -> Vec<SearchCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        vec![SearchCandidate {
            name: query.to_string(),
            state: None,
            country: String::new(),
            lat: 0.0,
            lon: 0.0,
        }]
    }
}
