use crate::{
    Config, RawProviderPayload, SearchCandidate, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod mock;
pub mod openweather;

/// Failure of a current-conditions lookup.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to send {endpoint} request: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {endpoint} JSON: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid coordinates ({lat}, {lon}): latitude must be -90 to 90, longitude -180 to 180")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

/// Source of raw weather payloads and place suggestions.
///
/// Every call is independent: no retries, caching or deduplication.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions plus the short-range forecast for a place name.
    async fn fetch_current_by_name(
        &self,
        place: &str,
        country_hint: Option<&str>,
    ) -> Result<RawProviderPayload, FetchError>;

    /// Same as [`WeatherProvider::fetch_current_by_name`], keyed by coordinates.
    async fn fetch_current_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<RawProviderPayload, FetchError>;

    /// Up to ten place candidates. Failures come back as an empty list.
    async fn search_places(&self, query: &str) -> Vec<SearchCandidate>;
}

/// `"name"` or `"name,country"` when a non-blank country hint is given.
pub fn place_query(place: &str, country_hint: Option<&str>) -> String {
    let place = place.trim();
    match country_hint.map(str::trim).filter(|c| !c.is_empty()) {
        Some(country) => format!("{place},{country}"),
        None => place.to_string(),
    }
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), FetchError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(FetchError::InvalidCoordinates { lat, lon });
    }
    Ok(())
}

/// Construct the live provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `skycast configure` or set SKYCAST_API_KEY."
        )
    })?;

    Ok(OpenWeatherProvider::new(api_key.to_owned()).with_base_url(&config.base_url))
}
