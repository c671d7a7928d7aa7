use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    model::{RawProviderPayload, SearchCandidate},
    provider::{FetchError, place_query, validate_coordinates},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const GEOCODING_PATH: &str = "/geo/1.0/direct";

pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(endpoint, %url, "requesting");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }

    /// Current conditions followed by the 5-day/3-hour forecast for one location query.
    async fn fetch_bundle(&self, location: &[(&str, &str)]) -> Result<RawProviderPayload, FetchError> {
        let mut query = location.to_vec();
        query.push(("units", "metric"));

        let current: OwCurrent = self
            .get_json("OpenWeather current", CURRENT_PATH, &query)
            .await
            .inspect_err(|e| warn!(error = %e, "current conditions lookup failed"))?;

        let forecast: OwForecast = self
            .get_json("OpenWeather forecast", FORECAST_PATH, &query)
            .await
            .inspect_err(|e| warn!(error = %e, "forecast lookup failed"))?;

        Ok(RawProviderPayload {
            current,
            forecast: Some(forecast),
        })
    }

    async fn try_search(&self, query: &str) -> Result<Vec<SearchCandidate>, FetchError> {
        let limit = SEARCH_LIMIT.to_string();
        let hits: Vec<OwGeoResult> = self
            .get_json(
                "OpenWeather geocoding",
                GEOCODING_PATH,
                &[("q", query), ("limit", limit.as_str())],
            )
            .await?;

        Ok(shape_candidates(hits))
    }
}

/// Keep provider order, drop hits without a name or position, cap at [`SEARCH_LIMIT`].
fn shape_candidates(hits: Vec<OwGeoResult>) -> Vec<SearchCandidate> {
    hits.into_iter()
        .filter_map(|hit| {
            let name = hit.name.filter(|n| !n.trim().is_empty())?;
            Some(SearchCandidate {
                name,
                state: hit.state.filter(|s| !s.is_empty()),
                country: hit.country.unwrap_or_default(),
                lat: hit.lat?,
                lon: hit.lon?,
            })
        })
        .take(SEARCH_LIMIT)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwCoord {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwWeather {
    pub id: Option<i32>,
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwWind {
    pub speed: Option<f64>,
    pub deg: Option<f64>,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwClouds {
    pub all: Option<f64>,
}

/// Rain volume in mm over the last hour or three hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwRain {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwSys {
    pub country: Option<String>,
}

/// `/data/2.5/weather` body. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwCurrent {
    pub coord: Option<OwCoord>,
    pub weather: Option<Vec<OwWeather>>,
    pub main: Option<OwMain>,
    /// Metres.
    pub visibility: Option<f64>,
    pub wind: Option<OwWind>,
    pub clouds: Option<OwClouds>,
    pub rain: Option<OwRain>,
    pub dt: Option<i64>,
    pub sys: Option<OwSys>,
    /// Shift in seconds from UTC.
    pub timezone: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwForecastEntry {
    pub dt: Option<i64>,
    pub main: Option<OwMain>,
    pub weather: Option<Vec<OwWeather>>,
    pub rain: Option<OwRain>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwCity {
    pub name: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<i64>,
}

/// `/data/2.5/forecast` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwForecast {
    pub list: Option<Vec<OwForecastEntry>>,
    pub city: Option<OwCity>,
}

#[derive(Debug, Deserialize)]
struct OwGeoResult {
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    country: Option<String>,
    state: Option<String>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn fetch_current_by_name(
        &self,
        place: &str,
        country_hint: Option<&str>,
    ) -> Result<RawProviderPayload, FetchError> {
        let q = place_query(place, country_hint);
        self.fetch_bundle(&[("q", q.as_str())]).await
    }

    #[instrument(skip(self))]
    async fn fetch_current_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<RawProviderPayload, FetchError> {
        validate_coordinates(lat, lon)?;

        let (lat, lon) = (lat.to_string(), lon.to_string());
        self.fetch_bundle(&[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await
    }

    #[instrument(skip(self))]
    async fn search_places(&self, query: &str) -> Vec<SearchCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.try_search(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!(error = %e, "place search failed, returning no suggestions");
                Vec::new()
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_respects_char_boundaries() {
        assert_eq!(truncate_body("short"), "short");

        let long = "é".repeat(250);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn candidates_keep_order_and_drop_incomplete_hits() {
        let hits: Vec<OwGeoResult> = serde_json::from_value(serde_json::json!([
            { "name": "Springfield", "lat": 39.8, "lon": -89.6, "country": "US", "state": "Illinois" },
            { "name": "", "lat": 1.0, "lon": 1.0, "country": "US" },
            { "name": "Nowhere", "country": "US" },
            { "name": "Springfield", "lat": 37.2, "lon": -93.3, "country": "US", "state": "" }
        ]))
        .expect("valid geocoding body");

        let candidates = shape_candidates(hits);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].state.as_deref(), Some("Illinois"));
        assert_eq!(candidates[1].lat, 37.2);
        assert_eq!(candidates[1].state, None);
    }

    #[test]
    fn candidates_are_capped() {
        let hits = (0..15)
            .map(|i| OwGeoResult {
                name: Some(format!("Town {i}")),
                lat: Some(0.0),
                lon: Some(0.0),
                country: None,
                state: None,
            })
            .collect();

        let candidates = shape_candidates(hits);
        assert_eq!(candidates.len(), SEARCH_LIMIT);
        assert_eq!(candidates[9].name, "Town 9");
    }

    #[test]
    fn current_payload_tolerates_missing_and_null_fields() {
        let parsed: OwCurrent = serde_json::from_value(serde_json::json!({
            "main": { "temp": 3.2 },
            "wind": null,
            "rain": { "3h": 1.5 }
        }))
        .expect("partial body parses");

        assert_eq!(parsed.main.and_then(|m| m.temp), Some(3.2));
        assert!(parsed.wind.is_none());
        assert_eq!(parsed.rain.and_then(|r| r.three_hours), Some(1.5));
        assert!(parsed.weather.is_none());
    }
}
