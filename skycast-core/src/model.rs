use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::provider::openweather::{OwCurrent, OwForecast};

/// Where a snapshot was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub region: Option<String>,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// Provider-local civil time, ISO-8601.
    pub localtime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub code: i32,
}

/// Current readings. Celsius, km/h, mb, mm and km are the canonical units;
/// every other unit field is computed from the unrounded canonical reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: i32,
    pub temp_f: i32,
    pub feelslike_c: i32,
    pub feelslike_f: i32,
    pub condition: Condition,
    pub wind_kph: i32,
    pub wind_mph: i32,
    pub wind_degree: u16,
    pub wind_dir: String,
    pub gust_kph: i32,
    pub gust_mph: i32,
    pub pressure_mb: i32,
    pub pressure_in: f64,
    pub precip_mm: f64,
    pub precip_in: f64,
    pub humidity: u8,
    pub cloud: u8,
    pub vis_km: i32,
    pub vis_miles: i32,
    /// Heuristic estimate, see [`crate::convert::estimate_uv_index`].
    pub uv: u8,
    pub last_updated: String,
}

/// One calendar day of the short-range forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub maxtemp_c: i32,
    pub maxtemp_f: i32,
    pub mintemp_c: i32,
    pub mintemp_f: i32,
    pub total_precip_mm: f64,
    pub total_precip_in: f64,
    pub condition: Condition,
}

/// An immutable, fully populated weather reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Place,
    pub current: CurrentConditions,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

/// A geocoding hit returned while the user is typing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl SearchCandidate {
    /// "Name, State, CC" with the empty parts left out.
    pub fn label(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(state) = self.state.as_deref().filter(|s| !s.is_empty()) {
            parts.push(state);
        }
        if !self.country.is_empty() {
            parts.push(self.country.as_str());
        }
        parts.join(", ")
    }
}

/// Raw current-conditions and forecast payloads from one lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProviderPayload {
    pub current: OwCurrent,
    pub forecast: Option<OwForecast>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_label_skips_missing_parts() {
        let full = SearchCandidate {
            name: "Portland".into(),
            state: Some("Oregon".into()),
            country: "US".into(),
            lat: 45.5,
            lon: -122.6,
        };
        assert_eq!(full.label(), "Portland, Oregon, US");

        let bare = SearchCandidate { state: None, country: String::new(), ..full };
        assert_eq!(bare.label(), "Portland");
    }

    #[test]
    fn snapshot_without_forecast_deserializes() {
        let json = serde_json::json!({
            "location": {
                "name": "Oslo", "region": null, "country": "NO",
                "lat": 59.9, "lon": 10.7, "localtime": "2024-01-01T12:00:00.000Z"
            },
            "current": {
                "temp_c": 1, "temp_f": 34, "feelslike_c": -2, "feelslike_f": 28,
                "condition": { "text": "snow", "icon": "13d", "code": 600 },
                "wind_kph": 4, "wind_mph": 2, "wind_degree": 90, "wind_dir": "E",
                "gust_kph": 0, "gust_mph": 0, "pressure_mb": 1000, "pressure_in": 29.53,
                "precip_mm": 0.0, "precip_in": 0.0, "humidity": 90, "cloud": 100,
                "vis_km": 3, "vis_miles": 2, "uv": 1,
                "last_updated": "2024-01-01T12:00:00.000Z"
            }
        });

        let snapshot: WeatherSnapshot = serde_json::from_value(json).expect("valid snapshot");
        assert!(snapshot.forecast.is_empty());
        assert_eq!(snapshot.current.condition.code, 600);
    }
}
