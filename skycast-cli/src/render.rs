//! Plain-text rendering of the dashboard views.

use chrono::DateTime;
use clap::ValueEnum;
use skycast_core::{
    SearchCandidate, WeatherSnapshot,
    classify::{
        ConditionKind, HumidityLevel, TemperatureBand, UvLevel, VisibilityLevel, wind_arrow,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    #[default]
    Overview,
    Location,
    Wind,
    Humidity,
    Temperature,
}

pub fn render(snapshot: &WeatherSnapshot, view: View) -> String {
    let lines = match view {
        View::Overview => overview(snapshot),
        View::Location => location(snapshot),
        View::Wind => wind(snapshot),
        View::Humidity => humidity(snapshot),
        View::Temperature => temperature(snapshot),
    };
    lines.join("\n")
}

pub fn render_candidates(candidates: &[SearchCandidate]) -> String {
    if candidates.is_empty() {
        return "No matching places.".to_string();
    }
    candidates
        .iter()
        .map(|c| format!("{}  ({:.4}, {:.4})", c.label(), c.lat, c.lon))
        .collect::<Vec<_>>()
        .join("\n")
}

fn heading(snapshot: &WeatherSnapshot) -> String {
    let loc = &snapshot.location;
    if loc.country.is_empty() {
        loc.name.clone()
    } else {
        format!("{}, {}", loc.name, loc.country)
    }
}

fn sky_icon(kind: ConditionKind) -> &'static str {
    match kind {
        ConditionKind::Clear => "☀",
        ConditionKind::PartlyCloudy => "⛅",
        ConditionKind::Rain => "🌧",
        ConditionKind::Thunderstorm => "⛈",
        ConditionKind::Snow => "❄",
        ConditionKind::Fog => "🌫",
        ConditionKind::Wind => "🌬",
        ConditionKind::Cloudy | ConditionKind::Other => "☁",
    }
}

/// "03:45 PM" when the stamp parses, otherwise the stamp as given.
fn clock(stamp: &str) -> String {
    DateTime::parse_from_rfc3339(stamp)
        .map(|t| t.format("%I:%M %p").to_string())
        .unwrap_or_else(|_| stamp.to_string())
}

fn overview(s: &WeatherSnapshot) -> Vec<String> {
    let c = &s.current;
    let kind = ConditionKind::from_text(&c.condition.text);

    vec![
        heading(s),
        format!(
            "{} {}°C / {}°F  {}",
            sky_icon(kind),
            c.temp_c,
            c.temp_f,
            c.condition.text
        ),
        format!("Feels like {}°C / {}°F", c.feelslike_c, c.feelslike_f),
        format!(
            "Humidity {}% ({})  Wind {} km/h {} {}  UV {} ({})",
            c.humidity,
            HumidityLevel::from_percent(f64::from(c.humidity)),
            c.wind_kph,
            wind_arrow(&c.wind_dir),
            c.wind_dir,
            c.uv,
            UvLevel::from_index(f64::from(c.uv)),
        ),
        format!("Updated {}", clock(&c.last_updated)),
    ]
}

fn location(s: &WeatherSnapshot) -> Vec<String> {
    let loc = &s.location;
    let mut lines = vec![format!("📍 {}", heading(s))];
    if let Some(region) = loc.region.as_deref().filter(|r| !r.is_empty()) {
        lines.push(format!("Region: {region}"));
    }
    lines.push(format!("Coordinates: {:.4}, {:.4}", loc.lat, loc.lon));
    lines.push(format!("Local time: {}", clock(&loc.localtime)));
    lines.push(format!("Last updated: {}", s.current.last_updated));
    lines
}

fn wind(s: &WeatherSnapshot) -> Vec<String> {
    let c = &s.current;
    vec![
        format!("🌬 Wind in {}", heading(s)),
        format!("Speed: {} km/h ({} mph)", c.wind_kph, c.wind_mph),
        format!(
            "Direction: {} {} ({}°)",
            wind_arrow(&c.wind_dir),
            c.wind_dir,
            c.wind_degree
        ),
        format!("Gusts: {} km/h ({} mph)", c.gust_kph, c.gust_mph),
        format!("Pressure: {} mb ({} inHg)", c.pressure_mb, c.pressure_in),
        format!("Cloud cover: {}%", c.cloud),
    ]
}

fn humidity(s: &WeatherSnapshot) -> Vec<String> {
    let c = &s.current;
    vec![
        format!("💧 Humidity in {}", heading(s)),
        format!(
            "Humidity: {}% ({})",
            c.humidity,
            HumidityLevel::from_percent(f64::from(c.humidity))
        ),
        format!("Precipitation: {} mm ({} in)", c.precip_mm, c.precip_in),
        format!("Cloud cover: {}%", c.cloud),
        format!("Condition: {}", c.condition.text),
    ]
}

fn temperature(s: &WeatherSnapshot) -> Vec<String> {
    let c = &s.current;
    let today = s.forecast.first();
    let range = |value: Option<(i32, i32)>| match value {
        Some((celsius, fahrenheit)) => format!("{celsius}°C ({fahrenheit}°F)"),
        None => "N/A".to_string(),
    };

    vec![
        format!("🌡 Temperature & visibility in {}", heading(s)),
        format!(
            "Current: {}°C / {}°F [{}]",
            c.temp_c,
            c.temp_f,
            TemperatureBand::from_celsius(f64::from(c.temp_c)).tag()
        ),
        format!("Feels like: {}°C / {}°F", c.feelslike_c, c.feelslike_f),
        format!("High: {}", range(today.map(|d| (d.maxtemp_c, d.maxtemp_f)))),
        format!("Low: {}", range(today.map(|d| (d.mintemp_c, d.mintemp_f)))),
        format!(
            "Visibility: {} km ({} mi), {}",
            c.vis_km,
            c.vis_miles,
            VisibilityLevel::from_km(f64::from(c.vis_km))
        ),
        format!(
            "UV index: {} ({}, estimated)",
            c.uv,
            UvLevel::from_index(f64::from(c.uv))
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use skycast_core::{mock::MockGenerator, normalize_at};

    fn snapshot() -> WeatherSnapshot {
        let now = Utc.with_ymd_and_hms(2024, 7, 4, 15, 30, 0).unwrap();
        let raw = MockGenerator::seeded(42).raw_payload("Lisbon", "PT", now);
        normalize_at(&raw, now)
    }

    #[test]
    fn every_view_names_the_place() {
        let s = snapshot();
        for view in View::value_variants() {
            let text = render(&s, *view);
            assert!(text.contains("Lisbon, PT"), "{view:?}: {text}");
        }
    }

    #[test]
    fn overview_shows_both_temperature_units() {
        let s = snapshot();
        let text = render(&s, View::Overview);
        assert!(text.contains(&format!("{}°C / {}°F", s.current.temp_c, s.current.temp_f)));
        assert!(text.contains("Updated 03:30 PM"));
    }

    #[test]
    fn temperature_view_uses_forecast_range() {
        let mut s = snapshot();
        let text = render(&s, View::Temperature);
        assert!(text.contains(&format!("High: {}°C", s.forecast[0].maxtemp_c)));

        s.forecast.clear();
        let text = render(&s, View::Temperature);
        assert!(text.contains("High: N/A"));
        assert!(text.contains("Low: N/A"));
    }

    #[test]
    fn wind_view_has_arrow_and_label() {
        let s = snapshot();
        let text = render(&s, View::Wind);
        let expected = format!("{} {}", wind_arrow(&s.current.wind_dir), s.current.wind_dir);
        assert!(text.contains(&expected));
    }

    #[test]
    fn clock_falls_back_to_raw_stamp() {
        assert_eq!(clock("2024-01-01T00:05:00.000Z"), "12:05 AM");
        assert_eq!(clock("garbage"), "garbage");
    }

    #[test]
    fn empty_candidate_list_message() {
        assert_eq!(render_candidates(&[]), "No matching places.");
    }
}
