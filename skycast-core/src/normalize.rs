//! Raw provider payload → [`WeatherSnapshot`].
//!
//! Normalization never fails. Each absent field falls back to a fixed default
//! (0 for measurements, 10 km visibility, "Unknown" condition text). Every
//! secondary unit is computed from the unrounded canonical reading, so °F is
//! `round(c * 9 / 5 + 32)` on the provider's Celsius, not on the stored integer.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeDelta, Timelike, Utc};

use crate::{
    convert::{
        celsius_to_fahrenheit, compass_direction, estimate_uv_index, km_to_miles, kph_to_mph,
        mb_to_inhg, mm_to_inches, round_2dp, round_half_up, round_to_i32,
    },
    model::{Condition, CurrentConditions, ForecastDay, Place, RawProviderPayload, WeatherSnapshot},
    provider::openweather::{OwCurrent, OwForecast, OwRain, OwWeather},
};

pub const DEFAULT_VISIBILITY_KM: f64 = 10.0;
pub const UNKNOWN_CONDITION: &str = "Unknown";
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Canonical-unit measurements before rounding and unit derivation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Readings {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub wind_degree: f64,
    pub gust_kph: f64,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub humidity: f64,
    pub cloud: f64,
    pub vis_km: f64,
}

impl Readings {
    /// Round each reading for storage; secondary units are derived from the
    /// unrounded reading and rounded on their own.
    pub(crate) fn into_current(self, last_updated: String) -> CurrentConditions {
        let wind_degree = bearing(self.wind_degree);

        CurrentConditions {
            temp_c: round_to_i32(self.temp_c),
            temp_f: celsius_to_fahrenheit(self.temp_c),
            feelslike_c: round_to_i32(self.feelslike_c),
            feelslike_f: celsius_to_fahrenheit(self.feelslike_c),
            wind_kph: round_to_i32(self.wind_kph),
            wind_mph: kph_to_mph(self.wind_kph),
            wind_degree,
            wind_dir: compass_direction(f64::from(wind_degree)).to_string(),
            gust_kph: round_to_i32(self.gust_kph),
            gust_mph: kph_to_mph(self.gust_kph),
            pressure_mb: round_to_i32(self.pressure_mb),
            pressure_in: mb_to_inhg(self.pressure_mb),
            precip_mm: round_2dp(self.precip_mm),
            precip_in: mm_to_inches(self.precip_mm),
            vis_km: round_to_i32(self.vis_km),
            vis_miles: km_to_miles(self.vis_km),
            humidity: percent(self.humidity),
            cloud: percent(self.cloud),
            uv: estimate_uv_index(self.temp_c, self.condition.code),
            condition: self.condition,
            last_updated,
        }
    }
}

/// Normalize using the current wall clock for the local-time stamp.
pub fn normalize(raw: &RawProviderPayload) -> WeatherSnapshot {
    normalize_at(raw, Utc::now())
}

/// Normalize against a fixed capture instant.
pub fn normalize_at(raw: &RawProviderPayload, now: DateTime<Utc>) -> WeatherSnapshot {
    let current = &raw.current;
    let localtime = local_timestamp(now, current.timezone.unwrap_or(0));

    WeatherSnapshot {
        location: place(current, localtime.clone()),
        current: readings(current).into_current(localtime),
        forecast: raw.forecast.as_ref().map(daily_forecast).unwrap_or_default(),
    }
}

fn place(current: &OwCurrent, localtime: String) -> Place {
    let coord = current.coord.clone().unwrap_or_default();

    Place {
        name: current
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        region: None,
        country: current
            .sys
            .as_ref()
            .and_then(|s| s.country.clone())
            .unwrap_or_default(),
        lat: coord.lat.unwrap_or(0.0).clamp(-90.0, 90.0),
        lon: coord.lon.unwrap_or(0.0).clamp(-180.0, 180.0),
        localtime,
    }
}

fn readings(current: &OwCurrent) -> Readings {
    let main = current.main.clone().unwrap_or_default();
    let wind = current.wind.clone().unwrap_or_default();

    Readings {
        temp_c: main.temp.unwrap_or(0.0),
        feelslike_c: main.feels_like.unwrap_or(0.0),
        condition: condition(current.weather.as_deref()),
        // Taken as km/h as delivered.
        wind_kph: wind.speed.unwrap_or(0.0),
        wind_degree: wind.deg.unwrap_or(0.0),
        gust_kph: wind.gust.unwrap_or(0.0),
        pressure_mb: main.pressure.unwrap_or(0.0),
        precip_mm: rain_mm(current.rain.as_ref()),
        humidity: main.humidity.unwrap_or(0.0),
        cloud: current.clouds.as_ref().and_then(|c| c.all).unwrap_or(0.0),
        // A reported 0 counts as absent, like a zero one-hour rain volume.
        vis_km: current
            .visibility
            .filter(|metres| *metres != 0.0)
            .map_or(DEFAULT_VISIBILITY_KM, |metres| metres / 1000.0),
    }
}

/// First weather entry; description, else the main category, else "Unknown".
fn condition(weather: Option<&[OwWeather]>) -> Condition {
    let first = weather.and_then(<[OwWeather]>::first);
    let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.trim().is_empty());

    Condition {
        text: first
            .and_then(|w| non_empty(&w.description).or_else(|| non_empty(&w.main)))
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string()),
        icon: first.and_then(|w| w.icon.clone()).unwrap_or_default(),
        code: first.and_then(|w| w.id).unwrap_or(0),
    }
}

/// One-hour volume when reported and non-zero, otherwise the three-hour volume.
fn rain_mm(rain: Option<&OwRain>) -> f64 {
    let Some(rain) = rain else {
        return 0.0;
    };
    rain.one_hour
        .filter(|mm| *mm != 0.0)
        .or(rain.three_hours)
        .unwrap_or(0.0)
}

fn bearing(degrees: f64) -> u16 {
    if !degrees.is_finite() {
        return 0;
    }
    round_half_up(degrees).rem_euclid(360.0) as u16
}

fn percent(value: f64) -> u8 {
    round_half_up(value).clamp(0.0, 100.0) as u8
}

/// `now` shifted by the provider's UTC offset, as an ISO-8601 string with a
/// `Z` suffix. Offsets chrono cannot represent are ignored.
pub fn local_timestamp(now: DateTime<Utc>, utc_offset_secs: i64) -> String {
    TimeDelta::try_seconds(utc_offset_secs)
        .and_then(|offset| now.checked_add_signed(offset))
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug)]
struct DayAccumulator {
    min_c: f64,
    max_c: f64,
    precip_mm: f64,
    /// Seconds from local noon of the entry whose condition is kept.
    noon_distance: u32,
    condition: Condition,
}

/// Group 3-hourly entries by provider-local date.
fn daily_forecast(forecast: &OwForecast) -> Vec<ForecastDay> {
    let offset = forecast.city.as_ref().and_then(|c| c.timezone).unwrap_or(0);
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for entry in forecast.list.as_deref().unwrap_or_default() {
        let Some(local) = entry
            .dt
            .and_then(|dt| dt.checked_add(offset))
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
        else {
            continue;
        };
        let Some(temp) = entry.main.as_ref().and_then(|m| m.temp) else {
            continue;
        };

        let noon_distance = local.num_seconds_from_midnight().abs_diff(12 * 3600);
        let precip = rain_mm(entry.rain.as_ref());
        let day = days.entry(local.date_naive()).or_insert_with(|| DayAccumulator {
            min_c: temp,
            max_c: temp,
            precip_mm: 0.0,
            noon_distance: u32::MAX,
            condition: condition(None),
        });

        day.min_c = day.min_c.min(temp);
        day.max_c = day.max_c.max(temp);
        day.precip_mm += precip;
        if noon_distance < day.noon_distance {
            day.noon_distance = noon_distance;
            day.condition = condition(entry.weather.as_deref());
        }
    }

    days.into_iter()
        .map(|(date, day)| ForecastDay {
            date,
            maxtemp_c: round_to_i32(day.max_c),
            maxtemp_f: celsius_to_fahrenheit(day.max_c),
            mintemp_c: round_to_i32(day.min_c),
            mintemp_f: celsius_to_fahrenheit(day.min_c),
            total_precip_mm: round_2dp(day.precip_mm),
            total_precip_in: mm_to_inches(day.precip_mm),
            condition: day.condition,
        })
        .collect()
}
