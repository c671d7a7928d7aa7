//! Synthetic weather for demos and test fixtures.
//!
//! Values are drawn from fixed ranges into a provider-shaped payload, and
//! snapshots are that payload run through [`normalize_at`], so a generated
//! snapshot satisfies every conversion equality a live one does. Seed the
//! generator to get the same fixtures on every run.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    model::{Condition, RawProviderPayload, WeatherSnapshot},
    normalize::{Readings, normalize_at},
    provider::openweather::{
        OwCity, OwClouds, OwCoord, OwCurrent, OwForecast, OwForecastEntry, OwMain, OwRain, OwSys,
        OwWeather, OwWind,
    },
};

/// (code, description, icon) in provider terms.
const CONDITIONS: [(i32, &str, &str); 7] = [
    (800, "clear sky", "01d"),
    (801, "few clouds", "02d"),
    (802, "scattered clouds", "03d"),
    (804, "overcast clouds", "04d"),
    (500, "light rain", "10d"),
    (501, "moderate rain", "10d"),
    (211, "thunderstorm", "11d"),
];

const BASE_LAT: f64 = 40.7128;
const BASE_LON: f64 = -74.0060;

const FORECAST_STEP_SECS: i64 = 3 * 3600;
const FORECAST_ENTRIES: i64 = 16;

#[derive(Debug)]
pub struct MockGenerator<R> {
    rng: R,
}

impl MockGenerator<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> MockGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn condition(&mut self) -> Condition {
        let (code, text, icon) = CONDITIONS[self.rng.gen_range(0..CONDITIONS.len())];
        Condition {
            text: text.to_string(),
            icon: icon.to_string(),
            code,
        }
    }

    fn readings(&mut self) -> Readings {
        let temp_c = self.rng.gen_range(20.0..40.0);
        let wind_kph = self.rng.gen_range(5.0..30.0);

        Readings {
            temp_c,
            feelslike_c: temp_c + self.rng.gen_range(-2.5..2.5),
            condition: self.condition(),
            wind_kph,
            wind_degree: f64::from(self.rng.gen_range(0u16..360)),
            gust_kph: wind_kph + self.rng.gen_range(0.0..10.0),
            pressure_mb: self.rng.gen_range(1000.0..1050.0),
            precip_mm: self.rng.gen_range(0.0..10.0),
            humidity: self.rng.gen_range(40.0..80.0),
            cloud: self.rng.gen_range(0.0..=100.0),
            vis_km: self.rng.gen_range(5.0..20.0),
        }
    }

    fn position(&mut self) -> (f64, f64) {
        (
            BASE_LAT + self.rng.gen_range(-5.0..5.0),
            BASE_LON + self.rng.gen_range(-5.0..5.0),
        )
    }

    /// A complete snapshot for `city`, stamped at `now` in UTC.
    pub fn snapshot(&mut self, city: &str, country: &str, now: DateTime<Utc>) -> WeatherSnapshot {
        normalize_at(&self.raw_payload(city, country, now), now)
    }

    /// A provider-shaped payload with a two-day, 3-hourly forecast starting at `now`.
    pub fn raw_payload(&mut self, city: &str, country: &str, now: DateTime<Utc>) -> RawProviderPayload {
        let (lat, lon) = self.position();
        let r = self.readings();

        let current = OwCurrent {
            coord: Some(OwCoord {
                lat: Some(lat),
                lon: Some(lon),
            }),
            weather: Some(vec![ow_weather(&r.condition)]),
            main: Some(OwMain {
                temp: Some(r.temp_c),
                feels_like: Some(r.feelslike_c),
                pressure: Some(r.pressure_mb),
                humidity: Some(r.humidity),
            }),
            visibility: Some(r.vis_km * 1000.0),
            wind: Some(OwWind {
                speed: Some(r.wind_kph),
                deg: Some(r.wind_degree),
                gust: Some(r.gust_kph),
            }),
            clouds: Some(OwClouds { all: Some(r.cloud) }),
            rain: Some(OwRain {
                one_hour: Some(r.precip_mm),
                three_hours: None,
            }),
            dt: Some(now.timestamp()),
            sys: Some(OwSys {
                country: Some(country.to_string()),
            }),
            timezone: Some(0),
            name: Some(city.to_string()),
        };

        let list = (0..FORECAST_ENTRIES)
            .map(|step| {
                let temp = r.temp_c + self.rng.gen_range(-6.0..6.0);
                let condition = self.condition();
                OwForecastEntry {
                    dt: Some(now.timestamp() + step * FORECAST_STEP_SECS),
                    main: Some(OwMain {
                        temp: Some(temp),
                        ..OwMain::default()
                    }),
                    weather: Some(vec![ow_weather(&condition)]),
                    rain: Some(OwRain {
                        one_hour: None,
                        three_hours: Some(self.rng.gen_range(0.0..3.0)),
                    }),
                }
            })
            .collect();

        RawProviderPayload {
            current,
            forecast: Some(OwForecast {
                list: Some(list),
                city: Some(OwCity {
                    name: Some(city.to_string()),
                    country: Some(country.to_string()),
                    timezone: Some(0),
                }),
            }),
        }
    }
}

fn ow_weather(condition: &Condition) -> OwWeather {
    OwWeather {
        id: Some(condition.code),
        main: None,
        description: Some(condition.text.clone()),
        icon: Some(condition.icon.clone()),
    }
}
