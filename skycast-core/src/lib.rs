//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - The fetch adapter over the weather provider (live and synthetic)
//! - Normalization of raw provider payloads into immutable snapshots
//! - Unit conversions, derived metrics and display classifications
//! - Configuration & credentials handling
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod classify;
pub mod config;
pub mod convert;
pub mod debounce;
pub mod mock;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;

pub use config::Config;
pub use model::{
    Condition, CurrentConditions, ForecastDay, Place, RawProviderPayload, SearchCandidate,
    WeatherSnapshot,
};
pub use normalize::{normalize, normalize_at};
pub use provider::{FetchError, WeatherProvider};
pub use service::WeatherService;
