//! Entry points used by the presentation layer.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    model::{SearchCandidate, WeatherSnapshot},
    normalize::normalize,
    provider::{FetchError, WeatherProvider},
};

/// Queries shorter than this (after trimming) produce no suggestions.
pub const MIN_SUGGEST_CHARS: usize = 2;

/// Fetch-and-normalize over an injected provider, holding the latest snapshot.
///
/// A new snapshot replaces the previous one wholesale. Overlapping lookups are
/// not serialized; whichever finishes last is what [`WeatherService::current`]
/// returns. A failed lookup leaves the previous snapshot in place.
#[derive(Debug)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    latest: watch::Sender<Option<Arc<WeatherSnapshot>>>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (latest, _) = watch::channel(None);
        Self { provider, latest }
    }

    pub async fn snapshot_for_place(
        &self,
        place: &str,
        country_hint: Option<&str>,
    ) -> Result<Arc<WeatherSnapshot>, FetchError> {
        let raw = self
            .provider
            .fetch_current_by_name(place, country_hint)
            .await
            .inspect_err(|e| warn!(place, error = %e, "weather lookup failed"))?;

        Ok(self.publish(normalize(&raw)))
    }

    pub async fn snapshot_for_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Arc<WeatherSnapshot>, FetchError> {
        let raw = self
            .provider
            .fetch_current_by_coords(lat, lon)
            .await
            .inspect_err(|e| warn!(lat, lon, error = %e, "weather lookup failed"))?;

        Ok(self.publish(normalize(&raw)))
    }

    /// Place suggestions for a partial name. Never fails; short or blank
    /// queries return nothing without contacting the provider.
    pub async fn suggest(&self, query: &str) -> Vec<SearchCandidate> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_CHARS {
            return Vec::new();
        }
        self.provider.search_places(query).await
    }

    pub fn current(&self) -> Option<Arc<WeatherSnapshot>> {
        self.latest.borrow().clone()
    }

    /// Observe snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<WeatherSnapshot>>> {
        self.latest.subscribe()
    }

    fn publish(&self, snapshot: WeatherSnapshot) -> Arc<WeatherSnapshot> {
        let snapshot = Arc::new(snapshot);
        info!(place = %snapshot.location.name, "weather snapshot updated");
        self.latest.send_replace(Some(Arc::clone(&snapshot)));
        snapshot
    }
}
