//! Trailing-edge debounce for search-as-you-type.

use std::time::Duration;

use tokio::{sync::mpsc, time};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// Sending half; cheap to clone, never blocks.
#[derive(Debug, Clone)]
pub struct QueryInput {
    tx: mpsc::UnboundedSender<String>,
}

impl QueryInput {
    /// Returns `false` once the [`Debouncer`] has been dropped.
    pub fn push(&self, query: impl Into<String>) -> bool {
        self.tx.send(query.into()).is_ok()
    }
}

/// Receiving half: yields only the last query of each burst.
#[derive(Debug)]
pub struct Debouncer {
    rx: mpsc::UnboundedReceiver<String>,
    delay: Duration,
}

pub fn channel(delay: Duration) -> (QueryInput, Debouncer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueryInput { tx }, Debouncer { rx, delay })
}

impl Debouncer {
    /// Wait for a query, then keep replacing it until `delay` passes with no
    /// newer one. A burst cut short by the input closing still yields its last
    /// query. `None` once all inputs are gone and nothing is pending.
    pub async fn next(&mut self) -> Option<String> {
        let mut pending = self.rx.recv().await?;
        loop {
            match time::timeout(self.delay, self.rx.recv()).await {
                Ok(Some(newer)) => pending = newer,
                Ok(None) | Err(_) => return Some(pending),
            }
        }
    }
}
