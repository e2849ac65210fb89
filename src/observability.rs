//! Logging setup and request counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

use crate::dispatch::Outcome;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    matched: AtomicU64,
    provided: AtomicU64,
    not_found: AtomicU64,
    not_configured: AtomicU64,
    settings_saved: AtomicU64,
    fields_rejected: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one served well-known request
    pub fn record(&self, outcome: Outcome) {
        let (counter, name) = match outcome {
            Outcome::Matched { .. } => (&self.matched, "matched"),
            Outcome::Provided => (&self.provided, "provided"),
            Outcome::NotFound => (&self.not_found, "not_found"),
            Outcome::NotConfigured => (&self.not_configured, "not_configured"),
        };
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = name, "Metric incremented");
    }

    pub fn settings_saved(&self, rejected_fields: usize) {
        self.settings_saved.fetch_add(1, Ordering::Relaxed);
        self.fields_rejected
            .fetch_add(rejected_fields as u64, Ordering::Relaxed);
        tracing::debug!(counter = "settings_saved", rejected_fields, "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            matched: self.matched.load(Ordering::Relaxed),
            provided: self.provided.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            not_configured: self.not_configured.load(Ordering::Relaxed),
            settings_saved: self.settings_saved.load(Ordering::Relaxed),
            fields_rejected: self.fields_rejected.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub matched: u64,
    pub provided: u64,
    pub not_found: u64,
    pub not_configured: u64,
    pub settings_saved: u64,
    pub fields_rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.record(Outcome::Matched { index: 2 });
        metrics.record(Outcome::NotFound);
        metrics.record(Outcome::NotFound);
        metrics.settings_saved(3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.matched, 1);
        assert_eq!(snapshot.not_found, 2);
        assert_eq!(snapshot.not_configured, 0);
        assert_eq!(snapshot.settings_saved, 1);
        assert_eq!(snapshot.fields_rejected, 3);
    }
}
