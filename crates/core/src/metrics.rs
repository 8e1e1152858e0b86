//! Prometheus metrics for the resolution engine.

use once_cell::sync::Lazy;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts,
};

/// Background searches scheduled.
pub static SEARCHES_STARTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "lodestone_searches_started_total",
        "Total background magnet searches scheduled",
    )
    .unwrap()
});

/// Finished searches by terminal status.
pub static SEARCHES_COMPLETED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lodestone_searches_completed_total",
            "Total background magnet searches finished",
        ),
        &["result"], // "completed", "not_found", "failed"
    )
    .unwrap()
});

/// Candidates returned per tracker aggregator query.
pub static TRACKER_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "lodestone_tracker_results",
            "Number of results returned per tracker query",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
    )
    .unwrap()
});

/// DHT fallback lookups by outcome.
pub static DHT_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lodestone_dht_lookups_total", "Total DHT fallback lookups"),
        &["result"], // "hit", "empty", "error"
    )
    .unwrap()
});

/// End-to-end resolution duration in seconds.
pub static RESOLUTION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "lodestone_resolution_duration_seconds",
            "Duration of magnet resolutions",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["result"],
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCHES_STARTED.clone()),
        Box::new(SEARCHES_COMPLETED.clone()),
        Box::new(TRACKER_RESULTS.clone()),
        Box::new(DHT_LOOKUPS.clone()),
        Box::new(RESOLUTION_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
    }
}
