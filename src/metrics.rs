//! Prediction counters and latency statistics.

use crate::types::outcome::RiskLabel;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for served predictions
pub struct PredictionMetrics {
    /// Predictions labelled lower likelihood
    pub lower_predictions: AtomicU64,
    /// Predictions labelled higher likelihood
    pub higher_predictions: AtomicU64,
    /// Requests that failed validation or inference
    pub failed_predictions: AtomicU64,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Start time for uptime reporting
    start_time: Instant,
}

impl PredictionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            lower_predictions: AtomicU64::new(0),
            higher_predictions: AtomicU64::new(0),
            failed_predictions: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a served prediction
    pub fn record_prediction(&self, label: RiskLabel, latency: Duration) {
        match label {
            RiskLabel::Lower => self.lower_predictions.fetch_add(1, Ordering::Relaxed),
            RiskLabel::Higher => self.higher_predictions.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut times) = self.latencies.write() {
            times.push(latency.as_micros() as u64);
            // Keep only last 10000
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Record a rejected or failed request
    pub fn record_failure(&self) {
        self.failed_predictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Total successful predictions
    pub fn total_predictions(&self) -> u64 {
        self.lower_predictions.load(Ordering::Relaxed)
            + self.higher_predictions.load(Ordering::Relaxed)
    }

    /// Get latency statistics
    pub fn get_latency_stats(&self) -> LatencyStats {
        let sorted = match self.latencies.read() {
            Ok(times) if !times.is_empty() => {
                let mut sorted = times.clone();
                sorted.sort_unstable();
                sorted
            }
            _ => return LatencyStats::default(),
        };

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: percentile(0.50),
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let latency = self.get_latency_stats();
        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            predictions = self.total_predictions(),
            lower = self.lower_predictions.load(Ordering::Relaxed),
            higher = self.higher_predictions.load(Ordering::Relaxed),
            failed = self.failed_predictions.load(Ordering::Relaxed),
            mean_us = latency.mean_us,
            p50_us = latency.p50_us,
            p95_us = latency.p95_us,
            p99_us = latency.p99_us,
            max_us = latency.max_us,
            "Prediction metrics summary"
        );
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prediction latency statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}
