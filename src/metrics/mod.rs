//! Metrics collection module
//!
//! Observes what the suggestion client absorbs: requests issued, failures by
//! kind, and response times.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Keep this many response times for the rolling average
const RESPONSE_TIME_WINDOW: usize = 100;

/// Request metrics collector
#[derive(Debug)]
pub struct Metrics {
    /// Requests issued against the endpoint
    requests: AtomicU64,
    /// Requests that produced a suggestion list
    successes: AtomicU64,
    /// Failures by kind (see `FetchError::kind`)
    failures: RwLock<HashMap<&'static str, u64>>,
    /// Recent response times in ms
    response_times: RwLock<Vec<u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            failures: RwLock::new(HashMap::new()),
            response_times: RwLock::new(Vec::new()),
        }
    }

    /// Record an issued request
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful response and its duration
    pub fn record_success(&self, time_ms: u64) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.record_response_time(time_ms);
    }

    /// Record a failure of the given kind
    pub fn record_failure(&self, kind: &'static str) {
        if let Ok(mut failures) = self.failures.write() {
            *failures.entry(kind).or_insert(0) += 1;
        }
    }

    fn record_response_time(&self, time_ms: u64) {
        if let Ok(mut times) = self.response_times.write() {
            if times.len() >= RESPONSE_TIME_WINDOW {
                times.remove(0);
            }
            times.push(time_ms);
        }
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    /// Failure count for one kind
    pub fn failures(&self, kind: &str) -> u64 {
        self.failures
            .read()
            .map(|f| f.get(kind).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Failure count across all kinds
    pub fn total_failures(&self) -> u64 {
        self.failures
            .read()
            .map(|f| f.values().sum())
            .unwrap_or(0)
    }

    /// Average response time over the rolling window
    pub fn avg_response_time(&self) -> Option<u64> {
        let times = self.response_times.read().ok()?;
        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    /// Percentage of requests that succeeded
    pub fn reliability(&self) -> f64 {
        let total = self.successes() + self.total_failures();
        if total == 0 {
            100.0
        } else {
            (self.successes() as f64 / total as f64) * 100.0
        }
    }

    /// Snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests(),
            successes: self.successes(),
            failures: self.total_failures(),
            avg_response_time: self.avg_response_time(),
            reliability: self.reliability(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.record_request();
        metrics.record_success(100);
        metrics.record_request();
        metrics.record_failure("timeout");

        assert_eq!(metrics.requests(), 2);
        assert_eq!(metrics.successes(), 1);
        assert_eq!(metrics.failures("timeout"), 1);
        assert_eq!(metrics.failures("parse"), 0);
        assert_eq!(metrics.avg_response_time(), Some(100));
        assert_eq!(metrics.reliability(), 50.0);
    }

    #[test]
    fn test_response_time_window() {
        let metrics = Metrics::new();
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_success(10);
        }
        metrics.record_success(10 + RESPONSE_TIME_WINDOW as u64);
        assert_eq!(metrics.avg_response_time(), Some(11));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Metrics::new().snapshot();
        assert_eq!(snapshot.requests, 0);
        assert_eq!(snapshot.avg_response_time, None);
        assert_eq!(snapshot.reliability, 100.0);
    }
}
