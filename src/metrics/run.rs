use std::time::Duration;

use tokio::time::Instant;

use super::stats::{LatencyStats, throughput_kbps};
use super::Measurement;

/// Running totals for one benchmark.
///
/// Only the task draining the result queue mutates a run; probe tasks hand
/// their [`Measurement`]s over the queue and never touch it directly.
#[derive(Debug)]
pub struct BenchmarkRun {
    success_count: u64,
    failure_count: u64,
    transferred_bytes: u64,
    latencies: Vec<Duration>,
    started_at: Instant,
    ended_at: Option<Instant>,
}

impl Default for BenchmarkRun {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkRun {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Starts a run, reserving room for `expected` latencies.
    #[must_use]
    pub fn with_capacity(expected: u64) -> Self {
        let capacity = usize::try_from(expected).unwrap_or(0);
        Self {
            success_count: 0,
            failure_count: 0,
            transferred_bytes: 0,
            latencies: Vec::with_capacity(capacity),
            started_at: Instant::now(),
            ended_at: None,
        }
    }

    pub fn record(&mut self, measurement: Measurement) {
        if measurement.is_success() {
            self.success_count = self.success_count.saturating_add(1);
            self.latencies.push(measurement.duration);
        } else {
            self.failure_count = self.failure_count.saturating_add(1);
        }
        self.transferred_bytes = self
            .transferred_bytes
            .saturating_add(measurement.reply_size);
    }

    /// Marks the end of the run. Later calls keep the first timestamp.
    pub fn stop(&mut self) {
        if self.ended_at.is_none() {
            self.ended_at = Some(Instant::now());
        }
    }

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.ended_at.is_some()
    }

    #[must_use]
    pub const fn success_count(&self) -> u64 {
        self.success_count
    }

    #[must_use]
    pub const fn failure_count(&self) -> u64 {
        self.failure_count
    }

    #[must_use]
    pub const fn recorded(&self) -> u64 {
        self.success_count.saturating_add(self.failure_count)
    }

    #[must_use]
    pub const fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes
    }

    /// Durations of successful requests in arrival order.
    #[must_use]
    pub fn latencies(&self) -> &[Duration] {
        &self.latencies
    }

    /// Wall-clock time between construction and [`stop`](Self::stop), or
    /// until now while the run is still accumulating.
    #[must_use]
    pub fn elapsed_time(&self) -> Duration {
        self.ended_at.map_or_else(
            || self.started_at.elapsed(),
            |ended_at| ended_at.duration_since(self.started_at),
        )
    }

    #[must_use]
    pub fn throughput_kbps(&self) -> u64 {
        throughput_kbps(self.transferred_bytes, self.elapsed_time())
    }

    /// Latency statistics over successful requests, `None` when there were none.
    #[must_use]
    pub fn latency_stats(&self) -> Option<LatencyStats> {
        LatencyStats::compute(&self.latencies)
    }
}
