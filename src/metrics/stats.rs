use std::time::Duration;

use serde::{Serialize, Serializer};

const BYTES_PER_KILOBYTE: u128 = 1024;
const NANOS_PER_SEC: u128 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencyStats {
    #[serde(rename = "slowest_ns", serialize_with = "serialize_nanos")]
    pub slowest: Duration,
    #[serde(rename = "median_ns", serialize_with = "serialize_nanos")]
    pub median: Duration,
    #[serde(rename = "fastest_ns", serialize_with = "serialize_nanos")]
    pub fastest: Duration,
    #[serde(rename = "average_ns", serialize_with = "serialize_nanos")]
    pub average: Duration,
    #[serde(rename = "standard_deviation_ns", serialize_with = "serialize_nanos")]
    pub standard_deviation: Duration,
    #[serde(rename = "total_ns", serialize_with = "serialize_nanos")]
    pub total: Duration,
}

impl LatencyStats {
    /// Computes every statistic over `latencies`; `None` for an empty slice.
    #[must_use]
    pub fn compute(latencies: &[Duration]) -> Option<Self> {
        Some(Self {
            slowest: slowest_latency(latencies)?,
            median: median_latency(latencies)?,
            fastest: fastest_latency(latencies)?,
            average: average_latency(latencies)?,
            standard_deviation: standard_deviation(latencies)?,
            total: total_latency(latencies),
        })
    }
}

#[must_use]
pub fn total_latency(latencies: &[Duration]) -> Duration {
    latencies
        .iter()
        .fold(Duration::ZERO, |sum, latency| sum.saturating_add(*latency))
}

/// Mean latency with the nanosecond count floored.
#[must_use]
pub fn average_latency(latencies: &[Duration]) -> Option<Duration> {
    mean_nanos(latencies).map(duration_from_nanos)
}

#[must_use]
pub fn slowest_latency(latencies: &[Duration]) -> Option<Duration> {
    latencies.iter().copied().max()
}

#[must_use]
pub fn fastest_latency(latencies: &[Duration]) -> Option<Duration> {
    latencies.iter().copied().min()
}

/// Element at index `len / 2` of the sorted latencies. For an even count this
/// is the upper of the two middle values, not their mean.
#[must_use]
pub fn median_latency(latencies: &[Duration]) -> Option<Duration> {
    let mut sorted = latencies.to_vec();
    sorted.sort_unstable();
    sorted.len().checked_div(2).and_then(|middle| sorted.get(middle)).copied()
}

/// Population standard deviation around the floored mean, floored to whole
/// nanoseconds.
///
/// Integer square root of the floored variance equals the floor of the exact
/// square root, so no floating point is involved.
#[must_use]
pub fn standard_deviation(latencies: &[Duration]) -> Option<Duration> {
    let count = sample_count(latencies)?;
    let mean = mean_nanos(latencies)?;
    let sum_squared_delta = latencies.iter().fold(0u128, |sum, latency| {
        let delta = mean.abs_diff(latency.as_nanos());
        sum.saturating_add(delta.saturating_mul(delta))
    });
    let variance = sum_squared_delta.checked_div(count)?;
    Some(duration_from_nanos(variance.isqrt()))
}

/// Floor of `transferred_bytes / 1024 / elapsed_seconds`; zero when no time
/// has elapsed.
#[must_use]
pub fn throughput_kbps(transferred_bytes: u64, elapsed: Duration) -> u64 {
    let divisor = BYTES_PER_KILOBYTE.saturating_mul(elapsed.as_nanos());
    u128::from(transferred_bytes)
        .saturating_mul(NANOS_PER_SEC)
        .checked_div(divisor)
        .map_or(0, |kbps| u64::try_from(kbps).unwrap_or(u64::MAX))
}

fn sample_count(latencies: &[Duration]) -> Option<u128> {
    u128::try_from(latencies.len())
        .ok()
        .filter(|count| *count > 0)
}

fn mean_nanos(latencies: &[Duration]) -> Option<u128> {
    let count = sample_count(latencies)?;
    let total = latencies
        .iter()
        .fold(0u128, |sum, latency| sum.saturating_add(latency.as_nanos()));
    total.checked_div(count)
}

fn duration_from_nanos(nanos: u128) -> Duration {
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

pub(crate) fn serialize_nanos<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(value.as_nanos()).unwrap_or(u64::MAX))
}
