//! Measurements, the per-run aggregate, and derived latency statistics.
mod run;
mod stats;
mod types;


pub use run::BenchmarkRun;
pub use stats::{
    LatencyStats, average_latency, fastest_latency, median_latency, slowest_latency,
    standard_deviation, throughput_kbps, total_latency,
};
pub(crate) use stats::serialize_nanos;
pub use types::{Measurement, is_success_status};
