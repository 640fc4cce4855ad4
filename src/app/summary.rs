use std::time::Duration;

use serde::Serialize;

use crate::{
    args::OutputFormat,
    error::AppResult,
    metrics::{LatencyStats, serialize_nanos},
};

use super::runner::RunOutcome;

/// Bytes per reported kilobyte.
const BYTES_PER_KILOBYTE: u64 = 1024;
/// Placeholder for latency figures when no request succeeded.
const UNDEFINED: &str = "n/a";

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub url: String,
    pub concurrency: usize,
    pub repetitions: u64,
    pub requests_issued: u64,
    pub interrupted: bool,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub transferred_bytes: u64,
    pub transferred_kilobytes: u64,
    pub kilobytes_per_second: u64,
    #[serde(rename = "elapsed_ns", serialize_with = "serialize_nanos")]
    pub elapsed: Duration,
    pub latency: Option<LatencyStats>,
}

impl RunReport {
    #[must_use]
    pub fn from_outcome(url: &str, outcome: &RunOutcome) -> Self {
        let run = &outcome.run;
        Self {
            url: url.to_owned(),
            concurrency: outcome.plan.concurrency.get(),
            repetitions: outcome.plan.repetitions.get(),
            requests_issued: outcome.requests_issued,
            interrupted: outcome.interrupted,
            successful_requests: run.success_count(),
            failed_requests: run.failure_count(),
            transferred_bytes: run.transferred_bytes(),
            transferred_kilobytes: run
                .transferred_bytes()
                .checked_div(BYTES_PER_KILOBYTE)
                .unwrap_or(0),
            kilobytes_per_second: run.throughput_kbps(),
            elapsed: run.elapsed_time(),
            latency: run.latency_stats(),
        }
    }
}

/// Report lines in fixed order: counts, transfer, timing, then latency
/// figures. Latency figures read `n/a` when nothing succeeded.
#[must_use]
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    let latency = report.latency.as_ref();
    let figure = |pick: fn(&LatencyStats) -> Duration| {
        latency.map_or_else(|| UNDEFINED.to_owned(), |stats| format!("{:?}", pick(stats)))
    };

    let mut lines = vec![
        format!("Successful requests: {}", report.successful_requests),
        format!("Failed requests: {}", report.failed_requests),
        format!("Transferred kilobytes: {}", report.transferred_kilobytes),
        format!("Kilobytes per second: {}", report.kilobytes_per_second),
        format!("Elapsed wall-clock time: {:?}", report.elapsed),
        format!("Slowest request: {}", figure(|stats| stats.slowest)),
        format!("Median request: {}", figure(|stats| stats.median)),
        format!("Fastest request: {}", figure(|stats| stats.fastest)),
        format!("Average request: {}", figure(|stats| stats.average)),
        format!(
            "Standard deviation: {}",
            figure(|stats| stats.standard_deviation)
        ),
    ];
    if report.interrupted {
        lines.push(format!(
            "Interrupted: {} of {} requests issued",
            report.requests_issued, report.repetitions
        ));
    }
    lines
}

/// # Errors
///
/// Returns an error if the report cannot be serialized.
pub fn render_json(report: &RunReport) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the report to stdout in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_report(report: &RunReport, format: OutputFormat) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            for line in summary_lines(report) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => println!("{}", render_json(report)?),
    }
    Ok(())
}
