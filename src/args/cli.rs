use clap::Parser;
use std::time::Duration;

use super::defaults::{
    DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REPETITIONS, DEFAULT_REQUEST_TIMEOUT,
};
use super::parsers::{parse_duration_arg, parse_positive_u64, parse_positive_usize};
use super::types::{OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Closed-loop HTTP load generator: keeps a fixed number of GET requests in flight against one URL and reports throughput and latency statistics."
)]
pub struct BenchArgs {
    /// Target URL to fetch repeatedly
    pub url: Option<String>,

    /// Number of requests kept in flight at once
    #[arg(long, short = 'c', default_value = DEFAULT_CONCURRENCY, value_parser = parse_positive_usize)]
    pub concurrency: PositiveUsize,

    /// Total number of requests to issue
    #[arg(long, short = 'r', default_value = DEFAULT_REPETITIONS, value_parser = parse_positive_u64)]
    pub repetitions: PositiveU64,

    /// Per-request deadline; expired requests count as failures (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = DEFAULT_REQUEST_TIMEOUT, value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// TCP connect timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = DEFAULT_CONNECT_TIMEOUT, value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Path to a TOML or JSON config file (defaults to ./reqgauge.toml or ./reqgauge.json)
    #[arg(long)]
    pub config: Option<String>,

    /// Report format
    #[arg(long = "output-format", short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
