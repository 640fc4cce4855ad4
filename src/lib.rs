//! Core library for the `reqgauge` CLI.
//!
//! `reqgauge` fetches one URL repeatedly while keeping a fixed number of
//! requests in flight, then reports throughput and latency statistics. The
//! crate exposes the building blocks used by the binary: CLI argument types,
//! configuration loading, the probe and dispatcher, and the statistics
//! aggregate.
pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod shutdown;
