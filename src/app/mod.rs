//! Run orchestration: drains measurements, drives the dispatcher, and
//! renders the final report.
mod runner;
pub(crate) mod summary;


pub use runner::{RunOutcome, run_benchmark, run_local};
pub use summary::{RunReport, print_report, render_json, summary_lines};
