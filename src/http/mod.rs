//! Outbound HTTP probing and closed-loop request dispatch.
mod client;
mod dispatcher;
mod probe;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{build_client, validate_url};
pub use dispatcher::{Dispatcher, LoadPlan};
pub use probe::{HttpProbe, Probe, ProbeOutcome, header_bytes};
