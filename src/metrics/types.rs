use std::ops::RangeInclusive;
use std::time::Duration;

use crate::http::ProbeOutcome;

/// Status codes counted as successful requests.
const SUCCESS_STATUS: RangeInclusive<u16> = 200..=299;

/// Outcome of one probe: status, bytes attributed to the reply, and how long
/// the call took from issuance to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Measurement {
    pub status_code: u16,
    pub reply_size: u64,
    pub duration: Duration,
}

impl Measurement {
    #[must_use]
    pub const fn new(outcome: ProbeOutcome, duration: Duration) -> Self {
        Self {
            status_code: outcome.status_code,
            reply_size: outcome.reply_size,
            duration,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        is_success_status(self.status_code)
    }
}

#[must_use]
pub fn is_success_status(status_code: u16) -> bool {
    SUCCESS_STATUS.contains(&status_code)
}
