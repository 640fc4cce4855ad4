use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::debug;

use crate::args::{BenchArgs, PositiveU64, PositiveUsize};
use crate::metrics::Measurement;
use crate::shutdown::{ShutdownReceiver, ShutdownSender};

use super::probe::{Probe, ProbeOutcome};

/// How much load a run applies: `concurrency` probes outstanding at once
/// until `repetitions` probes have been issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPlan {
    pub concurrency: PositiveUsize,
    pub repetitions: PositiveU64,
    pub probe_timeout: Option<Duration>,
}

impl LoadPlan {
    #[must_use]
    pub const fn new(concurrency: PositiveUsize, repetitions: PositiveU64) -> Self {
        Self {
            concurrency,
            repetitions,
            probe_timeout: None,
        }
    }

    #[must_use]
    pub const fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = Some(probe_timeout);
        self
    }

    #[must_use]
    pub const fn from_args(args: &BenchArgs) -> Self {
        Self::new(args.concurrency, args.repetitions).with_probe_timeout(args.request_timeout)
    }

    /// Number of probes launched up front: `min(concurrency, repetitions)`.
    #[must_use]
    pub fn initial_batch(&self) -> u64 {
        let concurrency = u64::try_from(self.concurrency.get()).unwrap_or(u64::MAX);
        concurrency.min(self.repetitions.get())
    }
}

/// Issues probes under a closed workload model: a replacement is launched
/// only after a measurement has been consumed, so at most
/// `plan.concurrency` probes are ever outstanding.
///
/// Every probe runs as its own task and reports exactly one [`Measurement`]
/// on the result queue, including when it fails, times out or is cancelled.
pub struct Dispatcher {
    probe: Arc<dyn Probe>,
    url: Arc<str>,
    plan: LoadPlan,
    results_tx: mpsc::Sender<Measurement>,
    shutdown_tx: ShutdownSender,
    shutdown_rx: ShutdownReceiver,
    issued: u64,
    halted: bool,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        probe: Arc<dyn Probe>,
        url: &str,
        plan: LoadPlan,
        results_tx: mpsc::Sender<Measurement>,
        shutdown_tx: ShutdownSender,
    ) -> Self {
        let shutdown_rx = shutdown_tx.subscribe();
        Self {
            probe,
            url: Arc::from(url),
            plan,
            results_tx,
            shutdown_tx,
            shutdown_rx,
            issued: 0,
            halted: false,
        }
    }

    /// Launches the initial batch and returns how many probes were issued.
    /// Calling it again issues nothing new.
    pub fn start(&mut self) -> u64 {
        self.observe_shutdown();
        let batch = self.plan.initial_batch();
        let before = self.issued;
        while !self.halted && self.issued < batch {
            self.issue();
        }
        self.issued.saturating_sub(before)
    }

    /// Replaces one consumed probe while the budget allows. Returns whether a
    /// new probe was issued.
    pub fn on_measurement_consumed(&mut self) -> bool {
        self.observe_shutdown();
        if self.halted || self.is_exhausted() {
            return false;
        }
        self.issue();
        true
    }

    /// Stops all further issuance. Probes already running still report.
    pub fn halt(&mut self) {
        if !self.halted {
            debug!("Dispatcher halted after {} issued requests", self.issued);
        }
        self.halted = true;
    }

    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.issued
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.issued >= self.plan.repetitions.get()
    }

    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Probes issued but not yet consumed, given the consumed count.
    #[must_use]
    pub const fn in_flight(&self, consumed: u64) -> u64 {
        self.issued.saturating_sub(consumed)
    }

    /// Halts once a shutdown has been broadcast, even if the consumer has not
    /// seen it yet.
    fn observe_shutdown(&mut self) {
        match self.shutdown_rx.try_recv() {
            Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_)) => self.halt(),
            Err(broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed) => {}
        }
    }

    fn issue(&mut self) {
        self.issued = self.issued.saturating_add(1);
        let sequence = self.issued;
        let probe = Arc::clone(&self.probe);
        let url = Arc::clone(&self.url);
        let results_tx = self.results_tx.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let deadline = self.plan.probe_timeout;

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = tokio::select! {
                outcome = run_probe(&*probe, &url, deadline) => outcome,
                Ok(()) = shutdown_rx.recv() => {
                    debug!("Request {} cancelled by shutdown", sequence);
                    ProbeOutcome::failed()
                }
            };
            let measurement = Measurement::new(outcome, started.elapsed());
            if results_tx.send(measurement).await.is_err() {
                debug!("Result queue closed; dropped measurement {}", sequence);
            }
        });
    }
}

async fn run_probe(probe: &dyn Probe, url: &str, deadline: Option<Duration>) -> ProbeOutcome {
    let Some(deadline) = deadline else {
        return probe.fetch(url).await;
    };
    match tokio::time::timeout(deadline, probe.fetch(url)).await {
        Ok(outcome) => outcome,
        Err(_elapsed) => {
            debug!("Request to {} exceeded {:?}", url, deadline);
            ProbeOutcome::failed()
        }
    }
}
