use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    args::BenchArgs,
    error::AppResult,
    http::{Dispatcher, HttpProbe, LoadPlan, Probe, validate_url},
    metrics::{BenchmarkRun, Measurement},
    shutdown::ShutdownSender,
};

use super::summary::RunReport;

#[derive(Debug)]
pub struct RunOutcome {
    pub run: BenchmarkRun,
    pub plan: LoadPlan,
    pub requests_issued: u64,
    pub interrupted: bool,
}

impl RunOutcome {
    #[must_use]
    pub fn report(&self, url: &str) -> RunReport {
        RunReport::from_outcome(url, self)
    }
}

/// Runs one benchmark against `url` with the given probe.
///
/// The calling task is the only consumer of the result queue and the only
/// writer of the [`BenchmarkRun`]. A shutdown broadcast halts issuance; probes
/// still running resolve as failures and are drained before the run stops.
pub async fn run_benchmark(
    probe: Arc<dyn Probe>,
    url: &str,
    plan: LoadPlan,
    shutdown_tx: &ShutdownSender,
) -> RunOutcome {
    let (results_tx, mut results_rx) = mpsc::channel::<Measurement>(plan.concurrency.get());
    let mut shutdown_rx = shutdown_tx.subscribe();
    let mut run = BenchmarkRun::with_capacity(plan.repetitions.get());
    let mut dispatcher = Dispatcher::new(probe, url, plan, results_tx, shutdown_tx.clone());
    let mut shutdown_seen = false;

    info!(
        "Benchmarking {} with {} concurrent requests, {} total",
        url,
        plan.concurrency.get(),
        plan.repetitions.get()
    );
    dispatcher.start();

    while run.recorded() < dispatcher.issued() {
        tokio::select! {
            maybe_measurement = results_rx.recv() => {
                let Some(measurement) = maybe_measurement else {
                    warn!("Result queue closed with {} requests outstanding", dispatcher.in_flight(run.recorded()));
                    break;
                };
                run.record(measurement);
                dispatcher.on_measurement_consumed();
            }
            Ok(()) = shutdown_rx.recv(), if !shutdown_seen => {
                shutdown_seen = true;
                dispatcher.halt();
                warn!(
                    "Shutdown requested; draining {} in-flight requests",
                    dispatcher.in_flight(run.recorded())
                );
            }
        }
    }

    run.stop();
    info!(
        "Finished {} requests in {:?}",
        run.recorded(),
        run.elapsed_time()
    );

    RunOutcome {
        requests_issued: dispatcher.issued(),
        run,
        plan,
        interrupted: dispatcher.is_halted(),
    }
}

/// Validates the target, builds the HTTP probe, and runs the benchmark
/// described by `args`.
///
/// # Errors
///
/// Returns an error when the URL is invalid or the HTTP client cannot be
/// built. Individual request failures never surface here.
pub async fn run_local(
    args: &BenchArgs,
    url: &str,
    shutdown_tx: &ShutdownSender,
) -> AppResult<RunReport> {
    validate_url(url)?;
    let probe: Arc<dyn Probe> = Arc::new(HttpProbe::new(args.connect_timeout)?);
    let plan = LoadPlan::from_args(args);

    let outcome = run_benchmark(probe, url, plan, shutdown_tx).await;
    if outcome.run.latency_stats().is_none() {
        warn!("No successful requests; latency statistics are undefined.");
    }
    Ok(outcome.report(url))
}
