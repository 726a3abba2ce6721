//! Bounded-concurrency scan scheduler.
//!
//! Spawns one task per (port, protocol) pair and lets a shared semaphore
//! decide how many of them may probe at once. Every requested pair yields
//! exactly one [`PortResult`], whatever happens to its task.

use crate::scanner::traits::{NetworkProber, PortResult, ProbeOutcome, Prober};
use crate::types::{Port, PortSpec, Protocol, ResolvedAddress};
use futures::FutureExt;
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default number of simultaneously active probes.
pub const DEFAULT_CONCURRENCY: usize = 200;

/// Default per-probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Teardown allowance added to each probe when bounding admission waits.
pub const ADMISSION_SLACK: Duration = Duration::from_millis(250);

/// Probe every (port, protocol) pair on `target` with the network prober.
///
/// Results come back in completion order; sort them for display.
pub async fn scan(
    target: ResolvedAddress,
    ports: &PortSpec,
    protocols: &[Protocol],
    concurrency: usize,
    timeout: Duration,
) -> Vec<PortResult> {
    Scheduler::new()
        .with_concurrency(concurrency)
        .with_timeout(timeout)
        .run(target, ports, protocols)
        .await
}

/// Configurable scheduler over any [`Prober`].
pub struct Scheduler<P = NetworkProber> {
    prober: Arc<P>,
    concurrency: usize,
    timeout: Duration,
    admission_wait: Option<Duration>,
    progress: Option<ProgressBar>,
}

impl Scheduler<NetworkProber> {
    /// Scheduler that probes the real network.
    pub fn new() -> Self {
        Self::with_prober(NetworkProber)
    }
}

impl Default for Scheduler<NetworkProber> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Prober + 'static> Scheduler<P> {
    /// Scheduler using a custom prober.
    pub fn with_prober(prober: P) -> Self {
        Self::with_shared_prober(Arc::new(prober))
    }

    /// Scheduler using a prober the caller keeps a handle to.
    pub fn with_shared_prober(prober: Arc<P>) -> Self {
        Self {
            prober,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            admission_wait: None,
            progress: None,
        }
    }

    /// Set the admission gate capacity. Clamped to at least one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    /// Set the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bound how long a task may wait for a gate slot.
    pub fn with_admission_wait(mut self, wait: Option<Duration>) -> Self {
        self.admission_wait = wait;
        self
    }

    /// Advance this progress bar once per finished probe.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Gate capacity in effect.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// How long each of `tasks` tasks may wait for a slot.
    ///
    /// Unless set explicitly, this is one timeout plus teardown slack for
    /// every wave of `concurrency` tasks that can be ahead in the queue.
    pub fn admission_wait_for(&self, tasks: usize) -> Duration {
        self.admission_wait.unwrap_or_else(|| {
            let waves = tasks.div_ceil(self.concurrency).max(1);
            (self.timeout + ADMISSION_SLACK).saturating_mul(u32::try_from(waves).unwrap_or(u32::MAX))
        })
    }

    /// Probe every (port, protocol) pair and return one result per pair.
    ///
    /// Returns only after every task has reported. Empty `ports` or
    /// `protocols` returns immediately without touching the network.
    pub async fn run(
        &self,
        target: ResolvedAddress,
        ports: &PortSpec,
        protocols: &[Protocol],
    ) -> Vec<PortResult> {
        if ports.is_empty() || protocols.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let total = ports.len() * protocols.len();
        let gate = Arc::new(Semaphore::new(self.concurrency));
        let admission_wait = self.admission_wait_for(total);

        tracing::info!(
            address = %target.ip,
            tasks = total,
            concurrency = self.concurrency,
            timeout_ms = self.timeout.as_millis() as u64,
            "starting scan"
        );

        let mut pending: HashSet<(Port, Protocol)> = HashSet::with_capacity(total);
        let mut tasks = JoinSet::new();

        for port in ports.iter() {
            for &protocol in protocols {
                if !pending.insert((port, protocol)) {
                    continue;
                }

                let gate = Arc::clone(&gate);
                let prober = Arc::clone(&self.prober);
                let timeout = self.timeout;

                tasks.spawn(async move {
                    let outcome = admit_and_probe(
                        prober.as_ref(),
                        &gate,
                        admission_wait,
                        target,
                        port,
                        protocol,
                        timeout,
                    )
                    .await;
                    PortResult::new(port, protocol, outcome)
                });
            }
        }

        let mut results = Vec::with_capacity(pending.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => {
                    if !pending.remove(&result.sort_key()) {
                        continue;
                    }
                    if let Some(ref pb) = self.progress {
                        pb.inc(1);
                        if result.outcome == ProbeOutcome::Open {
                            pb.set_message(format!("found open {} port {}", result.protocol, result.port));
                        }
                    }
                    results.push(result);
                }
                Err(e) => tracing::warn!(error = %e, "probe task did not complete"),
            }
        }

        // Pairs whose task never reported still get an answer.
        for (port, protocol) in pending.drain() {
            results.push(PortResult::new(port, protocol, ProbeOutcome::ClosedOrUnreachable));
        }

        tracing::info!(
            address = %target.ip,
            results = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan finished"
        );

        results
    }
}

/// Wait for a gate slot, then probe. The permit is held only while probing.
async fn admit_and_probe<P: Prober + ?Sized>(
    prober: &P,
    gate: &Semaphore,
    admission_wait: Duration,
    target: ResolvedAddress,
    port: Port,
    protocol: Protocol,
    timeout: Duration,
) -> ProbeOutcome {
    let _permit = match tokio::time::timeout(admission_wait, gate.acquire()).await {
        Ok(Ok(permit)) => permit,
        Ok(Err(_)) => {
            tracing::warn!(%port, %protocol, "admission gate closed");
            return ProbeOutcome::ClosedOrUnreachable;
        }
        Err(_) => {
            tracing::warn!(
                %port,
                %protocol,
                waited_ms = admission_wait.as_millis() as u64,
                "no probe slot became free, port not probed"
            );
            return ProbeOutcome::ClosedOrUnreachable;
        }
    };

    AssertUnwindSafe(prober.probe(target, port, protocol, timeout))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            tracing::warn!(%port, %protocol, "probe panicked");
            ProbeOutcome::ClosedOrUnreachable
        })
}
