//! Periodic health evaluation
//!
//! Runs independently of the decode loop and only reads the shared
//! [`LatestSample`]. Each tick yields one report per check.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tamagawa::{
    check_bit_error, check_connection, HealthCheck, HealthReport, HealthStatus, StatusWord,
    Timestamp,
};
use tokio::task::JoinHandle;

use crate::publish::HealthSink;
use crate::state::LatestSample;

/// Evaluate both checks against the latest sample.
///
/// Before any record has arrived the bit error check reports OK and the
/// connection check reports a timeout.
pub fn evaluate(state: &LatestSample, now: Timestamp, timeout: Duration) -> [HealthReport; 2] {
    let sample = state.snapshot();
    let status = sample.map_or(StatusWord::empty(), |s| s.status);
    let last_seen = sample.map(|s| s.timestamp);

    [
        HealthReport::new(HealthCheck::BitError, check_bit_error(status)),
        HealthReport::new(
            HealthCheck::Connection,
            check_connection(last_seen, now, timeout),
        ),
    ]
}

/// Background health reporter.
///
/// Spawns a tokio task that evaluates the checks every `period` and hands
/// the reports to a [`HealthSink`]. The task is cancelled on drop.
pub struct HealthMonitor {
    handle: JoinHandle<()>,
    failures: Arc<AtomicU64>,
}

impl HealthMonitor {
    pub fn spawn<S: HealthSink>(
        state: LatestSample,
        mut sink: S,
        period: Duration,
        timeout: Duration,
    ) -> Self {
        let failures = Arc::new(AtomicU64::new(0));
        let failures_clone = failures.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;

                let reports = evaluate(&state, Timestamp::now(), timeout);
                let failed = reports
                    .iter()
                    .filter(|r| r.status != HealthStatus::Ok)
                    .count() as u64;
                failures_clone.fetch_add(failed, Ordering::Relaxed);
                sink.report(&reports);
            }
        });

        Self { handle, failures }
    }

    /// Failed check results reported so far
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.handle.abort();

        let failures = self.failures.load(Ordering::Relaxed);
        if failures > 0 {
            tracing::warn!("HealthMonitor: {failures} failed check(s) during lifetime");
        }
    }
}
