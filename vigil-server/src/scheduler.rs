//! Interval timer driving periodic extract-then-sync cycles.

use crate::state::AppState;
use crate::sync::run_sync_cycle;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Spawn the periodic sync task.
///
/// The first cycle runs one full interval after startup, matching the
/// original deployment. A cycle that fails is logged and the timer keeps
/// going; there is no retry inside an interval. Cancelling the token stops
/// the task after the in-flight cycle, if any, completes.
pub fn spawn_sync_timer(
    state: AppState,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; consume that tick so the first
        // real cycle lands one interval from now.
        ticker.tick().await;

        info!(
            target: "scheduler",
            every_secs = every.as_secs(),
            "scheduler.started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(target: "scheduler", "scheduler.stopped");
                    return;
                }
                _ = ticker.tick() => {
                    info!(target: "scheduler", "scheduler.cycle_start");
                    match run_sync_cycle(&state).await {
                        Ok(written) => {
                            info!(target: "scheduler", written, "scheduler.cycle_complete");
                        }
                        Err(err) => {
                            warn!(
                                target: "scheduler",
                                error = %err,
                                "scheduler.cycle_aborted"
                            );
                        }
                    }
                }
            }
        }
    })
}
