//! Recurring driver for price refresh passes.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::refresh::refresh_model::{RefreshConfig, RefreshSummary};
use crate::refresh::refresh_service::PriceRefreshServiceTrait;

/// Owner of a running refresh scheduler.
///
/// Dropping the handle stops the timer as well; call
/// [`shutdown`](Self::shutdown) to also wait for an in-flight pass.
pub struct RefreshSchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    summary_rx: watch::Receiver<Option<RefreshSummary>>,
    task: JoinHandle<()>,
}

impl RefreshSchedulerHandle {
    /// Receiver yielding the summary of the most recent finished pass.
    pub fn subscribe(&self) -> watch::Receiver<Option<RefreshSummary>> {
        self.summary_rx.clone()
    }

    /// Whether the scheduler loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the timer. A pass already running completes first.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            log::error!("Price refresh scheduler task failed: {}", e);
        }
    }
}

/// Run a pass right away, then one per `config.interval`.
///
/// Passes never overlap: the loop awaits each pass, and ticks missed while a
/// pass was running are skipped. Each pass runs in its own task so a panicking
/// pass is logged and the next tick still fires. Must be called from within a
/// Tokio runtime.
pub fn start_periodic_updates(
    service: Arc<dyn PriceRefreshServiceTrait>,
    config: &RefreshConfig,
) -> RefreshSchedulerHandle {
    // tokio's interval panics on a zero period
    let interval_period = config.interval.max(Duration::from_millis(1));
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let (summary_tx, summary_rx) = watch::channel(None);

    let task = tokio::spawn(async move {
        info!(
            "Price refresh scheduler started ({}s interval)",
            interval_period.as_secs()
        );

        let mut ticker = interval(interval_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    debug!("Running scheduled price refresh");
                    let service = service.clone();
                    match tokio::spawn(async move { service.refresh_pass().await }).await {
                        Ok(summary) => {
                            summary_tx.send_replace(Some(summary));
                        }
                        Err(e) => error!("Price refresh pass did not complete: {}", e),
                    }
                }
            }
        }

        info!("Price refresh scheduler stopped");
    });

    RefreshSchedulerHandle {
        shutdown_tx,
        summary_rx,
        task,
    }
}
