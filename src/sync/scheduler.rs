//! Auto-sync: a periodic timer plus "came back online" triggers.
//!
//! Cycles run in the loop body, outside `select!`, so stopping the task
//! never interrupts a cycle that already started; it only prevents the next.

use crate::sync::engine::SyncEngine;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Timer,
    Reconnect,
}

/// Handle of a running auto-sync task. Dropping it also stops the task.
pub struct AutoSyncHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl AutoSyncHandle {
    /// Ask the task to stop and wait for it. A cycle in progress finishes first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            warn!(error = %e, "auto-sync task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl SyncEngine {
    /// Spawn the auto-sync task on the current tokio runtime.
    pub fn start_auto_sync(self: &Arc<Self>) -> AutoSyncHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let online_rx = self.connectivity.subscribe();
        let engine = Arc::clone(self);

        let join = tokio::spawn(async move {
            engine.auto_sync_loop(online_rx, shutdown_rx).await;
        });

        info!(
            interval_secs = self.settings().sync_interval.as_secs(),
            "auto-sync started"
        );
        AutoSyncHandle { shutdown, join }
    }

    async fn auto_sync_loop(
        self: Arc<Self>,
        mut online_rx: watch::Receiver<bool>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let period = self.settings().sync_interval;
        let debounce = self.settings().reconnect_debounce;

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut was_online = *online_rx.borrow_and_update();
        let mut watching = true;

        loop {
            let trigger = tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => Trigger::Timer,
                changed = online_rx.changed(), if watching => {
                    if changed.is_err() {
                        // Monitor gone: keep the timer, stop watching.
                        watching = false;
                        continue;
                    }
                    let now_online = *online_rx.borrow_and_update();
                    let came_online = now_online && !was_online;
                    was_online = now_online;
                    if !came_online {
                        continue;
                    }
                    Trigger::Reconnect
                }
            };

            if trigger == Trigger::Reconnect {
                debug!(debounce_ms = debounce.as_millis() as u64, "back online, debouncing");
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = sleep(debounce) => {}
                }
                if !*online_rx.borrow() {
                    debug!("link dropped again during debounce");
                    continue;
                }
            }

            if !self.should_run(trigger).await {
                continue;
            }

            let result = self.force_full_sync().await;
            debug!(?trigger, summary = %result.summary(), "scheduled sync finished");
        }

        info!("auto-sync stopped");
    }

    async fn should_run(&self, trigger: Trigger) -> bool {
        match self.is_auto_sync_enabled() {
            Ok(true) => {}
            Ok(false) => {
                debug!(?trigger, "auto-sync disabled, skipping");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "cannot read auto-sync setting");
                return false;
            }
        }

        // Timer ticks while offline would only record NetworkUnavailable.
        if trigger == Trigger::Timer && !self.connectivity.current_state().await.is_online {
            debug!("timer tick while offline, skipping");
            return false;
        }
        true
    }
}
