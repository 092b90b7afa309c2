//! # Countdown Scheduler
//!
//! One supervised tokio task per ACTIVE giveaway, keyed by giveaway id.
//! Each task ticks on a fixed interval: past the deadline it terminates the
//! giveaway and stops permanently; otherwise it refreshes the announcement
//! and sleeps until the next tick. The first tick runs immediately on arm,
//! so a giveaway recovered with an already-past deadline terminates without
//! waiting a full interval.
//!
//! On startup [`CountdownScheduler::recover`] enumerates the store and arms
//! a task for every ACTIVE giveaway. This is the sole crash-recovery
//! mechanism: after recovery no giveaway is left ACTIVE without a running
//! countdown.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::lifecycle::{LifecycleManager, TickOutcome};

/// Supervisor for per-giveaway countdown tasks
pub struct CountdownScheduler {
    manager: Arc<LifecycleManager>,
    tick_interval: Duration,
    tasks: DashMap<Uuid, JoinHandle<()>>,
    // watch rather than Notify so a shutdown signalled while a task is
    // mid-tick is still observed on its next await
    shutdown_tx: watch::Sender<bool>,
}

impl CountdownScheduler {
    pub fn new(manager: Arc<LifecycleManager>, tick_interval: Duration) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            manager,
            tick_interval,
            tasks: DashMap::new(),
            shutdown_tx,
        }
    }

    /// Arm a countdown task for the given giveaway id.
    ///
    /// Arming an id that already has a live task is a no-op: the countdown
    /// task is the sole owner of its own lifetime.
    pub fn arm(&self, id: Uuid) {
        self.tasks.retain(|_, handle| !handle.is_finished());

        // entry() holds the shard lock across the occupancy check and the
        // insert, so two concurrent arms cannot both spawn a task.
        match self.tasks.entry(id) {
            Entry::Occupied(_) => {
                debug!(giveaway_id = %id, "Countdown already armed");
            }
            Entry::Vacant(slot) => {
                let manager = Arc::clone(&self.manager);
                let shutdown_rx = self.shutdown_tx.subscribe();
                let interval = self.tick_interval;

                slot.insert(tokio::spawn(async move {
                    countdown_loop(manager, id, interval, shutdown_rx).await;
                }));

                debug!(
                    giveaway_id = %id,
                    interval_secs = interval.as_secs_f64(),
                    "Countdown armed"
                );
            }
        }
    }

    /// Arm one countdown per ACTIVE giveaway in the store.
    ///
    /// Ended leftovers from an interrupted termination are finalized here
    /// (terminate is idempotent) rather than given a countdown.
    pub async fn recover(&self) -> Result<usize> {
        let mut armed = 0;
        for (id, giveaway) in self.manager.active_giveaways().await {
            if giveaway.status.is_terminal() {
                let _ = self.manager.terminate(id).await?;
                continue;
            }
            self.arm(id);
            armed += 1;
        }

        info!(armed, "Countdown recovery complete");
        Ok(armed)
    }

    /// Number of currently armed countdown tasks
    pub fn armed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|entry| !entry.value().is_finished())
            .count()
    }

    /// Stop all countdown tasks and wait for them to finish
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);

        let ids: Vec<Uuid> = self.tasks.iter().map(|entry| *entry.key()).collect();
        let mut handles = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some((_, handle)) = self.tasks.remove(&id) {
                handles.push(handle);
            }
        }

        futures::future::join_all(handles).await;
        info!("Countdown scheduler shut down");
    }
}

/// Body of one countdown task.
///
/// Tick errors are logged and retried on the next interval; a transient
/// storage failure must not orphan an active giveaway.
async fn countdown_loop(
    manager: Arc<LifecycleManager>,
    id: Uuid,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            debug!(giveaway_id = %id, "Shutdown requested before tick");
            break;
        }

        match manager.tick(id).await {
            Ok(TickOutcome::Refreshed) => {}
            Ok(TickOutcome::Ended) => {
                debug!(giveaway_id = %id, "Countdown finished: giveaway ended");
                break;
            }
            Ok(TickOutcome::Gone) => {
                debug!(giveaway_id = %id, "Countdown stopped: giveaway no longer present");
                break;
            }
            Err(e) => {
                warn!(giveaway_id = %id, error = %e, "Tick failed; retrying next interval");
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {},
            _ = shutdown_rx.changed() => {
                debug!(giveaway_id = %id, "Shutdown notification received");
                break;
            }
        }
    }
}
