//! # Runtime Composition Root
//!
//! Wires configuration, store, transport, lifecycle manager, and countdown
//! scheduler into one handle. Startup loads the persisted store (refusing
//! to start on corrupt state) and re-arms a countdown for every ACTIVE
//! giveaway — the crash-recovery contract.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::config::GiveawayConfig;
use crate::error::Result;
use crate::events::{EventPublisher, LifecycleEvent};
use crate::lifecycle::{
    CreateGiveaway, JoinOutcome, LifecycleManager, TerminationReport,
};
use crate::models::Giveaway;
use crate::scheduler::CountdownScheduler;
use crate::store::SnapshotStore;
use crate::transport::Transport;

/// One running giveaway lifecycle system
pub struct GiveawayRuntime {
    config: GiveawayConfig,
    manager: Arc<LifecycleManager>,
    scheduler: CountdownScheduler,
}

impl GiveawayRuntime {
    /// Load the store, wire the components, and recover countdowns for
    /// every ACTIVE giveaway. Fails on invalid configuration or a corrupt
    /// snapshot; never starts with partial state.
    pub async fn start(config: GiveawayConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(SnapshotStore::open(&config.data_dir).await?);
        let events = EventPublisher::new(config.event_channel_capacity);
        let manager = Arc::new(LifecycleManager::new(store, transport, events));
        let scheduler = CountdownScheduler::new(Arc::clone(&manager), config.tick_interval);

        let recovered = scheduler.recover().await?;
        info!(
            data_dir = %config.data_dir.display(),
            recovered,
            "Giveaway runtime started"
        );

        Ok(Self {
            config,
            manager,
            scheduler,
        })
    }

    /// Create a giveaway and arm its countdown
    pub async fn create_giveaway(&self, request: CreateGiveaway) -> Result<Giveaway> {
        let giveaway = self.manager.create(request).await?;
        self.scheduler.arm(giveaway.id);
        crate::logging::log_giveaway_operation("create", giveaway.id, "armed", None);
        Ok(giveaway)
    }

    /// Register a participant (idempotent)
    pub async fn join(
        &self,
        id: Uuid,
        participant_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<JoinOutcome> {
        self.manager.join(id, participant_id, display_name).await
    }

    /// Administrative force-end, ahead of the deadline if necessary.
    ///
    /// Safe alongside the scheduled countdown: termination is idempotent
    /// and serialized per id, and the countdown task stops on its next tick
    /// once the giveaway is gone.
    pub async fn terminate(&self, id: Uuid) -> Result<Option<TerminationReport>> {
        let report = self.manager.terminate(id).await?;
        crate::logging::log_giveaway_operation(
            "force_end",
            id,
            if report.is_some() { "ended" } else { "noop" },
            None,
        );
        Ok(report)
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.manager.events().subscribe()
    }

    /// The underlying lifecycle manager
    pub fn manager(&self) -> &Arc<LifecycleManager> {
        &self.manager
    }

    /// The runtime configuration
    pub fn config(&self) -> &GiveawayConfig {
        &self.config
    }

    /// Stop all countdown tasks and wait for them
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }
}
