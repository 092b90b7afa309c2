//! # Giveaway Lifecycle Manager
//!
//! Owns every state transition a giveaway can make: creation, participant
//! joins, countdown refreshes, and termination with winner selection and
//! reward allocation. The store is the single source of truth; every
//! observable mutation is durable before the triggering operation is
//! acknowledged.
//!
//! ## Ordering guarantees
//!
//! Operations on a single giveaway id are serialized through a per-id async
//! mutex: a join can never race into an already-ended giveaway, and
//! termination always observes the complete participant set as of the
//! terminate call. Operations on different ids run fully in parallel.

pub mod announcement;
pub mod selection;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{GiveawayError, Result};
use crate::events::{names, EventPublisher};
use crate::models::{Destination, Giveaway, Participant, WinnerAward};
use crate::state_machine::GiveawayState;
use crate::store::SnapshotStore;
use crate::transport::Transport;

/// Parameters for creating a giveaway
#[derive(Debug, Clone)]
pub struct CreateGiveaway {
    pub title: String,
    pub description: String,
    pub winner_count: u32,
    pub duration: Duration,
    pub reward_tokens: Vec<String>,
    pub destination_hint: String,
}

/// Outcome of a join request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// First join for this participant; state was mutated and persisted
    Joined,
    /// Participant was already registered; nothing changed
    AlreadyJoined,
}

/// Outcome of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Deadline not reached; announcement refreshed
    Refreshed,
    /// Deadline reached; giveaway terminated. The countdown task stops.
    Ended,
    /// Giveaway no longer in the store; the countdown task stops.
    Gone,
}

/// Result of a completed termination
#[derive(Debug)]
pub struct TerminationReport {
    pub giveaway_id: Uuid,
    pub winners: Vec<WinnerAward>,
    pub participant_count: usize,
    /// Non-fatal transport failures collected during notification, as
    /// [`GiveawayError::TransportDelivery`] values. The allocations stand
    /// regardless; these are for operator follow-up.
    pub warnings: Vec<GiveawayError>,
}

/// The concurrent, crash-recoverable giveaway state machine
pub struct LifecycleManager {
    store: Arc<SnapshotStore>,
    transport: Arc<dyn Transport>,
    events: EventPublisher,
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<SnapshotStore>,
        transport: Arc<dyn Transport>,
        events: EventPublisher,
    ) -> Self {
        Self {
            store,
            transport,
            events,
            locks: DashMap::new(),
        }
    }

    /// Access the lifecycle event publisher
    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    /// Fetch one active giveaway
    pub async fn get(&self, id: Uuid) -> Option<Giveaway> {
        self.store.get(id).await
    }

    /// Snapshot of all active giveaways
    pub async fn active_giveaways(&self) -> BTreeMap<Uuid, Giveaway> {
        self.store.snapshot().await
    }

    /// Create a giveaway: validate, announce, persist as ACTIVE.
    ///
    /// Announcement failure is non-fatal: the giveaway is still created
    /// with the destination hint recorded and an empty message reference,
    /// and the failure is logged for operator follow-up. Durable state wins
    /// over transport.
    pub async fn create(&self, request: CreateGiveaway) -> Result<Giveaway> {
        Self::validate_create(&request)?;

        let duration = chrono::Duration::from_std(request.duration)
            .map_err(|e| GiveawayError::validation(format!("duration out of range: {e}")))?;
        let now = Utc::now();

        let mut giveaway = Giveaway::new(
            request.title,
            request.description,
            request.winner_count,
            request.reward_tokens,
            now + duration,
            Destination {
                channel: request.destination_hint.clone(),
                message_ref: String::new(),
            },
        );

        let text = announcement::live_text(&giveaway, now);
        match self
            .transport
            .announce(&request.destination_hint, &text)
            .await
        {
            Ok(destination) => giveaway.destination = destination,
            Err(e) => warn!(
                giveaway_id = %giveaway.id,
                error = %e,
                "Announcement failed at creation; giveaway proceeds without a live message"
            ),
        }

        self.store.upsert(giveaway.clone()).await?;

        info!(
            giveaway_id = %giveaway.id,
            title = %giveaway.title,
            winner_count = giveaway.winner_count,
            end_time = %giveaway.end_time.to_rfc3339(),
            "Giveaway created"
        );
        self.events.publish(
            names::GIVEAWAY_CREATED,
            json!({
                "giveaway_id": giveaway.id,
                "title": giveaway.title,
                "winner_count": giveaway.winner_count,
                "end_time": giveaway.end_time.to_rfc3339(),
            }),
        );

        Ok(giveaway)
    }

    /// Register a participant. Idempotent: a repeat join returns
    /// [`JoinOutcome::AlreadyJoined`] without mutating state or refreshing
    /// the announcement.
    pub async fn join(
        &self,
        id: Uuid,
        participant_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<JoinOutcome> {
        let lock = self.lock_handle(id);
        let _guard = lock.lock().await;

        let mut giveaway = match self.store.get(id).await {
            Some(g) if g.status.is_active() => g,
            _ => {
                // Unknown ids must not accumulate lock entries
                self.locks.remove(&id);
                return Err(GiveawayError::not_found(id));
            }
        };

        let participant_id = participant_id.into();
        if giveaway.has_participant(&participant_id) {
            debug!(giveaway_id = %id, participant_id = %participant_id, "Repeat join ignored");
            return Ok(JoinOutcome::AlreadyJoined);
        }

        giveaway.participants.push(Participant {
            id: participant_id.clone(),
            display_name: display_name.into(),
        });
        self.store.upsert(giveaway.clone()).await?;

        self.refresh_announcement(&giveaway).await;
        self.events.publish(
            names::GIVEAWAY_JOINED,
            json!({
                "giveaway_id": id,
                "participant_id": participant_id,
                "participant_count": giveaway.participant_count(),
            }),
        );

        Ok(JoinOutcome::Joined)
    }

    /// One countdown tick: terminate past the deadline, refresh otherwise.
    ///
    /// Called by the countdown scheduler under the same per-id
    /// serialization as joins, so a join arriving in the same tick the
    /// deadline is evaluated is either fully included or fully excluded by
    /// arrival order, never dropped.
    pub async fn tick(&self, id: Uuid) -> Result<TickOutcome> {
        let lock = self.lock_handle(id);
        let _guard = lock.lock().await;

        let giveaway = match self.store.get(id).await {
            Some(g) => g,
            None => {
                self.locks.remove(&id);
                return Ok(TickOutcome::Gone);
            }
        };

        if giveaway.is_past_deadline(Utc::now()) {
            self.terminate_inner(giveaway).await?;
            return Ok(TickOutcome::Ended);
        }

        self.refresh_announcement(&giveaway).await;
        Ok(TickOutcome::Refreshed)
    }

    /// Terminate a giveaway: select winners, allocate rewards, persist the
    /// ENDED state, notify, archive.
    ///
    /// Idempotent and safe from any code path (scheduled tick, restart
    /// recovery, administrative force-end): an unknown or already-ended id
    /// returns `None` with no re-selection, re-allocation, or repeat
    /// notifications.
    pub async fn terminate(&self, id: Uuid) -> Result<Option<TerminationReport>> {
        let lock = self.lock_handle(id);
        let _guard = lock.lock().await;

        match self.store.get(id).await {
            Some(giveaway) => self.terminate_inner(giveaway).await,
            None => {
                self.locks.remove(&id);
                Ok(None)
            }
        }
    }

    /// Termination body; caller holds the per-id lock.
    async fn terminate_inner(&self, mut giveaway: Giveaway) -> Result<Option<TerminationReport>> {
        let id = giveaway.id;

        if giveaway.status.is_terminal() {
            // Crash window leftover: the ENDED state was durable but the
            // archival step did not finish. Complete it without
            // re-allocating or re-notifying.
            warn!(giveaway_id = %id, "Completing interrupted termination");
            self.store.archive(&giveaway).await?;
            self.store.remove(id).await?;
            self.locks.remove(&id);
            return Ok(None);
        }

        let selected = selection::draw_winners(&giveaway.participants, giveaway.winner_count as usize);
        let awards = selection::allocate_rewards(&mut giveaway, &selected);
        giveaway.status = GiveawayState::Ended;

        // The ENDED state with allocations must be durable before any
        // notification, so a crash cannot double-allocate on retry.
        self.store.upsert(giveaway.clone()).await?;

        let mut warnings = Vec::new();
        for award in &awards {
            let text = announcement::winner_text(&giveaway, &award.token);
            if let Err(e) = self
                .transport
                .deliver_private(&award.participant_id, &text)
                .await
            {
                warn!(
                    giveaway_id = %id,
                    participant_id = %award.participant_id,
                    error = %e,
                    "Winner notification failed; reward stands"
                );
                warnings.push(GiveawayError::transport(
                    "deliver_private",
                    format!("winner {}: {}", award.participant_id, e.message),
                ));
            }
        }

        let final_text = announcement::closed_text(&giveaway);
        if let Err(e) = self
            .transport
            .update_announcement(&giveaway.destination, &final_text)
            .await
        {
            warn!(giveaway_id = %id, error = %e, "Final announcement failed");
            warnings.push(e.into());
        }

        self.store.archive(&giveaway).await?;
        self.store.remove(id).await?;
        self.locks.remove(&id);

        info!(
            giveaway_id = %id,
            winner_count = awards.len(),
            participant_count = giveaway.participant_count(),
            warnings = warnings.len(),
            "Giveaway ended"
        );
        self.events.publish(
            names::GIVEAWAY_ENDED,
            json!({
                "giveaway_id": id,
                "winners": awards.iter().map(|a| a.participant_id.clone()).collect::<Vec<_>>(),
                "participant_count": giveaway.participant_count(),
            }),
        );

        Ok(Some(TerminationReport {
            giveaway_id: id,
            winners: awards,
            participant_count: giveaway.participant_count(),
            warnings,
        }))
    }

    /// Refresh the live announcement; failures are logged, never fatal
    async fn refresh_announcement(&self, giveaway: &Giveaway) {
        let text = announcement::live_text(giveaway, Utc::now());
        if let Err(e) = self
            .transport
            .update_announcement(&giveaway.destination, &text)
            .await
        {
            warn!(
                giveaway_id = %giveaway.id,
                error = %e,
                "Announcement refresh failed"
            );
        }
    }

    fn validate_create(request: &CreateGiveaway) -> Result<()> {
        if request.title.trim().is_empty() {
            return Err(GiveawayError::validation("title must not be empty"));
        }
        if request.winner_count == 0 {
            return Err(GiveawayError::validation("winner_count must be at least 1"));
        }
        if request.duration.is_zero() {
            return Err(GiveawayError::validation("duration must be positive"));
        }
        if request.reward_tokens.len() < request.winner_count as usize {
            return Err(GiveawayError::validation(format!(
                "insufficient reward tokens: {} provided, {} winners requested",
                request.reward_tokens.len(),
                request.winner_count
            )));
        }
        // Each token may be allocated to exactly one winner, so two copies
        // of the same token can never both be honored.
        let mut seen = std::collections::BTreeSet::new();
        if let Some(duplicate) = request
            .reward_tokens
            .iter()
            .find(|token| !seen.insert(token.as_str()))
        {
            return Err(GiveawayError::validation(format!(
                "duplicate reward token: {duplicate}"
            )));
        }
        Ok(())
    }

    fn lock_handle(&self, id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
