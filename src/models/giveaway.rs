//! # Giveaway Aggregate
//!
//! The aggregate root owned by the lifecycle manager. All mutation goes
//! through the manager under per-id serialization; the model itself only
//! enforces the structural invariants that hold at every observable state:
//! unique participant ids, token disjointness, and a one-directional
//! `active -> ended` status transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::state_machine::GiveawayState;

/// One registered participant, keyed by an opaque transport-level id.
///
/// Display names are presentation-only: selection and notification always
/// key on `id`, so duplicate display names across distinct participants
/// cannot misattribute a reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub display_name: String,
}

/// Where the live announcement for a giveaway lives.
///
/// Set once at creation and used for in-place edits afterwards. The core
/// treats both fields as opaque transport references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub channel: String,
    pub message_ref: String,
}

/// One (winner, token) pairing recorded at termination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerAward {
    pub participant_id: String,
    pub display_name: String,
    pub token: String,
}

/// The giveaway aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Giveaway {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub winner_count: u32,
    /// Ordered reward pool, consumed front-to-back at termination; never
    /// re-ordered.
    pub reward_tokens: Vec<String>,
    /// Tokens already allocated. Disjoint from `reward_tokens` by
    /// construction; a token moved here never returns.
    pub used_tokens: BTreeSet<String>,
    /// Fixed at creation (`created_at + duration`), immutable afterwards.
    pub end_time: DateTime<Utc>,
    /// Insertion order preserved for display; ids unique.
    pub participants: Vec<Participant>,
    pub destination: Destination,
    pub status: GiveawayState,
    /// Empty while active; filled exactly once at termination.
    pub winners: Vec<WinnerAward>,
    pub created_at: DateTime<Utc>,
}

impl Giveaway {
    /// Construct a new active giveaway ending at `end_time`.
    ///
    /// Parameter validation (positive winner count, sufficient tokens)
    /// belongs to the lifecycle manager; this constructor only shapes the
    /// aggregate.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        winner_count: u32,
        reward_tokens: Vec<String>,
        end_time: DateTime<Utc>,
        destination: Destination,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            winner_count,
            reward_tokens,
            used_tokens: BTreeSet::new(),
            end_time,
            participants: Vec::new(),
            destination,
            status: GiveawayState::Active,
            winners: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Check whether a participant id is already registered
    pub fn has_participant(&self, participant_id: &str) -> bool {
        self.participants.iter().any(|p| p.id == participant_id)
    }

    /// Number of registered participants
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Whole seconds until the deadline, saturating at zero
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.end_time - now).num_seconds().max(0)
    }

    /// Whether the deadline has passed as of `now`
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }

    /// Structural invariants that must hold at every observable state.
    ///
    /// Exercised by tests and by the store on load; a violation indicates
    /// corruption or a logic error, not a caller mistake.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = BTreeSet::new();
        for p in &self.participants {
            if !seen.insert(p.id.as_str()) {
                return Err(format!("duplicate participant id: {}", p.id));
            }
        }

        if let Some(token) = self
            .reward_tokens
            .iter()
            .find(|t| self.used_tokens.contains(*t))
        {
            return Err(format!("token present in both pool and used set: {token}"));
        }

        if self.winners.len() != self.used_tokens.len() {
            return Err(format!(
                "winner/used-token count mismatch: {} winners, {} used tokens",
                self.winners.len(),
                self.used_tokens.len()
            ));
        }

        let cap = (self.winner_count as usize).min(self.participants.len());
        if self.winners.len() > cap {
            return Err(format!(
                "too many winners: {} selected, cap is {cap}",
                self.winners.len()
            ));
        }

        if self.status.is_active() && !self.winners.is_empty() {
            return Err("active giveaway already has winners".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_giveaway() -> Giveaway {
        Giveaway::new(
            "Mechanical keyboard",
            "One of three keyboards up for grabs",
            2,
            vec!["KB-A".to_string(), "KB-B".to_string(), "KB-C".to_string()],
            Utc::now() + Duration::minutes(30),
            Destination {
                channel: "announcements".to_string(),
                message_ref: "msg-100".to_string(),
            },
        )
    }

    #[test]
    fn test_new_giveaway_is_active_and_empty() {
        let g = sample_giveaway();
        assert_eq!(g.status, GiveawayState::Active);
        assert!(g.participants.is_empty());
        assert!(g.used_tokens.is_empty());
        assert!(g.winners.is_empty());
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_participant_lookup_and_order() {
        let mut g = sample_giveaway();
        g.participants.push(Participant {
            id: "u1".to_string(),
            display_name: "alice".to_string(),
        });
        g.participants.push(Participant {
            id: "u2".to_string(),
            display_name: "bob".to_string(),
        });

        assert!(g.has_participant("u1"));
        assert!(!g.has_participant("u3"));
        assert_eq!(g.participants[0].id, "u1");
        assert_eq!(g.participants[1].id, "u2");
    }

    #[test]
    fn test_remaining_seconds_saturates() {
        let g = sample_giveaway();
        assert!(g.remaining_seconds(Utc::now()) > 0);
        assert_eq!(g.remaining_seconds(g.end_time + Duration::hours(1)), 0);
        assert!(g.is_past_deadline(g.end_time));
        assert!(!g.is_past_deadline(g.end_time - Duration::seconds(1)));
    }

    #[test]
    fn test_invariant_violations_detected() {
        let mut g = sample_giveaway();
        g.participants.push(Participant {
            id: "u1".to_string(),
            display_name: "alice".to_string(),
        });
        g.participants.push(Participant {
            id: "u1".to_string(),
            display_name: "alice again".to_string(),
        });
        assert!(g.check_invariants().is_err());

        let mut g = sample_giveaway();
        g.used_tokens.insert("KB-A".to_string());
        assert!(g.check_invariants().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut g = sample_giveaway();
        g.participants.push(Participant {
            id: "u1".to_string(),
            display_name: "alice".to_string(),
        });

        let json = serde_json::to_string(&g).unwrap();
        let parsed: Giveaway = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, g);
    }
}
