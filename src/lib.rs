#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Giveaway Core
//!
//! Crash-recoverable lifecycle core for time-bounded group giveaways.
//!
//! ## Overview
//!
//! An organizer creates a giveaway with a prize, a winner count, a duration,
//! and a pool of reward tokens; participants register interest before the
//! deadline; at the deadline winners are chosen uniformly at random and
//! tokens are distributed exactly once per winner. This crate owns the hard
//! part: the concurrent state machine that enforces participation
//! invariants under concurrent joins, runs per-giveaway countdowns, and
//! allocates rewards exactly once against a store that survives restarts.
//!
//! Chat transports, command parsing, and presentation are external
//! collaborators behind the narrow [`transport::Transport`] trait.
//!
//! ## Architecture
//!
//! - The store is the single source of truth: every observable mutation is
//!   durable (atomic snapshot swap) before the operation is acknowledged.
//! - Operations on one giveaway id are serialized; different ids run fully
//!   in parallel.
//! - One supervised countdown task per ACTIVE giveaway; on restart the
//!   scheduler re-arms a task for every ACTIVE giveaway in the store.
//! - Transport failures are warnings, never rollbacks: a winner whose
//!   notification failed still keeps the token.
//!
//! ## Module Organization
//!
//! - [`models`] - The giveaway aggregate and its invariants
//! - [`store`] - Atomic-swap snapshot persistence plus archive
//! - [`state_machine`] - Giveaway state definitions
//! - [`lifecycle`] - Create / join / tick / terminate transitions
//! - [`scheduler`] - Per-giveaway countdown tasks and restart recovery
//! - [`transport`] - External messaging seam
//! - [`events`] - Lifecycle event broadcasting
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Structured error handling
//! - [`runtime`] - Composition root
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use giveaway_core::config::GiveawayConfig;
//! use giveaway_core::lifecycle::CreateGiveaway;
//! use giveaway_core::runtime::GiveawayRuntime;
//! use giveaway_core::transport::NullTransport;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GiveawayConfig::from_env()?;
//! let runtime = GiveawayRuntime::start(config, Arc::new(NullTransport)).await?;
//!
//! let giveaway = runtime
//!     .create_giveaway(CreateGiveaway {
//!         title: "Mechanical keyboard".to_string(),
//!         description: "Three keyboards, two winners".to_string(),
//!         winner_count: 2,
//!         duration: Duration::from_secs(3600),
//!         reward_tokens: vec!["KB-A".into(), "KB-B".into(), "KB-C".into()],
//!         destination_hint: "announcements".to_string(),
//!     })
//!     .await?;
//!
//! runtime.join(giveaway.id, "user-1", "alice").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod runtime;
pub mod scheduler;
pub mod state_machine;
pub mod store;
pub mod transport;

pub use config::GiveawayConfig;
pub use error::{GiveawayError, Result};
pub use events::{EventPublisher, LifecycleEvent};
pub use lifecycle::{
    CreateGiveaway, JoinOutcome, LifecycleManager, TerminationReport, TickOutcome,
};
pub use models::{Destination, Giveaway, Participant, WinnerAward};
pub use runtime::GiveawayRuntime;
pub use scheduler::CountdownScheduler;
pub use state_machine::GiveawayState;
pub use store::SnapshotStore;
pub use transport::{NullTransport, Transport, TransportError};
