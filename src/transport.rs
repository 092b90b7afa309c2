//! # Messaging Transport Seam
//!
//! The lifecycle core never talks to a chat service directly. It calls out
//! through [`Transport`] with three operation shapes: post an announcement,
//! edit it in place, and deliver a private message. All three are fallible
//! and non-blocking to state transitions: a delivery failure is logged and
//! surfaced as a warning, never rolled back into the state machine.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Destination;

/// A transport-level delivery failure.
///
/// Always non-fatal to the lifecycle core: the triggering state transition
/// stays committed and the failure is surfaced for operator follow-up.
#[derive(Debug, Error)]
#[error("{operation}: {message}")]
pub struct TransportError {
    pub operation: String,
    pub message: String,
}

impl TransportError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

impl From<TransportError> for crate::error::GiveawayError {
    fn from(err: TransportError) -> Self {
        Self::TransportDelivery {
            operation: err.operation,
            message: err.message,
        }
    }
}

/// External messaging collaborator
///
/// Implementations adapt a concrete chat service (or a test recorder). Text
/// is plain; presentation formatting is the adapter's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post a new announcement with a join affordance, returning where it
    /// lives so the core can edit it in place later
    async fn announce(&self, destination_hint: &str, text: &str) -> TransportResult<Destination>;

    /// Edit an existing announcement in place
    async fn update_announcement(
        &self,
        destination: &Destination,
        text: &str,
    ) -> TransportResult<()>;

    /// Deliver a private message to one participant
    async fn deliver_private(&self, participant_id: &str, text: &str) -> TransportResult<()>;
}

/// Transport that swallows everything. Useful for headless operation and
/// as a default in tests that do not inspect announcements.
#[derive(Debug, Default)]
pub struct NullTransport;

#[async_trait]
impl Transport for NullTransport {
    async fn announce(&self, destination_hint: &str, _text: &str) -> TransportResult<Destination> {
        Ok(Destination {
            channel: destination_hint.to_string(),
            message_ref: String::new(),
        })
    }

    async fn update_announcement(
        &self,
        _destination: &Destination,
        _text: &str,
    ) -> TransportResult<()> {
        Ok(())
    }

    async fn deliver_private(&self, _participant_id: &str, _text: &str) -> TransportResult<()> {
        Ok(())
    }
}
