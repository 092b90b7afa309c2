//! # Giveaway Error Types
//!
//! Structured error handling for the lifecycle core using thiserror
//! instead of `Box<dyn Error>` patterns.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the giveaway lifecycle core
#[derive(Error, Debug)]
pub enum GiveawayError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Giveaway not found: {giveaway_id}")]
    NotFound { giveaway_id: Uuid },

    #[error("Corrupt giveaway store at {path}: {message}")]
    CorruptState { path: String, message: String },

    #[error("Storage error: {operation}: {message}")]
    Storage { operation: String, message: String },

    #[error("Transport delivery failed: {operation}: {message}")]
    TransportDelivery { operation: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl GiveawayError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error for the given giveaway id
    pub fn not_found(giveaway_id: Uuid) -> Self {
        Self::NotFound { giveaway_id }
    }

    /// Create a corrupt-state error for a persisted snapshot
    pub fn corrupt_state(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptState {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a storage error for a durable-write operation
    pub fn storage(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a transport delivery error
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransportDelivery {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the error leaves persisted state untouched and the caller
    /// may retry with corrected input
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, GiveawayError>;
