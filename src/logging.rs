//! # Structured Logging Module
//!
//! Environment-aware `tracing` initialization for embedders that do not
//! install their own subscriber. Console output with an env-driven filter;
//! JSON formatting opt-in for log aggregation.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process.
///
/// Filter comes from `GIVEAWAY_LOG` (default `info`); set
/// `GIVEAWAY_LOG_FORMAT=json` for machine-readable output. Safe to call
/// when a global subscriber is already installed.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_env("GIVEAWAY_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let json_format = std::env::var("GIVEAWAY_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let result = if json_format {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .json()
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .try_init()
        };

        if result.is_err() {
            // A global subscriber is already set; continue with it.
            tracing::debug!("Global tracing subscriber already initialized");
        }
    });
}

/// Log structured data for giveaway operations
pub fn log_giveaway_operation(
    operation: &str,
    giveaway_id: uuid::Uuid,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        giveaway_id = %giveaway_id,
        status = %status,
        details = details,
        "GIVEAWAY_OPERATION"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
        log_giveaway_operation("create", uuid::Uuid::nil(), "success", None);
    }
}
