use crate::error::{GiveawayError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the giveaway lifecycle core.
///
/// Loaded once at startup and validated before any component starts. The
/// organizer id is an opaque authorization token already checked by the
/// inbound trigger; the core only carries it.
#[derive(Debug, Clone)]
pub struct GiveawayConfig {
    /// Directory holding the active snapshot and the archive
    pub data_dir: PathBuf,
    /// Countdown tick granularity
    pub tick_interval: Duration,
    /// Operator identity authorized to create giveaways
    pub organizer_id: String,
    /// Destination hint used when the creation trigger supplies none
    pub default_destination: String,
    /// Capacity of the lifecycle event broadcast channel
    pub event_channel_capacity: usize,
}

impl Default for GiveawayConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tick_interval: Duration::from_secs(60),
            organizer_id: "operator".to_string(),
            default_destination: "announcements".to_string(),
            event_channel_capacity: 1000,
        }
    }
}

impl GiveawayConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(data_dir) = std::env::var("GIVEAWAY_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(secs) = std::env::var("GIVEAWAY_TICK_INTERVAL_SECS") {
            let secs: u64 = secs.parse().map_err(|e| {
                GiveawayError::configuration(format!("Invalid tick_interval_secs: {e}"))
            })?;
            config.tick_interval = Duration::from_secs(secs);
        }

        if let Ok(organizer_id) = std::env::var("GIVEAWAY_ORGANIZER_ID") {
            config.organizer_id = organizer_id;
        }

        if let Ok(destination) = std::env::var("GIVEAWAY_DEFAULT_DESTINATION") {
            config.default_destination = destination;
        }

        if let Ok(capacity) = std::env::var("GIVEAWAY_EVENT_CHANNEL_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                GiveawayError::configuration(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate once at startup; invalid configuration is fatal
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(GiveawayError::configuration(
                "tick_interval must be positive",
            ));
        }
        if self.organizer_id.trim().is_empty() {
            return Err(GiveawayError::configuration("organizer_id must be set"));
        }
        if self.default_destination.trim().is_empty() {
            return Err(GiveawayError::configuration(
                "default_destination must be set",
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(GiveawayError::configuration(
                "event_channel_capacity must be positive",
            ));
        }
        Ok(())
    }
}
