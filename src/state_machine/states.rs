use serde::{Deserialize, Serialize};
use std::fmt;

/// Giveaway state definitions
///
/// The lifecycle is deliberately minimal: a giveaway is either accepting
/// participants (`Active`) or it has terminated (`Ended`). The transition
/// happens exactly once and is never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiveawayState {
    /// Accepting joins, countdown running
    Active,
    /// Winners selected and rewards allocated; terminal
    Ended,
}

impl GiveawayState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended)
    }

    /// Check if this is an active state (joins accepted, countdown running)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for GiveawayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

impl std::str::FromStr for GiveawayState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "ended" => Ok(Self::Ended),
            _ => Err(format!("Invalid giveaway state: {s}")),
        }
    }
}

/// Default state for new giveaways
impl Default for GiveawayState {
    fn default() -> Self {
        Self::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_check() {
        assert!(GiveawayState::Ended.is_terminal());
        assert!(!GiveawayState::Active.is_terminal());
        assert!(GiveawayState::Active.is_active());
        assert!(!GiveawayState::Ended.is_active());
    }

    #[test]
    fn test_state_string_conversion() {
        assert_eq!(GiveawayState::Active.to_string(), "active");
        assert_eq!(
            "ended".parse::<GiveawayState>().unwrap(),
            GiveawayState::Ended
        );
        assert!("cancelled".parse::<GiveawayState>().is_err());
    }

    #[test]
    fn test_state_serde() {
        let state = GiveawayState::Active;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"active\"");

        let parsed: GiveawayState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
