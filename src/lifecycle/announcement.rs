//! Plain-text announcement bodies.
//!
//! The core guarantees which fields an announcement carries; templates,
//! emoji, and locale belong to the transport adapter. Remaining time is
//! rendered as `HH:MM:SS` from whole seconds.

use chrono::{DateTime, Utc};

use crate::models::Giveaway;

/// Render remaining seconds as `HH:MM:SS`, saturating at zero
pub fn format_remaining(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Body for a live announcement (initial post and every refresh)
pub fn live_text(giveaway: &Giveaway, now: DateTime<Utc>) -> String {
    format!(
        "GIVEAWAY\nPrize: {}\nWinners: {}\nParticipants: {}\nTime left: {}\nJoin to participate",
        giveaway.title,
        giveaway.winner_count,
        giveaway.participant_count(),
        format_remaining(giveaway.remaining_seconds(now)),
    )
}

/// Body for the final announcement after termination
pub fn closed_text(giveaway: &Giveaway) -> String {
    let winner_lines = if giveaway.winners.is_empty() {
        "No winners".to_string()
    } else {
        giveaway
            .winners
            .iter()
            .map(|w| w.display_name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "GIVEAWAY ENDED\nPrize: {}\nTotal participants: {}\nWinners:\n{}",
        giveaway.title,
        giveaway.participant_count(),
        winner_lines,
    )
}

/// Private message delivered to one winner
pub fn winner_text(giveaway: &Giveaway, token: &str) -> String {
    format!(
        "You won the giveaway \"{}\". Your reward: {}",
        giveaway.title, token,
    )
}
