//! Data layer for the giveaway lifecycle core.

pub mod giveaway;

pub use giveaway::{Destination, Giveaway, Participant, WinnerAward};
