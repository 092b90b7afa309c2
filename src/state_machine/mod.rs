// State machine module for the giveaway lifecycle
//
// A giveaway has exactly two states and a single one-directional transition.
// The transition itself (winner selection, reward allocation, persistence)
// is driven by the lifecycle manager; this module owns the state definitions.

pub mod states;

pub use states::GiveawayState;
