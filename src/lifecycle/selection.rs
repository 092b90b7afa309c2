//! # Winner Selection & Reward Allocation
//!
//! Selection draws distinct participants uniformly without replacement from
//! the registered set, keyed by participant id. The RNG is the thread-local
//! OS-seeded generator; outcomes must not be predictable from public
//! information, so a fixed seed is never acceptable here.
//!
//! Allocation consumes the reward pool front-to-back in selection order:
//! each award moves exactly one token from the pool into the used set and
//! records the (winner, token) pairing. Callers guarantee the pool holds at
//! least `winner_count` tokens (enforced at creation) and that allocation
//! runs at most once per giveaway (terminate is idempotent).

use rand::seq::SliceRandom;

use crate::models::{Giveaway, Participant, WinnerAward};

/// Draw `min(winner_count, participants.len())` distinct winners uniformly
/// at random without replacement. An empty participant set yields an empty
/// winner set, which is a valid terminal outcome.
pub fn draw_winners(participants: &[Participant], winner_count: usize) -> Vec<Participant> {
    let amount = winner_count.min(participants.len());
    let mut rng = rand::thread_rng();
    participants
        .choose_multiple(&mut rng, amount)
        .cloned()
        .collect()
}

/// Allocate one reward token per winner, front-to-back in selection order.
///
/// Mutates the giveaway in place: tokens move from `reward_tokens` into
/// `used_tokens` and the pairings are appended to `winners`. Returns the
/// awards made by this call.
pub fn allocate_rewards(giveaway: &mut Giveaway, winners: &[Participant]) -> Vec<WinnerAward> {
    let mut awards = Vec::with_capacity(winners.len());

    for winner in winners {
        if giveaway.reward_tokens.is_empty() {
            // Creation guarantees pool >= winner_count, so this only trips
            // on a logic error upstream; stop allocating rather than panic.
            tracing::error!(
                giveaway_id = %giveaway.id,
                "Reward pool exhausted before all winners were served"
            );
            break;
        }
        let token = giveaway.reward_tokens.remove(0);
        giveaway.used_tokens.insert(token.clone());

        let award = WinnerAward {
            participant_id: winner.id.clone(),
            display_name: winner.display_name.clone(),
            token,
        };
        giveaway.winners.push(award.clone());
        awards.push(award);
    }

    awards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Destination;
    use chrono::{Duration, Utc};
    use std::collections::BTreeSet;

    fn participants(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant {
                id: format!("u{i}"),
                display_name: format!("user {i}"),
            })
            .collect()
    }

    fn giveaway_with_tokens(tokens: &[&str], winner_count: u32) -> Giveaway {
        Giveaway::new(
            "Selection test",
            "",
            winner_count,
            tokens.iter().map(|t| t.to_string()).collect(),
            Utc::now() + Duration::minutes(1),
            Destination {
                channel: "c".to_string(),
                message_ref: "m".to_string(),
            },
        )
    }

    #[test]
    fn test_draw_respects_winner_bound() {
        let pool = participants(10);
        let winners = draw_winners(&pool, 3);
        assert_eq!(winners.len(), 3);

        let winners = draw_winners(&pool, 25);
        assert_eq!(winners.len(), 10);
    }

    #[test]
    fn test_draw_from_empty_set_is_empty() {
        assert!(draw_winners(&[], 5).is_empty());
    }

    #[test]
    fn test_winners_are_distinct() {
        let pool = participants(8);
        for _ in 0..50 {
            let winners = draw_winners(&pool, 5);
            let ids: BTreeSet<&str> = winners.iter().map(|w| w.id.as_str()).collect();
            assert_eq!(ids.len(), winners.len());
        }
    }

    #[test]
    fn test_allocation_consumes_pool_front_to_back() {
        let mut g = giveaway_with_tokens(&["A", "B", "C"], 2);
        let winners = participants(2);

        let awards = allocate_rewards(&mut g, &winners);

        assert_eq!(awards.len(), 2);
        assert_eq!(awards[0].token, "A");
        assert_eq!(awards[1].token, "B");
        assert_eq!(g.reward_tokens, vec!["C".to_string()]);
        assert_eq!(g.used_tokens.len(), 2);
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_allocation_pairs_selection_order() {
        let mut g = giveaway_with_tokens(&["A", "B"], 2);
        let winners = participants(2);

        allocate_rewards(&mut g, &winners);

        assert_eq!(g.winners[0].participant_id, "u0");
        assert_eq!(g.winners[0].token, "A");
        assert_eq!(g.winners[1].participant_id, "u1");
        assert_eq!(g.winners[1].token, "B");
    }

    #[test]
    fn test_allocation_stops_on_exhausted_pool() {
        let mut g = giveaway_with_tokens(&["A"], 1);
        let winners = participants(3);

        let awards = allocate_rewards(&mut g, &winners);

        assert_eq!(awards.len(), 1);
        assert!(g.reward_tokens.is_empty());
    }
}
