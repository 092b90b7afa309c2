//! Property-based tests for winner selection and reward allocation.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use giveaway_core::lifecycle::selection::{allocate_rewards, draw_winners};
use giveaway_core::models::{Destination, Giveaway, Participant};
use proptest::prelude::*;

fn participants_strategy() -> impl Strategy<Value = Vec<Participant>> {
    (0usize..40).prop_map(|n| {
        (0..n)
            .map(|i| Participant {
                id: format!("user-{i}"),
                display_name: format!("User {i}"),
            })
            .collect()
    })
}

fn giveaway_with(tokens: Vec<String>, winner_count: u32) -> Giveaway {
    Giveaway::new(
        "Property test",
        "",
        winner_count,
        tokens,
        Utc::now() + Duration::minutes(1),
        Destination {
            channel: "c".to_string(),
            message_ref: "m".to_string(),
        },
    )
}

proptest! {
    /// Property: |winners| == min(winner_count, |participants|), and every
    /// winner is a distinct registered participant
    #[test]
    fn winner_bound_holds(participants in participants_strategy(), winner_count in 0usize..50) {
        let winners = draw_winners(&participants, winner_count);

        prop_assert_eq!(winners.len(), winner_count.min(participants.len()));

        let ids: BTreeSet<&str> = winners.iter().map(|w| w.id.as_str()).collect();
        prop_assert_eq!(ids.len(), winners.len(), "winners must be distinct");

        let registered: BTreeSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();
        for id in ids {
            prop_assert!(registered.contains(id));
        }
    }

    /// Property: allocation never puts a token in both the remaining pool
    /// and the used set, and |used_tokens| == |winners|
    #[test]
    fn token_uniqueness_holds(
        participant_count in 0usize..20,
        extra_tokens in 0usize..10,
    ) {
        let participants: Vec<Participant> = (0..participant_count)
            .map(|i| Participant {
                id: format!("user-{i}"),
                display_name: format!("User {i}"),
            })
            .collect();

        let winner_count = participant_count.min(5) as u32;
        let token_total = winner_count as usize + extra_tokens;
        let tokens: Vec<String> = (0..token_total).map(|i| format!("TOKEN-{i}")).collect();

        let mut giveaway = giveaway_with(tokens, winner_count.max(1));
        giveaway.participants = participants;

        let winners = draw_winners(&giveaway.participants, winner_count as usize);
        let awards = allocate_rewards(&mut giveaway, &winners);

        prop_assert_eq!(giveaway.used_tokens.len(), awards.len());
        prop_assert_eq!(giveaway.winners.len(), awards.len());
        for token in &giveaway.used_tokens {
            prop_assert!(!giveaway.reward_tokens.contains(token));
        }
        prop_assert!(giveaway.check_invariants().is_ok());

        // Each token allocated to exactly one winner
        let allocated: BTreeSet<&str> = awards.iter().map(|a| a.token.as_str()).collect();
        prop_assert_eq!(allocated.len(), awards.len());
    }

    /// Property: allocation consumes the pool strictly front-to-back
    #[test]
    fn allocation_is_front_to_back(winner_count in 1usize..8, pool_extra in 0usize..5) {
        let tokens: Vec<String> = (0..winner_count + pool_extra)
            .map(|i| format!("TOKEN-{i}"))
            .collect();
        let winners: Vec<Participant> = (0..winner_count)
            .map(|i| Participant {
                id: format!("user-{i}"),
                display_name: format!("User {i}"),
            })
            .collect();

        let mut giveaway = giveaway_with(tokens.clone(), winner_count as u32);
        giveaway.participants = winners.clone();

        let awards = allocate_rewards(&mut giveaway, &winners);

        for (i, award) in awards.iter().enumerate() {
            prop_assert_eq!(&award.token, &tokens[i]);
        }
        prop_assert_eq!(giveaway.reward_tokens.as_slice(), &tokens[winner_count..]);
    }
}
