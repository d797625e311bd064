//! Seed assignment and first-round seed ordering.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::errors::{BracketError, BracketResult};
use super::models::PlayerId;

/// How seeds are assigned to the entry list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingMethod {
    /// Uniform shuffle before numbering
    Random,
    /// Input order numbered as-is (deterministic)
    Manual,
}

/// A participant with an assigned seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededEntry {
    pub player_id: PlayerId,
    pub partner_id: Option<PlayerId>,
    pub seed: u32,
}

/// Assign seeds 1..=N to the given entrants.
///
/// `partner_ids` runs parallel to `player_ids` for doubles play; pass `None`
/// entries for singles. Fails `InvalidInput` on an empty field or mismatched
/// array lengths, before anything is persisted.
pub fn assign_seeds(
    player_ids: &[PlayerId],
    partner_ids: &[Option<PlayerId>],
    method: SeedingMethod,
    rng: &mut impl Rng,
) -> BracketResult<Vec<SeededEntry>> {
    if player_ids.is_empty() {
        return Err(BracketError::InvalidInput(
            "participant list is empty".into(),
        ));
    }
    if partner_ids.len() != player_ids.len() {
        return Err(BracketError::InvalidInput(format!(
            "{} participants but {} partner entries",
            player_ids.len(),
            partner_ids.len()
        )));
    }

    let mut entries: Vec<(PlayerId, Option<PlayerId>)> = player_ids
        .iter()
        .copied()
        .zip(partner_ids.iter().copied())
        .collect();

    if method == SeedingMethod::Random {
        entries.shuffle(rng);
    }

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(i, (player_id, partner_id))| SeededEntry {
            player_id,
            partner_id,
            seed: i as u32 + 1,
        })
        .collect())
}

/// Smallest power of two that fits `n` participants
#[must_use]
pub fn bracket_size_for(n: u32) -> u32 {
    n.next_power_of_two()
}

/// Number of winners-bracket rounds for a bracket of `bracket_size` slots
#[must_use]
pub fn winners_round_count(bracket_size: u32) -> u32 {
    bracket_size.trailing_zeros()
}

/// Seed occupying each round-1 slot, top to bottom, for a full bracket.
///
/// Grown from `[1]` by pairing each seed with its complement
/// (`size + 1 - seed`) at every doubling, with the bottom half's matches
/// mirrored. Adjacent slots `(2i, 2i + 1)` form match `i`. Seeds 1 and 2
/// land in opposite halves, so they can only meet in the final, and when the
/// field is short the byes (seeds above N) fall against the top seeds.
#[must_use]
pub fn first_round_seeds(bracket_size: u32) -> Vec<u32> {
    let mut order = vec![1u32];
    let mut size = 1u32;
    while size < bracket_size {
        size *= 2;
        let pairs: Vec<[u32; 2]> = order.iter().map(|&s| [s, size + 1 - s]).collect();
        let (top, bottom) = pairs.split_at(pairs.len() / 2);
        order = top
            .iter()
            .chain(bottom.iter().rev())
            .flatten()
            .copied()
            .collect();
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bracket_size() {
        assert_eq!(bracket_size_for(1), 1);
        assert_eq!(bracket_size_for(2), 2);
        assert_eq!(bracket_size_for(5), 8);
        assert_eq!(bracket_size_for(8), 8);
        assert_eq!(bracket_size_for(9), 16);
    }

    #[test]
    fn test_winners_round_count() {
        assert_eq!(winners_round_count(1), 0);
        assert_eq!(winners_round_count(2), 1);
        assert_eq!(winners_round_count(8), 3);
        assert_eq!(winners_round_count(16), 4);
    }

    #[test]
    fn test_first_round_seeds_small_sizes() {
        assert_eq!(first_round_seeds(1), vec![1]);
        assert_eq!(first_round_seeds(2), vec![1, 2]);
        assert_eq!(first_round_seeds(4), vec![1, 4, 2, 3]);
        assert_eq!(first_round_seeds(8), vec![1, 8, 4, 5, 3, 6, 2, 7]);
    }

    #[test]
    fn test_first_round_seeds_is_permutation() {
        for exp in 0..7 {
            let size = 1u32 << exp;
            let mut order = first_round_seeds(size);
            order.sort_unstable();
            let expected: Vec<u32> = (1..=size).collect();
            assert_eq!(order, expected, "size {size}");
        }
    }

    #[test]
    fn test_first_round_pairs_are_complements() {
        for exp in 1..7 {
            let size = 1u32 << exp;
            let order = first_round_seeds(size);
            for pair in order.chunks(2) {
                assert_eq!(pair[0] + pair[1], size + 1, "size {size}");
            }
        }
    }

    #[test]
    fn test_top_two_seeds_in_opposite_halves() {
        for exp in 1..7 {
            let size = 1usize << exp;
            let order = first_round_seeds(size as u32);
            let pos1 = order.iter().position(|&s| s == 1).unwrap();
            let pos2 = order.iter().position(|&s| s == 2).unwrap();
            assert!(pos1 < size / 2, "seed 1 in top half, size {size}");
            assert!(pos2 >= size / 2, "seed 2 in bottom half, size {size}");
        }
    }

    #[test]
    fn test_manual_seeding_preserves_order() {
        let players = vec![30, 10, 20];
        let partners = vec![None, None, None];
        let mut rng = StdRng::seed_from_u64(0);
        let seeded = assign_seeds(&players, &partners, SeedingMethod::Manual, &mut rng).unwrap();
        assert_eq!(
            seeded.iter().map(|e| e.player_id).collect::<Vec<_>>(),
            players
        );
        assert_eq!(seeded.iter().map(|e| e.seed).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_random_seeding_is_a_permutation() {
        let players: Vec<PlayerId> = (1..=16).collect();
        let partners = vec![None; 16];
        let mut rng = StdRng::seed_from_u64(42);
        let seeded = assign_seeds(&players, &partners, SeedingMethod::Random, &mut rng).unwrap();

        let mut seeds: Vec<u32> = seeded.iter().map(|e| e.seed).collect();
        seeds.sort_unstable();
        assert_eq!(seeds, (1..=16).collect::<Vec<_>>());

        let mut ids: Vec<PlayerId> = seeded.iter().map(|e| e.player_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, players);
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = assign_seeds(&[], &[], SeedingMethod::Manual, &mut rng).unwrap_err();
        assert!(matches!(err, BracketError::InvalidInput(_)));
    }

    #[test]
    fn test_mismatched_partner_list_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = assign_seeds(&[1, 2], &[None], SeedingMethod::Manual, &mut rng).unwrap_err();
        assert!(matches!(err, BracketError::InvalidInput(_)));
    }

    #[test]
    fn test_partners_travel_with_players() {
        let players = vec![1, 2, 3, 4];
        let partners = vec![Some(11), Some(12), Some(13), Some(14)];
        let mut rng = StdRng::seed_from_u64(7);
        let seeded = assign_seeds(&players, &partners, SeedingMethod::Random, &mut rng).unwrap();
        for entry in seeded {
            assert_eq!(entry.partner_id, Some(entry.player_id + 10));
        }
    }
}
