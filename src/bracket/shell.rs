//! Bracket shell construction.
//!
//! Pure graph building: given a participant count and format, produce every
//! match shell with its round, position, section, round-1 seed pair, and
//! forward links. Deterministic for a fixed `(n, format)`; participant data
//! is never touched here.

use super::models::{BracketFormat, BracketSection, LinkTarget, MatchId, SlotIndex};
use super::seeding::{bracket_size_for, first_round_seeds, winners_round_count};

/// A match definition before participants are bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchShell {
    /// Ascending match number, also the persisted match id
    pub number: MatchId,
    pub round: u32,
    pub position: u32,
    pub section: BracketSection,
    /// Seeds slated for each slot; only round-1 winners shells carry seeds
    pub seeds: [Option<u32>; 2],
    pub winner_link: Option<LinkTarget>,
    pub loser_link: Option<LinkTarget>,
}

/// The full shell graph for one tournament
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellPlan {
    pub bracket_size: u32,
    pub winners_rounds: u32,
    pub losers_rounds: u32,
    /// Shells in ascending match-number order; every link points forward
    pub shells: Vec<MatchShell>,
}

/// Matches in winners round `r` (1-based) of a bracket of `size` slots
fn winners_matches_in(size: u32, r: u32) -> u32 {
    size >> r
}

/// Matches in losers round `j` (1-based). Round 1 pairs the fresh
/// winners-round-1 losers; even rounds are drop rounds receiving one fresh
/// winners-bracket loser per match; odd rounds past 1 pair drop-round
/// survivors.
fn losers_matches_in(winners_rounds: u32, j: u32) -> u32 {
    let r = winners_rounds;
    if j == 1 {
        1 << (r - 2)
    } else if j % 2 == 0 {
        1 << (r - 1 - j / 2)
    } else {
        1 << (r - 2 - j / 2)
    }
}

/// Build the complete match graph for `n` participants.
///
/// `bracket_size` is the next power of two; `n == 1` yields zero shells.
/// Winners rounds are numbered first, then losers rounds, then the grand
/// final, so every forward link targets a higher match number.
#[must_use]
pub fn build_shells(n: u32, format: BracketFormat) -> ShellPlan {
    let size = bracket_size_for(n);
    let winners_rounds = winners_round_count(size);

    if winners_rounds == 0 {
        return ShellPlan {
            bracket_size: size,
            winners_rounds: 0,
            losers_rounds: 0,
            shells: Vec::new(),
        };
    }

    let double = format == BracketFormat::DoubleElimination;
    let losers_rounds = if double && winners_rounds >= 2 {
        2 * (winners_rounds - 1)
    } else {
        0
    };

    // First match number of each round, winners then losers.
    let mut winners_base = vec![0 as MatchId; winners_rounds as usize + 1];
    let mut next = 1 as MatchId;
    for r in 1..=winners_rounds {
        winners_base[r as usize] = next;
        next += MatchId::from(winners_matches_in(size, r));
    }
    let mut losers_base = vec![0 as MatchId; losers_rounds as usize + 1];
    for j in 1..=losers_rounds {
        losers_base[j as usize] = next;
        next += MatchId::from(losers_matches_in(winners_rounds, j));
    }
    let grand_final = if double { Some(next) } else { None };

    let slot_seeds = first_round_seeds(size);
    let mut shells = Vec::with_capacity(next as usize);

    for r in 1..=winners_rounds {
        for i in 0..winners_matches_in(size, r) {
            let seeds = if r == 1 {
                let top = slot_seeds[2 * i as usize];
                let bottom = slot_seeds[2 * i as usize + 1];
                [Some(top), Some(bottom)]
            } else {
                [None, None]
            };

            let winner_link = if r < winners_rounds {
                Some(LinkTarget {
                    match_id: winners_base[r as usize + 1] + MatchId::from(i / 2),
                    slot: (i % 2) as SlotIndex,
                })
            } else {
                grand_final.map(|gf| LinkTarget {
                    match_id: gf,
                    slot: 0,
                })
            };

            let loser_link = if !double {
                None
            } else if winners_rounds == 1 {
                // Two-player double elimination: the winners final's loser
                // goes straight to the grand final.
                grand_final.map(|gf| LinkTarget {
                    match_id: gf,
                    slot: 1,
                })
            } else if r == 1 {
                Some(LinkTarget {
                    match_id: losers_base[1] + MatchId::from(i / 2),
                    slot: (i % 2) as SlotIndex,
                })
            } else {
                // Fresh losers drop into the even losers round fed by this
                // winners round; the winners final feeds the losers final.
                Some(LinkTarget {
                    match_id: losers_base[(2 * (r - 1)) as usize] + MatchId::from(i),
                    slot: 1,
                })
            };

            shells.push(MatchShell {
                number: winners_base[r as usize] + MatchId::from(i),
                round: r,
                position: i,
                section: BracketSection::Winners,
                seeds,
                winner_link,
                loser_link,
            });
        }
    }

    for j in 1..=losers_rounds {
        for i in 0..losers_matches_in(winners_rounds, j) {
            let winner_link = if j == losers_rounds {
                grand_final.map(|gf| LinkTarget {
                    match_id: gf,
                    slot: 1,
                })
            } else if j % 2 == 1 {
                Some(LinkTarget {
                    match_id: losers_base[j as usize + 1] + MatchId::from(i),
                    slot: 0,
                })
            } else {
                Some(LinkTarget {
                    match_id: losers_base[j as usize + 1] + MatchId::from(i / 2),
                    slot: (i % 2) as SlotIndex,
                })
            };

            shells.push(MatchShell {
                number: losers_base[j as usize] + MatchId::from(i),
                round: j,
                position: i,
                section: BracketSection::Losers,
                seeds: [None, None],
                winner_link,
                loser_link: None,
            });
        }
    }

    if let Some(gf) = grand_final {
        shells.push(MatchShell {
            number: gf,
            round: losers_rounds + 1,
            position: 0,
            section: BracketSection::GrandFinal,
            seeds: [None, None],
            winner_link: None,
            loser_link: None,
        });
    }

    ShellPlan {
        bracket_size: size,
        winners_rounds,
        losers_rounds,
        shells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn by_number(plan: &ShellPlan) -> HashMap<MatchId, &MatchShell> {
        plan.shells.iter().map(|s| (s.number, s)).collect()
    }

    #[test]
    fn test_one_participant_builds_nothing() {
        let plan = build_shells(1, BracketFormat::SingleElimination);
        assert_eq!(plan.bracket_size, 1);
        assert!(plan.shells.is_empty());
    }

    #[test]
    fn test_single_elimination_counts() {
        for n in 2..=33u32 {
            let plan = build_shells(n, BracketFormat::SingleElimination);
            let size = n.next_power_of_two();
            assert_eq!(plan.bracket_size, size);
            assert_eq!(plan.winners_rounds, size.trailing_zeros());
            assert_eq!(plan.shells.len() as u32, size - 1, "n = {n}");
        }
    }

    #[test]
    fn test_double_elimination_counts() {
        for n in 3..=33u32 {
            let plan = build_shells(n, BracketFormat::DoubleElimination);
            let size = n.next_power_of_two();
            assert_eq!(plan.losers_rounds, 2 * (plan.winners_rounds - 1));
            // winners (size - 1) + losers (size - 2) + grand final
            assert_eq!(plan.shells.len() as u32, 2 * size - 2, "n = {n}");
        }
    }

    #[test]
    fn test_match_numbers_ascend_and_links_point_forward() {
        for format in [
            BracketFormat::SingleElimination,
            BracketFormat::DoubleElimination,
        ] {
            let plan = build_shells(13, format);
            for (i, shell) in plan.shells.iter().enumerate() {
                assert_eq!(shell.number, i as MatchId + 1);
                for link in [shell.winner_link, shell.loser_link].into_iter().flatten() {
                    assert!(link.match_id > shell.number);
                    assert!(link.slot < 2);
                }
            }
        }
    }

    #[test]
    fn test_every_slot_fed_exactly_once() {
        // Each non-round-1 slot must have exactly one inbound link.
        let plan = build_shells(16, BracketFormat::DoubleElimination);
        let mut inbound: HashMap<(MatchId, usize), u32> = HashMap::new();
        for shell in &plan.shells {
            for link in [shell.winner_link, shell.loser_link].into_iter().flatten() {
                *inbound.entry((link.match_id, link.slot)).or_default() += 1;
            }
        }
        for shell in &plan.shells {
            for slot in 0..2 {
                let fed = inbound.get(&(shell.number, slot)).copied().unwrap_or(0);
                if shell.section == BracketSection::Winners && shell.round == 1 {
                    assert_eq!(fed, 0, "round-1 slots are seeded, not fed");
                } else {
                    assert_eq!(fed, 1, "match {} slot {slot}", shell.number);
                }
            }
        }
    }

    #[test]
    fn test_single_elimination_size_eight_seed_layout() {
        let plan = build_shells(5, BracketFormat::SingleElimination);
        let round1: Vec<[Option<u32>; 2]> = plan
            .shells
            .iter()
            .filter(|s| s.round == 1)
            .map(|s| s.seeds)
            .collect();
        assert_eq!(
            round1,
            vec![
                [Some(1), Some(8)],
                [Some(4), Some(5)],
                [Some(3), Some(6)],
                [Some(2), Some(7)],
            ]
        );
    }

    #[test]
    fn test_only_terminal_matches_lack_winner_links() {
        let single = build_shells(8, BracketFormat::SingleElimination);
        let unlinked: Vec<MatchId> = single
            .shells
            .iter()
            .filter(|s| s.winner_link.is_none())
            .map(|s| s.number)
            .collect();
        assert_eq!(unlinked.len(), 1);
        assert_eq!(unlinked[0], 7); // the final

        let double = build_shells(8, BracketFormat::DoubleElimination);
        let unlinked: Vec<&MatchShell> = double
            .shells
            .iter()
            .filter(|s| s.winner_link.is_none())
            .collect();
        assert_eq!(unlinked.len(), 1);
        assert_eq!(unlinked[0].section, BracketSection::GrandFinal);
    }

    #[test]
    fn test_double_elimination_four_player_graph() {
        let plan = build_shells(4, BracketFormat::DoubleElimination);
        assert_eq!(plan.winners_rounds, 2);
        assert_eq!(plan.losers_rounds, 2);
        assert_eq!(plan.shells.len(), 6);

        let shells = by_number(&plan);
        // Winners round 1: matches 1, 2. Winners final: 3. Losers: 4, 5. GF: 6.
        assert_eq!(shells[&1].loser_link, Some(LinkTarget { match_id: 4, slot: 0 }));
        assert_eq!(shells[&2].loser_link, Some(LinkTarget { match_id: 4, slot: 1 }));
        assert_eq!(shells[&3].winner_link, Some(LinkTarget { match_id: 6, slot: 0 }));
        assert_eq!(shells[&3].loser_link, Some(LinkTarget { match_id: 5, slot: 1 }));
        assert_eq!(shells[&4].winner_link, Some(LinkTarget { match_id: 5, slot: 0 }));
        assert_eq!(shells[&5].winner_link, Some(LinkTarget { match_id: 6, slot: 1 }));
        assert_eq!(shells[&6].section, BracketSection::GrandFinal);
        assert_eq!(shells[&6].winner_link, None);
    }

    #[test]
    fn test_two_player_double_elimination_loser_feeds_grand_final() {
        let plan = build_shells(2, BracketFormat::DoubleElimination);
        assert_eq!(plan.losers_rounds, 0);
        assert_eq!(plan.shells.len(), 2);
        assert_eq!(
            plan.shells[0].winner_link,
            Some(LinkTarget { match_id: 2, slot: 0 })
        );
        assert_eq!(
            plan.shells[0].loser_link,
            Some(LinkTarget { match_id: 2, slot: 1 })
        );
    }

    #[test]
    fn test_winners_final_loser_drops_into_losers_final() {
        let plan = build_shells(8, BracketFormat::DoubleElimination);
        let winners_final = plan
            .shells
            .iter()
            .find(|s| s.section == BracketSection::Winners && s.round == plan.winners_rounds)
            .unwrap();
        let losers_final = plan
            .shells
            .iter()
            .find(|s| s.section == BracketSection::Losers && s.round == plan.losers_rounds)
            .unwrap();
        assert_eq!(
            winners_final.loser_link,
            Some(LinkTarget {
                match_id: losers_final.number,
                slot: 1
            })
        );
    }
}
