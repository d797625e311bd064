//! Match materialization: binding seeded participants into shell matches.
//!
//! Produces the persistence-ready match set and participant records for a
//! new tournament. Round-1 byes complete immediately and their occupants are
//! propagated one hop into the next round, so the bracket comes out of
//! creation already playable.

use std::collections::HashMap;

use chrono::Utc;

use super::models::{
    BracketFormat, BracketMatch, MatchId, MatchProgress, MatchSlot, Participant,
    ParticipantStatus, SlotEntrant, TournamentId,
};
use super::seeding::SeededEntry;
use super::shell::ShellPlan;

/// The initial persisted state of a bracket
#[derive(Debug, Clone)]
pub struct MaterializedBracket {
    pub matches: Vec<BracketMatch>,
    pub participants: Vec<Participant>,
}

/// Possible entrants each match can ever receive, walked forward over the
/// link graph. A match emits a winner iff it can receive at least one
/// entrant, and a loser iff it can receive two; a bye emits no loser, which
/// is what starves parts of the losers bracket when the field is short.
fn entrant_capacities(plan: &ShellPlan, n: u32) -> HashMap<MatchId, u8> {
    let mut capacity: HashMap<MatchId, u8> = HashMap::new();
    for shell in &plan.shells {
        let seeded = shell
            .seeds
            .iter()
            .flatten()
            .filter(|&&seed| seed <= n)
            .count() as u8;
        *capacity.entry(shell.number).or_insert(0) += seeded;
    }
    // Shells are in ascending number order and links only point forward, so
    // one pass settles every match.
    for shell in &plan.shells {
        let cap = capacity.get(&shell.number).copied().unwrap_or(0);
        if cap >= 1 {
            if let Some(link) = shell.winner_link {
                *capacity.entry(link.match_id).or_insert(0) += 1;
            }
        }
        if cap == 2 {
            if let Some(link) = shell.loser_link {
                *capacity.entry(link.match_id).or_insert(0) += 1;
            }
        }
    }
    capacity
}

/// Bind seeds into the shell plan and compute every match's initial state.
#[must_use]
pub fn materialize(
    tournament_id: TournamentId,
    plan: &ShellPlan,
    entries: &[SeededEntry],
) -> MaterializedBracket {
    debug_assert_eq!(plan.bracket_size, (entries.len() as u32).next_power_of_two());

    let participants: Vec<Participant> = entries
        .iter()
        .map(|entry| Participant {
            tournament_id,
            player_id: entry.player_id,
            partner_id: entry.partner_id,
            seed: entry.seed,
            status: ParticipantStatus::Active,
            eliminated_round: None,
        })
        .collect();

    let n = entries.len() as u32;
    let by_seed: HashMap<u32, SlotEntrant> = participants
        .iter()
        .map(|p| (p.seed, p.as_entrant()))
        .collect();
    let capacity = entrant_capacities(plan, n);

    let mut matches: Vec<BracketMatch> = plan
        .shells
        .iter()
        .map(|shell| {
            let cap = capacity.get(&shell.number).copied().unwrap_or(0);
            let mut slots = [MatchSlot::default(), MatchSlot::default()];
            for (slot, seed) in slots.iter_mut().zip(shell.seeds) {
                slot.entrant = seed.and_then(|s| by_seed.get(&s).copied());
            }

            let mut m = BracketMatch {
                id: shell.number,
                tournament_id,
                round: shell.round,
                position: shell.position,
                section: shell.section,
                slots,
                winner: None,
                is_bye: cap <= 1,
                progress: MatchProgress::Empty,
                winner_link: shell.winner_link,
                loser_link: shell.loser_link,
                completed_at: None,
            };
            if cap == 0 {
                // Void: nobody can ever enter, e.g. a losers-bracket pairing
                // of two winners-round byes. Completed with no winner.
                m.progress = MatchProgress::Completed;
            } else {
                m.refresh_progress();
            }
            m
        })
        .collect();

    // Round-1 byes already hold their sole occupant: complete them and copy
    // the winner forward. Targets are never byes themselves (every
    // winners-bracket match past round 1 can receive two entrants), so one
    // hop suffices at build time.
    let now = Utc::now();
    let index: HashMap<MatchId, usize> =
        matches.iter().enumerate().map(|(i, m)| (m.id, i)).collect();
    for i in 0..matches.len() {
        if !matches[i].is_bye {
            continue;
        }
        let Some(entrant) = matches[i].sole_entrant() else {
            continue;
        };
        matches[i].winner = Some(entrant.player_id);
        matches[i].progress = MatchProgress::Completed;
        matches[i].completed_at = Some(now);
        if let Some(link) = matches[i].winner_link {
            let target = &mut matches[index[&link.match_id]];
            target.slots[link.slot].entrant = Some(entrant);
            target.refresh_progress();
        }
    }

    MaterializedBracket {
        matches,
        participants,
    }
}
