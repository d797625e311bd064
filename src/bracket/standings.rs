//! Final and interim standings.

use serde::{Deserialize, Serialize};

use super::models::{Participant, ParticipantStatus, PlayerId};

/// One line of the placement report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// 1-based place
    pub place: u32,
    pub player_id: PlayerId,
    pub partner_id: Option<PlayerId>,
    pub seed: u32,
    pub status: ParticipantStatus,
    pub eliminated_round: Option<u32>,
}

/// Pure placement report: active participants first (by seed), then
/// eliminated participants by how deep they got (descending elimination
/// round), ties broken by ascending seed. Nothing is persisted.
#[must_use]
pub fn standings(participants: &[Participant]) -> Vec<Placement> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by_key(|p| {
        let still_in = p.status == ParticipantStatus::Active;
        // Active sorts before eliminated; deeper eliminations sort earlier.
        (
            !still_in,
            std::cmp::Reverse(p.eliminated_round.unwrap_or(0)),
            p.seed,
        )
    });
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, p)| Placement {
            place: i as u32 + 1,
            player_id: p.player_id,
            partner_id: p.partner_id,
            seed: p.seed,
            status: p.status,
            eliminated_round: p.eliminated_round,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::models::TournamentId;

    fn participant(seed: u32, eliminated_round: Option<u32>) -> Participant {
        Participant {
            tournament_id: 1 as TournamentId,
            player_id: PlayerId::from(seed) * 10,
            partner_id: None,
            seed,
            status: if eliminated_round.is_some() {
                ParticipantStatus::Eliminated
            } else {
                ParticipantStatus::Active
            },
            eliminated_round,
        }
    }

    #[test]
    fn test_active_participants_rank_first() {
        let field = vec![
            participant(3, Some(2)),
            participant(1, None),
            participant(2, Some(3)),
        ];
        let report = standings(&field);
        assert_eq!(report[0].seed, 1);
        assert_eq!(report[0].place, 1);
        assert_eq!(report[1].seed, 2); // out in round 3
        assert_eq!(report[2].seed, 3); // out in round 2
    }

    #[test]
    fn test_deeper_run_places_higher() {
        let field = vec![
            participant(1, None),
            participant(4, Some(1)),
            participant(2, Some(3)),
            participant(3, Some(2)),
        ];
        let places: Vec<u32> = standings(&field).iter().map(|p| p.seed).collect();
        assert_eq!(places, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_same_round_ties_break_by_seed() {
        let field = vec![
            participant(7, Some(1)),
            participant(1, None),
            participant(4, Some(1)),
        ];
        let report = standings(&field);
        assert_eq!(report[1].seed, 4);
        assert_eq!(report[2].seed, 7);
        assert_eq!(
            report.iter().map(|p| p.place).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }
}
