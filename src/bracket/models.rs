//! Bracket data models: participants, matches, and tournaments.
//!
//! The match graph is stored as an indexed collection keyed by stable match
//! id; forward links (`winner_link`, `loser_link`) are ids plus a slot index,
//! never direct references, so the graph has no ownership cycles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tournament ID type
pub type TournamentId = i64;

/// Match ID type. Match ids double as the ascending match number within a
/// tournament: winners rounds first, then losers rounds, then the grand final.
pub type MatchId = i64;

/// Player ID type (foreign key into the profile store)
pub type PlayerId = i64;

/// Index of one of the two opponent positions in a match (0 or 1)
pub type SlotIndex = usize;

/// Bracket format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketFormat {
    /// One loss eliminates
    SingleElimination,
    /// Two losses eliminate; losers drop into a second bracket
    DoubleElimination,
}

/// Sub-graph a match belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSection {
    Winners,
    Losers,
    GrandFinal,
}

/// Explicit per-match state, driven by the pure transition in
/// [`MatchProgress::from_occupancy`] while the match is still filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchProgress {
    /// Neither slot occupied
    Empty,
    /// Exactly one slot occupied
    AwaitingOpponent,
    /// Both slots occupied, no winner yet
    Ready,
    /// Score entry has started
    InProgress,
    /// Winner recorded (or the match is void and can never fill)
    Completed,
}

impl MatchProgress {
    /// Pure transition for a match that has not started: state follows
    /// directly from how many slots are occupied.
    #[must_use]
    pub fn from_occupancy(occupied: usize) -> Self {
        match occupied {
            0 => Self::Empty,
            1 => Self::AwaitingOpponent,
            _ => Self::Ready,
        }
    }

    /// Whether results may be recorded against a match in this state
    #[must_use]
    pub fn accepts_result(self) -> bool {
        matches!(self, Self::Ready | Self::InProgress)
    }

    /// Whether the match has moved beyond `Ready`, which blocks reversal of
    /// its feeders
    #[must_use]
    pub fn has_started(self) -> bool {
        matches!(self, Self::InProgress | Self::Completed)
    }
}

/// A participant bound into a match slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntrant {
    pub player_id: PlayerId,
    /// Doubles partner, if any
    pub partner_id: Option<PlayerId>,
    pub seed: u32,
}

/// One of the two opponent positions in a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSlot {
    /// Empty until a seed is bound or a feeder match resolves
    pub entrant: Option<SlotEntrant>,
    pub score: u32,
}

/// Forward link: where a match's winner (or loser) is copied once the match
/// completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub match_id: MatchId,
    pub slot: SlotIndex,
}

/// A single bracket match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// Round number within the match's section (1-based)
    pub round: u32,
    /// Order within the round (0-based, top to bottom)
    pub position: u32,
    pub section: BracketSection,
    pub slots: [MatchSlot; 2],
    pub winner: Option<PlayerId>,
    /// At most one entrant can ever occupy this match; it auto-completes as
    /// soon as that entrant arrives
    pub is_bye: bool,
    pub progress: MatchProgress,
    pub winner_link: Option<LinkTarget>,
    pub loser_link: Option<LinkTarget>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BracketMatch {
    /// Number of occupied slots
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.entrant.is_some()).count()
    }

    /// Slot index holding the given player, if present
    #[must_use]
    pub fn slot_of(&self, player_id: PlayerId) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(|s| s.entrant.is_some_and(|e| e.player_id == player_id))
    }

    /// The sole occupant, if exactly one slot is filled
    #[must_use]
    pub fn sole_entrant(&self) -> Option<SlotEntrant> {
        match (self.slots[0].entrant, self.slots[1].entrant) {
            (Some(e), None) | (None, Some(e)) => Some(e),
            _ => None,
        }
    }

    /// The entrant occupying the other slot from `slot`
    #[must_use]
    pub fn opponent_of(&self, slot: SlotIndex) -> Option<SlotEntrant> {
        self.slots[1 - slot].entrant
    }

    /// Recompute progress from slot occupancy. Only applies while the match
    /// has not started; `InProgress` and `Completed` are explicit transitions.
    pub fn refresh_progress(&mut self) {
        if !self.progress.has_started() {
            self.progress = MatchProgress::from_occupancy(self.occupied());
        }
    }
}

/// Whether a participant is still alive in the bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Active,
    Eliminated,
}

/// A tournament entrant. Created at tournament start, mutated only by the
/// advancement and reversal engines, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    /// Doubles partner, if any
    pub partner_id: Option<PlayerId>,
    /// Unique seed, a gapless permutation of 1..=N
    pub seed: u32,
    pub status: ParticipantStatus,
    /// Round of the loss that eliminated this participant
    pub eliminated_round: Option<u32>,
}

impl Participant {
    /// View of this participant as a match-slot entrant
    #[must_use]
    pub fn as_entrant(&self) -> SlotEntrant {
        SlotEntrant {
            player_id: self.player_id,
            partner_id: self.partner_id,
            seed: self.seed,
        }
    }
}

/// Tournament state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Setup,
    InProgress,
    Completed,
}

/// A tournament record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub format: BracketFormat,
    pub participant_count: u32,
    pub status: TournamentStatus,
    /// Set exactly once, when the terminal match completes
    pub champion: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
