//! The run-time bracket state machine.
//!
//! [`BracketGraph`] holds one tournament's records in memory (matches in an
//! arena keyed by id, links as ids) and applies advancement and reversal as
//! pure mutations. Nothing here touches storage: callers load the records,
//! apply one transition, and persist the touched set in a single commit, so
//! a match can never be persisted as completed without its consequences.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use log::{debug, info};

use crate::store::ChangeSet;

use super::errors::{BracketError, BracketResult, ReversalBlock};
use super::models::{
    BracketFormat, BracketMatch, BracketSection, MatchId, MatchProgress, Participant,
    ParticipantStatus, PlayerId, SlotEntrant, Tournament, TournamentStatus,
};

/// One tournament's full state, plus a record of what a transition touched
#[derive(Debug)]
pub struct BracketGraph {
    tournament: Tournament,
    matches: BTreeMap<MatchId, BracketMatch>,
    participants: BTreeMap<PlayerId, Participant>,
    touched_matches: BTreeSet<MatchId>,
    touched_participants: BTreeSet<PlayerId>,
    touched_tournament: bool,
}

impl BracketGraph {
    #[must_use]
    pub fn new(
        tournament: Tournament,
        matches: Vec<BracketMatch>,
        participants: Vec<Participant>,
    ) -> Self {
        Self {
            tournament,
            matches: matches.into_iter().map(|m| (m.id, m)).collect(),
            participants: participants
                .into_iter()
                .map(|p| (p.player_id, p))
                .collect(),
            touched_matches: BTreeSet::new(),
            touched_participants: BTreeSet::new(),
            touched_tournament: false,
        }
    }

    #[must_use]
    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    #[must_use]
    pub fn match_ref(&self, id: MatchId) -> Option<&BracketMatch> {
        self.matches.get(&id)
    }

    /// Matches in ascending match-number order
    pub fn matches(&self) -> impl Iterator<Item = &BracketMatch> {
        self.matches.values()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    fn require_match(&self, id: MatchId) -> BracketResult<&BracketMatch> {
        self.matches
            .get(&id)
            .ok_or(BracketError::MatchNotFound(id))
    }

    /// Record a result: complete the match, copy the winner (and, in double
    /// elimination, the loser) along its links, resolve any bye this
    /// uncovers, and run the completion check. A bye accepts its sole
    /// occupant as the winner exactly once.
    pub fn advance(&mut self, match_id: MatchId, winner: PlayerId) -> BracketResult<()> {
        let m = self.require_match(match_id)?;

        let bye_auto = m.is_bye
            && m.winner.is_none()
            && m.sole_entrant().is_some_and(|e| e.player_id == winner);
        if !m.progress.accepts_result() && !bye_auto {
            return Err(BracketError::InvalidAdvance(format!(
                "match {match_id} is not ready for a result (state {:?})",
                m.progress
            )));
        }
        let Some(winner_slot) = m.slot_of(winner) else {
            return Err(BracketError::InvalidAdvance(format!(
                "player {winner} is not in match {match_id}"
            )));
        };

        let winner_entrant = m.slots[winner_slot].entrant.expect("occupied slot");
        let loser_entrant = m.opponent_of(winner_slot);
        let winner_link = m.winner_link;
        let loser_link = m.loser_link;
        let section = m.section;
        let round = m.round;

        {
            let m = self.matches.get_mut(&match_id).expect("fetched above");
            m.winner = Some(winner);
            m.progress = MatchProgress::Completed;
            m.completed_at = Some(Utc::now());
        }
        self.touched_matches.insert(match_id);
        debug!("match {match_id}: player {winner} wins");

        let mut uncovered = Vec::new();
        if let Some(link) = winner_link {
            if let Some(next) = self.fill_slot(link.match_id, link.slot, winner_entrant) {
                uncovered.push(next);
            }
        }
        if let Some(loser) = loser_entrant {
            if let Some(link) = loser_link {
                if let Some(next) = self.fill_slot(link.match_id, link.slot, loser) {
                    uncovered.push(next);
                }
            }
            // A winners-bracket loss in double elimination is survivable;
            // every other loss eliminates.
            let eliminates = self.tournament.format == BracketFormat::SingleElimination
                || section != BracketSection::Winners;
            if eliminates {
                self.eliminate(loser.player_id, round);
            }
        }

        for (next_id, entrant) in uncovered {
            self.advance(next_id, entrant.player_id)?;
        }

        self.check_completion();
        Ok(())
    }

    /// Copy an entrant into a linked slot and recompute the target's state.
    /// Returns the target id and entrant when the target is a bye that is
    /// now ready to auto-complete.
    fn fill_slot(
        &mut self,
        match_id: MatchId,
        slot: usize,
        entrant: SlotEntrant,
    ) -> Option<(MatchId, SlotEntrant)> {
        let target = self.matches.get_mut(&match_id).expect("forward link");
        debug_assert!(target.slots[slot].entrant.is_none(), "slot already filled");
        target.slots[slot].entrant = Some(entrant);
        target.refresh_progress();
        self.touched_matches.insert(match_id);

        (target.is_bye && target.occupied() == 1 && target.winner.is_none())
            .then_some((match_id, entrant))
    }

    fn eliminate(&mut self, player_id: PlayerId, round: u32) {
        if let Some(p) = self.participants.get_mut(&player_id) {
            p.status = ParticipantStatus::Eliminated;
            p.eliminated_round = Some(round);
            self.touched_participants.insert(player_id);
        }
    }

    /// Undo one recorded result. Refused without mutation if either linked
    /// match has progressed past ready.
    pub fn reverse(&mut self, match_id: MatchId) -> BracketResult<()> {
        let m = self.require_match(match_id)?;
        if m.progress != MatchProgress::Completed {
            return Err(BracketError::InvalidAdvance(format!(
                "match {match_id} has no result to undo"
            )));
        }
        // Byes are never a recorded decision, so there is nothing to undo;
        // void matches have no winner at all.
        if m.is_bye {
            return Err(BracketError::InvalidAdvance(format!(
                "match {match_id} is a bye, nothing to undo"
            )));
        }
        let Some(winner) = m.winner else {
            return Err(BracketError::InvalidAdvance(format!(
                "match {match_id} is void, nothing to undo"
            )));
        };

        let winner_slot = m.slot_of(winner).expect("winner occupies a slot");
        let winner_entrant = m.slots[winner_slot].entrant.expect("occupied slot");
        let loser_entrant = m.opponent_of(winner_slot);
        let winner_link = m.winner_link;
        let loser_link = m.loser_link;
        let section = m.section;

        // Downstream-safety guards, checked before any mutation.
        if let Some(link) = winner_link {
            if self.require_match(link.match_id)?.progress.has_started() {
                return Err(BracketError::IrreversibleAdvance(
                    ReversalBlock::NextMatchStarted,
                ));
            }
        }
        if loser_entrant.is_some() {
            if let Some(link) = loser_link {
                if self.require_match(link.match_id)?.progress.has_started() {
                    return Err(BracketError::IrreversibleAdvance(
                        ReversalBlock::LoserMatchStarted,
                    ));
                }
            }
        }

        if let Some(link) = winner_link {
            self.clear_slot(link.match_id, link.slot, winner_entrant.player_id);
        }
        if let Some(loser) = loser_entrant {
            if let Some(link) = loser_link {
                self.clear_slot(link.match_id, link.slot, loser.player_id);
            }
            let eliminated = self.tournament.format == BracketFormat::SingleElimination
                || section != BracketSection::Winners;
            if eliminated {
                if let Some(p) = self.participants.get_mut(&loser.player_id) {
                    p.status = ParticipantStatus::Active;
                    p.eliminated_round = None;
                    self.touched_participants.insert(loser.player_id);
                }
            }
        }

        let m = self.matches.get_mut(&match_id).expect("fetched above");
        m.winner = None;
        m.progress = MatchProgress::InProgress;
        m.completed_at = None;
        self.touched_matches.insert(match_id);

        if self.tournament.status == TournamentStatus::Completed {
            self.tournament.status = TournamentStatus::InProgress;
            self.tournament.champion = None;
            self.tournament.completed_at = None;
            self.touched_tournament = true;
            info!(
                "tournament {}: result undone, champion cleared",
                self.tournament.id
            );
        }
        debug!("match {match_id}: result undone");
        Ok(())
    }

    fn clear_slot(&mut self, match_id: MatchId, slot: usize, player_id: PlayerId) {
        let target = self.matches.get_mut(&match_id).expect("forward link");
        debug_assert_eq!(
            target.slots[slot].entrant.map(|e| e.player_id),
            Some(player_id)
        );
        target.slots[slot].entrant = None;
        target.refresh_progress();
        self.touched_matches.insert(match_id);
    }

    /// Record scores for a match that is being played. Moves a ready match
    /// to in-progress, which blocks reversal of its feeders.
    pub fn record_score(&mut self, match_id: MatchId, scores: [u32; 2]) -> BracketResult<()> {
        let m = self.require_match(match_id)?;
        if !m.progress.accepts_result() {
            return Err(BracketError::InvalidAdvance(format!(
                "match {match_id} is not being played (state {:?})",
                m.progress
            )));
        }
        let m = self.matches.get_mut(&match_id).expect("fetched above");
        m.slots[0].score = scores[0];
        m.slots[1].score = scores[1];
        m.progress = MatchProgress::InProgress;
        self.touched_matches.insert(match_id);
        Ok(())
    }

    /// The match whose winner is the tournament champion
    #[must_use]
    pub fn terminal_match(&self) -> Option<&BracketMatch> {
        match self.tournament.format {
            BracketFormat::SingleElimination => self
                .matches
                .values()
                .find(|m| m.section == BracketSection::Winners && m.winner_link.is_none()),
            BracketFormat::DoubleElimination => self
                .matches
                .values()
                .find(|m| m.section == BracketSection::GrandFinal),
        }
    }

    /// Crown the champion once the terminal match completes. Idempotent.
    fn check_completion(&mut self) {
        if self.tournament.status == TournamentStatus::Completed {
            return;
        }
        let Some(terminal) = self.terminal_match() else {
            return;
        };
        if terminal.progress != MatchProgress::Completed {
            return;
        }
        let Some(champion) = terminal.winner else {
            return;
        };
        self.tournament.status = TournamentStatus::Completed;
        self.tournament.champion = Some(champion);
        self.tournament.completed_at = Some(Utc::now());
        self.touched_tournament = true;
        info!(
            "tournament {}: champion is player {champion}",
            self.tournament.id
        );
    }

    /// Everything this graph's transitions touched, as one atomic commit
    #[must_use]
    pub fn into_change_set(self) -> ChangeSet {
        ChangeSet {
            tournament: self
                .touched_tournament
                .then(|| self.tournament.clone()),
            matches: self
                .touched_matches
                .iter()
                .map(|id| self.matches[id].clone())
                .collect(),
            participants: self
                .touched_participants
                .iter()
                .map(|id| self.participants[id].clone())
                .collect(),
        }
    }
}
