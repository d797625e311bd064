//! The bracket engine: the library's operational surface.
//!
//! Each operation loads one tournament's records from the store, applies a
//! pure [`BracketGraph`] transition, and commits every touched record in a
//! single [`ChangeSet`]. Storage failures propagate unchanged and the engine
//! never retries; because the commit is atomic, a caller that saw an I/O
//! error can simply re-issue the same call.

use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::profile::ProfileDirectory;
use crate::store::BracketStore;

use super::errors::{BracketError, BracketResult};
use super::graph::BracketGraph;
use super::materializer::materialize;
use super::models::{
    BracketFormat, BracketMatch, MatchId, PlayerId, Tournament, TournamentId, TournamentStatus,
};
use super::seeding::{SeedingMethod, assign_seeds};
use super::shell::build_shells;
use super::standings::{Placement, standings};

/// Request to create a tournament
#[derive(Debug, Clone)]
pub struct CreateTournament {
    /// Entrants in registration order
    pub player_ids: Vec<PlayerId>,
    /// Doubles partners, parallel to `player_ids`
    pub partner_ids: Vec<Option<PlayerId>>,
    pub format: BracketFormat,
    pub seeding: SeedingMethod,
}

impl CreateTournament {
    /// Singles tournament: no partners
    #[must_use]
    pub fn singles(
        player_ids: Vec<PlayerId>,
        format: BracketFormat,
        seeding: SeedingMethod,
    ) -> Self {
        let partner_ids = vec![None; player_ids.len()];
        Self {
            player_ids,
            partner_ids,
            format,
            seeding,
        }
    }
}

/// Read-only view of one tournament for the display layer
#[derive(Debug, Clone)]
pub struct BracketSnapshot {
    pub tournament: Tournament,
    /// Ascending match-number order
    pub matches: Vec<BracketMatch>,
}

/// A placement decorated with display data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPlacement {
    pub placement: Placement,
    pub display_name: Option<String>,
}

/// Bracket engine over a pluggable store
#[derive(Clone)]
pub struct BracketEngine {
    store: Arc<dyn BracketStore>,
}

impl BracketEngine {
    #[must_use]
    pub fn new(store: Arc<dyn BracketStore>) -> Self {
        Self { store }
    }

    /// Build and persist a complete tournament: seed assignment, shell
    /// construction, and materialization, stored as one initial graph.
    pub async fn create_tournament(&self, req: CreateTournament) -> BracketResult<TournamentId> {
        // Validation happens before anything is persisted.
        let entries = assign_seeds(
            &req.player_ids,
            &req.partner_ids,
            req.seeding,
            &mut rand::rng(),
        )?;
        let n = entries.len() as u32;
        let plan = build_shells(n, req.format);

        // A field of one has nothing to play: the sole entrant is champion
        // at creation.
        let lone_champion = (n == 1).then(|| entries[0].player_id);
        let now = Utc::now();
        let tournament = Tournament {
            id: 0,
            format: req.format,
            participant_count: n,
            status: if lone_champion.is_some() {
                TournamentStatus::Completed
            } else {
                TournamentStatus::InProgress
            },
            champion: lone_champion,
            created_at: now,
            completed_at: lone_champion.map(|_| now),
        };
        let id = self.store.insert_tournament(&tournament).await?;

        let built = materialize(id, &plan, &entries);
        self.store.insert_participants(&built.participants).await?;
        self.store.insert_matches(&built.matches).await?;

        info!(
            "tournament {id}: created with {n} participants, {} matches ({:?})",
            built.matches.len(),
            req.format
        );
        Ok(id)
    }

    /// Record a match result and advance the bracket
    pub async fn record_result(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
        winner: PlayerId,
    ) -> BracketResult<()> {
        let mut graph = self.load(tournament_id).await?;
        graph.advance(match_id, winner)?;
        self.store.commit(graph.into_change_set()).await?;
        Ok(())
    }

    /// Record live scores for a match, marking it in progress
    pub async fn record_score(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
        scores: [u32; 2],
    ) -> BracketResult<()> {
        let mut graph = self.load(tournament_id).await?;
        graph.record_score(match_id, scores)?;
        self.store.commit(graph.into_change_set()).await?;
        Ok(())
    }

    /// Undo one recorded result, if nothing downstream has progressed
    pub async fn undo_result(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
    ) -> BracketResult<()> {
        let mut graph = self.load(tournament_id).await?;
        graph.reverse(match_id)?;
        self.store.commit(graph.into_change_set()).await?;
        Ok(())
    }

    /// Current placement report
    pub async fn standings(&self, tournament_id: TournamentId) -> BracketResult<Vec<Placement>> {
        self.require_tournament(tournament_id).await?;
        let participants = self
            .store
            .participants_for_tournament(tournament_id)
            .await?;
        Ok(standings(&participants))
    }

    /// Placement report decorated with display names
    pub async fn standings_with_profiles(
        &self,
        tournament_id: TournamentId,
        directory: &dyn ProfileDirectory,
    ) -> BracketResult<Vec<NamedPlacement>> {
        Ok(self
            .standings(tournament_id)
            .await?
            .into_iter()
            .map(|placement| NamedPlacement {
                display_name: directory
                    .profile(placement.player_id)
                    .map(|card| card.display_name),
                placement,
            })
            .collect())
    }

    /// Read-only bracket view for rendering
    pub async fn bracket(&self, tournament_id: TournamentId) -> BracketResult<BracketSnapshot> {
        let tournament = self.require_tournament(tournament_id).await?;
        let matches = self.store.matches_for_tournament(tournament_id).await?;
        Ok(BracketSnapshot {
            tournament,
            matches,
        })
    }

    async fn require_tournament(&self, id: TournamentId) -> BracketResult<Tournament> {
        self.store
            .tournament(id)
            .await?
            .ok_or(BracketError::TournamentNotFound(id))
    }

    async fn load(&self, id: TournamentId) -> BracketResult<BracketGraph> {
        let tournament = self.require_tournament(id).await?;
        let matches = self.store.matches_for_tournament(id).await?;
        let participants = self.store.participants_for_tournament(id).await?;
        Ok(BracketGraph::new(tournament, matches, participants))
    }
}
