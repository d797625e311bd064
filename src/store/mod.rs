//! Storage seam for bracket records.
//!
//! The engine talks to a [`BracketStore`] trait rather than a concrete
//! database, so the surrounding application can plug in whatever keyed
//! entity store it syncs through. The crate ships [`MemoryStore`] as the
//! reference implementation; its `commit` applies a whole [`ChangeSet`]
//! under one lock, which is the atomicity the advancement engine relies on.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::bracket::models::{BracketMatch, Participant, Tournament, TournamentId};

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record the engine expected was missing
    #[error("record not found: {0}")]
    NotFound(String),

    /// Backing store failure
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Every record touched by one engine transition.
///
/// A commit must apply all of it or none of it: a match must never be
/// persisted as completed while its propagated slots, eliminations, or
/// tournament status are missing.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub tournament: Option<Tournament>,
    pub matches: Vec<BracketMatch>,
    pub participants: Vec<Participant>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tournament.is_none() && self.matches.is_empty() && self.participants.is_empty()
    }
}

/// Keyed entity store for tournaments, matches, and participants
#[async_trait]
pub trait BracketStore: Send + Sync {
    /// Insert a new tournament and return its generated id
    async fn insert_tournament(&self, tournament: &Tournament) -> StoreResult<TournamentId>;

    /// Bulk-insert the participant set of a new tournament
    async fn insert_participants(&self, participants: &[Participant]) -> StoreResult<()>;

    /// Bulk-insert the match graph of a new tournament
    async fn insert_matches(&self, matches: &[BracketMatch]) -> StoreResult<()>;

    /// Fetch a tournament by id
    async fn tournament(&self, id: TournamentId) -> StoreResult<Option<Tournament>>;

    /// All matches of a tournament, ascending match number
    async fn matches_for_tournament(&self, id: TournamentId) -> StoreResult<Vec<BracketMatch>>;

    /// All participants of a tournament
    async fn participants_for_tournament(&self, id: TournamentId)
    -> StoreResult<Vec<Participant>>;

    /// Apply one transition's updates atomically
    async fn commit(&self, changes: ChangeSet) -> StoreResult<()>;
}
