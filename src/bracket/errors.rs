//! Bracket error types.

use std::fmt;

use thiserror::Error;

use crate::store::StoreError;

use super::models::{MatchId, TournamentId};

/// Why a reversal was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReversalBlock {
    /// The match the winner advanced into has already started
    NextMatchStarted,
    /// The losers-bracket match the loser dropped into has already started
    LoserMatchStarted,
}

impl fmt::Display for ReversalBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NextMatchStarted => "next match already started",
            Self::LoserMatchStarted => "losers-bracket match already started",
        };
        write!(f, "{repr}")
    }
}

/// Bracket errors
#[derive(Debug, Error)]
pub enum BracketError {
    /// Malformed seeding input, rejected before any mutation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Advancing a match that is not ready, or a player not in either slot
    #[error("invalid advancement: {0}")]
    InvalidAdvance(String),

    /// Undoing a match whose downstream has already progressed
    #[error("irreversible advancement: {0}")]
    IrreversibleAdvance(ReversalBlock),

    /// Match not found
    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    /// Tournament not found
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),

    /// Backing store failure, propagated unchanged
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
