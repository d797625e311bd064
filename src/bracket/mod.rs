//! Elimination bracket engine.
//!
//! This module covers the full bracket lifecycle:
//! - Seed assignment ([`seeding`]): random or manual numbering of the field
//! - Shell construction ([`shell`]): the pure match graph for a format
//! - Materialization ([`materializer`]): binding seeds, byes, initial states
//! - The run-time state machine ([`graph`]): advancement, reversal,
//!   completion detection
//! - The operational facade ([`engine`]): one atomic commit per user action
//! - Standings ([`standings`]): pure placement reporting
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cue_brackets::bracket::{BracketEngine, BracketFormat, CreateTournament, SeedingMethod};
//! use cue_brackets::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = BracketEngine::new(Arc::new(MemoryStore::new()));
//!
//!     let id = engine
//!         .create_tournament(CreateTournament::singles(
//!             vec![101, 102, 103, 104, 105],
//!             BracketFormat::SingleElimination,
//!             SeedingMethod::Manual,
//!         ))
//!         .await?;
//!
//!     // Seed 4 beats seed 5 in the only real round-1 match.
//!     engine.record_result(id, 2, 104).await?;
//!     println!("{:?}", engine.standings(id).await?);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod errors;
pub mod graph;
pub mod materializer;
pub mod models;
pub mod seeding;
pub mod shell;
pub mod standings;

pub use engine::{BracketEngine, BracketSnapshot, CreateTournament, NamedPlacement};
pub use errors::{BracketError, BracketResult, ReversalBlock};
pub use graph::BracketGraph;
pub use materializer::{MaterializedBracket, materialize};
pub use models::{
    BracketFormat, BracketMatch, BracketSection, LinkTarget, MatchId, MatchProgress, MatchSlot,
    Participant, ParticipantStatus, PlayerId, SlotEntrant, SlotIndex, Tournament, TournamentId,
    TournamentStatus,
};
pub use seeding::{SeededEntry, SeedingMethod, assign_seeds, first_round_seeds};
pub use shell::{MatchShell, ShellPlan, build_shells};
pub use standings::{Placement, standings};
