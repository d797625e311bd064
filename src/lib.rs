//! # Cue Brackets
//!
//! The tournament bracket engine behind a pool scorekeeping app.
//!
//! The engine builds single- and double-elimination brackets for any
//! participant count, embeds a forward-only match-dependency graph, advances
//! winners (and losers, in double elimination) as results come in, supports
//! safely undoing a result, and detects when a champion is determined.
//!
//! ## Architecture
//!
//! A tournament's match graph is created once and never structurally
//! altered. Each match carries an explicit state
//! (`Empty | AwaitingOpponent | Ready | InProgress | Completed`) and forward
//! links recorded as match ids, so byes and propagation are explicit
//! transitions over an arena of matches rather than pointer chasing.
//!
//! Every user action (record a result, record scores, undo) loads the
//! tournament's records, applies one pure transition, and commits the
//! touched records atomically through the [`store::BracketStore`] seam.
//!
//! ## Core Modules
//!
//! - [`bracket`]: seed assignment, shell construction, materialization, the
//!   advancement/reversal state machine, and standings
//! - [`store`]: the keyed entity-store trait plus an in-memory reference
//!   implementation
//! - [`profile`]: read-only player display lookup for decorated reports
//!
//! ## Example
//!
//! ```
//! use cue_brackets::bracket::{BracketFormat, build_shells};
//!
//! // A 5-player field plays in an 8-slot bracket with 3 byes.
//! let plan = build_shells(5, BracketFormat::SingleElimination);
//! assert_eq!(plan.bracket_size, 8);
//! assert_eq!(plan.winners_rounds, 3);
//! ```

/// Bracket construction and the run-time state machine.
pub mod bracket;
pub use bracket::{
    BracketEngine, BracketError, BracketFormat, BracketResult, CreateTournament, MatchProgress,
    SeedingMethod,
};

/// Storage seam for bracket records.
pub mod store;
pub use store::{BracketStore, ChangeSet, MemoryStore, StoreError};

/// Player display lookup.
pub mod profile;
pub use profile::{MapDirectory, ProfileCard, ProfileDirectory};
