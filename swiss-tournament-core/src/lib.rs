//! # swiss-tournament-core
//!
//! This crate contains the pairing and scoring engine for swiss tournaments. It operates on an
//! in-memory [`Tournament`] document and never persists anything itself; storing the document
//! after a successful operation is the job of the caller (see [`store::Store`]).
//!
//! Important types:
//! - [`Tournament`]: The tournament document. Holds the roster and the log of all [`Round`]s.
//! - [`Match`]: A single pairing within a round. A match without a second competitor is a bye.
//! - [`Outcome`]: The recorded result of a [`Match`].
//! - [`Standings`]: The ranked rows computed from the round log, including the composite
//! tie-break [`Key`].
//! - [`solver::Solver`]: The bracket pairing solver used to build every round after the first.
//!
//! The lifecycle operations (`pair_next`, `restart_round`, `override_pair`, `edit_pairings`,
//! `edit_result` and `finalize_round`) are methods on [`Tournament`] and live in the
//! [`lifecycle`] module.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to the document types.
//!
pub mod brackets;
pub mod graph;
pub mod id;
pub mod lifecycle;
pub mod options;
pub mod solver;
pub mod standings;
pub mod store;
pub mod tournament;

pub use id::{CompetitorId, MatchId, TournamentId};
pub use lifecycle::{CompetitorRef, PairedRound, PairingEdit, ResultUpdate};
pub use options::PairingOptions;
pub use standings::{Key, Standing, Standings};
pub use tournament::{Competitor, Match, Outcome, Round, RoundState, Tournament};

use thiserror::Error;

use std::result;

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("tournament {0} not found")]
    NotFound(TournamentId),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("operation not allowed: {0}")]
    StateConflict(#[from] StateConflict),
}

/// Malformed input to one of the lifecycle operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("the roster must contain at least one competitor")]
    EmptyRoster,
    #[error("a tournament must have at least one round")]
    ZeroRounds,
    #[error("unknown competitor {0}")]
    UnknownCompetitor(CompetitorId),
    #[error("no competitor named {0:?}")]
    UnknownName(String),
    #[error("the name {0:?} matches more than one competitor")]
    AmbiguousName(String),
    #[error("competitor {0} cannot be paired against themselves")]
    SelfPair(CompetitorId),
    #[error("competitor {0} appears more than once in the round")]
    DuplicateAppearance(CompetitorId),
    #[error("unknown match {0}")]
    UnknownMatch(MatchId),
    #[error("match {0} is a bye and cannot receive a head-to-head result")]
    ByeConversion(MatchId),
    #[error("invalid outcome {0:?}")]
    InvalidOutcome(String),
    #[error("a round needs at least one head-to-head match")]
    EmptyRound,
}

/// An operation that is not valid for the current round state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateConflict {
    #[error("round {0} is still active")]
    RoundActive(u32),
    #[error("all {0} rounds have been played")]
    TournamentComplete(u32),
    #[error("there is no active round")]
    NoActiveRound,
    #[error("round {0} already has recorded results")]
    RoundFinalized(u32),
    #[error("no rounds have been paired yet")]
    NoRounds,
    #[error("match {0} belongs to round {1} which is no longer the latest round")]
    NotLatestRound(MatchId, u32),
}
