//! Errors returned by engine operations.

use crate::models::{BattleId, BattleStatus, CategoryId, OutcomeType, PerformerId, Phase, TournamentId};
use thiserror::Error;

/// Errors that can occur during tournament operations.
///
/// Every operation that fails leaves the tournament untouched; the caller decides whether to retry.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EngineError {
    /// Not enough competitors registered for the category's pool configuration.
    #[error("Category {category} needs at least {required} competitors (has {registered})")]
    InsufficientRegistrations {
        category: CategoryId,
        required: usize,
        registered: usize,
    },

    /// The tournament has no categories to schedule.
    #[error("Tournament has no categories")]
    NoCategories,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A data invariant is broken; this is a programming bug, not user error.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Battle not found: {0}")]
    BattleNotFound(BattleId),

    #[error("Performer not found: {0}")]
    PerformerNotFound(PerformerId),
}

/// Reasons a request is rejected without being a bug.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Category {category} is not ready to leave {phase:?}: {reason}")]
    PhaseNotReady {
        category: CategoryId,
        phase: Phase,
        reason: String,
    },

    #[error("Tournament has not started")]
    NotStarted,

    #[error("Tournament is already completed")]
    AlreadyCompleted,

    #[error("Tournament has been cancelled")]
    Cancelled,

    #[error("Another tournament is already active: {0}")]
    AnotherTournamentActive(TournamentId),

    #[error("Registration is closed")]
    RegistrationClosed,

    #[error("Dancer is already registered in this category")]
    DuplicateDancer,

    #[error("Expected {expected} dancer(s) per performer, got {got}")]
    WrongDancerCount { expected: usize, got: usize },

    #[error("Invalid category configuration: {0}")]
    InvalidCategory(String),

    #[error("Battle is {0:?} and can no longer be moved or played")]
    BattleNotPending(BattleStatus),

    #[error("Battle is on deck and cannot be moved")]
    BattleOnDeck,

    #[error("Position {0} is locked or out of range")]
    PositionLocked(usize),

    #[error("Battle {0} is still on stage")]
    BattleInProgress(BattleId),

    #[error("Only the battle on deck can be started")]
    NotOnDeck,

    #[error("Battle expects a {expected:?} outcome, got {got:?}")]
    OutcomeMismatch { expected: OutcomeType, got: OutcomeType },

    #[error("Invalid outcome: {0}")]
    InvalidOutcome(String),

    #[error("Detection triggered before all {0:?} battles completed")]
    DetectionTooEarly(Phase),
}

pub type EngineResult<T> = Result<T, EngineError>;
