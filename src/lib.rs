//! Dance battle tournament engine: library with models and business logic.

pub mod config;
pub mod error;
pub mod export;
pub mod logic;
pub mod models;
pub mod store;

pub use error::{EngineError, EngineResult, ValidationError};
pub use logic::{
    advance, advance_with_rng, build_pool_battles, build_preselection_queue, category_capacity,
    deactivate, detect_pool_winners, detect_preselection_tiebreak, minimum_required, move_battle,
    pool_capacity, qualification, record_result, reorder, start_battle, PoolCapacity,
    Qualification,
};
pub use models::{
    Battle, BattleId, BattleStatus, Category, CategoryId, DancerId, Outcome, OutcomeType, Performer,
    PerformerId, Phase, Pool, PoolId, PreselectionFormat, Status, Tournament, TournamentId, MAX_SCORE,
};
pub use store::{advance_stored, InMemoryStore, TournamentStore};
