//! Data structures for the battle tournament: tournament, categories, performers, pools, battles.

mod battle;
mod category;
mod performer;
mod pool;
mod tournament;

pub use battle::{Battle, BattleId, BattleStatus, Outcome, OutcomeType};
pub use category::{Category, CategoryId, PreselectionFormat};
pub use performer::{DancerId, Performer, PerformerId, MAX_SCORE, POINTS_DRAW, POINTS_WIN};
pub use pool::{Pool, PoolId};
pub use tournament::{Phase, Status, Tournament, TournamentId};
