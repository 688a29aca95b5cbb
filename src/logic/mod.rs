//! Tournament business logic: capacity, phases, battle queues, tie detection, reordering, results.

pub mod capacity;
pub mod finals;
pub mod phase;
pub mod queue;
pub mod ranking;
pub mod reorder;
pub mod results;
pub mod tiebreak;

pub use capacity::{
    category_capacity, minimum_regulars, minimum_required, pool_capacity, InsufficientRegistrations,
    PoolCapacity,
};
pub use finals::{advance_bracket, build_finals};
pub use phase::{advance, advance_with_rng, deactivate, ensure_single_active};
pub use queue::{build_pool_battles, build_preselection_queue, interleave, round_robin, seed_pools};
pub use ranking::{qualification, rank, Qualification};
pub use reorder::{move_battle, reindex, reorder};
pub use results::{record_result, start_battle};
pub use tiebreak::{detect_pool_winners, detect_preselection_tiebreak};
