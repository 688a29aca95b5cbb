//! Capacity planning: minimum competitor counts and equal pool sizes.

use crate::error::{EngineError, EngineResult};
use crate::models::Category;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// No pool may ever hold fewer performers than this.
pub const HARD_MINIMUM: usize = 2;

/// How many performers the pools can carry for a given registration count.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PoolCapacity {
    /// Total pool slots (`groups × per_pool_size`); guests count toward it.
    pub capacity: usize,
    /// Every pool has exactly this many performers.
    pub per_pool_size: usize,
    /// Performers dropped by preselection.
    pub eliminated: usize,
}

impl PoolCapacity {
    pub fn as_tuple(self) -> (usize, usize, usize) {
        (self.capacity, self.per_pool_size, self.eliminated)
    }
}

/// Registration count below [`minimum_required`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("Need at least {required} competitors (registered {registered})")]
pub struct InsufficientRegistrations {
    pub required: usize,
    pub registered: usize,
}

/// Fewest competitors for `groups_ideal` pools: two per pool plus one that preselection eliminates.
pub fn minimum_required(groups_ideal: usize) -> usize {
    (groups_ideal * 2 + 1).max(HARD_MINIMUM)
}

/// Fewest regular (non-guest) competitors once guests hold guaranteed slots.
pub fn minimum_regulars(groups_ideal: usize, guest_count: usize) -> usize {
    minimum_required(groups_ideal)
        .saturating_sub(guest_count)
        .max(HARD_MINIMUM)
}

/// Size pools so that every pool is equally large and preselection eliminates at least one performer.
///
/// 1. Enough registrations for the ideal layout plus one: use `performers_ideal`.
/// 2. Otherwise pick the largest size `>= 2` with `groups_ideal × size < registered`.
/// 3. Fall back to size 2.
pub fn pool_capacity(
    registered: usize,
    groups_ideal: usize,
    performers_ideal: usize,
) -> Result<PoolCapacity, InsufficientRegistrations> {
    let required = minimum_required(groups_ideal);
    if registered < required {
        return Err(InsufficientRegistrations {
            required,
            registered,
        });
    }

    let per_pool_size = if registered > groups_ideal * performers_ideal {
        performers_ideal
    } else {
        (HARD_MINIMUM..=performers_ideal.max(HARD_MINIMUM))
            .rev()
            .find(|size| groups_ideal * size < registered)
            .unwrap_or(HARD_MINIMUM)
    };
    let capacity = groups_ideal * per_pool_size;
    let result = PoolCapacity {
        capacity,
        per_pool_size,
        eliminated: registered.saturating_sub(capacity),
    };
    log::debug!(
        "pool capacity for {} registered in {} pools (ideal {}): {:?}",
        registered,
        groups_ideal,
        performers_ideal,
        result
    );
    Ok(result)
}

/// Capacity of a category, checking the guest-adjusted minimum of regular performers first.
pub fn category_capacity(category: &Category) -> EngineResult<PoolCapacity> {
    let guests = category.guest_count();
    let regulars = category.performers.len() - guests;
    let insufficient = |required, registered| EngineError::InsufficientRegistrations {
        category: category.id,
        required,
        registered,
    };

    let required_regulars = minimum_regulars(category.groups_ideal, guests);
    if regulars < required_regulars {
        return Err(insufficient(required_regulars, regulars));
    }
    pool_capacity(
        category.performers.len(),
        category.groups_ideal,
        category.performers_ideal,
    )
    .map_err(|e| insufficient(e.required, e.registered))
}
