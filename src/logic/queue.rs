//! Battle queue generation: preselection (interleaved across categories) and pool round-robins.

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Battle, Category, OutcomeType, PerformerId, Phase, Pool, PreselectionFormat, Tournament,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Create the preselection battles of every category and assign their queue keys.
///
/// 1. Per category, take non-guest performers in registration order (guests skip preselection).
/// 2. Form one `Scored` battle per performer (solo) or per pair (paired).
/// 3. Interleave categories round-robin and number battles 1, 2, 3… in emission order.
///
/// Categories without eligible performers are skipped. Returns the number of battles created.
pub fn build_preselection_queue(tournament: &mut Tournament) -> EngineResult<usize> {
    if tournament.categories.is_empty() {
        return Err(EngineError::NoCategories);
    }

    let lanes: Vec<Vec<Battle>> = tournament
        .categories
        .iter()
        .map(preselection_battles)
        .collect();

    let mut created = 0;
    for (sequence_order, (lane, mut battle)) in (1..).zip(interleave(lanes)) {
        battle.sequence_order = sequence_order;
        tournament.categories[lane].battles.push(battle);
        created += 1;
    }
    log::info!(
        "Tournament {}: {} preselection battle(s) queued across {} categories",
        tournament.id,
        created,
        tournament.categories.len()
    );
    Ok(created)
}

fn preselection_battles(category: &Category) -> Vec<Battle> {
    let eligible: Vec<PerformerId> = category.regulars().map(|p| p.id).collect();
    let per_battle = match category.preselection_format {
        PreselectionFormat::Solo => 1,
        PreselectionFormat::Paired => 2,
    };
    eligible
        .chunks(per_battle)
        .map(|chunk| {
            Battle::new(
                category.id,
                Phase::Preselection,
                OutcomeType::Scored,
                chunk.to_vec(),
            )
        })
        .collect()
}

/// Take one item from each lane in turn until all lanes are empty.
/// Yields `(lane index, item)`; short lanes drop out of the rotation early.
pub fn interleave<T>(lanes: Vec<Vec<T>>) -> Vec<(usize, T)> {
    let total: usize = lanes.iter().map(Vec::len).sum();
    let mut lanes: Vec<VecDeque<T>> = lanes.into_iter().map(VecDeque::from).collect();
    let mut out = Vec::with_capacity(total);
    while out.len() < total {
        for (idx, lane) in lanes.iter_mut().enumerate() {
            if let Some(item) = lane.pop_front() {
                out.push((idx, item));
            }
        }
    }
    out
}

/// Split qualified performers into `groups` pools of `per_pool_size`, in random order.
pub fn seed_pools<R: Rng + ?Sized>(
    mut qualified: Vec<PerformerId>,
    groups: usize,
    per_pool_size: usize,
    rng: &mut R,
) -> EngineResult<Vec<Pool>> {
    if per_pool_size == 0 || qualified.len() != groups * per_pool_size {
        return Err(EngineError::InvariantViolation(format!(
            "{} qualified performers cannot fill {} pools of {}",
            qualified.len(),
            groups,
            per_pool_size
        )));
    }
    qualified.shuffle(rng);
    Ok(qualified
        .chunks_exact(per_pool_size)
        .map(|chunk| Pool::new(chunk.to_vec()))
        .collect())
}

/// Install `pools` in the category and queue their round-robin battles, pool by pool.
///
/// Keys continue after the category's existing battles. Returns the number of battles created.
pub fn build_pool_battles(category: &mut Category, pools: Vec<Pool>) -> EngineResult<usize> {
    if let Some(first) = pools.first() {
        if pools.iter().any(|p| p.performers.len() != first.performers.len()) {
            return Err(EngineError::InvariantViolation(format!(
                "unequal pool sizes in category {}",
                category.id
            )));
        }
    }

    let mut created = 0;
    for pool in &pools {
        for (a, b) in round_robin(&pool.performers) {
            let battle = Battle::new(
                category.id,
                Phase::Pools,
                OutcomeType::WinDrawLoss,
                vec![a, b],
            )
            .in_pool(pool.id);
            category.push_battle(battle);
            created += 1;
        }
    }
    log::info!(
        "Category {}: {} pool(s), {} pool battle(s) queued",
        category.name,
        pools.len(),
        created
    );
    category.pools = pools;
    Ok(created)
}

/// Every pairing of `members` exactly once, ordered in rounds (circle method)
/// so nobody dances two battles in a row when it can be avoided.
pub fn round_robin(members: &[PerformerId]) -> Vec<(PerformerId, PerformerId)> {
    let mut ring: Vec<Option<PerformerId>> = members.iter().copied().map(Some).collect();
    if ring.len() % 2 == 1 {
        ring.push(None);
    }
    let n = ring.len();
    let mut pairs = Vec::with_capacity(members.len() * members.len().saturating_sub(1) / 2);
    for _ in 0..n.saturating_sub(1) {
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (ring[i], ring[n - 1 - i]) {
                pairs.push((a, b));
            }
        }
        ring[1..].rotate_right(1);
    }
    pairs
}
