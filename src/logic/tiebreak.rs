//! Tie detection: preselection cutoff ties and pool-winner ties.
//!
//! Both detectors recompute their outcome from scratch on every call and only insert a
//! battle when no unfinished tiebreak exists for the same scope, so running them more than
//! once per completed battle is harmless.

use crate::error::{EngineResult, ValidationError};
use crate::logic::ranking::{qualification, Qualification};
use crate::models::{Battle, BattleId, Category, PerformerId, Phase, PoolId};

/// Insert a tiebreak when tied regular performers straddle the preselection cutoff.
///
/// Must only run once every scored preselection battle of the category is completed.
/// Returns the id of the created tiebreak, or `None` if no new battle was needed.
pub fn detect_preselection_tiebreak(category: &mut Category) -> EngineResult<Option<BattleId>> {
    if !category.regular_battles_done(Phase::Preselection) {
        return Err(ValidationError::DetectionTooEarly(Phase::Preselection).into());
    }
    if category.open_tiebreak(Phase::Preselection, None).is_some() {
        return Ok(None);
    }

    match qualification(category)? {
        Qualification::Decided(_) => Ok(None),
        Qualification::Tied {
            tied,
            winners_needed,
            ..
        } => {
            log::info!(
                "Category {}: {} performers tied at the preselection cutoff, {} advance",
                category.name,
                tied.len(),
                winners_needed
            );
            let battle = Battle::tiebreak(category.id, Phase::Preselection, tied, winners_needed);
            Ok(Some(category.push_battle(battle)))
        }
    }
}

enum PoolDecision {
    Winner(PoolId, PerformerId),
    Tiebreak(PoolId, Vec<PerformerId>),
}

/// Record pool winners, or insert a tiebreak for pools whose points leaders are tied.
///
/// Must only run once every round-robin pool battle of the category is completed.
/// Pools that already have a winner or an unfinished tiebreak are left alone. A completed
/// tiebreak among exactly the current leaders names the winner.
/// Returns the ids of the created tiebreaks.
pub fn detect_pool_winners(category: &mut Category) -> EngineResult<Vec<BattleId>> {
    if !category.regular_battles_done(Phase::Pools) {
        return Err(ValidationError::DetectionTooEarly(Phase::Pools).into());
    }

    let mut decisions = Vec::new();
    for pool in &category.pools {
        if pool.winner.is_some() || category.open_tiebreak(Phase::Pools, Some(pool.id)).is_some() {
            continue;
        }
        let leaders = pool_leaders(category, &pool.performers)?;
        if let [winner] = leaders.as_slice() {
            decisions.push(PoolDecision::Winner(pool.id, *winner));
            continue;
        }
        let settled = category
            .battles_in(Phase::Pools)
            .filter(|b| {
                b.is_tiebreak()
                    && b.is_completed()
                    && b.pool == Some(pool.id)
                    && b.same_participants(&leaders)
            })
            .find_map(|b| b.winners().first().copied());
        match settled {
            Some(winner) => decisions.push(PoolDecision::Winner(pool.id, winner)),
            None => decisions.push(PoolDecision::Tiebreak(pool.id, leaders)),
        }
    }

    let mut created = Vec::new();
    for decision in decisions {
        match decision {
            PoolDecision::Winner(pool_id, winner) => {
                if let Some(pool) = category.pool_mut(pool_id) {
                    pool.winner = Some(winner);
                }
                log::info!("Category {}: pool winner {}", category.name, winner);
            }
            PoolDecision::Tiebreak(pool_id, leaders) => {
                log::info!(
                    "Category {}: {} performers tied for a pool win",
                    category.name,
                    leaders.len()
                );
                let battle = Battle::tiebreak(category.id, Phase::Pools, leaders, 1).in_pool(pool_id);
                created.push(category.push_battle(battle));
            }
        }
    }
    Ok(created)
}

/// Performers sharing the highest point total, in pool order.
fn pool_leaders(category: &Category, members: &[PerformerId]) -> EngineResult<Vec<PerformerId>> {
    let points = members
        .iter()
        .map(|&id| Ok((id, category.performer(id)?.points())))
        .collect::<EngineResult<Vec<_>>>()?;
    let best = points.iter().map(|&(_, p)| p).max().unwrap_or(0);
    Ok(points
        .into_iter()
        .filter(|&(_, p)| p == best)
        .map(|(id, _)| id)
        .collect())
}
