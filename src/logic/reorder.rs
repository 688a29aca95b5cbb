//! Manual reordering of a category's pending battle queue.

use crate::error::{EngineError, EngineResult, ValidationError};
use crate::models::{BattleId, BattleStatus, Category, CategoryId, Tournament};
use std::collections::HashMap;

/// Reorder a battle of a running tournament. See [`reorder`].
pub fn move_battle(
    tournament: &mut Tournament,
    category_id: CategoryId,
    battle_id: BattleId,
    new_position: usize,
) -> EngineResult<()> {
    tournament.ensure_running()?;
    reorder(tournament.category_mut(category_id)?, battle_id, new_position)
}

/// Move a pending battle to `new_position` (1-based) in the category's pending queue.
///
/// Position 1 is the battle on deck and is locked: it cannot be moved and nothing can be moved
/// onto it. Positions past the end are clamped to the last slot. Afterwards the category's keys
/// are renumbered densely.
pub fn reorder(category: &mut Category, battle_id: BattleId, new_position: usize) -> EngineResult<()> {
    match category.battle(battle_id)?.status {
        BattleStatus::Pending => {}
        status @ (BattleStatus::Active | BattleStatus::Completed) => {
            return Err(ValidationError::BattleNotPending(status).into());
        }
    }

    let mut pending: Vec<BattleId> = category.pending_queue().iter().map(|b| b.id).collect();
    if pending.first() == Some(&battle_id) {
        return Err(ValidationError::BattleOnDeck.into());
    }
    if new_position <= 1 {
        return Err(ValidationError::PositionLocked(new_position).into());
    }

    let target = new_position.min(pending.len());
    let from = pending
        .iter()
        .position(|&id| id == battle_id)
        .ok_or_else(|| EngineError::InvariantViolation(format!("battle {} missing from queue", battle_id)))?;
    let moved = pending.remove(from);
    pending.insert(target - 1, moved);

    log::debug!(
        "Category {}: battle {} moved from position {} to {}",
        category.name,
        battle_id,
        from + 1,
        target
    );
    reindex(category, &pending);
    category.check_invariants()
}

/// Renumber every battle of the category 1..N: played and running battles first in their
/// current order, then the pending ones in `pending_order`.
pub fn reindex(category: &mut Category, pending_order: &[BattleId]) {
    let mut settled: Vec<(u32, BattleId)> = category
        .battles
        .iter()
        .filter(|b| !b.is_pending())
        .map(|b| (b.sequence_order, b.id))
        .collect();
    settled.sort_unstable();

    let keys: HashMap<BattleId, u32> = settled
        .into_iter()
        .map(|(_, id)| id)
        .chain(pending_order.iter().copied())
        .zip(1..)
        .collect();
    for battle in &mut category.battles {
        if let Some(&key) = keys.get(&battle.id) {
            battle.sequence_order = key;
        }
    }
}

/// Renumber the category densely while keeping the current pending order.
pub fn normalize(category: &mut Category) {
    let pending: Vec<BattleId> = category.pending_queue().iter().map(|b| b.id).collect();
    reindex(category, &pending);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Battle, OutcomeType, Phase};

    fn queued(n: usize) -> (Category, Vec<BattleId>) {
        let mut c = Category::new("House", 1, 2, false).unwrap();
        let ids: Vec<BattleId> = (0..n)
            .map(|_| c.push_battle(Battle::new(c.id, Phase::Preselection, OutcomeType::Scored, vec![])))
            .collect();
        (c, ids)
    }

    fn pending_order(c: &Category) -> Vec<BattleId> {
        c.pending_queue().iter().map(|b| b.id).collect()
    }

    #[test]
    fn moves_and_renumbers() {
        let (mut c, ids) = queued(4);
        reorder(&mut c, ids[3], 2).unwrap();
        assert_eq!(pending_order(&c), vec![ids[0], ids[3], ids[1], ids[2]]);
        let keys: Vec<u32> = c.pending_queue().iter().map(|b| b.sequence_order).collect();
        assert_eq!(keys, vec![1, 2, 3, 4]);
    }

    #[test]
    fn clamps_past_the_end() {
        let (mut c, ids) = queued(3);
        reorder(&mut c, ids[1], 99).unwrap();
        assert_eq!(pending_order(&c), vec![ids[0], ids[2], ids[1]]);
    }

    #[test]
    fn on_deck_is_locked() {
        let (mut c, ids) = queued(3);
        assert_eq!(
            reorder(&mut c, ids[0], 3),
            Err(EngineError::Validation(ValidationError::BattleOnDeck))
        );
        assert_eq!(
            reorder(&mut c, ids[2], 1),
            Err(EngineError::Validation(ValidationError::PositionLocked(1)))
        );
        assert_eq!(pending_order(&c), ids);
    }

    #[test]
    fn played_battles_cannot_move() {
        let (mut c, ids) = queued(3);
        c.battles[1].status = BattleStatus::Completed;
        assert_eq!(
            reorder(&mut c, ids[1], 3),
            Err(EngineError::Validation(ValidationError::BattleNotPending(BattleStatus::Completed)))
        );
        c.battles[0].status = BattleStatus::Active;
        assert_eq!(
            reorder(&mut c, ids[0], 2),
            Err(EngineError::Validation(ValidationError::BattleNotPending(BattleStatus::Active)))
        );
    }

    #[test]
    fn settled_battles_keep_the_lowest_keys() {
        let (mut c, ids) = queued(5);
        c.battles[0].status = BattleStatus::Completed;
        reorder(&mut c, ids[4], 2).unwrap();
        assert_eq!(c.battle(ids[0]).unwrap().sequence_order, 1);
        assert_eq!(pending_order(&c), vec![ids[1], ids[4], ids[2], ids[3]]);
        let keys: Vec<u32> = c.pending_queue().iter().map(|b| b.sequence_order).collect();
        assert_eq!(keys, vec![2, 3, 4, 5]);
    }
}
