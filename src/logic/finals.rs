//! Finals: single-elimination bracket between pool winners. The last survivor is the category champion.

use crate::error::{EngineError, EngineResult};
use crate::models::{Battle, BattleId, Category, OutcomeType, PerformerId, Phase};

/// Queue the first finals round from the pool winners, in pool order.
///
/// A category with a single pool crowns its pool winner straight away.
pub fn build_finals(category: &mut Category) -> EngineResult<Vec<BattleId>> {
    let entrants = pool_winners(category)?;
    Ok(build_round(category, &entrants, 1))
}

/// Once every battle of the current round is completed, queue the next round or crown the champion.
///
/// Returns the battles created; calling it again before the next round is played creates nothing.
pub fn advance_bracket(category: &mut Category) -> EngineResult<Vec<BattleId>> {
    if category.champion.is_some() {
        return Ok(Vec::new());
    }
    let Some(round) = category.battles_in(Phase::Finals).filter_map(|b| b.round).max() else {
        return Ok(Vec::new());
    };
    let round_done = category
        .battles_in(Phase::Finals)
        .filter(|b| b.round == Some(round))
        .all(|b| b.is_completed());
    if !round_done {
        return Ok(Vec::new());
    }

    let mut entrants = pool_winners(category)?;
    for r in 1..=round {
        entrants = survivors(category, &entrants, r)?;
    }
    Ok(build_round(category, &entrants, round + 1))
}

fn pool_winners(category: &Category) -> EngineResult<Vec<PerformerId>> {
    category
        .pools
        .iter()
        .map(|p| {
            p.winner.ok_or_else(|| {
                EngineError::InvariantViolation(format!("pool {} has no winner", p.id))
            })
        })
        .collect()
}

/// Pair entrants 1v2, 3v4… An odd entrant out gets a bye.
fn build_round(category: &mut Category, entrants: &[PerformerId], round: u32) -> Vec<BattleId> {
    if let [champion] = entrants {
        category.champion = Some(*champion);
        log::info!("Category {}: champion {}", category.name, champion);
        return Vec::new();
    }
    let created: Vec<BattleId> = entrants
        .chunks_exact(2)
        .map(|pair| {
            let battle = Battle::new(category.id, Phase::Finals, OutcomeType::WinLoss, pair.to_vec())
                .in_round(round);
            category.push_battle(battle)
        })
        .collect();
    log::info!(
        "Category {}: finals round {} with {} battle(s)",
        category.name,
        round,
        created.len()
    );
    created
}

/// Who is left after `round`, given the entrants of that round.
fn survivors(category: &Category, entrants: &[PerformerId], round: u32) -> EngineResult<Vec<PerformerId>> {
    entrants
        .chunks(2)
        .map(|pair| match pair {
            [bye] => Ok(*bye),
            _ => category
                .battles_in(Phase::Finals)
                .find(|b| b.round == Some(round) && b.same_participants(pair))
                .and_then(|b| b.winners().first().copied())
                .ok_or_else(|| {
                    EngineError::InvariantViolation(format!("finals round {} is missing a result", round))
                }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BattleStatus, Outcome, Pool};
    use uuid::Uuid;

    fn with_pool_winners(n: usize) -> Category {
        let mut c = Category::new("Popping", n, 2, false).unwrap();
        for _ in 0..n {
            let id = c.register(vec![Uuid::new_v4()], false).unwrap();
            let mut pool = Pool::new(vec![id]);
            pool.winner = Some(id);
            c.pools.push(pool);
        }
        c
    }

    fn win_first(c: &mut Category, id: BattleId) {
        let b = c.battle_mut(id).unwrap();
        b.outcome = Some(Outcome::WinLoss { winner: b.participants[0] });
        b.status = BattleStatus::Completed;
    }

    #[test]
    fn single_pool_winner_is_champion() {
        let mut c = with_pool_winners(1);
        assert!(build_finals(&mut c).unwrap().is_empty());
        assert_eq!(c.champion, Some(c.performers[0].id));
    }

    #[test]
    fn three_entrants_use_a_bye() {
        let mut c = with_pool_winners(3);
        let first = build_finals(&mut c).unwrap();
        assert_eq!(first.len(), 1);
        assert!(advance_bracket(&mut c).unwrap().is_empty());

        win_first(&mut c, first[0]);
        let second = advance_bracket(&mut c).unwrap();
        assert_eq!(second.len(), 1);
        let last = c.battle(second[0]).unwrap();
        assert_eq!(last.round, Some(2));
        assert_eq!(last.participants, vec![c.performers[0].id, c.performers[2].id]);

        win_first(&mut c, second[0]);
        assert!(advance_bracket(&mut c).unwrap().is_empty());
        assert_eq!(c.champion, Some(c.performers[0].id));
    }
}
