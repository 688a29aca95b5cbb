//! Result encoding: apply a battle outcome, then run tie detection or bracket advancement.

use crate::error::{EngineResult, ValidationError};
use crate::logic::finals::advance_bracket;
use crate::logic::tiebreak::{detect_pool_winners, detect_preselection_tiebreak};
use crate::models::{
    BattleId, BattleStatus, Category, CategoryId, Outcome, PerformerId, Phase, Tournament,
    MAX_SCORE,
};
use chrono::Utc;
use std::collections::HashSet;

/// Put the battle on deck on stage. Only one battle per category can be on stage at a time.
pub fn start_battle(
    tournament: &mut Tournament,
    category_id: CategoryId,
    battle_id: BattleId,
) -> EngineResult<()> {
    tournament.ensure_running()?;
    let category = tournament.category_mut(category_id)?;
    match category.battle(battle_id)?.status {
        BattleStatus::Pending => {}
        status @ (BattleStatus::Active | BattleStatus::Completed) => {
            return Err(ValidationError::BattleNotPending(status).into());
        }
    }
    if let Some(running) = category.battles.iter().find(|b| b.status == BattleStatus::Active) {
        return Err(ValidationError::BattleInProgress(running.id).into());
    }
    if category.on_deck().map(|b| b.id) != Some(battle_id) {
        return Err(ValidationError::NotOnDeck.into());
    }
    category.battle_mut(battle_id)?.status = BattleStatus::Active;
    Ok(())
}

/// Record the outcome of a battle of the current phase and mark it completed.
///
/// Afterwards the follow-up for the battle's phase runs: preselection tiebreak detection,
/// pool winner detection or finals advancement, each only once its phase's regular battles
/// are all done. Returns the battles that follow-up created. On error nothing changes.
pub fn record_result(
    tournament: &mut Tournament,
    category_id: CategoryId,
    battle_id: BattleId,
    outcome: Outcome,
) -> EngineResult<Vec<BattleId>> {
    tournament.ensure_running()?;
    let phase = tournament.phase;
    let category = tournament.category_mut(category_id)?;
    let battle_phase = category.battle(battle_id)?.phase;
    if battle_phase != phase {
        return Err(ValidationError::InvalidOutcome(format!(
            "battle belongs to {:?}, tournament is in {:?}",
            battle_phase, phase
        ))
        .into());
    }

    let mut next = category.clone();
    apply_outcome(&mut next, battle_id, outcome)?;
    let created = follow_up(&mut next, phase)?;
    next.check_invariants()?;
    *category = next;
    Ok(created)
}

fn apply_outcome(category: &mut Category, battle_id: BattleId, outcome: Outcome) -> EngineResult<()> {
    let battle = category.battle(battle_id)?.clone();
    if battle.is_completed() {
        return Err(ValidationError::BattleNotPending(BattleStatus::Completed).into());
    }
    if outcome.outcome_type() != battle.outcome_type {
        return Err(ValidationError::OutcomeMismatch {
            expected: battle.outcome_type,
            got: outcome.outcome_type(),
        }
        .into());
    }
    let invalid = |reason: &str| ValidationError::InvalidOutcome(reason.to_string());
    let is_participant = |id: &PerformerId| battle.participants.contains(id);

    match &outcome {
        Outcome::Scored { scores } => {
            let scored: HashSet<_> = scores.iter().map(|(id, _)| *id).collect();
            if scored.len() != scores.len()
                || scores.len() != battle.participants.len()
                || !scores.iter().all(|(id, _)| is_participant(id))
            {
                return Err(invalid("every participant needs exactly one score").into());
            }
            if scores.iter().any(|&(_, s)| !(0.0..=MAX_SCORE).contains(&s)) {
                return Err(invalid("score out of range").into());
            }
            for &(id, score) in scores {
                category.performer_mut(id)?.set_score(score)?;
            }
        }
        Outcome::WinDrawLoss { winner } => {
            let &[a, b] = battle.participants.as_slice() else {
                return Err(invalid("pool battles have exactly two participants").into());
            };
            match winner {
                None => {
                    category.performer_mut(a)?.add_draw();
                    category.performer_mut(b)?.add_draw();
                }
                Some(w) if is_participant(w) => {
                    let loser = if *w == a { b } else { a };
                    category.performer_mut(*w)?.add_win();
                    category.performer_mut(loser)?.add_loss();
                }
                Some(_) => return Err(invalid("winner did not take part").into()),
            }
        }
        Outcome::WinLoss { winner } => {
            if !is_participant(winner) {
                return Err(invalid("winner did not take part").into());
            }
        }
        Outcome::Tiebreak { winners } => {
            let distinct: HashSet<_> = winners.iter().collect();
            if Some(winners.len()) != battle.winners_needed
                || distinct.len() != winners.len()
                || !winners.iter().all(is_participant)
            {
                return Err(invalid("tiebreak needs exactly the required number of distinct winners").into());
            }
        }
    }

    let stored = category.battle_mut(battle_id)?;
    stored.outcome = Some(outcome);
    stored.status = BattleStatus::Completed;
    stored.completed_at = Some(Utc::now());
    Ok(())
}

fn follow_up(category: &mut Category, phase: Phase) -> EngineResult<Vec<BattleId>> {
    match phase {
        Phase::Preselection if category.regular_battles_done(Phase::Preselection) => {
            Ok(detect_preselection_tiebreak(category)?.into_iter().collect())
        }
        Phase::Pools if category.regular_battles_done(Phase::Pools) => detect_pool_winners(category),
        Phase::Finals => advance_bracket(category),
        Phase::Preselection | Phase::Pools | Phase::Registration | Phase::Completed => Ok(Vec::new()),
    }
}
