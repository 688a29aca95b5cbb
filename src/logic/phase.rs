//! Phase transitions: readiness checks, status changes and the battles each phase opens with.

use crate::error::{EngineError, EngineResult, ValidationError};
use crate::logic::capacity::category_capacity;
use crate::logic::finals::build_finals;
use crate::logic::queue::{build_pool_battles, build_preselection_queue, seed_pools};
use crate::logic::ranking::{qualification, Qualification};
use crate::logic::reorder::normalize;
use crate::models::{Category, Phase, Status, Tournament, TournamentId};
use rand::Rng;

/// Reject a tournament becoming Active while another one is.
///
/// `active` is the currently active tournament as reported by the store.
pub fn ensure_single_active(active: Option<TournamentId>, candidate: TournamentId) -> EngineResult<()> {
    match active {
        Some(other) if other != candidate => {
            Err(ValidationError::AnotherTournamentActive(other).into())
        }
        _ => Ok(()),
    }
}

/// Move the tournament to its next phase. See [`advance_with_rng`].
pub fn advance(tournament: &mut Tournament, active: Option<TournamentId>) -> EngineResult<Phase> {
    advance_with_rng(tournament, active, &mut rand::thread_rng())
}

/// Move the tournament to its next phase, using `rng` to seed pools.
///
/// 1. Every category must be ready to leave the current phase.
/// 2. Leaving Registration flips the status to Active (only if no other tournament is active)
///    and queues preselection.
/// 3. Leaving Preselection fills equal pools with the qualifiers and queues their round-robins.
/// 4. Leaving Pools opens the finals bracket between pool winners.
/// 5. Leaving Finals completes the tournament.
///
/// On any error the tournament is left untouched.
pub fn advance_with_rng<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    active: Option<TournamentId>,
    rng: &mut R,
) -> EngineResult<Phase> {
    match tournament.status {
        Status::Cancelled => return Err(ValidationError::Cancelled.into()),
        Status::Completed => return Err(ValidationError::AlreadyCompleted.into()),
        Status::Created | Status::Active => {}
    }
    let next_phase = tournament
        .phase
        .next()
        .ok_or(ValidationError::AlreadyCompleted)?;
    if tournament.categories.is_empty() {
        return Err(EngineError::NoCategories);
    }

    let mut next = tournament.clone();
    match tournament.phase {
        Phase::Registration => {
            for category in &next.categories {
                category_capacity(category)?;
            }
            ensure_single_active(active, next.id)?;
            next.status = Status::Active;
            build_preselection_queue(&mut next)?;
        }
        Phase::Preselection => {
            for category in &mut next.categories {
                open_pools(category, rng)?;
            }
        }
        Phase::Pools => {
            for category in &mut next.categories {
                close_pools(category)?;
                build_finals(category)?;
            }
        }
        Phase::Finals => {
            for category in &next.categories {
                if category.champion.is_none() {
                    return Err(not_ready(category, Phase::Finals, "finals are still running"));
                }
            }
            next.status = Status::Completed;
        }
        Phase::Completed => return Err(ValidationError::AlreadyCompleted.into()),
    }
    next.phase = next_phase;
    for category in &next.categories {
        category.check_invariants()?;
    }

    log::info!(
        "Tournament {} ({}): {:?} -> {:?}, status {:?}",
        next.name,
        next.id,
        tournament.phase,
        next.phase,
        next.status
    );
    *tournament = next;
    Ok(next_phase)
}

/// Administrative cancellation. Returns the resulting status.
///
/// Nothing has been played during Registration, so the tournament simply goes back to Created;
/// once battles exist it is Cancelled; a completed tournament stays completed.
pub fn deactivate(tournament: &mut Tournament) -> Status {
    tournament.status = match tournament.phase {
        Phase::Registration => Status::Created,
        Phase::Preselection | Phase::Pools | Phase::Finals => Status::Cancelled,
        Phase::Completed => Status::Completed,
    };
    log::info!(
        "Tournament {} deactivated in {:?}: {:?}",
        tournament.id,
        tournament.phase,
        tournament.status
    );
    tournament.status
}

fn open_pools<R: Rng + ?Sized>(category: &mut Category, rng: &mut R) -> EngineResult<()> {
    if !category.all_battles_done(Phase::Preselection) {
        return Err(not_ready(
            category,
            Phase::Preselection,
            "preselection battles are still pending",
        ));
    }
    let qualified = match qualification(category)? {
        Qualification::Decided(ids) => ids,
        Qualification::Tied { .. } => {
            return Err(not_ready(
                category,
                Phase::Preselection,
                "the tie at the cutoff is unresolved",
            ))
        }
    };
    let capacity = category_capacity(category)?;
    let pools = seed_pools(qualified, category.groups_ideal, capacity.per_pool_size, rng)?;
    normalize(category);
    build_pool_battles(category, pools)?;
    Ok(())
}

fn close_pools(category: &Category) -> EngineResult<()> {
    if !category.all_battles_done(Phase::Pools) {
        return Err(not_ready(category, Phase::Pools, "pool battles are still pending"));
    }
    if category.pools.iter().any(|p| p.winner.is_none()) {
        return Err(not_ready(category, Phase::Pools, "a pool has no winner yet"));
    }
    Ok(())
}

fn not_ready(category: &Category, phase: Phase, reason: &str) -> EngineError {
    ValidationError::PhaseNotReady {
        category: category.id,
        phase,
        reason: reason.to_string(),
    }
    .into()
}
