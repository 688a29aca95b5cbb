//! Integration tests for a tournament's full life: registration, preselection, pools, finals.

use battle_tournament::{
    advance, advance_with_rng, deactivate, move_battle, record_result, reorder, start_battle,
    BattleId, BattleStatus, Category, CategoryId, EngineError, Outcome, OutcomeType, PerformerId,
    Phase, Status, Tournament, ValidationError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use uuid::Uuid;

fn tournament_with_performers(n: usize, groups: usize, size: usize) -> (Tournament, CategoryId) {
    let mut t = Tournament::new("City Jam");
    let cat = t
        .add_category(Category::new("All styles", groups, size, false).unwrap())
        .unwrap();
    for _ in 0..n {
        t.register_performer(cat, vec![Uuid::new_v4()]).unwrap();
    }
    (t, cat)
}

fn pending(t: &Tournament, cat: CategoryId) -> Vec<BattleId> {
    t.category(cat)
        .unwrap()
        .pending_queue()
        .iter()
        .map(|b| b.id)
        .collect()
}

/// Score every pending preselection battle from `scores`.
fn score_preselection(t: &mut Tournament, cat: CategoryId, scores: &HashMap<PerformerId, f64>) -> Vec<BattleId> {
    let mut created = Vec::new();
    for id in pending(t, cat) {
        let battle = t.category(cat).unwrap().battle(id).unwrap().clone();
        let outcome = Outcome::Scored {
            scores: battle.participants.iter().map(|p| (*p, scores[p])).collect(),
        };
        created.extend(record_result(t, cat, id, outcome).unwrap());
    }
    created
}

/// Give every pending battle of the current phase to its first participant.
fn first_participant_wins(t: &mut Tournament, cat: CategoryId) -> Vec<BattleId> {
    let mut created = Vec::new();
    for id in pending(t, cat) {
        let battle = t.category(cat).unwrap().battle(id).unwrap().clone();
        let winner = battle.participants[0];
        let outcome = match battle.outcome_type {
            OutcomeType::WinDrawLoss => Outcome::WinDrawLoss { winner: Some(winner) },
            OutcomeType::WinLoss => Outcome::WinLoss { winner },
            OutcomeType::Tiebreak => Outcome::Tiebreak { winners: vec![winner] },
            OutcomeType::Scored => panic!("unexpected scored battle"),
        };
        created.extend(record_result(t, cat, id, outcome).unwrap());
    }
    created
}

fn descending_scores(t: &Tournament, cat: CategoryId) -> HashMap<PerformerId, f64> {
    t.category(cat)
        .unwrap()
        .performers
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, 9.0 - i as f64))
        .collect()
}

#[test]
fn runs_from_registration_to_champion() {
    let mut rng = StdRng::seed_from_u64(42);
    let (mut t, cat) = tournament_with_performers(5, 2, 2);

    assert_eq!(advance_with_rng(&mut t, None, &mut rng), Ok(Phase::Preselection));
    assert_eq!(t.status, Status::Active);
    assert_eq!(pending(&t, cat).len(), 5);

    let scores = descending_scores(&t, cat);
    assert!(score_preselection(&mut t, cat, &scores).is_empty());

    assert_eq!(advance_with_rng(&mut t, None, &mut rng), Ok(Phase::Pools));
    let category = t.category(cat).unwrap();
    assert_eq!(category.pools.len(), 2);
    assert!(category.pools.iter().all(|p| p.performers.len() == 2));
    let lowest = category.performers[4].id;
    assert!(category.pools.iter().all(|p| !p.contains(lowest)));
    let keys: Vec<u32> = category.pending_queue().iter().map(|b| b.sequence_order).collect();
    assert_eq!(keys, vec![6, 7]);

    assert!(first_participant_wins(&mut t, cat).is_empty());
    assert!(t.category(cat).unwrap().pools.iter().all(|p| p.winner.is_some()));

    assert_eq!(advance_with_rng(&mut t, None, &mut rng), Ok(Phase::Finals));
    let finals = pending(&t, cat);
    assert_eq!(finals.len(), 1);
    let final_battle = t.category(cat).unwrap().battle(finals[0]).unwrap().clone();
    assert_eq!(final_battle.outcome_type, OutcomeType::WinLoss);

    assert!(first_participant_wins(&mut t, cat).is_empty());
    assert_eq!(t.category(cat).unwrap().champion, Some(final_battle.participants[0]));

    assert_eq!(advance(&mut t, None), Ok(Phase::Completed));
    assert_eq!(t.status, Status::Completed);
    assert_eq!(
        advance(&mut t, None),
        Err(EngineError::Validation(ValidationError::AlreadyCompleted))
    );
}

#[test]
fn insufficient_registrations_leave_tournament_untouched() {
    let (mut t, cat) = tournament_with_performers(4, 2, 4);
    let before = t.clone();
    assert_eq!(
        advance(&mut t, None),
        Err(EngineError::InsufficientRegistrations {
            category: cat,
            required: 5,
            registered: 4,
        })
    );
    assert_eq!(t, before);
}

#[test]
fn preselection_cannot_close_with_pending_battles() {
    let (mut t, cat) = tournament_with_performers(3, 1, 2);
    advance(&mut t, None).unwrap();
    let before = t.clone();
    assert!(matches!(
        advance(&mut t, None),
        Err(EngineError::Validation(ValidationError::PhaseNotReady {
            phase: Phase::Preselection,
            ..
        }))
    ));
    assert_eq!(t, before);
    assert_eq!(pending(&t, cat).len(), 3);
}

#[test]
fn drawn_pool_needs_a_tiebreak() {
    let mut rng = StdRng::seed_from_u64(3);
    let (mut t, cat) = tournament_with_performers(3, 1, 2);
    advance_with_rng(&mut t, None, &mut rng).unwrap();
    let scores = descending_scores(&t, cat);
    score_preselection(&mut t, cat, &scores);
    advance_with_rng(&mut t, None, &mut rng).unwrap();

    let pool_battle = pending(&t, cat)[0];
    let created = record_result(&mut t, cat, pool_battle, Outcome::WinDrawLoss { winner: None }).unwrap();
    assert_eq!(created.len(), 1);
    let tiebreak = t.category(cat).unwrap().battle(created[0]).unwrap().clone();
    assert_eq!(tiebreak.outcome_type, OutcomeType::Tiebreak);
    assert_eq!(tiebreak.winners_needed, Some(1));
    assert!(advance(&mut t, None).is_err());

    let winner = tiebreak.participants[1];
    let created = record_result(&mut t, cat, tiebreak.id, Outcome::Tiebreak { winners: vec![winner] }).unwrap();
    assert!(created.is_empty());
    assert_eq!(t.category(cat).unwrap().pools[0].winner, Some(winner));

    // a single pool means the pool winner is already the champion
    assert_eq!(advance(&mut t, None), Ok(Phase::Finals));
    assert_eq!(t.category(cat).unwrap().champion, Some(winner));
    assert_eq!(advance(&mut t, None), Ok(Phase::Completed));
}

#[test]
fn results_are_validated() {
    let (mut t, cat) = tournament_with_performers(3, 1, 2);
    assert_eq!(
        record_result(&mut t, cat, Uuid::new_v4(), Outcome::Scored { scores: vec![] }),
        Err(EngineError::Validation(ValidationError::NotStarted))
    );

    advance(&mut t, None).unwrap();
    let battle = pending(&t, cat)[0];
    let performer = t.category(cat).unwrap().battle(battle).unwrap().participants[0];
    assert_eq!(
        record_result(&mut t, cat, battle, Outcome::WinLoss { winner: performer }),
        Err(EngineError::Validation(ValidationError::OutcomeMismatch {
            expected: OutcomeType::Scored,
            got: OutcomeType::WinLoss,
        }))
    );
    assert!(record_result(&mut t, cat, battle, Outcome::Scored { scores: vec![(performer, 11.0)] }).is_err());
    assert!(record_result(&mut t, cat, battle, Outcome::Scored { scores: vec![(Uuid::new_v4(), 5.0)] }).is_err());
    assert_eq!(t.category(cat).unwrap().performer(performer).unwrap().score, None);

    record_result(&mut t, cat, battle, Outcome::Scored { scores: vec![(performer, 6.5)] }).unwrap();
    assert_eq!(t.category(cat).unwrap().performer(performer).unwrap().score, Some(6.5));
    assert_eq!(
        record_result(&mut t, cat, battle, Outcome::Scored { scores: vec![(performer, 7.0)] }),
        Err(EngineError::Validation(ValidationError::BattleNotPending(BattleStatus::Completed)))
    );
}

#[test]
fn only_the_battle_on_deck_can_start() {
    let (mut t, cat) = tournament_with_performers(3, 1, 2);
    advance(&mut t, None).unwrap();
    let queue = pending(&t, cat);
    assert_eq!(
        start_battle(&mut t, cat, queue[1]),
        Err(EngineError::Validation(ValidationError::NotOnDeck))
    );
    start_battle(&mut t, cat, queue[0]).unwrap();
    assert_eq!(
        reorder(t.category_mut(cat).unwrap(), queue[0], 3),
        Err(EngineError::Validation(ValidationError::BattleNotPending(BattleStatus::Active)))
    );
    // the next pending battle is now on deck and locked
    assert_eq!(
        reorder(t.category_mut(cat).unwrap(), queue[1], 2),
        Err(EngineError::Validation(ValidationError::BattleOnDeck))
    );
}

#[test]
fn one_battle_on_stage_per_category() {
    let (mut t, cat) = tournament_with_performers(3, 1, 2);
    advance(&mut t, None).unwrap();
    let queue = pending(&t, cat);
    start_battle(&mut t, cat, queue[0]).unwrap();
    assert_eq!(
        start_battle(&mut t, cat, queue[1]),
        Err(EngineError::Validation(ValidationError::BattleInProgress(queue[0])))
    );
    let on_stage = t
        .category(cat)
        .unwrap()
        .battles
        .iter()
        .filter(|b| b.status == BattleStatus::Active)
        .count();
    assert_eq!(on_stage, 1);

    let performer = t.category(cat).unwrap().battle(queue[0]).unwrap().participants[0];
    record_result(&mut t, cat, queue[0], Outcome::Scored { scores: vec![(performer, 7.0)] }).unwrap();
    start_battle(&mut t, cat, queue[1]).unwrap();
}

#[test]
fn queue_is_frozen_outside_play() {
    let (mut t, cat) = tournament_with_performers(3, 1, 2);
    advance(&mut t, None).unwrap();
    let queue = pending(&t, cat);
    move_battle(&mut t, cat, queue[2], 2).unwrap();
    assert_eq!(pending(&t, cat), vec![queue[0], queue[2], queue[1]]);

    deactivate(&mut t);
    assert_eq!(
        move_battle(&mut t, cat, queue[1], 2),
        Err(EngineError::Validation(ValidationError::Cancelled))
    );
    assert_eq!(pending(&t, cat), vec![queue[0], queue[2], queue[1]]);
}

#[test]
fn deactivation_blocks_further_play() {
    let (mut t, cat) = tournament_with_performers(3, 1, 2);
    assert_eq!(deactivate(&mut t), Status::Created);
    advance(&mut t, None).unwrap();
    assert_eq!(deactivate(&mut t), Status::Cancelled);
    assert_eq!(t.phase, Phase::Preselection);
    assert_eq!(
        advance(&mut t, None),
        Err(EngineError::Validation(ValidationError::Cancelled))
    );
    let battle = pending(&t, cat)[0];
    assert_eq!(
        start_battle(&mut t, cat, battle),
        Err(EngineError::Validation(ValidationError::Cancelled))
    );
}
