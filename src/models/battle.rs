//! Battle, its status, outcome type and recorded outcome.

use crate::models::category::CategoryId;
use crate::models::performer::PerformerId;
use crate::models::pool::PoolId;
use crate::models::tournament::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a battle.
pub type BattleId = Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    #[default]
    Pending,
    /// On stage right now.
    Active,
    Completed,
}

/// How a battle's result is encoded.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    /// Judges give each participant a score (preselection).
    Scored,
    /// One winner or a draw (pools).
    WinDrawLoss,
    /// One winner, no draw (finals).
    WinLoss,
    /// `winners_needed` winners picked among tied performers.
    Tiebreak,
}

/// A recorded result. The variant must match the battle's [`OutcomeType`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Scored { scores: Vec<(PerformerId, f64)> },
    /// `winner: None` is a draw.
    WinDrawLoss { winner: Option<PerformerId> },
    WinLoss { winner: PerformerId },
    /// Winners in rank order.
    Tiebreak { winners: Vec<PerformerId> },
}

impl Outcome {
    pub fn outcome_type(&self) -> OutcomeType {
        match self {
            Outcome::Scored { .. } => OutcomeType::Scored,
            Outcome::WinDrawLoss { .. } => OutcomeType::WinDrawLoss,
            Outcome::WinLoss { .. } => OutcomeType::WinLoss,
            Outcome::Tiebreak { .. } => OutcomeType::Tiebreak,
        }
    }
}

/// A single battle in a category's queue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,
    pub category: CategoryId,
    pub phase: Phase,
    pub status: BattleStatus,
    pub outcome_type: OutcomeType,
    pub participants: Vec<PerformerId>,
    /// Queue position within the category; assigned by the queue builder.
    pub sequence_order: u32,
    /// Pool this battle belongs to (pool round-robin and pool tiebreaks).
    pub pool: Option<PoolId>,
    /// Tiebreaks only: how many of the participants advance.
    pub winners_needed: Option<usize>,
    /// Finals only: bracket round, starting at 1.
    pub round: Option<u32>,
    /// None if not yet played.
    pub outcome: Option<Outcome>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Battle {
    pub fn new(
        category: CategoryId,
        phase: Phase,
        outcome_type: OutcomeType,
        participants: Vec<PerformerId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            phase,
            status: BattleStatus::Pending,
            outcome_type,
            participants,
            sequence_order: 0,
            pool: None,
            winners_needed: None,
            round: None,
            outcome: None,
            completed_at: None,
        }
    }

    /// A tiebreak among `participants`, of which `winners_needed` advance.
    pub fn tiebreak(
        category: CategoryId,
        phase: Phase,
        participants: Vec<PerformerId>,
        winners_needed: usize,
    ) -> Self {
        Self {
            winners_needed: Some(winners_needed),
            ..Self::new(category, phase, OutcomeType::Tiebreak, participants)
        }
    }

    pub fn in_pool(mut self, pool: PoolId) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn in_round(mut self, round: u32) -> Self {
        self.round = Some(round);
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == BattleStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == BattleStatus::Completed
    }

    pub fn is_tiebreak(&self) -> bool {
        self.outcome_type == OutcomeType::Tiebreak
    }

    /// Winners named by the recorded outcome (empty for scored battles, draws and unplayed battles).
    pub fn winners(&self) -> Vec<PerformerId> {
        match &self.outcome {
            Some(Outcome::WinDrawLoss { winner: Some(w) }) | Some(Outcome::WinLoss { winner: w }) => {
                vec![*w]
            }
            Some(Outcome::Tiebreak { winners }) => winners.clone(),
            Some(Outcome::WinDrawLoss { winner: None }) | Some(Outcome::Scored { .. }) | None => {
                Vec::new()
            }
        }
    }

    /// Whether the battle is fought by exactly this set of performers.
    pub fn same_participants(&self, others: &[PerformerId]) -> bool {
        self.participants.len() == others.len()
            && others.iter().all(|p| self.participants.contains(p))
    }
}
