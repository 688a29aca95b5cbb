//! Category: pool configuration plus the performers, pools and battles it owns.

use crate::error::{EngineError, EngineResult, ValidationError};
use crate::models::battle::{Battle, BattleId};
use crate::models::performer::{DancerId, Performer, PerformerId};
use crate::models::pool::{Pool, PoolId};
use crate::models::tournament::Phase;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a category.
pub type CategoryId = Uuid;

/// How preselection battles are formed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreselectionFormat {
    /// One performer on stage per scored battle.
    #[default]
    Solo,
    /// Two performers share the stage; an odd performer out dances alone.
    Paired,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Target pool count.
    pub groups_ideal: usize,
    /// Target size per pool.
    pub performers_ideal: usize,
    pub is_duo: bool,
    pub preselection_format: PreselectionFormat,
    /// Performers in registration order.
    pub performers: Vec<Performer>,
    pub pools: Vec<Pool>,
    pub battles: Vec<Battle>,
    /// Set once the finals bracket has a single survivor.
    pub champion: Option<PerformerId>,
}

impl Category {
    /// Create a category. Needs at least one pool of at least two performers.
    pub fn new(
        name: impl Into<String>,
        groups_ideal: usize,
        performers_ideal: usize,
        is_duo: bool,
    ) -> EngineResult<Self> {
        if groups_ideal == 0 {
            return Err(ValidationError::InvalidCategory("at least one pool is required".into()).into());
        }
        if performers_ideal < 2 {
            return Err(ValidationError::InvalidCategory(
                "pools need at least two performers".into(),
            )
            .into());
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            groups_ideal,
            performers_ideal,
            is_duo,
            preselection_format: PreselectionFormat::Solo,
            performers: Vec::new(),
            pools: Vec::new(),
            battles: Vec::new(),
            champion: None,
        })
    }

    pub fn with_format(mut self, format: PreselectionFormat) -> Self {
        self.preselection_format = format;
        self
    }

    /// Dancers per performer: two for duo categories.
    pub fn dancers_per_performer(&self) -> usize {
        if self.is_duo {
            2
        } else {
            1
        }
    }

    /// Add a performer. Dancer count must match the category and no dancer may appear twice.
    pub fn register(&mut self, dancers: Vec<DancerId>, is_guest: bool) -> EngineResult<PerformerId> {
        let expected = self.dancers_per_performer();
        if dancers.len() != expected {
            return Err(ValidationError::WrongDancerCount {
                expected,
                got: dancers.len(),
            }
            .into());
        }
        let already = dancers.iter().enumerate().any(|(i, d)| {
            dancers[..i].contains(d) || self.performers.iter().any(|p| p.dancers.contains(d))
        });
        if already {
            return Err(ValidationError::DuplicateDancer.into());
        }
        let performer = if is_guest {
            Performer::guest(dancers)
        } else {
            Performer::new(dancers)
        };
        let id = performer.id;
        self.performers.push(performer);
        Ok(id)
    }

    pub fn guest_count(&self) -> usize {
        self.performers.iter().filter(|p| p.is_guest).count()
    }

    /// Non-guest performers in registration order.
    pub fn regulars(&self) -> impl Iterator<Item = &Performer> {
        self.performers.iter().filter(|p| !p.is_guest)
    }

    pub fn performer(&self, id: PerformerId) -> EngineResult<&Performer> {
        self.performers
            .iter()
            .find(|p| p.id == id)
            .ok_or(EngineError::PerformerNotFound(id))
    }

    pub fn performer_mut(&mut self, id: PerformerId) -> EngineResult<&mut Performer> {
        self.performers
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(EngineError::PerformerNotFound(id))
    }

    pub fn battle(&self, id: BattleId) -> EngineResult<&Battle> {
        self.battles
            .iter()
            .find(|b| b.id == id)
            .ok_or(EngineError::BattleNotFound(id))
    }

    pub fn battle_mut(&mut self, id: BattleId) -> EngineResult<&mut Battle> {
        self.battles
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(EngineError::BattleNotFound(id))
    }

    pub fn pool_mut(&mut self, id: PoolId) -> Option<&mut Pool> {
        self.pools.iter_mut().find(|p| p.id == id)
    }

    /// Battles of one phase.
    pub fn battles_in(&self, phase: Phase) -> impl Iterator<Item = &Battle> {
        self.battles.iter().filter(move |b| b.phase == phase)
    }

    /// Pending battles sorted by `sequence_order`; the first one is on deck.
    pub fn pending_queue(&self) -> Vec<&Battle> {
        let mut pending: Vec<&Battle> = self.battles.iter().filter(|b| b.is_pending()).collect();
        pending.sort_by_key(|b| b.sequence_order);
        pending
    }

    /// The next pending battle, locked against reordering.
    pub fn on_deck(&self) -> Option<&Battle> {
        self.pending_queue().into_iter().next()
    }

    /// Key for a battle appended at the end of this category's queue.
    pub fn next_sequence_order(&self) -> u32 {
        self.battles
            .iter()
            .map(|b| b.sequence_order)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Append a battle at the end of the queue, returning its id.
    pub fn push_battle(&mut self, mut battle: Battle) -> BattleId {
        battle.sequence_order = self.next_sequence_order();
        let id = battle.id;
        self.battles.push(battle);
        id
    }

    /// A tiebreak of `phase` (and `pool`, for pool tiebreaks) that has not been completed yet.
    pub fn open_tiebreak(&self, phase: Phase, pool: Option<PoolId>) -> Option<&Battle> {
        self.battles_in(phase)
            .find(|b| b.is_tiebreak() && !b.is_completed() && b.pool == pool)
    }

    /// Whether every non-tiebreak battle of `phase` has been completed.
    pub fn regular_battles_done(&self, phase: Phase) -> bool {
        self.battles_in(phase)
            .filter(|b| !b.is_tiebreak())
            .all(|b| b.is_completed())
    }

    /// Whether every battle of `phase`, tiebreaks included, has been completed.
    pub fn all_battles_done(&self, phase: Phase) -> bool {
        self.battles_in(phase).all(|b| b.is_completed())
    }

    /// Check that pools are equally sized and sequence keys are unique.
    pub fn check_invariants(&self) -> EngineResult<()> {
        if let Some(first) = self.pools.first() {
            if self.pools.iter().any(|p| p.performers.len() != first.performers.len()) {
                return Err(EngineError::InvariantViolation(format!(
                    "pools of category {} have unequal sizes",
                    self.id
                )));
            }
        }
        let mut keys: Vec<u32> = self.battles.iter().map(|b| b.sequence_order).collect();
        keys.sort_unstable();
        if keys.windows(2).any(|w| w[0] == w[1]) {
            return Err(EngineError::InvariantViolation(format!(
                "duplicate sequence_order in category {}",
                self.id
            )));
        }
        Ok(())
    }
}
