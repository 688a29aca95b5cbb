//! Tournament, Phase and Status.

use crate::error::{EngineError, EngineResult, ValidationError};
use crate::logic::interleave;
use crate::models::battle::Battle;
use crate::models::category::{Category, CategoryId};
use crate::models::performer::{DancerId, PerformerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament. Phases only ever move forward.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Performers sign up; categories may still be edited.
    #[default]
    Registration,
    /// Scored solo (or paired) rounds narrowing the field to pool capacity.
    Preselection,
    /// Round-robin battles inside equal-sized pools.
    Pools,
    /// Head-to-head bracket between pool winners.
    Finals,
    Completed,
}

impl Phase {
    /// The phase following this one, or `None` once completed.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Registration => Some(Phase::Preselection),
            Phase::Preselection => Some(Phase::Pools),
            Phase::Pools => Some(Phase::Finals),
            Phase::Finals => Some(Phase::Completed),
            Phase::Completed => None,
        }
    }

    /// Whether battles are being fought in this phase.
    pub fn is_competitive(self) -> bool {
        match self {
            Phase::Preselection | Phase::Pools | Phase::Finals => true,
            Phase::Registration | Phase::Completed => false,
        }
    }
}

/// Administrative status, orthogonal to the phase.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Created,
    Active,
    Completed,
    Cancelled,
}

/// A tournament and everything it owns: categories, their performers, pools and battles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub phase: Phase,
    pub status: Status,
    /// Categories in creation order; this order drives queue interleaving.
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Registration with no categories.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phase: Phase::Registration,
            status: Status::Created,
            categories: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a category (Registration only). Returns the new category's id.
    pub fn add_category(&mut self, category: Category) -> EngineResult<CategoryId> {
        self.ensure_registration_open()?;
        let id = category.id;
        self.categories.push(category);
        Ok(id)
    }

    /// Remove a category together with its performers (Registration only).
    /// Dancer profiles are only referenced, so they are left alone.
    pub fn remove_category(&mut self, category_id: CategoryId) -> EngineResult<()> {
        self.ensure_registration_open()?;
        let idx = self
            .categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or(EngineError::CategoryNotFound(category_id))?;
        self.categories.remove(idx);
        Ok(())
    }

    /// Register a regular performer in a category (Registration only).
    pub fn register_performer(
        &mut self,
        category_id: CategoryId,
        dancers: Vec<DancerId>,
    ) -> EngineResult<PerformerId> {
        self.ensure_registration_open()?;
        self.category_mut(category_id)?.register(dancers, false)
    }

    /// Register a guest performer: pre-qualified, skips preselection (Registration only).
    pub fn register_guest(
        &mut self,
        category_id: CategoryId,
        dancers: Vec<DancerId>,
    ) -> EngineResult<PerformerId> {
        self.ensure_registration_open()?;
        self.category_mut(category_id)?.register(dancers, true)
    }

    /// Withdraw a performer (Registration only).
    pub fn remove_performer(
        &mut self,
        category_id: CategoryId,
        performer_id: PerformerId,
    ) -> EngineResult<()> {
        self.ensure_registration_open()?;
        let category = self.category_mut(category_id)?;
        let idx = category
            .performers
            .iter()
            .position(|p| p.id == performer_id)
            .ok_or(EngineError::PerformerNotFound(performer_id))?;
        category.performers.remove(idx);
        Ok(())
    }

    pub fn category(&self, id: CategoryId) -> EngineResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or(EngineError::CategoryNotFound(id))
    }

    pub fn category_mut(&mut self, id: CategoryId) -> EngineResult<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EngineError::CategoryNotFound(id))
    }

    /// Every battle of the tournament in presentation order: the first battle of each
    /// category (creation order), then the second of each, and so on. Within a category
    /// battles follow `sequence_order`.
    pub fn queue(&self) -> Vec<&Battle> {
        let lanes = self
            .categories
            .iter()
            .map(|c| {
                let mut battles: Vec<&Battle> = c.battles.iter().collect();
                battles.sort_by_key(|b| b.sequence_order);
                battles
            })
            .collect();
        interleave(lanes).into_iter().map(|(_, b)| b).collect()
    }

    /// Pending battles of the whole tournament in presentation order, interleaved by
    /// queue position so a reorder in one category never starves the others.
    pub fn pending_queue(&self) -> Vec<&Battle> {
        let lanes = self.categories.iter().map(Category::pending_queue).collect();
        interleave(lanes).into_iter().map(|(_, b)| b).collect()
    }

    /// Battles may only be started, scored or moved while the tournament is Active.
    pub fn ensure_running(&self) -> EngineResult<()> {
        match self.status {
            Status::Active => Ok(()),
            Status::Cancelled => Err(ValidationError::Cancelled.into()),
            Status::Completed => Err(ValidationError::AlreadyCompleted.into()),
            Status::Created => Err(ValidationError::NotStarted.into()),
        }
    }

    fn ensure_registration_open(&self) -> EngineResult<()> {
        if self.phase != Phase::Registration {
            return Err(ValidationError::RegistrationClosed.into());
        }
        Ok(())
    }
}
