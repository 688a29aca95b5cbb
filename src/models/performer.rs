//! Performer: a solo dancer or a duo registered in one category.

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a performer (used in battles, pools and lookups).
pub type PerformerId = Uuid;

/// Identifier of an externally-owned dancer profile. Performers only reference it.
pub type DancerId = Uuid;

/// Highest score a judge can give; guests are ranked at this score.
pub const MAX_SCORE: f64 = 10.0;

/// Pool points per result.
pub const POINTS_WIN: u32 = 3;
pub const POINTS_DRAW: u32 = 1;

/// A performer in a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub id: PerformerId,
    /// One dancer for solo categories, two for duos.
    pub dancers: Vec<DancerId>,
    /// Guests are pre-qualified and never battle in preselection.
    pub is_guest: bool,
    /// None until scored in preselection.
    pub score: Option<f64>,
    pub pool_wins: u32,
    pub pool_draws: u32,
    pub pool_losses: u32,
    /// Shown to organizers; ranking uses the position in the category instead.
    pub registered_at: DateTime<Utc>,
}

impl Performer {
    /// Create a regular performer. Counters start at zero, no score.
    pub fn new(dancers: Vec<DancerId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            dancers,
            is_guest: false,
            score: None,
            pool_wins: 0,
            pool_draws: 0,
            pool_losses: 0,
            registered_at: Utc::now(),
        }
    }

    /// Create a guest performer with the score fixed at [`MAX_SCORE`].
    pub fn guest(dancers: Vec<DancerId>) -> Self {
        Self {
            is_guest: true,
            score: Some(MAX_SCORE),
            ..Self::new(dancers)
        }
    }

    /// Score used for ranking; unscored performers rank last.
    pub fn ranking_score(&self) -> f64 {
        self.score.unwrap_or(f64::NEG_INFINITY)
    }

    /// Record a preselection score. Guests keep their fixed score.
    pub fn set_score(&mut self, score: f64) -> EngineResult<()> {
        if self.is_guest {
            return Err(EngineError::InvariantViolation(format!(
                "guest performer {} cannot be scored by a battle",
                self.id
            )));
        }
        self.score = Some(score);
        Ok(())
    }

    /// Accumulated pool points.
    pub fn points(&self) -> u32 {
        self.pool_wins * POINTS_WIN + self.pool_draws * POINTS_DRAW
    }

    pub fn add_win(&mut self) {
        self.pool_wins += 1;
    }

    pub fn add_draw(&mut self) {
        self.pool_draws += 1;
    }

    pub fn add_loss(&mut self) {
        self.pool_losses += 1;
    }
}
