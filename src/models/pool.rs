//! Pool: a fixed-size round-robin group inside a category.

use crate::models::performer::PerformerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PoolId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    /// Members in seeding order.
    pub performers: Vec<PerformerId>,
    /// Set once a clear leader emerges.
    pub winner: Option<PerformerId>,
}

impl Pool {
    pub fn new(performers: Vec<PerformerId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            performers,
            winner: None,
        }
    }

    pub fn contains(&self, performer: PerformerId) -> bool {
        self.performers.contains(&performer)
    }
}
