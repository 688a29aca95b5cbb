//! Persistence contract and an in-memory store.

use crate::error::{EngineError, EngineResult};
use crate::logic::advance;
use crate::models::{Phase, Status, Tournament, TournamentId};
use std::collections::HashMap;

/// Load/save access to tournaments, keyed by id.
pub trait TournamentStore {
    fn load(&self, id: TournamentId) -> Option<Tournament>;
    fn save(&mut self, tournament: Tournament);
    fn list(&self) -> Vec<TournamentId>;
    /// The tournament currently Active, if any.
    fn active_tournament(&self) -> Option<TournamentId>;
}

/// Tournaments kept in a map. Entries are never removed.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    tournaments: HashMap<TournamentId, Tournament>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournaments.get(&id)
    }

    pub fn get_mut(&mut self, id: TournamentId) -> Option<&mut Tournament> {
        self.tournaments.get_mut(&id)
    }
}

impl TournamentStore for InMemoryStore {
    fn load(&self, id: TournamentId) -> Option<Tournament> {
        self.tournaments.get(&id).cloned()
    }

    fn save(&mut self, tournament: Tournament) {
        self.tournaments.insert(tournament.id, tournament);
    }

    fn list(&self) -> Vec<TournamentId> {
        let mut tournaments: Vec<&Tournament> = self.tournaments.values().collect();
        tournaments.sort_by_key(|t| t.created_at);
        tournaments.into_iter().map(|t| t.id).collect()
    }

    fn active_tournament(&self) -> Option<TournamentId> {
        self.tournaments
            .values()
            .find(|t| t.status == Status::Active)
            .map(|t| t.id)
    }
}

/// Load a tournament, advance it and save it back, checking the single-active rule
/// against every other stored tournament.
pub fn advance_stored<S: TournamentStore + ?Sized>(store: &mut S, id: TournamentId) -> EngineResult<Phase> {
    let mut tournament = store.load(id).ok_or(EngineError::TournamentNotFound(id))?;
    let active = store.active_tournament().filter(|&other| other != id);
    let phase = advance(&mut tournament, active)?;
    store.save(tournament);
    Ok(phase)
}
