//! Preselection ranking and the cut to pool capacity.

use crate::error::EngineResult;
use crate::logic::capacity::category_capacity;
use crate::models::{Category, Performer, PerformerId, Phase};
use std::cmp::Ordering;

/// Result of cutting the preselection ranking at pool capacity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Qualification {
    /// Performers advancing to pools, best first.
    Decided(Vec<PerformerId>),
    /// Regular performers sharing the boundary score; `winners_needed` of them advance.
    Tied {
        advancing: Vec<PerformerId>,
        tied: Vec<PerformerId>,
        winners_needed: usize,
    },
}

/// Order performers by score (highest first). Among equal scores guests come first,
/// then earlier registration. Registration order is the position in `category.performers`.
pub fn rank(category: &Category) -> Vec<&Performer> {
    let mut ranked: Vec<(usize, &Performer)> = category.performers.iter().enumerate().collect();
    ranked.sort_by(|(ia, a), (ib, b)| compare(a, b).then_with(|| ia.cmp(ib)));
    ranked.into_iter().map(|(_, p)| p).collect()
}

fn compare(a: &Performer, b: &Performer) -> Ordering {
    b.ranking_score()
        .total_cmp(&a.ranking_score())
        .then_with(|| b.is_guest.cmp(&a.is_guest))
}

/// Cut the ranking at the category's pool capacity.
///
/// A tie that straddles the cutoff is settled by guests first; remaining slots go to the
/// winners of a completed preselection tiebreak among exactly the tied regulars, if one exists.
pub fn qualification(category: &Category) -> EngineResult<Qualification> {
    let capacity = category_capacity(category)?.capacity;
    let ranked = rank(category);
    if ranked.len() <= capacity {
        return Ok(Qualification::Decided(ranked.iter().map(|p| p.id).collect()));
    }

    let boundary = ranked[capacity - 1].ranking_score();
    if ranked[capacity].ranking_score() != boundary {
        return Ok(Qualification::Decided(
            ranked[..capacity].iter().map(|p| p.id).collect(),
        ));
    }

    let mut advancing: Vec<PerformerId> = ranked
        .iter()
        .take_while(|p| p.ranking_score() > boundary)
        .map(|p| p.id)
        .collect();
    let remaining = capacity - advancing.len();
    let (tied_guests, tied_regulars): (Vec<&Performer>, Vec<&Performer>) = ranked
        .iter()
        .copied()
        .filter(|p| p.ranking_score() == boundary)
        .partition(|p| p.is_guest);

    if tied_guests.len() >= remaining {
        advancing.extend(tied_guests.iter().take(remaining).map(|p| p.id));
        return Ok(Qualification::Decided(advancing));
    }
    advancing.extend(tied_guests.iter().map(|p| p.id));
    let winners_needed = remaining - tied_guests.len();
    let tied: Vec<PerformerId> = tied_regulars.iter().map(|p| p.id).collect();

    let resolved = category
        .battles_in(Phase::Preselection)
        .filter(|b| b.is_tiebreak() && b.is_completed() && b.same_participants(&tied))
        .map(|b| b.winners())
        .find(|winners| winners.len() == winners_needed);
    match resolved {
        Some(winners) => {
            advancing.extend(winners);
            Ok(Qualification::Decided(advancing))
        }
        None => Ok(Qualification::Tied {
            advancing,
            tied,
            winners_needed,
        }),
    }
}
