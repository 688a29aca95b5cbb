//! CSV export of the battle queue for presenters.

use crate::models::{BattleStatus, OutcomeType, Phase, Tournament};
use serde::Serialize;

#[derive(Serialize)]
struct QueueRow<'a> {
    category: &'a str,
    sequence_order: u32,
    phase: Phase,
    status: BattleStatus,
    outcome_type: OutcomeType,
    /// Performer ids separated by `;`.
    participants: String,
}

/// Every battle of the tournament, grouped by category (creation order) and sorted by `sequence_order`.
pub fn queue_csv(tournament: &Tournament) -> csv::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for category in &tournament.categories {
        let mut battles: Vec<_> = category.battles.iter().collect();
        battles.sort_by_key(|b| b.sequence_order);
        for battle in battles {
            wtr.serialize(QueueRow {
                category: &category.name,
                sequence_order: battle.sequence_order,
                phase: battle.phase,
                status: battle.status,
                outcome_type: battle.outcome_type,
                participants: battle
                    .participants
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(";"),
            })?;
        }
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
