//! Cohort-gated worker selection.

use riverwar_core::grid::TileId;
use riverwar_core::player::PlayerId;
use riverwar_core::state::GameState;
use riverwar_core::units::{MoveDomain, UnitId, UnitJob};

use crate::config::CohortRange;
use crate::pathfinding::find_path;

/// Find the best eligible worker to send to `target`.
///
/// Workers are walked in creation order, counting ordinals as they are
/// encountered. A worker already standing on `target` is an immediate
/// match. Otherwise a worker qualifies only if its ordinal falls inside
/// `cohort`, it has not acted this turn, and it has movement left;
/// among qualifiers the one with the shortest route wins, first found
/// on ties.
///
/// `None` means no worker qualifies this turn - the caller retries next
/// turn, it is not a failure.
#[must_use]
pub fn select_worker(
    state: &GameState,
    player: PlayerId,
    target: TileId,
    cohort: CohortRange,
) -> Option<UnitId> {
    let mut ordinal: u32 = 0;
    let mut best: Option<(usize, UnitId)> = None;

    for id in state.units_of(player) {
        let Some(unit) = state.unit(id) else {
            continue;
        };
        if unit.job != UnitJob::Worker {
            continue;
        }
        let my_ordinal = ordinal;
        ordinal += 1;

        if unit.tile == Some(target) {
            return Some(id);
        }
        if !cohort.contains(my_ordinal) {
            continue;
        }
        if unit.acted || unit.moves == 0 {
            continue;
        }
        let Some(from) = unit.tile else {
            continue;
        };

        let path = find_path(state, MoveDomain::Field, from, target);
        if path.is_empty() {
            continue;
        }
        if best.map_or(true, |(len, _)| path.len() < len) {
            best = Some((path.len(), id));
        }
    }

    best.map(|(_, id)| id)
}
