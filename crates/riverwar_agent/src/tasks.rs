//! The per-turn resource task loop.
//!
//! Keeps every registered mine and fishing spot occupied and producing.
//! Tiles are serviced in registration order every turn; when workers
//! are scarce the earlier-registered tiles win, and that is the only
//! fairness on offer.

use riverwar_core::error::Result;
use riverwar_core::grid::{Terrain, TileId};
use riverwar_core::player::PlayerId;
use riverwar_core::state::GameState;
use riverwar_core::units::{UnitId, UnitJob};

use crate::config::CohortRange;
use crate::pathfinding::find_path;
use crate::selector::select_worker;

/// The tile sets the agent works, classified once at game start.
#[derive(Debug, Clone, Default)]
pub struct ResourceSets {
    /// Home-half gold mine tiles, in registration (row-major) order.
    pub mines: Vec<TileId>,
    /// Island gold mine tiles.
    pub island_mines: Vec<TileId>,
    /// Riverbank tiles workers fish from.
    pub fishing_spots: Vec<TileId>,
}

/// Scan the map for the tiles a player's economy works: its own gold
/// mines, the island mine, and every owned grass tile touching river.
#[must_use]
pub fn classify(state: &GameState, player: PlayerId) -> ResourceSets {
    let mut sets = ResourceSets::default();
    for tile in state.map().iter() {
        match tile.terrain {
            Terrain::GoldMine if tile.owner == Some(player) => sets.mines.push(tile.id),
            Terrain::IslandGoldMine => sets.island_mines.push(tile.id),
            Terrain::Grass if tile.owner == Some(player) => {
                let riverside = tile.neighbors().into_iter().flatten().any(|n| {
                    state
                        .map()
                        .get(n)
                        .is_some_and(|t| t.terrain == Terrain::River)
                });
                if riverside {
                    sets.fishing_spots.push(tile.id);
                }
            }
            _ => {}
        }
    }
    tracing::debug!(
        player = player.0,
        mines = sets.mines.len(),
        island = sets.island_mines.len(),
        fishing = sets.fishing_spots.len(),
        "resource tiles classified"
    );
    sets
}

/// Advance a unit along a freshly computed route to `goal`, one tile at
/// a time, stopping the moment the allowance hits zero or the next step
/// is blocked. Never skips ahead.
///
/// # Errors
///
/// Propagates order errors from the snapshot.
pub fn advance_along(state: &mut GameState, unit: UnitId, goal: TileId) -> Result<()> {
    let Some(current) = state.unit(unit) else {
        return Ok(());
    };
    let domain = current.job.domain();
    let Some(from) = current.tile else {
        return Ok(());
    };

    let path = find_path(state, domain, from, goal);
    for step in path {
        let Some(current) = state.unit(unit) else {
            return Ok(());
        };
        if current.moves == 0 {
            break;
        }
        let clear = state
            .map()
            .get(step)
            .is_some_and(|t| t.unit.is_none() && t.terrain.passable(domain));
        if !clear {
            break;
        }
        state.move_unit(unit, step)?;
    }
    Ok(())
}

/// Service a set of mine tiles: summon a cohort worker toward each
/// unoccupied mine, and set every worker already standing on one to
/// mining.
///
/// # Errors
///
/// Propagates order errors from the snapshot.
pub fn run_mines(
    state: &mut GameState,
    player: PlayerId,
    tiles: &[TileId],
    cohort: CohortRange,
) -> Result<()> {
    for &mine in tiles {
        if state.map().get(mine).and_then(|t| t.unit).is_none() {
            if let Some(worker) = select_worker(state, player, mine, cohort) {
                advance_along(state, worker, mine)?;
            }
        }
        // Whoever stands on the mine now produces. Acting in the same
        // iteration keeps the worker from being re-summoned to the
        // next tile in the set.
        if let Some(unit) = state.map().get(mine).and_then(|t| t.unit) {
            let ours = state
                .unit(unit)
                .is_some_and(|u| u.owner == player && u.job == UnitJob::Worker && !u.acted);
            if ours {
                state.mine(unit)?;
            }
        }
    }
    Ok(())
}

/// Service the fishing spots: summon cohort workers toward empty spots,
/// and have every worker standing on one fish toward its adjacent
/// river tile (first in N, E, S, W order).
///
/// # Errors
///
/// Propagates order errors from the snapshot.
pub fn run_fishing(
    state: &mut GameState,
    player: PlayerId,
    spots: &[TileId],
    cohort: CohortRange,
) -> Result<()> {
    for &spot in spots {
        if state.map().get(spot).and_then(|t| t.unit).is_none() {
            if let Some(worker) = select_worker(state, player, spot, cohort) {
                advance_along(state, worker, spot)?;
            }
        }
        if let Some(unit) = state.map().get(spot).and_then(|t| t.unit) {
            let ours = state
                .unit(unit)
                .is_some_and(|u| u.owner == player && u.job == UnitJob::Worker && !u.acted);
            if !ours {
                continue;
            }
            let river = state.map().get(spot).and_then(|t| {
                t.neighbors().into_iter().flatten().find(|&n| {
                    state
                        .map()
                        .get(n)
                        .is_some_and(|t| t.terrain == Terrain::River)
                })
            });
            if let Some(river) = river {
                state.fish(unit, river)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use riverwar_core::grid::Coord;
    use riverwar_test_utils::{riverine_state, standard_state, tile_id, worker_at};

    const WEST: PlayerId = PlayerId::WEST;

    #[test]
    fn test_classify_standard_map() {
        let state = standard_state();
        let sets = classify(&state, WEST);
        assert_eq!(sets.mines.len(), 4);
        assert_eq!(sets.island_mines.len(), 3);
        assert!(!sets.fishing_spots.is_empty());

        for &spot in &sets.fishing_spots {
            let tile = state.map().get(spot).unwrap();
            assert_eq!(tile.owner, Some(WEST));
            let touches_river = tile.neighbors().into_iter().flatten().any(|n| {
                state.map().get(n).unwrap().terrain == Terrain::River
            });
            assert!(touches_river);
        }
    }

    #[test]
    fn test_classify_sides_are_disjoint() {
        let state = standard_state();
        let west = classify(&state, WEST);
        let east = classify(&state, PlayerId::EAST);
        assert!(west.mines.iter().all(|m| !east.mines.contains(m)));
        // The island is contested: both register the same tiles.
        assert_eq!(west.island_mines, east.island_mines);
    }

    #[test]
    fn test_advance_along_stops_on_exhaustion() {
        let mut state = riverine_state(20, 4, &[]);
        let worker = worker_at(&mut state, WEST, 0, 1);
        let goal = tile_id(&state, 15, 1);

        advance_along(&mut state, worker, goal).unwrap();
        let at = state.unit(worker).unwrap().tile.unwrap();
        assert_eq!(state.map().get(at).unwrap().coord, Coord::new(8, 1));
        assert_eq!(state.unit(worker).unwrap().moves, 0);
    }

    #[test]
    fn test_run_mines_summons_and_mines_in_one_pass() {
        let mut state = standard_state();
        let sets = classify(&state, WEST);
        // A worker two tiles from the first mine.
        let first_mine = state.map().get(sets.mines[0]).unwrap().coord;
        let worker = worker_at(&mut state, WEST, first_mine.x - 2, first_mine.y);

        let gold_before = state.player(WEST).gold;
        run_mines(&mut state, WEST, &sets.mines, CohortRange::new(0, 3)).unwrap();
        assert_eq!(state.unit(worker).unwrap().tile, Some(sets.mines[0]));
        assert_eq!(state.player(WEST).gold, gold_before + 5);
        assert!(state.unit(worker).unwrap().acted);

        // Next turn it keeps mining in place.
        state.begin_turn(WEST);
        run_mines(&mut state, WEST, &sets.mines, CohortRange::new(0, 3)).unwrap();
        assert_eq!(state.player(WEST).gold, gold_before + 10);
        assert_eq!(state.unit(worker).unwrap().tile, Some(sets.mines[0]));
    }

    #[test]
    fn test_run_mines_earlier_tile_wins_scarce_workers() {
        let mut state = standard_state();
        let sets = classify(&state, WEST);
        let first_mine = state.map().get(sets.mines[0]).unwrap().coord;
        let worker = worker_at(&mut state, WEST, first_mine.x, first_mine.y - 1);

        run_mines(&mut state, WEST, &sets.mines, CohortRange::new(0, 3)).unwrap();
        // The single worker went to the first-registered mine.
        assert_eq!(state.unit(worker).unwrap().tile, Some(sets.mines[0]));
    }

    #[test]
    fn test_run_fishing_produces_mana() {
        let river = [Coord::new(3, 0), Coord::new(3, 1), Coord::new(3, 2)];
        let mut state = riverine_state(7, 3, &river);
        let spot = tile_id(&state, 2, 1);
        let worker = worker_at(&mut state, WEST, 2, 1);

        let mana_before = state.player(WEST).mana;
        run_fishing(&mut state, WEST, &[spot], CohortRange::new(0, 9)).unwrap();
        assert_eq!(state.player(WEST).mana, mana_before + 5);
        assert!(state.unit(worker).unwrap().acted);
    }

    #[test]
    fn test_run_fishing_summons_worker_to_empty_spot() {
        let river = [Coord::new(3, 0), Coord::new(3, 1), Coord::new(3, 2)];
        let mut state = riverine_state(7, 3, &river);
        let spot = tile_id(&state, 2, 1);
        let worker = worker_at(&mut state, WEST, 0, 0);

        run_fishing(&mut state, WEST, &[spot], CohortRange::new(0, 9)).unwrap();
        assert_eq!(state.unit(worker).unwrap().tile, Some(spot));
        // It starts fishing in the same pass.
        assert!(state.unit(worker).unwrap().acted);
    }

    #[test]
    fn test_acted_occupant_is_left_alone() {
        let mut state = standard_state();
        let sets = classify(&state, WEST);
        let mine_coord = state.map().get(sets.mines[0]).unwrap().coord;
        let worker = worker_at(&mut state, WEST, mine_coord.x, mine_coord.y);

        run_mines(&mut state, WEST, &sets.mines, CohortRange::new(0, 3)).unwrap();
        let gold_after_first = state.player(WEST).gold;
        assert!(state.unit(worker).unwrap().acted);

        // A second pass in the same turn must not double-mine.
        run_mines(&mut state, WEST, &sets.mines, CohortRange::new(0, 3)).unwrap();
        assert_eq!(state.player(WEST).gold, gold_after_first);
    }
}
