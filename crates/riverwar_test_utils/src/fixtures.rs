//! Snapshot fixtures and grid builders.
//!
//! Pre-built game states for consistent testing: bare open grids for
//! algorithm tests, river-cut grids for blocking tests, and the
//! standard two-lane map for integration tests.

use riverwar_core::grid::{Coord, GameMap, Terrain, TileId};
use riverwar_core::mapgen;
use riverwar_core::player::PlayerId;
use riverwar_core::state::GameState;
use riverwar_core::units::{UnitId, UnitJob};

/// A bare snapshot over an all-grass grid. No castles, no landmarks.
#[must_use]
pub fn open_state(width: u16, height: u16) -> GameState {
    GameState::sandbox(GameMap::open(width, height).expect("open grid"))
}

/// A bare snapshot over a grass grid with river at the given
/// coordinates.
#[must_use]
pub fn riverine_state(width: u16, height: u16, river: &[Coord]) -> GameState {
    let mut cells = vec![Terrain::Grass; usize::from(width) * usize::from(height)];
    for coord in river {
        let index = usize::from(coord.y) * usize::from(width) + usize::from(coord.x);
        cells[index] = Terrain::River;
    }
    let map = GameMap::from_terrain(width, height, cells).expect("riverine grid");
    GameState::sandbox(map)
}

/// The standard two-lane map snapshot.
#[must_use]
pub fn standard_state() -> GameState {
    mapgen::standard_state().expect("standard map")
}

/// The tile id at a coordinate. Panics if off-map.
#[must_use]
pub fn tile_id(state: &GameState, x: u16, y: u16) -> TileId {
    state
        .map()
        .id_at(Coord::new(x, y))
        .expect("coordinate on map")
}

/// Place a worker for a player at a coordinate.
#[must_use]
pub fn worker_at(state: &mut GameState, player: PlayerId, x: u16, y: u16) -> UnitId {
    let tile = tile_id(state, x, y);
    state
        .place_unit(player, UnitJob::Worker, tile)
        .expect("tile free for worker")
}
