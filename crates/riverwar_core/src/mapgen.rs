//! The standard mirrored two-lane map.
//!
//! A 63x32 board split by a three-column river. Each half carries a
//! castle tucked behind the lane, a worker spawn, a four-tile gold mine,
//! and a lane that runs along the top and bottom edges and crosses the
//! river. A five-row lake in the center holds a small island with three
//! richer mine tiles, reachable over one-tile land bridges. The east
//! half is the west half rotated 180 degrees.

use crate::error::Result;
use crate::grid::{Coord, GameMap, Terrain};
use crate::player::PlayerId;
use crate::state::GameState;

/// Standard map width in tiles.
pub const MAP_WIDTH: u16 = 63;
/// Standard map height in tiles.
pub const MAP_HEIGHT: u16 = 32;

/// Build the standard map, terrain and ownership assigned.
///
/// # Errors
///
/// Propagates [`crate::error::GameError::MalformedMap`]; cannot fail for
/// the built-in dimensions.
pub fn standard_map() -> Result<GameMap> {
    let w = usize::from(MAP_WIDTH);
    let h = usize::from(MAP_HEIGHT);
    let mut cells = vec![Terrain::River; w * h];
    let idx = |x: usize, y: usize| y * w + x;

    // West half ground.
    for x in 0..30 {
        for y in 0..h {
            cells[idx(x, y)] = Terrain::Grass;
        }
    }

    // Lane: two rows along the bottom and top, joined on the west edge.
    for x in 0..=31 {
        for y in 0..h {
            let bottom = (y == h - 6 || y == h - 7) && x > 5;
            let top = (y == 6 || y == 5) && x > 15;
            let west_edge = (x == 5 || x == 6) && y > 4 && y < h - 5;
            if bottom || top || west_edge {
                cells[idx(x, y)] = Terrain::Path;
            }
        }
    }
    // Extra lane tiles wrapping the castle corner.
    for y in 5..=7 {
        cells[idx(7, y)] = Terrain::Path;
    }

    cells[idx(6, 6)] = Terrain::Castle;

    // Side gold mine: a 2x2 block.
    for x in 15..=16 {
        for y in (h - 16)..=(h - 15) {
            cells[idx(x, y)] = Terrain::GoldMine;
        }
    }

    cells[idx(8, 9)] = Terrain::WorkerSpawn;
    cells[idx(15, 6)] = Terrain::UnitSpawn;

    // Mirror the west half onto the east, rotating 180 degrees. River is
    // the default and is not copied.
    for x in 0..=31 {
        for y in 0..h {
            let terrain = cells[idx(x, y)];
            if terrain != Terrain::River {
                cells[idx(w - x - 1, h - y - 1)] = terrain;
            }
        }
    }

    // The center lake, its island, the land bridges, and the island mine.
    for x in 29..=33 {
        for y in (h / 2 - 2)..=(h / 2 + 2) {
            cells[idx(x, y)] = Terrain::River;
        }
    }
    for x in 30..=32 {
        for y in (h / 2 - 1)..(h / 2 + 2) {
            cells[idx(x, y)] = Terrain::Grass;
        }
    }
    cells[idx(29, h / 2)] = Terrain::Grass;
    cells[idx(33, h / 2)] = Terrain::Grass;
    for y in (h / 2 - 1)..(h / 2 + 2) {
        cells[idx(31, y)] = Terrain::IslandGoldMine;
    }

    let mut map = GameMap::from_terrain(MAP_WIDTH, MAP_HEIGHT, cells)?;

    // Ownership covers each half's worker-walkable ground; the lane, the
    // river, and the island stay neutral.
    for tile in map.iter_mut() {
        let owned_kind = matches!(
            tile.terrain,
            Terrain::Grass
                | Terrain::GoldMine
                | Terrain::Castle
                | Terrain::WorkerSpawn
                | Terrain::UnitSpawn
        );
        if !owned_kind {
            continue;
        }
        if tile.coord.x < 31 {
            tile.owner = Some(PlayerId::WEST);
        } else if tile.coord.x >= 32 {
            tile.owner = Some(PlayerId::EAST);
        }
    }

    Ok(map)
}

/// Build a game snapshot on the standard map.
///
/// # Errors
///
/// Propagates [`crate::error::GameError::MalformedMap`]; cannot fail for
/// the built-in map.
pub fn standard_state() -> Result<GameState> {
    GameState::from_map(standard_map()?)
}

/// The west castle coordinate on the standard map.
#[must_use]
pub const fn west_castle() -> Coord {
    Coord::new(6, 6)
}

/// The east castle coordinate on the standard map.
#[must_use]
pub const fn east_castle() -> Coord {
    Coord::new(MAP_WIDTH - 7, MAP_HEIGHT - 7)
}
