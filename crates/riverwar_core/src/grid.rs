//! Tile grid, terrain classification, and adjacency.
//!
//! The grid is fixed for the lifetime of a game: tile identities,
//! coordinates, terrain, and the 4-orthogonal neighbor sets never change
//! after construction. Occupancy and tower references are the only
//! mutable tile fields, and they change only through
//! [`GameState`](crate::state::GameState) order application.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::player::PlayerId;
use crate::towers::TowerId;
use crate::units::{MoveDomain, UnitId};

/// A grid coordinate. Origin is the top-left corner; `y` grows south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Column index.
    pub x: u16,
    /// Row index.
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }
}

/// Unique identifier for tiles: the row-major index into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// The four orthogonal directions, in the fixed expansion order used
/// everywhere adjacency is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward smaller `y`.
    North,
    /// Toward larger `x`.
    East,
    /// Toward larger `y`.
    South,
    /// Toward smaller `x`.
    West,
}

impl Direction {
    /// All directions in fixed N, E, S, W order.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The neighbor-array slot for this direction.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Terrain classification for tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground workers may walk and build on.
    #[default]
    Grass,
    /// The lane attackers march down. Workers are not allowed on it.
    Path,
    /// Impassable water. Workers fish from adjacent tiles.
    River,
    /// A gold mine on a player's half.
    GoldMine,
    /// A gold mine on the contested mid-river island; richer per turn.
    IslandGoldMine,
    /// A castle footprint tile.
    Castle,
    /// The tile workers spawn on.
    WorkerSpawn,
    /// The tile combat units spawn on.
    UnitSpawn,
}

impl Terrain {
    /// Whether a unit of the given movement domain may stand here.
    ///
    /// The river is impassable for everyone. Field units (workers) roam
    /// grass, mines, and their spawn; lane units (fighters) keep to the
    /// path and their spawn.
    #[must_use]
    pub const fn passable(self, domain: MoveDomain) -> bool {
        match domain {
            MoveDomain::Field => matches!(
                self,
                Self::Grass | Self::GoldMine | Self::IslandGoldMine | Self::WorkerSpawn
            ),
            MoveDomain::Lane => matches!(self, Self::Path | Self::UnitSpawn),
        }
    }

    /// Whether a tower may be erected here (bare grass only).
    #[must_use]
    pub const fn buildable(self) -> bool {
        matches!(self, Self::Grass)
    }
}

/// A single grid tile.
///
/// Occupancy and tower reference are mutually exclusive in practice but
/// the tile only reports them; the rules enforcing that live in order
/// application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Identity: the row-major grid index.
    pub id: TileId,
    /// Grid coordinate.
    pub coord: Coord,
    /// Terrain classification.
    pub terrain: Terrain,
    /// The unit standing here, if any. Non-owning.
    pub unit: Option<UnitId>,
    /// The tower standing here, if any.
    pub tower: Option<TowerId>,
    /// The player whose half this tile belongs to, if either.
    pub owner: Option<PlayerId>,
    /// Orthogonal neighbors in N, E, S, W order. Fixed after map build.
    pub(crate) neighbors: [Option<TileId>; 4],
}

impl Tile {
    /// Orthogonal neighbors in fixed N, E, S, W order.
    #[must_use]
    pub const fn neighbors(&self) -> [Option<TileId>; 4] {
        self.neighbors
    }

    /// The neighbor in a specific direction.
    #[must_use]
    pub const fn neighbor(&self, dir: Direction) -> Option<TileId> {
        self.neighbors[dir.index()]
    }
}

/// The fixed tile grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    width: u16,
    height: u16,
    tiles: Vec<Tile>,
}

impl GameMap {
    /// Build a map from a row-major terrain layout.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MalformedMap`] if the layout length does not
    /// match `width * height` or either dimension is zero.
    pub fn from_terrain(width: u16, height: u16, terrain: Vec<Terrain>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::MalformedMap(
                "map dimensions must be positive".into(),
            ));
        }
        let expected = usize::from(width) * usize::from(height);
        if terrain.len() != expected {
            return Err(GameError::MalformedMap(format!(
                "terrain layout has {} tiles, expected {expected}",
                terrain.len()
            )));
        }

        let tiles = terrain
            .into_iter()
            .enumerate()
            .map(|(i, terrain)| {
                let coord = Coord::new(
                    (i % usize::from(width)) as u16,
                    (i / usize::from(width)) as u16,
                );
                Tile {
                    id: TileId(i as u32),
                    coord,
                    terrain,
                    unit: None,
                    tower: None,
                    owner: None,
                    neighbors: neighbor_array(width, height, coord),
                }
            })
            .collect();

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Build an all-grass map.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MalformedMap`] if either dimension is zero.
    pub fn open(width: u16, height: u16) -> Result<Self> {
        let count = usize::from(width) * usize::from(height);
        Self::from_terrain(width, height, vec![Terrain::Grass; count])
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total tile count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the map has no tiles. Never true for a constructed map.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether a coordinate lies on the map.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// The tile id at a coordinate, if on the map.
    #[must_use]
    pub fn id_at(&self, coord: Coord) -> Option<TileId> {
        self.in_bounds(coord)
            .then(|| TileId(u32::from(coord.y) * u32::from(self.width) + u32::from(coord.x)))
    }

    /// Tile lookup by id.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0 as usize)
    }

    /// Tile lookup by coordinate.
    #[must_use]
    pub fn at(&self, coord: Coord) -> Option<&Tile> {
        self.id_at(coord).and_then(|id| self.get(id))
    }

    /// Mutable tile lookup by id.
    pub(crate) fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.0 as usize)
    }

    /// Whether two tiles are orthogonal neighbors.
    #[must_use]
    pub fn adjacent(&self, a: TileId, b: TileId) -> bool {
        self.get(a)
            .is_some_and(|tile| tile.neighbors().into_iter().flatten().any(|n| n == b))
    }

    /// Iterate all tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterate all tiles mutably, for map setup only.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }
}

/// Compute the N, E, S, W neighbor ids for a coordinate.
fn neighbor_array(width: u16, height: u16, coord: Coord) -> [Option<TileId>; 4] {
    let id = |x: u16, y: u16| TileId(u32::from(y) * u32::from(width) + u32::from(x));
    [
        (coord.y > 0).then(|| id(coord.x, coord.y - 1)),
        (coord.x + 1 < width).then(|| id(coord.x + 1, coord.y)),
        (coord.y + 1 < height).then(|| id(coord.x, coord.y + 1)),
        (coord.x > 0).then(|| id(coord.x - 1, coord.y)),
    ]
}
