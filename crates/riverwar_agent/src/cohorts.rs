//! Board-side mirroring and the cohort router.
//!
//! The board is mirrored by a 180-degree rotation, so the single
//! side switch computed at game start flips every scripted direction
//! to its opposite for the east player. All routing symmetry flows
//! through that one switch.

use riverwar_core::error::Result;
use riverwar_core::grid::{Coord, Direction, TileId};
use riverwar_core::state::GameState;
use riverwar_core::units::UnitId;

use crate::config::{AgentConfig, Leg};

/// Which half of the board the agent plays from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardSide {
    /// The left half; scripted directions apply as written.
    #[default]
    West,
    /// The right half; every scripted direction is flipped.
    East,
}

impl BoardSide {
    /// Classify a side from the home-base tile's x coordinate.
    #[must_use]
    pub fn from_home(state: &GameState, home: TileId) -> Self {
        let map = state.map();
        match map.get(home) {
            Some(tile) if u32::from(tile.coord.x) * 2 < u32::from(map.width()) => Self::West,
            _ => Self::East,
        }
    }

    /// Orient a west-frame scripted direction for this side.
    #[must_use]
    pub const fn orient(self, dir: Direction) -> Direction {
        match self {
            Self::West => dir,
            Self::East => dir.opposite(),
        }
    }

    /// Reflect a west-frame coordinate onto this side's half.
    #[must_use]
    pub const fn reflect(self, coord: Coord, width: u16, height: u16) -> Coord {
        match self {
            Self::West => coord,
            Self::East => Coord::new(width - 1 - coord.x, height - 1 - coord.y),
        }
    }
}

/// Walk a unit through scripted legs, one tile at a time.
///
/// Stops silently when the unit's allowance runs out, the next tile is
/// off-map, occupied, or impassable. The script is best-effort; there
/// is no retry.
///
/// # Errors
///
/// Propagates order errors from the snapshot; with the checks above
/// these do not occur in normal play.
pub fn walk_legs(
    state: &mut GameState,
    side: BoardSide,
    unit: UnitId,
    legs: &[Leg],
) -> Result<()> {
    for leg in legs {
        let dir = side.orient(leg.dir);
        for _ in 0..leg.steps {
            let Some(current) = state.unit(unit) else {
                return Ok(());
            };
            if current.moves == 0 {
                return Ok(());
            }
            let domain = current.job.domain();
            let Some(here) = current.tile else {
                return Ok(());
            };
            let Some(next) = state.map().get(here).and_then(|t| t.neighbor(dir)) else {
                return Ok(());
            };
            let clear = state
                .map()
                .get(next)
                .is_some_and(|t| t.unit.is_none() && t.terrain.passable(domain));
            if !clear {
                return Ok(());
            }
            state.move_unit(unit, next)?;
        }
    }
    Ok(())
}

/// Route a freshly spawned worker along its cohort's waypoint script.
///
/// Ordinals beyond the cohort table leave the worker unscripted; the
/// task loops will put it to work from the spawn tile.
///
/// # Errors
///
/// Propagates order errors from the snapshot.
pub fn route_spawned(
    state: &mut GameState,
    config: &AgentConfig,
    side: BoardSide,
    ordinal: u32,
    unit: UnitId,
) -> Result<()> {
    let Some(spec) = config.cohort_for(ordinal) else {
        tracing::trace!(ordinal, "spawn ordinal beyond cohort table");
        return Ok(());
    };
    let route = spec.route.clone();
    tracing::trace!(ordinal, role = ?spec.role, "routing spawned worker");
    walk_legs(state, side, unit, &route)
}
