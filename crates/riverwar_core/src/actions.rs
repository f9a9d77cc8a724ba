//! The order log.
//!
//! Every order applied to the snapshot is recorded here so the caller
//! can forward the turn's decisions to the external engine in the exact
//! order they were made.

use serde::{Deserialize, Serialize};

use crate::grid::TileId;
use crate::player::PlayerId;
use crate::towers::TowerKind;
use crate::units::{UnitId, UnitJob};

/// One issued order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// A unit stepped to an adjacent tile.
    Move {
        /// The moving unit.
        unit: UnitId,
        /// The destination tile.
        to: TileId,
    },
    /// A worker mined the tile it stands on.
    Mine {
        /// The mining worker.
        unit: UnitId,
        /// The mine tile.
        tile: TileId,
    },
    /// A worker fished toward an adjacent river tile.
    Fish {
        /// The fishing worker.
        unit: UnitId,
        /// The river tile fished toward.
        toward: TileId,
    },
    /// A worker built a tower on the tile it stands on.
    Build {
        /// The building worker.
        unit: UnitId,
        /// The tower kind built.
        kind: TowerKind,
        /// The footprint tile.
        tile: TileId,
    },
    /// A fighter attacked the tower on an adjacent tile.
    Attack {
        /// The attacking unit.
        unit: UnitId,
        /// The tile holding the target tower.
        target: TileId,
    },
    /// A worker was spawned at the worker spawn.
    SpawnWorker {
        /// The spawning player.
        player: PlayerId,
        /// The spawn tile.
        tile: TileId,
    },
    /// A combat unit was spawned at the unit spawn.
    SpawnUnit {
        /// The spawning player.
        player: PlayerId,
        /// The job spawned.
        job: UnitJob,
        /// The spawn tile.
        tile: TileId,
    },
}
