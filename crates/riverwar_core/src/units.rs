//! Unit jobs, per-job stat tables, and unit storage.
//!
//! The stat table is configuration data mirrored from the game rules,
//! not logic: costs, health, damage, and per-turn movement allowance per
//! job. Units themselves are created and destroyed by the external
//! engine; the snapshot only reads and directs them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::TileId;
use crate::player::PlayerId;

/// Unique identifier for units. Ids are assigned monotonically, so
/// sorted ids equal creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Which tiles a unit may stand on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDomain {
    /// Workers: grass, mines, and the worker spawn. Never the lane.
    Field,
    /// Fighters: the lane and the unit spawn. Never the field.
    Lane,
}

/// Unit job classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitJob {
    /// Economy unit: mines, fishes, builds towers.
    Worker,
    /// Cheap swarm fighter.
    Zombie,
    /// The standard melee raider.
    Ghoul,
    /// Slow heavy fighter.
    Abomination,
    /// Fast light fighter.
    Hound,
    /// Fragile fast fighter.
    Wraith,
    /// Elite fighter.
    Horseman,
}

/// Per-job stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    /// Gold cost to spawn.
    pub gold_cost: i32,
    /// Mana cost to spawn.
    pub mana_cost: i32,
    /// Damage per attack.
    pub damage: i32,
    /// Maximum health.
    pub health: i32,
    /// Movement allowance per turn.
    pub moves: u8,
}

impl UnitJob {
    /// The stat block for this job.
    #[must_use]
    pub const fn stats(self) -> JobStats {
        match self {
            Self::Worker => JobStats {
                gold_cost: 10,
                mana_cost: 0,
                damage: 0,
                health: 1,
                moves: 8,
            },
            Self::Zombie => JobStats {
                gold_cost: 0,
                mana_cost: 2,
                damage: 1,
                health: 5,
                moves: 3,
            },
            Self::Ghoul => JobStats {
                gold_cost: 20,
                mana_cost: 5,
                damage: 5,
                health: 15,
                moves: 3,
            },
            Self::Abomination => JobStats {
                gold_cost: 25,
                mana_cost: 10,
                damage: 10,
                health: 60,
                moves: 1,
            },
            Self::Hound => JobStats {
                gold_cost: 15,
                mana_cost: 4,
                damage: 5,
                health: 5,
                moves: 5,
            },
            Self::Wraith => JobStats {
                gold_cost: 40,
                mana_cost: 20,
                damage: 10,
                health: 10,
                moves: 6,
            },
            Self::Horseman => JobStats {
                gold_cost: 150,
                mana_cost: 50,
                damage: 15,
                health: 75,
                moves: 5,
            },
        }
    }

    /// The movement domain for this job.
    #[must_use]
    pub const fn domain(self) -> MoveDomain {
        match self {
            Self::Worker => MoveDomain::Field,
            _ => MoveDomain::Lane,
        }
    }

    /// Whether this job fights rather than works.
    #[must_use]
    pub const fn is_fighter(self) -> bool {
        !matches!(self, Self::Worker)
    }
}

/// A single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier.
    pub id: UnitId,
    /// Owning player.
    pub owner: PlayerId,
    /// Job classification.
    pub job: UnitJob,
    /// The tile this unit stands on. Back-reference, not ownership.
    pub tile: Option<TileId>,
    /// Movement allowance remaining this turn.
    pub moves: u8,
    /// Whether this unit has spent its action this turn.
    pub acted: bool,
    /// Current health.
    pub health: i32,
}

impl Unit {
    /// Create a freshly spawned unit on a tile, at full allowance.
    #[must_use]
    pub fn spawned(owner: PlayerId, job: UnitJob, tile: TileId) -> Self {
        let stats = job.stats();
        Self {
            id: UnitId(0), // assigned by storage
            owner,
            job,
            tile: Some(tile),
            moves: stats.moves,
            acted: false,
            health: stats.health,
        }
    }

    /// Reset the per-turn budget to the job allowance.
    pub fn refresh(&mut self) {
        self.moves = self.job.stats().moves;
        self.acted = false;
    }
}

/// Storage for all units in the snapshot.
///
/// Uses a `HashMap` for O(1) lookup by id, with deterministic iteration
/// via sorted keys. Because ids increase monotonically, sorted order is
/// creation order - which the worker-ordinal bookkeeping relies on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitStorage {
    units: HashMap<UnitId, Unit>,
    next_id: u32,
}

impl UnitStorage {
    /// Create empty unit storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a new unit and return its assigned id.
    pub fn insert(&mut self, mut unit: Unit) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        unit.id = id;
        self.units.insert(id, unit);
        id
    }

    /// Remove a unit by id.
    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(&id)
    }

    /// Get a unit by id.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Get a mutable reference to a unit by id.
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit ids sorted ascending: creation order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<_> = self.units.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_stats() {
        let stats = UnitJob::Worker.stats();
        assert_eq!(stats.gold_cost, 10);
        assert_eq!(stats.moves, 8);
        assert_eq!(stats.damage, 0);
        assert_eq!(UnitJob::Worker.domain(), MoveDomain::Field);
        assert!(!UnitJob::Worker.is_fighter());
    }

    #[test]
    fn test_ghoul_stats() {
        let stats = UnitJob::Ghoul.stats();
        assert_eq!(stats.gold_cost, 20);
        assert_eq!(stats.mana_cost, 5);
        assert_eq!(stats.moves, 3);
        assert_eq!(UnitJob::Ghoul.domain(), MoveDomain::Lane);
        assert!(UnitJob::Ghoul.is_fighter());
    }

    #[test]
    fn test_storage_ids_are_creation_order() {
        let mut storage = UnitStorage::new();
        let a = storage.insert(Unit::spawned(PlayerId::WEST, UnitJob::Worker, TileId(0)));
        let b = storage.insert(Unit::spawned(PlayerId::WEST, UnitJob::Ghoul, TileId(1)));
        let c = storage.insert(Unit::spawned(PlayerId::EAST, UnitJob::Worker, TileId(2)));
        assert_eq!(storage.sorted_ids(), vec![a, b, c]);
        storage.remove(b);
        assert_eq!(storage.sorted_ids(), vec![a, c]);
    }

    #[test]
    fn test_refresh_restores_budget() {
        let mut unit = Unit::spawned(PlayerId::WEST, UnitJob::Worker, TileId(0));
        unit.moves = 0;
        unit.acted = true;
        unit.refresh();
        assert_eq!(unit.moves, 8);
        assert!(!unit.acted);
    }
}
