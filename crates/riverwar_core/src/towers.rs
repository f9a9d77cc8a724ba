//! Tower kinds, stat tables, and tower storage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::TileId;
use crate::player::PlayerId;

/// Unique identifier for towers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(pub u32);

/// Tower type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// The home base. Losing it loses the game. Not buildable.
    Castle,
    /// Basic single-target tower.
    Arrow,
    /// Slow, hard-hitting single-target tower.
    Ballista,
    /// Single-target tower that purges lane swarms.
    Cleansing,
    /// Tower that hits every unit in range, friendly included.
    Aoe,
}

/// Per-kind stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Gold cost to build.
    pub gold_cost: i32,
    /// Mana cost to build.
    pub mana_cost: i32,
    /// Maximum health.
    pub health: i32,
    /// Damage per attack.
    pub damage: i32,
    /// Attack range in tiles.
    pub range: u32,
    /// Turns between attacks.
    pub turns_between_attacks: u32,
    /// Whether attacks hit all units in range rather than one.
    pub hits_all: bool,
}

impl TowerKind {
    /// The stat block for this kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Castle => TowerStats {
                gold_cost: 9999,
                mana_cost: 9999,
                health: 100,
                damage: 3,
                range: 3,
                turns_between_attacks: 1,
                hits_all: true,
            },
            Self::Arrow => TowerStats {
                gold_cost: 50,
                mana_cost: 0,
                health: 30,
                damage: 5,
                range: 3,
                turns_between_attacks: 1,
                hits_all: false,
            },
            Self::Ballista => TowerStats {
                gold_cost: 75,
                mana_cost: 0,
                health: 30,
                damage: 20,
                range: 3,
                turns_between_attacks: 3,
                hits_all: false,
            },
            Self::Cleansing => TowerStats {
                gold_cost: 30,
                mana_cost: 30,
                health: 30,
                damage: 5,
                range: 3,
                turns_between_attacks: 1,
                hits_all: false,
            },
            Self::Aoe => TowerStats {
                gold_cost: 40,
                mana_cost: 15,
                health: 30,
                damage: 3,
                range: 3,
                turns_between_attacks: 1,
                hits_all: true,
            },
        }
    }
}

/// A single tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tower {
    /// Unique identifier.
    pub id: TowerId,
    /// Owning player.
    pub owner: PlayerId,
    /// Kind classification.
    pub kind: TowerKind,
    /// The tile this tower stands on.
    pub tile: TileId,
    /// Current health.
    pub health: i32,
}

impl Tower {
    /// Create a freshly built tower at full health.
    #[must_use]
    pub fn built(owner: PlayerId, kind: TowerKind, tile: TileId) -> Self {
        Self {
            id: TowerId(0), // assigned by storage
            owner,
            kind,
            tile,
            health: kind.stats().health,
        }
    }
}

/// Storage for all towers in the snapshot. Sorted ids = creation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TowerStorage {
    towers: HashMap<TowerId, Tower>,
    next_id: u32,
}

impl TowerStorage {
    /// Create empty tower storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            towers: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a new tower and return its assigned id.
    pub fn insert(&mut self, mut tower: Tower) -> TowerId {
        let id = TowerId(self.next_id);
        self.next_id += 1;
        tower.id = id;
        self.towers.insert(id, tower);
        id
    }

    /// Remove a tower by id.
    pub fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.towers.remove(&id)
    }

    /// Get a tower by id.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&Tower> {
        self.towers.get(&id)
    }

    /// Get a mutable reference to a tower by id.
    pub fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.towers.get_mut(&id)
    }

    /// Number of towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.towers.len()
    }

    /// Whether storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }

    /// Tower ids sorted ascending: creation order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<TowerId> {
        let mut ids: Vec<_> = self.towers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
