//! Per-player resources and board landmarks.

use serde::{Deserialize, Serialize};

use crate::grid::TileId;

/// Player identifier. Exactly two players per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The player occupying the western half.
    pub const WEST: Self = Self(0);
    /// The player occupying the eastern half.
    pub const EAST: Self = Self(1);

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Array index for this player.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Starting gold and mana for each player.
pub const STARTING_GOLD: i32 = 100;
/// Starting mana for each player.
pub const STARTING_MANA: i32 = 100;

/// One player's resources and landmarks.
///
/// `health` mirrors the castle tower's health; the game is lost when it
/// reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Gold on hand.
    pub gold: i32,
    /// Mana on hand.
    pub mana: i32,
    /// Castle health remaining.
    pub health: i32,
    /// The castle tile.
    pub home_base: TileId,
    /// The worker spawn tile.
    pub worker_spawn: TileId,
    /// The combat-unit spawn tile.
    pub unit_spawn: TileId,
    /// Every tile on this player's half, in row-major order.
    pub side: Vec<TileId>,
}

impl Player {
    /// Create a player at game-start resource levels.
    #[must_use]
    pub fn new(home_base: TileId, worker_spawn: TileId, unit_spawn: TileId) -> Self {
        Self {
            gold: STARTING_GOLD,
            mana: STARTING_MANA,
            health: 100,
            home_base,
            worker_spawn,
            unit_spawn,
            side: Vec::new(),
        }
    }

    /// Whether this player can cover a gold and mana price.
    #[must_use]
    pub const fn can_afford(&self, gold: i32, mana: i32) -> bool {
        self.gold >= gold && self.mana >= mana
    }
}
