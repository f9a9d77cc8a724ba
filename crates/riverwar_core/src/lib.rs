//! # Riverwar Core
//!
//! Deterministic turn-state model for the two-lane tower war.
//!
//! This crate contains **only** the in-memory snapshot an agent reasons
//! over and the rules for applying orders to it:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No network/session handling
//!
//! The external game engine owns unit lifetimes and turn notifications;
//! this crate mirrors its state for one turn at a time. Orders issued
//! against the snapshot are applied immediately (so later queries in the
//! same turn observe them) and recorded in an action log the caller
//! drains at end of turn.
//!
//! ## Crate Structure
//!
//! - [`grid`] - Tile grid, terrain, adjacency
//! - [`units`] - Unit jobs, stats, storage
//! - [`towers`] - Tower kinds, stats, storage
//! - [`player`] - Per-player resources and landmarks
//! - [`actions`] - The order log entries
//! - [`state`] - The turn snapshot and order application rules
//! - [`mapgen`] - The standard mirrored two-lane map

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod actions;
pub mod error;
pub mod grid;
pub mod mapgen;
pub mod player;
pub mod state;
pub mod towers;
pub mod units;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::actions::Action;
    pub use crate::error::{GameError, Result};
    pub use crate::grid::{Coord, Direction, GameMap, Terrain, Tile, TileId};
    pub use crate::player::{Player, PlayerId};
    pub use crate::state::GameState;
    pub use crate::towers::{Tower, TowerId, TowerKind};
    pub use crate::units::{MoveDomain, Unit, UnitId, UnitJob};
}
