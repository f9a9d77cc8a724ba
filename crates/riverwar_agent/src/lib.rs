//! # Riverwar Agent
//!
//! The turn-based decision engine. Every turn the agent reads the
//! [`GameState`](riverwar_core::state::GameState) snapshot, decides
//! which workers mine, fish, and build, which fighters are produced and
//! routed, and issues those orders against the snapshot under each
//! unit's per-turn budget. One decision pass per turn; the pass ends by
//! signalling end-of-turn.
//!
//! The two load-bearing subsystems are the breadth-first
//! [`pathfinding`] engine and the cohort-indexed scheduling spread over
//! [`selector`], [`cohorts`], [`tasks`], and [`construction`]. The
//! [`controller`] sequences them; [`config`] holds the scripted tables
//! they are driven by.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod cohorts;
pub mod config;
pub mod construction;
pub mod controller;
pub mod pathfinding;
pub mod selector;
pub mod tasks;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cohorts::BoardSide;
    pub use crate::config::{AgentConfig, CohortRange, ConfigError};
    pub use crate::controller::{Agent, Phase, TurnOutcome};
    pub use crate::pathfinding::find_path;
    pub use crate::selector::select_worker;
}
