//! # Riverwar Headless
//!
//! Self-play match runner. Stands in for the external game engine:
//! builds the standard map, grants each player its turn, resets unit
//! budgets, and drains each agent's order log - with no rendering and
//! no network.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod runner;

pub use runner::{MatchError, MatchReport, MatchRunner, TurnSummary};
