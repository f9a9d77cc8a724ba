//! Self-play match runner.
//!
//! Drives two agents over the standard map, granting turns
//! alternately. The runner plays the external engine's part: it resets
//! each player's unit budgets when its turn starts, advances the turn
//! clock after both have acted, and stops when a castle falls or the
//! turn limit is reached.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use riverwar_agent::config::{AgentConfig, ConfigError};
use riverwar_agent::controller::Agent;
use riverwar_core::error::GameError;
use riverwar_core::mapgen;
use riverwar_core::player::PlayerId;
use riverwar_core::state::GameState;

/// Error type for match execution.
#[derive(Error, Debug)]
pub enum MatchError {
    /// Agent configuration failed validation.
    #[error("Agent configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The snapshot rejected an order - an agent bug.
    #[error("Game rule violation: {0}")]
    Game(#[from] GameError),
}

/// One player-turn's worth of observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnSummary {
    /// Turn number.
    pub turn: u32,
    /// Acting player.
    pub player: u8,
    /// Orders issued.
    pub orders: usize,
    /// Gold after the turn.
    pub gold: i32,
    /// Mana after the turn.
    pub mana: i32,
    /// Worker head count after the turn.
    pub workers: usize,
    /// Towers standing after the turn (castle included).
    pub towers: usize,
}

/// The outcome of a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Turns fully played.
    pub turns_played: u32,
    /// The winner, if a castle fell.
    pub winner: Option<u8>,
    /// Per-player-turn summaries in play order.
    pub summaries: Vec<TurnSummary>,
}

/// Drives a single self-play match.
pub struct MatchRunner {
    state: GameState,
    agents: [Agent; 2],
    max_turns: u32,
}

impl MatchRunner {
    /// Set up a match on the standard map with the same configuration
    /// for both players.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] if the configuration tables are
    /// malformed, or [`MatchError::Game`] if the map fails to build.
    pub fn new(config: AgentConfig, max_turns: u32) -> Result<Self, MatchError> {
        let state = mapgen::standard_state()?;
        let mut agents = [
            Agent::new(PlayerId::WEST, config.clone()),
            Agent::new(PlayerId::EAST, config),
        ];
        for agent in &mut agents {
            agent.game_start(&state)?;
        }
        Ok(Self {
            state,
            agents,
            max_turns,
        })
    }

    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Play the match to completion.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Game`] if an agent issues an illegal
    /// order.
    pub fn run(mut self) -> Result<MatchReport, MatchError> {
        let mut summaries = Vec::new();
        let mut winner = None;
        let mut turns_played = 0;

        'game: for _ in 0..self.max_turns {
            for index in 0..2 {
                let player = PlayerId(index as u8);
                self.state.begin_turn(player);
                let outcome = self.agents[index].run_turn(&mut self.state)?;

                summaries.push(TurnSummary {
                    turn: self.state.turn(),
                    player: player.0,
                    orders: outcome.actions.len(),
                    gold: self.state.player(player).gold,
                    mana: self.state.player(player).mana,
                    workers: self.state.worker_count(player),
                    towers: self.state.towers_of(player).len(),
                });

                let opponent = player.opponent();
                if self.state.player(opponent).health <= 0 {
                    winner = Some(player.0);
                    turns_played += 1;
                    break 'game;
                }
            }
            self.state.advance_turn();
            turns_played += 1;
        }

        for agent in &mut self.agents {
            agent.game_end();
        }

        tracing::info!(turns_played, ?winner, "match finished");
        Ok(MatchReport {
            turns_played,
            winner,
            summaries,
        })
    }
}
