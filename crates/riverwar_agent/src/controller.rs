//! The per-turn phase controller.
//!
//! One decision pass per turn, in a fixed order: worker spawning (with
//! cohort routing), the river-turn spawn burst, resource tasking,
//! construction, and - once the game plan reaches the assault - fighter
//! production and the push on the enemy castle. The pass ends by
//! signalling end-of-turn; it never re-enters itself mid-turn.
//!
//! All bookkeeping that drives the pass (spawn ordinals, the build
//! rotation, classified tile sets, the board side) lives in explicit
//! fields here, so a turn is a deterministic function of the snapshot
//! plus this state.

use riverwar_core::actions::Action;
use riverwar_core::error::{GameError, Result};
use riverwar_core::grid::TileId;
use riverwar_core::player::PlayerId;
use riverwar_core::state::GameState;
use riverwar_core::units::UnitId;

use crate::cohorts::{route_spawned, walk_legs, BoardSide};
use crate::config::{AgentConfig, ConfigError};
use crate::construction::BuildDirector;
use crate::tasks::{advance_along, classify, run_fishing, run_mines, ResourceSets};

/// The coarse game plan: economy first, then the tower wall, then the
/// push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Pure economy: spawn and park workers, no construction.
    Buildup,
    /// Economy plus defense construction.
    Fortify,
    /// Everything above plus fighter production and the advance.
    Assault,
}

/// The result of one decision pass.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Every order issued this turn, in issue order.
    pub actions: Vec<Action>,
    /// Whether the agent is done with the turn. Always true: one pass
    /// per turn.
    pub end_turn: bool,
}

/// The agent: configuration plus all mutable cross-turn bookkeeping.
#[derive(Debug)]
pub struct Agent {
    player: PlayerId,
    config: AgentConfig,
    side: BoardSide,
    sets: ResourceSets,
    director: BuildDirector,
    spawned: u32,
    last_burst_turn: Option<u32>,
    known_towers: usize,
    started: bool,
}

impl Agent {
    /// Create an agent for a player with the given configuration.
    #[must_use]
    pub fn new(player: PlayerId, config: AgentConfig) -> Self {
        Self {
            player,
            config,
            side: BoardSide::West,
            sets: ResourceSets::default(),
            director: BuildDirector::new(),
            spawned: 0,
            last_burst_turn: None,
            known_towers: 0,
            started: false,
        }
    }

    /// The player this agent controls.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// The side switch computed at game start.
    #[must_use]
    pub const fn side(&self) -> BoardSide {
        self.side
    }

    /// The construction bookkeeping.
    #[must_use]
    pub const fn director(&self) -> &BuildDirector {
        &self.director
    }

    /// Workers spawned so far (the next spawn ordinal).
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }

    /// One-time setup: validate the scripted tables, compute the board
    /// side from the home base, and classify the resource tile sets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a scripted table is malformed. Setup
    /// halts; nothing is recovered mid-turn.
    pub fn game_start(&mut self, state: &GameState) -> std::result::Result<(), ConfigError> {
        self.config.validate()?;
        let home = state.player(self.player).home_base;
        self.side = BoardSide::from_home(state, home);
        self.sets = classify(state, self.player);
        self.known_towers = state.towers_of(self.player).len();
        self.started = true;
        tracing::info!(
            player = self.player.0,
            side = ?self.side,
            mines = self.sets.mines.len(),
            fishing = self.sets.fishing_spots.len(),
            "agent ready"
        );
        Ok(())
    }

    /// One-time teardown.
    pub fn game_end(&mut self) {
        tracing::info!(
            player = self.player.0,
            workers_spawned = self.spawned,
            towers_built = self.director.built(),
            "agent done"
        );
    }

    /// The game plan phase for a turn number.
    #[must_use]
    pub fn phase_for(&self, turn: u32) -> Phase {
        if turn < self.config.fortify_turn {
            Phase::Buildup
        } else if turn < self.config.assault_turn {
            Phase::Fortify
        } else {
            Phase::Assault
        }
    }

    /// Run one decision pass against the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalOrder`] if called before
    /// [`game_start`](Self::game_start); otherwise propagates order
    /// errors, which indicate inconsistent external state rather than
    /// normal play.
    pub fn run_turn(&mut self, state: &mut GameState) -> Result<TurnOutcome> {
        if !self.started {
            return Err(GameError::IllegalOrder(
                "run_turn called before game_start".into(),
            ));
        }

        self.note_tower_losses(state);
        self.spawn_phase(state)?;
        self.burst_phase(state)?;
        self.resource_phase(state)?;
        self.build_phase(state)?;
        self.assault_phase(state)?;

        let actions = state.take_actions();
        tracing::debug!(
            turn = state.turn(),
            player = self.player.0,
            phase = ?self.phase_for(state.turn()),
            orders = actions.len(),
            "turn complete"
        );
        Ok(TurnOutcome {
            actions,
            end_turn: true,
        })
    }

    /// Log tower losses since the last pass. Destroyed sites re-enter
    /// the candidate rotation by themselves because the scripted lists
    /// are immutable.
    fn note_tower_losses(&mut self, state: &GameState) {
        let current = state.towers_of(self.player).len();
        if current < self.known_towers {
            tracing::warn!(
                player = self.player.0,
                lost = self.known_towers - current,
                "towers lost since last turn"
            );
        }
        self.known_towers = current;
    }

    /// Phase 1: spawn workers up to the target head count while gold
    /// lasts and the spawn tile is free, routing each new spawn through
    /// its cohort script. A blocked spawn tile simply ends the phase.
    fn spawn_phase(&mut self, state: &mut GameState) -> Result<()> {
        while (state.worker_count(self.player) as u32) < self.config.worker_target
            && state.can_spawn_worker(self.player)
        {
            let unit = state.spawn_worker(self.player)?;
            let ordinal = self.spawned;
            self.spawned += 1;
            route_spawned(state, &self.config, self.side, ordinal, unit)?;
        }
        Ok(())
    }

    /// Phase 2: on river trigger turns, spawn a short burst of extra
    /// workers routed toward the river bank. One shot per trigger turn,
    /// independent of the steady-state loop.
    fn burst_phase(&mut self, state: &mut GameState) -> Result<()> {
        let interval = state.river_phase_interval();
        let turn = state.turn();
        if (turn + self.config.river_burst_offset) % interval != 0 {
            return Ok(());
        }
        if self.last_burst_turn == Some(turn) {
            return Ok(());
        }
        self.last_burst_turn = Some(turn);

        tracing::debug!(turn, player = self.player.0, "river burst");
        for _ in 0..self.config.river_burst {
            if !state.can_spawn_worker(self.player) {
                break;
            }
            let unit = state.spawn_worker(self.player)?;
            self.spawned += 1;
            walk_legs(state, self.side, unit, &self.config.river_burst_route)?;
        }
        Ok(())
    }

    /// Phase 3: keep mines, the island, and the fishing line staffed
    /// and producing. The island cohort widens once the worker pool is
    /// large enough.
    fn resource_phase(&mut self, state: &mut GameState) -> Result<()> {
        run_mines(state, self.player, &self.sets.mines, self.config.inland_cohort)?;

        let workers = state.worker_count(self.player) as u32;
        let island = if workers > self.config.island_widen_threshold {
            self.config.island_cohort_wide
        } else {
            self.config.island_cohort
        };
        run_mines(state, self.player, &self.sets.island_mines, island)?;

        run_fishing(
            state,
            self.player,
            &self.sets.fishing_spots,
            self.config.fisher_cohort,
        )?;
        Ok(())
    }

    /// Phase 4: service every build plan, each capped per turn.
    fn build_phase(&mut self, state: &mut GameState) -> Result<()> {
        if self.phase_for(state.turn()) == Phase::Buildup {
            return Ok(());
        }
        for plan in &self.config.build_plans {
            self.director
                .run_plan(state, self.player, self.side, &self.config, plan)?;
        }
        Ok(())
    }

    /// Phase 5: in the assault, produce fighters while the resource
    /// floors hold, push every fighter one step at a time toward the
    /// enemy castle, and attack any adjacent enemy tower.
    fn assault_phase(&mut self, state: &mut GameState) -> Result<()> {
        if self.phase_for(state.turn()) != Phase::Assault {
            return Ok(());
        }

        self.produce_fighters(state)?;

        let enemy_home = state.player(self.player.opponent()).home_base;
        for id in state.units_of(self.player) {
            let is_fighter = state.unit(id).is_some_and(|u| u.job.is_fighter());
            if !is_fighter {
                continue;
            }
            let has_moves = state.unit(id).is_some_and(|u| u.moves > 0);
            if has_moves {
                advance_along(state, id, enemy_home)?;
            }
            let can_act = state.unit(id).is_some_and(|u| !u.acted);
            if can_act {
                if let Some(target) = self.adjacent_enemy_tower(state, id) {
                    state.attack(id, target)?;
                }
            }
        }

        // The first fighter's own advance usually frees the spawn tile.
        self.produce_fighters(state)?;
        Ok(())
    }

    /// Spawn assault fighters while the gold/mana floors hold and the
    /// spawn tile is free.
    fn produce_fighters(&mut self, state: &mut GameState) -> Result<()> {
        while state.player(self.player).gold >= self.config.assault_min_gold
            && state.player(self.player).mana >= self.config.assault_min_mana
            && state.can_spawn_unit(self.player, self.config.assault_job)
        {
            state.spawn_unit(self.player, self.config.assault_job)?;
        }
        Ok(())
    }

    /// The first adjacent tile holding an enemy tower, in N, E, S, W
    /// order.
    fn adjacent_enemy_tower(&self, state: &GameState, id: UnitId) -> Option<TileId> {
        let unit = state.unit(id)?;
        let here = unit.tile?;
        state
            .map()
            .get(here)?
            .neighbors()
            .into_iter()
            .flatten()
            .find(|&n| {
                state
                    .map()
                    .get(n)
                    .and_then(|t| t.tower)
                    .and_then(|tid| state.tower(tid))
                    .is_some_and(|t| t.owner != unit.owner)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riverwar_core::units::UnitJob;
    use riverwar_test_utils::standard_state;

    fn started_agent(state: &GameState, player: PlayerId) -> Agent {
        let mut agent = Agent::new(player, AgentConfig::default());
        agent.game_start(state).unwrap();
        agent
    }

    #[test]
    fn test_run_turn_before_start_is_rejected() {
        let mut state = standard_state();
        let mut agent = Agent::new(PlayerId::WEST, AgentConfig::default());
        assert!(agent.run_turn(&mut state).is_err());
    }

    #[test]
    fn test_phase_progression() {
        let state = standard_state();
        let agent = started_agent(&state, PlayerId::WEST);
        assert_eq!(agent.phase_for(1), Phase::Buildup);
        assert_eq!(agent.phase_for(9), Phase::Buildup);
        assert_eq!(agent.phase_for(10), Phase::Fortify);
        assert_eq!(agent.phase_for(49), Phase::Fortify);
        assert_eq!(agent.phase_for(50), Phase::Assault);
    }

    #[test]
    fn test_first_turn_spends_gold_on_workers() {
        let mut state = standard_state();
        let mut agent = started_agent(&state, PlayerId::WEST);

        let outcome = agent.run_turn(&mut state).unwrap();
        assert!(outcome.end_turn);
        // 100 starting gold buys 10 workers; routing clears the spawn
        // tile each time.
        assert_eq!(state.worker_count(PlayerId::WEST), 10);
        assert_eq!(state.player(PlayerId::WEST).gold, 0);
        assert_eq!(agent.spawned(), 10);
        assert!(outcome
            .actions
            .iter()
            .any(|a| matches!(a, Action::SpawnWorker { .. })));
    }

    #[test]
    fn test_blocked_spawn_tile_ends_spawning_cleanly() {
        let mut state = standard_state();
        let mut agent = started_agent(&state, PlayerId::WEST);

        // Park a foreign worker on our spawn tile.
        let spawn = state.player(PlayerId::WEST).worker_spawn;
        let _blocker = state
            .place_unit(PlayerId::EAST, UnitJob::Worker, spawn)
            .unwrap();

        let outcome = agent.run_turn(&mut state).unwrap();
        assert!(outcome.end_turn);
        assert_eq!(state.worker_count(PlayerId::WEST), 0);
        assert_eq!(state.player(PlayerId::WEST).gold, 100);
    }

    #[test]
    fn test_economy_accrues_over_turns() {
        let mut state = standard_state();
        let mut agent = started_agent(&state, PlayerId::WEST);

        for _ in 0..10 {
            state.begin_turn(PlayerId::WEST);
            agent.run_turn(&mut state).unwrap();
            state.advance_turn();
        }

        // Miners must have reached the mines and produced.
        assert!(state.player(PlayerId::WEST).gold > 0);
        // Fishers must have reached the bank and produced mana beyond
        // the starting 100.
        assert!(state.player(PlayerId::WEST).mana > 100);
    }

    #[test]
    fn test_fortify_phase_builds_towers() {
        let mut state = standard_state();
        let mut agent = started_agent(&state, PlayerId::WEST);

        for _ in 0..30 {
            state.begin_turn(PlayerId::WEST);
            agent.run_turn(&mut state).unwrap();
            state.advance_turn();
        }

        assert!(agent.director().built() > 0);
        // Rotation invariant: over the first four builds, cleansing
        // leads aoe.
        assert!(agent.director().cleansing_built() >= agent.director().aoe_built());
    }

    #[test]
    fn test_river_burst_fires_on_trigger_turn() {
        let mut state = standard_state();
        let mut agent = started_agent(&state, PlayerId::WEST);
        // Fast-forward the clock to just before the trigger: turn 23
        // with interval 25 and offset 2.
        while state.turn() < 23 {
            state.advance_turn();
        }
        state.grant_resources(PlayerId::WEST, 30, 100);
        // Lower the steady-state target so only the burst spawns.
        agent.config.worker_target = 0;

        agent.run_turn(&mut state).unwrap();
        assert_eq!(state.worker_count(PlayerId::WEST), 3);
    }

    #[test]
    fn test_assault_produces_and_advances_fighters() {
        let mut state = standard_state();
        let mut agent = started_agent(&state, PlayerId::WEST);
        agent.config.worker_target = 0;
        agent.config.fortify_turn = 1;
        agent.config.assault_turn = 1;

        state.grant_resources(PlayerId::WEST, 100, 100);
        agent.run_turn(&mut state).unwrap();

        let fighters: Vec<_> = state
            .units_of(PlayerId::WEST)
            .into_iter()
            .filter(|&id| state.unit(id).unwrap().job.is_fighter())
            .collect();
        assert!(!fighters.is_empty());
        // The first fighter left the spawn tile.
        let spawn = state.player(PlayerId::WEST).unit_spawn;
        let first = fighters[0];
        assert_ne!(state.unit(first).unwrap().tile, Some(spawn));
    }
}
