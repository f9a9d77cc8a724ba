//! The construction director.
//!
//! Cycles through scripted per-quadrant build-target lists, summoning a
//! quadrant's builder cohort to each empty footprint and erecting
//! towers under a rotating type counter: of every four builds the
//! first two are cleansing towers, the next two aoe towers, each slot
//! gated by its own gold/mana floor. Candidate lists are immutable -
//! unfilled or destroyed sites are simply retried on later turns.

use riverwar_core::error::Result;
use riverwar_core::grid::TileId;
use riverwar_core::player::PlayerId;
use riverwar_core::state::GameState;
use riverwar_core::towers::TowerKind;

use crate::cohorts::{walk_legs, BoardSide};
use crate::config::{AgentConfig, BuildPlan};
use crate::selector::select_worker;
use crate::tasks::advance_along;

/// Mutable construction bookkeeping: the rotation and per-kind tallies.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildDirector {
    built: u32,
    cleansing_built: u32,
    aoe_built: u32,
}

impl BuildDirector {
    /// Create a director with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total successful builds.
    #[must_use]
    pub const fn built(&self) -> u32 {
        self.built
    }

    /// Successful cleansing-tower builds.
    #[must_use]
    pub const fn cleansing_built(&self) -> u32 {
        self.cleansing_built
    }

    /// Successful aoe-tower builds.
    #[must_use]
    pub const fn aoe_built(&self) -> u32 {
        self.aoe_built
    }

    /// The tower kind the rotation calls for next: slots 0 and 1 of
    /// each 4-cycle are cleansing, slots 2 and 3 aoe.
    #[must_use]
    pub const fn rotation_kind(&self) -> TowerKind {
        if self.built % 4 < 2 {
            TowerKind::Cleansing
        } else {
            TowerKind::Aoe
        }
    }

    /// Try to put a tower on `site`.
    ///
    /// Selects a builder from the plan's cohort, routes it toward the
    /// site, and - only once the builder stands on the footprint -
    /// checks the rotation slot's resource floor and builds. A
    /// successful build bumps the counters and walks the builder off
    /// the footprint along the plan's vacate route.
    ///
    /// Returns `false` for every deferred outcome (no builder, builder
    /// still en route, floor not met); all of them retry next turn.
    ///
    /// # Errors
    ///
    /// Propagates order errors from the snapshot.
    pub fn attempt_build(
        &mut self,
        state: &mut GameState,
        player: PlayerId,
        side: BoardSide,
        config: &AgentConfig,
        plan: &BuildPlan,
        site: TileId,
    ) -> Result<bool> {
        let Some(worker) = select_worker(state, player, site, plan.cohort) else {
            return Ok(false);
        };
        advance_along(state, worker, site)?;

        let standing = state.unit(worker).is_some_and(|u| u.tile == Some(site));
        if !standing {
            return Ok(false);
        }
        if state.unit(worker).is_some_and(|u| u.acted) {
            return Ok(false);
        }

        let kind = self.rotation_kind();
        let (gold_min, mana_min) = match kind {
            TowerKind::Cleansing => config.cleansing_min,
            _ => config.aoe_min,
        };
        if !state.player(player).can_afford(gold_min, mana_min) {
            return Ok(false);
        }

        state.build(worker, kind)?;
        self.built += 1;
        match kind {
            TowerKind::Cleansing => self.cleansing_built += 1,
            TowerKind::Aoe => self.aoe_built += 1,
            _ => {}
        }
        tracing::debug!(plan = %plan.name, site = site.0, ?kind, total = self.built, "tower placed");

        walk_legs(state, side, worker, &plan.vacate_route)?;
        Ok(true)
    }

    /// Service one build plan for the turn: walk its candidate sites in
    /// order, skipping satisfied ones, attempting the rest up to the
    /// plan's per-turn cap.
    ///
    /// # Errors
    ///
    /// Propagates order errors from the snapshot.
    pub fn run_plan(
        &mut self,
        state: &mut GameState,
        player: PlayerId,
        side: BoardSide,
        config: &AgentConfig,
        plan: &BuildPlan,
    ) -> Result<()> {
        let width = state.map().width();
        let height = state.map().height();
        let mut attempts = 0;

        for &scripted in &plan.sites {
            if attempts >= plan.attempts_per_turn {
                break;
            }
            let coord = side.reflect(scripted, width, height);
            let Some(site) = state.map().id_at(coord) else {
                tracing::warn!(plan = %plan.name, ?scripted, "build site off the map");
                continue;
            };
            let open = state
                .map()
                .get(site)
                .is_some_and(|t| t.terrain.buildable() && t.tower.is_none());
            if !open {
                continue;
            }
            attempts += 1;
            self.attempt_build(state, player, side, config, plan, site)?;
        }
        Ok(())
    }
}
