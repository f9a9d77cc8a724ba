//! The turn snapshot and order application rules.
//!
//! [`GameState`] mirrors the external engine's view of one turn: the
//! grid, every unit and tower, and both players' resources. Orders are
//! applied in place the moment they are issued - a worker that moves is
//! immediately visible on its new tile to every later query in the same
//! turn - and appended to a log the caller drains when the turn ends.
//! There is no separate commit step.
//!
//! Order methods validate against the game rules and return
//! [`GameError`] on violations. Callers are expected to check
//! preconditions first (affordability, occupancy), so a returned error
//! indicates a caller bug or inconsistent external state, not a normal
//! "try again next turn" outcome.

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::error::{GameError, Result};
use crate::grid::{GameMap, Terrain, Tile, TileId};
use crate::player::{Player, PlayerId};
use crate::towers::{Tower, TowerId, TowerKind, TowerStorage};
use crate::units::{Unit, UnitId, UnitJob, UnitStorage};

/// Gold per turn for a worker mining a side gold mine.
pub const GOLD_INCOME_PER_MINER: i32 = 5;
/// Gold per turn for a worker mining the island gold mine.
pub const ISLAND_INCOME_PER_MINER: i32 = 10;
/// Mana per turn for a worker fishing the river.
pub const MANA_INCOME_PER_FISHER: i32 = 5;
/// Default turns between river phases.
pub const DEFAULT_RIVER_PHASE_INTERVAL: u32 = 25;

/// The in-memory snapshot of one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    map: GameMap,
    units: UnitStorage,
    towers: TowerStorage,
    players: [Player; 2],
    turn: u32,
    river_phase_interval: u32,
    log: Vec<Action>,
}

impl GameState {
    /// Build a snapshot from a map whose tiles carry ownership and the
    /// castle / worker-spawn / unit-spawn landmarks for both players.
    ///
    /// Castle towers are erected on each home base.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MalformedMap`] if either player is missing a
    /// castle, worker spawn, or unit spawn tile.
    pub fn from_map(map: GameMap) -> Result<Self> {
        let mut landmarks: [[Option<TileId>; 3]; 2] = [[None; 3]; 2];
        let mut sides: [Vec<TileId>; 2] = [Vec::new(), Vec::new()];

        for tile in map.iter() {
            let Some(owner) = tile.owner else { continue };
            sides[owner.index()].push(tile.id);
            let slot = match tile.terrain {
                Terrain::Castle => 0,
                Terrain::WorkerSpawn => 1,
                Terrain::UnitSpawn => 2,
                _ => continue,
            };
            landmarks[owner.index()][slot] = Some(tile.id);
        }

        let mut map = map;
        let mut towers = TowerStorage::new();
        let mut players: Vec<Player> = Vec::with_capacity(2);

        for (index, marks) in landmarks.iter().enumerate() {
            let name = |slot: usize| ["castle", "worker spawn", "unit spawn"][slot];
            let mut resolved = [TileId(0); 3];
            for (slot, mark) in marks.iter().enumerate() {
                resolved[slot] = mark.ok_or_else(|| {
                    GameError::MalformedMap(format!(
                        "player {index} has no {} tile",
                        name(slot)
                    ))
                })?;
            }

            let player_id = PlayerId(index as u8);
            let mut player = Player::new(resolved[0], resolved[1], resolved[2]);
            player.side = std::mem::take(&mut sides[index]);

            let tower_id = towers.insert(Tower::built(player_id, TowerKind::Castle, resolved[0]));
            if let Some(tile) = map.get_mut(resolved[0]) {
                tile.tower = Some(tower_id);
            }
            players.push(player);
        }

        let players: [Player; 2] = match players.try_into() {
            Ok(pair) => pair,
            Err(_) => unreachable!("exactly two players are constructed"),
        };

        Ok(Self {
            map,
            units: UnitStorage::new(),
            towers,
            players,
            turn: 1,
            river_phase_interval: DEFAULT_RIVER_PHASE_INTERVAL,
            log: Vec::new(),
        })
    }

    /// Build a bare snapshot over a map with no landmark requirements:
    /// no castle towers, both players' landmark fields degenerate at
    /// tile 0. Algorithm fixtures only; the full agent lifecycle needs
    /// [`GameState::from_map`].
    #[must_use]
    pub fn sandbox(map: GameMap) -> Self {
        let mut sides: [Vec<TileId>; 2] = [Vec::new(), Vec::new()];
        for tile in map.iter() {
            if let Some(owner) = tile.owner {
                sides[owner.index()].push(tile.id);
            }
        }
        let fallback = TileId(0);
        let mut players =
            [0usize, 1usize].map(|_| Player::new(fallback, fallback, fallback));
        players[0].side = std::mem::take(&mut sides[0]);
        players[1].side = std::mem::take(&mut sides[1]);

        Self {
            map,
            units: UnitStorage::new(),
            towers: TowerStorage::new(),
            players,
            turn: 1,
            river_phase_interval: DEFAULT_RIVER_PHASE_INTERVAL,
            log: Vec::new(),
        }
    }

    /// Override the river phase interval (game setting, default 25).
    #[must_use]
    pub fn with_river_phase_interval(mut self, interval: u32) -> Self {
        self.river_phase_interval = interval.max(1);
        self
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The tile grid.
    #[must_use]
    pub fn map(&self) -> &GameMap {
        &self.map
    }

    /// A unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    /// A tower by id.
    #[must_use]
    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.get(id)
    }

    /// A player's state.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// The current turn number, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Turns between river phases.
    #[must_use]
    pub const fn river_phase_interval(&self) -> u32 {
        self.river_phase_interval
    }

    /// All unit ids in creation order.
    #[must_use]
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units.sorted_ids()
    }

    /// A player's unit ids in creation order.
    #[must_use]
    pub fn units_of(&self, player: PlayerId) -> Vec<UnitId> {
        self.units
            .sorted_ids()
            .into_iter()
            .filter(|&id| self.units.get(id).is_some_and(|u| u.owner == player))
            .collect()
    }

    /// A player's tower ids in creation order.
    #[must_use]
    pub fn towers_of(&self, player: PlayerId) -> Vec<TowerId> {
        self.towers
            .sorted_ids()
            .into_iter()
            .filter(|&id| self.towers.get(id).is_some_and(|t| t.owner == player))
            .collect()
    }

    /// How many workers a player owns.
    #[must_use]
    pub fn worker_count(&self, player: PlayerId) -> usize {
        self.units
            .sorted_ids()
            .into_iter()
            .filter(|&id| {
                self.units
                    .get(id)
                    .is_some_and(|u| u.owner == player && u.job == UnitJob::Worker)
            })
            .count()
    }

    /// Whether a player could spawn a worker right now: spawn tile free
    /// and gold on hand.
    #[must_use]
    pub fn can_spawn_worker(&self, player: PlayerId) -> bool {
        let spawn = self.players[player.index()].worker_spawn;
        let tile_free = self.map.get(spawn).is_some_and(|t| t.unit.is_none());
        tile_free && self.players[player.index()].gold >= UnitJob::Worker.stats().gold_cost
    }

    /// Whether a player could spawn a given fighter right now.
    #[must_use]
    pub fn can_spawn_unit(&self, player: PlayerId, job: UnitJob) -> bool {
        let stats = job.stats();
        let spawn = self.players[player.index()].unit_spawn;
        let tile_free = self.map.get(spawn).is_some_and(|t| t.unit.is_none());
        job.is_fighter()
            && tile_free
            && self.players[player.index()].can_afford(stats.gold_cost, stats.mana_cost)
    }

    // ------------------------------------------------------------------
    // Engine-side lifecycle (used by harnesses and fixtures)
    // ------------------------------------------------------------------

    /// Reset every unit of a player to its full per-turn budget. The
    /// external engine does this when granting the player a turn.
    pub fn begin_turn(&mut self, player: PlayerId) {
        for id in self.units.sorted_ids() {
            if let Some(unit) = self.units.get_mut(id) {
                if unit.owner == player {
                    unit.refresh();
                }
            }
        }
    }

    /// Advance the turn counter.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }

    /// Drain the order log accumulated since the last drain.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.log)
    }

    /// Place a unit directly, bypassing spawn rules and costs. Fixture
    /// setup only; the tile must be free.
    ///
    /// # Errors
    ///
    /// Returns an error if the tile is unknown or occupied.
    pub fn place_unit(&mut self, player: PlayerId, job: UnitJob, tile: TileId) -> Result<UnitId> {
        let target = self.tile_checked(tile)?;
        if target.unit.is_some() {
            return Err(GameError::IllegalOrder(format!(
                "tile {} is already occupied",
                tile.0
            )));
        }
        let id = self.units.insert(Unit::spawned(player, job, tile));
        if let Some(t) = self.map.get_mut(tile) {
            t.unit = Some(id);
        }
        Ok(id)
    }

    /// Set a player's resource totals directly. Fixture setup only.
    pub fn grant_resources(&mut self, player: PlayerId, gold: i32, mana: i32) {
        self.players[player.index()].gold = gold;
        self.players[player.index()].mana = mana;
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    /// Step a unit to an adjacent tile.
    ///
    /// Movement spends the allowance but is independent of the acted
    /// flag: a worker that has built may still walk off the footprint
    /// with whatever allowance remains.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalOrder`] if the unit has no movement
    /// left, the destination is not adjacent, is occupied, or is
    /// outside the unit's movement domain.
    pub fn move_unit(&mut self, id: UnitId, to: TileId) -> Result<()> {
        let unit = self.unit_checked(id)?;
        let from = unit.tile.ok_or_else(|| {
            GameError::IllegalOrder(format!("unit {} is not on the map", id.0))
        })?;
        let domain = unit.job.domain();
        if unit.moves == 0 {
            return Err(GameError::IllegalOrder(format!(
                "unit {} has no movement left",
                id.0
            )));
        }

        let dest = self.tile_checked(to)?;
        if !self.map.adjacent(from, to) {
            return Err(GameError::IllegalOrder(format!(
                "tiles {} and {} are not adjacent",
                from.0, to.0
            )));
        }
        if dest.unit.is_some() {
            return Err(GameError::IllegalOrder(format!(
                "tile {} is occupied",
                to.0
            )));
        }
        if !dest.terrain.passable(domain) {
            return Err(GameError::IllegalOrder(format!(
                "tile {} is impassable for this unit",
                to.0
            )));
        }

        if let Some(tile) = self.map.get_mut(from) {
            tile.unit = None;
        }
        if let Some(tile) = self.map.get_mut(to) {
            tile.unit = Some(id);
        }
        if let Some(unit) = self.units.get_mut(id) {
            unit.tile = Some(to);
            unit.moves -= 1;
        }
        self.log.push(Action::Move { unit: id, to });
        Ok(())
    }

    /// Mine the gold-mine tile the worker stands on.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalOrder`] if the unit is not a worker,
    /// has acted, or does not stand on a gold mine.
    pub fn mine(&mut self, id: UnitId) -> Result<()> {
        let unit = self.unit_checked(id)?;
        let owner = unit.owner;
        let tile_id = unit.tile.ok_or_else(|| {
            GameError::IllegalOrder(format!("unit {} is not on the map", id.0))
        })?;
        if unit.job != UnitJob::Worker {
            return Err(GameError::IllegalOrder("only workers can mine".into()));
        }
        if unit.acted {
            return Err(GameError::IllegalOrder(format!(
                "unit {} has already acted this turn",
                id.0
            )));
        }

        let income = match self.tile_checked(tile_id)?.terrain {
            Terrain::GoldMine => GOLD_INCOME_PER_MINER,
            Terrain::IslandGoldMine => ISLAND_INCOME_PER_MINER,
            _ => {
                return Err(GameError::IllegalOrder(format!(
                    "tile {} is not a gold mine",
                    tile_id.0
                )))
            }
        };

        self.players[owner.index()].gold += income;
        if let Some(unit) = self.units.get_mut(id) {
            unit.acted = true;
        }
        self.log.push(Action::Mine {
            unit: id,
            tile: tile_id,
        });
        Ok(())
    }

    /// Fish toward an adjacent river tile.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalOrder`] if the unit is not a worker,
    /// has acted, or `toward` is not an adjacent river tile.
    pub fn fish(&mut self, id: UnitId, toward: TileId) -> Result<()> {
        let unit = self.unit_checked(id)?;
        let owner = unit.owner;
        let tile_id = unit.tile.ok_or_else(|| {
            GameError::IllegalOrder(format!("unit {} is not on the map", id.0))
        })?;
        if unit.job != UnitJob::Worker {
            return Err(GameError::IllegalOrder("only workers can fish".into()));
        }
        if unit.acted {
            return Err(GameError::IllegalOrder(format!(
                "unit {} has already acted this turn",
                id.0
            )));
        }
        if self.tile_checked(toward)?.terrain != Terrain::River {
            return Err(GameError::IllegalOrder(format!(
                "tile {} is not river",
                toward.0
            )));
        }
        if !self.map.adjacent(tile_id, toward) {
            return Err(GameError::IllegalOrder(
                "can only fish an adjacent river tile".into(),
            ));
        }

        self.players[owner.index()].mana += MANA_INCOME_PER_FISHER;
        if let Some(unit) = self.units.get_mut(id) {
            unit.acted = true;
        }
        self.log.push(Action::Fish { unit: id, toward });
        Ok(())
    }

    /// Build a tower on the grass tile the worker stands on.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalOrder`] for non-workers, non-grass
    /// footprints, or an existing tower, and
    /// [`GameError::InsufficientResources`] if the kind is unaffordable.
    pub fn build(&mut self, id: UnitId, kind: TowerKind) -> Result<TowerId> {
        let unit = self.unit_checked(id)?;
        let owner = unit.owner;
        let tile_id = unit.tile.ok_or_else(|| {
            GameError::IllegalOrder(format!("unit {} is not on the map", id.0))
        })?;
        if unit.job != UnitJob::Worker {
            return Err(GameError::IllegalOrder("only workers can build".into()));
        }
        if unit.acted {
            return Err(GameError::IllegalOrder(format!(
                "unit {} has already acted this turn",
                id.0
            )));
        }
        if kind == TowerKind::Castle {
            return Err(GameError::IllegalOrder("castles cannot be built".into()));
        }

        let tile = self.tile_checked(tile_id)?;
        if !tile.terrain.buildable() {
            return Err(GameError::IllegalOrder(format!(
                "tile {} cannot hold a tower",
                tile_id.0
            )));
        }
        if tile.tower.is_some() {
            return Err(GameError::IllegalOrder(format!(
                "tile {} already holds a tower",
                tile_id.0
            )));
        }

        let stats = kind.stats();
        let player = &self.players[owner.index()];
        if player.gold < stats.gold_cost {
            return Err(GameError::InsufficientResources {
                resource: "gold".into(),
                required: stats.gold_cost,
                available: player.gold,
            });
        }
        if player.mana < stats.mana_cost {
            return Err(GameError::InsufficientResources {
                resource: "mana".into(),
                required: stats.mana_cost,
                available: player.mana,
            });
        }

        self.players[owner.index()].gold -= stats.gold_cost;
        self.players[owner.index()].mana -= stats.mana_cost;

        let tower_id = self.towers.insert(Tower::built(owner, kind, tile_id));
        if let Some(tile) = self.map.get_mut(tile_id) {
            tile.tower = Some(tower_id);
        }
        if let Some(unit) = self.units.get_mut(id) {
            unit.acted = true;
        }
        tracing::debug!(unit = id.0, ?kind, tile = tile_id.0, "tower built");
        self.log.push(Action::Build {
            unit: id,
            kind,
            tile: tile_id,
        });
        Ok(tower_id)
    }

    /// Attack the tower on an adjacent tile.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalOrder`] if the attacker is a worker,
    /// has acted, or the target tile holds no enemy tower.
    pub fn attack(&mut self, id: UnitId, target: TileId) -> Result<()> {
        let unit = self.unit_checked(id)?;
        let owner = unit.owner;
        let damage = unit.job.stats().damage;
        let tile_id = unit.tile.ok_or_else(|| {
            GameError::IllegalOrder(format!("unit {} is not on the map", id.0))
        })?;
        if !unit.job.is_fighter() {
            return Err(GameError::IllegalOrder("workers cannot attack".into()));
        }
        if unit.acted {
            return Err(GameError::IllegalOrder(format!(
                "unit {} has already acted this turn",
                id.0
            )));
        }
        if !self.map.adjacent(tile_id, target) {
            return Err(GameError::IllegalOrder(
                "can only attack an adjacent tile".into(),
            ));
        }

        let tower_id = self
            .tile_checked(target)?
            .tower
            .ok_or_else(|| {
                GameError::IllegalOrder(format!("tile {} holds no tower", target.0))
            })?;
        let tower = self
            .towers
            .get(tower_id)
            .ok_or(GameError::InvalidTowerId(tower_id.0))?;
        if tower.owner == owner {
            return Err(GameError::IllegalOrder(
                "cannot attack a friendly tower".into(),
            ));
        }

        let (tower_owner, tower_kind, remaining) = {
            let tower = self
                .towers
                .get_mut(tower_id)
                .ok_or(GameError::InvalidTowerId(tower_id.0))?;
            tower.health -= damage;
            (tower.owner, tower.kind, tower.health)
        };

        if tower_kind == TowerKind::Castle {
            self.players[tower_owner.index()].health = remaining.max(0);
        }
        if remaining <= 0 {
            self.towers.remove(tower_id);
            if let Some(tile) = self.map.get_mut(target) {
                tile.tower = None;
            }
            tracing::debug!(tower = tower_id.0, ?tower_kind, "tower destroyed");
        }
        if let Some(unit) = self.units.get_mut(id) {
            unit.acted = true;
        }
        self.log.push(Action::Attack { unit: id, target });
        Ok(())
    }

    /// Spawn a worker at the player's worker spawn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalOrder`] if the spawn tile is
    /// occupied, or [`GameError::InsufficientResources`] without the
    /// gold.
    pub fn spawn_worker(&mut self, player: PlayerId) -> Result<UnitId> {
        let spawn = self.players[player.index()].worker_spawn;
        if self.tile_checked(spawn)?.unit.is_some() {
            return Err(GameError::IllegalOrder(format!(
                "worker spawn tile {} is occupied",
                spawn.0
            )));
        }
        let cost = UnitJob::Worker.stats().gold_cost;
        let gold = self.players[player.index()].gold;
        if gold < cost {
            return Err(GameError::InsufficientResources {
                resource: "gold".into(),
                required: cost,
                available: gold,
            });
        }

        self.players[player.index()].gold -= cost;
        let id = self
            .units
            .insert(Unit::spawned(player, UnitJob::Worker, spawn));
        if let Some(tile) = self.map.get_mut(spawn) {
            tile.unit = Some(id);
        }
        tracing::debug!(player = player.0, unit = id.0, "worker spawned");
        self.log.push(Action::SpawnWorker { player, tile: spawn });
        Ok(id)
    }

    /// Spawn a fighter at the player's unit spawn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalOrder`] for worker jobs or an
    /// occupied spawn tile, [`GameError::InsufficientResources`] when
    /// either cost is short.
    pub fn spawn_unit(&mut self, player: PlayerId, job: UnitJob) -> Result<UnitId> {
        if !job.is_fighter() {
            return Err(GameError::IllegalOrder(
                "use spawn_worker for workers".into(),
            ));
        }
        let spawn = self.players[player.index()].unit_spawn;
        if self.tile_checked(spawn)?.unit.is_some() {
            return Err(GameError::IllegalOrder(format!(
                "unit spawn tile {} is occupied",
                spawn.0
            )));
        }
        let stats = job.stats();
        let current = &self.players[player.index()];
        if current.gold < stats.gold_cost {
            return Err(GameError::InsufficientResources {
                resource: "gold".into(),
                required: stats.gold_cost,
                available: current.gold,
            });
        }
        if current.mana < stats.mana_cost {
            return Err(GameError::InsufficientResources {
                resource: "mana".into(),
                required: stats.mana_cost,
                available: current.mana,
            });
        }

        self.players[player.index()].gold -= stats.gold_cost;
        self.players[player.index()].mana -= stats.mana_cost;
        let id = self.units.insert(Unit::spawned(player, job, spawn));
        if let Some(tile) = self.map.get_mut(spawn) {
            tile.unit = Some(id);
        }
        tracing::debug!(player = player.0, unit = id.0, ?job, "fighter spawned");
        self.log.push(Action::SpawnUnit {
            player,
            job,
            tile: spawn,
        });
        Ok(id)
    }

    // ------------------------------------------------------------------

    fn unit_checked(&self, id: UnitId) -> Result<&Unit> {
        self.units.get(id).ok_or(GameError::InvalidUnitId(id.0))
    }

    fn tile_checked(&self, id: TileId) -> Result<&Tile> {
        self.map.get(id).ok_or(GameError::InvalidTileId(id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;
    use crate::mapgen;

    fn standard() -> GameState {
        mapgen::standard_state().unwrap()
    }

    #[test]
    fn test_from_map_erects_castles() {
        let state = standard();
        for player in [PlayerId::WEST, PlayerId::EAST] {
            let home = state.player(player).home_base;
            let tile = state.map().get(home).unwrap();
            let tower = state.tower(tile.tower.unwrap()).unwrap();
            assert_eq!(tower.kind, TowerKind::Castle);
            assert_eq!(tower.owner, player);
        }
    }

    #[test]
    fn test_spawn_worker_debits_gold_and_occupies_tile() {
        let mut state = standard();
        let gold_before = state.player(PlayerId::WEST).gold;
        let id = state.spawn_worker(PlayerId::WEST).unwrap();
        assert_eq!(state.player(PlayerId::WEST).gold, gold_before - 10);
        let spawn = state.player(PlayerId::WEST).worker_spawn;
        assert_eq!(state.map().get(spawn).unwrap().unit, Some(id));
        let unit = state.unit(id).unwrap();
        assert_eq!(unit.moves, 8);
        assert!(!unit.acted);
    }

    #[test]
    fn test_spawn_worker_fails_on_occupied_tile() {
        let mut state = standard();
        state.spawn_worker(PlayerId::WEST).unwrap();
        assert!(state.spawn_worker(PlayerId::WEST).is_err());
        assert!(!state.can_spawn_worker(PlayerId::WEST));
    }

    #[test]
    fn test_spawn_worker_fails_without_gold() {
        let mut state = standard();
        state.grant_resources(PlayerId::WEST, 9, 100);
        assert!(matches!(
            state.spawn_worker(PlayerId::WEST),
            Err(GameError::InsufficientResources { .. })
        ));
    }

    #[test]
    fn test_move_updates_occupancy_and_budget() {
        let mut state = standard();
        let id = state.spawn_worker(PlayerId::WEST).unwrap();
        let from = state.unit(id).unwrap().tile.unwrap();
        let dest = state
            .map()
            .get(from)
            .unwrap()
            .neighbors()
            .into_iter()
            .flatten()
            .find(|&n| {
                let tile = state.map().get(n).unwrap();
                tile.unit.is_none() && tile.terrain.passable(crate::units::MoveDomain::Field)
            })
            .unwrap();

        state.move_unit(id, dest).unwrap();
        assert_eq!(state.map().get(from).unwrap().unit, None);
        assert_eq!(state.map().get(dest).unwrap().unit, Some(id));
        assert_eq!(state.unit(id).unwrap().moves, 7);
    }

    #[test]
    fn test_move_rejects_non_adjacent() {
        let mut state = standard();
        let id = state.spawn_worker(PlayerId::WEST).unwrap();
        let far = state.map().id_at(Coord::new(0, 0)).unwrap();
        assert!(state.move_unit(id, far).is_err());
    }

    #[test]
    fn test_mine_income_depends_on_terrain() {
        let mut state = standard();
        let mine = state
            .map()
            .iter()
            .find(|t| t.terrain == Terrain::GoldMine)
            .unwrap()
            .id;
        let island = state
            .map()
            .iter()
            .find(|t| t.terrain == Terrain::IslandGoldMine)
            .unwrap()
            .id;
        let a = state.place_unit(PlayerId::WEST, UnitJob::Worker, mine).unwrap();
        let b = state
            .place_unit(PlayerId::WEST, UnitJob::Worker, island)
            .unwrap();

        let gold_before = state.player(PlayerId::WEST).gold;
        state.mine(a).unwrap();
        assert_eq!(state.player(PlayerId::WEST).gold, gold_before + 5);
        state.mine(b).unwrap();
        assert_eq!(state.player(PlayerId::WEST).gold, gold_before + 15);
        assert!(state.unit(a).unwrap().acted);
    }

    #[test]
    fn test_mine_twice_in_one_turn_rejected() {
        let mut state = standard();
        let mine = state
            .map()
            .iter()
            .find(|t| t.terrain == Terrain::GoldMine)
            .unwrap()
            .id;
        let id = state.place_unit(PlayerId::WEST, UnitJob::Worker, mine).unwrap();
        state.mine(id).unwrap();
        assert!(state.mine(id).is_err());
    }

    #[test]
    fn test_fish_requires_adjacent_river() {
        let mut state = standard();
        // Find a grass tile adjacent to river on the west side.
        let spot = state
            .map()
            .iter()
            .find(|t| {
                t.terrain == Terrain::Grass
                    && t.owner == Some(PlayerId::WEST)
                    && t.neighbors().into_iter().flatten().any(|n| {
                        state.map().get(n).unwrap().terrain == Terrain::River
                    })
            })
            .unwrap();
        let spot_id = spot.id;
        let river = spot
            .neighbors()
            .into_iter()
            .flatten()
            .find(|&n| state.map().get(n).unwrap().terrain == Terrain::River)
            .unwrap();

        let id = state
            .place_unit(PlayerId::WEST, UnitJob::Worker, spot_id)
            .unwrap();
        let mana_before = state.player(PlayerId::WEST).mana;
        state.fish(id, river).unwrap();
        assert_eq!(state.player(PlayerId::WEST).mana, mana_before + 5);
    }

    #[test]
    fn test_build_debits_and_places_tower() {
        let mut state = standard();
        let grass = state
            .map()
            .iter()
            .find(|t| t.terrain == Terrain::Grass && t.owner == Some(PlayerId::WEST))
            .unwrap()
            .id;
        let id = state.place_unit(PlayerId::WEST, UnitJob::Worker, grass).unwrap();
        state.grant_resources(PlayerId::WEST, 30, 30);

        let tower_id = state.build(id, TowerKind::Cleansing).unwrap();
        assert_eq!(state.player(PlayerId::WEST).gold, 0);
        assert_eq!(state.player(PlayerId::WEST).mana, 0);
        assert_eq!(state.map().get(grass).unwrap().tower, Some(tower_id));
        assert!(state.unit(id).unwrap().acted);
    }

    #[test]
    fn test_build_rejected_below_threshold() {
        let mut state = standard();
        let grass = state
            .map()
            .iter()
            .find(|t| t.terrain == Terrain::Grass && t.owner == Some(PlayerId::WEST))
            .unwrap()
            .id;
        let id = state.place_unit(PlayerId::WEST, UnitJob::Worker, grass).unwrap();
        state.grant_resources(PlayerId::WEST, 29, 40);

        assert!(matches!(
            state.build(id, TowerKind::Cleansing),
            Err(GameError::InsufficientResources { .. })
        ));
        assert_eq!(state.player(PlayerId::WEST).gold, 29);
        assert!(!state.unit(id).unwrap().acted);
    }

    #[test]
    fn test_attack_damages_and_destroys() {
        let mut state = standard();
        let castle = state.player(PlayerId::EAST).home_base;
        // Stand a ghoul on a lane tile adjacent to the enemy castle.
        let lane = state
            .map()
            .get(castle)
            .unwrap()
            .neighbors()
            .into_iter()
            .flatten()
            .find(|&n| state.map().get(n).unwrap().terrain == Terrain::Path)
            .unwrap();
        let ghoul = state.place_unit(PlayerId::WEST, UnitJob::Ghoul, lane).unwrap();

        state.attack(ghoul, castle).unwrap();
        assert_eq!(state.player(PlayerId::EAST).health, 95);
        assert!(state.unit(ghoul).unwrap().acted);

        // Hammer it down to destruction across turns.
        for _ in 0..19 {
            state.begin_turn(PlayerId::WEST);
            state.attack(ghoul, castle).unwrap();
        }
        assert_eq!(state.player(PlayerId::EAST).health, 0);
        assert!(state.map().get(castle).unwrap().tower.is_none());
    }

    #[test]
    fn test_take_actions_preserves_issue_order() {
        let mut state = standard();
        let a = state.spawn_worker(PlayerId::WEST).unwrap();
        let from = state.unit(a).unwrap().tile.unwrap();
        let dest = state
            .map()
            .get(from)
            .unwrap()
            .neighbors()
            .into_iter()
            .flatten()
            .find(|&n| {
                state.map().get(n).unwrap().terrain.passable(crate::units::MoveDomain::Field)
            })
            .unwrap();
        state.move_unit(a, dest).unwrap();

        let actions = state.take_actions();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::SpawnWorker { .. }));
        assert!(matches!(actions[1], Action::Move { .. }));
        assert!(state.take_actions().is_empty());
    }
}
