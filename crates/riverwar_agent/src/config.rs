//! Scripted agent configuration tables.
//!
//! The cohort table, the per-quadrant build-target lists, and the
//! resource thresholds are configuration data, not logic. The defaults
//! mirror the scripted heuristic the agent was tuned with; every value
//! here is tunable, and a table can be swapped wholesale by loading a
//! RON file. Tables are validated once at agent start - a malformed
//! table halts setup rather than surfacing mid-turn.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use riverwar_core::grid::{Coord, Direction};
use riverwar_core::units::UnitJob;

/// Error type for configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found.
    #[error("Config file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The cohort table violates a structural requirement.
    #[error("Invalid cohort table: {0}")]
    InvalidCohorts(String),
    /// A build plan violates a structural requirement.
    #[error("Invalid build plan: {0}")]
    InvalidBuildPlan(String),
}

/// An inclusive range of worker spawn ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortRange {
    /// First ordinal in the cohort.
    pub first: u32,
    /// Last ordinal in the cohort, inclusive.
    pub last: u32,
}

impl CohortRange {
    /// Create a new inclusive range.
    #[must_use]
    pub const fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    /// Whether an ordinal falls inside the range.
    #[must_use]
    pub const fn contains(self, ordinal: u32) -> bool {
        self.first <= ordinal && ordinal <= self.last
    }
}

/// Role labels for cohorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CohortRole {
    /// Works the home-half gold mine.
    InlandMiner,
    /// Works the island gold mine across the lake bridge.
    IslandMiner,
    /// Builds the tower wall along the lanes.
    WallBuilder,
    /// Fishes the river bank for mana.
    Fisher,
    /// Builds the river-side tower line.
    RiverBuilder,
}

/// One scripted movement leg: a direction and a step count.
///
/// Directions are written for the west half and mirrored for the east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    /// Direction to walk, in west-half frame.
    pub dir: Direction,
    /// Number of single-tile steps.
    pub steps: u32,
}

impl Leg {
    /// Create a new leg.
    #[must_use]
    pub const fn new(dir: Direction, steps: u32) -> Self {
        Self { dir, steps }
    }
}

/// One cohort table entry: an ordinal range, its role, and the waypoint
/// script issued to each member right after it spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortSpec {
    /// The ordinal range this entry covers.
    pub range: CohortRange,
    /// Role label for the cohort.
    pub role: CohortRole,
    /// Waypoint legs walked on the spawn turn.
    pub route: Vec<Leg>,
}

/// A per-quadrant build-target list.
///
/// Sites are ordered west-half coordinates, consumed left to right with
/// a per-turn cap on attempts. The list itself is never mutated: a site
/// that fails its threshold this turn is simply retried on a later one,
/// and a site whose tower is later destroyed becomes eligible again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Quadrant label, for logs.
    pub name: String,
    /// The builder cohort assigned to this quadrant.
    pub cohort: CohortRange,
    /// Candidate footprint coordinates in priority order.
    pub sites: Vec<Coord>,
    /// Maximum build attempts per turn for this plan.
    pub attempts_per_turn: usize,
    /// Legs walked to vacate the footprint after a successful build.
    pub vacate_route: Vec<Leg>,
}

/// The full agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Steady-state worker head count to maintain.
    pub worker_target: u32,
    /// Extra workers spawned on river trigger turns.
    pub river_burst: u32,
    /// How many turns before a river phase the burst fires.
    pub river_burst_offset: u32,
    /// Waypoint legs for burst workers, toward the river bank.
    pub river_burst_route: Vec<Leg>,
    /// The cohort table, ordered by ordinal range.
    pub cohorts: Vec<CohortSpec>,
    /// Cohort range allowed to work the home mines.
    pub inland_cohort: CohortRange,
    /// Cohort range allowed to work the island mine.
    pub island_cohort: CohortRange,
    /// Island range once the worker pool passes the widen threshold.
    pub island_cohort_wide: CohortRange,
    /// Worker head count past which the island range widens.
    pub island_widen_threshold: u32,
    /// Cohort range allowed to fish.
    pub fisher_cohort: CohortRange,
    /// Per-quadrant build-target lists.
    pub build_plans: Vec<BuildPlan>,
    /// Gold and mana floor for a cleansing-slot build.
    pub cleansing_min: (i32, i32),
    /// Gold and mana floor for an aoe-slot build.
    pub aoe_min: (i32, i32),
    /// Turn on which defense construction begins.
    pub fortify_turn: u32,
    /// Turn on which fighter production begins.
    pub assault_turn: u32,
    /// The fighter job produced during the assault.
    pub assault_job: UnitJob,
    /// Gold floor maintained while producing fighters.
    pub assault_min_gold: i32,
    /// Mana floor maintained while producing fighters.
    pub assault_min_mana: i32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        use Direction::{East, North, South, West};
        Self {
            worker_target: 23,
            river_burst: 3,
            river_burst_offset: 2,
            river_burst_route: vec![Leg::new(East, 12), Leg::new(South, 4)],
            cohorts: vec![
                CohortSpec {
                    range: CohortRange::new(0, 3),
                    role: CohortRole::InlandMiner,
                    route: vec![Leg::new(East, 7), Leg::new(South, 7)],
                },
                CohortSpec {
                    range: CohortRange::new(4, 6),
                    role: CohortRole::IslandMiner,
                    route: vec![Leg::new(South, 7), Leg::new(East, 21)],
                },
                CohortSpec {
                    range: CohortRange::new(7, 9),
                    role: CohortRole::WallBuilder,
                    // Legs spread the three builders clear of the
                    // spawn tile.
                    route: vec![Leg::new(South, 1), Leg::new(West, 3)],
                },
                CohortSpec {
                    range: CohortRange::new(10, 19),
                    role: CohortRole::Fisher,
                    route: vec![Leg::new(East, 12), Leg::new(South, 3)],
                },
                CohortSpec {
                    range: CohortRange::new(20, 22),
                    role: CohortRole::RiverBuilder,
                    route: vec![Leg::new(East, 16)],
                },
            ],
            inland_cohort: CohortRange::new(0, 3),
            island_cohort: CohortRange::new(4, 6),
            island_cohort_wide: CohortRange::new(4, 12),
            island_widen_threshold: 20,
            fisher_cohort: CohortRange::new(10, 19),
            build_plans: vec![
                BuildPlan {
                    name: "north_wall".to_string(),
                    cohort: CohortRange::new(7, 9),
                    sites: vec![
                        Coord::new(17, 7),
                        Coord::new(19, 7),
                        Coord::new(21, 7),
                        Coord::new(23, 7),
                        Coord::new(25, 7),
                        Coord::new(27, 7),
                    ],
                    attempts_per_turn: 2,
                    vacate_route: vec![Leg::new(South, 1)],
                },
                BuildPlan {
                    name: "south_wall".to_string(),
                    cohort: CohortRange::new(7, 9),
                    sites: vec![
                        Coord::new(8, 24),
                        Coord::new(10, 24),
                        Coord::new(12, 24),
                        Coord::new(14, 24),
                        Coord::new(16, 24),
                        Coord::new(18, 24),
                    ],
                    attempts_per_turn: 2,
                    vacate_route: vec![Leg::new(North, 1)],
                },
                BuildPlan {
                    name: "river_line".to_string(),
                    cohort: CohortRange::new(20, 22),
                    sites: vec![
                        Coord::new(28, 12),
                        Coord::new(28, 14),
                        Coord::new(28, 18),
                        Coord::new(28, 20),
                    ],
                    attempts_per_turn: 2,
                    vacate_route: vec![Leg::new(West, 1)],
                },
            ],
            cleansing_min: (30, 30),
            aoe_min: (40, 15),
            fortify_turn: 10,
            assault_turn: 50,
            assault_job: UnitJob::Ghoul,
            assault_min_gold: 20,
            assault_min_mana: 5,
        }
    }
}

impl AgentConfig {
    /// Load a configuration from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: AgentConfig = ron::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the scripted tables.
    ///
    /// Cohort ranges must be well-formed, ordered, and non-overlapping;
    /// build plans must have sites and a positive per-turn cap.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCohorts`] or
    /// [`ConfigError::InvalidBuildPlan`] naming the violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cohorts.is_empty() {
            return Err(ConfigError::InvalidCohorts("cohort table is empty".into()));
        }
        let mut previous_last: Option<u32> = None;
        for spec in &self.cohorts {
            if spec.range.first > spec.range.last {
                return Err(ConfigError::InvalidCohorts(format!(
                    "range {}..={} is inverted",
                    spec.range.first, spec.range.last
                )));
            }
            if let Some(last) = previous_last {
                if spec.range.first <= last {
                    return Err(ConfigError::InvalidCohorts(format!(
                        "range starting at {} overlaps the previous cohort",
                        spec.range.first
                    )));
                }
            }
            previous_last = Some(spec.range.last);
        }

        for plan in &self.build_plans {
            if plan.sites.is_empty() {
                return Err(ConfigError::InvalidBuildPlan(format!(
                    "plan '{}' has no sites",
                    plan.name
                )));
            }
            if plan.attempts_per_turn == 0 {
                return Err(ConfigError::InvalidBuildPlan(format!(
                    "plan '{}' allows zero attempts per turn",
                    plan.name
                )));
            }
        }
        Ok(())
    }

    /// The cohort entry covering a spawn ordinal, if any.
    #[must_use]
    pub fn cohort_for(&self, ordinal: u32) -> Option<&CohortSpec> {
        self.cohorts.iter().find(|spec| spec.range.contains(ordinal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cohort_lookup_by_ordinal() {
        let config = AgentConfig::default();
        assert_eq!(config.cohort_for(0).unwrap().role, CohortRole::InlandMiner);
        assert_eq!(config.cohort_for(5).unwrap().role, CohortRole::IslandMiner);
        assert_eq!(config.cohort_for(9).unwrap().role, CohortRole::WallBuilder);
        assert_eq!(config.cohort_for(15).unwrap().role, CohortRole::Fisher);
        assert_eq!(config.cohort_for(22).unwrap().role, CohortRole::RiverBuilder);
        assert!(config.cohort_for(23).is_none());
    }

    #[test]
    fn test_overlapping_cohorts_rejected() {
        let mut config = AgentConfig::default();
        config.cohorts[1].range = CohortRange::new(3, 6);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCohorts(_))
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = AgentConfig::default();
        config.cohorts[0].range = CohortRange::new(3, 0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCohorts(_))
        ));
    }

    #[test]
    fn test_empty_build_plan_rejected() {
        let mut config = AgentConfig::default();
        config.build_plans[0].sites.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBuildPlan(_))
        ));
    }

    #[test]
    fn test_ron_round_trip() {
        let config = AgentConfig::default();
        let text = ron::to_string(&config).unwrap();
        let parsed = AgentConfig::from_ron_str(&text).unwrap();
        assert_eq!(parsed.worker_target, config.worker_target);
        assert_eq!(parsed.cohorts.len(), config.cohorts.len());
        assert_eq!(parsed.build_plans.len(), config.build_plans.len());
    }
}
