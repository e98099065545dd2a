//! Tuning constants for a session, loadable from configuration files.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, Path, PathError};

/// Complete set of tuning values that drive a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Grid layout and enemy route.
    pub map: MapRules,
    /// Starting resources and prices.
    pub economy: EconomyRules,
    /// Tower and projectile parameters.
    pub tower: TowerRules,
    /// Enemy movement and toughness.
    pub enemy: EnemyRules,
    /// Wave sizing and cadence.
    pub wave: WaveRules,
    /// Cosmetic particle bursts.
    pub effects: EffectRules,
}

impl Rules {
    /// Rules for the winding 20x15 map.
    #[must_use]
    pub fn neon() -> Self {
        Self::default()
    }

    /// Rules for the compact 10x10 map with a six-node route.
    #[must_use]
    pub fn isometric() -> Self {
        Self {
            map: MapRules {
                columns: 10,
                rows: 10,
                tile_length: 40.0,
                path: cells(&[(1, 1), (1, 5), (5, 5), (5, 8), (9, 8), (9, 1)]),
            },
            ..Self::default()
        }
    }

    /// Checks the rules for values the simulation cannot run with and
    /// returns the validated path.
    pub fn validate(&self) -> Result<Path, RulesError> {
        if self.map.columns == 0 || self.map.rows == 0 {
            return Err(RulesError::EmptyGrid);
        }

        let positive = [
            ("map.tile_length", self.map.tile_length),
            ("tower.fire_rate_ms", self.tower.fire_rate_ms),
            ("tower.projectile_speed", self.tower.projectile_speed),
            ("enemy.speed", self.enemy.speed),
            ("wave.spawn_interval_ms", self.wave.spawn_interval_ms),
            ("effects.decay", self.effects.decay),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RulesError::NotPositive { field, value });
            }
        }

        if !(self.tower.range_tiles.is_finite() && self.tower.range_tiles >= 0.0) {
            return Err(RulesError::NotPositive {
                field: "tower.range_tiles",
                value: self.tower.range_tiles,
            });
        }

        Path::new(self.map.path.clone(), self.map.columns, self.map.rows).map_err(RulesError::Path)
    }

    /// Tower range converted to world units.
    #[must_use]
    pub fn tower_range(&self) -> f32 {
        self.tower.range_tiles * self.map.tile_length
    }
}

/// Errors reported when validating [`Rules`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RulesError {
    /// The grid has no columns or no rows.
    #[error("map must have at least one column and one row")]
    EmptyGrid,
    /// A rate, speed or length is zero, negative or not finite.
    #[error("`{field}` must be a positive finite number (received {value})")]
    NotPositive {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// The waypoint list is unusable.
    #[error("invalid path: {0}")]
    Path(#[source] PathError),
}

/// Grid layout and enemy route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapRules {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Waypoints from spawn to exit.
    pub path: Vec<CellCoord>,
}

impl Default for MapRules {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 15,
            tile_length: 40.0,
            path: cells(&[
                (0, 2),
                (4, 2),
                (4, 8),
                (10, 8),
                (10, 3),
                (16, 3),
                (16, 10),
                (8, 10),
                (8, 13),
                (19, 13),
            ]),
        }
    }
}

/// Starting resources and prices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRules {
    /// Money available when the session starts.
    pub starting_money: u32,
    /// Lives available when the session starts.
    pub starting_lives: u32,
    /// Price of a single tower.
    pub tower_cost: u32,
    /// Money awarded for each destroyed enemy.
    pub kill_reward: u32,
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            starting_money: 100,
            starting_lives: 20,
            tower_cost: 50,
            kill_reward: 15,
        }
    }
}

/// Tower and projectile parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerRules {
    /// Targeting radius measured in tiles.
    pub range_tiles: f32,
    /// Milliseconds between shots.
    pub fire_rate_ms: f32,
    /// Projectile speed in world units per millisecond.
    pub projectile_speed: f32,
    /// Damage applied by a single projectile.
    pub projectile_damage: u32,
}

impl Default for TowerRules {
    fn default() -> Self {
        Self {
            range_tiles: 3.0,
            fire_rate_ms: 800.0,
            projectile_speed: 0.4,
            projectile_damage: 10,
        }
    }
}

/// Enemy movement and toughness.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyRules {
    /// Movement speed in world units per millisecond.
    pub speed: f32,
    /// Health of an enemy before wave scaling.
    pub base_health: u32,
    /// Extra health granted per wave number.
    pub health_per_wave: u32,
}

impl EnemyRules {
    /// Health of an enemy spawned during the provided wave.
    #[must_use]
    pub fn health_at(&self, wave: u32) -> u32 {
        self.base_health
            .saturating_add(wave.saturating_mul(self.health_per_wave))
    }
}

impl Default for EnemyRules {
    fn default() -> Self {
        Self {
            speed: 0.12,
            base_health: 20,
            health_per_wave: 10,
        }
    }
}

/// Wave sizing and cadence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveRules {
    /// Milliseconds between consecutive spawns.
    pub spawn_interval_ms: f32,
    /// Enemies spawned before wave scaling.
    pub base_size: u32,
    /// Extra enemies per wave number.
    pub size_per_wave: u32,
}

impl WaveRules {
    /// Number of enemies spawned by the provided wave.
    #[must_use]
    pub fn size_of(&self, wave: u32) -> u32 {
        self.base_size
            .saturating_add(wave.saturating_mul(self.size_per_wave))
    }
}

impl Default for WaveRules {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 1000.0,
            base_size: 5,
            size_per_wave: 2,
        }
    }
}

/// Cosmetic particle bursts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectRules {
    /// Seed for the particle scatter generator.
    pub seed: u64,
    /// Particles emitted when a tower is placed.
    pub placement_burst: u32,
    /// Particles emitted when an enemy is hit.
    pub damage_burst: u32,
    /// Particles emitted when an enemy is destroyed.
    pub death_burst: u32,
    /// Life lost per 16 ms of simulated time.
    pub decay: f32,
}

impl Default for EffectRules {
    fn default() -> Self {
        Self {
            seed: 0x6e65_6f6e_6465_6600,
            placement_burst: 10,
            damage_burst: 3,
            death_burst: 8,
            decay: 0.02,
        }
    }
}

fn cells(points: &[(u32, u32)]) -> Vec<CellCoord> {
    points
        .iter()
        .map(|&(column, row)| CellCoord::new(column, row))
        .collect()
}
