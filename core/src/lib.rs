#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Neon Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Systems consume read-only views of the
//! world and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod path;
mod rules;

pub use path::{Path, PathError};
pub use rules::{
    EconomyRules, EffectRules, EnemyRules, MapRules, Rules, RulesError, TowerRules, WaveRules,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Neon Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Marks a wave as active. Ignored while a wave is running or the game is over.
    BeginWave,
    /// Spawns a new enemy at the first waypoint of the path.
    SpawnEnemy {
        /// Health assigned to the enemy when it enters the path.
        health: Health,
    },
    /// Closes the active wave and advances the wave counter.
    FinishWave,
    /// Advances enemies along the path and counts down tower cooldowns.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Turns a tower to face the provided enemy.
    AimTower {
        /// Tower that should rotate.
        tower: TowerId,
        /// Enemy the tower is tracking.
        enemy: EnemyId,
    },
    /// Launches a projectile from a tower toward an enemy and restarts its cooldown.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Moves projectiles toward their targets and resolves hits.
    AdvanceProjectiles {
        /// Duration of simulated time covered by the advance.
        dt: Duration,
    },
    /// Integrates particle motion and fades particles out.
    AdvanceParticles {
        /// Duration of simulated time covered by the advance.
        dt: Duration,
    },
    /// Removes inactive entities and evaluates the game-over condition.
    Cleanup,
    /// Requests placement of a tower on the provided grid cell.
    PlaceTower {
        /// Cell that should host the tower.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a wave became active.
    WaveStarted {
        /// Number of the wave that started.
        wave: u32,
    },
    /// Announces that every enemy of a wave was spawned and cleared.
    WaveCompleted {
        /// Number of the wave that finished.
        completed: u32,
        /// Number of the wave that the next start request will launch.
        next: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Health the enemy spawned with.
        health: Health,
    },
    /// Reports that an enemy walked off the end of the path.
    EnemyEscaped {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
    },
    /// Reports that an enemy absorbed a projectile hit.
    EnemyDamaged {
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
        /// Damage applied by the hit.
        damage: u32,
        /// Health left after the hit.
        remaining: Health,
    },
    /// Reports that an enemy was destroyed by tower fire.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Money awarded for the kill.
        reward: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired the projectile.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Reports that a projectile lost its target and vanished without effect.
    ProjectileFizzled {
        /// Identifier of the projectile that fizzled.
        projectile: ProjectileId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell the tower occupies.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports the player's balance after it changed.
    MoneyChanged {
        /// Current balance.
        money: u32,
    },
    /// Reports the remaining lives after they changed.
    LivesChanged {
        /// Lives left.
        lives: u32,
    },
    /// Reports how many inactive entities were dropped during cleanup.
    EntitiesRemoved {
        /// Number of enemies removed.
        enemies: usize,
        /// Number of projectiles removed.
        projectiles: usize,
        /// Number of particles removed.
        particles: usize,
    },
    /// Announces that the player ran out of lives. No further simulation occurs.
    GameOver {
        /// Wave that was in progress when the game ended.
        wave: u32,
    },
}

/// Unique identifier assigned to an enemy.
///
/// Identifiers are allocated in spawn order, so sorting by identifier
/// reproduces insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the world-space centre of the cell for the provided tile length.
    #[must_use]
    pub fn center(self, tile_length: f32) -> WorldPoint {
        WorldPoint::new(
            self.column as f32 * tile_length + tile_length / 2.0,
            self.row as f32 * tile_length + tile_length / 2.0,
        )
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, growing downward like the grid rows.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle in radians of the vector pointing from `self` toward `other`.
    #[must_use]
    pub fn angle_to(self, other: WorldPoint) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// Hit points carried by an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a health value holding the provided hit points.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the health left after absorbing `amount` damage, clamped at zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Byte RGB colour attached to cosmetic effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl EffectColor {
    /// Burst emitted when a tower is built.
    pub const PLACEMENT: Self = Self::from_rgb(0x38, 0xbd, 0xf8);
    /// Burst emitted when a projectile hits an enemy.
    pub const DAMAGE: Self = Self::from_rgb(0xef, 0x44, 0x44);
    /// Burst emitted when an enemy is destroyed.
    pub const DEATH: Self = Self::from_rgb(0xfa, 0xcc, 0x15);

    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Reasons a tower placement request may be rejected by the world.
///
/// Variants are listed in the order the checks run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The session ended, so the map no longer accepts construction.
    GameOver,
    /// The player cannot afford the tower.
    InsufficientFunds,
    /// The requested cell lies outside the map.
    OutOfBounds,
    /// The requested cell lies on the enemy path.
    OnPath,
    /// Another tower already occupies the cell.
    Occupied,
}

/// Counters the UI collaborator displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionStatus {
    /// Current balance.
    pub money: u32,
    /// Lives left before the game ends.
    pub lives: u32,
    /// Wave number the next start request refers to, or the wave in progress.
    pub wave: u32,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current world-space position.
    pub position: WorldPoint,
    /// Remaining hit points.
    pub health: Health,
    /// Hit points the enemy spawned with.
    pub max_health: Health,
    /// Index of the waypoint the enemy most recently reached.
    pub path_index: usize,
    /// Liveness flag; inactive enemies await cleanup.
    pub active: bool,
}

impl EnemySnapshot {
    /// Fraction of health remaining in the range `0.0..=1.0`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health.is_depleted() {
            return 0.0;
        }
        self.health.get() as f32 / self.max_health.get() as f32
    }
}

/// Read-only snapshot describing all enemies on the map.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    ///
    /// Snapshots are ordered by identifier, which matches spawn order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the enemies that are still active.
    pub fn active(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.active)
    }

    /// Number of captured snapshots, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no enemies at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// World-space centre of the tower.
    pub position: WorldPoint,
    /// Targeting radius in world units.
    pub range: f32,
    /// Milliseconds left before the tower may fire. Zero or below means ready.
    pub cooldown_ms: f32,
    /// Facing angle in radians.
    pub facing: f32,
}

impl TowerSnapshot {
    /// Reports whether the cooldown elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown_ms <= 0.0
    }
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Current world-space position.
    pub position: WorldPoint,
    /// Enemy the projectile homes in on.
    pub target: EnemyId,
}

/// Immutable representation of a cosmetic particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSnapshot {
    /// Current world-space position.
    pub position: WorldPoint,
    /// Colour of the burst the particle belongs to.
    pub color: EffectColor,
    /// Remaining life in the range `0.0..=1.0`, usable as opacity.
    pub life: f32,
}

/// Target assignment produced by the targeting system for a single tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the nearest candidate within range.
    pub enemy: EnemyId,
    /// World-space centre of the tower.
    pub tower_position: WorldPoint,
    /// World-space position of the enemy when it was selected.
    pub enemy_position: WorldPoint,
    /// Distance between the tower and the enemy.
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, EnemyId, Health, PlacementError, TowerId, WorldPoint};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn cell_center_lies_in_the_middle_of_the_tile() {
        let center = CellCoord::new(2, 3).center(40.0);
        assert_eq!(center, WorldPoint::new(100.0, 140.0));
    }

    #[test]
    fn health_saturates_at_zero() {
        let health = Health::new(20);
        assert_eq!(health.damaged(15), Health::new(5));
        assert!(health.damaged(25).is_depleted());
        assert_eq!(health.damaged(25).damaged(10), Health::new(0));
    }

    #[test]
    fn angle_to_points_along_positive_axes() {
        let origin = WorldPoint::new(0.0, 0.0);
        assert!(origin.angle_to(WorldPoint::new(5.0, 0.0)).abs() < f32::EPSILON);
        let down = origin.angle_to(WorldPoint::new(0.0, 5.0));
        assert!((down - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&TowerId::new(42));
        assert_round_trip(&EnemyId::new(7));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::OnPath);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(19, 13));
    }
}
