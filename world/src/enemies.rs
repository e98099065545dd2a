//! Enemy state and per-tick path following.

use glam::Vec2;
use neon_defence_core::{EnemyId, EnemySnapshot, Health, Path, WorldPoint};

/// Enemy stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) path_index: usize,
    pub(crate) health: Health,
    pub(crate) max_health: Health,
    pub(crate) speed: f32,
    pub(crate) active: bool,
}

/// Outcome of advancing an enemy by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnemyStep {
    /// The enemy is still travelling along the path.
    Travelling,
    /// The enemy stood on the exit and left the map.
    Escaped,
}

/// Outcome of a projectile hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DamageOutcome {
    pub(crate) remaining: Health,
    pub(crate) killed: bool,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, path: &Path, tile_length: f32, health: Health, speed: f32) -> Self {
        let start = path.spawn().center(tile_length);
        Self {
            id,
            position: Vec2::new(start.x, start.y),
            path_index: 0,
            health,
            max_health: health,
            speed,
            active: true,
        }
    }

    /// Moves toward the next waypoint, snapping onto it when the step covers
    /// the remaining distance.
    pub(crate) fn advance(&mut self, path: &Path, tile_length: f32, dt_ms: f32) -> EnemyStep {
        if self.path_index >= path.exit_index() {
            self.active = false;
            return EnemyStep::Escaped;
        }

        let Some(next) = path.point(self.path_index + 1, tile_length) else {
            self.active = false;
            return EnemyStep::Escaped;
        };
        let next = Vec2::new(next.x, next.y);

        let delta = next - self.position;
        let distance = delta.length();
        let step = self.speed * dt_ms;

        if distance <= step {
            self.position = next;
            self.path_index += 1;
        } else {
            self.position += delta / distance * step;
        }

        EnemyStep::Travelling
    }

    /// Applies damage. Returns `None` when the enemy is already inactive, so a
    /// dead enemy can never be killed twice.
    pub(crate) fn take_damage(&mut self, amount: u32) -> Option<DamageOutcome> {
        if !self.active {
            return None;
        }

        self.health = self.health.damaged(amount);
        let killed = self.health.is_depleted();
        if killed {
            self.active = false;
        }

        Some(DamageOutcome {
            remaining: self.health,
            killed,
        })
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: WorldPoint::new(self.position.x, self.position.y),
            health: self.health,
            max_health: self.max_health,
            path_index: self.path_index,
            active: self.active,
        }
    }
}
