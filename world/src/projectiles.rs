//! Homing projectiles fired by towers.

use glam::Vec2;
use neon_defence_core::{EnemyId, ProjectileId, ProjectileSnapshot, WorldPoint};

/// Projectile stored inside the world.
///
/// The target is a handle into the enemy collection, resolved every tick;
/// the projectile never keeps its enemy alive.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) position: Vec2,
    pub(crate) target: EnemyId,
    pub(crate) speed: f32,
    pub(crate) damage: u32,
    pub(crate) active: bool,
}

/// Outcome of advancing a projectile by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProjectileStep {
    /// Target gone or inactive; the projectile vanished without effect.
    Fizzled,
    /// Still homing in on the target.
    InFlight,
    /// Reached the target this tick and should apply its damage.
    Hit,
}

impl Projectile {
    /// Advances toward the target's current position.
    ///
    /// `target` is the target's position when it is still active, `None`
    /// otherwise.
    pub(crate) fn advance(&mut self, target: Option<Vec2>, dt_ms: f32) -> ProjectileStep {
        let Some(target) = target else {
            self.active = false;
            return ProjectileStep::Fizzled;
        };

        let delta = target - self.position;
        let distance = delta.length();
        let step = self.speed * dt_ms;

        if distance <= step {
            self.position = target;
            self.active = false;
            return ProjectileStep::Hit;
        }

        self.position += delta / distance * step;
        ProjectileStep::InFlight
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: WorldPoint::new(self.position.x, self.position.y),
            target: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile() -> Projectile {
        Projectile {
            id: ProjectileId::new(1),
            position: Vec2::ZERO,
            target: EnemyId::new(3),
            speed: 0.4,
            damage: 10,
            active: true,
        }
    }

    #[test]
    fn homes_toward_the_current_target_position() {
        let mut projectile = projectile();
        let step = projectile.advance(Some(Vec2::new(100.0, 0.0)), 100.0);
        assert_eq!(step, ProjectileStep::InFlight);
        assert!((projectile.position.x - 40.0).abs() < 1e-4);

        let step = projectile.advance(Some(Vec2::new(40.0, 100.0)), 100.0);
        assert_eq!(step, ProjectileStep::InFlight);
        assert!((projectile.position.x - 40.0).abs() < 1e-4);
        assert!((projectile.position.y - 40.0).abs() < 1e-4);
    }

    #[test]
    fn hits_when_the_step_covers_the_distance() {
        let mut projectile = projectile();
        let step = projectile.advance(Some(Vec2::new(3.0, 4.0)), 16.0);
        assert_eq!(step, ProjectileStep::Hit);
        assert!(!projectile.active);
    }

    #[test]
    fn fizzles_without_a_live_target() {
        let mut projectile = projectile();
        assert_eq!(projectile.advance(None, 16.0), ProjectileStep::Fizzled);
        assert!(!projectile.active);
    }
}
