//! Cosmetic particle bursts.

use std::f32::consts::TAU;

use glam::Vec2;
use neon_defence_core::{EffectColor, ParticleSnapshot, WorldPoint};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Baseline frame length the decay rate is expressed against.
const DECAY_BASELINE_MS: f32 = 16.0;
const MIN_SPEED: f32 = 0.05;
const MAX_SPEED: f32 = 0.15;

#[derive(Clone, Debug)]
pub(crate) struct Particle {
    position: Vec2,
    velocity: Vec2,
    color: EffectColor,
    life: f32,
    decay: f32,
    pub(crate) active: bool,
}

impl Particle {
    pub(crate) fn advance(&mut self, dt_ms: f32) {
        self.position += self.velocity * dt_ms;
        self.life -= self.decay * (dt_ms / DECAY_BASELINE_MS);
        if self.life <= 0.0 {
            self.active = false;
        }
    }

    pub(crate) fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            position: WorldPoint::new(self.position.x, self.position.y),
            color: self.color,
            life: self.life.clamp(0.0, 1.0),
        }
    }
}

/// Seeded scatter generator so replays produce identical bursts.
#[derive(Debug)]
pub(crate) struct ParticleEmitter {
    rng: ChaCha8Rng,
    decay: f32,
}

impl ParticleEmitter {
    pub(crate) fn new(seed: u64, decay: f32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            decay,
        }
    }

    /// Pushes `count` particles scattering from `origin` in random directions.
    pub(crate) fn burst(
        &mut self,
        origin: Vec2,
        count: u32,
        color: EffectColor,
        out: &mut Vec<Particle>,
    ) {
        out.reserve(count as usize);
        for _ in 0..count {
            let angle = self.rng.gen::<f32>() * TAU;
            let speed = self.rng.gen_range(MIN_SPEED..MAX_SPEED);
            out.push(Particle {
                position: origin,
                velocity: Vec2::from_angle(angle) * speed,
                color,
                life: 1.0,
                decay: self.decay,
                active: true,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bursts_are_reproducible_for_a_seed() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        ParticleEmitter::new(9, 0.02).burst(Vec2::ZERO, 5, EffectColor::DEATH, &mut first);
        ParticleEmitter::new(9, 0.02).burst(Vec2::ZERO, 5, EffectColor::DEATH, &mut second);

        assert_eq!(first.len(), 5);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.velocity, b.velocity);
            let speed = a.velocity.length();
            assert!((MIN_SPEED - 1e-4..MAX_SPEED + 1e-4).contains(&speed));
        }
    }

    #[test]
    fn life_decays_relative_to_a_sixteen_millisecond_frame() {
        let mut particles = Vec::new();
        ParticleEmitter::new(1, 0.25).burst(Vec2::ZERO, 1, EffectColor::DAMAGE, &mut particles);
        let particle = &mut particles[0];

        particle.advance(32.0);
        assert!((particle.life - 0.5).abs() < 1e-6);
        assert!(particle.active);

        particle.advance(32.0);
        assert!(!particle.active);
        assert_eq!(particle.snapshot().life, 0.0);
    }
}
