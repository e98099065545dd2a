#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave controller that paces enemy spawns and closes finished waves.
//!
//! The controller moves through three phases: idle until a start request
//! arrives, spawning while enemies remain to be released, and waiting for
//! the map to clear before the world advances the wave counter.

use std::time::Duration;

use log::debug;
use neon_defence_core::{Command, EnemyRules, Health, Rules, WaveRules};

/// Configuration parameters required to construct the wave controller.
#[derive(Clone, Debug)]
pub struct Config {
    wave: WaveRules,
    enemy: EnemyRules,
}

impl Config {
    /// Creates a configuration from wave sizing and enemy toughness rules.
    #[must_use]
    pub const fn new(wave: WaveRules, enemy: EnemyRules) -> Self {
        Self { wave, enemy }
    }

    /// Extracts the relevant sections from a complete rule set.
    #[must_use]
    pub fn from_rules(rules: &Rules) -> Self {
        Self::new(rules.wave.clone(), rules.enemy.clone())
    }
}

/// Wave bookkeeping owned by the world that the controller reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveState {
    /// Number of the current (or next) wave.
    pub wave: u32,
    /// Whether a wave is running.
    pub active: bool,
    /// Whether the session ended.
    pub game_over: bool,
    /// Number of enemies still in the world's collection.
    pub enemies_alive: usize,
}

/// Phase the controller is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a start request.
    Idle,
    /// Releasing enemies at the configured interval.
    Spawning,
    /// Every enemy was released; waiting for the map to clear.
    AwaitingClear,
}

/// System that emits wave transition and spawn commands.
#[derive(Debug)]
pub struct WaveControl {
    config: Config,
    enemies_to_spawn: u32,
    spawn_timer_ms: f32,
}

impl WaveControl {
    /// Creates a new idle wave controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            enemies_to_spawn: 0,
            spawn_timer_ms: 0.0,
        }
    }

    /// Enemies the current wave has yet to release.
    #[must_use]
    pub fn enemies_to_spawn(&self) -> u32 {
        self.enemies_to_spawn
    }

    /// Milliseconds until the next spawn. Zero or below means the next tick spawns.
    #[must_use]
    pub fn spawn_timer_ms(&self) -> f32 {
        self.spawn_timer_ms
    }

    /// Derives the current phase from the world's wave state.
    #[must_use]
    pub fn phase(&self, state: WaveState) -> Phase {
        if !state.active {
            Phase::Idle
        } else if self.enemies_to_spawn > 0 {
            Phase::Spawning
        } else {
            Phase::AwaitingClear
        }
    }

    /// Handles a start request. Does nothing while a wave is running or once
    /// the game is over, so repeated requests are harmless.
    pub fn start_wave(&mut self, state: WaveState, out: &mut Vec<Command>) {
        if state.active || state.game_over {
            debug!("ignoring start request for wave {}", state.wave);
            return;
        }

        self.enemies_to_spawn = self.config.wave.size_of(state.wave);
        self.spawn_timer_ms = 0.0;
        out.push(Command::BeginWave);
    }

    /// Advances the spawn timer by `dt` and emits spawn or completion commands.
    ///
    /// At most one enemy spawns per call. The wave completes only when every
    /// enemy was released and the world reports an empty collection.
    pub fn handle(&mut self, dt: Duration, state: WaveState, out: &mut Vec<Command>) {
        if state.game_over {
            return;
        }

        match self.phase(state) {
            Phase::Idle => {}
            Phase::Spawning => {
                self.spawn_timer_ms -= dt.as_secs_f32() * 1_000.0;
                if self.spawn_timer_ms <= 0.0 {
                    let health = Health::new(self.config.enemy.health_at(state.wave));
                    out.push(Command::SpawnEnemy { health });
                    self.enemies_to_spawn -= 1;
                    self.spawn_timer_ms = self.config.wave.spawn_interval_ms;
                }
            }
            Phase::AwaitingClear => {
                if state.enemies_alive == 0 {
                    out.push(Command::FinishWave);
                }
            }
        }
    }
}
