#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Neon Defence.
//!
//! The [`World`] owns the economy counters and every entity collection.
//! It only changes through [`apply`], which executes a [`Command`] and
//! reports the resulting [`Event`] values. Read access goes through the
//! [`query`] module.

use std::time::Duration;

use glam::Vec2;
use log::{debug, info, warn};
use neon_defence_core::{
    CellCoord, Command, EffectColor, EnemyId, Event, Health, Path, PlacementError, ProjectileId,
    Rules, RulesError, TowerId, WorldPoint, WELCOME_BANNER,
};

mod enemies;
mod particles;
mod projectiles;
mod towers;

use enemies::{Enemy, EnemyStep};
use particles::{Particle, ParticleEmitter};
use projectiles::{Projectile, ProjectileStep};
use towers::TowerRegistry;

/// Represents the authoritative Neon Defence session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    rules: Rules,
    path: Path,
    money: u32,
    lives: u32,
    wave: u32,
    wave_active: bool,
    game_over: bool,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    particles: Vec<Particle>,
    emitter: ParticleEmitter,
    next_enemy_id: EnemyId,
    next_projectile_id: ProjectileId,
}

impl World {
    /// Creates a new session configured by the provided rules.
    pub fn new(rules: Rules) -> Result<Self, RulesError> {
        let path = rules.validate()?;
        Ok(Self {
            banner: WELCOME_BANNER,
            path,
            money: rules.economy.starting_money,
            lives: rules.economy.starting_lives,
            wave: 1,
            wave_active: false,
            game_over: false,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            emitter: ParticleEmitter::new(rules.effects.seed, rules.effects.decay),
            next_enemy_id: EnemyId::new(0),
            next_projectile_id: ProjectileId::new(0),
            rules,
        })
    }

    fn tile_length(&self) -> f32 {
        self.rules.map.tile_length
    }

    /// Binary search is valid because identifiers grow monotonically and
    /// cleanup preserves order.
    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&enemy, |candidate| candidate.id)
            .ok()
    }

    fn active_enemy_position(&self, enemy: EnemyId) -> Option<Vec2> {
        self.enemy_index(enemy)
            .map(|index| &self.enemies[index])
            .filter(|candidate| candidate.active)
            .map(|candidate| candidate.position)
    }

    fn placement_rejection(&self, cell: CellCoord) -> Option<PlacementError> {
        if self.game_over {
            return Some(PlacementError::GameOver);
        }
        if self.money < self.rules.economy.tower_cost {
            return Some(PlacementError::InsufficientFunds);
        }
        if cell.column() >= self.rules.map.columns || cell.row() >= self.rules.map.rows {
            return Some(PlacementError::OutOfBounds);
        }
        if self.path.contains(cell) {
            return Some(PlacementError::OnPath);
        }
        if self.towers.occupant(cell).is_some() {
            return Some(PlacementError::Occupied);
        }
        None
    }

    fn spawn_enemy(&mut self, health: Health, out_events: &mut Vec<Event>) {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        let enemy = Enemy::spawn(
            id,
            &self.path,
            self.rules.map.tile_length,
            health,
            self.rules.enemy.speed,
        );
        self.enemies.push(enemy);
        out_events.push(Event::EnemySpawned { enemy: id, health });
    }

    fn advance_enemies(&mut self, dt_ms: f32, out_events: &mut Vec<Event>) {
        let tile_length = self.rules.map.tile_length;
        let mut escaped = 0_u32;
        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.active) {
            if enemy.advance(&self.path, tile_length, dt_ms) == EnemyStep::Escaped {
                escaped += 1;
                out_events.push(Event::EnemyEscaped { enemy: enemy.id });
            }
        }

        if escaped > 0 {
            self.lives = self.lives.saturating_sub(escaped);
            out_events.push(Event::LivesChanged { lives: self.lives });
        }
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        if self.active_enemy_position(target).is_none() {
            return;
        }
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if !state.is_ready() {
            return;
        }
        state.cooldown_ms = state.fire_rate_ms;
        let origin = state.position;

        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        self.projectiles.push(Projectile {
            id,
            position: origin,
            target,
            speed: self.rules.tower.projectile_speed,
            damage: self.rules.tower.projectile_damage,
            active: true,
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            tower,
            target,
        });
    }

    fn advance_projectiles(&mut self, dt_ms: f32, out_events: &mut Vec<Event>) {
        let mut projectiles = std::mem::take(&mut self.projectiles);
        for projectile in projectiles.iter_mut().filter(|projectile| projectile.active) {
            let target = self.active_enemy_position(projectile.target);
            match projectile.advance(target, dt_ms) {
                ProjectileStep::InFlight => {}
                ProjectileStep::Fizzled => {
                    out_events.push(Event::ProjectileFizzled {
                        projectile: projectile.id,
                    });
                }
                ProjectileStep::Hit => {
                    self.damage_enemy(projectile.target, projectile.damage, out_events);
                }
            }
        }
        self.projectiles = projectiles;
    }

    fn damage_enemy(&mut self, enemy: EnemyId, damage: u32, out_events: &mut Vec<Event>) {
        let Some(index) = self.enemy_index(enemy) else {
            return;
        };
        let target = &mut self.enemies[index];
        let Some(outcome) = target.take_damage(damage) else {
            return;
        };
        let position = target.position;

        let effects = &self.rules.effects;
        self.emitter.burst(
            position,
            effects.damage_burst,
            EffectColor::DAMAGE,
            &mut self.particles,
        );
        out_events.push(Event::EnemyDamaged {
            enemy,
            damage,
            remaining: outcome.remaining,
        });

        if outcome.killed {
            let reward = self.rules.economy.kill_reward;
            self.money = self.money.saturating_add(reward);
            self.emitter.burst(
                position,
                effects.death_burst,
                EffectColor::DEATH,
                &mut self.particles,
            );
            out_events.push(Event::EnemyKilled { enemy, reward });
            out_events.push(Event::MoneyChanged { money: self.money });
        }
    }

    fn place_tower(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if let Some(reason) = self.placement_rejection(cell) {
            debug!(
                "rejected tower at ({}, {}): {reason:?}",
                cell.column(),
                cell.row()
            );
            out_events.push(Event::TowerPlacementRejected { cell, reason });
            return;
        }

        self.money -= self.rules.economy.tower_cost;
        let tower = self.towers.insert(
            cell,
            self.rules.map.tile_length,
            self.rules.tower_range(),
            self.rules.tower.fire_rate_ms,
        );

        let center = cell.center(self.tile_length());
        self.emitter.burst(
            Vec2::new(center.x, center.y),
            self.rules.effects.placement_burst,
            EffectColor::PLACEMENT,
            &mut self.particles,
        );
        out_events.push(Event::TowerPlaced { tower, cell });
        out_events.push(Event::MoneyChanged { money: self.money });
    }

    fn cleanup(&mut self, out_events: &mut Vec<Event>) {
        let before = (
            self.enemies.len(),
            self.projectiles.len(),
            self.particles.len(),
        );
        self.enemies.retain(|enemy| enemy.active);
        self.projectiles.retain(|projectile| projectile.active);
        self.particles.retain(|particle| particle.active);

        let removed = (
            before.0 - self.enemies.len(),
            before.1 - self.projectiles.len(),
            before.2 - self.particles.len(),
        );
        if removed != (0, 0, 0) {
            out_events.push(Event::EntitiesRemoved {
                enemies: removed.0,
                projectiles: removed.1,
                particles: removed.2,
            });
        }

        if self.lives == 0 {
            self.game_over = true;
            self.wave_active = false;
            warn!("game over during wave {}", self.wave);
            out_events.push(Event::GameOver { wave: self.wave });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the game is over every command is ignored; placement requests still
/// report their rejection.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.game_over {
        if let Command::PlaceTower { cell } = command {
            out_events.push(Event::TowerPlacementRejected {
                cell,
                reason: PlacementError::GameOver,
            });
        }
        return;
    }

    match command {
        Command::BeginWave => {
            if world.wave_active {
                return;
            }
            world.wave_active = true;
            info!("wave {} started", world.wave);
            out_events.push(Event::WaveStarted { wave: world.wave });
        }
        Command::SpawnEnemy { health } => world.spawn_enemy(health, out_events),
        Command::FinishWave => {
            if !world.wave_active {
                return;
            }
            let completed = world.wave;
            world.wave_active = false;
            world.wave = world.wave.saturating_add(1);
            info!("wave {completed} cleared");
            out_events.push(Event::WaveCompleted {
                completed,
                next: world.wave,
            });
        }
        Command::Tick { dt } => {
            let dt_ms = millis(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_enemies(dt_ms, out_events);
            for tower in world.towers.iter_mut() {
                tower.cool_down(dt_ms);
            }
        }
        Command::AimTower { tower, enemy } => {
            let Some(target) = world.active_enemy_position(enemy) else {
                return;
            };
            if let Some(state) = world.towers.get_mut(tower) {
                let from = WorldPoint::new(state.position.x, state.position.y);
                state.facing = from.angle_to(WorldPoint::new(target.x, target.y));
            }
        }
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::AdvanceProjectiles { dt } => world.advance_projectiles(millis(dt), out_events),
        Command::AdvanceParticles { dt } => {
            let dt_ms = millis(dt);
            for particle in world.particles.iter_mut().filter(|particle| particle.active) {
                particle.advance(dt_ms);
            }
        }
        Command::Cleanup => world.cleanup(out_events),
        Command::PlaceTower { cell } => world.place_tower(cell, out_events),
    }
}

fn millis(dt: Duration) -> f32 {
    dt.as_secs_f32() * 1_000.0
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use neon_defence_core::{
        CellCoord, EnemyView, ParticleSnapshot, Path, PlacementError, ProjectileSnapshot, Rules,
        SessionStatus, TowerId, TowerSnapshot, TowerView,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the rules the session runs with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Provides read-only access to the enemy route.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Counters displayed by the UI collaborator.
    #[must_use]
    pub fn status(world: &World) -> SessionStatus {
        SessionStatus {
            money: world.money,
            lives: world.lives,
            wave: world.wave,
        }
    }

    /// Reports whether a wave is currently running.
    #[must_use]
    pub fn is_wave_active(world: &World) -> bool {
        world.wave_active
    }

    /// Reports whether the player ran out of lives.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Number of enemies in the collection, including those awaiting cleanup.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the enemies on the map in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Snapshot of a single tower, if it exists.
    #[must_use]
    pub fn tower(world: &World, tower: TowerId) -> Option<TowerSnapshot> {
        world.towers.get(tower).map(|state| state.snapshot())
    }

    /// Number of towers placed so far.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.towers.len()
    }

    /// Identifies the tower occupying the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.occupant(cell)
    }

    /// Reports why a tower could not be placed on `cell` right now, or `None`
    /// when placement would succeed.
    #[must_use]
    pub fn placement_rejection(world: &World, cell: CellCoord) -> Option<PlacementError> {
        world.placement_rejection(cell)
    }

    /// Active projectiles currently in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .filter(|projectile| projectile.active)
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Active cosmetic particles.
    #[must_use]
    pub fn particles(world: &World) -> Vec<ParticleSnapshot> {
        world
            .particles
            .iter()
            .filter(|particle| particle.active)
            .map(|particle| particle.snapshot())
            .collect()
    }
}
