#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven simulation loop for Neon Defence.
//!
//! A host calls [`Simulation::step`] once per display refresh with the time
//! that elapsed since the previous call. Each step runs the wave controller,
//! moves enemies, lets towers aim and fire, advances projectiles and
//! particles, removes inactive entities and finally hands a [`Scene`] to the
//! renderer. Counter changes are pushed to the [`StatusReporter`].

use std::time::Duration;

use anyhow::{Context, Result as AnyResult};
use glam::Vec2;
use log::{debug, trace};
use neon_defence_core::{
    Command, Event, Rules, RulesError, SessionStatus, TowerTarget, WorldPoint,
};
use neon_defence_rendering::{
    Color, EnemyPresentation, ParticlePresentation, Renderer, Scene, SceneTower, StatusReporter,
    TileGridPresentation, TowerPreview,
};
use neon_defence_system_builder::{cell_from_indices, Builder, BuilderInput};
use neon_defence_system_tower_combat::TowerCombat;
use neon_defence_system_tower_targeting::TowerTargeting;
use neon_defence_system_wave_control::{Config, WaveControl, WaveState};
use neon_defence_world::{self as world, query, World};

/// Owns the world, the systems and both collaborators for one session.
#[derive(Debug)]
pub struct Simulation<R, S> {
    world: World,
    wave_control: WaveControl,
    targeting: TowerTargeting,
    combat: TowerCombat,
    builder: Builder,
    renderer: R,
    reporter: S,
    commands: Vec<Command>,
    events: Vec<Event>,
    targets: Vec<TowerTarget>,
    reported: SessionStatus,
    cursor: Option<WorldPoint>,
    frame: u64,
}

impl<R, S> Simulation<R, S>
where
    R: Renderer,
    S: StatusReporter,
{
    /// Creates a session from `rules` and publishes the starting counters.
    pub fn new(rules: Rules, renderer: R, mut reporter: S) -> Result<Self, RulesError> {
        let world = World::new(rules)?;
        let rules = query::rules(&world);
        let wave_control = WaveControl::new(Config::from_rules(rules));
        let builder = Builder::new(&rules.map);

        let reported = query::status(&world);
        reporter.report_state(reported);
        reporter.wave_trigger_changed(true);

        Ok(Self {
            world,
            wave_control,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            builder,
            renderer,
            reporter,
            commands: Vec::new(),
            events: Vec::new(),
            targets: Vec::new(),
            reported,
            cursor: None,
            frame: 0,
        })
    }

    /// Advances the session by `elapsed` and renders the resulting frame.
    ///
    /// Once the game is over nothing moves, but frames are still rendered.
    pub fn step(&mut self, elapsed: Duration) -> AnyResult<()> {
        self.events.clear();

        if !query::is_game_over(&self.world) {
            self.wave_control
                .handle(elapsed, wave_state(&self.world), &mut self.commands);
            self.flush();

            self.apply(Command::Tick { dt: elapsed });

            let towers = query::tower_view(&self.world);
            let enemies = query::enemy_view(&self.world);
            self.targeting.handle(&towers, &enemies, &mut self.targets);
            self.combat.handle(towers, &self.targets, &mut self.commands);
            self.flush();

            self.apply(Command::AdvanceProjectiles { dt: elapsed });
            self.apply(Command::AdvanceParticles { dt: elapsed });
            self.apply(Command::Cleanup);
        }

        self.builder.handle(
            &self.events,
            BuilderInput::default(),
            |_| None,
            &mut self.commands,
        );

        self.frame += 1;
        trace!(
            "step: frame={} dt={}ms enemies={} events={}",
            self.frame,
            elapsed.as_millis(),
            query::enemy_count(&self.world),
            self.events.len()
        );

        self.publish();
        let scene = self.scene();
        self.renderer
            .render(&scene)
            .with_context(|| format!("failed to render frame {}", self.frame))
    }

    /// Handles the wave trigger. Ignored while a wave runs or after game over.
    pub fn start_wave(&mut self) {
        self.events.clear();
        self.wave_control
            .start_wave(wave_state(&self.world), &mut self.commands);
        self.flush();
        self.publish();
    }

    /// Requests a tower on the cell at (`column`, `row`).
    ///
    /// Rejected requests change nothing; the reason is only logged and
    /// reported through [`Simulation::last_events`].
    pub fn request_placement(&mut self, column: i64, row: i64) {
        self.events.clear();
        let Some(cell) = cell_from_indices(column, row) else {
            debug!("ignoring placement request at ({column}, {row})");
            return;
        };
        self.apply(Command::PlaceTower { cell });
        self.publish();
    }

    /// Places a tower on the cell beneath a pointer press, if it is buildable.
    pub fn pointer_pressed(&mut self, point: WorldPoint) {
        self.events.clear();
        self.cursor = Some(point);
        let world = &self.world;
        self.builder.handle(
            &[],
            BuilderInput::new(true, Some(point)),
            |cell| query::placement_rejection(world, cell),
            &mut self.commands,
        );
        self.flush();
        self.publish();
    }

    /// Updates the pointer position used for the placement preview.
    pub fn pointer_moved(&mut self, point: Option<WorldPoint>) {
        self.cursor = point;
    }

    /// Reports whether a wave is currently running.
    #[must_use]
    pub fn is_wave_active(&self) -> bool {
        query::is_wave_active(&self.world)
    }

    /// Reports whether the session ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::is_game_over(&self.world)
    }

    /// Current money, lives and wave counters.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        query::status(&self.world)
    }

    /// Read access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read access to the wave controller.
    #[must_use]
    pub fn wave_control(&self) -> &WaveControl {
        &self.wave_control
    }

    /// Events produced by the most recent operation.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Number of frames stepped so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Read access to the renderer collaborator.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Read access to the status collaborator.
    #[must_use]
    pub fn reporter(&self) -> &S {
        &self.reporter
    }

    /// Describes the current state of the session for drawing.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let rules = query::rules(&self.world);
        let tile_length = rules.map.tile_length;
        let grid = TileGridPresentation::new(rules.map.columns, rules.map.rows, tile_length);
        let path = query::path(&self.world)
            .waypoints()
            .iter()
            .map(|cell| vec2(cell.center(tile_length)))
            .collect();

        let mut scene = Scene::new(grid, path, query::status(&self.world));
        scene.wave_active = query::is_wave_active(&self.world);
        scene.game_over = query::is_game_over(&self.world);

        scene.towers = query::tower_view(&self.world)
            .iter()
            .map(|tower| SceneTower {
                id: tower.id,
                cell: tower.cell,
                position: vec2(tower.position),
                facing: tower.facing,
                range: tower.range,
            })
            .collect();
        scene.enemies = query::enemy_view(&self.world)
            .active()
            .map(|enemy| EnemyPresentation {
                position: vec2(enemy.position),
                health_ratio: enemy.health_ratio(),
            })
            .collect();
        scene.projectiles = query::projectiles(&self.world)
            .iter()
            .map(|projectile| vec2(projectile.position))
            .collect();
        scene.particles = query::particles(&self.world)
            .iter()
            .map(|particle| ParticlePresentation {
                position: vec2(particle.position),
                color: Color::from(particle.color).with_alpha(particle.life),
            })
            .collect();
        scene.tower_preview = self
            .builder
            .preview(self.cursor, |cell| {
                query::placement_rejection(&self.world, cell)
            })
            .map(|preview| TowerPreview {
                cell: preview.cell,
                rejection: preview.rejection,
            });

        scene
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn publish(&mut self) {
        let status = query::status(&self.world);
        if status != self.reported {
            self.reported = status;
            self.reporter.report_state(status);
        }

        for event in &self.events {
            match *event {
                Event::WaveStarted { .. } => self.reporter.wave_trigger_changed(false),
                Event::WaveCompleted { .. } => self.reporter.wave_trigger_changed(true),
                Event::GameOver { wave } => self.reporter.game_over(wave),
                _ => {}
            }
        }
    }
}

fn wave_state(world: &World) -> WaveState {
    WaveState {
        wave: query::status(world).wave,
        active: query::is_wave_active(world),
        game_over: query::is_game_over(world),
        enemies_alive: query::enemy_count(world),
    }
}

fn vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}
