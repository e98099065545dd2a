//! Plain-text collaborators for headless runs.

use std::{
    f32::consts::FRAC_PI_2,
    io::{self, Write},
};

use anyhow::{Context, Result as AnyResult};
use log::{debug, info, warn};
use neon_defence_core::SessionStatus;
use neon_defence_rendering::{Renderer, Scene, StatusReporter};

/// Draws every `every`-th frame as an ASCII grid.
#[derive(Debug)]
pub(crate) struct TextRenderer<W> {
    out: W,
    every: u32,
    frames: u32,
}

impl<W: Write> TextRenderer<W> {
    /// Creates a renderer writing to `out`. Zero disables periodic frames.
    pub(crate) fn new(out: W, every: u32) -> Self {
        Self {
            out,
            every,
            frames: 0,
        }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, scene: &Scene) -> AnyResult<()> {
        self.frames = self.frames.saturating_add(1);
        if self.every == 0 || self.frames % self.every != 0 {
            return Ok(());
        }

        writeln!(self.out, "frame {}", self.frames).context("failed to write frame header")?;
        draw(&mut self.out, scene).context("failed to write frame")
    }
}

/// Writes `scene` as rows of characters followed by a status line.
///
/// `#` path, `+` particle, `o`/`x` placement preview (buildable or not),
/// `>` `v` `<` `^` tower pointing along its facing, `E` enemy (`e` below
/// half health), `*` projectile.
pub(crate) fn draw<W: Write>(out: &mut W, scene: &Scene) -> io::Result<()> {
    let grid = &scene.tile_grid;
    let columns = grid.columns as usize;
    let rows = grid.rows as usize;
    let mut cells = vec![vec!['.'; columns]; rows];

    let mut put = |x: f32, y: f32, glyph: char| {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (column, row) = (x as usize, y as usize);
        if let Some(cell) = cells.get_mut(row).and_then(|line| line.get_mut(column)) {
            *cell = glyph;
        }
    };

    for segment in scene.path.windows(2) {
        let from = grid.to_tiles(segment[0]).floor();
        let to = grid.to_tiles(segment[1]).floor();
        let steps = (to - from).abs().max_element() as usize;
        for step in 0..=steps {
            let t = if steps == 0 {
                0.0
            } else {
                step as f32 / steps as f32
            };
            let point = from.lerp(to, t).round();
            put(point.x, point.y, '#');
        }
    }
    if let [single] = scene.path.as_slice() {
        let point = grid.to_tiles(*single);
        put(point.x, point.y, '#');
    }
    for particle in &scene.particles {
        let point = grid.to_tiles(particle.position);
        put(point.x, point.y, '+');
    }
    if let Some(preview) = scene.tower_preview {
        let glyph = if preview.placeable() { 'o' } else { 'x' };
        put(preview.cell.column() as f32, preview.cell.row() as f32, glyph);
    }
    for tower in &scene.towers {
        let glyph = facing_glyph(tower.facing);
        put(tower.cell.column() as f32, tower.cell.row() as f32, glyph);
    }
    for enemy in &scene.enemies {
        let point = grid.to_tiles(enemy.position);
        let glyph = if enemy.health_ratio < 0.5 { 'e' } else { 'E' };
        put(point.x, point.y, glyph);
    }
    for projectile in &scene.projectiles {
        let point = grid.to_tiles(*projectile);
        put(point.x, point.y, '*');
    }

    for line in &cells {
        writeln!(out, "{}", line.iter().collect::<String>())?;
    }

    let status = scene.status;
    write!(
        out,
        "money {} | lives {} | wave {}",
        status.money, status.lives, status.wave
    )?;
    if scene.wave_active {
        write!(out, " (in progress)")?;
    }
    if scene.game_over {
        write!(out, " | GAME OVER")?;
    }
    writeln!(out)
}

/// Arrow for `facing` snapped to the nearest axis. World y grows downward.
fn facing_glyph(facing: f32) -> char {
    let quarter = (facing / FRAC_PI_2).round() as i32;
    match quarter.rem_euclid(4) {
        0 => '>',
        1 => 'v',
        2 => '<',
        _ => '^',
    }
}

/// Reports counter changes and milestones through the log.
#[derive(Debug, Default)]
pub(crate) struct LogReporter {
    last: Option<SessionStatus>,
}

impl LogReporter {
    /// Most recent counters received.
    pub(crate) fn last(&self) -> Option<SessionStatus> {
        self.last
    }
}

impl StatusReporter for LogReporter {
    fn report_state(&mut self, status: SessionStatus) {
        info!(
            "money {} | lives {} | wave {}",
            status.money, status.lives, status.wave
        );
        self.last = Some(status);
    }

    fn wave_trigger_changed(&mut self, enabled: bool) {
        debug!("wave trigger {}", if enabled { "enabled" } else { "disabled" });
    }

    fn game_over(&mut self, wave: u32) {
        warn!("game over in wave {wave}");
    }
}
