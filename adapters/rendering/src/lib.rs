#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Neon Defence adapters.
//!
//! The simulation describes every frame as a [`Scene`] and hands it to a
//! [`Renderer`]. Counter changes and session milestones go to a separate
//! [`StatusReporter`] so user interfaces can update without redrawing.

use anyhow::Result as AnyResult;
use glam::Vec2;
use neon_defence_core::{CellCoord, EffectColor, PlacementError, SessionStatus, TowerId};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl From<EffectColor> for Color {
    fn from(color: EffectColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Describes the square tile grid the session is played on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
}

impl TileGridPresentation {
    /// Creates a new tile grid descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_length: f32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
        }
    }

    /// Converts a world-space position to fractional tile units.
    #[must_use]
    pub fn to_tiles(&self, position: Vec2) -> Vec2 {
        if self.tile_length <= f32::EPSILON {
            return Vec2::ZERO;
        }
        position / self.tile_length
    }
}

/// Immutable snapshot describing a tower placed within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTower {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// World-space centre of the tower.
    pub position: Vec2,
    /// Facing angle in radians.
    pub facing: f32,
    /// Targeting radius in world units.
    pub range: f32,
}

/// Enemy drawn as a body with a health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// World-space position.
    pub position: Vec2,
    /// Remaining health as a fraction of the spawn health.
    pub health_ratio: f32,
}

/// Fading particle belonging to a cosmetic burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticlePresentation {
    /// World-space position.
    pub position: Vec2,
    /// Burst color with the remaining life as alpha.
    pub color: Color,
}

/// Pointer hover preview for the next placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerPreview {
    /// Cell under the pointer.
    pub cell: CellCoord,
    /// Reason the world would reject a tower there, if any.
    pub rejection: Option<PlacementError>,
}

impl TowerPreview {
    /// Reports whether a tower could be placed on the previewed cell.
    #[must_use]
    pub const fn placeable(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Scene description combining the grid, the route and every entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the play area.
    pub tile_grid: TileGridPresentation,
    /// Waypoints of the enemy route expressed in world units.
    pub path: Vec<Vec2>,
    /// Towers placed on the map.
    pub towers: Vec<SceneTower>,
    /// Enemies that are still active.
    pub enemies: Vec<EnemyPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<Vec2>,
    /// Cosmetic particles that have not faded out.
    pub particles: Vec<ParticlePresentation>,
    /// Optional placement preview under the pointer.
    pub tower_preview: Option<TowerPreview>,
    /// Counters shown in the heads-up display.
    pub status: SessionStatus,
    /// Whether a wave is running.
    pub wave_active: bool,
    /// Whether the session ended.
    pub game_over: bool,
}

impl Scene {
    /// Creates an empty scene for the provided grid and route.
    #[must_use]
    pub fn new(tile_grid: TileGridPresentation, path: Vec<Vec2>, status: SessionStatus) -> Self {
        Self {
            tile_grid,
            path,
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            tower_preview: None,
            status,
            wave_active: false,
            game_over: false,
        }
    }
}

/// Rendering backend capable of presenting Neon Defence scenes.
pub trait Renderer {
    /// Draws a single frame.
    fn render(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Receiver of counter updates and session milestones.
pub trait StatusReporter {
    /// Publishes the latest money, lives and wave counters.
    fn report_state(&mut self, status: SessionStatus);

    /// Signals whether a start request would currently be honoured.
    fn wave_trigger_changed(&mut self, _enabled: bool) {}

    /// Announces that the session ended during `wave`.
    fn game_over(&mut self, _wave: u32) {}
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, scene: &Scene) -> AnyResult<()> {
        (**self).render(scene)
    }
}

impl<S: StatusReporter + ?Sized> StatusReporter for Box<S> {
    fn report_state(&mut self, status: SessionStatus) {
        (**self).report_state(status);
    }

    fn wave_trigger_changed(&mut self, enabled: bool) {
        (**self).wave_trigger_changed(enabled);
    }

    fn game_over(&mut self, wave: u32) {
        (**self).game_over(wave);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_colors_convert_to_opaque_channels() {
        let color = Color::from(EffectColor::DEATH);
        assert!((color.red - 0xfa as f32 / 255.0).abs() < f32::EPSILON);
        assert!((color.alpha - 1.0).abs() < f32::EPSILON);
        assert!((color.with_alpha(1.5).alpha - 1.0).abs() < f32::EPSILON);
        assert!((color.with_alpha(0.25).alpha - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn positions_convert_to_tile_units() {
        let grid = TileGridPresentation::new(20, 15, 40.0);
        assert_eq!(grid.to_tiles(Vec2::new(100.0, 60.0)), Vec2::new(2.5, 1.5));
        assert_eq!(
            TileGridPresentation::new(1, 1, 0.0).to_tiles(Vec2::ONE),
            Vec2::ZERO
        );
    }

    #[test]
    fn preview_is_placeable_without_rejection() {
        let preview = TowerPreview {
            cell: CellCoord::new(1, 1),
            rejection: None,
        };
        assert!(preview.placeable());
        let blocked = TowerPreview {
            rejection: Some(PlacementError::OnPath),
            ..preview
        };
        assert!(!blocked.placeable());
    }
}
