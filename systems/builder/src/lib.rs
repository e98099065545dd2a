#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system that turns pointer input into tower placement commands.

use neon_defence_core::{CellCoord, Command, Event, MapRules, PlacementError, WorldPoint};

/// Declarative placement preview describing a potential tower construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Cell the tower would occupy.
    pub cell: CellCoord,
    /// Indicates whether the preview represents a valid placement location.
    pub placeable: bool,
    /// Reason the placement would fail, if any.
    pub rejection: Option<PlacementError>,
}

impl PlacementPreview {
    /// Creates a preview for `cell` from the world's verdict on it.
    #[must_use]
    pub const fn new(cell: CellCoord, rejection: Option<PlacementError>) -> Self {
        Self {
            cell,
            placeable: rejection.is_none(),
            rejection,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Indicates whether the player confirmed a placement on this frame.
    pub confirm_action: bool,
    /// Pointer position in world units, if the pointer is over the map.
    pub cursor: Option<WorldPoint>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(confirm_action: bool, cursor: Option<WorldPoint>) -> Self {
        Self {
            confirm_action,
            cursor,
        }
    }
}

/// Placement system that maps pointer positions onto grid cells.
#[derive(Debug, Clone)]
pub struct Builder {
    columns: u32,
    rows: u32,
    tile_length: f32,
    game_over: bool,
}

impl Builder {
    /// Creates a builder for the grid described by `map`.
    #[must_use]
    pub fn new(map: &MapRules) -> Self {
        Self {
            columns: map.columns,
            rows: map.rows,
            tile_length: map.tile_length,
            game_over: false,
        }
    }

    /// Translates a world-space point into the grid cell beneath it.
    ///
    /// Points left of or above the map, or past its far edges, yield `None`.
    #[must_use]
    pub fn cell_at(&self, point: WorldPoint) -> Option<CellCoord> {
        if !(point.x.is_finite() && point.y.is_finite()) || self.tile_length <= 0.0 {
            return None;
        }

        let column = (point.x / self.tile_length).floor();
        let row = (point.y / self.tile_length).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }

        Some(CellCoord::new(column as u32, row as u32))
    }

    /// Builds the preview shown under the pointer.
    ///
    /// The `rejection` closure should mirror the semantics of the world's
    /// `query::placement_rejection` helper.
    pub fn preview<F>(&self, cursor: Option<WorldPoint>, rejection: F) -> Option<PlacementPreview>
    where
        F: FnOnce(CellCoord) -> Option<PlacementError>,
    {
        let cell = cursor.and_then(|point| self.cell_at(point))?;
        Some(PlacementPreview::new(cell, rejection(cell)))
    }

    /// Consumes world events and adapter-derived input to emit placement commands.
    ///
    /// Nothing is emitted after the world announced the end of the session or
    /// when the hovered cell would be rejected.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        rejection: F,
        out: &mut Vec<Command>,
    ) where
        F: FnOnce(CellCoord) -> Option<PlacementError>,
    {
        for event in events {
            if let Event::GameOver { .. } = event {
                self.game_over = true;
            }
        }

        if self.game_over || !input.confirm_action {
            return;
        }

        if let Some(preview) = self.preview(input.cursor, rejection) {
            if preview.placeable {
                out.push(Command::PlaceTower { cell: preview.cell });
            }
        }
    }
}

/// Converts signed grid indices into a cell.
///
/// Negative indices cannot name a cell and yield `None`. Indices past the
/// map edge are kept so the world can report them as out of bounds.
#[must_use]
pub fn cell_from_indices(column: i64, row: i64) -> Option<CellCoord> {
    let column = u32::try_from(column).ok()?;
    let row = u32::try_from(row).ok()?;
    Some(CellCoord::new(column, row))
}
