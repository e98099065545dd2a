//! Waypoint route followed by enemies.

use thiserror::Error;

use crate::{CellCoord, WorldPoint};

/// Reasons a waypoint list cannot form a path.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The path contains no waypoints.
    #[error("path requires at least one waypoint")]
    Empty,
    /// A waypoint lies outside the configured grid.
    #[error("waypoint {index} at ({column}, {row}) lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Position of the offending waypoint in the list.
        index: usize,
        /// Column of the offending waypoint.
        column: u32,
        /// Row of the offending waypoint.
        row: u32,
        /// Number of grid columns.
        columns: u32,
        /// Number of grid rows.
        rows: u32,
    },
}

/// Ordered, immutable list of waypoints from spawn to exit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    waypoints: Vec<CellCoord>,
}

impl Path {
    /// Builds a path from the provided waypoints, validating them against the grid.
    pub fn new(waypoints: Vec<CellCoord>, columns: u32, rows: u32) -> Result<Self, PathError> {
        if waypoints.is_empty() {
            return Err(PathError::Empty);
        }

        if let Some((index, cell)) = waypoints
            .iter()
            .enumerate()
            .find(|(_, cell)| cell.column() >= columns || cell.row() >= rows)
        {
            return Err(PathError::OutOfBounds {
                index,
                column: cell.column(),
                row: cell.row(),
                columns,
                rows,
            });
        }

        Ok(Self { waypoints })
    }

    /// Waypoints in traversal order.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// Cell where enemies enter the map.
    #[must_use]
    pub fn spawn(&self) -> CellCoord {
        self.waypoints[0]
    }

    /// Index of the final waypoint.
    #[must_use]
    pub fn exit_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// World-space centre of the waypoint at `index`, if it exists.
    #[must_use]
    pub fn point(&self, index: usize, tile_length: f32) -> Option<WorldPoint> {
        self.waypoints
            .get(index)
            .map(|cell| cell.center(tile_length))
    }

    /// Reports whether the cell lies on any horizontal or vertical segment.
    ///
    /// Diagonal segments never cover a cell. A single-waypoint path covers
    /// nothing.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.waypoints
            .windows(2)
            .any(|segment| segment_covers(segment[0], segment[1], cell))
    }
}

fn segment_covers(from: CellCoord, to: CellCoord, cell: CellCoord) -> bool {
    if from.row() == to.row() && cell.row() == from.row() {
        let (low, high) = ordered(from.column(), to.column());
        if (low..=high).contains(&cell.column()) {
            return true;
        }
    }

    if from.column() == to.column() && cell.column() == from.column() {
        let (low, high) = ordered(from.row(), to.row());
        if (low..=high).contains(&cell.row()) {
            return true;
        }
    }

    false
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shaped() -> Path {
        Path::new(
            vec![
                CellCoord::new(0, 2),
                CellCoord::new(4, 2),
                CellCoord::new(4, 8),
            ],
            10,
            10,
        )
        .expect("valid path")
    }

    #[test]
    fn horizontal_and_vertical_spans_are_covered() {
        let path = l_shaped();
        for column in 0..=4 {
            assert!(path.contains(CellCoord::new(column, 2)));
        }
        for row in 2..=8 {
            assert!(path.contains(CellCoord::new(4, row)));
        }
    }

    #[test]
    fn neighbours_of_the_path_are_free() {
        let path = l_shaped();
        assert!(!path.contains(CellCoord::new(5, 2)));
        assert!(!path.contains(CellCoord::new(0, 3)));
        assert!(!path.contains(CellCoord::new(3, 8)));
        assert!(!path.contains(CellCoord::new(4, 9)));
    }

    #[test]
    fn reversed_segments_are_covered() {
        let path = Path::new(vec![CellCoord::new(6, 1), CellCoord::new(2, 1)], 10, 10)
            .expect("valid path");
        assert!(path.contains(CellCoord::new(3, 1)));
    }

    #[test]
    fn diagonal_segments_cover_nothing_between_endpoints() {
        let path = Path::new(vec![CellCoord::new(0, 0), CellCoord::new(3, 3)], 10, 10)
            .expect("valid path");
        assert!(!path.contains(CellCoord::new(1, 1)));
    }

    #[test]
    fn rejects_empty_and_out_of_bounds_paths() {
        assert_eq!(Path::new(Vec::new(), 5, 5), Err(PathError::Empty));
        assert_eq!(
            Path::new(vec![CellCoord::new(0, 0), CellCoord::new(5, 0)], 5, 5),
            Err(PathError::OutOfBounds {
                index: 1,
                column: 5,
                row: 0,
                columns: 5,
                rows: 5,
            })
        );
    }
}
