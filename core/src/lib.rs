#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart navigation engine.
//!
//! This crate defines the vocabulary that connects the navigation grid, the
//! search and reduction systems, and adapters. Cells are addressed with
//! [`CellCoord`] values, footprints with [`CellRect`], and caller precondition
//! violations surface as [`NavError`]. Paths travel between crates as plain
//! `Vec<CellCoord>` sequences ordered from start to target; an empty sequence
//! means the target is unreachable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the neighbouring cell one step away in `direction`.
    ///
    /// Yields `None` when the step would leave the unsigned coordinate space.
    /// Upper grid bounds are the caller's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column_delta, row_delta) = direction.offset();
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        Some(CellCoord::new(column, row))
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Portion of the rectangle lying inside a `width` by `height` grid.
    ///
    /// Returns `None` when the rectangle misses the grid entirely or covers
    /// no cells.
    #[must_use]
    pub fn clamped_to(&self, width: u32, height: u32) -> Option<CellRect> {
        let column_end = self
            .origin
            .column()
            .saturating_add(self.size.width())
            .min(width);
        let row_end = self.origin.row().saturating_add(self.size.height()).min(height);

        let clipped_width = column_end
            .checked_sub(self.origin.column())
            .filter(|cells| *cells > 0)?;
        let clipped_height = row_end
            .checked_sub(self.origin.row())
            .filter(|cells| *cells > 0)?;

        Some(CellRect::from_origin_and_size(
            self.origin,
            CellRectSize::new(clipped_width, clipped_height),
        ))
    }

    /// Enumerates the covered cells in row-major order.
    ///
    /// Cells whose coordinates would overflow `u32` are skipped.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let size = self.size;
        (0..size.height()).flat_map(move |row_offset| {
            (0..size.width()).filter_map(move |column_offset| {
                let column = origin.column().checked_add(column_offset)?;
                let row = origin.row().checked_add(row_offset)?;
                Some(CellCoord::new(column, row))
            })
        })
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in neighbour expansion order: up, right, down, left.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction of the unit step leading from `from` to `to`.
    ///
    /// Returns `None` unless the two cells are orthogonally adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row() > from.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Errors raised when a caller violates a navigation precondition.
///
/// Unreachable targets are not errors; searches report them as empty paths.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavError {
    /// The request supplied malformed grid data or coordinates.
    #[error("invalid navigation input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Specific malformed-input conditions rejected by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InvalidInput {
    /// A coordinate lies outside the grid.
    #[error("cell ({}, {}) lies outside the {width}x{height} grid", .cell.column(), .cell.row())]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
    },
    /// Grid rows disagree on their length.
    #[error("row {row} holds {found} cells but the grid is {expected} cells wide")]
    NonRectangular {
        /// Index of the first row whose length differs.
        row: u32,
        /// Width established by the first row.
        expected: u32,
        /// Length of the offending row.
        found: u32,
    },
    /// Grid columns disagree on their length.
    #[error("column {column} holds {found} cells but the grid is {expected} cells tall")]
    RaggedColumn {
        /// Index of the first column whose length differs.
        column: u32,
        /// Height established by the first column.
        expected: u32,
        /// Length of the offending column.
        found: u32,
    },
    /// The requested dimensions exceed the supported cell count.
    #[error("a {width}x{height} grid exceeds the limit of {limit} cells")]
    TooLarge {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
        /// Largest supported cell count.
        limit: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, CellRect, CellRectSize, Direction, InvalidInput, NavError};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_rect_round_trips_through_bincode() {
        let origin = CellCoord::new(5, 7);
        let size = CellRectSize::new(2, 3);
        let rect = CellRect::from_origin_and_size(origin, size);
        assert_round_trip(&rect);
    }

    #[test]
    fn invalid_input_round_trips_through_bincode() {
        assert_round_trip(&InvalidInput::OutOfBounds {
            cell: CellCoord::new(9, 0),
            width: 4,
            height: 4,
        });
    }

    #[test]
    fn step_stops_at_coordinate_origin() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(corner.step(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = CellCoord::new(3, 3);
        for direction in Direction::ALL {
            let neighbor = origin.step(direction).expect("interior cell");
            assert_eq!(Direction::between(origin, neighbor), Some(direction));
        }
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(Direction::between(origin, CellCoord::new(4, 4)), None);
    }

    #[test]
    fn rect_cells_are_row_major() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(2, 1), CellRectSize::new(2, 2));
        let cells: Vec<_> = rect.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(2, 1),
                CellCoord::new(3, 1),
                CellCoord::new(2, 2),
                CellCoord::new(3, 2),
            ]
        );
    }

    #[test]
    fn clamping_keeps_only_the_overlap() {
        let rect = CellRect::from_origin_and_size(
            CellCoord::new(3, 1),
            CellRectSize::new(u32::MAX, u32::MAX),
        );
        let clipped = rect.clamped_to(5, 4).expect("overlaps the grid");
        assert_eq!(clipped.origin(), CellCoord::new(3, 1));
        assert_eq!(clipped.size(), CellRectSize::new(2, 3));
        assert_eq!(clipped.cells().count(), 6);

        let inside = CellRect::from_origin_and_size(CellCoord::new(1, 1), CellRectSize::new(2, 2));
        assert_eq!(inside.clamped_to(5, 4), Some(inside));
    }

    #[test]
    fn clamping_discards_rects_outside_the_grid() {
        let beyond = CellRect::from_origin_and_size(CellCoord::new(5, 0), CellRectSize::new(3, 3));
        assert_eq!(beyond.clamped_to(5, 4), None);

        let empty = CellRect::from_origin_and_size(CellCoord::new(0, 0), CellRectSize::new(0, 2));
        assert_eq!(empty.clamped_to(5, 4), None);
    }

    #[test]
    fn too_large_message_names_dimensions_and_limit() {
        let error = InvalidInput::TooLarge {
            width: 70_000,
            height: 70_000,
            limit: 1 << 24,
        };
        assert_eq!(
            error.to_string(),
            "a 70000x70000 grid exceeds the limit of 16777216 cells"
        );
    }

    #[test]
    fn out_of_bounds_message_names_cell_and_grid() {
        let error = NavError::from(InvalidInput::OutOfBounds {
            cell: CellCoord::new(7, 2),
            width: 5,
            height: 5,
        });
        assert_eq!(
            error.to_string(),
            "invalid navigation input: cell (7, 2) lies outside the 5x5 grid"
        );
    }
}
