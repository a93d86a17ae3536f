#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative navigability grid for the Rampart navigation engine.
//!
//! The placement system owns a [`NavGrid`] and mutates it through additive
//! obstruction counts so that overlapping obstacles can be placed and revoked
//! independently. Searches and line-of-sight tests only read from it. Callers
//! sharing one grid across threads wrap it in a [`SharedNavGrid`], and
//! [`GridFrame`] converts between cells and world-space positions.

mod frame;
mod shared;

pub use frame::GridFrame;
pub use shared::SharedNavGrid;

use rampart_core::{CellCoord, CellRect, Direction, InvalidInput, NavError};

/// Rectangular matrix of cells, each carrying an obstruction count.
///
/// A cell is passable iff it lies inside the grid and its count is exactly
/// zero. Counts never drop below zero and are only reachable through the
/// methods below.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavGrid {
    width: u32,
    height: u32,
    obstructions: Vec<u32>,
}

impl NavGrid {
    /// Largest number of cells a grid may hold.
    pub const MAX_CELLS: u64 = 1 << 24;

    /// Creates a fully passable grid with the provided dimensions.
    ///
    /// Dimensions rejected by [`NavGrid::try_new`] yield an empty `0x0` grid
    /// in which every cell is out of bounds.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::try_new(width, height).unwrap_or_else(|error| {
            tracing::warn!(%error, "grid dimensions rejected, using an empty grid");
            Self::default()
        })
    }

    /// Creates a fully passable grid, failing when the cell count exceeds
    /// [`NavGrid::MAX_CELLS`] or cannot be allocated.
    pub fn try_new(width: u32, height: u32) -> Result<Self, NavError> {
        let too_large = || {
            NavError::from(InvalidInput::TooLarge {
                width,
                height,
                limit: Self::MAX_CELLS,
            })
        };

        let cells = u64::from(width) * u64::from(height);
        if cells > Self::MAX_CELLS {
            return Err(too_large());
        }
        let cells = usize::try_from(cells).map_err(|_| too_large())?;

        let mut obstructions = Vec::new();
        obstructions
            .try_reserve_exact(cells)
            .map_err(|_| too_large())?;
        obstructions.resize(cells, 0);

        Ok(Self {
            width,
            height,
            obstructions,
        })
    }

    /// Builds a grid from row-major obstruction counts (`rows[row][column]`).
    ///
    /// Every row must hold the same number of cells; the first row fixes the
    /// width.
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self, NavError> {
        let height = dimension(rows.len());
        let width = rows.first().map_or(0, |row| dimension(row.len()));

        for (index, row) in rows.iter().enumerate() {
            let found = dimension(row.len());
            if found != width {
                return Err(InvalidInput::NonRectangular {
                    row: dimension(index),
                    expected: width,
                    found,
                }
                .into());
            }
        }

        let obstructions = rows.iter().flatten().copied().collect();
        Ok(Self {
            width,
            height,
            obstructions,
        })
    }

    /// Builds a grid from column-major obstruction counts (`columns[column][row]`).
    ///
    /// This is the layout the game keeps its placement matrix in. Ragged
    /// input is rejected with [`InvalidInput::RaggedColumn`].
    pub fn from_columns(columns: &[Vec<u32>]) -> Result<Self, NavError> {
        let width = dimension(columns.len());
        let height = columns.first().map_or(0, |column| dimension(column.len()));

        for (index, column) in columns.iter().enumerate() {
            let found = dimension(column.len());
            if found != height {
                return Err(InvalidInput::RaggedColumn {
                    column: dimension(index),
                    expected: height,
                    found,
                }
                .into());
            }
        }

        let mut grid = Self::try_new(width, height)?;
        for (column_index, column) in columns.iter().enumerate() {
            for (row_index, &count) in column.iter().enumerate() {
                let cell = CellCoord::new(dimension(column_index), dimension(row_index));
                if let Some(index) = grid.index(cell) {
                    grid.obstructions[index] = count;
                }
            }
        }
        Ok(grid)
    }

    /// Width of the grid in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the grid in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Fails with [`InvalidInput::OutOfBounds`] unless the cell lies inside the grid.
    pub fn ensure_contains(&self, cell: CellCoord) -> Result<(), NavError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(InvalidInput::OutOfBounds {
                cell,
                width: self.width,
                height: self.height,
            }
            .into())
        }
    }

    /// Reports whether the cell can be traversed.
    ///
    /// Out-of-bounds cells are impassable.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.obstruction(cell) == Some(0)
    }

    /// Obstruction count stored for the cell, or `None` outside the grid.
    #[must_use]
    pub fn obstruction(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell)
            .and_then(|index| self.obstructions.get(index).copied())
    }

    /// Adjusts the obstruction count of a cell by a signed amount.
    ///
    /// The count saturates at zero. Out-of-bounds cells are ignored so
    /// placement logic may reach past the grid edges.
    pub fn add_obstruction(&mut self, cell: CellCoord, delta: i32) {
        if let Some(index) = self.index(cell) {
            if let Some(count) = self.obstructions.get_mut(index) {
                *count = count.saturating_add_signed(delta);
            }
        }
    }

    /// Registers one more obstacle covering the cell.
    pub fn obstruct(&mut self, cell: CellCoord) {
        self.add_obstruction(cell, 1);
    }

    /// Revokes one obstacle covering the cell.
    pub fn clear(&mut self, cell: CellCoord) {
        self.add_obstruction(cell, -1);
    }

    /// Registers an obstacle over every in-bounds cell of the footprint.
    pub fn obstruct_region(&mut self, region: CellRect) {
        tracing::trace!(?region, "obstructing region");
        self.adjust_region(region, 1);
    }

    /// Revokes an obstacle over every in-bounds cell of the footprint.
    pub fn clear_region(&mut self, region: CellRect) {
        tracing::trace!(?region, "clearing region");
        self.adjust_region(region, -1);
    }

    /// Work is bounded by the overlap with the grid, not by the footprint.
    fn adjust_region(&mut self, region: CellRect, delta: i32) {
        let Some(overlap) = region.clamped_to(self.width, self.height) else {
            return;
        };
        for cell in overlap.cells() {
            self.add_obstruction(cell, delta);
        }
    }

    /// Passable orthogonal neighbours in expansion order: up, right, down, left.
    pub fn passable_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
            .filter(move |neighbor| self.is_passable(*neighbor))
    }

    /// Cells carrying a non-zero obstruction count, in row-major order.
    pub fn obstructed_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.width;
        self.obstructions
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .filter_map(move |(index, _)| {
                let index = u64::try_from(index).ok()?;
                let width = u64::from(width);
                let column = u32::try_from(index % width).ok()?;
                let row = u32::try_from(index / width).ok()?;
                Some(CellCoord::new(column, row))
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.width && cell.row() < self.height {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            row.checked_mul(width)?.checked_add(column)
        } else {
            None
        }
    }
}

fn dimension(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
