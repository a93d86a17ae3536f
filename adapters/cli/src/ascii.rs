//! Plain-text grid maps: `.` marks an open cell, `#` an obstructed one.

use std::collections::HashSet;

use rampart_core::{CellCoord, NavError};
use rampart_grid::NavGrid;
use thiserror::Error;

const OPEN: char = '.';
const BLOCKED: char = '#';

/// Errors raised while reading an ASCII map.
#[derive(Debug, Error)]
pub(crate) enum AsciiLayoutError {
    /// The map contained no rows.
    #[error("layout map is empty")]
    Empty,
    /// A character other than `.` or `#` appeared in the map.
    #[error("unexpected character '{found}' at line {line}, column {column}")]
    UnexpectedCharacter {
        /// One-based line number.
        line: usize,
        /// One-based character column.
        column: usize,
        /// Offending character.
        found: char,
    },
    /// The rows did not form a rectangle.
    #[error(transparent)]
    Grid(#[from] NavError),
}

/// Parses an ASCII map into a navigation grid.
///
/// Blank lines at either end are ignored; every remaining line is one row.
pub(crate) fn parse(map: &str) -> Result<NavGrid, AsciiLayoutError> {
    let lines: Vec<&str> = map.lines().map(str::trim_end).collect();
    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return Err(AsciiLayoutError::Empty);
    };

    let mut rows = Vec::with_capacity(last - first + 1);
    for (offset, line) in lines[first..=last].iter().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (index, character) in line.chars().enumerate() {
            let count = match character {
                OPEN => 0,
                BLOCKED => 1,
                found => {
                    return Err(AsciiLayoutError::UnexpectedCharacter {
                        line: first + offset + 1,
                        column: index + 1,
                        found,
                    })
                }
            };
            row.push(count);
        }
        rows.push(row);
    }

    Ok(NavGrid::from_rows(&rows)?)
}

/// Cells highlighted when rendering a planned route.
#[derive(Clone, Debug, Default)]
pub(crate) struct RouteOverlay<'a> {
    /// Raw path cells.
    pub(crate) path: &'a [CellCoord],
    /// Reduced waypoints.
    pub(crate) waypoints: &'a [CellCoord],
    /// Requested start cell.
    pub(crate) start: Option<CellCoord>,
    /// Requested target cell.
    pub(crate) target: Option<CellCoord>,
}

/// Draws the grid with the overlay on top.
///
/// Endpoints render as `S` and `T`, waypoints as `o`, remaining path cells
/// as `*`, obstructed cells as `#` and open cells as `.`.
pub(crate) fn render(grid: &NavGrid, overlay: &RouteOverlay<'_>) -> String {
    let path: HashSet<CellCoord> = overlay.path.iter().copied().collect();
    let waypoints: HashSet<CellCoord> = overlay.waypoints.iter().copied().collect();

    let mut output = String::new();
    for row in 0..grid.height() {
        for column in 0..grid.width() {
            let cell = CellCoord::new(column, row);
            let glyph = if overlay.start == Some(cell) {
                'S'
            } else if overlay.target == Some(cell) {
                'T'
            } else if waypoints.contains(&cell) {
                'o'
            } else if path.contains(&cell) {
                '*'
            } else if grid.is_passable(cell) {
                OPEN
            } else {
                BLOCKED
            };
            output.push(glyph);
        }
        output.push('\n');
    }
    output
}
