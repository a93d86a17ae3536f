#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path reduction passes that shrink a cell-by-cell path into waypoints.
//!
//! Both passes are pure functions of their input. Their output is an
//! order-preserving subsequence of the input path that keeps its first and
//! last cell, and paths shorter than three cells come back unchanged. The
//! passes compose in either order.

use rampart_core::CellCoord;
use rampart_grid::NavGrid;

/// Keeps only the cells where the path changes direction.
///
/// The first and last cells are always kept; straight runs between turns are
/// dropped.
#[must_use]
pub fn collapse_turns(path: &[CellCoord]) -> Vec<CellCoord> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let mut waypoints = Vec::with_capacity(path.len());
    waypoints.push(path[0]);
    for window in path.windows(3) {
        let incoming = step_vector(window[0], window[1]);
        let outgoing = step_vector(window[1], window[2]);
        if incoming != outgoing {
            waypoints.push(window[1]);
        }
    }
    waypoints.push(path[path.len() - 1]);

    tracing::trace!(before = path.len(), after = waypoints.len(), "collapsed turns");
    waypoints
}

/// Drops cells that a straight obstruction-free line can skip.
///
/// The path is scanned from the target back toward the start. A cell visible
/// from the current anchor becomes the candidate waypoint; the first cell
/// that is not visible records the candidate and makes it the new anchor. The
/// start is always kept.
#[must_use]
pub fn simplify_by_visibility(grid: &NavGrid, path: &[CellCoord]) -> Vec<CellCoord> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let last = path.len() - 1;
    let mut reversed = vec![path[last]];
    let mut anchor = last;
    let mut candidate = last;

    for index in (0..last).rev() {
        if candidate != anchor && !has_line_of_sight(grid, path[anchor], path[index]) {
            reversed.push(path[candidate]);
            anchor = candidate;
        }
        candidate = index;
    }

    reversed.push(path[0]);
    reversed.reverse();

    tracing::trace!(before = path.len(), after = reversed.len(), "simplified by visibility");
    reversed
}

/// Walks the grid cells on a digital line from `from` to `to`.
///
/// Every visited cell before `to` must be passable, `from` included; the
/// destination cell itself is never checked.
#[must_use]
pub fn has_line_of_sight(grid: &NavGrid, from: CellCoord, to: CellCoord) -> bool {
    let (mut column, mut row) = (i64::from(from.column()), i64::from(from.row()));
    let (end_column, end_row) = (i64::from(to.column()), i64::from(to.row()));

    let delta_column = (end_column - column).abs();
    let delta_row = (end_row - row).abs();
    let step_column = if column < end_column { 1 } else { -1 };
    let step_row = if row < end_row { 1 } else { -1 };
    let mut error = delta_column - delta_row;

    while column != end_column || row != end_row {
        if !is_passable_at(grid, column, row) {
            return false;
        }

        let doubled = 2 * error;
        if doubled > -delta_row {
            error -= delta_row;
            column += step_column;
        }
        if doubled < delta_column {
            error += delta_column;
            row += step_row;
        }
    }

    true
}

fn is_passable_at(grid: &NavGrid, column: i64, row: i64) -> bool {
    match (u32::try_from(column), u32::try_from(row)) {
        (Ok(column), Ok(row)) => grid.is_passable(CellCoord::new(column, row)),
        _ => false,
    }
}

fn step_vector(from: CellCoord, to: CellCoord) -> (i64, i64) {
    (
        i64::from(to.column()) - i64::from(from.column()),
        i64::from(to.row()) - i64::from(from.row()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(points: &[(u32, u32)]) -> Vec<CellCoord> {
        points
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect()
    }

    #[test]
    fn step_vector_is_signed() {
        assert_eq!(
            step_vector(CellCoord::new(3, 3), CellCoord::new(2, 3)),
            (-1, 0)
        );
        assert_eq!(
            step_vector(CellCoord::new(3, 3), CellCoord::new(3, 4)),
            (0, 1)
        );
    }

    #[test]
    fn short_paths_pass_through_unchanged() {
        let grid = NavGrid::new(3, 3);
        let pair = cells(&[(0, 0), (1, 0)]);

        assert_eq!(collapse_turns(&pair), pair);
        assert_eq!(simplify_by_visibility(&grid, &pair), pair);
        assert!(collapse_turns(&[]).is_empty());
        assert!(simplify_by_visibility(&grid, &[]).is_empty());
    }

    #[test]
    fn collapse_keeps_every_corner_of_a_staircase() {
        let staircase = cells(&[(0, 0), (1, 0), (1, 1), (2, 1), (2, 2)]);
        assert_eq!(collapse_turns(&staircase), staircase);
    }

    #[test]
    fn line_of_sight_walk_skips_destination_cell() {
        let mut grid = NavGrid::new(4, 1);
        grid.obstruct(CellCoord::new(3, 0));

        assert!(has_line_of_sight(
            &grid,
            CellCoord::new(0, 0),
            CellCoord::new(3, 0)
        ));
        assert!(!has_line_of_sight(
            &grid,
            CellCoord::new(3, 0),
            CellCoord::new(0, 0)
        ));
    }

    #[test]
    fn line_of_sight_to_self_is_trivially_clear() {
        let mut grid = NavGrid::new(2, 2);
        grid.obstruct(CellCoord::new(1, 1));
        assert!(has_line_of_sight(
            &grid,
            CellCoord::new(1, 1),
            CellCoord::new(1, 1)
        ));
    }

    #[test]
    fn negative_coordinates_are_impassable() {
        let grid = NavGrid::new(2, 2);
        assert!(!is_passable_at(&grid, -1, 0));
        assert!(is_passable_at(&grid, 1, 1));
    }
}
