//! Conversions between grid cells and world-space positions.

use glam::Vec2;
use rampart_core::CellCoord;

/// Placement of the navigation grid inside the game world.
///
/// Cell `(0, 0)` sits at `origin`; every further cell is offset by
/// `cell_length` world units along the matching axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridFrame {
    origin: Vec2,
    cell_length: f32,
}

impl GridFrame {
    /// Creates a frame anchored at `origin` with square cells of `cell_length` units.
    #[must_use]
    pub const fn new(origin: Vec2, cell_length: f32) -> Self {
        Self {
            origin,
            cell_length,
        }
    }

    /// World-space position of the cell's anchor point.
    #[must_use]
    pub fn world_position(&self, cell: CellCoord) -> Vec2 {
        self.origin + Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_length
    }

    /// Cell nearest to the provided world-space point.
    ///
    /// Returns `None` for points that round to negative coordinates, for
    /// non-finite input and for degenerate frames.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        if !(self.cell_length.is_finite() && self.cell_length > 0.0) {
            return None;
        }

        let local = ((point - self.origin) / self.cell_length).round();
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        if local.x > u32::MAX as f32 || local.y > u32::MAX as f32 {
            return None;
        }

        Some(CellCoord::new(local.x as u32, local.y as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_position_scales_by_cell_length() {
        let frame = GridFrame::new(Vec2::new(-100.0, 50.0), 30.0);
        assert_eq!(
            frame.world_position(CellCoord::new(2, 3)),
            Vec2::new(-40.0, 140.0)
        );
    }

    #[test]
    fn cell_at_rounds_to_nearest_cell() {
        let frame = GridFrame::new(Vec2::new(-100.0, 50.0), 30.0);
        assert_eq!(
            frame.cell_at(Vec2::new(-44.0, 151.0)),
            Some(CellCoord::new(2, 3))
        );
        assert_eq!(
            frame.cell_at(Vec2::new(-20.0, 50.0)),
            Some(CellCoord::new(3, 0))
        );
    }

    #[test]
    fn cell_at_rejects_points_before_origin() {
        let frame = GridFrame::new(Vec2::ZERO, 10.0);
        assert_eq!(frame.cell_at(Vec2::new(-6.0, 0.0)), None);
        assert_eq!(frame.cell_at(Vec2::new(-4.0, 0.0)), Some(CellCoord::new(0, 0)));
        assert_eq!(frame.cell_at(Vec2::new(f32::NAN, 0.0)), None);
    }

    #[test]
    fn degenerate_frame_maps_nothing() {
        let frame = GridFrame::new(Vec2::ZERO, 0.0);
        assert_eq!(frame.cell_at(Vec2::new(3.0, 3.0)), None);
    }
}
