//! Thread-safe handle around a navigation grid.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::NavGrid;

/// Shared, lock-protected [`NavGrid`].
///
/// Searches hold a read guard for their whole duration so that placement
/// cannot mutate obstruction counts mid-search; the placement system takes
/// the write guard between searches.
#[derive(Clone, Debug, Default)]
pub struct SharedNavGrid {
    inner: Arc<RwLock<NavGrid>>,
}

impl SharedNavGrid {
    /// Wraps the provided grid.
    #[must_use]
    pub fn new(grid: NavGrid) -> Self {
        Self {
            inner: Arc::new(RwLock::new(grid)),
        }
    }

    /// Acquires a read-consistent view of the grid.
    pub fn read(&self) -> RwLockReadGuard<'_, NavGrid> {
        self.inner.read()
    }

    /// Acquires exclusive access for mutation.
    pub fn write(&self) -> RwLockWriteGuard<'_, NavGrid> {
        self.inner.write()
    }

    /// Clones the current grid state.
    #[must_use]
    pub fn snapshot(&self) -> NavGrid {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::CellCoord;

    #[test]
    fn clones_observe_the_same_grid() {
        let shared = SharedNavGrid::new(NavGrid::new(3, 3));
        let placement = shared.clone();

        placement.write().obstruct(CellCoord::new(1, 1));

        assert!(!shared.read().is_passable(CellCoord::new(1, 1)));
        assert_eq!(shared.snapshot().obstructed_cells().count(), 1);
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let shared = SharedNavGrid::new(NavGrid::new(2, 2));
        let before = shared.snapshot();

        shared.write().obstruct(CellCoord::new(0, 0));

        assert!(before.is_passable(CellCoord::new(0, 0)));
        assert!(!shared.read().is_passable(CellCoord::new(0, 0)));
    }
}
