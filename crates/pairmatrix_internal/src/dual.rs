//! Pairs two [`IndexedGrid`]s that share a common cell geometry.

use crate::grid::{GridLayout, IndexedGrid};

/// Two indexed grids over congruent, co-located cells.
///
/// Because both grids were built from the same [`GridLayout`], cell `c` of
/// grid 1 and cell `c` of grid 2 occupy the same physical subvolume, so a
/// cell-pair search can work directly in the shared flattened index space.
pub struct DualGrid<'a> {
    grid1: &'a IndexedGrid,
    grid2: &'a IndexedGrid,
}

impl<'a> DualGrid<'a> {
    pub fn new(grid1: &'a IndexedGrid, grid2: &'a IndexedGrid) -> Result<Self, &'static str> {
        if grid1.layout() != grid2.layout() {
            Err("both grids must share the same cell geometry")
        } else {
            Ok(Self { grid1, grid2 })
        }
    }

    pub fn layout(&self) -> &GridLayout {
        self.grid1.layout()
    }

    pub fn grid1(&self) -> &IndexedGrid {
        self.grid1
    }

    pub fn grid2(&self) -> &IndexedGrid {
        self.grid2
    }

    /// the number of source cells a full pair search iterates over
    pub fn n_cells(&self) -> usize {
        self.layout().n_cells()
    }
}
