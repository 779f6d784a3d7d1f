//! Cell decomposition of a point set over a rectangular domain.
//!
//! An [`IndexedGrid`] partitions a point set into rectangular cells and keeps
//! the coordinates physically reordered by cell membership. The reordering is
//! tracked by `idx_sorted` so that results computed in the sorted index space
//! can be mapped back to the caller's original ordering.

use core::ops::Range;

/// The common cell geometry shared by the two grids of a dual-grid search.
///
/// Cell widths are always `extent / n_divs` per axis, so an integer number of
/// cells exactly tiles the domain. The requested approximate cell size is a
/// performance knob, not a correctness requirement: a single-cell layout
/// (`n_divs == [1, 1, 1]`) degrades to a brute-force comparison but stays
/// correct.
#[derive(Clone, PartialEq)]
pub struct GridLayout {
    extent: [f64; 3],
    n_divs: [usize; 3],
    cell_widths: [f64; 3],
    periodic: bool,
}

/// Per-axis cap on the division count.
///
/// Bounds the total cell count (and with it the `cell_starts` table and the
/// flat-index arithmetic) no matter how small a cell-size request is. Cells
/// finer than the search radius only add enumeration overhead, so the cap
/// costs nothing but performance in pathological configurations.
const MAX_DIVS_PER_AXIS: usize = 128;

impl GridLayout {
    pub fn new(extent: [f64; 3], n_divs: [usize; 3], periodic: bool) -> Result<Self, &'static str> {
        let n_cells = n_divs
            .iter()
            .try_fold(1_usize, |acc, &n| acc.checked_mul(n));
        if extent.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            Err("each domain extent must be positive and finite")
        } else if n_divs.contains(&0) {
            Err("each axis needs at least 1 division")
        } else if n_cells.is_none() {
            Err("the total cell count overflows usize")
        } else {
            let cell_widths = [
                extent[0] / n_divs[0] as f64,
                extent[1] / n_divs[1] as f64,
                extent[2] / n_divs[2] as f64,
            ];
            Ok(Self {
                extent,
                n_divs,
                cell_widths,
                periodic,
            })
        }
    }

    /// the number of divisions implied by an approximate cell-size request:
    /// `floor(extent / approx_size)` along each axis, clamped to
    /// `[1, MAX_DIVS_PER_AXIS]` so an arbitrarily small request stays a
    /// performance knob instead of exploding the cell count
    pub fn divisions_for(extent: [f64; 3], approx_cell_size: [f64; 3]) -> [usize; 3] {
        let mut n_divs = [1_usize; 3];
        for ax in 0..3 {
            n_divs[ax] =
                ((extent[ax] / approx_cell_size[ax]).floor() as usize).clamp(1, MAX_DIVS_PER_AXIS);
        }
        n_divs
    }

    /// choose the single geometry shared by both point sets: along each axis
    /// the larger of the two requested cell sizes wins, so both sets fit the
    /// coarser of the two requested partitions
    pub fn common(
        extent: [f64; 3],
        approx_cell_size_1: [f64; 3],
        approx_cell_size_2: [f64; 3],
        periodic: bool,
    ) -> Result<Self, &'static str> {
        let divs1 = Self::divisions_for(extent, approx_cell_size_1);
        let divs2 = Self::divisions_for(extent, approx_cell_size_2);
        let n_divs = [
            divs1[0].min(divs2[0]),
            divs1[1].min(divs2[1]),
            divs1[2].min(divs2[2]),
        ];
        Self::new(extent, n_divs, periodic)
    }

    pub fn extent(&self) -> &[f64; 3] {
        &self.extent
    }

    pub fn n_divs(&self) -> &[usize; 3] {
        &self.n_divs
    }

    pub fn cell_widths(&self) -> &[f64; 3] {
        &self.cell_widths
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// total number of cells
    pub fn n_cells(&self) -> usize {
        self.n_divs[0] * self.n_divs[1] * self.n_divs[2]
    }

    /// map a 3D cell index to its flattened form (row-major, x slowest)
    pub fn flat_index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.n_divs[1] + iy) * self.n_divs[2] + iz
    }

    /// map a flattened cell index back to its 3D form
    pub fn unflatten_index(&self, flat: usize) -> [usize; 3] {
        let iz = flat % self.n_divs[2];
        let rest = flat / self.n_divs[2];
        [rest / self.n_divs[1], rest % self.n_divs[1], iz]
    }

    /// the flattened index of the cell containing a point
    ///
    /// Points sitting exactly on the upper domain boundary are assigned to
    /// the last cell along that axis.
    pub fn cell_of_point(&self, x: f64, y: f64, z: f64) -> usize {
        let clamped = |v: f64, ax: usize| -> usize {
            ((v / self.cell_widths[ax]) as usize).min(self.n_divs[ax] - 1)
        };
        self.flat_index(clamped(x, 0), clamped(y, 1), clamped(z, 2))
    }
}

/// A point set decomposed into the cells of a [`GridLayout`].
///
/// The coordinate buffers are reordered so that each cell's points occupy a
/// contiguous range; `cell_starts` is the prefix-offset table over those
/// ranges and `idx_sorted` maps sorted positions back to original indices.
pub struct IndexedGrid {
    layout: GridLayout,
    /// idx_sorted[sorted position] = original point index
    idx_sorted: Vec<usize>,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    /// length `n_cells + 1`; cell `c` owns sorted range
    /// `cell_starts[c]..cell_starts[c + 1]`
    cell_starts: Vec<usize>,
}

impl IndexedGrid {
    /// Decompose a point set.
    ///
    /// The sort is stable over the flattened cell index (ties keep the
    /// original point order), so the decomposition is deterministic and
    /// reproducible across runs.
    pub fn build(
        layout: GridLayout,
        x: &[f64],
        y: &[f64],
        z: &[f64],
    ) -> Result<Self, &'static str> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err("coordinate arrays must have equal lengths");
        }
        let n = x.len();
        let extent = *layout.extent();

        let mut cell_ids = Vec::with_capacity(n);
        for i in 0..n {
            let (xi, yi, zi) = (x[i], y[i], z[i]);
            if !(xi.is_finite() && yi.is_finite() && zi.is_finite()) {
                return Err("coordinates must be finite");
            }
            if xi < 0.0 || yi < 0.0 || zi < 0.0 || xi > extent[0] || yi > extent[1] || zi > extent[2]
            {
                return Err("coordinates must lie inside the domain");
            }
            cell_ids.push(layout.cell_of_point(xi, yi, zi));
        }

        let mut idx_sorted: Vec<usize> = (0..n).collect();
        idx_sorted.sort_by_key(|&i| cell_ids[i]);

        let sorted_x: Vec<f64> = idx_sorted.iter().map(|&i| x[i]).collect();
        let sorted_y: Vec<f64> = idx_sorted.iter().map(|&i| y[i]).collect();
        let sorted_z: Vec<f64> = idx_sorted.iter().map(|&i| z[i]).collect();

        let n_cells = layout.n_cells();
        let mut cell_starts = vec![0_usize; n_cells + 1];
        for &c in &cell_ids {
            cell_starts[c + 1] += 1;
        }
        for c in 0..n_cells {
            cell_starts[c + 1] += cell_starts[c];
        }

        Ok(Self {
            layout,
            idx_sorted,
            x: sorted_x,
            y: sorted_y,
            z: sorted_z,
            cell_starts,
        })
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn n_points(&self) -> usize {
        self.idx_sorted.len()
    }

    pub fn idx_sorted(&self) -> &[usize] {
        &self.idx_sorted
    }

    /// the sorted-space index range owned by a cell
    pub fn cell_range(&self, cell: usize) -> Range<usize> {
        self.cell_starts[cell]..self.cell_starts[cell + 1]
    }

    /// the coordinate slices for a cell's points (in sorted order)
    pub fn cell_coords(&self, cell: usize) -> (&[f64], &[f64], &[f64]) {
        let r = self.cell_range(cell);
        (&self.x[r.clone()], &self.y[r.clone()], &self.z[r])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_invalid_creation() {
        assert!(GridLayout::new([0.0, 1.0, 1.0], [2, 2, 2], false).is_err());
        assert!(GridLayout::new([1.0, -1.0, 1.0], [2, 2, 2], false).is_err());
        assert!(GridLayout::new([1.0, 1.0, f64::NAN], [2, 2, 2], false).is_err());
        assert!(GridLayout::new([1.0, 1.0, 1.0], [2, 0, 2], false).is_err());
        assert!(GridLayout::new([1.0, 1.0, 1.0], [usize::MAX, 2, 1], false).is_err());
    }

    #[test]
    fn layout_division_count_is_bounded() {
        // a tiny-but-valid cell-size request must not blow up the cell count
        let n_divs = GridLayout::divisions_for([1.0, 1.0, 1.0], [1.0e-12; 3]);
        assert_eq!(n_divs, [MAX_DIVS_PER_AXIS; 3]);
        let layout = GridLayout::new([1.0, 1.0, 1.0], n_divs, true).unwrap();
        assert_eq!(layout.n_cells(), MAX_DIVS_PER_AXIS.pow(3));
    }

    #[test]
    fn layout_divisions_for() {
        assert_eq!(
            GridLayout::divisions_for([1.0, 1.0, 1.0], [0.1, 0.25, 2.0]),
            [10, 4, 1],
        );
        // a request coarser than the domain falls back to a single cell
        assert_eq!(
            GridLayout::divisions_for([1.0, 1.0, 1.0], [5.0, 5.0, 5.0]),
            [1, 1, 1],
        );
    }

    #[test]
    fn layout_common_takes_coarser_partition() {
        let layout =
            GridLayout::common([2.0, 2.0, 2.0], [0.5, 1.0, 2.0], [1.0, 0.25, 2.0], true).unwrap();
        assert_eq!(*layout.n_divs(), [2, 2, 1]);
        assert_eq!(*layout.cell_widths(), [1.0, 1.0, 2.0]);
        assert!(layout.is_periodic());
    }

    #[test]
    fn layout_index_round_trip() {
        let layout = GridLayout::new([1.0, 1.0, 1.0], [2, 3, 4], false).unwrap();
        assert_eq!(layout.n_cells(), 24);
        for flat in 0..layout.n_cells() {
            let [ix, iy, iz] = layout.unflatten_index(flat);
            assert_eq!(layout.flat_index(ix, iy, iz), flat);
        }
    }

    #[test]
    fn cell_of_point_boundaries() {
        let layout = GridLayout::new([1.0, 1.0, 1.0], [4, 4, 4], false).unwrap();
        assert_eq!(layout.cell_of_point(0.0, 0.0, 0.0), 0);
        // the upper boundary belongs to the last cell
        assert_eq!(
            layout.cell_of_point(1.0, 1.0, 1.0),
            layout.flat_index(3, 3, 3),
        );
    }

    #[test]
    fn build_rejects_bad_coordinates() {
        let layout = GridLayout::new([1.0, 1.0, 1.0], [2, 2, 2], false).unwrap();
        assert!(IndexedGrid::build(layout.clone(), &[0.5], &[0.5], &[f64::NAN]).is_err());
        assert!(IndexedGrid::build(layout.clone(), &[-0.5], &[0.5], &[0.5]).is_err());
        assert!(IndexedGrid::build(layout.clone(), &[1.5], &[0.5], &[0.5]).is_err());
        assert!(IndexedGrid::build(layout, &[0.5, 0.5], &[0.5], &[0.5]).is_err());
    }

    #[test]
    fn build_ranges_partition_points() {
        let layout = GridLayout::new([1.0, 1.0, 1.0], [2, 2, 2], false).unwrap();
        let x = [0.1, 0.9, 0.1, 0.6, 0.4];
        let y = [0.1, 0.9, 0.2, 0.1, 0.9];
        let z = [0.1, 0.9, 0.3, 0.9, 0.1];
        let grid = IndexedGrid::build(layout, &x, &y, &z).unwrap();

        // every sorted position is claimed by exactly one cell
        let mut claimed = vec![false; grid.n_points()];
        for cell in 0..grid.layout().n_cells() {
            for pos in grid.cell_range(cell) {
                assert!(!claimed[pos]);
                claimed[pos] = true;
            }
        }
        assert!(claimed.iter().all(|&c| c));

        // idx_sorted is a permutation of the original indices
        let mut seen: Vec<usize> = grid.idx_sorted().to_vec();
        seen.sort_unstable();
        assert_eq!(seen, (0..x.len()).collect::<Vec<_>>());

        // the reordered coordinates agree with the permutation
        for cell in 0..grid.layout().n_cells() {
            let range = grid.cell_range(cell);
            let (cx, cy, cz) = grid.cell_coords(cell);
            for (k, pos) in range.enumerate() {
                let orig = grid.idx_sorted()[pos];
                assert_eq!(cx[k], x[orig]);
                assert_eq!(cy[k], y[orig]);
                assert_eq!(cz[k], z[orig]);
            }
        }
    }

    #[test]
    fn build_stable_within_cell() {
        // all points share one cell, so the sorted order must match the
        // original order
        let layout = GridLayout::new([1.0, 1.0, 1.0], [1, 1, 1], false).unwrap();
        let x = [0.3, 0.1, 0.7, 0.5];
        let grid = IndexedGrid::build(layout, &x, &x, &x).unwrap();
        assert_eq!(grid.idx_sorted(), &[0, 1, 2, 3]);
    }

    #[test]
    fn build_empty_point_set() {
        let layout = GridLayout::new([1.0, 1.0, 1.0], [2, 2, 2], false).unwrap();
        let grid = IndexedGrid::build(layout, &[], &[], &[]).unwrap();
        assert_eq!(grid.n_points(), 0);
        for cell in 0..grid.layout().n_cells() {
            assert!(grid.cell_range(cell).is_empty());
        }
    }
}
