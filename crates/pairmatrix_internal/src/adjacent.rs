//! Enumeration of the destination cells within range of a source cell.
//!
//! [`AdjacentCells`] is an explicit, finite iterator over every destination
//! cell that can hold a qualifying pair, together with the periodic image
//! shift to add to that cell's coordinates before distance computation. It is
//! deterministic and restartable: constructing a fresh instance with the same
//! arguments regenerates the same sequence.

use crate::grid::GridLayout;

/// One axis' candidate list: (wrapped cell index, coordinate shift).
type AxisCandidates = Vec<(usize, f64)>;

/// build the candidate list along one axis
///
/// `span = ceil(radius / cell_width)` whole cells in each direction. The span
/// is clamped to `n_divs`: a span beyond one full period cannot reach any
/// cell image that a single wrap has not already produced.
fn axis_candidates(
    src: usize,
    n_divs: usize,
    cell_width: f64,
    extent: f64,
    periodic: bool,
    radius: f64,
) -> AxisCandidates {
    let n = n_divs as isize;
    let span = ((radius / cell_width).ceil() as isize).min(n);
    let src = src as isize;

    let mut out = AxisCandidates::with_capacity((2 * span + 1) as usize);
    for raw in (src - span)..=(src + span) {
        if periodic {
            let wrapped = raw.rem_euclid(n) as usize;
            // a raw index below 0 names the image of the wrapped cell that
            // sits just below the domain, so its coordinates move down by one
            // period (and symmetrically above)
            let shift = if raw < 0 {
                -extent
            } else if raw >= n {
                extent
            } else {
                0.0
            };
            // guard against tiny grids (n_divs <= 2*span + 1): the same
            // physical cell may be revisited under different shifts -- all of
            // those are kept -- but the same (cell, shift) pair is dropped
            if !out.contains(&(wrapped, shift)) {
                out.push((wrapped, shift));
            }
        } else if (0..n).contains(&raw) {
            out.push((raw as usize, 0.0));
        }
    }
    out
}

/// Iterator over `(destination cell flat index, [shift_x, shift_y, shift_z])`.
pub struct AdjacentCells {
    axes: [AxisCandidates; 3],
    n_divs_yz: [usize; 2],
    cursor: [usize; 3],
    exhausted: bool,
}

impl AdjacentCells {
    pub fn new(layout: &GridLayout, source_cell: usize, search_radii: [f64; 3]) -> Self {
        let [ix, iy, iz] = layout.unflatten_index(source_cell);
        let src = [ix, iy, iz];
        let periodic = layout.is_periodic();

        let mut axes: [AxisCandidates; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for ax in 0..3 {
            axes[ax] = axis_candidates(
                src[ax],
                layout.n_divs()[ax],
                layout.cell_widths()[ax],
                layout.extent()[ax],
                periodic,
                search_radii[ax],
            );
        }

        // non-periodic axes can produce empty candidate lists only when the
        // source cell itself is out of range, which cannot happen; an empty
        // list still terminates the iterator immediately
        let exhausted = axes.iter().any(|a| a.is_empty());
        Self {
            axes,
            n_divs_yz: [layout.n_divs()[1], layout.n_divs()[2]],
            cursor: [0, 0, 0],
            exhausted,
        }
    }
}

impl Iterator for AdjacentCells {
    type Item = (usize, [f64; 3]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let (cx, sx) = self.axes[0][self.cursor[0]];
        let (cy, sy) = self.axes[1][self.cursor[1]];
        let (cz, sz) = self.axes[2][self.cursor[2]];
        let flat = (cx * self.n_divs_yz[0] + cy) * self.n_divs_yz[1] + cz;

        // odometer-style advance, z fastest
        self.cursor[2] += 1;
        if self.cursor[2] == self.axes[2].len() {
            self.cursor[2] = 0;
            self.cursor[1] += 1;
            if self.cursor[1] == self.axes[1].len() {
                self.cursor[1] = 0;
                self.cursor[0] += 1;
                if self.cursor[0] == self.axes[0].len() {
                    self.exhausted = true;
                }
            }
        }

        Some((flat, [sx, sy, sz]))
    }
}
