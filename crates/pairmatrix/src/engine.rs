//! Per-cell work units and their fan-out/fan-in dispatch.
//!
//! Each work unit handles one source cell: it walks that cell's adjacent
//! destination cells, applies the periodic image shift to the destination
//! coordinates, and runs the distance kernel. Units are infallible (all
//! validation happened before dispatch), share nothing mutable, and return
//! owned buffers; the only synchronization point is collecting those buffers
//! after the parallel phase.

use pairmatrix_internal::{
    AdjacentCells, DualGrid, PairList, SplitPairList, pairwise_distances, pairwise_xy_z_distances,
};
use rayon::prelude::*;

use crate::error::Error;

/// run `task` once per source cell, serially or on a dedicated worker pool
pub(crate) fn run_cells<T, F>(n_cells: usize, n_workers: usize, task: F) -> Result<Vec<T>, Error>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    if n_workers <= 1 {
        Ok((0..n_cells).map(task).collect())
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .build()
            .map_err(|err| Error::config(format!("could not build the worker pool: {err}")))?;
        Ok(pool.install(|| (0..n_cells).into_par_iter().map(task).collect()))
    }
}

/// overwrite `dst` with `src + shift`
fn shifted_into(dst: &mut Vec<f64>, src: &[f64], shift: f64) {
    dst.clear();
    dst.extend(src.iter().map(|value| value + shift));
}

/// all pairs with one point in `source` (of grid 1) and Euclidean separation
/// within `r_max`, in sorted index space
pub(crate) fn isotropic_cell_unit(
    dual: &DualGrid<'_>,
    source: usize,
    search_radii: [f64; 3],
    r_max_squared: f64,
) -> PairList {
    let (sx, sy, sz) = dual.grid1().cell_coords(source);
    let i_offset = dual.grid1().cell_range(source).start;

    let mut out = PairList::new();
    if sx.is_empty() {
        return out;
    }

    let mut bx = Vec::new();
    let mut by = Vec::new();
    let mut bz = Vec::new();
    for (dest, shift) in AdjacentCells::new(dual.layout(), source, search_radii) {
        let (dx, dy, dz) = dual.grid2().cell_coords(dest);
        if dx.is_empty() {
            continue;
        }
        let j_offset = dual.grid2().cell_range(dest).start;
        if shift == [0.0; 3] {
            pairwise_distances(sx, sy, sz, dx, dy, dz, i_offset, j_offset, r_max_squared, &mut out);
        } else {
            shifted_into(&mut bx, dx, shift[0]);
            shifted_into(&mut by, dy, shift[1]);
            shifted_into(&mut bz, dz, shift[2]);
            pairwise_distances(
                sx, sy, sz, &bx, &by, &bz, i_offset, j_offset, r_max_squared, &mut out,
            );
        }
    }
    out
}

/// all pairs with one point in `source` (of grid 1) whose perpendicular and
/// parallel separations are within their respective bounds
pub(crate) fn split_cell_unit(
    dual: &DualGrid<'_>,
    source: usize,
    search_radii: [f64; 3],
    rp_max_squared: f64,
    pi_max_squared: f64,
) -> SplitPairList {
    let (sx, sy, sz) = dual.grid1().cell_coords(source);
    let i_offset = dual.grid1().cell_range(source).start;

    let mut out = SplitPairList::new();
    if sx.is_empty() {
        return out;
    }

    let mut bx = Vec::new();
    let mut by = Vec::new();
    let mut bz = Vec::new();
    for (dest, shift) in AdjacentCells::new(dual.layout(), source, search_radii) {
        let (dx, dy, dz) = dual.grid2().cell_coords(dest);
        if dx.is_empty() {
            continue;
        }
        let j_offset = dual.grid2().cell_range(dest).start;
        if shift == [0.0; 3] {
            pairwise_xy_z_distances(
                sx,
                sy,
                sz,
                dx,
                dy,
                dz,
                i_offset,
                j_offset,
                rp_max_squared,
                pi_max_squared,
                &mut out,
            );
        } else {
            shifted_into(&mut bx, dx, shift[0]);
            shifted_into(&mut by, dy, shift[1]);
            shifted_into(&mut bz, dz, shift[2]);
            pairwise_xy_z_distances(
                sx,
                sy,
                sz,
                &bx,
                &by,
                &bz,
                i_offset,
                j_offset,
                rp_max_squared,
                pi_max_squared,
                &mut out,
            );
        }
    }
    out
}
