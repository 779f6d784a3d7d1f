//! The public pair-search entry points.

use core::num::NonZeroUsize;

use ndarray::ArrayView2;
use pairmatrix_internal::{DualGrid, GridLayout, IndexedGrid, PairList, SplitPairList};
use sprs::TriMat;
use tracing::debug;

use crate::engine::{isotropic_cell_unit, run_cells, split_cell_unit};
use crate::error::Error;
use crate::process::process_points;

/// The periodicity of the search domain.
#[derive(Clone, Copy, Debug)]
pub enum Period {
    /// the same period along every axis
    Cubic(f64),
    /// a separate period per axis
    PerAxis([f64; 3]),
}

impl Period {
    fn as_array(&self) -> [f64; 3] {
        match *self {
            Period::Cubic(period) => [period; 3],
            Period::PerAxis(period) => period,
        }
    }
}

/// The number of workers the per-cell phase fans out over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumWorkers {
    Count(NonZeroUsize),
    /// use all available hardware parallelism
    MaxAvailable,
}

impl Default for NumWorkers {
    fn default() -> Self {
        NumWorkers::Count(NonZeroUsize::MIN)
    }
}

impl NumWorkers {
    fn resolve(self) -> usize {
        match self {
            NumWorkers::Count(n) => n.get(),
            NumWorkers::MaxAvailable => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

/// Options shared by both search entry points.
///
/// The cell-size hints are pure performance knobs; any hint produces the same
/// result set. When absent, a hint defaults to 1/10 of the domain extent per
/// axis.
#[derive(Clone, Debug, Default)]
pub struct SearchOpts {
    pub period: Option<Period>,
    pub num_workers: NumWorkers,
    pub approx_cell_size1: Option<[f64; 3]>,
    pub approx_cell_size2: Option<[f64; 3]>,
}

fn resolve_period(period: &Option<Period>) -> Result<Option<[f64; 3]>, Error> {
    let Some(period) = period else { return Ok(None) };
    let period = period.as_array();
    for value in period {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::config(format!(
                "each period component must be positive and finite, got {value}",
            )));
        }
    }
    Ok(Some(period))
}

fn resolve_cell_size(
    hint: &Option<[f64; 3]>,
    extent: &[f64; 3],
    name: &str,
) -> Result<[f64; 3], Error> {
    match hint {
        None => Ok([extent[0] * 0.1, extent[1] * 0.1, extent[2] * 0.1]),
        Some(size) => {
            for value in size {
                if !value.is_finite() || *value <= 0.0 {
                    return Err(Error::config(format!(
                        "each {name} component must be positive and finite, got {value}",
                    )));
                }
            }
            Ok(*size)
        }
    }
}

fn check_threshold(value: f64, name: &str) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::config(format!(
            "{name} must be positive and finite, got {value}",
        )))
    }
}

/// build the shared layout and index both point sets over it
fn build_dual_grids(
    processed: &crate::process::ProcessedPoints,
    opts: &SearchOpts,
) -> Result<(IndexedGrid, IndexedGrid), Error> {
    let size1 = resolve_cell_size(&opts.approx_cell_size1, &processed.extent, "approx_cell_size1")?;
    let size2 = resolve_cell_size(&opts.approx_cell_size2, &processed.extent, "approx_cell_size2")?;
    let layout = GridLayout::common(processed.extent, size1, size2, processed.periodic)
        .map_err(Error::internal_adhoc)?;
    debug!(
        n_divs = ?layout.n_divs(),
        periodic = processed.periodic,
        "chose shared cell layout"
    );
    let grid1 = IndexedGrid::build(layout.clone(), &processed.x1, &processed.y1, &processed.z1)
        .map_err(Error::internal_adhoc)?;
    let grid2 = IndexedGrid::build(layout, &processed.x2, &processed.y2, &processed.z2)
        .map_err(Error::internal_adhoc)?;
    Ok((grid1, grid2))
}

/// concatenate per-cell results and map sorted positions back to the
/// callers' original point indices
fn assemble(
    units: Vec<PairList>,
    grid1: &IndexedGrid,
    grid2: &IndexedGrid,
) -> TriMat<f64> {
    let total = units.iter().map(PairList::len).sum();
    let mut rows = Vec::with_capacity(total);
    let mut cols = Vec::with_capacity(total);
    let mut data = Vec::with_capacity(total);
    for unit in units {
        rows.extend(unit.i.iter().map(|&pos| grid1.idx_sorted()[pos]));
        cols.extend(unit.j.iter().map(|&pos| grid2.idx_sorted()[pos]));
        data.extend(unit.distances);
    }
    TriMat::from_triplets((grid1.n_points(), grid2.n_points()), rows, cols, data)
}

fn assemble_split(
    units: Vec<SplitPairList>,
    grid1: &IndexedGrid,
    grid2: &IndexedGrid,
) -> (TriMat<f64>, TriMat<f64>) {
    let total = units.iter().map(SplitPairList::len).sum();
    let mut rows = Vec::with_capacity(total);
    let mut cols = Vec::with_capacity(total);
    let mut perp = Vec::with_capacity(total);
    let mut para = Vec::with_capacity(total);
    for unit in units {
        rows.extend(unit.i.iter().map(|&pos| grid1.idx_sorted()[pos]));
        cols.extend(unit.j.iter().map(|&pos| grid2.idx_sorted()[pos]));
        perp.extend(unit.perp);
        para.extend(unit.para);
    }
    let shape = (grid1.n_points(), grid2.n_points());
    // both matrices share the same index set
    let perp_mat = TriMat::from_triplets(shape, rows.clone(), cols.clone(), perp);
    let para_mat = TriMat::from_triplets(shape, rows, cols, para);
    (perp_mat, para_mat)
}

/// Find all pairs within a Euclidean distance threshold.
///
/// Each point set is a `(3, n)` array with one coordinate row per axis. The
/// result is a sparse `(n1, n2)` matrix whose explicitly stored entries are
/// the separations of every pair with `distance <= r_max` (coincident points
/// store an explicit `0.0`).
pub fn pair_matrix(
    points1: ArrayView2<'_, f64>,
    points2: ArrayView2<'_, f64>,
    r_max: f64,
    opts: &SearchOpts,
) -> Result<TriMat<f64>, Error> {
    check_threshold(r_max, "r_max")?;
    let period = resolve_period(&opts.period)?;
    let search_radii = [r_max; 3];
    let processed = process_points(points1, points2, period, search_radii)?;

    let (grid1, grid2) = build_dual_grids(&processed, opts)?;
    let dual = DualGrid::new(&grid1, &grid2).map_err(Error::internal_adhoc)?;

    let n_workers = opts.num_workers.resolve();
    debug!(n_cells = dual.n_cells(), n_workers, "dispatching cell-pair search");
    let r_max_squared = r_max * r_max;
    let units = run_cells(dual.n_cells(), n_workers, |cell| {
        isotropic_cell_unit(&dual, cell, search_radii, r_max_squared)
    })?;

    Ok(assemble(units, &grid1, &grid2))
}

/// Find all pairs within independent perpendicular and parallel bounds.
///
/// A pair qualifies when its projected xy-plane separation is within
/// `rp_max` AND its z separation is within `pi_max`. The two returned
/// matrices store the perpendicular and parallel separations respectively
/// over the same set of (i, j) entries.
pub fn xy_z_pair_matrix(
    points1: ArrayView2<'_, f64>,
    points2: ArrayView2<'_, f64>,
    rp_max: f64,
    pi_max: f64,
    opts: &SearchOpts,
) -> Result<(TriMat<f64>, TriMat<f64>), Error> {
    check_threshold(rp_max, "rp_max")?;
    check_threshold(pi_max, "pi_max")?;
    let period = resolve_period(&opts.period)?;
    let search_radii = [rp_max, rp_max, pi_max];
    let processed = process_points(points1, points2, period, search_radii)?;

    let (grid1, grid2) = build_dual_grids(&processed, opts)?;
    let dual = DualGrid::new(&grid1, &grid2).map_err(Error::internal_adhoc)?;

    let n_workers = opts.num_workers.resolve();
    debug!(n_cells = dual.n_cells(), n_workers, "dispatching cell-pair search");
    let rp_max_squared = rp_max * rp_max;
    let pi_max_squared = pi_max * pi_max;
    let units = run_cells(dual.n_cells(), n_workers, |cell| {
        split_cell_unit(&dual, cell, search_radii, rp_max_squared, pi_max_squared)
    })?;

    Ok(assemble_split(units, &grid1, &grid2))
}
