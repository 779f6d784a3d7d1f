//! Validation of caller-provided point sets and domain construction.
//!
//! Input arrays are shaped `(3, n)` with one coordinate row per axis. All
//! validation happens here, before any grid is built, so everything
//! downstream can assume well-formed coordinates sitting inside the domain.

use ndarray::ArrayView2;

use crate::error::Error;

const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];

/// Owned coordinate buffers for both point sets, together with the domain
/// they were validated against.
///
/// In the non-periodic case the coordinates have been translated so the
/// domain starts at the origin; translation does not change any pairwise
/// separation.
#[derive(Debug)]
pub(crate) struct ProcessedPoints {
    pub x1: Vec<f64>,
    pub y1: Vec<f64>,
    pub z1: Vec<f64>,
    pub x2: Vec<f64>,
    pub y2: Vec<f64>,
    pub z2: Vec<f64>,
    pub extent: [f64; 3],
    pub periodic: bool,
}

/// split a `(3, n)` array into per-axis buffers, rejecting bad shapes and
/// non-finite values
fn split_rows(points: ArrayView2<'_, f64>, set: u8) -> Result<[Vec<f64>; 3], Error> {
    if points.nrows() != 3 {
        return Err(Error::shape(set, points.nrows(), points.ncols()));
    }
    let mut out = [const { Vec::new() }; 3];
    for ax in 0..3 {
        let row = points.row(ax);
        let mut buf = Vec::with_capacity(row.len());
        for (index, &value) in row.iter().enumerate() {
            if !value.is_finite() {
                return Err(Error::domain(set, index, AXIS_NAMES[ax], value));
            }
            buf.push(value);
        }
        out[ax] = buf;
    }
    Ok(out)
}

/// Validate both point sets and fix the search domain.
///
/// With a period, every coordinate must lie in `[0, period)` on each axis.
/// Without one, both sets are enclosed in a box anchored at the smallest
/// coordinate per axis and extended to at least three times the search
/// radius, so no wrapped image can ever reach back into the box.
pub(crate) fn process_points(
    points1: ArrayView2<'_, f64>,
    points2: ArrayView2<'_, f64>,
    period: Option<[f64; 3]>,
    search_radii: [f64; 3],
) -> Result<ProcessedPoints, Error> {
    let [x1, y1, z1] = split_rows(points1, 1)?;
    let [x2, y2, z2] = split_rows(points2, 2)?;

    if let Some(period) = period {
        for ax in 0..3 {
            let coords1 = [&x1, &y1, &z1][ax];
            let coords2 = [&x2, &y2, &z2][ax];
            for (set, coords) in [(1_u8, coords1), (2_u8, coords2)] {
                for (index, &value) in coords.iter().enumerate() {
                    if value < 0.0 || value >= period[ax] {
                        return Err(Error::geometry(
                            set,
                            index,
                            AXIS_NAMES[ax],
                            value,
                            period[ax],
                        ));
                    }
                }
            }
        }
        Ok(ProcessedPoints {
            x1,
            y1,
            z1,
            x2,
            y2,
            z2,
            extent: period,
            periodic: true,
        })
    } else {
        let mut x1 = x1;
        let mut y1 = y1;
        let mut z1 = z1;
        let mut x2 = x2;
        let mut y2 = y2;
        let mut z2 = z2;
        let mut extent = [0.0_f64; 3];
        {
            let mut axes: [[&mut Vec<f64>; 2]; 3] =
                [[&mut x1, &mut x2], [&mut y1, &mut y2], [&mut z1, &mut z2]];
            for ax in 0..3 {
                let all = axes[ax][0].iter().chain(axes[ax][1].iter());
                let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
                for &value in all {
                    lo = lo.min(value);
                    hi = hi.max(value);
                }
                // empty point sets still get a valid (radius-sized) box
                if lo > hi {
                    (lo, hi) = (0.0, 0.0);
                }
                for buf in axes[ax].iter_mut() {
                    for value in buf.iter_mut() {
                        *value -= lo;
                    }
                }
                extent[ax] = (hi - lo).max(3.0 * search_radii[ax]);
            }
        }
        Ok(ProcessedPoints {
            x1,
            y1,
            z1,
            x2,
            y2,
            z2,
            extent,
            periodic: false,
        })
    }
}
