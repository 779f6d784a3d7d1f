#![allow(dead_code)]

// the reason this is named mod.rs has to do with some complexities of how
// testing is handled
//
// we are following the advice of the rust book
// https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

use ndarray::Array2;
use sprs::TriMat;

// based on numpy!
// https://numpy.org/doc/stable/reference/generated/numpy.isclose.html
pub fn isclose(actual: f64, ref_val: f64, rtol: f64, atol: f64) -> bool {
    let actual_nan = actual.is_nan();
    let ref_nan = ref_val.is_nan();
    if actual_nan || ref_nan {
        actual_nan && ref_nan
    } else {
        (actual - ref_val).abs() <= (atol + rtol * ref_val.abs())
    }
}

/// the explicitly stored entries of a triplet matrix, sorted by (row, col)
pub fn entries(m: &TriMat<f64>) -> Vec<(usize, usize, f64)> {
    let mut out: Vec<(usize, usize, f64)> = m
        .triplet_iter()
        .map(|(&value, (row, col))| (row, col, value))
        .collect();
    out.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    out
}

/// assert two sorted entry lists describe the same pairs, with distances
/// compared to within a tight tolerance (the cell-grid path and a direct
/// scan may differ in the last ulp)
pub fn assert_same_pairs(actual: &[(usize, usize, f64)], expected: &[(usize, usize, f64)]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "entry counts differ: {} vs {}",
        actual.len(),
        expected.len(),
    );
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_eq!((a.0, a.1), (e.0, e.1), "pair index mismatch");
        assert!(
            isclose(a.2, e.2, 1.0e-12, 1.0e-14),
            "distance mismatch for pair ({}, {}): {} vs {}",
            a.0,
            a.1,
            a.2,
            e.2,
        );
    }
}

/// per-axis separation under the minimum-image convention
fn separation(a: f64, b: f64, period: Option<f64>) -> f64 {
    let mut d = a - b;
    if let Some(period) = period {
        d -= (d / period).round() * period;
    }
    d
}

/// direct O(n1 * n2) scan; the reference result for `pair_matrix`
pub fn brute_force_pairs(
    points1: &Array2<f64>,
    points2: &Array2<f64>,
    r_max: f64,
    period: Option<[f64; 3]>,
) -> Vec<(usize, usize, f64)> {
    let mut out = Vec::new();
    for i in 0..points1.ncols() {
        for j in 0..points2.ncols() {
            let mut d_squared = 0.0;
            for ax in 0..3 {
                let d = separation(points1[[ax, i]], points2[[ax, j]], period.map(|p| p[ax]));
                d_squared += d * d;
            }
            if d_squared <= r_max * r_max {
                out.push((i, j, d_squared.sqrt()));
            }
        }
    }
    out
}

/// direct scan with independent perpendicular/parallel bounds; the reference
/// result for `xy_z_pair_matrix` (perp and para entries)
pub fn brute_force_split_pairs(
    points1: &Array2<f64>,
    points2: &Array2<f64>,
    rp_max: f64,
    pi_max: f64,
    period: Option<[f64; 3]>,
) -> (Vec<(usize, usize, f64)>, Vec<(usize, usize, f64)>) {
    let mut perp = Vec::new();
    let mut para = Vec::new();
    for i in 0..points1.ncols() {
        for j in 0..points2.ncols() {
            let dx = separation(points1[[0, i]], points2[[0, j]], period.map(|p| p[0]));
            let dy = separation(points1[[1, i]], points2[[1, j]], period.map(|p| p[1]));
            let dz = separation(points1[[2, i]], points2[[2, j]], period.map(|p| p[2]));
            let perp_squared = dx * dx + dy * dy;
            let para_squared = dz * dz;
            if perp_squared <= rp_max * rp_max && para_squared <= pi_max * pi_max {
                perp.push((i, j, perp_squared.sqrt()));
                para.push((i, j, para_squared.sqrt()));
            }
        }
    }
    (perp, para)
}

/// a reproducible `(3, n)` point set with coordinates in `[0, scale)`
pub fn random_points(seed: u64, n: usize, scale: f64) -> Array2<f64> {
    use rand::{Rng, SeedableRng};
    let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(seed);
    Array2::from_shape_fn((3, n), |_| rng.random_range(0.0..scale))
}
