//! Brute-force distance kernels applied within a single cell pair.
//!
//! These kernels carry no periodic-boundary logic: the destination cell's
//! coordinates must already include the enumerator's image shift. Filtering
//! happens in squared distance so the square root is only paid for accepted
//! pairs; the threshold comparison is inclusive (`<=`).

/// Accumulates accepted pairs from the isotropic kernel.
///
/// Buffers grow amortized and are meant to be reused across the cell pairs of
/// one work unit (`clear` keeps the allocation).
#[derive(Default)]
pub struct PairList {
    pub distances: Vec<f64>,
    pub i: Vec<usize>,
    pub j: Vec<usize>,
}

impl PairList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn clear(&mut self) {
        self.distances.clear();
        self.i.clear();
        self.j.clear();
    }

    /// move `other`'s entries onto the end of `self`
    pub fn append(&mut self, other: &mut PairList) {
        self.distances.append(&mut other.distances);
        self.i.append(&mut other.i);
        self.j.append(&mut other.j);
    }
}

/// Accumulates accepted pairs from the perpendicular/parallel kernel.
#[derive(Default)]
pub struct SplitPairList {
    pub perp: Vec<f64>,
    pub para: Vec<f64>,
    pub i: Vec<usize>,
    pub j: Vec<usize>,
}

impl SplitPairList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.perp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perp.is_empty()
    }

    pub fn clear(&mut self) {
        self.perp.clear();
        self.para.clear();
        self.i.clear();
        self.j.clear();
    }

    pub fn append(&mut self, other: &mut SplitPairList) {
        self.perp.append(&mut other.perp);
        self.para.append(&mut other.para);
        self.i.append(&mut other.i);
        self.j.append(&mut other.j);
    }
}

/// record every pair with squared Euclidean separation `<= r_max_squared`
///
/// Indices are recorded as local positions offset by `i_offset`/`j_offset`,
/// i.e. already in each grid's sorted global index space.
#[allow(clippy::too_many_arguments)]
pub fn pairwise_distances(
    x1: &[f64],
    y1: &[f64],
    z1: &[f64],
    x2: &[f64],
    y2: &[f64],
    z2: &[f64],
    i_offset: usize,
    j_offset: usize,
    r_max_squared: f64,
    out: &mut PairList,
) {
    for i in 0..x1.len() {
        for j in 0..x2.len() {
            let dx = x1[i] - x2[j];
            let dy = y1[i] - y2[j];
            let dz = z1[i] - z2[j];
            let d_squared = dx * dx + dy * dy + dz * dz;
            if d_squared <= r_max_squared {
                out.distances.push(d_squared.sqrt());
                out.i.push(i + i_offset);
                out.j.push(j + j_offset);
            }
        }
    }
}

/// record every pair whose perpendicular (x, y) squared separation is
/// `<= rp_max_squared` AND whose parallel (z) squared separation is
/// `<= pi_max_squared`; both components are recorded for accepted pairs
#[allow(clippy::too_many_arguments)]
pub fn pairwise_xy_z_distances(
    x1: &[f64],
    y1: &[f64],
    z1: &[f64],
    x2: &[f64],
    y2: &[f64],
    z2: &[f64],
    i_offset: usize,
    j_offset: usize,
    rp_max_squared: f64,
    pi_max_squared: f64,
    out: &mut SplitPairList,
) {
    for i in 0..x1.len() {
        for j in 0..x2.len() {
            let dx = x1[i] - x2[j];
            let dy = y1[i] - y2[j];
            let dz = z1[i] - z2[j];
            let perp_squared = dx * dx + dy * dy;
            let para_squared = dz * dz;
            if perp_squared <= rp_max_squared && para_squared <= pi_max_squared {
                out.perp.push(perp_squared.sqrt());
                out.para.push(para_squared.sqrt());
                out.i.push(i + i_offset);
                out.j.push(j + j_offset);
            }
        }
    }
}
