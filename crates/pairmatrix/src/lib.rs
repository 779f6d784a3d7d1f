/*!
Radius-limited pair searches between 3D point sets, returning sparse
pair-distance matrices.

Given two point sets over a rectangular (optionally periodic) domain,
[`pair_matrix`] finds every pair within a Euclidean distance threshold and
[`xy_z_pair_matrix`] finds every pair within independent perpendicular
(projected xy) and parallel (z) bounds. Results come back as sparse
triplet-format matrices indexed by the callers' original point ordering.

Internally both entry points index each point set over a shared cell grid,
enumerate the destination cells (and periodic images) within range of each
source cell, and brute-force only those cell pairs. The per-cell phase is
embarrassingly parallel; see [`SearchOpts::num_workers`].

# Example

```
use ndarray::array;
use pairmatrix::{SearchOpts, pair_matrix};

let points1 = array![[0.0], [0.0], [0.0]];
let points2 = array![[0.0, 0.5, 2.0], [0.0; 3], [0.0; 3]];
let m = pair_matrix(points1.view(), points2.view(), 0.6, &SearchOpts::default())?;
assert_eq!(m.nnz(), 2); // the pair at distance 2.0 is beyond the threshold
# Ok::<(), pairmatrix::Error>(())
```
*/

#![deny(rustdoc::broken_intra_doc_links)]

// inform build-system of the crates in this package
mod engine;
mod error;
mod func;
mod process;

// pull in symbols that are visible outside of the package
pub use error::Error;
pub use func::{NumWorkers, Period, SearchOpts, pair_matrix, xy_z_pair_matrix};
