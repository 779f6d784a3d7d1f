/*! Core cell-grid machinery for radius-limited pair searches.
 *
 * This crate holds the dependency-free building blocks: the cell layout and
 * point indexing, the adjacent-cell enumerator (with periodic image shifts),
 * and the brute-force distance kernels. Errors are reported as
 * `&'static str` messages; the public `pairmatrix` crate wraps them in its
 * structured error type.
 */

mod adjacent;
mod dual;
mod grid;
mod kernel;

pub use adjacent::AdjacentCells;
pub use dual::DualGrid;
pub use grid::{GridLayout, IndexedGrid};
pub use kernel::{PairList, SplitPairList, pairwise_distances, pairwise_xy_z_distances};
