//! Essential-prime extraction
//!
//! A cube of the cover is essential when it covers a minterm nothing else
//! (including the don't-care set) covers. The test builds the consensus of
//! the cube with every other cube of F ∪ D: the union of those consensus
//! cubes, restricted to the cube itself, covers exactly the part of the cube
//! the rest of the cover can reach. The cube is essential iff that union
//! falls short of the whole cube.

use log::debug;

use super::cover::RawCover;
use super::cube::CubeLayout;

/// Indices of the essential cubes of `f` with respect to `d`.
pub fn essential_indices(layout: &CubeLayout, f: &RawCover, d: &RawCover) -> Vec<usize> {
    let mut essentials = Vec::new();
    for i in 0..f.count() {
        if is_essential(layout, f, d, i) {
            essentials.push(i);
        }
    }
    debug!("essential: {} of {} cubes", essentials.len(), f.count());
    essentials
}

/// Essentiality test for cube `i` of `f`.
fn is_essential(layout: &CubeLayout, f: &RawCover, d: &RawCover, i: usize) -> bool {
    let c = f.cube(i);
    let mut reachable = RawCover::with_capacity(layout.words(), f.count() + d.count());
    let mut cons = layout.empty_cube();
    let others = f
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(_, q)| q)
        .chain(d.iter());
    for q in others {
        if layout.consensus(q, c, &mut cons) {
            reachable.push(&cons);
        }
    }
    // Essential iff the reachable region falls short of the whole cube.
    !reachable.covers_cube(layout, c)
}
