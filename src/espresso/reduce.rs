//! REDUCE: shrink every cube to the smallest cube still needed
//!
//! Each cube is replaced by the smallest cube containing the minterms it
//! alone covers: the supercube of the complement of the cofactor of the
//! rest of the cover (with the don't-care set) against the cube. Cubes are
//! processed largest first so that big cubes give up overlap to the small
//! ones; the `use_random_order` configuration inverts the order.

use log::debug;

use super::cover::RawCover;
use super::cube::CubeLayout;
use super::expand::weight_order;

/// Reduce every cube of `f` against the rest of the cover plus `d`.
/// Cubes reduced to nothing are dropped. Coverage of the union is preserved.
pub fn reduce(layout: &CubeLayout, f: RawCover, d: &RawCover, inverse_order: bool) -> RawCover {
    if f.is_empty() {
        return f;
    }
    let order = weight_order(layout, &f, !inverse_order);
    let n = f.count();
    let mut cubes: Vec<Option<Box<[u64]>>> = f
        .iter()
        .map(|c| Some(c.to_vec().into_boxed_slice()))
        .collect();

    for &i in &order {
        let c = match cubes[i].take() {
            Some(c) => c,
            None => continue,
        };
        // (F \ {c}) ∪ D against the current, partially reduced cover.
        let mut rest = RawCover::with_capacity(layout.words(), n + d.count());
        for (j, other) in cubes.iter().enumerate() {
            if j != i {
                if let Some(o) = other {
                    rest.push(o);
                }
            }
        }
        rest.append_cover(d);
        cubes[i] = reduce_cube(layout, &c, &rest);
    }

    let mut out = RawCover::with_capacity(layout.words(), n);
    for c in cubes.into_iter().flatten() {
        out.push(&c);
    }
    debug!("reduce: {} cubes", out.count());
    out
}

/// The smallest cube containing the minterms of `c` not covered by `rest`,
/// or `None` when `rest` covers `c` entirely.
///
/// Computed as `c ∩ supercube(complement(cofactor(rest, c)))`, with the
/// cofactor padded back onto the full part space so that its complement is
/// exactly the region of `c` that `rest` misses.
pub fn reduce_cube(layout: &CubeLayout, c: &[u64], rest: &RawCover) -> Option<Box<[u64]>> {
    let uncovered = rest.cofactor_padded(layout, c).complement(layout);
    if uncovered.is_empty() {
        return None;
    }
    let mut envelope = layout.empty_cube();
    for u in uncovered.iter() {
        let prev = envelope.clone();
        layout.supercube(&prev, u, &mut envelope);
    }
    let mut reduced = layout.empty_cube();
    let nonempty = layout.intersect(c, &envelope, &mut reduced);
    debug_assert!(nonempty, "uncovered region escaped its own cube");
    nonempty.then_some(reduced)
}
