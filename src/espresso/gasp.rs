//! LAST_GASP and SUPER_GASP: escape from local minima
//!
//! `reduce_gasp` shrinks every cube as far as it can go independently of the
//! others (coverage may transiently be lost), `expand_gasp` regrows the
//! shrunken cubes towards each other and keeps only the raisings that merge
//! at least one other shrunken cube, and a final IRREDUNDANT over the union
//! of the original cover and the newcomers picks the winner. The result is
//! accepted only when it is strictly cheaper than the cover going in.

use std::time::Instant;

use log::debug;

use super::cover::{Cost, RawCover};
use super::cube::CubeLayout;
use super::expand::weight_order;
use super::irredundant::irredundant;
use super::reduce::reduce_cube;

/// One gasp round. Returns the improved cover, or the input unchanged when
/// the round does not strictly beat it.
pub fn last_gasp(
    layout: &CubeLayout,
    f: RawCover,
    d: &RawCover,
    r: &RawCover,
    deadline: Option<Instant>,
) -> RawCover {
    let before = Cost::of(layout, &f);
    let shrunk = reduce_gasp(layout, &f, d);
    let newcomers = expand_gasp(layout, &shrunk, r);
    if newcomers.is_empty() {
        return f;
    }
    let mut pool = f.clone();
    pool.append_cover(&newcomers);
    let candidate = irredundant(layout, pool, d, deadline);
    let after = Cost::of(layout, &candidate);
    if after < before {
        debug!("last_gasp: improved {before} -> {after}");
        candidate
    } else {
        f
    }
}

/// Iterate [`last_gasp`] until a round fails to improve the cover.
pub fn super_gasp(
    layout: &CubeLayout,
    mut f: RawCover,
    d: &RawCover,
    r: &RawCover,
    deadline: Option<Instant>,
) -> RawCover {
    loop {
        if let Some(dl) = deadline {
            if Instant::now() >= dl {
                return f;
            }
        }
        let before = Cost::of(layout, &f);
        f = last_gasp(layout, f, d, r, deadline);
        if Cost::of(layout, &f) >= before {
            return f;
        }
    }
}

/// Shrink every cube independently against the *original* rest-of-cover:
/// each cube keeps only the envelope of the minterms it alone contributes.
/// Unlike REDUCE this is not sequential, so the union may lose points; the
/// caller restores coverage by keeping the original cover in the pool.
fn reduce_gasp(layout: &CubeLayout, f: &RawCover, d: &RawCover) -> RawCover {
    let n = f.count();
    let mut out = RawCover::with_capacity(layout.words(), n);
    for i in 0..n {
        let mut rest = RawCover::with_capacity(layout.words(), n - 1 + d.count());
        for j in 0..n {
            if j != i {
                rest.push(f.cube(j));
            }
        }
        rest.append_cover(d);
        if let Some(c) = reduce_cube(layout, f.cube(i), &rest) {
            out.push(&c);
        }
    }
    out
}

/// Regrow each shrunken cube towards the other shrunken cubes: raise to the
/// supercube with another cube whenever that stays off the OFF-set, and keep
/// the result only when it swallowed at least one sibling.
fn expand_gasp(layout: &CubeLayout, g: &RawCover, r: &RawCover) -> RawCover {
    let n = g.count();
    let mut out = RawCover::new(layout.words());
    if n < 2 {
        return out;
    }
    let order = weight_order(layout, g, false);
    let mut raised = layout.empty_cube();
    for &i in &order {
        let mut c = g.cube(i).to_vec().into_boxed_slice();
        let mut merged_any = false;
        for &j in &order {
            if j == i {
                continue;
            }
            layout.supercube(&c, g.cube(j), &mut raised);
            if r.iter().all(|rc| layout.distance(&raised, rc) > 0) {
                c.copy_from_slice(&raised);
                merged_any = true;
            }
        }
        if merged_any {
            out.push(&c);
        }
    }
    // Duplicates among the merged cubes carry no information.
    out.contain_sort();
    debug!("expand_gasp: {} candidate cubes", out.count());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::espresso::cube::WORD_BITS;

    fn cube(layout: &CubeLayout, bits: &[usize]) -> Box<[u64]> {
        let mut c = layout.empty_cube();
        for &b in bits {
            c[b / WORD_BITS] |= 1 << (b % WORD_BITS);
        }
        c
    }

    #[test]
    fn test_gasp_keeps_optimal_cover() {
        let l = CubeLayout::binary(2, 1);
        // XOR is already minimum; gasp must hand it back untouched.
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 3, 4]));
        f.push(&cube(&l, &[1, 2, 4]));
        let d = RawCover::new(l.words());
        let mut r = RawCover::new(l.words());
        r.push(&cube(&l, &[0, 2, 4]));
        r.push(&cube(&l, &[1, 3, 4]));
        let out = last_gasp(&l, f.clone(), &d, &r, None);
        assert_eq!(out, f);
    }

    #[test]
    fn test_gasp_merges_through_reduction() {
        let l = CubeLayout::binary(3, 1);
        // {00- 1, 0-1 1} with everything else OFF: the two cubes overlap at
        // 001; shrinking separates them, regrowing glues them back; no
        // improvement is possible so the cover survives as-is.
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 2, 4, 5, 6])); // 00- 1
        f.push(&cube(&l, &[0, 2, 3, 5, 6])); // 0-1 1
        let d = RawCover::new(l.words());
        let mut fd = f.clone();
        fd.append_cover(&d);
        let r = fd.complement(&l);
        let cost_before = Cost::of(&l, &f);
        let out = last_gasp(&l, f, &d, &r, None);
        assert!(Cost::of(&l, &out) <= cost_before);
    }

    #[test]
    fn test_super_gasp_terminates() {
        let l = CubeLayout::binary(2, 1);
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 2, 3, 4])); // 0- 1
        f.push(&cube(&l, &[1, 2, 3, 4])); // 1- 1
        let d = RawCover::new(l.words());
        let r = RawCover::new(l.words());
        let out = super_gasp(&l, f, &d, &r, None);
        assert!(out.count() <= 2);
    }
}
