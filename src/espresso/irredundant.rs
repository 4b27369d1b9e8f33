//! IRREDUNDANT: remove redundant cubes from a cover
//!
//! The cover is partitioned against the don't-care set into relatively
//! essential cubes (each owns a minterm nothing else covers; always kept),
//! totally redundant cubes (covered by the essentials and the don't-cares;
//! always dropped) and the partially redundant remainder. Over the remainder
//! a witness/covering matrix is solved for a minimum selection; a
//! verification sweep then guarantees no coverage is lost and a final
//! removal pass restores irredundancy.

use std::collections::BTreeSet;
use std::time::Instant;

use log::debug;

use super::cover::{sharp_against_cover, RawCover};
use super::cube::{cube_contains, CubeLayout};
use super::mincov::{minimum_cover, SparseMatrix};

/// Make `f` an irredundant cover of the same region relative to `d`.
pub fn irredundant(
    layout: &CubeLayout,
    f: RawCover,
    d: &RawCover,
    deadline: Option<Instant>,
) -> RawCover {
    let n = f.count();
    if n <= 1 {
        return f;
    }

    // Partition: relatively essential / totally redundant / partially
    // redundant.
    let mut relatively_essential = Vec::new();
    let mut redundant_candidates = Vec::new();
    for i in 0..n {
        let mut rest = RawCover::with_capacity(layout.words(), n - 1 + d.count());
        for j in 0..n {
            if j != i {
                rest.push(f.cube(j));
            }
        }
        rest.append_cover(d);
        if rest.covers_cube(layout, f.cube(i)) {
            redundant_candidates.push(i);
        } else {
            relatively_essential.push(i);
        }
    }
    if redundant_candidates.is_empty() {
        return f;
    }

    let mut er = RawCover::with_capacity(layout.words(), relatively_essential.len());
    for &i in &relatively_essential {
        er.push(f.cube(i));
    }
    let mut er_d = er.clone();
    er_d.append_cover(d);

    // Totally redundant cubes disappear now; the rest form the covering
    // sub-problem.
    let mut partially_redundant = Vec::new();
    for &i in &redundant_candidates {
        if !er_d.covers_cube(layout, f.cube(i)) {
            partially_redundant.push(i);
        }
    }
    debug!(
        "irredundant: {} essential, {} totally redundant, {} partial",
        relatively_essential.len(),
        redundant_candidates.len() - partially_redundant.len(),
        partially_redundant.len()
    );
    if partially_redundant.is_empty() {
        return er;
    }

    // Witness minterms: one representative per cube of r # (Er ∪ D).
    let mut witnesses: Vec<Box<[u64]>> = Vec::new();
    let mut seen: BTreeSet<Box<[u64]>> = BTreeSet::new();
    for &i in &partially_redundant {
        let leftover = sharp_against_cover(layout, f.cube(i), &er_d);
        for piece in leftover.iter() {
            let m = layout.representative_minterm(piece);
            if seen.insert(m.clone()) {
                witnesses.push(m);
            }
        }
    }

    let mut matrix = SparseMatrix::new(partially_redundant.len(), witnesses.len());
    for (row, &i) in partially_redundant.iter().enumerate() {
        for (col, w) in witnesses.iter().enumerate() {
            if cube_contains(f.cube(i), w) {
                matrix.insert(row, col);
            }
        }
    }
    let solution = minimum_cover(&matrix, deadline)
        .expect("every witness lies inside its own partially redundant cube");
    let mut selected: Vec<usize> = solution
        .rows
        .iter()
        .map(|&row| partially_redundant[row])
        .collect();

    // Witnesses are representatives, not whole regions: verify every
    // dropped cube really is covered and re-add the ones that are not.
    for &i in &partially_redundant {
        if selected.contains(&i) {
            continue;
        }
        let mut others = er_d.clone();
        for &s in &selected {
            others.push(f.cube(s));
        }
        if !others.covers_cube(layout, f.cube(i)) {
            selected.push(i);
        }
    }

    // One ordered removal pass: a cube found necessary against a superset
    // of the final cover stays necessary, so a single sweep suffices.
    selected.sort_unstable();
    let mut kept = selected.clone();
    for &i in &selected {
        let mut others = er.clone();
        for &k in &kept {
            if k != i {
                others.push(f.cube(k));
            }
        }
        others.append_cover(d);
        if others.covers_cube(layout, f.cube(i)) {
            kept.retain(|&k| k != i);
        }
    }

    let mut out = er;
    for &i in &kept {
        out.push(f.cube(i));
    }
    debug!("irredundant: {} cubes kept", out.count());
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

    fn is_irredundant(layout: &CubeLayout, f: &RawCover, d: &RawCover) -> bool {
        (0..f.count()).all(|i| {
            let mut rest = RawCover::new(layout.words());
            for j in 0..f.count() {
                if j != i {
                    rest.push(f.cube(j));
                }
            }
            rest.append_cover(d);
            !rest.covers_cube(layout, f.cube(i))
        })
    }

    #[test]
    fn test_drops_middle_consensus_cube() {
        let l = CubeLayout::binary(2, 1);
        // {0- 1, -1 1, 01 1}: the third cube lies inside the union of the
        // first two.
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 2, 3, 4])); // 0- 1
        f.push(&cube(&l, &[0, 1, 3, 4])); // -1 1
        f.push(&cube(&l, &[0, 3, 4])); // 01 1
        let d = RawCover::new(l.words());
        let out = irredundant(&l, f, &d, None);
        assert_eq!(out.count(), 2);
        assert!(is_irredundant(&l, &out, &d));
    }

    #[test]
    fn test_keeps_irredundant_cover() {
        let l = CubeLayout::binary(2, 1);
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 3, 4])); // 01 1
        f.push(&cube(&l, &[1, 2, 4])); // 10 1
        let d = RawCover::new(l.words());
        let out = irredundant(&l, f.clone(), &d, None);
        assert_eq!(out.count(), 2);
    }

    #[test]
    fn test_all_cubes_partially_redundant() {
        let l = CubeLayout::binary(2, 1);
        // All four half-space cubes: every minterm is covered twice, so no
        // cube is relatively essential and the covering sub-problem has to
        // pick a minimum pair.
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 2, 3, 4])); // 0- 1
        f.push(&cube(&l, &[0, 1, 3, 4])); // -1 1
        f.push(&cube(&l, &[1, 2, 3, 4])); // 1- 1
        f.push(&cube(&l, &[0, 1, 2, 4])); // -0 1
        let d = RawCover::new(l.words());
        let out = irredundant(&l, f, &d, None);
        assert_eq!(out.count(), 2);
        assert!(is_irredundant(&l, &out, &d));
        // The pair still covers the whole input space.
        assert!(out.tautology(&l));
    }

    #[test]
    fn test_multi_output_partial_overlap() {
        // 2 inputs, 3 outputs: bits x0 {0,1}, x1 {2,3}, outputs {4,5,6}.
        // The third cube asserts {o0,o2}, split between the first two
        // cubes' output fields ({o0,o1} and {o1,o2}); neither contains it,
        // yet together they cover it.
        let l = CubeLayout::with_parts(&[2, 2], 3);
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[1, 2, 3, 4, 5])); // 1- 110
        f.push(&cube(&l, &[0, 1, 3, 5, 6])); // -1 011
        f.push(&cube(&l, &[1, 3, 4, 6])); // 11 101
        let d = RawCover::new(l.words());
        let out = irredundant(&l, f, &d, None);
        assert_eq!(out.count(), 2);
        assert!(is_irredundant(&l, &out, &d));
        let rendered: Vec<String> = out.iter().map(|c| l.format_cube(c)).collect();
        assert!(rendered.contains(&"1- 110".to_string()));
        assert!(rendered.contains(&"-1 011".to_string()));
    }

    #[test]
    fn test_uses_dont_cares() {
        let l = CubeLayout::binary(2, 1);
        // F = {01 1, -- 1 minus...}: with D = {0- 1}, the cube 01 1 is
        // totally redundant.
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 3, 4])); // 01 1
        f.push(&cube(&l, &[1, 2, 4])); // 10 1
        let mut d = RawCover::new(l.words());
        d.push(&cube(&l, &[0, 2, 3, 4])); // 0- 1
        let out = irredundant(&l, f, &d, None);
        assert_eq!(out.count(), 1);
        assert_eq!(l.format_cube(out.cube(0)), "10 1");
    }
}
