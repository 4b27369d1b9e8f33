//! EXPAND: grow every cube of the cover into a prime against the OFF-set
//!
//! Cubes are processed in ascending weight order (small, hard-to-cover cubes
//! first). Each cube is raised one part at a time; a raise is legal when the
//! grown cube stays disjoint from every OFF-set cube, and among legal raises
//! the one covering the most other active ON-set cubes wins. Equal merit is
//! broken by the lowest part-bit index, which keeps the output reproducible.

use log::debug;

use super::cover::RawCover;
use super::cube::{cube_contains, CubeLayout, WORD_BITS};

/// Expand every cube of `f` into a prime with respect to `r`, then drop
/// cubes contained in another. `single_pass` selects the cheap one-sweep
/// variant used by the `fast` strategy.
pub fn expand(layout: &CubeLayout, mut f: RawCover, r: &RawCover, single_pass: bool) -> RawCover {
    if f.is_empty() {
        return f;
    }
    let order = weight_order(layout, &f, false);
    let n = f.count();
    let mut covered = vec![false; n];

    for &i in &order {
        if covered[i] {
            continue;
        }
        let mut c = f.cube(i).to_vec().into_boxed_slice();
        if single_pass {
            single_expand_cube(layout, &mut c, r);
        } else {
            expand_cube(layout, &mut c, i, &f, &covered, r);
        }
        // Anything now contained in the prime will be dropped by the final
        // contain-sort; stop expanding it on its own.
        for (j, flag) in covered.iter_mut().enumerate() {
            if j != i && !*flag && cube_contains(&c, f.cube(j)) {
                *flag = true;
            }
        }
        f.cube_mut(i).copy_from_slice(&c);
    }

    f.contain_sort();
    debug!("expand: {} cubes after containment", f.count());
    f
}

/// Raise `c` to a prime, choosing at every step the legal raise that covers
/// the most other active cubes of `f` (ties to the lowest bit index).
fn expand_cube(
    layout: &CubeLayout,
    c: &mut Box<[u64]>,
    self_index: usize,
    f: &RawCover,
    covered: &[bool],
    r: &RawCover,
) {
    let mut candidates = free_bits(layout, c);
    let mut trial = c.clone();
    loop {
        // Legality is monotone: once a raise hits the OFF-set it stays
        // illegal, so filtering the surviving candidates is enough.
        candidates.retain(|&b| {
            trial.copy_from_slice(c);
            set_bit(&mut trial, b);
            disjoint_from_all(layout, &trial, r)
        });
        if candidates.is_empty() {
            break;
        }
        let mut best_bit = candidates[0];
        let mut best_merit = 0usize;
        for &b in &candidates {
            trial.copy_from_slice(c);
            set_bit(&mut trial, b);
            let merit = (0..f.count())
                .filter(|&j| j != self_index && !covered[j] && cube_contains(&trial, f.cube(j)))
                .count();
            // Strict comparison keeps the lowest-index winner among equals;
            // candidates are generated in ascending bit order.
            if merit > best_merit {
                best_merit = merit;
                best_bit = b;
            }
        }
        set_bit(c, best_bit);
        candidates.retain(|&b| b != best_bit);
    }
}

/// One ascending sweep over the free parts, raising each bit that keeps the
/// cube disjoint from the OFF-set. A single sweep already yields a prime:
/// legality only shrinks as the cube grows, so any bit skipped on the way
/// stays illegal.
fn single_expand_cube(layout: &CubeLayout, c: &mut Box<[u64]>, r: &RawCover) {
    let mut trial = c.clone();
    for b in free_bits(layout, c) {
        trial.copy_from_slice(c);
        set_bit(&mut trial, b);
        if disjoint_from_all(layout, &trial, r) {
            set_bit(c, b);
        }
    }
}

/// Cube weights and the processing order they induce.
///
/// The weight of a cube is the sum over its set bits of the number of cubes
/// sharing that bit; light cubes sit in sparse corners of the cover and are
/// expanded first (or last, when `descending` asks for the REDUCE order).
pub fn weight_order(layout: &CubeLayout, f: &RawCover, descending: bool) -> Vec<usize> {
    let mut column_counts = vec![0u64; layout.total_bits()];
    for c in f.iter() {
        for (bit, count) in column_counts.iter_mut().enumerate() {
            if c[bit / WORD_BITS] >> (bit % WORD_BITS) & 1 == 1 {
                *count += 1;
            }
        }
    }
    let weight = |c: &[u64]| -> u64 {
        let mut sum = 0u64;
        for (bit, &count) in column_counts.iter().enumerate() {
            if c[bit / WORD_BITS] >> (bit % WORD_BITS) & 1 == 1 {
                sum = sum.saturating_add(count);
            }
        }
        sum
    };
    let mut order: Vec<usize> = (0..f.count()).collect();
    if descending {
        order.sort_by_key(|&i| (std::cmp::Reverse(weight(f.cube(i))), i));
    } else {
        order.sort_by_key(|&i| (weight(f.cube(i)), i));
    }
    order
}

/// Bit positions of the layout not set in `c`, ascending.
fn free_bits(layout: &CubeLayout, c: &[u64]) -> Vec<usize> {
    (0..layout.total_bits())
        .filter(|&b| c[b / WORD_BITS] >> (b % WORD_BITS) & 1 == 0)
        .collect()
}

fn set_bit(c: &mut [u64], b: usize) {
    c[b / WORD_BITS] |= 1u64 << (b % WORD_BITS);
}

/// True when `c` has distance at least one from every cube of `r`.
fn disjoint_from_all(layout: &CubeLayout, c: &[u64], r: &RawCover) -> bool {
    r.iter().all(|rc| layout.distance(c, rc) > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(layout: &CubeLayout, bits: &[usize]) -> Box<[u64]> {
        let mut c = layout.empty_cube();
        for &b in bits {
            set_bit(&mut c, b);
        }
        c
    }

    #[test]
    fn test_expand_merges_adjacent_cubes() {
        let l = CubeLayout::binary(3, 1);
        // F = {00- 1, 01- 1}, R = {1-- 1}: both cubes expand to 0-- 1.
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 2, 4, 5, 6])); // 00- 1
        f.push(&cube(&l, &[0, 3, 4, 5, 6])); // 01- 1
        let mut r = RawCover::new(l.words());
        r.push(&cube(&l, &[1, 2, 3, 4, 5, 6])); // 1-- 1
        let out = expand(&l, f, &r, false);
        assert_eq!(out.count(), 1);
        assert_eq!(l.format_cube(out.cube(0)), "0-- 1");
    }

    #[test]
    fn test_expand_leaves_primes_alone() {
        let l = CubeLayout::binary(2, 1);
        // XOR: both cubes are already prime.
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 3, 4])); // 01 1
        f.push(&cube(&l, &[1, 2, 4])); // 10 1
        let mut r = RawCover::new(l.words());
        r.push(&cube(&l, &[0, 2, 4])); // 00 1
        r.push(&cube(&l, &[1, 3, 4])); // 11 1
        let out = expand(&l, f.clone(), &r, false);
        assert_eq!(out.count(), 2);
        for c in out.iter() {
            assert!(r.iter().all(|rc| l.distance(c, rc) > 0));
        }
    }

    #[test]
    fn test_expand_result_is_prime() {
        let l = CubeLayout::binary(3, 1);
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 2, 4, 5, 6])); // 00- 1
        let mut r = RawCover::new(l.words());
        r.push(&cube(&l, &[1, 3, 4, 5, 6])); // 11- 1
        let out = expand(&l, f, &r, false);
        assert_eq!(out.count(), 1);
        // No remaining raise may stay disjoint from R.
        let prime = out.cube(0).to_vec().into_boxed_slice();
        for b in free_bits(&l, &prime) {
            let mut raised = prime.clone();
            set_bit(&mut raised, b);
            assert!(!disjoint_from_all(&l, &raised, &r));
        }
    }

    #[test]
    fn test_single_expand_matches_primality() {
        let l = CubeLayout::binary(3, 1);
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 2, 4, 5, 6]));
        let mut r = RawCover::new(l.words());
        r.push(&cube(&l, &[1, 3, 4, 5, 6]));
        let out = expand(&l, f, &r, true);
        let prime = out.cube(0).to_vec().into_boxed_slice();
        for b in free_bits(&l, &prime) {
            let mut raised = prime.clone();
            set_bit(&mut raised, b);
            assert!(!disjoint_from_all(&l, &raised, &r));
        }
    }

    #[test]
    fn test_expand_empty_offset_gives_universe() {
        let l = CubeLayout::binary(2, 1);
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 3, 4]));
        let r = RawCover::new(l.words());
        let out = expand(&l, f, &r, false);
        assert_eq!(out.count(), 1);
        assert_eq!(out.cube(0), l.full_cube());
    }
}
