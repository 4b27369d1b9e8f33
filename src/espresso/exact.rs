//! Exact minimization: all primes, the covering table and its solution
//!
//! Primes are generated by raising every minterm of the ON-set in all legal
//! directions against the OFF-set until nothing can be raised; the covering
//! table (primes × ON-minterms) is then reduced and searched by the shared
//! minimum-cover engine. A configurable ceiling bounds the enumeration;
//! beyond it the solver reports `LimitExceeded` so the caller can fall back
//! to the heuristic driver.

use std::collections::BTreeSet;
use std::time::Instant;

use log::debug;

use super::cover::RawCover;
use super::cube::{cube_contains, CubeLayout, WORD_BITS};
use super::error::EspressoError;
use super::mincov::{minimum_cover, SparseMatrix};

/// Outcome of the exact covering search.
#[derive(Debug)]
pub struct ExactCover {
    /// The selected primes.
    pub cover: RawCover,
    /// False when the deadline interrupted the branch-and-bound; the cover
    /// is still valid, just not proved minimum.
    pub minimum: bool,
}

/// Solve the minimum-cover problem exactly: the fewest primes of F ∪ D
/// (represented by its OFF-set complement `r`) that cover every minterm of
/// `f`.
pub fn exact_cover(
    layout: &CubeLayout,
    f: &RawCover,
    r: &RawCover,
    table_limit: usize,
    deadline: Option<Instant>,
) -> Result<ExactCover, EspressoError> {
    if f.is_empty() {
        return Ok(ExactCover {
            cover: RawCover::new(layout.words()),
            minimum: true,
        });
    }
    let minterms = enumerate_minterms(layout, f, table_limit)?;
    let primes = all_primes(layout, &minterms, r, table_limit)?;
    debug!(
        "exact: {} minterms, {} primes",
        minterms.len(),
        primes.len()
    );
    if primes
        .len()
        .checked_mul(minterms.len())
        .map(|cells| cells > table_limit)
        .unwrap_or(true)
    {
        return Err(EspressoError::LimitExceeded {
            limit: table_limit,
            required: primes.len().saturating_mul(minterms.len()),
        });
    }

    let mut table = SparseMatrix::new(primes.len(), minterms.len());
    for (row, p) in primes.iter().enumerate() {
        for (col, m) in minterms.iter().enumerate() {
            if cube_contains(p, m) {
                table.insert(row, col);
            }
        }
    }
    let solution = minimum_cover(&table, deadline)
        .expect("every minterm is covered by at least one prime grown from it");

    let mut cover = RawCover::with_capacity(layout.words(), solution.rows.len());
    for &row in &solution.rows {
        cover.push(&primes[row]);
    }
    cover.sort_canonical();
    Ok(ExactCover {
        cover,
        minimum: solution.optimal,
    })
}

/// Every minterm of `f`, canonically ordered. A minterm fixes one part per
/// input variable and asserts exactly one output.
fn enumerate_minterms(
    layout: &CubeLayout,
    f: &RawCover,
    limit: usize,
) -> Result<Vec<Box<[u64]>>, EspressoError> {
    let mut seen: BTreeSet<Box<[u64]>> = BTreeSet::new();
    for c in f.iter() {
        expand_cube_minterms(layout, c, &mut seen, limit)?;
    }
    Ok(seen.into_iter().collect())
}

/// Cartesian expansion of one cube into its minterms.
fn expand_cube_minterms(
    layout: &CubeLayout,
    c: &[u64],
    seen: &mut BTreeSet<Box<[u64]>>,
    limit: usize,
) -> Result<(), EspressoError> {
    let nv = layout.num_vars();
    // One choice of set bit per variable field.
    let mut choices: Vec<Vec<usize>> = Vec::with_capacity(nv);
    for v in 0..nv {
        let off = layout.var_offset(v);
        let bits: Vec<usize> = (0..layout.var_parts(v))
            .map(|p| off + p)
            .filter(|&b| c[b / WORD_BITS] >> (b % WORD_BITS) & 1 == 1)
            .collect();
        debug_assert!(!bits.is_empty(), "covers never hold empty-field cubes");
        choices.push(bits);
    }
    let mut indices = vec![0usize; nv];
    loop {
        let mut m = layout.empty_cube();
        for (v, &idx) in indices.iter().enumerate() {
            let b = choices[v][idx];
            m[b / WORD_BITS] |= 1u64 << (b % WORD_BITS);
        }
        seen.insert(m);
        if seen.len() > limit {
            return Err(EspressoError::LimitExceeded {
                limit,
                required: seen.len(),
            });
        }
        // Odometer step.
        let mut v = nv;
        loop {
            if v == 0 {
                return Ok(());
            }
            v -= 1;
            indices[v] += 1;
            if indices[v] < choices[v].len() {
                break;
            }
            indices[v] = 0;
        }
    }
}

/// All primes reachable by raising the given minterms against `r`,
/// canonically ordered. Exhaustive raising with global deduplication;
/// every prime containing an ON-minterm is reached because any subcube of a
/// prime is itself disjoint from the OFF-set.
fn all_primes(
    layout: &CubeLayout,
    minterms: &[Box<[u64]>],
    r: &RawCover,
    limit: usize,
) -> Result<Vec<Box<[u64]>>, EspressoError> {
    let mut visited: BTreeSet<Box<[u64]>> = minterms.iter().cloned().collect();
    let mut primes: BTreeSet<Box<[u64]>> = BTreeSet::new();
    let mut stack: Vec<Box<[u64]>> = minterms.to_vec();
    let mut trial = layout.empty_cube();
    while let Some(c) = stack.pop() {
        let mut any_raise = false;
        for b in 0..layout.total_bits() {
            if c[b / WORD_BITS] >> (b % WORD_BITS) & 1 == 1 {
                continue;
            }
            trial.copy_from_slice(&c);
            trial[b / WORD_BITS] |= 1u64 << (b % WORD_BITS);
            if r.iter().all(|rc| layout.distance(&trial, rc) > 0) {
                any_raise = true;
                if visited.insert(trial.clone()) {
                    stack.push(trial.clone());
                    if visited.len() > limit {
                        return Err(EspressoError::LimitExceeded {
                            limit,
                            required: visited.len(),
                        });
                    }
                }
            }
        }
        if !any_raise {
            primes.insert(c);
        }
    }
    Ok(primes.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(layout: &CubeLayout, bits: &[usize]) -> Box<[u64]> {
        let mut c = layout.empty_cube();
        for &b in bits {
            c[b / WORD_BITS] |= 1 << (b % WORD_BITS);
        }
        c
    }

    #[test]
    fn test_exact_full_truth_table_collapses() {
        let l = CubeLayout::binary(2, 1);
        // All four minterms: the only prime is the universe cube.
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 2, 4])); // 00 1
        f.push(&cube(&l, &[0, 3, 4])); // 01 1
        f.push(&cube(&l, &[1, 2, 4])); // 10 1
        f.push(&cube(&l, &[1, 3, 4])); // 11 1
        let r = RawCover::new(l.words());
        let out = exact_cover(&l, &f, &r, 10_000, None).expect("within limits");
        assert!(out.minimum);
        assert_eq!(out.cover.count(), 1);
        assert_eq!(out.cover.cube(0), l.full_cube());
    }

    #[test]
    fn test_exact_xor_needs_both_cubes() {
        let l = CubeLayout::binary(2, 1);
        let mut f = RawCover::new(l.words());
        f.push(&cube(&l, &[0, 3, 4]));
        f.push(&cube(&l, &[1, 2, 4]));
        let d = RawCover::new(l.words());
        let mut fd = f.clone();
        fd.append_cover(&d);
        let r = fd.complement(&l);
        let out = exact_cover(&l, &f, &r, 10_000, None).expect("within limits");
        assert!(out.minimum);
        assert_eq!(out.cover.count(), 2);
    }

    #[test]
    fn test_exact_respects_table_limit() {
        let l = CubeLayout::binary(4, 1);
        let mut f = RawCover::new(l.words());
        f.push(l.full_cube());
        let r = RawCover::new(l.words());
        let err = exact_cover(&l, &f, &r, 4, None).unwrap_err();
        assert!(matches!(err, EspressoError::LimitExceeded { .. }));
    }

    #[test]
    fn test_minterm_enumeration_counts() {
        let l = CubeLayout::binary(2, 2);
        // -- 11 has four input minterms times two outputs.
        let mut f = RawCover::new(l.words());
        f.push(l.full_cube());
        let ms = enumerate_minterms(&l, &f, 100).expect("within limits");
        assert_eq!(ms.len(), 8);
    }
}
