//! The native minimization engine
//!
//! This module is the two-level minimizer proper: the bit-packed cube
//! algebra ([`cube`]), set families and their recursive operations
//! ([`cover`]), and the Espresso phases (EXPAND, IRREDUNDANT, ESSENTIAL,
//! REDUCE, the gasp escapes and the exact covering solver) orchestrated by
//! [`Espresso`].
//!
//! An [`Espresso`] instance fixes the variable layout and the configuration
//! once; everything else is threaded through explicitly, so instances are
//! independent and the engine holds no global state. Covers move in and out
//! as [`EspressoCover`] values, a bit-packed set family tied to the
//! instance's layout.
//!
//! # Example
//!
//! ```
//! use espresso_native::espresso::{Espresso, EspressoCover};
//! use espresso_native::EspressoConfig;
//!
//! // f = a'b + ab': XOR, already minimal.
//! let cubes: Vec<(&[u8], &[u8])> = vec![(&[0, 1], &[1]), (&[1, 0], &[1])];
//! let f = EspressoCover::from_cubes(&cubes, 2, 1).unwrap();
//! let esp = Espresso::new(2, 1, &EspressoConfig::default()).unwrap();
//! let minimized = esp.minimize(&f, None, None).unwrap();
//! assert_eq!(minimized.cover.num_cubes(), 2);
//! ```

pub mod cover;
pub mod cube;
mod error;
mod essential;
mod exact;
mod expand;
mod gasp;
mod irredundant;
mod mincov;
mod reduce;

pub use error::EspressoError;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use self::cover::{Cost, RawCover};
use self::cube::CubeLayout;

/// How hard the heuristic driver works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Full EXPAND/IRREDUNDANT/REDUCE iteration with one LAST_GASP.
    #[default]
    Default,
    /// One single-pass EXPAND plus IRREDUNDANT; no iteration, no gasp.
    Fast,
    /// Like `Default` but iterating SUPER_GASP until it stops paying.
    Strong,
}

/// Configuration for the minimization engine
///
/// Applied once when constructing an [`Espresso`] instance; the engine never
/// reads process-wide state.
#[derive(Debug, Clone)]
pub struct EspressoConfig {
    /// Driver effort level.
    pub strategy: Strategy,
    /// Split multi-output ON-set cubes into single-output cubes before
    /// minimizing; EXPAND re-merges them through the output field.
    pub unwrap_onset: bool,
    /// Derive the ON-set from the don't-care and OFF-sets before starting.
    pub recompute_onset: bool,
    /// Peel essential primes off into the don't-care set for the iteration.
    pub detect_essentials: bool,
    /// Run a final IRREDUNDANT after the gasp phase; without it the result
    /// may keep redundant literals.
    pub final_irredundant: bool,
    /// Minimize the OFF-set instead: F and R swap on input and the result
    /// is the minimized OFF-set.
    pub swap_on_off: bool,
    /// Process REDUCE in inverse (ascending-weight) order.
    pub use_random_order: bool,
    /// Wall-clock budget. Checked at the top of each driver iteration and
    /// at every branch-and-bound node; on expiry the current best cover is
    /// returned with [`SolveStatus::SoftTimeout`].
    pub deadline: Option<Duration>,
    /// Ceiling on the exact solver's enumerations (minterms, primes and
    /// table cells); beyond it [`EspressoError::LimitExceeded`] is returned.
    pub exact_table_limit: usize,
}

impl Default for EspressoConfig {
    fn default() -> Self {
        EspressoConfig {
            strategy: Strategy::Default,
            unwrap_onset: true,
            recompute_onset: false,
            detect_essentials: true,
            final_irredundant: true,
            swap_on_off: false,
            use_random_order: false,
            deadline: None,
            exact_table_limit: 2_000_000,
        }
    }
}

impl EspressoConfig {
    /// A configuration with the defaults.
    pub fn new() -> Self {
        Self::default()
    }
}

/// How a returned cover relates to the optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proved minimum (exact solver, search completed).
    Minimum,
    /// Heuristic result: valid and irredundant, not necessarily minimum.
    Heuristic,
    /// The deadline expired; the cover is valid but the search was cut
    /// short.
    SoftTimeout,
}

/// A minimization result: the new ON-set cover and how it was obtained.
#[derive(Debug, Clone)]
pub struct Minimized {
    /// The minimized ON-set F'.
    pub cover: EspressoCover,
    /// Search outcome.
    pub status: SolveStatus,
}

/// Outcome of the consistency check on a cover triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// F, D and R partition the space.
    Ok,
    /// Some point lies in none of the three sets; the witness cube is
    /// PLA-rendered.
    CoverageGap(String),
    /// The ON-set and OFF-set intersect; the witness cube is PLA-rendered.
    OffsetConflict(String),
}

/// A bit-packed cover bound to a variable layout.
///
/// Built from byte-per-variable cube descriptions (0 = low, 1 = high,
/// 2 = don't care for inputs; 0/1 for outputs), stored as packed words.
/// Covers own their cubes exclusively; moving cubes between covers always
/// copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EspressoCover {
    layout: Arc<CubeLayout>,
    raw: RawCover,
}

impl EspressoCover {
    /// Build a cover from explicit cubes.
    ///
    /// Each cube is `(inputs, outputs)`; inputs use 0/1/2 (don't care),
    /// outputs use 0/1. Cubes asserting no output are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use espresso_native::espresso::EspressoCover;
    ///
    /// let cubes: Vec<(&[u8], &[u8])> = vec![(&[0, 1], &[1])];
    /// let cover = EspressoCover::from_cubes(&cubes, 2, 1).unwrap();
    /// assert_eq!(cover.num_cubes(), 1);
    /// ```
    pub fn from_cubes(
        cubes: &[(&[u8], &[u8])],
        num_inputs: usize,
        num_outputs: usize,
    ) -> Result<Self, EspressoError> {
        if num_outputs == 0 {
            return Err(EspressoError::DimensionMismatch {
                expected: (num_inputs, 1),
                actual: (num_inputs, 0),
            });
        }
        let layout = Arc::new(CubeLayout::binary(num_inputs, num_outputs));
        let mut raw = RawCover::with_capacity(layout.words(), cubes.len());
        for (inputs, outputs) in cubes {
            if inputs.len() != num_inputs || outputs.len() != num_outputs {
                return Err(EspressoError::DimensionMismatch {
                    expected: (num_inputs, num_outputs),
                    actual: (inputs.len(), outputs.len()),
                });
            }
            let mut cube = layout.empty_cube();
            for (i, &val) in inputs.iter().enumerate() {
                let off = layout.var_offset(i);
                match val {
                    0 => set_bit(&mut cube, off),
                    1 => set_bit(&mut cube, off + 1),
                    2 => {
                        set_bit(&mut cube, off);
                        set_bit(&mut cube, off + 1);
                    }
                    _ => {
                        return Err(EspressoError::InvalidValue {
                            value: val,
                            position: i,
                        })
                    }
                }
            }
            let out_off = layout.var_offset(layout.output_var());
            let mut any_output = false;
            for (k, &val) in outputs.iter().enumerate() {
                match val {
                    0 => {}
                    1 => {
                        set_bit(&mut cube, out_off + k);
                        any_output = true;
                    }
                    _ => {
                        return Err(EspressoError::InvalidValue {
                            value: val,
                            position: num_inputs + k,
                        })
                    }
                }
            }
            if any_output {
                raw.push(&cube);
            }
        }
        Ok(EspressoCover { layout, raw })
    }

    /// An empty cover over the given dimensions.
    pub fn empty(num_inputs: usize, num_outputs: usize) -> Self {
        let layout = Arc::new(CubeLayout::binary(num_inputs, num_outputs));
        let raw = RawCover::new(layout.words());
        EspressoCover { layout, raw }
    }

    /// Number of cubes.
    pub fn num_cubes(&self) -> usize {
        self.raw.count()
    }

    /// Number of input variables.
    pub fn num_inputs(&self) -> usize {
        self.layout.num_inputs()
    }

    /// Number of outputs.
    pub fn num_outputs(&self) -> usize {
        self.layout.num_outputs()
    }

    /// Total input plus output literal count.
    pub fn num_literals(&self) -> u64 {
        Cost::of(&self.layout, &self.raw).literals
    }

    /// Decode back into byte-per-variable cubes, in stored order.
    pub fn cubes(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut out = Vec::with_capacity(self.raw.count());
        for c in self.raw.iter() {
            let mut inputs = Vec::with_capacity(self.layout.num_inputs());
            for v in 0..self.layout.num_inputs() {
                inputs.push(match self.layout.field_value(c, v) {
                    0b01 => 0,
                    0b10 => 1,
                    _ => 2,
                });
            }
            let out_var = self.layout.output_var();
            let out_off = self.layout.var_offset(out_var);
            let outputs = (0..self.layout.num_outputs())
                .map(|k| {
                    let b = out_off + k;
                    (c[b / cube::WORD_BITS] >> (b % cube::WORD_BITS) & 1) as u8
                })
                .collect();
            out.push((inputs, outputs));
        }
        out
    }

    pub(crate) fn layout(&self) -> &Arc<CubeLayout> {
        &self.layout
    }

    pub(crate) fn raw(&self) -> &RawCover {
        &self.raw
    }

    pub(crate) fn from_raw(layout: Arc<CubeLayout>, raw: RawCover) -> Self {
        EspressoCover { layout, raw }
    }
}

fn set_bit(c: &mut [u64], b: usize) {
    c[b / cube::WORD_BITS] |= 1u64 << (b % cube::WORD_BITS);
}

/// A minimizer instance: a variable layout plus a configuration.
///
/// Construction is cheap and instances are independent; create one per
/// problem. All entry points are pure transformations on cover triples.
pub struct Espresso {
    layout: Arc<CubeLayout>,
    config: EspressoConfig,
}

impl Espresso {
    /// New instance for `num_inputs` binary inputs and `num_outputs`
    /// outputs.
    pub fn new(
        num_inputs: usize,
        num_outputs: usize,
        config: &EspressoConfig,
    ) -> Result<Self, EspressoError> {
        if num_outputs == 0 {
            return Err(EspressoError::DimensionMismatch {
                expected: (num_inputs, 1),
                actual: (num_inputs, 0),
            });
        }
        Ok(Espresso {
            layout: Arc::new(CubeLayout::binary(num_inputs, num_outputs)),
            config: config.clone(),
        })
    }

    /// The configuration this instance runs with.
    pub fn config(&self) -> &EspressoConfig {
        &self.config
    }

    /// Heuristically minimize `(f, d, r)`.
    ///
    /// Missing sets are derived: `d` defaults to empty, `r` to the
    /// complement of `f ∪ d`. Returns a cover F' with
    /// F ⊆ F' ⊆ F ∪ D, disjoint from R, with at most as many cubes as `f`.
    pub fn minimize(
        &self,
        f: &EspressoCover,
        d: Option<&EspressoCover>,
        r: Option<&EspressoCover>,
    ) -> Result<Minimized, EspressoError> {
        let (f0, d0, r0) = self.prepare_unwrapped(f, d, r)?;
        // The fallback baseline is the cover as the caller handed it over;
        // unwrapping happens after so that the cube-count guarantee is
        // measured against the original, not its single-output split.
        let mut baseline = f0.clone();
        baseline.contain_sort();
        let work = if self.config.unwrap_onset {
            unwrap_onset(&self.layout, f0)
        } else {
            f0
        };
        let deadline = self.config.deadline.map(|budget| Instant::now() + budget);
        let (raw, status) = self.heuristic_loop(work, baseline, &d0, &r0, deadline)?;
        Ok(Minimized {
            cover: EspressoCover::from_raw(Arc::clone(&self.layout), raw),
            status,
        })
    }

    /// Exactly minimize `(f, d, r)`: the returned cover has the provably
    /// minimum number of primes (unless the deadline interrupts, which
    /// yields a valid cover tagged [`SolveStatus::SoftTimeout`]).
    pub fn minimize_exact(
        &self,
        f: &EspressoCover,
        d: Option<&EspressoCover>,
        r: Option<&EspressoCover>,
    ) -> Result<Minimized, EspressoError> {
        let (f0, d0, r0) = self.prepare_unwrapped(f, d, r)?;
        let deadline = self.config.deadline.map(|budget| Instant::now() + budget);
        let layout = &*self.layout;
        let solved = exact::exact_cover(
            layout,
            &f0,
            &r0,
            self.config.exact_table_limit,
            deadline,
        )?;
        // One literal-trimming pass; the cube count is pinned at the
        // optimum, only literals move.
        let reduced = reduce::reduce(layout, solved.cover, &d0, false);
        let mut raw = expand::expand(layout, reduced, &r0, false);
        raw.sort_canonical();
        self.verify_coverage(&f0, &raw, &d0)?;
        Ok(Minimized {
            cover: EspressoCover::from_raw(Arc::clone(&self.layout), raw),
            status: if solved.minimum {
                SolveStatus::Minimum
            } else {
                SolveStatus::SoftTimeout
            },
        })
    }

    /// One EXPAND plus IRREDUNDANT pass: cheap cleanup without the full
    /// iteration.
    pub fn simplify(
        &self,
        f: &EspressoCover,
        d: Option<&EspressoCover>,
        r: Option<&EspressoCover>,
    ) -> Result<Minimized, EspressoError> {
        let (f0, d0, r0) = self.prepare(f, d, r)?;
        let deadline = self.config.deadline.map(|budget| Instant::now() + budget);
        let layout = &*self.layout;
        let goal = f0.clone();
        let expanded = expand::expand(layout, f0, &r0, false);
        let mut raw = irredundant::irredundant(layout, expanded, &d0, deadline);
        raw.sort_canonical();
        self.verify_coverage(&goal, &raw, &d0)?;
        Ok(Minimized {
            cover: EspressoCover::from_raw(Arc::clone(&self.layout), raw),
            status: SolveStatus::Heuristic,
        })
    }

    /// Verify that `(f, d, r)` partitions the space: F and R must not
    /// intersect, and F ∪ D ∪ R must cover every point.
    pub fn check(
        &self,
        f: &EspressoCover,
        d: &EspressoCover,
        r: &EspressoCover,
    ) -> Result<CheckOutcome, EspressoError> {
        self.validate(f)?;
        self.validate(d)?;
        self.validate(r)?;
        let layout = &*self.layout;
        if let Some(witness) = offset_conflict(layout, f.raw(), r.raw()) {
            return Ok(CheckOutcome::OffsetConflict(layout.format_cube(&witness)));
        }
        let mut all = f.raw().clone();
        all.append_cover(d.raw());
        all.append_cover(r.raw());
        let gap = all.complement(layout);
        if gap.is_empty() {
            Ok(CheckOutcome::Ok)
        } else {
            Ok(CheckOutcome::CoverageGap(layout.format_cube(gap.cube(0))))
        }
    }

    /// Shared preparation: validate, derive missing sets, apply the
    /// onset-recompute and swap options, reject F ∩ R ≠ ∅, unwrap.
    fn prepare(
        &self,
        f: &EspressoCover,
        d: Option<&EspressoCover>,
        r: Option<&EspressoCover>,
    ) -> Result<(RawCover, RawCover, RawCover), EspressoError> {
        let (f0, d0, r0) = self.prepare_unwrapped(f, d, r)?;
        let f0 = if self.config.unwrap_onset {
            unwrap_onset(&self.layout, f0)
        } else {
            f0
        };
        Ok((f0, d0, r0))
    }

    fn prepare_unwrapped(
        &self,
        f: &EspressoCover,
        d: Option<&EspressoCover>,
        r: Option<&EspressoCover>,
    ) -> Result<(RawCover, RawCover, RawCover), EspressoError> {
        self.validate(f)?;
        if let Some(d) = d {
            self.validate(d)?;
        }
        if let Some(r) = r {
            self.validate(r)?;
        }
        let layout = &*self.layout;
        let mut f0 = f.raw().clone();
        let d0 = d
            .map(|c| c.raw().clone())
            .unwrap_or_else(|| RawCover::new(layout.words()));
        let mut r0 = match r {
            Some(r) => r.raw().clone(),
            None => {
                let mut fd = f0.clone();
                fd.append_cover(&d0);
                fd.complement(layout)
            }
        };
        if self.config.recompute_onset {
            let mut dr = d0.clone();
            dr.append_cover(&r0);
            f0 = dr.complement(layout);
        }
        if self.config.swap_on_off {
            std::mem::swap(&mut f0, &mut r0);
        }
        if let Some(witness) = offset_conflict(layout, &f0, &r0) {
            return Err(EspressoError::OffsetConflict {
                cube: layout.format_cube(&witness),
            });
        }
        Ok((f0, d0, r0))
    }

    /// The EXPAND / IRREDUNDANT / REDUCE iteration of the heuristic driver,
    /// with essential-prime peeling and the configured gasp escape.
    /// `baseline` is the caller's (contain-sorted, pre-unwrap) cover: it is
    /// the coverage goal and the fallback when the pipeline ends costlier.
    fn heuristic_loop(
        &self,
        f: RawCover,
        baseline: RawCover,
        d: &RawCover,
        r: &RawCover,
        deadline: Option<Instant>,
    ) -> Result<(RawCover, SolveStatus), EspressoError> {
        let layout = &*self.layout;
        let goal = baseline.clone();
        let initial_cost = Cost::of(layout, &baseline);
        let single = self.config.strategy == Strategy::Fast;
        let mut status = SolveStatus::Heuristic;

        let mut f = expand::expand(layout, f, r, single);
        f = irredundant::irredundant(layout, f, d, deadline);

        // Peel essential primes: they join the don't-care set for the
        // iteration and return to F at the end.
        let mut essentials = RawCover::new(layout.words());
        let mut d_work = d.clone();
        if self.config.detect_essentials {
            let idx = essential::essential_indices(layout, &f, d);
            for &i in &idx {
                essentials.push(f.cube(i));
                d_work.push(f.cube(i));
            }
            let keep: Vec<bool> = (0..f.count()).map(|i| !idx.contains(&i)).collect();
            f.retain_indices(|i| keep[i]);
        }

        if self.config.strategy != Strategy::Fast {
            let mut prev = Cost::of(layout, &f);
            loop {
                if expired(deadline) {
                    status = SolveStatus::SoftTimeout;
                    break;
                }
                let snapshot = f.clone();
                f = reduce::reduce(layout, f, &d_work, self.config.use_random_order);
                f = expand::expand(layout, f, r, false);
                f = irredundant::irredundant(layout, f, &d_work, deadline);
                let cost = Cost::of(layout, &f);
                debug!("espresso iteration: {prev} -> {cost}");
                if cost >= prev {
                    // A cycle that gains nothing ends the iteration; one
                    // that actively loses is rolled back.
                    if cost > prev {
                        f = snapshot;
                    }
                    break;
                }
                prev = cost;
            }
            if !expired(deadline) {
                let pre_gasp = Cost::of(layout, &f);
                f = match self.config.strategy {
                    Strategy::Strong => gasp::super_gasp(layout, f, &d_work, r, deadline),
                    _ => gasp::last_gasp(layout, f, &d_work, r, deadline),
                };
                if Cost::of(layout, &f) < pre_gasp {
                    // Gasp newcomers are grown by supercube steps only;
                    // one more EXPAND/IRREDUNDANT makes them prime again.
                    f = expand::expand(layout, f, r, false);
                    f = irredundant::irredundant(layout, f, &d_work, deadline);
                }
            } else {
                status = SolveStatus::SoftTimeout;
            }
        }

        f.append_cover(&essentials);
        if self.config.final_irredundant {
            f = irredundant::irredundant(layout, f, d, deadline);
        }
        f.sort_canonical();

        // The caller's cover is itself a solution; never hand back anything
        // costlier.
        if Cost::of(layout, &f) > initial_cost {
            f = baseline;
            f.sort_canonical();
        }
        self.verify_coverage(&goal, &f, d)?;
        debug_assert!(
            f.iter().all(|c| r.iter().all(|rc| layout.distance(c, rc) > 0)),
            "minimized cover touches the OFF-set"
        );
        Ok((f, status))
    }

    /// Post-condition: every cube of the original ON-set stays covered by
    /// the result plus the don't-care set. A failure is an engine bug.
    fn verify_coverage(
        &self,
        goal: &RawCover,
        result: &RawCover,
        d: &RawCover,
    ) -> Result<(), EspressoError> {
        let layout = &*self.layout;
        let mut pool = result.clone();
        pool.append_cover(d);
        for c in goal.iter() {
            if !pool.covers_cube(layout, c) {
                return Err(EspressoError::CoverageGap {
                    cube: layout.format_cube(c),
                });
            }
        }
        Ok(())
    }

    fn validate(&self, cover: &EspressoCover) -> Result<(), EspressoError> {
        if cover.layout() != &self.layout {
            return Err(EspressoError::DimensionMismatch {
                expected: (self.layout.num_inputs(), self.layout.num_outputs()),
                actual: (cover.num_inputs(), cover.num_outputs()),
            });
        }
        for (i, c) in cover.raw().iter().enumerate() {
            for v in 0..self.layout.num_vars() {
                if self.layout.field_is_empty(c, v) {
                    return Err(EspressoError::EmptyField { cube: i, variable: v });
                }
            }
        }
        Ok(())
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.map(|dl| Instant::now() >= dl).unwrap_or(false)
}

/// A witness cube of F ∩ R, or `None` when they are disjoint.
fn offset_conflict(layout: &CubeLayout, f: &RawCover, r: &RawCover) -> Option<Box<[u64]>> {
    let mut meet = layout.empty_cube();
    for fc in f.iter() {
        for rc in r.iter() {
            if layout.intersect(fc, rc, &mut meet) {
                return Some(meet);
            }
        }
    }
    None
}

/// Split multi-output cubes into one cube per asserted output.
fn unwrap_onset(layout: &CubeLayout, f: RawCover) -> RawCover {
    let out_var = layout.output_var();
    let out_off = layout.var_offset(out_var);
    let mut result = RawCover::with_capacity(layout.words(), f.count());
    for c in f.iter() {
        let asserted: Vec<usize> = (0..layout.num_outputs())
            .filter(|&k| {
                let b = out_off + k;
                c[b / cube::WORD_BITS] >> (b % cube::WORD_BITS) & 1 == 1
            })
            .collect();
        if asserted.len() <= 1 {
            result.push(c);
        } else {
            let blank = layout.empty_cube();
            for k in asserted {
                let mut single = c.to_vec().into_boxed_slice();
                layout.copy_field(&mut single, &blank, out_var);
                let b = out_off + k;
                single[b / cube::WORD_BITS] |= 1u64 << (b % cube::WORD_BITS);
                result.push(&single);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_set(cubes: &[(&[u8], &[u8])], ni: usize, no: usize) -> EspressoCover {
        EspressoCover::from_cubes(cubes, ni, no).expect("valid cubes")
    }

    #[test]
    fn test_from_cubes_rejects_bad_values() {
        let cubes: Vec<(&[u8], &[u8])> = vec![(&[3, 1], &[1])];
        let err = EspressoCover::from_cubes(&cubes, 2, 1).unwrap_err();
        assert!(matches!(err, EspressoError::InvalidValue { value: 3, .. }));
    }

    #[test]
    fn test_from_cubes_rejects_bad_width() {
        let cubes: Vec<(&[u8], &[u8])> = vec![(&[1], &[1])];
        let err = EspressoCover::from_cubes(&cubes, 2, 1).unwrap_err();
        assert!(matches!(err, EspressoError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_roundtrip_cubes() {
        let cubes: Vec<(&[u8], &[u8])> = vec![(&[0, 1], &[1]), (&[2, 0], &[1])];
        let cover = on_set(&cubes, 2, 1);
        let back = cover.cubes();
        assert_eq!(back, vec![(vec![0, 1], vec![1]), (vec![2, 0], vec![1])]);
    }

    #[test]
    fn test_minimize_or_keeps_two_cubes() {
        let cubes: Vec<(&[u8], &[u8])> = vec![(&[1, 2], &[1]), (&[2, 1], &[1])];
        let f = on_set(&cubes, 2, 1);
        let esp = Espresso::new(2, 1, &EspressoConfig::default()).unwrap();
        let out = esp.minimize(&f, None, None).unwrap();
        assert_eq!(out.cover.num_cubes(), 2);
        assert_eq!(out.status, SolveStatus::Heuristic);
    }

    #[test]
    fn test_minimize_collapses_tautology() {
        let cubes: Vec<(&[u8], &[u8])> = vec![
            (&[0, 0], &[1]),
            (&[0, 1], &[1]),
            (&[1, 0], &[1]),
            (&[1, 1], &[1]),
        ];
        let f = on_set(&cubes, 2, 1);
        let esp = Espresso::new(2, 1, &EspressoConfig::default()).unwrap();
        let out = esp.minimize(&f, None, None).unwrap();
        assert_eq!(out.cover.num_cubes(), 1);
        assert_eq!(out.cover.cubes(), vec![(vec![2, 2], vec![1])]);
    }

    #[test]
    fn test_minimize_uses_dont_cares() {
        // F = {10, 01}, D = {11}: the don't-care lets both cubes expand to
        // the primes 1- and -1, and no single cube covers F.
        let f = on_set(&[(&[1, 0], &[1]), (&[0, 1], &[1])], 2, 1);
        let d = on_set(&[(&[1, 1], &[1])], 2, 1);
        let esp = Espresso::new(2, 1, &EspressoConfig::default()).unwrap();
        let out = esp.minimize(&f, Some(&d), None).unwrap();
        assert_eq!(out.cover.num_cubes(), 2);
    }

    #[test]
    fn test_offset_conflict_detected() {
        let f = on_set(&[(&[1, 2], &[1])], 2, 1);
        let r = on_set(&[(&[1, 1], &[1])], 2, 1);
        let esp = Espresso::new(2, 1, &EspressoConfig::default()).unwrap();
        let err = esp.minimize(&f, None, Some(&r)).unwrap_err();
        assert!(matches!(err, EspressoError::OffsetConflict { .. }));
    }

    #[test]
    fn test_check_partition() {
        let f = on_set(&[(&[1, 2], &[1])], 2, 1);
        let d = EspressoCover::empty(2, 1);
        let r = on_set(&[(&[0, 2], &[1])], 2, 1);
        let esp = Espresso::new(2, 1, &EspressoConfig::default()).unwrap();
        assert_eq!(esp.check(&f, &d, &r).unwrap(), CheckOutcome::Ok);

        let r_short = on_set(&[(&[0, 0], &[1])], 2, 1);
        match esp.check(&f, &d, &r_short).unwrap() {
            CheckOutcome::CoverageGap(_) => {}
            other => panic!("expected coverage gap, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_matches_heuristic_on_easy_function() {
        let cubes: Vec<(&[u8], &[u8])> = vec![(&[0, 0, 2], &[1]), (&[0, 1, 2], &[1])];
        let f = on_set(&cubes, 3, 1);
        let esp = Espresso::new(3, 1, &EspressoConfig::default()).unwrap();
        let heur = esp.minimize(&f, None, None).unwrap();
        let exact = esp.minimize_exact(&f, None, None).unwrap();
        assert_eq!(heur.cover.num_cubes(), 1);
        assert_eq!(exact.cover.num_cubes(), 1);
        assert_eq!(exact.status, SolveStatus::Minimum);
    }

    #[test]
    fn test_swap_on_off_minimizes_complement() {
        let mut config = EspressoConfig::default();
        config.swap_on_off = true;
        // F covers three minterms; the OFF-set is the single minterm 11.
        let f = on_set(
            &[(&[0, 0], &[1]), (&[0, 1], &[1]), (&[1, 0], &[1])],
            2,
            1,
        );
        let esp = Espresso::new(2, 1, &config).unwrap();
        let out = esp.minimize(&f, None, None).unwrap();
        assert_eq!(out.cover.num_cubes(), 1);
        assert_eq!(out.cover.cubes(), vec![(vec![1, 1], vec![1])]);
    }

    #[test]
    fn test_recompute_onset_derives_f() {
        let mut config = EspressoConfig::default();
        config.recompute_onset = true;
        // F is deliberately wrong; D and R pin the real function: R = 0-,
        // D = {}, so the recomputed F covers 1- exactly.
        let f = on_set(&[(&[1, 1], &[1])], 2, 1);
        let r = on_set(&[(&[0, 2], &[1])], 2, 1);
        let esp = Espresso::new(2, 1, &config).unwrap();
        let out = esp.minimize(&f, None, Some(&r)).unwrap();
        assert_eq!(out.cover.cubes(), vec![(vec![1, 2], vec![1])]);
    }

    #[test]
    fn test_skipping_essentials_is_still_correct() {
        let mut config = EspressoConfig::default();
        config.detect_essentials = false;
        let cubes: Vec<(&[u8], &[u8])> = vec![(&[0, 1], &[1]), (&[1, 0], &[1])];
        let f = on_set(&cubes, 2, 1);
        let esp = Espresso::new(2, 1, &config).unwrap();
        let out = esp.minimize(&f, None, None).unwrap();
        assert_eq!(out.cover.num_cubes(), 2);
    }

    #[test]
    fn test_determinism() {
        let cubes: Vec<(&[u8], &[u8])> = vec![
            (&[0, 0, 0, 1], &[1]),
            (&[0, 1, 2, 2], &[1]),
            (&[1, 0, 1, 2], &[1]),
            (&[2, 1, 1, 0], &[1]),
        ];
        let f = on_set(&cubes, 4, 1);
        let esp = Espresso::new(4, 1, &EspressoConfig::default()).unwrap();
        let a = esp.minimize(&f, None, None).unwrap();
        let b = esp.minimize(&f, None, None).unwrap();
        assert_eq!(a.cover.cubes(), b.cover.cubes());
    }
}
