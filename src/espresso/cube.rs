//! Bit-packed cube representation and the single-cube algebra
//!
//! A cube is a product term over multi-valued variables, stored as a fixed
//! width bit vector packed into `u64` words. The vector is partitioned into
//! one contiguous field per input variable plus a final field for the
//! outputs. Bit `p` of a field set means "part `p` of this variable is in
//! the cube"; a binary input has two parts (part 0 for value 0, part 1 for
//! value 1), so `01` encodes the literal `x=0`, `10` encodes `x=1` and `11`
//! is the don't-care.
//!
//! All operations here are pure word arithmetic; covers build on them in
//! [`super::cover`].

use std::cmp::Ordering;

/// Bits per storage word.
pub const WORD_BITS: usize = 64;

/// Geometry of the cube bit vector for one minimization problem.
///
/// The layout is shared by every cube and cover of a problem instance and is
/// threaded explicitly through all operations; there is no process-wide cube
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeLayout {
    /// Part count per input variable (2 for a binary input).
    parts: Vec<usize>,
    /// Number of outputs; the output field has one part per output.
    num_outputs: usize,
    /// Bit offset of each variable's field, inputs first, output field last.
    offsets: Vec<usize>,
    /// Total bit width of a cube.
    total_bits: usize,
    /// Words per cube.
    words: usize,
    /// The universe cube: every part of every field set.
    full: Box<[u64]>,
    /// Per variable, the (word, mask) pairs covering its field.
    field_words: Vec<Vec<(usize, u64)>>,
}

impl CubeLayout {
    /// Layout for `num_inputs` binary inputs and `num_outputs` outputs.
    pub fn binary(num_inputs: usize, num_outputs: usize) -> Self {
        Self::with_parts(&vec![2; num_inputs], num_outputs)
    }

    /// Layout for multi-valued inputs with the given part counts.
    pub fn with_parts(parts: &[usize], num_outputs: usize) -> Self {
        debug_assert!(parts.iter().all(|&p| p >= 1));
        debug_assert!(num_outputs >= 1);
        let mut offsets = Vec::with_capacity(parts.len() + 1);
        let mut bit = 0;
        for &p in parts {
            offsets.push(bit);
            bit += p;
        }
        offsets.push(bit);
        let total_bits = bit + num_outputs;
        let words = (total_bits + WORD_BITS - 1) / WORD_BITS;

        let mut field_words = Vec::with_capacity(parts.len() + 1);
        let widths = parts.iter().copied().chain(std::iter::once(num_outputs));
        for (v, width) in widths.enumerate() {
            let start = offsets[v];
            let end = start + width;
            let mut ranges = Vec::new();
            let mut b = start;
            while b < end {
                let w = b / WORD_BITS;
                let lo = b % WORD_BITS;
                let span = (end - b).min(WORD_BITS - lo);
                let mask = if span == WORD_BITS {
                    u64::MAX
                } else {
                    ((1u64 << span) - 1) << lo
                };
                ranges.push((w, mask));
                b += span;
            }
            field_words.push(ranges);
        }

        let mut full = vec![0u64; words].into_boxed_slice();
        for ranges in &field_words {
            for &(w, m) in ranges {
                full[w] |= m;
            }
        }

        CubeLayout {
            parts: parts.to_vec(),
            num_outputs,
            offsets,
            total_bits,
            words,
            full,
            field_words,
        }
    }

    /// Number of input variables.
    pub fn num_inputs(&self) -> usize {
        self.parts.len()
    }

    /// Number of outputs.
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Number of variables including the output field.
    pub fn num_vars(&self) -> usize {
        self.parts.len() + 1
    }

    /// Index of the output variable.
    pub fn output_var(&self) -> usize {
        self.parts.len()
    }

    /// Part count of variable `v` (the output field counts its outputs).
    pub fn var_parts(&self, v: usize) -> usize {
        if v == self.parts.len() {
            self.num_outputs
        } else {
            self.parts[v]
        }
    }

    /// Bit offset of variable `v`'s field.
    pub fn var_offset(&self, v: usize) -> usize {
        self.offsets[v]
    }

    /// The variable owning bit position `bit`.
    pub fn var_of_bit(&self, bit: usize) -> usize {
        debug_assert!(bit < self.total_bits);
        match self.offsets.binary_search(&bit) {
            Ok(v) => v,
            Err(ins) => ins - 1,
        }
    }

    /// Total bit width of a cube.
    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    /// Words per cube.
    pub fn words(&self) -> usize {
        self.words
    }

    /// The universe cube (all parts of all fields set).
    pub fn full_cube(&self) -> &[u64] {
        &self.full
    }

    /// A fresh all-zero cube.
    pub fn empty_cube(&self) -> Box<[u64]> {
        vec![0u64; self.words].into_boxed_slice()
    }

    /// The cube that is full everywhere except variable `v`, restricted to
    /// the single part `p`. Used as the cofactor cube of Shannon splits.
    pub fn part_cube(&self, v: usize, p: usize) -> Box<[u64]> {
        debug_assert!(p < self.var_parts(v));
        let mut c = self.full.to_vec().into_boxed_slice();
        for &(w, m) in &self.field_words[v] {
            c[w] &= !m;
        }
        let bit = self.offsets[v] + p;
        c[bit / WORD_BITS] |= 1u64 << (bit % WORD_BITS);
        c
    }

    /// True when `c`'s field for variable `v` is empty.
    pub fn field_is_empty(&self, c: &[u64], v: usize) -> bool {
        self.field_words[v].iter().all(|&(w, m)| c[w] & m == 0)
    }

    /// True when `c`'s field for variable `v` is full.
    pub fn field_is_full(&self, c: &[u64], v: usize) -> bool {
        self.field_words[v].iter().all(|&(w, m)| c[w] & m == m)
    }

    /// True when `a` and `b` agree on variable `v`'s field.
    pub fn field_eq(&self, a: &[u64], b: &[u64], v: usize) -> bool {
        self.field_words[v].iter().all(|&(w, m)| a[w] & m == b[w] & m)
    }

    /// Number of set parts in `c`'s field for variable `v`.
    pub fn field_count(&self, c: &[u64], v: usize) -> u32 {
        self.field_words[v]
            .iter()
            .map(|&(w, m)| (c[w] & m).count_ones())
            .sum()
    }

    /// The field of variable `v` extracted into a small bitmask
    /// (valid for fields of at most 64 parts, which covers every practical
    /// multi-valued variable).
    pub fn field_value(&self, c: &[u64], v: usize) -> u64 {
        let off = self.offsets[v];
        let mut out = 0u64;
        let mut shift = 0;
        for &(w, m) in &self.field_words[v] {
            let lo = if off > w * WORD_BITS {
                off - w * WORD_BITS
            } else {
                0
            };
            out |= ((c[w] & m) >> lo) << shift;
            shift += m.count_ones() as usize;
        }
        out
    }

    /// Replace `c`'s field for variable `v` by the bits of `src`'s field.
    pub fn copy_field(&self, c: &mut [u64], src: &[u64], v: usize) {
        for &(w, m) in &self.field_words[v] {
            c[w] = (c[w] & !m) | (src[w] & m);
        }
    }

    /// Set every part of variable `v` in `c`.
    pub fn fill_field(&self, c: &mut [u64], v: usize) {
        for &(w, m) in &self.field_words[v] {
            c[w] |= m;
        }
    }

    /// True when the cube is the universe cube.
    pub fn is_full(&self, c: &[u64]) -> bool {
        c == &*self.full
    }

    /// True when some variable field of `c` is empty (the cube denotes the
    /// empty set). Covers never store such cubes.
    pub fn is_empty_cube(&self, c: &[u64]) -> bool {
        (0..self.num_vars()).any(|v| self.field_is_empty(c, v))
    }

    /// Intersection `a ∩ b` into `dst`. Returns `false` when the result is
    /// empty (some field vanished), in which case `dst` holds the raw AND.
    pub fn intersect(&self, a: &[u64], b: &[u64], dst: &mut [u64]) -> bool {
        for w in 0..self.words {
            dst[w] = a[w] & b[w];
        }
        !(0..self.num_vars()).any(|v| self.field_is_empty(dst, v))
    }

    /// Supercube `a ∪ b` (field-wise OR) into `dst`.
    pub fn supercube(&self, a: &[u64], b: &[u64], dst: &mut [u64]) {
        for w in 0..self.words {
            dst[w] = a[w] | b[w];
        }
    }

    /// Number of variable fields whose intersection is empty.
    ///
    /// Distance 0 means the cubes intersect, distance 1 means they are
    /// mergeable by consensus on the single conflicting variable.
    pub fn distance(&self, a: &[u64], b: &[u64]) -> usize {
        let mut d = 0;
        for ranges in &self.field_words {
            if ranges.iter().all(|&(w, m)| a[w] & b[w] & m == 0) {
                d += 1;
            }
        }
        d
    }

    /// Like [`distance`](Self::distance) but stops as soon as two conflicting
    /// fields are found; cheaper for disjointness tests.
    pub fn distance_at_least_2(&self, a: &[u64], b: &[u64]) -> bool {
        let mut d = 0;
        for ranges in &self.field_words {
            if ranges.iter().all(|&(w, m)| a[w] & b[w] & m == 0) {
                d += 1;
                if d >= 2 {
                    return true;
                }
            }
        }
        false
    }

    /// Consensus of `a` and `b` into `dst`.
    ///
    /// Defined when distance ≤ 1: at the one conflicting variable the result
    /// field is the union of the operand fields, everywhere else the
    /// intersection. Returns `false` (and leaves `dst` unspecified) when the
    /// distance is 2 or more.
    pub fn consensus(&self, a: &[u64], b: &[u64], dst: &mut [u64]) -> bool {
        for w in 0..self.words {
            dst[w] = a[w] & b[w];
        }
        let mut conflict = None;
        for v in 0..self.num_vars() {
            if self.field_is_empty(dst, v) {
                if conflict.is_some() {
                    return false;
                }
                conflict = Some(v);
            }
        }
        if let Some(v) = conflict {
            for &(w, m) in &self.field_words[v] {
                dst[w] |= (a[w] | b[w]) & m;
            }
        }
        true
    }

    /// Disjoint sharp `a # b`: a list of pairwise-disjoint cubes whose union
    /// is `a \ b`. Empty when `b` covers `a`.
    pub fn disjoint_sharp(&self, a: &[u64], b: &[u64]) -> Vec<Box<[u64]>> {
        if self.distance(a, b) > 0 {
            return vec![a.to_vec().into_boxed_slice()];
        }
        let mut result = Vec::new();
        let mut current: Box<[u64]> = a.to_vec().into_boxed_slice();
        for v in 0..self.num_vars() {
            // Bits of a's field outside b's field.
            let mut any_diff = false;
            for &(w, m) in &self.field_words[v] {
                if a[w] & !b[w] & m != 0 {
                    any_diff = true;
                }
            }
            if any_diff {
                let mut piece = current.clone();
                for &(w, m) in &self.field_words[v] {
                    piece[w] = (piece[w] & !m) | (a[w] & !b[w] & m);
                }
                result.push(piece);
                // Later pieces are confined to a ∩ b at this variable.
                for &(w, m) in &self.field_words[v] {
                    current[w] = (current[w] & !m) | (a[w] & b[w] & m);
                }
                if self.field_is_empty(&current, v) {
                    break;
                }
            }
        }
        result
    }

    /// Lowest set part index within variable `v`'s field of `c`.
    fn field_lowest_bit(&self, c: &[u64], v: usize) -> Option<usize> {
        for &(w, m) in &self.field_words[v] {
            let bits = c[w] & m;
            if bits != 0 {
                return Some(w * WORD_BITS + bits.trailing_zeros() as usize);
            }
        }
        None
    }

    /// A representative minterm of `c`: the cube with every field collapsed
    /// to its lowest set part. `c` must be non-empty.
    pub fn representative_minterm(&self, c: &[u64]) -> Box<[u64]> {
        let mut m = self.empty_cube();
        for v in 0..self.num_vars() {
            let bit = self
                .field_lowest_bit(c, v)
                .expect("representative of an empty cube");
            m[bit / WORD_BITS] |= 1u64 << (bit % WORD_BITS);
        }
        m
    }

    /// Input-literal plus output-literal count of one cube: set parts of
    /// every non-full input field plus asserted output bits. Saturating.
    pub fn cube_literals(&self, c: &[u64]) -> u64 {
        let mut lits = 0u64;
        for v in 0..self.num_inputs() {
            if !self.field_is_full(c, v) {
                lits = lits.saturating_add(self.field_count(c, v) as u64);
            }
        }
        lits.saturating_add(self.field_count(c, self.output_var()) as u64)
    }

    /// PLA-style rendering of a cube, e.g. `01- 10`, used in error reports
    /// and trace output. Multi-valued fields render their part bitmap.
    pub fn format_cube(&self, c: &[u64]) -> String {
        let mut s = String::new();
        for v in 0..self.num_inputs() {
            if self.parts[v] == 2 {
                let val = self.field_value(c, v);
                s.push(match val {
                    0b01 => '0',
                    0b10 => '1',
                    0b11 => '-',
                    _ => '?',
                });
            } else {
                if v > 0 {
                    s.push('|');
                }
                for p in 0..self.parts[v] {
                    let bit = self.offsets[v] + p;
                    let set = c[bit / WORD_BITS] >> (bit % WORD_BITS) & 1 == 1;
                    s.push(if set { '1' } else { '0' });
                }
                s.push('|');
            }
        }
        s.push(' ');
        for p in 0..self.num_outputs {
            let bit = self.offsets[self.parts.len()] + p;
            let set = c[bit / WORD_BITS] >> (bit % WORD_BITS) & 1 == 1;
            s.push(if set { '1' } else { '0' });
        }
        s
    }
}

/// True when `inner` is contained in `outer` (every field of `inner` is a
/// subset of the corresponding field of `outer`).
pub fn cube_contains(outer: &[u64], inner: &[u64]) -> bool {
    outer.iter().zip(inner).all(|(&o, &i)| i & !o == 0)
}

/// Number of set bits in a cube.
pub fn cube_count_ones(c: &[u64]) -> u32 {
    c.iter().map(|w| w.count_ones()).sum()
}

/// The canonical total order on cubes: descending set-bit count, then
/// ascending lexicographic word order. Every sort in the crate uses this
/// order so that identical input yields bit-identical output.
pub fn cube_cmp(a: &[u64], b: &[u64]) -> Ordering {
    cube_count_ones(b)
        .cmp(&cube_count_ones(a))
        .then_with(|| a.cmp(b))
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

    // 2 binary inputs, 1 output: bits [0,1] = x0, [2,3] = x1, [4] = f.
    fn small() -> CubeLayout {
        CubeLayout::binary(2, 1)
    }

    #[test]
    fn test_layout_geometry() {
        let l = small();
        assert_eq!(l.total_bits(), 5);
        assert_eq!(l.words(), 1);
        assert_eq!(l.num_vars(), 3);
        assert_eq!(l.var_parts(0), 2);
        assert_eq!(l.var_parts(2), 1);
        assert_eq!(l.full_cube(), &[0b11111]);
        assert_eq!(l.var_of_bit(0), 0);
        assert_eq!(l.var_of_bit(3), 1);
        assert_eq!(l.var_of_bit(4), 2);
    }

    #[test]
    fn test_layout_spans_words() {
        let l = CubeLayout::binary(40, 3);
        assert_eq!(l.total_bits(), 83);
        assert_eq!(l.words(), 2);
        // Variables on either side of the word boundary.
        assert!(l.field_is_full(l.full_cube(), 31));
        assert!(l.field_is_full(l.full_cube(), 32));
        assert_eq!(l.field_count(l.full_cube(), l.output_var()), 3);
    }

    #[test]
    fn test_intersect_and_distance() {
        let l = small();
        // x0=1 (bit 1), x1 don't-care, output f.
        let a = cube(&l, &[1, 2, 3, 4]);
        // x0=0 (bit 0), x1 don't-care, output f.
        let b = cube(&l, &[0, 2, 3, 4]);
        let mut dst = l.empty_cube();
        assert!(!l.intersect(&a, &b, &mut dst));
        assert_eq!(l.distance(&a, &b), 1);

        let c = cube(&l, &[0, 1, 2, 4]);
        assert!(l.intersect(&a, &c, &mut dst));
        assert_eq!(l.distance(&a, &c), 0);
        assert!(cube_contains(&a, &dst));
        assert!(cube_contains(&c, &dst));
    }

    #[test]
    fn test_consensus_merges_adjacent() {
        let l = small();
        // 0- f and 1- f merge into -- f.
        let a = cube(&l, &[0, 2, 3, 4]);
        let b = cube(&l, &[1, 2, 3, 4]);
        let mut dst = l.empty_cube();
        assert!(l.consensus(&a, &b, &mut dst));
        assert_eq!(&*dst, l.full_cube());
    }

    #[test]
    fn test_consensus_undefined_at_distance_2() {
        let l = small();
        // 01 f vs 10 f: both variables conflict.
        let a = cube(&l, &[0, 3, 4]);
        let b = cube(&l, &[1, 2, 4]);
        let mut dst = l.empty_cube();
        assert!(!l.consensus(&a, &b, &mut dst));
        assert!(l.distance_at_least_2(&a, &b));
    }

    #[test]
    fn test_disjoint_sharp_partitions() {
        let l = small();
        let full = l.full_cube();
        // full # (x0=1, x1=1) = {x0=0} ∪ {x0=1, x1=0} on the input space.
        let b = cube(&l, &[1, 3, 4]);
        let pieces = l.disjoint_sharp(full, &b);
        assert_eq!(pieces.len(), 2);
        // Pieces are pairwise disjoint and none intersects b.
        assert!(l.distance(&pieces[0], &pieces[1]) > 0);
        // Their union with b is the universe again.
        let mut union = b.clone();
        for p in &pieces {
            let u = union.clone();
            l.supercube(&u, p, &mut union);
        }
        assert_eq!(&*union, full);
    }

    #[test]
    fn test_sharp_of_covered_cube_is_empty() {
        let l = small();
        let a = cube(&l, &[1, 3, 4]);
        assert!(l.disjoint_sharp(&a, l.full_cube()).is_empty());
    }

    #[test]
    fn test_representative_minterm() {
        let l = small();
        let c = l.full_cube().to_vec().into_boxed_slice();
        let m = l.representative_minterm(&c);
        // Lowest part of each field: x0=0, x1=0, output 0.
        assert_eq!(&*m, &[0b10101]);
        assert!(cube_contains(&c, &m));
    }

    #[test]
    fn test_canonical_order_prefers_larger_cubes() {
        let l = small();
        let big = l.full_cube().to_vec().into_boxed_slice();
        let smaller = cube(&l, &[1, 2, 3, 4]);
        assert_eq!(cube_cmp(&big, &smaller), Ordering::Less);
        assert_eq!(cube_cmp(&big, &big), Ordering::Equal);
    }

    #[test]
    fn test_cube_literals() {
        let l = small();
        // 1- with one output: one input literal + one output literal.
        let c = cube(&l, &[1, 2, 3, 4]);
        assert_eq!(l.cube_literals(&c), 2);
        assert_eq!(l.cube_literals(l.full_cube()), 1);
    }

    #[test]
    fn test_format_cube() {
        let l = small();
        let c = cube(&l, &[1, 2, 3, 4]);
        assert_eq!(l.format_cube(&c), "1- 1");
    }
}
