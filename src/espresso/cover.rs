//! Set families: ordered collections of cubes and the recursive cover
//! operations (contain-sort, cofactor, tautology, complement)
//!
//! A [`RawCover`] stores its cubes back to back in one flat word vector, the
//! set-family layout of the original minimizer. Cubes never alias across
//! covers; transfers are deep copies of plain words.

use log::trace;

use super::cube::{cube_cmp, cube_contains, CubeLayout};

/// A cover: an ordered sequence of equally sized cubes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCover {
    words: usize,
    data: Vec<u64>,
}

impl RawCover {
    /// New empty cover for cubes of `words` words.
    pub fn new(words: usize) -> Self {
        debug_assert!(words >= 1);
        RawCover {
            words,
            data: Vec::new(),
        }
    }

    /// New empty cover with room for `capacity` cubes.
    pub fn with_capacity(words: usize, capacity: usize) -> Self {
        RawCover {
            words,
            data: Vec::with_capacity(words * capacity),
        }
    }

    /// Cover containing only the universe cube.
    pub fn universe(layout: &CubeLayout) -> Self {
        let mut f = RawCover::new(layout.words());
        f.push(layout.full_cube());
        f
    }

    /// Words per cube.
    pub fn cube_words(&self) -> usize {
        self.words
    }

    /// Number of cubes.
    pub fn count(&self) -> usize {
        self.data.len() / self.words
    }

    /// True when the cover has no cubes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The `i`-th cube.
    pub fn cube(&self, i: usize) -> &[u64] {
        &self.data[i * self.words..(i + 1) * self.words]
    }

    /// Mutable view of the `i`-th cube.
    pub fn cube_mut(&mut self, i: usize) -> &mut [u64] {
        &mut self.data[i * self.words..(i + 1) * self.words]
    }

    /// Iterate over cubes.
    pub fn iter(&self) -> impl Iterator<Item = &[u64]> {
        self.data.chunks_exact(self.words)
    }

    /// Append a deep copy of `cube`.
    pub fn push(&mut self, cube: &[u64]) {
        debug_assert_eq!(cube.len(), self.words);
        self.data.extend_from_slice(cube);
    }

    /// Append deep copies of every cube of `other`.
    pub fn append_cover(&mut self, other: &RawCover) {
        debug_assert_eq!(self.words, other.words);
        self.data.extend_from_slice(&other.data);
    }

    /// Keep only the cubes whose index satisfies `keep`.
    pub fn retain_indices(&mut self, keep: impl Fn(usize) -> bool) {
        let words = self.words;
        let mut out = Vec::with_capacity(self.data.len());
        for i in 0..self.count() {
            if keep(i) {
                out.extend_from_slice(&self.data[i * words..(i + 1) * words]);
            }
        }
        self.data = out;
    }

    /// Remove the `i`-th cube, preserving the order of the rest.
    pub fn remove(&mut self, i: usize) {
        let words = self.words;
        self.data.drain(i * words..(i + 1) * words);
    }

    /// Union of all cubes (bitwise OR over the whole family).
    pub fn or_all(&self) -> Box<[u64]> {
        let mut acc = vec![0u64; self.words].into_boxed_slice();
        for c in self.iter() {
            for (a, &w) in acc.iter_mut().zip(c) {
                *a |= w;
            }
        }
        acc
    }

    /// True when some cube is the universe cube.
    pub fn has_full_cube(&self, layout: &CubeLayout) -> bool {
        self.iter().any(|c| layout.is_full(c))
    }

    /// Sort cubes into the canonical order.
    pub fn sort_canonical(&mut self) {
        let words = self.words;
        let mut cubes: Vec<&[u64]> = self.data.chunks_exact(words).collect();
        cubes.sort_by(|a, b| cube_cmp(a, b));
        let mut out = Vec::with_capacity(self.data.len());
        for c in cubes {
            out.extend_from_slice(c);
        }
        self.data = out;
    }

    /// Canonical sort plus removal of every cube contained in another
    /// (single containment, including duplicates). The result has no two
    /// cubes in a containment relation.
    pub fn contain_sort(&mut self) {
        self.sort_canonical();
        let n = self.count();
        let mut keep = vec![true; n];
        for i in 0..n {
            if !keep[i] {
                continue;
            }
            for j in (i + 1)..n {
                // Sorted order guarantees cube(j) has at most as many bits.
                if keep[j] && cube_contains(self.cube(i), self.cube(j)) {
                    keep[j] = false;
                }
            }
        }
        self.retain_indices(|i| keep[i]);
    }

    /// Cofactor of the cover with respect to cube `c`.
    ///
    /// Cubes disjoint from `c` are dropped. Every kept cube is intersected
    /// field-wise with `c`; a field whose intersection equals `c`'s whole
    /// field becomes a don't-care, any other field keeps the narrowed
    /// intersection. The narrowing matters for multi-valued fields (the
    /// output field in particular), where two cubes can overlap without
    /// one containing the other.
    pub fn cofactor(&self, layout: &CubeLayout, c: &[u64]) -> RawCover {
        let mut out = RawCover::with_capacity(self.words, self.count());
        let mut narrowed = vec![0u64; self.words];
        for d in self.iter() {
            if layout.distance(d, c) == 0 {
                for w in 0..self.words {
                    narrowed[w] = d[w] & c[w];
                }
                for v in 0..layout.num_vars() {
                    if layout.field_eq(&narrowed, c, v) {
                        layout.fill_field(&mut narrowed, v);
                    }
                }
                out.push(&narrowed);
            }
        }
        out
    }

    /// [`cofactor`](Self::cofactor) re-expressed over the full part space:
    /// every field of every kept cube is padded with the parts outside `c`.
    ///
    /// The cofactor's universe is the subspace of `c`; padding maps that
    /// subspace back onto the whole space, so the full-space
    /// [`tautology`](Self::tautology) and [`complement`](Self::complement)
    /// of the padded cover answer questions about `c` alone.
    pub fn cofactor_padded(&self, layout: &CubeLayout, c: &[u64]) -> RawCover {
        let full = layout.full_cube();
        let mut cof = self.cofactor(layout, c);
        for i in 0..cof.count() {
            let cube = cof.cube_mut(i);
            for w in 0..cube.len() {
                cube[w] |= full[w] & !c[w];
            }
        }
        cof
    }

    /// Containment test: does the cover contain every point of `c`?
    pub fn covers_cube(&self, layout: &CubeLayout, c: &[u64]) -> bool {
        self.cofactor_padded(layout, c).tautology(layout)
    }

    /// Cofactor with respect to the single part `p` of variable `v`:
    /// keeps cubes whose field contains the part and fills their field.
    fn cofactor_part(&self, layout: &CubeLayout, v: usize, p: usize) -> RawCover {
        let bit = layout.var_offset(v) + p;
        let word = bit / super::cube::WORD_BITS;
        let mask = 1u64 << (bit % super::cube::WORD_BITS);
        let mut out = RawCover::with_capacity(self.words, self.count());
        for d in self.iter() {
            if d[word] & mask != 0 {
                let start = out.data.len();
                out.data.extend_from_slice(d);
                layout.fill_field(&mut out.data[start..], v);
            }
        }
        out
    }

    /// Pick the splitting variable: the binate variable active in the most
    /// cubes (ties to the lowest index). `None` when the cover is unate.
    ///
    /// A variable is binate when at least two distinct non-full field values
    /// occur across the cover.
    pub fn most_binate_var(&self, layout: &CubeLayout) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None; // (active count, var)
        for v in 0..layout.num_vars() {
            let mut active = 0usize;
            let mut first_value: Option<u64> = None;
            let mut binate = false;
            for c in self.iter() {
                if layout.field_is_full(c, v) {
                    continue;
                }
                active += 1;
                let val = layout.field_value(c, v);
                match first_value {
                    None => first_value = Some(val),
                    Some(f) if f != val => binate = true,
                    _ => {}
                }
            }
            if binate {
                let better = match best {
                    None => true,
                    Some((count, _)) => active > count,
                };
                if better {
                    best = Some((active, v));
                }
            }
        }
        best.map(|(_, v)| v)
    }

    /// Tautology test: does the cover contain every point?
    ///
    /// Terminal cases: a universe cube makes the cover a tautology; an empty
    /// cover, a part missing from every cube, or a unate cover without a
    /// universe cube make it not one. Otherwise Shannon-split on the most
    /// binate variable; the recursion depth is bounded by the number of
    /// binate variables.
    pub fn tautology(&self, layout: &CubeLayout) -> bool {
        if self.has_full_cube(layout) {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        if &*self.or_all() != layout.full_cube() {
            return false;
        }
        let v = match self.most_binate_var(layout) {
            // Unate without a universe cube: some point avoids every cube.
            None => return false,
            Some(v) => v,
        };
        trace!("tautology: splitting on variable {v} over {} cubes", self.count());
        (0..layout.var_parts(v)).all(|p| self.cofactor_part(layout, v, p).tautology(layout))
    }

    /// Complement of the cover, canonicalized by containment.
    ///
    /// Shannon expansion on the most binate variable; a unate cover falls
    /// back to the explicit unate complement (product of single-cube
    /// complements with absorption).
    pub fn complement(&self, layout: &CubeLayout) -> RawCover {
        if self.is_empty() {
            return RawCover::universe(layout);
        }
        if self.has_full_cube(layout) {
            return RawCover::new(self.words);
        }
        if self.count() == 1 {
            return sharp_cover(layout, layout.full_cube(), self.cube(0));
        }
        match self.most_binate_var(layout) {
            None => self.unate_complement(layout),
            Some(v) => {
                trace!(
                    "complement: splitting on variable {v} over {} cubes",
                    self.count()
                );
                let mut result = RawCover::new(self.words);
                let mut restricted = vec![0u64; self.words];
                for p in 0..layout.var_parts(v) {
                    let pc = layout.part_cube(v, p);
                    let comp = self.cofactor_part(layout, v, p).complement(layout);
                    for c in comp.iter() {
                        // The cofactor freed this variable, so the
                        // intersection with the part cube never vanishes.
                        let ok = layout.intersect(c, &pc, &mut restricted);
                        debug_assert!(ok);
                        result.push(&restricted);
                    }
                }
                result.contain_sort();
                result
            }
        }
    }

    /// De Morgan complement for unate covers: intersect the complements of
    /// the individual cubes, absorbing contained cubes at each step.
    fn unate_complement(&self, layout: &CubeLayout) -> RawCover {
        let mut result = sharp_cover(layout, layout.full_cube(), self.cube(0));
        for i in 1..self.count() {
            if result.is_empty() {
                break;
            }
            let next = sharp_cover(layout, layout.full_cube(), self.cube(i));
            result = unate_intersect(layout, &result, &next);
        }
        result
    }
}

/// `a # b` as a cover.
pub fn sharp_cover(layout: &CubeLayout, a: &[u64], b: &[u64]) -> RawCover {
    let mut out = RawCover::new(layout.words());
    for piece in layout.disjoint_sharp(a, b) {
        out.push(&piece);
    }
    out
}

/// The region of `c` left uncovered by `by`: `c # by`, sharped cube by cube.
pub fn sharp_against_cover(layout: &CubeLayout, c: &[u64], by: &RawCover) -> RawCover {
    let mut region = RawCover::new(layout.words());
    region.push(c);
    for q in by.iter() {
        if region.is_empty() {
            break;
        }
        let mut next = RawCover::with_capacity(layout.words(), region.count());
        for t in region.iter() {
            if layout.distance(t, q) == 0 {
                for piece in layout.disjoint_sharp(t, q) {
                    next.push(&piece);
                }
            } else {
                next.push(t);
            }
        }
        region = next;
    }
    region.contain_sort();
    region
}

/// Cube-wise intersection of two covers with containment absorption,
/// profitable when both operands are unate.
pub fn unate_intersect(layout: &CubeLayout, a: &RawCover, b: &RawCover) -> RawCover {
    let mut out = RawCover::new(layout.words());
    let mut tmp = vec![0u64; layout.words()];
    for x in a.iter() {
        for y in b.iter() {
            if layout.intersect(x, y, &mut tmp) {
                absorbing_push(&mut out, &tmp);
            }
        }
    }
    out.sort_canonical();
    out
}

/// Push `cube` unless an existing cube contains it; drop existing cubes it
/// contains.
fn absorbing_push(cover: &mut RawCover, cube: &[u64]) {
    let mut i = 0;
    while i < cover.count() {
        if cube_contains(cover.cube(i), cube) {
            return;
        }
        if cube_contains(cube, cover.cube(i)) {
            cover.remove(i);
        } else {
            i += 1;
        }
    }
    cover.push(cube);
}

/// Cube and literal counts of a cover, compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cost {
    /// Number of cubes.
    pub cubes: usize,
    /// Input plus output literal count, saturating.
    pub literals: u64,
}

impl Cost {
    /// Cost of a cover under a layout.
    pub fn of(layout: &CubeLayout, f: &RawCover) -> Self {
        let mut literals = 0u64;
        for c in f.iter() {
            literals = literals.saturating_add(layout.cube_literals(c));
        }
        Cost {
            cubes: f.count(),
            literals,
        }
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} cubes, {} literals", self.cubes, self.literals)
    }
}
