//! Cover types and traits for Boolean function minimization
//!
//! This module provides the unified [`Cover`] type for working with covers
//! (sum-of-products representations of Boolean functions). The Cover type
//! supports dynamic dimensions that grow as cubes are added and carries
//! optional variable labels for PLA I/O; minimization lowers it onto the
//! bit-packed engine in [`crate::espresso`].

mod conversions;
mod cubes;
mod iterators;
mod minimizable;

pub use cubes::{Cube, CubeData, CubeType};
pub use iterators::CubesIter;
pub use minimizable::Minimizable;

use std::sync::Arc;

use crate::error::MinimizationError;

/// Represents the type of cover (F, FD, FR, or FDR)
///
/// This type determines which sets are included in the cover:
/// - F: ON-set only
/// - FD: ON-set + Don't-care set
/// - FR: ON-set + OFF-set
/// - FDR: ON-set + Don't-care set + OFF-set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverType {
    /// On-set only (F)
    F = 1,
    /// On-set and don't-care set (FD)
    FD = 3,
    /// On-set and off-set (FR)
    FR = 5,
    /// On-set, don't-care set, and off-set (FDR)
    FDR = 7,
}

impl CoverType {
    /// Check if this type includes F (ON-set)
    pub fn has_f(&self) -> bool {
        matches!(
            self,
            CoverType::F | CoverType::FD | CoverType::FR | CoverType::FDR
        )
    }

    /// Check if this type includes D (don't-care set)
    pub fn has_d(&self) -> bool {
        matches!(self, CoverType::FD | CoverType::FDR)
    }

    /// Check if this type includes R (OFF-set)
    pub fn has_r(&self) -> bool {
        matches!(self, CoverType::FR | CoverType::FDR)
    }
}

/// A unified cover type with dynamic dimensions
///
/// The `Cover` type represents a Boolean function as a sum-of-products
/// (cover). It supports dynamic sizing - dimensions grow automatically as
/// cubes are added.
///
/// # Examples
///
/// ```
/// use espresso_native::{Cover, CoverType, Minimizable};
///
/// // Create an empty cover
/// let mut cover = Cover::new(CoverType::F);
///
/// // Add cubes (dimensions grow automatically)
/// cover.add_cube(&[Some(false), Some(true)], &[Some(true)]);
/// cover.add_cube(&[Some(true), Some(false)], &[Some(true)]);
///
/// // Minimize it (returns new instance)
/// cover = cover.minimize().unwrap();
///
/// println!("Minimized to {} cubes", cover.num_cubes());
/// ```
#[derive(Clone)]
pub struct Cover {
    /// Number of input variables
    num_inputs: usize,
    /// Number of output variables
    num_outputs: usize,
    /// Input labels, one per position ('x'-prefixed when generated)
    input_labels: Vec<Arc<str>>,
    /// Output labels, one per position ('y'-prefixed when generated)
    output_labels: Vec<Arc<str>>,
    /// Cubes with their type (F/D/R) and data
    cubes: Vec<Cube>,
    /// Cover type (F, FD, FR, or FDR)
    cover_type: CoverType,
}

impl Cover {
    /// Create a new empty cover with the specified type
    ///
    /// # Examples
    ///
    /// ```
    /// use espresso_native::{Cover, CoverType};
    ///
    /// let cover = Cover::new(CoverType::F);
    /// assert_eq!(cover.num_inputs(), 0);
    /// assert_eq!(cover.num_outputs(), 0);
    /// ```
    pub fn new(cover_type: CoverType) -> Self {
        Cover {
            num_inputs: 0,
            num_outputs: 0,
            input_labels: Vec::new(),
            output_labels: Vec::new(),
            cubes: Vec::new(),
            cover_type,
        }
    }

    /// Create a new cover with pre-defined labels
    ///
    /// The dimensions are set based on the label counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use espresso_native::{Cover, CoverType};
    ///
    /// let cover = Cover::with_labels(
    ///     CoverType::F,
    ///     &["a", "b", "c"],
    ///     &["out"],
    /// );
    /// assert_eq!(cover.num_inputs(), 3);
    /// assert_eq!(cover.num_outputs(), 1);
    /// ```
    pub fn with_labels<S: AsRef<str>>(
        cover_type: CoverType,
        input_labels: &[S],
        output_labels: &[S],
    ) -> Self {
        let input_labels: Vec<Arc<str>> =
            input_labels.iter().map(|s| Arc::from(s.as_ref())).collect();
        let output_labels: Vec<Arc<str>> = output_labels
            .iter()
            .map(|s| Arc::from(s.as_ref()))
            .collect();

        Cover {
            num_inputs: input_labels.len(),
            num_outputs: output_labels.len(),
            input_labels,
            output_labels,
            cubes: Vec::new(),
            cover_type,
        }
    }

    /// Get the number of inputs
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Get the number of outputs
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Get the number of cubes (for F/FD types, only counts F cubes; for
    /// FR/FDR, counts all)
    pub fn num_cubes(&self) -> usize {
        if self.cover_type.has_r() {
            self.cubes.len()
        } else {
            self.cubes
                .iter()
                .filter(|cube| cube.cube_type() == CubeType::F)
                .count()
        }
    }

    /// Get the cover type (F, FD, FR, or FDR)
    pub fn cover_type(&self) -> CoverType {
        self.cover_type
    }

    /// Get input variable labels
    pub fn input_labels(&self) -> &[Arc<str>] {
        &self.input_labels
    }

    /// Get output variable labels
    pub fn output_labels(&self) -> &[Arc<str>] {
        &self.output_labels
    }

    /// Iterate over cubes as [`Cube`] references
    ///
    /// For F-type covers only F cubes are yielded; FD/FR/FDR covers yield
    /// all their cubes.
    pub fn cubes(&self) -> CubesIter<'_, &Cube> {
        let cover_type = self.cover_type;
        CubesIter {
            iter: Box::new(self.cubes.iter().filter(move |cube| {
                cover_type != CoverType::F || cube.cube_type() == CubeType::F
            })),
        }
    }

    /// Iterate over cubes as owned `(inputs, outputs)` data, compatible
    /// with [`add_cube`](Self::add_cube).
    pub fn cubes_iter(&self) -> CubesIter<'_, CubeData> {
        let cover_type = self.cover_type;
        CubesIter {
            iter: Box::new(
                self.cubes
                    .iter()
                    .filter(move |cube| {
                        cover_type != CoverType::F || cube.cube_type() == CubeType::F
                    })
                    .map(|cube| {
                        let inputs = cube.inputs().to_vec();
                        let outputs: Vec<Option<bool>> =
                            cube.outputs().iter().map(|&b| Some(b)).collect();
                        (inputs, outputs)
                    }),
            ),
        }
    }

    /// Add a cube to the cover
    ///
    /// The cover dimensions grow automatically if the cube is larger.
    /// Outputs use PLA-style notation:
    /// - `Some(true)` → bit set in an F cube (ON-set)
    /// - `Some(false)` → bit set in an R cube (OFF-set, only for R-typed covers)
    /// - `None` → bit set in a D cube (don't-care, only for D-typed covers)
    ///
    /// # Examples
    ///
    /// ```
    /// use espresso_native::{Cover, CoverType};
    ///
    /// let mut cover = Cover::new(CoverType::F);
    /// cover.add_cube(&[Some(false), Some(true)], &[Some(true)]);
    /// assert_eq!(cover.num_inputs(), 2);
    /// assert_eq!(cover.num_outputs(), 1);
    /// ```
    pub fn add_cube(&mut self, inputs: &[Option<bool>], outputs: &[Option<bool>]) {
        self.grow_to_fit(inputs.len(), outputs.len());

        let mut padded_inputs = inputs.to_vec();
        padded_inputs.resize(self.num_inputs, None);

        let mut padded_outputs = outputs.to_vec();
        padded_outputs.resize(self.num_outputs, None);

        // One input row can spawn up to three cubes, one per set the output
        // characters select.
        let mut f_outputs = Vec::with_capacity(self.num_outputs);
        let mut d_outputs = Vec::with_capacity(self.num_outputs);
        let mut r_outputs = Vec::with_capacity(self.num_outputs);
        let mut has_f = false;
        let mut has_d = false;
        let mut has_r = false;

        for &out in padded_outputs.iter() {
            match out {
                Some(true) if self.cover_type.has_f() => {
                    f_outputs.push(true);
                    d_outputs.push(false);
                    r_outputs.push(false);
                    has_f = true;
                }
                Some(false) if self.cover_type.has_r() => {
                    f_outputs.push(false);
                    d_outputs.push(false);
                    r_outputs.push(true);
                    has_r = true;
                }
                None if self.cover_type.has_d() => {
                    f_outputs.push(false);
                    d_outputs.push(true);
                    r_outputs.push(false);
                    has_d = true;
                }
                _ => {
                    f_outputs.push(false);
                    d_outputs.push(false);
                    r_outputs.push(false);
                }
            }
        }

        if has_f {
            self.cubes
                .push(Cube::new(&padded_inputs, &f_outputs, CubeType::F));
        }
        if has_d {
            self.cubes
                .push(Cube::new(&padded_inputs, &d_outputs, CubeType::D));
        }
        if has_r {
            self.cubes
                .push(Cube::new(&padded_inputs, &r_outputs, CubeType::R));
        }
    }

    /// True when the ON-set together with the don't-care set covers every
    /// point of every output.
    pub fn tautology(&self) -> Result<bool, MinimizationError> {
        if self.num_outputs == 0 {
            return Ok(false);
        }
        let (f, d, _) = self.to_engine_covers()?;
        let mut raw = f.raw().clone();
        raw.append_cover(d.raw());
        Ok(raw.tautology(f.layout()))
    }

    /// The complement: a new F-typed cover whose ON-set covers exactly the
    /// points outside this cover's ON and don't-care sets. Labels carry
    /// over.
    pub fn complement(&self) -> Result<Cover, MinimizationError> {
        if self.num_outputs == 0 {
            return Ok(self.clone());
        }
        let (f, d, _) = self.to_engine_covers()?;
        let mut raw = f.raw().clone();
        raw.append_cover(d.raw());
        let comp = raw.complement(f.layout());
        let comp_cover = crate::espresso::EspressoCover::from_raw(Arc::clone(f.layout()), comp);
        let cubes = comp_cover
            .cubes()
            .into_iter()
            .map(|(inputs, outputs)| Cube::from_engine(&inputs, &outputs, CubeType::F))
            .collect();
        Ok(Cover {
            num_inputs: self.num_inputs,
            num_outputs: self.num_outputs,
            input_labels: self.input_labels.clone(),
            output_labels: self.output_labels.clone(),
            cubes,
            cover_type: CoverType::F,
        })
    }

    /// Grow the cover to fit at least the specified dimensions
    ///
    /// Extends all existing cubes. If the cover already has labels, new
    /// labels are auto-generated to keep them aligned with positions.
    fn grow_to_fit(&mut self, min_inputs: usize, min_outputs: usize) {
        let grew_inputs = min_inputs > self.num_inputs;
        let grew_outputs = min_outputs > self.num_outputs;
        if !grew_inputs && !grew_outputs {
            return;
        }
        self.num_inputs = self.num_inputs.max(min_inputs);
        self.num_outputs = self.num_outputs.max(min_outputs);
        for cube in &mut self.cubes {
            cube.pad_to(self.num_inputs, self.num_outputs);
        }
        if grew_inputs && !self.input_labels.is_empty() {
            backfill_labels(&mut self.input_labels, 'x', self.num_inputs);
        }
        if grew_outputs && !self.output_labels.is_empty() {
            backfill_labels(&mut self.output_labels, 'y', self.num_outputs);
        }
    }

    /// Lower this cover onto the engine's bit-packed representation: the
    /// (F, D, R) cover triple, ready for [`crate::espresso::Espresso`].
    pub fn engine_covers(
        &self,
    ) -> Result<
        (
            crate::espresso::EspressoCover,
            crate::espresso::EspressoCover,
            crate::espresso::EspressoCover,
        ),
        MinimizationError,
    > {
        self.to_engine_covers()
    }

    /// Lower the typed cube list onto engine covers (F, D, R).
    pub(crate) fn to_engine_covers(
        &self,
    ) -> Result<
        (
            crate::espresso::EspressoCover,
            crate::espresso::EspressoCover,
            crate::espresso::EspressoCover,
        ),
        MinimizationError,
    > {
        use crate::espresso::EspressoCover;

        let mut f_cubes: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
        let mut d_cubes: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
        let mut r_cubes: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
        for cube in &self.cubes {
            let row = cube.engine_row();
            match cube.cube_type() {
                CubeType::F => f_cubes.push(row),
                CubeType::D => d_cubes.push(row),
                CubeType::R => r_cubes.push(row),
            }
        }

        fn as_refs(v: &[(Vec<u8>, Vec<u8>)]) -> Vec<(&[u8], &[u8])> {
            v.iter().map(|(i, o)| (i.as_slice(), o.as_slice())).collect()
        }
        let f = EspressoCover::from_cubes(&as_refs(&f_cubes), self.num_inputs, self.num_outputs)?;
        let d = EspressoCover::from_cubes(&as_refs(&d_cubes), self.num_inputs, self.num_outputs)?;
        let r = EspressoCover::from_cubes(&as_refs(&r_cubes), self.num_inputs, self.num_outputs)?;
        Ok((f, d, r))
    }

    /// Rebuild this cover with the F cubes replaced by an engine result;
    /// D and R cubes (and labels) carry over unchanged.
    pub(crate) fn replace_f_cubes(
        &self,
        minimized: &crate::espresso::EspressoCover,
        cover_type: CoverType,
    ) -> Cover {
        let mut cubes: Vec<Cube> = minimized
            .cubes()
            .into_iter()
            .map(|(inputs, outputs)| Cube::from_engine(&inputs, &outputs, CubeType::F))
            .collect();
        for cube in &self.cubes {
            if cube.cube_type() != CubeType::F {
                cubes.push(cube.clone());
            }
        }
        Cover {
            num_inputs: self.num_inputs,
            num_outputs: self.num_outputs,
            input_labels: self.input_labels.clone(),
            output_labels: self.output_labels.clone(),
            cubes,
            cover_type,
        }
    }

    pub(crate) fn from_parts(
        num_inputs: usize,
        num_outputs: usize,
        input_labels: Vec<Arc<str>>,
        output_labels: Vec<Arc<str>>,
        cubes: Vec<Cube>,
        cover_type: CoverType,
    ) -> Self {
        Cover {
            num_inputs,
            num_outputs,
            input_labels,
            output_labels,
            cubes,
            cover_type,
        }
    }
}

/// Extend a label list up to `target` positions with generated names
/// (`x0`, `x1`, ... / `y0`, ...), skipping any name already taken.
fn backfill_labels(labels: &mut Vec<Arc<str>>, prefix: char, target: usize) {
    while labels.len() < target {
        let mut n = labels.len();
        let name = loop {
            let candidate = format!("{}{}", prefix, n);
            if labels.iter().all(|l| l.as_ref() != candidate) {
                break candidate;
            }
            n += 1;
        };
        labels.push(Arc::from(name.as_str()));
    }
}

impl Default for Cover {
    fn default() -> Self {
        Self::new(CoverType::F)
    }
}

#[cfg(test)]
mod tests;
