//! PLA (Programmable Logic Array) format support
//!
//! Line-oriented text with `.`-directives (`.i`, `.o`, `.ilb`, `.ob`,
//! `.type`, `.p`, `.e`), one product term per row: input characters from
//! `{0, 1, -, ~}` followed by output characters from `{0, 1, -, ~}` (plus
//! the numeric aliases `2`/`3`/`4` of the original tool). A single row can
//! contribute up to three cubes, one per set the output characters select:
//! `1` asserts the ON-set, `0` the OFF-set (for R-typed covers), `-` the
//! don't-care set (for D-typed covers).
//!
//! The reader is tolerant: comments, blank lines, column formatting,
//! `|`-separated sections and rows folded across several lines are all
//! accepted.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use crate::cover::{CoverType, Cube, CubeType};
use crate::error::{PLAError, PLAReadError, PLAWriteError};

/// Internal trait for types that can be serialized to and deserialized from
/// PLA format
///
/// Provides the accessors the writer needs and the constructor the reader
/// needs; the public [`PLAReader`] and [`PLAWriter`] traits are blanket
/// implemented on top of it.
pub(crate) trait PLASerialisable: Sized {
    /// Associated type for iterating over cubes
    type CubesIter<'a>: Iterator<Item = &'a Cube>
    where
        Self: 'a;

    /// Get the number of inputs
    fn num_inputs(&self) -> usize;

    /// Get the number of outputs
    fn num_outputs(&self) -> usize;

    /// Iterate over all cubes (internal use)
    fn internal_cubes_iter(&self) -> Self::CubesIter<'_>;

    /// Get input variable labels if available
    fn get_input_labels(&self) -> Option<&[Arc<str>]>;

    /// Get output variable labels if available
    fn get_output_labels(&self) -> Option<&[Arc<str>]>;

    /// Create an instance from parsed PLA components
    fn create_from_pla_parts(
        num_inputs: usize,
        num_outputs: usize,
        input_labels: Vec<Arc<str>>,
        output_labels: Vec<Arc<str>>,
        cubes: Vec<Cube>,
        cover_type: CoverType,
    ) -> Self;
}

/// Trait for types that support PLA serialization (writing)
pub trait PLAWriter {
    /// Write this cover in PLA format to any writer.
    ///
    /// Both [`to_pla_string`](Self::to_pla_string) and
    /// [`to_pla_file`](Self::to_pla_file) delegate here.
    fn write_pla<W: Write>(&self, writer: &mut W, pla_type: CoverType)
        -> Result<(), PLAWriteError>;

    /// Convert this cover to a PLA format string
    fn to_pla_string(&self, pla_type: CoverType) -> Result<String, PLAWriteError> {
        let mut buffer = Vec::new();
        self.write_pla(&mut buffer, pla_type)?;
        // PLA format is ASCII.
        Ok(String::from_utf8(buffer).expect("PLA output is always ASCII"))
    }

    /// Write this cover to a PLA file
    fn to_pla_file<P: AsRef<Path>>(
        &self,
        path: P,
        pla_type: CoverType,
    ) -> Result<(), PLAWriteError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_pla(&mut writer, pla_type)?;
        writer.flush()?;
        Ok(())
    }
}

impl<T: PLASerialisable> PLAWriter for T {
    fn write_pla<W: Write>(
        &self,
        writer: &mut W,
        pla_type: CoverType,
    ) -> Result<(), PLAWriteError> {
        // .type comes first for FD/FR/FDR, matching the original printer.
        match pla_type {
            CoverType::FD => writeln!(writer, ".type fd")?,
            CoverType::FR => writeln!(writer, ".type fr")?,
            CoverType::FDR => writeln!(writer, ".type fdr")?,
            CoverType::F => {}
        }

        writeln!(writer, ".i {}", self.num_inputs())?;
        if let Some(labels) = self.get_input_labels() {
            write!(writer, ".ilb")?;
            for label in labels {
                write!(writer, " {}", label)?;
            }
            writeln!(writer)?;
        }
        writeln!(writer, ".o {}", self.num_outputs())?;
        if let Some(labels) = self.get_output_labels() {
            write!(writer, ".ob")?;
            for label in labels {
                write!(writer, " {}", label)?;
            }
            writeln!(writer)?;
        }

        let selected: Vec<&Cube> = self
            .internal_cubes_iter()
            .filter(|cube| match pla_type {
                CoverType::F => cube.cube_type() == CubeType::F,
                CoverType::FD => {
                    cube.cube_type() == CubeType::F || cube.cube_type() == CubeType::D
                }
                CoverType::FR => {
                    cube.cube_type() == CubeType::F || cube.cube_type() == CubeType::R
                }
                CoverType::FDR => true,
            })
            .collect();
        writeln!(writer, ".p {}", selected.len())?;

        for cube in selected {
            for inp in cube.inputs().iter() {
                let ch = match inp {
                    Some(false) => '0',
                    Some(true) => '1',
                    None => '-',
                };
                write!(writer, "{}", ch)?;
            }
            write!(writer, " ")?;

            match pla_type {
                CoverType::F => {
                    for &out in cube.outputs().iter() {
                        write!(writer, "{}", if out { '1' } else { '0' })?;
                    }
                }
                CoverType::FD | CoverType::FR | CoverType::FDR => {
                    // Set bits render as the set's character, unset bits as
                    // the no-op character.
                    let set_char = match cube.cube_type() {
                        CubeType::F => '1',
                        CubeType::D => '2',
                        CubeType::R => '0',
                    };
                    for &out in cube.outputs().iter() {
                        write!(writer, "{}", if out { set_char } else { '~' })?;
                    }
                }
            }
            writeln!(writer)?;
        }

        match pla_type {
            CoverType::F => writeln!(writer, ".e")?,
            _ => writeln!(writer, ".end")?,
        }
        Ok(())
    }
}

/// Trait for types that support PLA deserialization (reading/parsing)
pub trait PLAReader: Sized {
    /// Parse a cover from a PLA format reader.
    ///
    /// Both [`from_pla_string`](Self::from_pla_string) and
    /// [`from_pla_file`](Self::from_pla_file) delegate here.
    fn from_pla_reader<R: BufRead>(reader: R) -> Result<Self, PLAReadError>;

    /// Parse a cover from a PLA format string
    ///
    /// # Examples
    ///
    /// ```
    /// use espresso_native::{Cover, PLAReader};
    ///
    /// let pla = ".i 2\n.o 1\n.p 1\n01 1\n.e\n";
    /// let cover = Cover::from_pla_string(pla).unwrap();
    /// assert_eq!(cover.num_inputs(), 2);
    /// assert_eq!(cover.num_outputs(), 1);
    /// ```
    fn from_pla_string(s: &str) -> Result<Self, PLAReadError> {
        Self::from_pla_reader(Cursor::new(s.as_bytes()))
    }

    /// Load a cover from a PLA format file
    fn from_pla_file<P: AsRef<Path>>(path: P) -> Result<Self, PLAReadError> {
        let file = File::open(path)?;
        Self::from_pla_reader(BufReader::new(file))
    }
}

/// Parser state shared across rows.
struct Parser {
    num_inputs: Option<usize>,
    num_outputs: Option<usize>,
    cover_type: CoverType,
    input_labels: Option<Vec<Arc<str>>>,
    output_labels: Option<Vec<Arc<str>>>,
    cubes: Vec<Cube>,
}

impl Parser {
    fn new() -> Self {
        Parser {
            num_inputs: None,
            num_outputs: None,
            // The original tool defaults to the FD type, so bare `-` output
            // characters produce don't-care cubes.
            cover_type: CoverType::FD,
            input_labels: None,
            output_labels: None,
            cubes: Vec::new(),
        }
    }

    /// Handle a `.`-directive line. Returns false on the end marker.
    fn directive(&mut self, line: &str) -> Result<bool, PLAError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.first().copied() {
            Some(".i") => {
                let val = parts.get(1).and_then(|s| s.parse().ok()).ok_or_else(|| {
                    PLAError::InvalidInputDirective {
                        value: Arc::from(*parts.get(1).unwrap_or(&"")),
                    }
                })?;
                self.num_inputs = Some(val);
            }
            Some(".o") => {
                let val = parts.get(1).and_then(|s| s.parse().ok()).ok_or_else(|| {
                    PLAError::InvalidOutputDirective {
                        value: Arc::from(*parts.get(1).unwrap_or(&"")),
                    }
                })?;
                self.num_outputs = Some(val);
            }
            Some(".type") => {
                if let Some(type_str) = parts.get(1) {
                    self.cover_type = match *type_str {
                        "fd" => CoverType::FD,
                        "fr" => CoverType::FR,
                        "fdr" => CoverType::FDR,
                        _ => CoverType::F,
                    };
                }
            }
            Some(".ilb") => {
                let labels: Vec<Arc<str>> = parts.iter().skip(1).map(|s| Arc::from(*s)).collect();
                if !labels.is_empty() {
                    self.input_labels = Some(labels);
                }
            }
            Some(".ob") => {
                let labels: Vec<Arc<str>> = parts.iter().skip(1).map(|s| Arc::from(*s)).collect();
                if !labels.is_empty() {
                    self.output_labels = Some(labels);
                }
            }
            Some(".e") | Some(".end") => return Ok(false),
            // .p is advisory; unknown directives are skipped like the
            // original reader does.
            _ => {}
        }
        Ok(true)
    }

    /// Parse one cube row (already concatenated and whitespace-free).
    fn cube_row(&mut self, row: &str) -> Result<(), PLAError> {
        // Dimensions inferred from the first row when undeclared: inputs
        // and outputs separated by the last run of input characters.
        let (ni, no) = match (self.num_inputs, self.num_outputs) {
            (Some(ni), Some(no)) => (ni, no),
            _ => return Ok(()), // rows before .i/.o are unusable; skip
        };
        if row.len() != ni + no {
            return Ok(()); // tolerate stray fragments, as the original does
        }
        let (input_str, output_str) = row.split_at(ni);

        let mut inputs = Vec::with_capacity(ni);
        for (pos, ch) in input_str.chars().enumerate() {
            inputs.push(match ch {
                '0' => Some(false),
                '1' => Some(true),
                '-' | '~' | 'x' | 'X' | '2' => None,
                _ => {
                    return Err(PLAError::InvalidInputCharacter {
                        character: ch,
                        position: pos,
                    })
                }
            });
        }

        // One row spawns separate F, D and R cubes depending on the output
        // characters and the cover type.
        let mut f_outputs = Vec::with_capacity(no);
        let mut d_outputs = Vec::with_capacity(no);
        let mut r_outputs = Vec::with_capacity(no);
        let (mut has_f, mut has_d, mut has_r) = (false, false, false);
        for (pos, ch) in output_str.chars().enumerate() {
            let (f_bit, d_bit, r_bit) = match ch {
                '1' | '4' => (self.cover_type.has_f(), false, false),
                '0' | '3' => (false, false, self.cover_type.has_r()),
                '-' | '2' => (false, self.cover_type.has_d(), false),
                '~' => (false, false, false),
                _ => {
                    return Err(PLAError::InvalidOutputCharacter {
                        character: ch,
                        position: pos,
                    })
                }
            };
            f_outputs.push(f_bit);
            d_outputs.push(d_bit);
            r_outputs.push(r_bit);
            has_f |= f_bit;
            has_d |= d_bit;
            has_r |= r_bit;
        }

        if has_f {
            self.cubes.push(Cube::new(&inputs, &f_outputs, CubeType::F));
        }
        if has_d {
            self.cubes.push(Cube::new(&inputs, &d_outputs, CubeType::D));
        }
        if has_r {
            self.cubes.push(Cube::new(&inputs, &r_outputs, CubeType::R));
        }
        Ok(())
    }

    fn finish<T: PLASerialisable>(self) -> Result<T, PLAError> {
        let num_inputs = self.num_inputs.ok_or(PLAError::MissingInputDirective)?;
        let num_outputs = self.num_outputs.ok_or(PLAError::MissingOutputDirective)?;

        if let Some(ref labels) = self.input_labels {
            if labels.len() != num_inputs {
                return Err(PLAError::LabelCountMismatch {
                    label_type: "input",
                    expected: num_inputs,
                    actual: labels.len(),
                });
            }
        }
        if let Some(ref labels) = self.output_labels {
            if labels.len() != num_outputs {
                return Err(PLAError::LabelCountMismatch {
                    label_type: "output",
                    expected: num_outputs,
                    actual: labels.len(),
                });
            }
        }

        let input_labels = self.input_labels.unwrap_or_else(|| {
            (0..num_inputs)
                .map(|i| Arc::from(format!("x{}", i).as_str()))
                .collect()
        });
        let output_labels = self.output_labels.unwrap_or_else(|| {
            (0..num_outputs)
                .map(|i| Arc::from(format!("y{}", i).as_str()))
                .collect()
        });

        Ok(T::create_from_pla_parts(
            num_inputs,
            num_outputs,
            input_labels,
            output_labels,
            self.cubes,
            self.cover_type,
        ))
    }
}

impl<T: PLASerialisable> PLAReader for T {
    fn from_pla_reader<R: BufRead>(reader: R) -> Result<Self, PLAReadError> {
        let lines: Vec<String> = reader.lines().collect::<io::Result<Vec<_>>>()?;
        let mut parser = Parser::new();
        let mut pending = String::new();

        'outer: for line in &lines {
            let line = match line.find('#') {
                Some(cut) => line[..cut].trim(),
                None => line.trim(),
            };
            if line.is_empty() {
                continue;
            }
            if line.starts_with('.') {
                // A directive flushes any partially accumulated row.
                pending.clear();
                if !parser.directive(line)? {
                    break 'outer;
                }
                continue;
            }

            // Cube rows: strip `|` separators and whitespace, then
            // accumulate until the row reaches the declared width
            // (multi-line rows fold together).
            for ch in line.chars() {
                if !ch.is_whitespace() && ch != '|' {
                    pending.push(ch);
                }
            }
            if let (Some(ni), Some(no)) = (parser.num_inputs, parser.num_outputs) {
                if pending.len() >= ni + no {
                    let row: String = pending.drain(..).collect();
                    parser.cube_row(&row)?;
                }
            } else {
                // Dimensions not declared yet: infer from a
                // whitespace-split row of the form `inputs outputs`.
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 2 {
                    parser.num_inputs.get_or_insert(parts[0].len());
                    parser.num_outputs.get_or_insert(parts[1].len());
                    let row: String = pending.drain(..).collect();
                    parser.cube_row(&row)?;
                } else {
                    pending.clear();
                }
            }
        }

        Ok(parser.finish()?)
    }
}
