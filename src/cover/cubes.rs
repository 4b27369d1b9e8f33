//! Typed cubes for label-aware covers
//!
//! A [`Cube`] holds one `Option<bool>` per input and one assertion flag per
//! output, tagged with the set (F, D or R) it belongs to, and owns the byte
//! codec the engine speaks (0 = low, 1 = high, 2 = don't care per input,
//! 0/1 per output). [`Cover`](super::Cover) rows are lowered through
//! [`Cube::engine_row`] and lifted back with [`Cube::from_engine`].

/// Type alias for cube data as owned vectors (inputs, outputs)
pub type CubeData = (Vec<Option<bool>>, Vec<Option<bool>>);

/// Type of a cube (ON-set, DC-set, or OFF-set)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeType {
    /// ON-set cube (where the function is 1)
    F,
    /// Don't-care set cube (can be either 0 or 1)
    D,
    /// OFF-set cube (where the function is 0)
    R,
}

/// A cube in a cover
#[derive(Clone, Debug)]
pub struct Cube {
    inputs: Vec<Option<bool>>,
    outputs: Vec<bool>,
    cube_type: CubeType,
}

impl Cube {
    pub(crate) fn new(inputs: &[Option<bool>], outputs: &[bool], cube_type: CubeType) -> Self {
        Cube {
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
            cube_type,
        }
    }

    /// Lift an engine cube (byte-per-variable encoding) into a typed cube.
    pub(crate) fn from_engine(inputs: &[u8], outputs: &[u8], cube_type: CubeType) -> Self {
        Cube {
            inputs: inputs
                .iter()
                .map(|&v| match v {
                    0 => Some(false),
                    1 => Some(true),
                    _ => None,
                })
                .collect(),
            outputs: outputs.iter().map(|&v| v == 1).collect(),
            cube_type,
        }
    }

    /// Lower this cube to the engine's byte encoding.
    pub(crate) fn engine_row(&self) -> (Vec<u8>, Vec<u8>) {
        let inputs = self
            .inputs
            .iter()
            .map(|&opt| match opt {
                Some(false) => 0,
                Some(true) => 1,
                None => 2,
            })
            .collect();
        let outputs = self.outputs.iter().map(|&b| u8::from(b)).collect();
        (inputs, outputs)
    }

    /// Widen to at least the given dimensions; new inputs are don't-cares,
    /// new outputs unasserted.
    pub(crate) fn pad_to(&mut self, num_inputs: usize, num_outputs: usize) {
        if self.inputs.len() < num_inputs {
            self.inputs.resize(num_inputs, None);
        }
        if self.outputs.len() < num_outputs {
            self.outputs.resize(num_outputs, false);
        }
    }

    /// Get the inputs of this cube
    ///
    /// Returns a slice where each element represents an input variable:
    /// - `Some(false)` - input must be 0
    /// - `Some(true)` - input must be 1
    /// - `None` - don't care (can be 0 or 1)
    pub fn inputs(&self) -> &[Option<bool>] {
        &self.inputs
    }

    /// Get the outputs of this cube
    ///
    /// Returns a slice where each element tells whether the cube asserts
    /// that output.
    pub fn outputs(&self) -> &[bool] {
        &self.outputs
    }

    /// Get the type of this cube (F, D, or R)
    pub fn cube_type(&self) -> CubeType {
        self.cube_type
    }
}
