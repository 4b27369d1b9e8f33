//! Trait implementations for [`Cover`]: PLA serialization and formatting

use super::cubes::Cube;
use super::Cover;
use super::CoverType;
use std::fmt;
use std::sync::Arc;

impl crate::pla::PLASerialisable for Cover {
    type CubesIter<'a> = std::slice::Iter<'a, Cube>;

    fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    fn internal_cubes_iter(&self) -> Self::CubesIter<'_> {
        self.cubes.iter()
    }

    fn get_input_labels(&self) -> Option<&[Arc<str>]> {
        if self.input_labels.is_empty() {
            None
        } else {
            Some(self.input_labels.as_slice())
        }
    }

    fn get_output_labels(&self) -> Option<&[Arc<str>]> {
        if self.output_labels.is_empty() {
            None
        } else {
            Some(self.output_labels.as_slice())
        }
    }

    fn create_from_pla_parts(
        num_inputs: usize,
        num_outputs: usize,
        input_labels: Vec<Arc<str>>,
        output_labels: Vec<Arc<str>>,
        cubes: Vec<Cube>,
        cover_type: CoverType,
    ) -> Self {
        Cover::from_parts(
            num_inputs,
            num_outputs,
            input_labels,
            output_labels,
            cubes,
            cover_type,
        )
    }
}

impl fmt::Debug for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cover")
            .field("num_inputs", &self.num_inputs)
            .field("num_outputs", &self.num_outputs)
            .field("num_cubes", &self.num_cubes())
            .field("cover_type", &self.cover_type)
            .finish()
    }
}
