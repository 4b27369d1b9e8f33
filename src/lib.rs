//! # Espresso Native
//!
//! A from-scratch Rust implementation of the Espresso-II heuristic logic
//! minimizer, a classic algorithm from UC Berkeley for minimizing two-level
//! Boolean functions.
//!
//! ## Overview
//!
//! The minimizer takes a Boolean function represented as a sum-of-products
//! (a cover of cubes) together with optional don't-care and OFF-sets, and
//! produces an equivalent cover with a (heuristically or exactly) minimum
//! number of product terms, and secondarily a minimum number of literals.
//! It is useful for:
//!
//! - Digital logic synthesis
//! - PLA (Programmable Logic Array) minimization
//! - Boolean function simplification
//! - Logic optimization in CAD tools
//!
//! ## Example
//!
//! ```
//! use espresso_native::{Cover, CoverType, Minimizable};
//!
//! // Build the ON-set of f = a'b + ab'
//! let mut cover = Cover::new(CoverType::F);
//! cover.add_cube(&[Some(false), Some(true)], &[Some(true)]);
//! cover.add_cube(&[Some(true), Some(false)], &[Some(true)]);
//!
//! // Minimize (XOR is already minimal)
//! let minimized = cover.minimize().unwrap();
//! assert_eq!(minimized.num_cubes(), 2);
//! ```
//!
//! ## PLA text
//!
//! Covers read and write the standard PLA format:
//!
//! ```
//! use espresso_native::{Cover, CoverType, Minimizable, PLAReader, PLAWriter};
//!
//! let pla = ".i 3\n.o 1\n.p 2\n00- 1\n01- 1\n.e\n";
//! let cover = Cover::from_pla_string(pla).unwrap();
//! let minimized = cover.minimize().unwrap();
//! assert_eq!(minimized.num_cubes(), 1);
//! println!("{}", minimized.to_pla_string(CoverType::F).unwrap());
//! ```
//!
//! ## Layers
//!
//! - [`Cover`] / [`Minimizable`]: label-aware covers with dynamic
//!   dimensions; the API most callers want.
//! - [`espresso`]: the engine itself (bit-packed cube algebra, the
//!   EXPAND/IRREDUNDANT/REDUCE iteration, the gasp escapes and the exact
//!   covering solver), for callers that manage cover triples directly.

pub mod cover;
pub mod error;
pub mod espresso;
pub mod pla;

pub use cover::{Cover, CoverType, Cube, CubeData, CubeType, CubesIter, Minimizable};
pub use error::{MinimizationError, PLAError, PLAReadError, PLAWriteError};
pub use espresso::{
    CheckOutcome, EspressoConfig, EspressoError, Minimized, SolveStatus, Strategy,
};
pub use pla::{PLAReader, PLAWriter};
