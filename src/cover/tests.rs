//! Tests for the cover module

use super::*;
use crate::pla::{PLAReader, PLAWriter};

#[test]
fn test_cover_creation() {
    let cover = Cover::new(CoverType::F);
    assert_eq!(cover.num_inputs(), 0);
    assert_eq!(cover.num_outputs(), 0);
    assert_eq!(cover.num_cubes(), 0);
}

#[test]
fn test_cover_with_labels() {
    let cover = Cover::with_labels(CoverType::F, &["a", "b", "c"], &["out"]);
    assert_eq!(cover.num_inputs(), 3);
    assert_eq!(cover.num_outputs(), 1);
    assert_eq!(cover.input_labels()[0].as_ref(), "a");
    assert_eq!(cover.input_labels()[1].as_ref(), "b");
    assert_eq!(cover.input_labels()[2].as_ref(), "c");
    assert_eq!(cover.output_labels()[0].as_ref(), "out");
}

#[test]
fn test_add_cube() {
    let mut cover = Cover::new(CoverType::F);
    cover.add_cube(&[Some(false), Some(true)], &[Some(true)]);
    assert_eq!(cover.num_inputs(), 2);
    assert_eq!(cover.num_outputs(), 1);
    assert_eq!(cover.num_cubes(), 1);
}

#[test]
fn test_dynamic_growth() {
    let mut cover = Cover::new(CoverType::F);
    cover.add_cube(&[Some(true), Some(false)], &[Some(true)]);
    assert_eq!(cover.num_inputs(), 2);
    assert_eq!(cover.num_outputs(), 1);

    cover.add_cube(
        &[Some(true), Some(false), Some(true)],
        &[Some(true), Some(false)],
    );
    assert_eq!(cover.num_inputs(), 3);
    assert_eq!(cover.num_outputs(), 2);

    // Labels are not auto-generated for unlabeled covers.
    assert_eq!(cover.input_labels().len(), 0);
    assert_eq!(cover.output_labels().len(), 0);
}

#[test]
fn test_dynamic_growth_preserves_existing_cubes() {
    let mut cover = Cover::new(CoverType::F);
    cover.add_cube(&[Some(true), Some(false)], &[Some(true)]);

    let first: Vec<_> = cover.cubes().next().unwrap().inputs().to_vec();
    assert_eq!(first, vec![Some(true), Some(false)]);

    cover.add_cube(&[None, None, Some(true)], &[Some(true)]);
    let first: Vec<_> = cover.cubes().next().unwrap().inputs().to_vec();
    // Old cube padded with don't-cares.
    assert_eq!(first, vec![Some(true), Some(false), None]);
}

#[test]
fn test_labeled_growth_backfills() {
    let mut cover = Cover::with_labels(CoverType::F, &["a"], &["f"]);
    cover.add_cube(&[Some(true), Some(false)], &[Some(true)]);
    assert_eq!(cover.num_inputs(), 2);
    assert_eq!(cover.input_labels().len(), 2);
    assert_eq!(cover.input_labels()[0].as_ref(), "a");
    assert_eq!(cover.input_labels()[1].as_ref(), "x1");
}

#[test]
fn test_minimize_xor_stays_two_cubes() {
    let mut cover = Cover::new(CoverType::F);
    cover.add_cube(&[Some(false), Some(true)], &[Some(true)]);
    cover.add_cube(&[Some(true), Some(false)], &[Some(true)]);
    let minimized = cover.minimize().unwrap();
    assert_eq!(minimized.num_cubes(), 2);
}

#[test]
fn test_minimize_merges_adjacent() {
    let mut cover = Cover::new(CoverType::F);
    cover.add_cube(&[Some(false), Some(false), None], &[Some(true)]);
    cover.add_cube(&[Some(false), Some(true), None], &[Some(true)]);
    let minimized = cover.minimize().unwrap();
    assert_eq!(minimized.num_cubes(), 1);
    let cube = minimized.cubes().next().unwrap().clone();
    assert_eq!(cube.inputs(), &[Some(false), None, None]);
}

#[test]
fn test_minimize_with_dont_care_cubes() {
    let mut cover = Cover::new(CoverType::FD);
    cover.add_cube(&[Some(true), Some(false)], &[Some(true)]);
    cover.add_cube(&[Some(false), Some(true)], &[Some(true)]);
    cover.add_cube(&[Some(true), Some(true)], &[None]); // don't-care row
    let minimized = cover.minimize().unwrap();
    assert_eq!(minimized.num_cubes(), 2);
    // The D cube survives the round trip.
    assert_eq!(minimized.cover_type(), CoverType::FD);
    let d_count = minimized
        .cubes()
        .filter(|c| c.cube_type() == CubeType::D)
        .count();
    assert_eq!(d_count, 1);
}

#[test]
fn test_minimize_exact_matches_heuristic_here() {
    let mut cover = Cover::new(CoverType::F);
    cover.add_cube(&[Some(false), Some(false)], &[Some(true)]);
    cover.add_cube(&[Some(false), Some(true)], &[Some(true)]);
    cover.add_cube(&[Some(true), Some(false)], &[Some(true)]);
    cover.add_cube(&[Some(true), Some(true)], &[Some(true)]);
    let heuristic = cover.minimize().unwrap();
    let exact = cover.minimize_exact().unwrap();
    assert_eq!(heuristic.num_cubes(), 1);
    assert_eq!(exact.num_cubes(), 1);
}

#[test]
fn test_tautology_and_complement_duality() {
    let mut cover = Cover::new(CoverType::F);
    cover.add_cube(&[Some(false), None], &[Some(true)]);
    cover.add_cube(&[Some(true), None], &[Some(true)]);
    assert!(cover.tautology().unwrap());
    assert_eq!(cover.complement().unwrap().num_cubes(), 0);

    let mut partial = Cover::new(CoverType::F);
    partial.add_cube(&[Some(true), Some(true)], &[Some(true)]);
    assert!(!partial.tautology().unwrap());
    assert!(partial.complement().unwrap().num_cubes() > 0);
}

#[test]
fn test_multi_output_minimization() {
    let mut cover = Cover::new(CoverType::F);
    // f0 = a, f1 = a: identical outputs share cubes after minimization.
    cover.add_cube(&[Some(true), Some(false)], &[Some(true), Some(true)]);
    cover.add_cube(&[Some(true), Some(true)], &[Some(true), Some(true)]);
    let minimized = cover.minimize().unwrap();
    assert_eq!(minimized.num_cubes(), 1);
    let cube = minimized.cubes().next().unwrap().clone();
    assert_eq!(cube.inputs(), &[Some(true), None]);
    assert_eq!(cube.outputs(), &[true, true]);
}

#[test]
fn test_pla_roundtrip_via_cover() {
    let pla = ".i 2\n.o 1\n.p 2\n01 1\n10 1\n.e\n";
    let cover = Cover::from_pla_string(pla).unwrap();
    assert_eq!(cover.num_inputs(), 2);
    assert_eq!(cover.num_outputs(), 1);
    assert_eq!(cover.num_cubes(), 2);
    let text = cover.to_pla_string(CoverType::F).unwrap();
    let again = Cover::from_pla_string(&text).unwrap();
    assert_eq!(again.num_cubes(), 2);
}

#[test]
fn test_debug_format_mentions_dimensions() {
    let mut cover = Cover::new(CoverType::F);
    cover.add_cube(&[Some(true)], &[Some(true)]);
    let debug = format!("{:?}", cover);
    assert!(debug.contains("num_inputs: 1"));
    assert!(debug.contains("num_cubes: 1"));
}
