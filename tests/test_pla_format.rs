//! PLA dialect coverage through the public reader/writer traits

use espresso_native::{Cover, CoverType, CubeType, Minimizable, PLAReader, PLAWriter};

#[test]
fn test_full_pipeline_parse_minimize_print() {
    let pla = "\
# 2-bit decoder segment
.i 2
.o 1
.ilb a b
.ob f
.p 4
00 1
01 1
10 1
11 1
.e
";
    let cover = Cover::from_pla_string(pla).unwrap();
    let minimized = cover.minimize().unwrap();
    let text = minimized.to_pla_string(CoverType::F).unwrap();
    assert_eq!(
        text,
        ".i 2\n.ilb a b\n.o 1\n.ob f\n.p 1\n-- 1\n.e\n"
    );
}

#[test]
fn test_fr_type_produces_off_set_cubes() {
    let pla = ".i 2\n.o 1\n.type fr\n11 1\n00 0\n.e\n";
    let cover = Cover::from_pla_string(pla).unwrap();
    let f_count = cover
        .cubes()
        .filter(|c| c.cube_type() == CubeType::F)
        .count();
    let r_count = cover
        .cubes()
        .filter(|c| c.cube_type() == CubeType::R)
        .count();
    assert_eq!(f_count, 1);
    assert_eq!(r_count, 1);
}

#[test]
fn test_type_f_ignores_output_zeros() {
    // Under .type f, '0' output characters assert nothing.
    let pla = ".i 2\n.o 2\n.type f\n11 10\n.e\n";
    let cover = Cover::from_pla_string(pla).unwrap();
    assert_eq!(cover.num_cubes(), 1);
    let cube = cover.cubes().next().unwrap().clone();
    assert_eq!(cube.outputs(), &[true, false]);
}

#[test]
fn test_pipe_separated_and_column_formatted_rows() {
    let pla = ".i 4\n.o 1\n01 10 | 1\n.e\n";
    let cover = Cover::from_pla_string(pla).unwrap();
    assert_eq!(cover.num_cubes(), 1);
    let cube = cover.cubes().next().unwrap().clone();
    assert_eq!(
        cube.inputs(),
        &[Some(false), Some(true), Some(true), Some(false)]
    );
}

#[test]
fn test_end_terminator_alias() {
    let pla = ".i 2\n.o 1\n1- 1\n.end\n";
    let cover = Cover::from_pla_string(pla).unwrap();
    assert_eq!(cover.num_cubes(), 1);
}

#[test]
fn test_inferred_dimensions() {
    // No .i/.o: the first row fixes the dimensions.
    let pla = "10 1\n01 1\n";
    let cover = Cover::from_pla_string(pla).unwrap();
    assert_eq!(cover.num_inputs(), 2);
    assert_eq!(cover.num_outputs(), 1);
    assert_eq!(cover.num_cubes(), 2);
}

#[test]
fn test_minimized_fd_round_trip_keeps_dont_cares() {
    let pla = ".i 2\n.o 1\n.type fd\n10 1\n01 1\n11 -\n.e\n";
    let minimized = Cover::from_pla_string(pla).unwrap().minimize().unwrap();
    let text = minimized.to_pla_string(CoverType::FD).unwrap();
    let again = Cover::from_pla_string(&text).unwrap();
    assert_eq!(again.num_cubes(), minimized.num_cubes());
    let d_count = again
        .cubes()
        .filter(|c| c.cube_type() == CubeType::D)
        .count();
    assert_eq!(d_count, 1);
}
