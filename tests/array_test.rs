mod common;
use common::*;

#[test]
fn test_dim_store_fetch() {
    let out = run(&["10 DIM A(3)", "20 A(2)=5", "30 PRINT A(2);A(1)"]);
    assert_eq!(out, "50\n");
}

#[test]
fn test_two_dimensions() {
    let out = run(&[
        "10 DIM G(2,3), N$(2)",
        "20 FOR I=1 TO 2: FOR J=1 TO 3",
        "30 G(I,J)=I*10+J",
        "40 NEXT J: NEXT I",
        "50 N$(2)=\"Z\"",
        "60 PRINT G(2,3);G(1,2);N$(2);N$(1);\"!\"",
    ]);
    assert_eq!(out, "2312Z!\n");
}

#[test]
fn test_index_out_of_range() {
    assert_eq!(
        run(&["10 DIM A(3)", "20 PRINT A(4)"]),
        "Index out of range. IN 20: PRINT A(4)\n"
    );
    assert_eq!(
        run(&["10 DIM A(3)", "20 A(0)=1"]),
        "Index out of range. IN 20: A(0)=1\n"
    );
}

#[test]
fn test_wrong_number_of_indices() {
    assert_eq!(
        run(&["10 DIM A(3)", "20 PRINT A(1,1)"]),
        "Wrong number of indices. IN 20: PRINT A(1,1)\n"
    );
}

#[test]
fn test_undeclared_array() {
    assert_eq!(
        run(&["10 B(1)=2"]),
        "Array must be declared in a DIM statement IN 10: B(1)=2\n"
    );
}

#[test]
fn test_redimension() {
    assert_eq!(
        run(&["10 DIM A(3)", "20 DIM A(4)"]),
        "Array 'a' is already dimensioned. IN 20: DIM A(4)\n"
    );
}

#[test]
fn test_array_and_scalar_are_separate() {
    let out = run(&["10 DIM A(2)", "20 A=7", "30 A(1)=3", "40 PRINT A;A(1)"]);
    assert_eq!(out, "73\n");
}

#[test]
fn test_nan_index_is_out_of_range() {
    assert_eq!(
        run(&["10 DIM A(3)", "20 PRINT A((-1)**0.5)"]),
        "Index out of range. IN 20: PRINT A((-1)**0.5)\n"
    );
}
