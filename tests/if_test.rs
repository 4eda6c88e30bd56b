mod common;
use common::*;

#[test]
fn test_if_then_line() {
    let out = run(&["10 IF 1 > 0 THEN 30", "20 PRINT \"NO\"", "30 PRINT \"YES\""]);
    assert_eq!(out, "YES\n");
}

#[test]
fn test_if_true_runs_chain() {
    let out = run(&["10 IF 1 THEN PRINT \"A\": PRINT \"B\"", "20 PRINT \"C\""]);
    assert_eq!(out, "A\nB\nC\n");
}

#[test]
fn test_if_false_skips_rest_of_line() {
    let out = run(&["10 IF 0 THEN PRINT \"A\": PRINT \"B\"", "20 PRINT \"C\""]);
    assert_eq!(out, "C\n");
}

#[test]
fn test_if_string_comparison() {
    let out = run(&[
        "10 A$=\"X\"",
        "20 IF A$ = \"X\" THEN PRINT \"SAME\"",
        "30 IF A$ <> \"X\" THEN PRINT \"DIFF\"",
    ]);
    assert_eq!(out, "SAME\n");
}

#[test]
fn test_if_chain_can_jump() {
    let out = run(&[
        "10 I=0",
        "20 I=I+1: IF I < 3 THEN GOTO 20",
        "30 PRINT I",
    ]);
    assert_eq!(out, "3\n");
}

#[test]
fn test_nested_if() {
    let out = run(&["10 IF 1 THEN IF 0 THEN PRINT \"NO\"", "20 PRINT \"END\""]);
    assert_eq!(out, "END\n");
}

#[test]
fn test_if_then_missing_line() {
    assert_eq!(
        run(&["10 IF 1 THEN 99"]),
        "Illegal line number following THEN. IN 10: IF 1 THEN 99\n"
    );
}

#[test]
fn test_if_requires_then() {
    assert!(direct("IF 1 PRINT 2").starts_with("SYNTAX ERROR: Missing THEN keyword in IF statement."));
}

#[test]
fn test_if_rejects_string_condition() {
    assert!(direct("IF \"A\" THEN PRINT 1").starts_with("SYNTAX ERROR"));
}
