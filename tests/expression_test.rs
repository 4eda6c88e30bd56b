mod common;
use common::*;

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(direct("PRINT 2+3*4"), "14\n");
    assert_eq!(direct("PRINT (2+3)*4"), "20\n");
    assert_eq!(direct("PRINT 8-2-1"), "5\n");
    assert_eq!(direct("PRINT 2**3**2"), "512\n");
}

#[test]
fn test_number_format() {
    assert_eq!(direct("PRINT 1/4"), ".25\n");
    assert_eq!(direct("PRINT -1/4"), "-.25\n");
    assert_eq!(direct("PRINT 1/3"), ".33333333\n");
    assert_eq!(direct("PRINT 1E3"), "1000\n");
    assert_eq!(direct("PRINT 2.50"), "2.5\n");
}

#[test]
fn test_bitwise() {
    assert_eq!(direct("PRINT 7 & 3"), "3\n");
    assert_eq!(direct("PRINT 5 | 2"), "7\n");
    assert_eq!(direct("PRINT 6 ^ 3"), "5\n");
}

#[test]
fn test_relational_and_boolean() {
    assert_eq!(direct("PRINT 3 > 2"), "1\n");
    assert_eq!(direct("PRINT 3 <= 2"), "0\n");
    assert_eq!(direct("PRINT 1 <> 2"), "1\n");
    assert_eq!(direct("PRINT 1 < 2 AND 2 < 3"), "1\n");
    assert_eq!(direct("PRINT 1 > 2 OR 2 > 3"), "0\n");
}

#[test]
fn test_nan_is_unordered() {
    assert_eq!(
        direct("N = (-1)**0.5: PRINT N < 1; N <= 1; N = N; N >= 1; N > 1; N <> 1"),
        "000001\n"
    );
}

#[test]
fn test_string_expressions() {
    assert_eq!(direct("PRINT \"AB\" + \"CD\""), "ABCD\n");
    assert_eq!(direct("PRINT \"A\" < \"B\""), "1\n");
    assert_eq!(direct("PRINT \"say \"\"hi\"\"\""), "say \"hi\"\n");
}

#[test]
fn test_mixed_comparison_is_syntax_error() {
    let out = direct("PRINT \"A\" = 1");
    assert!(out.starts_with("SYNTAX ERROR: Can't compare strings and numbers."));
}

#[test]
fn test_string_subtract_is_syntax_error() {
    let out = direct("PRINT \"A\" - \"B\"");
    assert!(out.starts_with("SYNTAX ERROR"));
}

#[test]
fn test_overflow() {
    let out = direct("PRINT 1E300*1E300");
    assert!(out.starts_with("Overflow"));
}

#[test]
fn test_divide_by_zero_direct() {
    assert_eq!(direct("PRINT 1/0"), "divide by zero: PRINT 1/0\n");
}

#[test]
fn test_integer_variable_truncates() {
    assert_eq!(direct("A%=7.9: PRINT A%"), "7\n");
}
