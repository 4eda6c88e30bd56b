mod common;
use basic::mach::{BufferConsole, Interpreter};
use common::*;

fn program(r: &mut Interpreter, c: &mut BufferConsole) {
    exec(
        r,
        c,
        &[
            "5 I=0",
            "10 I=I+1: IF I = 3 THEN 40",
            "20 GOSUB 50",
            "30 GOTO 10",
            "40 ON 1 GOTO 60",
            "50 PRINT I;: RETURN",
            "60 PRINT \"DONE\"",
        ],
    );
}

#[test]
fn test_renumber_defaults() {
    let mut r = Interpreter::default();
    let mut c = BufferConsole::new();
    program(&mut r, &mut c);
    let before = exec(&mut r, &mut c, &["RUN"]);
    assert_eq!(before, "12DONE\n");
    exec(&mut r, &mut c, &["RENUMBER"]);
    let listing = exec(&mut r, &mut c, &["LIST"]);
    assert_eq!(
        listing,
        "100 I=0\n\
         200 I=I+1: IF I = 3 THEN 500\n\
         300 GOSUB 600\n\
         400 GOTO 200\n\
         500 ON 1 GOTO 700\n\
         600 PRINT I;: RETURN\n\
         700 PRINT \"DONE\"\n"
    );
    assert_eq!(exec(&mut r, &mut c, &["RUN"]), before);
}

#[test]
fn test_renumber_start_and_step() {
    let mut r = Interpreter::default();
    let mut c = BufferConsole::new();
    program(&mut r, &mut c);
    exec(&mut r, &mut c, &["RENUMBER 1000, 5"]);
    let listing = exec(&mut r, &mut c, &["LIST 1010,1015"]);
    assert_eq!(listing, "1010 GOSUB 1025\n1015 GOTO 1005\n");
}

#[test]
fn test_renumber_overflow_leaves_program() {
    let mut r = Interpreter::default();
    let mut c = BufferConsole::new();
    program(&mut r, &mut c);
    let out = exec(&mut r, &mut c, &["RENUMBER 65000, 100"]);
    assert_eq!(out, "Renumbering exceeds the highest line number.\n");
    assert!(exec(&mut r, &mut c, &["LIST"]).starts_with("5 I=0\n"));
}

#[test]
fn test_renumber_zero_step() {
    let mut r = Interpreter::default();
    let mut c = BufferConsole::new();
    program(&mut r, &mut c);
    let out = exec(&mut r, &mut c, &["RENUMBER 10, 0"]);
    assert_eq!(out, "Renumber step must not be zero.\n");
}

#[test]
fn test_list_round_trips() {
    let mut r = Interpreter::default();
    let mut c = BufferConsole::new();
    program(&mut r, &mut c);
    let listing = exec(&mut r, &mut c, &["LIST"]);
    let mut again = Interpreter::default();
    let lines: Vec<&str> = listing.lines().collect();
    exec(&mut again, &mut c, &lines);
    assert_eq!(again.program().listing().len(), 7);
    for (a, b) in r.program().listing().lines().zip(again.program().listing().lines()) {
        assert_eq!(a, b);
    }
}
