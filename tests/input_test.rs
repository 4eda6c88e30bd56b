mod common;
use basic::mach::{BufferConsole, Console, Interpreter, Interrupt};
use common::*;

#[test]
fn test_input_with_prompt() {
    let out = run_with_input(&["10 INPUT \"Name\";N$", "20 PRINT \"HI \";N$"], &["Bob"]);
    assert_eq!(out, "Name Bob\nHI Bob\n");
}

#[test]
fn test_input_asks_for_more() {
    let out = run_with_input(&["10 INPUT A,B", "20 PRINT A+B"], &["1", "2"]);
    assert_eq!(out, "? 1\n(more)? 2\n3\n");
}

#[test]
fn test_input_splits_on_commas() {
    let out = run_with_input(&["10 INPUT A,B", "20 PRINT A+B"], &["1, 2"]);
    assert_eq!(out, "? 1, 2\n3\n");
}

#[test]
fn test_input_quoted_commas() {
    let out = run_with_input(
        &["10 INPUT A$,B$", "20 PRINT A$;\"|\";B$"],
        &["\"x, y\", z"],
    );
    assert_eq!(out, "? \"x, y\", z\nx, y|z\n");
}

#[test]
fn test_input_into_array() {
    let out = run_with_input(
        &["10 DIM V(2)", "20 INPUT V(1),V(2)", "30 PRINT V(2)-V(1)"],
        &["3,10"],
    );
    assert_eq!(out, "? 3,10\n7\n");
}

#[test]
fn test_input_end_of_input() {
    let out = run_with_input(&["10 INPUT A"], &[]);
    assert_eq!(out, "? Out of data for INPUT. IN 10: INPUT A\n");
}

#[test]
fn test_input_bad_number() {
    let out = run_with_input(&["10 INPUT A"], &["abc"]);
    assert_eq!(out, "? abc\nInvalid number for INPUT: 'abc' IN 10: INPUT A\n");
}

/// Presses Ctrl-C at every prompt.
struct Interrupting {
    inner: BufferConsole,
    interrupt: Interrupt,
}

impl Console for Interrupting {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.interrupt.pause();
        self.inner.read_line(prompt)
    }

    fn print(&mut self, s: &str) {
        self.inner.print(s);
    }
}

#[test]
fn test_interrupted_input_breaks_and_cont_asks_again() {
    let mut r = Interpreter::default();
    let mut c = BufferConsole::new();
    exec(&mut r, &mut c, &["10 INPUT A", "20 PRINT A*2"]);
    let mut ctrl_c = Interrupting {
        inner: BufferConsole::new(),
        interrupt: r.interrupt(),
    };
    r.enter("RUN", &mut ctrl_c);
    assert_eq!(ctrl_c.inner.take_output(), "? Break in 10\nReady.\n");
    c.push_input("21");
    assert_eq!(exec(&mut r, &mut c, &["CONT"]), "? 21\n42\n");
}
