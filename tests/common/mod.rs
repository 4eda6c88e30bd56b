use basic::mach::{BufferConsole, Interpreter};

/// Enter each line, returning everything printed with the "Ready."
/// prompts removed.
pub fn exec(r: &mut Interpreter, console: &mut BufferConsole, lines: &[&str]) -> String {
    for line in lines {
        r.enter(line, console);
    }
    console.take_output().replace("Ready.\n", "")
}

/// Store `program` in a fresh interpreter, RUN it, and return the output.
pub fn run(program: &[&str]) -> String {
    run_with_input(program, &[])
}

pub fn run_with_input(program: &[&str], input: &[&str]) -> String {
    let mut r = Interpreter::default();
    let mut console = BufferConsole::new();
    exec(&mut r, &mut console, program);
    for line in input {
        console.push_input(line);
    }
    exec(&mut r, &mut console, &["RUN"])
}

/// Run a single immediate line.
pub fn direct(line: &str) -> String {
    let mut r = Interpreter::default();
    let mut console = BufferConsole::new();
    exec(&mut r, &mut console, &[line])
}
