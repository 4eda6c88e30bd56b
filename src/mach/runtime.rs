use super::{Config, Console, Interrupt, Listing, Program, RunOutcome};
use crate::error;
use crate::lang::{line_number, Category, Error, Keyword, Lexer, Line, Token};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

type Result<T> = std::result::Result<T, Error>;

/// ## The command interpreter
///
/// Feed it one line at a time with [`enter`](Interpreter::enter). Numbered
/// lines are stored, commands are dispatched, and anything else runs
/// once on a fresh, empty program.
#[derive(Debug)]
pub struct Interpreter {
    program: Program,
    config: Config,
    interrupt: Interrupt,
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new(Config::default())
    }
}

impl Interpreter {
    pub fn new(config: Config) -> Interpreter {
        let interrupt = Interrupt::new();
        Interpreter {
            program: Program::new(&config, interrupt.clone()),
            config,
            interrupt,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// A handle that shares this interpreter's interrupt flags.
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Process one line of input. Returns `false` once BYE is entered.
    pub fn enter(&mut self, line: &str, console: &mut dyn Console) -> bool {
        let mut lexer = Lexer::new(line);
        let token = lexer.next_token();
        match token {
            Token::Eol => return true,
            Token::Keyword(Keyword::Bye) => return false,
            Token::Keyword(kw) if kw.category() == Category::Command => {
                self.command(kw, &mut lexer, console)
            }
            Token::Constant(n) => self.store(n, &mut lexer, console),
            _ => {
                lexer.unget_token();
                self.immediate(&mut lexer, console)
            }
        }
        console.print("Ready.\n");
        true
    }

    /// Replace the program with the contents of a file.
    pub fn load(&mut self, filename: &str, console: &mut dyn Console) {
        let text = match fs::read_to_string(filename) {
            Ok(text) => text,
            Err(e) => {
                debug!(filename, error = %e, "load failed");
                console.print(&format!("File {} not found.\n", filename));
                return;
            }
        };
        let mut listing = Listing::default();
        for source in text.lines() {
            if let Err(e) = listing.load_str(source) {
                console.print("Syntax error reading file.\n");
                console.print_error(&e.to_string());
                console.print(&format!("{}\n", caret(source, &e)));
                return;
            }
        }
        debug!(filename, lines = listing.len(), "loaded");
        self.program.set_listing(listing);
        console.print("File loaded.\n");
    }

    fn store(&mut self, n: f64, lexer: &mut Lexer, console: &mut dyn Console) {
        let number = match line_number(n) {
            Some(number) => number,
            None => {
                let e = error!(SyntaxError, ..&lexer.span(); "Illegal line number.");
                return self.syntax_error(e, lexer, console);
            }
        };
        if !lexer.has_more_tokens() {
            self.program.remove(number);
            return;
        }
        match Line::parse(Some(number), lexer) {
            Ok(line) => self.program.insert(line),
            Err(e) => self.syntax_error(e, lexer, console),
        }
    }

    fn immediate(&mut self, lexer: &mut Lexer, console: &mut dyn Console) {
        let line = match Line::parse(None, lexer) {
            Ok(line) => line,
            Err(e) => return self.syntax_error(e, lexer, console),
        };
        let mut transient = Program::new(&self.config, self.interrupt.clone());
        let result = transient.run_direct(line, console);
        self.report(result, console);
    }

    fn syntax_error(&self, e: Error, lexer: &Lexer, console: &mut dyn Console) {
        console.print_error(&e.to_string());
        console.print(&format!("{}\n", lexer.show_error()));
    }

    fn report(&mut self, result: Result<RunOutcome>, console: &mut dyn Console) {
        match result {
            Ok(RunOutcome::Halted) => {}
            Ok(RunOutcome::Stopped { line, .. }) => match line {
                Some(n) => console.print(&format!("STOP in {}\n", n)),
                None => console.print("STOP\n"),
            },
            Ok(RunOutcome::Break(addr)) => match addr.line {
                Some(n) => console.print(&format!("Break in {}\n", n)),
                None => console.print("Break\n"),
            },
            Err(e) => {
                warn!(code = e.code(), line = ?e.line_number(), "{}", e);
                console.print_error(&e.to_string());
            }
        }
        self.interrupt.reset();
    }

    fn command(&mut self, kw: Keyword, lexer: &mut Lexer, console: &mut dyn Console) {
        debug!(command = %kw, "command");
        match kw {
            Keyword::New => {
                let listing = Listing::default();
                self.program = Program::new(&self.config, self.interrupt.clone());
                self.program.set_listing(listing);
            }
            Keyword::Run => {
                let first = match lexer.next_token() {
                    Token::Constant(n) => line_number(n).unwrap_or(0),
                    _ => 0,
                };
                let result = self.program.run(first, console);
                self.report(result, console);
            }
            Keyword::Resume => {
                let result = self.program.resume(true, console);
                self.report(result, console);
            }
            Keyword::Cont => {
                let result = self.program.resume(false, console);
                self.report(result, console);
            }
            Keyword::List => self.list(lexer, console),
            Keyword::Renumber => self.renumber(lexer, console),
            Keyword::Dump => {
                for line in self.program.dump() {
                    console.print(&format!("{}\n", line));
                }
            }
            Keyword::Cmds => {
                let filter = match lexer.next_token() {
                    Token::Keyword(kw) => kw.spelling().to_string(),
                    Token::Ident(ident) => ident.name().to_string(),
                    Token::Str(s) => s,
                    _ => String::new(),
                };
                for entry in Keyword::search(&filter) {
                    console.print(&format!("{} - {}\n", entry.spelling, entry.help));
                }
            }
            Keyword::Save => match filename(lexer, "SAVE") {
                Ok(name) => self.save(&name, console),
                Err(msg) => console.print(&msg),
            },
            Keyword::Load => match filename(lexer, "LOAD") {
                Ok(name) => self.load(&name, console),
                Err(msg) => console.print(&msg),
            },
            Keyword::Cat => match filename(lexer, "CAT") {
                Ok(name) => match fs::read_to_string(&name) {
                    Ok(text) => {
                        console.print(&text);
                        if !text.is_empty() && !text.ends_with('\n') {
                            console.print("\n");
                        }
                    }
                    Err(_) => console.print(&format!("File {} not found.\n", name)),
                },
                Err(msg) => console.print(&msg),
            },
            Keyword::Del => match filename(lexer, "DEL") {
                Ok(name) => {
                    if let Err(e) = fs::remove_file(&name) {
                        debug!(filename = %name, error = %e, "delete failed");
                        console.print(&format!("File {} not found.\n", name));
                    }
                }
                Err(msg) => console.print(&msg),
            },
            Keyword::Dir => {
                let path = match lexer.next_token() {
                    Token::Str(s) => s,
                    _ => ".".to_string(),
                };
                self.dir(&path, console);
            }
            _ => console.print("Command not implemented.\n"),
        }
    }

    fn list(&self, lexer: &mut Lexer, console: &mut dyn Console) {
        let (start, end) = match lexer.next_token() {
            Token::Eol => (0, u16::max_value()),
            Token::Constant(n) => {
                let start = n as u16;
                match lexer.next_token() {
                    Token::Eol => (start, u16::max_value()),
                    Token::Symbol(',') => match lexer.next_token() {
                        Token::Constant(e) => (start, e as u16),
                        _ => {
                            console.print("Illegal parameter to LIST command.\n");
                            console.print(&format!("{}\n", lexer.show_error()));
                            return;
                        }
                    },
                    _ => {
                        console.print("Syntax error in LIST command.\n");
                        console.print(&format!("{}\n", lexer.show_error()));
                        return;
                    }
                }
            }
            _ => {
                console.print("Syntax error in LIST command.\n");
                console.print(&format!("{}\n", lexer.show_error()));
                return;
            }
        };
        for line in self.program.listing().range(start, end) {
            console.print(&format!("{}\n", line));
        }
    }

    fn renumber(&mut self, lexer: &mut Lexer, console: &mut dyn Console) {
        let mut args = vec![];
        loop {
            match lexer.next_token() {
                Token::Eol => break,
                Token::Symbol(',') => continue,
                Token::Constant(n) if n >= 0.0 && n <= u16::max_value() as f64 => {
                    args.push(n as u16)
                }
                _ => {
                    console.print("Syntax error in RENUMBER command.\n");
                    console.print(&format!("{}\n", lexer.show_error()));
                    return;
                }
            }
        }
        let start = args.get(0).copied().unwrap_or(100);
        let step = args.get(1).copied().unwrap_or(100);
        if let Err(e) = self.program.renum(start, step) {
            console.print_error(&e.to_string());
        }
    }

    fn save(&self, name: &str, console: &mut dyn Console) {
        let name = if Path::new(name).extension().is_some() {
            name.to_string()
        } else {
            format!("{}.bas", name)
        };
        console.print("Saving file...\n");
        let mut text = String::new();
        for line in self.program.listing().lines() {
            text.push_str(&format!("{}\n", line));
        }
        match fs::write(&name, text) {
            Ok(()) => debug!(filename = %name, "saved"),
            Err(e) => {
                let e = error!(DiskIoError; format!("Unable to write {}: {}", name, e));
                console.print_error(&e.to_string());
            }
        }
    }

    fn dir(&self, path: &str, console: &mut dyn Console) {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(_) => {
                console.print(&format!("File {} not found.\n", path));
                return;
            }
        };
        let mut files: Vec<(String, u64)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let meta = entry.metadata().ok()?;
                if meta.is_file() {
                    Some((entry.file_name().to_string_lossy().into_owned(), meta.len()))
                } else {
                    None
                }
            })
            .collect();
        files.sort();
        for (name, size) in files {
            console.print(&format!("{} -- {}\n", name, size));
        }
    }
}

fn caret(source: &str, e: &Error) -> String {
    format!("{}\n{}^", source.trim_end(), "-".repeat(e.column().start))
}

fn filename(lexer: &mut Lexer, command: &str) -> std::result::Result<String, String> {
    match lexer.next_token() {
        Token::Str(s) => Ok(s),
        _ => Err(format!("File name expected for {} command.\n", command)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::BufferConsole;

    #[test]
    fn test_blank_line_is_silent() {
        let mut interpreter = Interpreter::default();
        let mut console = BufferConsole::new();
        assert!(interpreter.enter("   ", &mut console));
        assert_eq!(console.take_output(), "");
    }

    #[test]
    fn test_bye() {
        let mut interpreter = Interpreter::default();
        let mut console = BufferConsole::new();
        assert!(!interpreter.enter("bye", &mut console));
    }

    #[test]
    fn test_bare_number_deletes() {
        let mut interpreter = Interpreter::default();
        let mut console = BufferConsole::new();
        interpreter.enter("10 print 1", &mut console);
        interpreter.enter("20 print 2", &mut console);
        interpreter.enter("10", &mut console);
        assert_eq!(interpreter.program().listing().len(), 1);
    }
}
