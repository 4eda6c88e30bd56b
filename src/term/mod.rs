use crate::Args;
use ansi_term::Style;
use basic::lang::{Error, Keyword};
use basic::mach::{unavailable, Config, Console, Interpreter, Interrupt, Listing, Val};
use linefeed::{
    Command, Completer, Completion, DefaultTerminal, Function, Interface, Prompter, ReadResult,
    Signal, Terminal,
};
use std::io;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::{debug, warn};

#[derive(Debug, ThisError)]
pub enum TermError {
    #[error("terminal: {0}")]
    Io(#[from] io::Error),
    #[error("unable to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub fn main(args: Args) -> Result<(), TermError> {
    let config = Config {
        seed: args.seed,
        name: args.name.clone(),
        ..Config::default()
    };
    let mut interpreter = Interpreter::new(config);
    let interrupt = interpreter.interrupt();
    let handler = interpreter.interrupt();
    ctrlc::set_handler(move || handler.pause())?;
    let mut console = TerminalConsole::new(interrupt)?;

    if let Some(file) = &args.file {
        interpreter.load(file, &mut console);
        if args.run {
            interpreter.enter("RUN", &mut console);
            return console.flush();
        }
    }

    console.print("Line BASIC\nType CMDS or CMDS n to see commands (beginning with n)\n");
    loop {
        console.flush()?;
        let listing = interpreter.program().listing().clone();
        console
            .command
            .set_completer(Arc::new(LineCompleter::new(listing)));
        let line = match console.command.read_line()? {
            ReadResult::Input(line) => line,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        if !line.trim().is_empty() {
            console.command.add_history_unique(line.clone());
        }
        if !interpreter.enter(&line, &mut console) {
            break;
        }
    }
    debug!("bye");
    console.flush()
}

/// Console on the user's terminal. Output without a trailing newline is
/// held back so an INPUT prompt can be drawn after it by the line editor.
struct TerminalConsole {
    command: Interface<DefaultTerminal>,
    input: Interface<DefaultTerminal>,
    interrupt: Interrupt,
    pending: String,
}

impl TerminalConsole {
    fn new(interrupt: Interrupt) -> io::Result<TerminalConsole> {
        let command = Interface::new("BASIC")?;
        let input = Interface::new("INPUT")?;
        input.set_report_signal(Signal::Interrupt, true);
        CapsFunction::install(&command);
        Ok(TerminalConsole {
            command,
            input,
            interrupt,
            pending: String::new(),
        })
    }

    fn flush(&mut self) -> Result<(), TermError> {
        if !self.pending.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            self.command.write_fmt(format_args!("{}\n", pending))?;
        }
        Ok(())
    }

    fn write(&mut self, s: &str) {
        if let Err(error) = self.command.write_fmt(format_args!("{}", s)) {
            warn!(%error, "write failed");
        }
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let prompt = format!("{}{}", std::mem::take(&mut self.pending), prompt);
        if let Err(error) = self.input.set_prompt(&prompt) {
            warn!(%error, "prompt failed");
        }
        match self.input.read_line() {
            Ok(ReadResult::Input(line)) => {
                if !line.trim().is_empty() {
                    self.input.add_history_unique(line.clone());
                }
                Some(line)
            }
            Ok(ReadResult::Signal(Signal::Interrupt)) => {
                if let Err(error) = self.input.set_buffer("") {
                    warn!(%error, "clear failed");
                }
                self.interrupt.pause();
                None
            }
            Ok(_) => None,
            Err(error) => {
                warn!(%error, "read failed");
                None
            }
        }
    }

    fn print(&mut self, s: &str) {
        self.pending.push_str(s);
        if let Some(pos) = self.pending.rfind('\n') {
            let rest = self.pending.split_off(pos + 1);
            let done = std::mem::replace(&mut self.pending, rest);
            self.write(&done);
        }
    }

    fn print_error(&mut self, s: &str) {
        if let Err(error) = self.flush() {
            warn!(%error, "flush failed");
        }
        let styled = format!("{}\n", Style::new().bold().paint(s));
        self.write(&styled);
    }

    fn invoke(&mut self, keyword: Keyword, _args: &[Val]) -> Result<(), Error> {
        match keyword {
            Keyword::Cls => {
                self.pending.clear();
                self.write("\x1b[2J\x1b[H");
                Ok(())
            }
            _ => Err(unavailable(keyword)),
        }
    }
}

/// Upper cases letters as they are typed outside of strings.
struct CapsFunction;

impl CapsFunction {
    fn install<T: Terminal>(i: &Interface<T>) {
        i.define_function("caps-function", Arc::new(CapsFunction));
        for ch in b'a'..=b'z' {
            i.bind_sequence(
                char::from(ch).to_string(),
                Command::from_str("caps-function"),
            );
        }
    }
}

impl<Term: Terminal> Function<Term> for CapsFunction {
    fn execute(&self, prompter: &mut Prompter<Term>, count: i32, ch: char) -> io::Result<()> {
        let quoted = prompter.buffer()[..prompter.cursor()]
            .chars()
            .filter(|c| *c == '"')
            .count()
            % 2
            == 1;
        let ch = if quoted { ch } else { ch.to_ascii_uppercase() };
        prompter.insert(count as usize, ch)
    }
}

/// Tab on a bare line number recalls that line for editing.
struct LineCompleter {
    listing: Listing,
}

impl LineCompleter {
    fn new(listing: Listing) -> LineCompleter {
        LineCompleter { listing }
    }
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        let num = prompter.buffer().trim().parse::<u16>().ok()?;
        let line = self.listing.get(Some(num))?;
        let mut comp = Completion::simple(line.to_string());
        comp.suffix = linefeed::complete::Suffix::None;
        Some(vec![comp])
    }
}
