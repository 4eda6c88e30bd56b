use super::Val;
use crate::error;
use crate::lang::{Error, Keyword};
use std::collections::VecDeque;

/// ## The outside world as seen by a running program
///
/// Line input, text output, and the named capabilities (graphics, voice,
/// music, messaging) that some statements forward to.
pub trait Console {
    /// Block until the next line of input is available. `None` at end
    /// of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    fn print(&mut self, s: &str);

    fn print_error(&mut self, s: &str) {
        self.print(s);
        self.print("\n");
    }

    /// The most recent key press, consumed by the call.
    fn last_key(&mut self) -> Option<char> {
        None
    }

    fn invoke(&mut self, keyword: Keyword, _args: &[Val]) -> Result<(), Error> {
        Err(unavailable(keyword))
    }
}

pub fn unavailable(keyword: Keyword) -> Error {
    error!(FeatureUnavailable; format!("{} is not available", keyword))
}

/// In-memory console. Input is scripted, output is collected, and input
/// lines are echoed after their prompt as a terminal would show them.
#[derive(Debug, Default)]
pub struct BufferConsole {
    input: VecDeque<String>,
    keys: VecDeque<char>,
    output: String,
    capable: bool,
    invoked: Vec<(Keyword, Vec<Val>)>,
}

impl BufferConsole {
    pub fn new() -> BufferConsole {
        BufferConsole::default()
    }

    /// A console that accepts every capability call and records it.
    pub fn capable() -> BufferConsole {
        BufferConsole {
            capable: true,
            ..BufferConsole::default()
        }
    }

    pub fn push_input(&mut self, line: &str) {
        self.input.push_back(line.to_string());
    }

    pub fn push_key(&mut self, ch: char) {
        self.keys.push_back(ch);
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn invoked(&self) -> &[(Keyword, Vec<Val>)] {
        &self.invoked
    }
}

impl Console for BufferConsole {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.output.push_str(prompt);
        let line = self.input.pop_front()?;
        self.output.push_str(&line);
        self.output.push('\n');
        Some(line)
    }

    fn print(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn last_key(&mut self) -> Option<char> {
        self.keys.pop_front()
    }

    fn invoke(&mut self, keyword: Keyword, args: &[Val]) -> Result<(), Error> {
        if !self.capable {
            return Err(unavailable(keyword));
        }
        self.invoked.push((keyword, args.to_vec()));
        Ok(())
    }
}
