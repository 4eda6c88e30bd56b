use super::exec::{self, Step};
use super::{Addr, Console, Interrupt, Listing, Stack, Val, Var};
use crate::error;
use crate::lang::ast::{AcceptVisitor, Literal, Statement, StatementKind, Visitor};
use crate::lang::{Error, Ident, Line, LineNumber};
use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, Error>;

/// Settings shared by every program of a session.
#[derive(Debug, Clone)]
pub struct Config {
    pub seed: u64,
    pub name: String,
    pub id: u64,
    pub stack_limit: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            seed: 0,
            name: "main".into(),
            id: 1,
            stack_limit: u16::max_value() as usize,
        }
    }
}

/// A control stack entry. Each remembers the statement that pushed it.
#[derive(Debug, Clone)]
pub enum Frame {
    For {
        at: Addr,
        var: Ident,
        start: f64,
        end: f64,
        step: f64,
    },
    Gosub {
        at: Addr,
    },
    Do {
        at: Addr,
    },
}

impl Frame {
    pub fn at(&self) -> Addr {
        match self {
            Frame::For { at, .. } | Frame::Gosub { at } | Frame::Do { at } => *at,
        }
    }
}

/// How a run ended when it did not end in error.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Halted,
    /// STOP was executed; RESUME or CONT continue with `resume`.
    Stopped {
        line: LineNumber,
        resume: Option<Addr>,
    },
    /// The pause flag was raised before the statement at this address.
    Break(Addr),
}

#[derive(Debug, Clone, Copy)]
struct Paused {
    resume: Option<Addr>,
    by_stop: bool,
}

/// ## A BASIC program and everything it needs to run
///
/// Each instance is fully isolated. Separate programs may run on separate
/// threads; the only shared state is the interrupt handle.
#[derive(Debug)]
pub struct Program {
    listing: Listing,
    pub(super) vars: Var,
    pub(super) stack: Stack<Frame>,
    data: Vec<Literal>,
    data_ptr: usize,
    pub(super) rng: StdRng,
    pub(super) trace: bool,
    pub(super) basetime: DateTime<Local>,
    pub(super) name: String,
    pub(super) id: u64,
    pub(super) column: usize,
    paused: Option<Paused>,
    pub(super) interrupt: Interrupt,
}

impl Default for Program {
    fn default() -> Program {
        Program::new(&Config::default(), Interrupt::new())
    }
}

struct DataCollector<'a>(&'a mut Vec<Literal>);

impl<'a> Visitor for DataCollector<'a> {
    fn visit_statement(&mut self, statement: &Statement) {
        if let StatementKind::Data(items) = &statement.kind {
            self.0.extend(items.iter().cloned());
        }
    }
}

impl Program {
    pub fn new(config: &Config, interrupt: Interrupt) -> Program {
        Program {
            listing: Listing::default(),
            vars: Var::new(),
            stack: Stack::with_limit("STACK OVERFLOW", config.stack_limit),
            data: vec![],
            data_ptr: 0,
            rng: StdRng::seed_from_u64(config.seed),
            trace: false,
            basetime: Local::now(),
            name: config.name.clone(),
            id: config.id,
            column: 0,
            paused: None,
            interrupt,
        }
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn set_listing(&mut self, listing: Listing) {
        self.listing = listing;
        self.paused = None;
    }

    pub fn insert(&mut self, line: Line) {
        debug!(line = ?line.number(), "store line");
        self.listing.insert(line);
        self.paused = None;
    }

    pub fn remove(&mut self, number: u16) -> bool {
        debug!(line = number, "delete line");
        self.paused = None;
        self.listing.remove(Some(number)).is_some()
    }

    pub fn renum(&mut self, start: u16, step: u16) -> Result<()> {
        self.paused = None;
        self.listing.renum(start, step)
    }

    /// Look up a variable by name, e.g. `"a"` or `"n$"`.
    pub fn variable(&self, name: &str) -> Option<Val> {
        self.vars.fetch(&Ident::new(&name.to_ascii_lowercase())).ok()
    }

    pub fn dump(&self) -> Vec<String> {
        self.vars.dump()
    }

    pub fn session_name(&self) -> &str {
        &self.name
    }

    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    /// Write program output, tracking the column for TAB.
    pub fn print(&mut self, console: &mut dyn Console, s: &str) {
        match s.rfind('\n') {
            Some(pos) => self.column = s[pos + 1..].chars().count(),
            None => self.column += s.chars().count(),
        }
        console.print(s);
    }

    pub(super) fn read_data(&mut self) -> Option<Literal> {
        let item = self.data.get(self.data_ptr)?.clone();
        self.data_ptr += 1;
        Some(item)
    }

    pub(super) fn restore(&mut self) {
        self.data_ptr = 0;
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.data.clear();
        self.data_ptr = 0;
        self.vars.clear();
        self.paused = None;
        let mut collector = DataCollector(&mut self.data);
        for line in self.listing.lines() {
            line.head().accept(&mut collector);
        }
    }

    /// Run from the first line numbered `first_line` or higher; zero
    /// means the beginning.
    pub fn run(&mut self, first_line: u16, console: &mut dyn Console) -> Result<RunOutcome> {
        self.reset();
        debug!(lines = self.listing.len(), first_line, "run");
        match self.listing.first_from(first_line) {
            Some(start) => self.execute_from(Some(start), console),
            None => Ok(RunOutcome::Halted),
        }
    }

    /// Execute a direct line. The program store is left untouched apart
    /// from the direct line itself, which is replaced on each call.
    pub fn run_direct(&mut self, line: Line, console: &mut dyn Console) -> Result<RunOutcome> {
        debug_assert!(line.is_direct());
        self.listing.insert(line);
        self.reset();
        let start = self.listing.get(None).map(|line| Addr::of(line.head()));
        let result = self.execute_from(start, console);
        self.listing.remove(None);
        result
    }

    /// Continue a paused program. With `after_stop_only` the pause must
    /// have come from a STOP statement.
    pub fn resume(
        &mut self,
        after_stop_only: bool,
        console: &mut dyn Console,
    ) -> Result<RunOutcome> {
        let paused = match self.paused.take() {
            Some(paused) => paused,
            None => {
                return Err(error!(CantContinue; "This program was not previously stopped."))
            }
        };
        if after_stop_only && !paused.by_stop {
            self.paused = Some(paused);
            return Err(error!(CantContinue; "This program was not previously stopped."));
        }
        self.execute_from(paused.resume, console)
    }

    fn execute_from(
        &mut self,
        start: Option<Addr>,
        console: &mut dyn Console,
    ) -> Result<RunOutcome> {
        let listing = self.listing.clone();
        let mut at = start;
        let mut count: usize = 0;
        while let Some(addr) = at {
            if self.interrupt.take_stop() {
                return Err(error!(Interrupted; "Program forced to stop").in_line_number(addr.line));
            }
            if self.interrupt.take_pause() {
                self.paused = Some(Paused {
                    resume: Some(addr),
                    by_stop: false,
                });
                debug!(count, "break");
                return Ok(RunOutcome::Break(addr));
            }
            let statement = match listing.statement(addr) {
                Some(s) => s,
                None => return Err(error!(InternalError; "Lost track of the program.")),
            };
            count += 1;
            if statement.is_data() {
                at = listing.next_statement(statement);
                continue;
            }
            trace!(line = ?statement.line, text = %statement.text, "execute");
            if self.trace {
                let line = match statement.line {
                    Some(n) => n.to_string(),
                    None => "direct".into(),
                };
                self.print(console, &format!("[{}] {}\n", line, statement.text));
            }
            match exec::execute(self, &listing, statement, console)? {
                Step::Next(next) => at = next,
                Step::Stop(resume) => {
                    self.paused = Some(Paused {
                        resume,
                        by_stop: true,
                    });
                    debug!(count, "stopped");
                    return Ok(RunOutcome::Stopped {
                        line: statement.line,
                        resume,
                    });
                }
            }
        }
        debug!(count, "halted");
        Ok(RunOutcome::Halted)
    }
}
