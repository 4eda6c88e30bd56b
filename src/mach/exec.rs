use super::program::Frame;
use super::val::format_number;
use super::{Addr, Console, Listing, Program, Val};
use crate::error;
use crate::lang::ast::{Expression, Guard, Literal, PrintItem, Statement, StatementKind, Then, Variable};
use crate::lang::{line_number, Error, Ident};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

type Result<T> = std::result::Result<T, Error>;

/// What to do after a statement.
pub enum Step {
    /// Continue at the address, or halt on `None`.
    Next(Option<Addr>),
    /// STOP: pause, remembering where to resume.
    Stop(Option<Addr>),
}

/// Execute one statement. Any failure is reported against the statement's
/// line and source text.
pub fn execute(
    p: &mut Program,
    listing: &Listing,
    statement: &Statement,
    console: &mut dyn Console,
) -> Result<Step> {
    Executor {
        p,
        listing,
        statement,
        console,
    }
    .execute()
    .map_err(|e| e.in_statement(&statement.text).in_line_number(statement.line))
}

struct Executor<'a> {
    p: &'a mut Program,
    listing: &'a Listing,
    statement: &'a Statement,
    console: &'a mut dyn Console,
}

impl<'a> Executor<'a> {
    fn execute(&mut self) -> Result<Step> {
        use StatementKind::*;
        let statement = self.statement;
        match &statement.kind {
            Data(_) | Rem => self.advance(),
            Dim(arrays) => self.r#dim(arrays),
            Do => self.r#do(),
            End => Ok(Step::Next(None)),
            For(var, start, end, step) => self.r#for(var, start, end, step.as_ref()),
            Gosub(target) => self.r#gosub(target),
            Goto(target) => self.r#goto(target),
            If(condition, then) => self.r#if(condition, then),
            Input(prompt, vars) => self.r#input(prompt.as_deref(), vars),
            Invoke(kw, args) => {
                let mut vals = vec![];
                for arg in args {
                    vals.push(self.p.eval(arg, self.console)?);
                }
                self.console.invoke(*kw, &vals)?;
                self.advance()
            }
            Let(var, expr) => {
                let val = self.p.eval(expr, self.console)?;
                self.store(var, val)?;
                self.advance()
            }
            Loop(guard) => self.r#loop(guard.as_ref()),
            Name(expr) => {
                let column = self.p.column;
                self.p.name = self.p.string_value(expr, column, self.console)?;
                self.advance()
            }
            Next(var) => self.r#next(var.as_ref()),
            On(selector, gosub, targets) => self.r#on(selector, *gosub, targets),
            Print(items) => self.r#print(items),
            Randomize(seed) => {
                self.p.rng = match seed {
                    Some(e) => StdRng::seed_from_u64(self.p.value(e, self.console)?.to_bits()),
                    None => StdRng::from_entropy(),
                };
                self.advance()
            }
            Read(vars) => self.r#read(vars),
            Restore => {
                self.p.restore();
                self.advance()
            }
            Return => self.r#return(),
            Stop => Ok(Step::Stop(self.listing.next_statement(self.statement))),
            Troff => {
                self.p.trace = false;
                self.advance()
            }
            Tron => {
                self.p.trace = true;
                self.advance()
            }
        }
    }

    fn advance(&self) -> Result<Step> {
        Ok(Step::Next(self.listing.next_statement(self.statement)))
    }

    fn here(&self) -> Addr {
        Addr::of(self.statement)
    }

    fn after(&self, at: Addr) -> Result<Option<Addr>> {
        match self.listing.statement(at) {
            Some(s) => Ok(self.listing.next_statement(s)),
            None => Err(error!(InternalError; "Lost track of the program.")),
        }
    }

    fn text_at(&self, at: Addr) -> String {
        self.listing
            .statement(at)
            .map(|s| s.text.clone())
            .unwrap_or_default()
    }

    fn store(&mut self, var: &Variable, val: Val) -> Result<()> {
        match var {
            Variable::Unary(ident) => self.p.vars.store(ident, val),
            Variable::Array(ident, indices) => {
                let indices = self.p.indices(indices, self.console)?;
                self.p.vars.store_array(ident, &indices, val)
            }
        }
    }

    fn line_target(&mut self, target: &Expression) -> Result<(f64, Option<Addr>)> {
        let n = self.p.value(target, self.console)?;
        Ok((n, line_number(n).and_then(|n| self.listing.line_start(n))))
    }

    fn r#goto(&mut self, target: &Expression) -> Result<Step> {
        match self.line_target(target)? {
            (_, Some(addr)) => Ok(Step::Next(Some(addr))),
            (n, None) => Err(error!(UndefinedLine;
                format!("GOTO non-existent line {}.", format_number(n)))),
        }
    }

    fn r#gosub(&mut self, target: &Expression) -> Result<Step> {
        match self.line_target(target)? {
            (_, Some(addr)) => {
                self.p.stack.push(Frame::Gosub { at: self.here() })?;
                Ok(Step::Next(Some(addr)))
            }
            (n, None) => Err(error!(UndefinedLine;
                format!("GOSUB non-existent line {}.", format_number(n)))),
        }
    }

    fn r#return(&mut self) -> Result<Step> {
        loop {
            match self.p.stack.pop() {
                None => return Err(error!(ReturnWithoutGosub; "RETURN without GOSUB")),
                Some(Frame::Gosub { at }) => return Ok(Step::Next(self.after(at)?)),
                Some(_) => continue,
            }
        }
    }

    fn r#if(&mut self, condition: &Expression, then: &Then) -> Result<Step> {
        if self.p.value(condition, self.console)? == 0.0 {
            return Ok(Step::Next(self.listing.next_line(self.statement.line)));
        }
        match then {
            Then::Chain(statement) => Ok(Step::Next(Some(Addr::of(statement)))),
            Then::Line(n) => match self.listing.line_start(*n) {
                Some(addr) => Ok(Step::Next(Some(addr))),
                None => Err(error!(UndefinedLine; "Illegal line number following THEN.")),
            },
        }
    }

    fn r#for(
        &mut self,
        var: &Ident,
        start: &Expression,
        end: &Expression,
        step: Option<&Expression>,
    ) -> Result<Step> {
        let start = self.p.value(start, self.console)?;
        let end = self.p.value(end, self.console)?;
        let step = match step {
            Some(e) => self.p.value(e, self.console)?,
            None => 1.0,
        };
        self.p.vars.store(var, Val::Number(start))?;
        // Re-entering a loop drops its old frame and anything above it.
        let at = self.here();
        if let Some(pos) = self
            .p
            .stack
            .iter()
            .position(|f| matches!(f, Frame::For { var: v, .. } if v == var))
        {
            self.p.stack.truncate(pos);
        }
        self.p.stack.push(Frame::For {
            at,
            var: var.clone(),
            start,
            end,
            step,
        })?;
        self.advance()
    }

    fn r#next(&mut self, name: Option<&Ident>) -> Result<Step> {
        let frame = loop {
            match self.p.stack.pop() {
                None => return Err(error!(NextWithoutFor; "NEXT without FOR")),
                Some(frame @ Frame::For { .. }) => {
                    if let Frame::For { var, .. } = &frame {
                        if name.map_or(true, |n| n == var) {
                            break frame;
                        }
                    }
                }
                Some(other) => {
                    return Err(error!(NextWithoutFor;
                        format!("Bogus intervening statement: {}", self.text_at(other.at()))))
                }
            }
        };
        let (at, var, start, end, step) = match &frame {
            Frame::For {
                at,
                var,
                start,
                end,
                step,
            } => (*at, var, *start, *end, *step),
            _ => return Err(error!(InternalError)),
        };
        if step == 0.0 {
            return Err(error!(IllegalFunctionCall; "step value of 0.0 in for loop."));
        }
        let current = match self.p.vars.fetch(var)? {
            Val::Number(n) => n + step,
            Val::String(_) => return Err(error!(TypeMismatch)),
        };
        self.p.vars.store(var, Val::Number(current))?;
        let current = match self.p.vars.fetch(var)? {
            Val::Number(n) => n,
            Val::String(_) => current,
        };
        let done = if start >= end {
            current < end || current > start
        } else {
            current > end || current < start
        };
        if done {
            return self.advance();
        }
        let resume = self.after(at)?;
        self.p.stack.push(frame)?;
        Ok(Step::Next(resume))
    }

    fn r#do(&mut self) -> Result<Step> {
        self.p.stack.push(Frame::Do { at: self.here() })?;
        self.advance()
    }

    fn r#loop(&mut self, guard: Option<&Guard>) -> Result<Step> {
        let at = match self.p.stack.pop() {
            None => return Err(error!(LoopWithoutDo; "LOOP without DO")),
            Some(Frame::Do { at }) => at,
            Some(other) => {
                return Err(error!(LoopWithoutDo;
                    format!("Bogus intervening statement: {}", self.text_at(other.at()))))
            }
        };
        let again = match guard {
            None => true,
            Some(Guard::While(e)) => self.p.value(e, self.console)? != 0.0,
            Some(Guard::Until(e)) => self.p.value(e, self.console)? == 0.0,
        };
        if !again {
            return self.advance();
        }
        self.p.stack.push(Frame::Do { at })?;
        Ok(Step::Next(self.after(at)?))
    }

    fn r#on(&mut self, selector: &Expression, gosub: bool, targets: &[u16]) -> Result<Step> {
        let n = self.p.value(selector, self.console)?;
        if n < 0.0 {
            return Err(error!(IllegalFunctionCall; "Negative selector in ON statement."));
        }
        let n = n as usize;
        if n == 0 || n > targets.len() {
            return self.advance();
        }
        let target = targets[n - 1];
        let addr = match self.listing.line_start(target) {
            Some(addr) => addr,
            None => {
                let kw = if gosub { "GOSUB" } else { "GOTO" };
                return Err(error!(UndefinedLine;
                    format!("{} non-existent line {}.", kw, target)));
            }
        };
        if gosub {
            self.p.stack.push(Frame::Gosub { at: self.here() })?;
        }
        Ok(Step::Next(Some(addr)))
    }

    fn r#dim(&mut self, arrays: &[(Ident, Vec<Expression>)]) -> Result<Step> {
        for (ident, bounds) in arrays {
            let mut dims = vec![];
            for bound in bounds {
                let n = self.p.value(bound, self.console)?;
                if n < 1.0 {
                    return Err(error!(IllegalFunctionCall; "Array bound must be at least 1."));
                }
                dims.push(n as usize);
            }
            self.p.vars.dimension_array(ident, dims)?;
        }
        self.advance()
    }

    fn r#print(&mut self, items: &[PrintItem]) -> Result<Step> {
        for item in items {
            let s = match item {
                PrintItem::Comma => "\t".to_string(),
                PrintItem::Semicolon => String::new(),
                PrintItem::Expression(e) if e.is_string() => {
                    let column = self.p.column;
                    self.p.string_value(e, column, self.console)?
                }
                PrintItem::Expression(e) => format_number(self.p.value(e, self.console)?),
            };
            self.p.print(self.console, &s);
        }
        match items.last() {
            Some(PrintItem::Comma) | Some(PrintItem::Semicolon) => {}
            _ => self.p.print(self.console, "\n"),
        }
        self.advance()
    }

    fn r#read(&mut self, vars: &[Variable]) -> Result<Step> {
        for var in vars {
            let val = match (self.p.read_data(), var.ident().is_string()) {
                (None, _) => return Err(error!(OutOfData; "Out of data")),
                (Some(Literal::String(s)), true) => Val::String(s),
                (Some(Literal::Number(n)), false) => Val::Number(n),
                _ => return Err(error!(TypeMismatch; "Type mismatch in READ.")),
            };
            self.store(var, val)?;
        }
        self.advance()
    }

    fn r#input(&mut self, prompt: Option<&str>, vars: &[Variable]) -> Result<Step> {
        let prompt = format!("{} ", prompt.unwrap_or("?"));
        let mut pending: VecDeque<String> = VecDeque::new();
        for (i, var) in vars.iter().enumerate() {
            if pending.is_empty() {
                let p = if i == 0 {
                    prompt.clone()
                } else {
                    format!("(more){}", prompt)
                };
                let line = match self.console.read_line(&p) {
                    Some(line) => line,
                    // Ctrl-C at the prompt; the run loop turns this into a break here.
                    None if self.p.interrupt.is_paused() => {
                        return Ok(Step::Next(Some(self.here())))
                    }
                    None => return Err(error!(OutOfData; "Out of data for INPUT.")),
                };
                self.p.column = 0;
                pending = split_input(&line).into();
            }
            let item = pending.pop_front().unwrap_or_default();
            let val = if var.ident().is_string() {
                Val::String(item)
            } else {
                match item.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => Val::Number(n),
                    _ => {
                        return Err(error!(TypeMismatch;
                            format!("Invalid number for INPUT: '{}'", item.trim())))
                    }
                }
            };
            self.store(var, val)?;
        }
        self.advance()
    }
}

/// Split on commas outside double quotes. Quoted items lose their quotes;
/// unquoted items are trimmed.
pub fn split_input(line: &str) -> Vec<String> {
    let mut items = vec![];
    let mut current = String::new();
    let mut quoted = false;
    let mut was_quoted = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                was_quoted = true;
            }
            ',' if !quoted => {
                items.push(finish_item(&current, was_quoted));
                current.clear();
                was_quoted = false;
            }
            _ => current.push(ch),
        }
    }
    items.push(finish_item(&current, was_quoted));
    items
}

fn finish_item(s: &str, was_quoted: bool) -> String {
    if was_quoted {
        s.trim_matches(' ').to_string()
    } else {
        s.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_input() {
        assert_eq!(split_input("1, 2 ,3"), vec!["1", "2", "3"]);
        assert_eq!(split_input("\"a, b\", c"), vec!["a, b", "c"]);
        assert_eq!(split_input(""), vec![""]);
    }
}
