use crate::error;
use crate::lang::{ast::Statement, Error, Line, LineNumber, MaxValue};
use std::collections::{btree_map::Values, BTreeMap, HashMap};
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;

/// Position of one statement: its line and pre-order index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr {
    pub line: LineNumber,
    pub index: u16,
}

impl Addr {
    pub fn of(statement: &Statement) -> Addr {
        Addr {
            line: statement.line,
            index: statement.index,
        }
    }
}

/// ## Program source ordered by line number
///
/// Cloning is cheap so a running program can hold the listing while the
/// rest of the machine state is mutated.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    source: Arc<BTreeMap<LineNumber, Line>>,
}

impl Listing {
    pub fn clear(&mut self) {
        self.source = Arc::default();
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn insert(&mut self, line: Line) -> Option<Line> {
        Arc::make_mut(&mut self.source).insert(line.number(), line)
    }

    pub fn remove(&mut self, ln: LineNumber) -> Option<Line> {
        Arc::make_mut(&mut self.source).remove(&ln)
    }

    pub fn get(&self, ln: LineNumber) -> Option<&Line> {
        self.source.get(&ln)
    }

    pub fn lines(&self) -> Values<'_, LineNumber, Line> {
        self.source.values()
    }

    /// Lines numbered `start..=end`.
    pub fn range(&self, start: u16, end: u16) -> impl Iterator<Item = &Line> {
        self.source
            .range((Included(Some(start)), Included(Some(end.max(start)))))
            .map(|(_, line)| line)
    }

    /// Used for loading a new Listing from a file.
    pub fn load_str(&mut self, line: &str) -> Result<(), Error> {
        if let Some(line) = Line::load(line)? {
            self.insert(line);
        }
        Ok(())
    }

    pub fn statement(&self, addr: Addr) -> Option<&Statement> {
        self.source.get(&addr.line)?.statement(addr.index)
    }

    /// First statement of exactly line `n`.
    pub fn line_start(&self, n: u16) -> Option<Addr> {
        self.source.get(&Some(n)).map(|line| Addr::of(line.head()))
    }

    /// First statement of the first line numbered `n` or higher.
    pub fn first_from(&self, n: u16) -> Option<Addr> {
        self.source
            .range((Included(Some(n)), Unbounded))
            .next()
            .map(|(_, line)| Addr::of(line.head()))
    }

    /// First statement of the line after `ln`. Direct lines have no
    /// successor.
    pub fn next_line(&self, ln: LineNumber) -> Option<Addr> {
        ln?;
        self.source
            .range((Excluded(ln), Unbounded))
            .next()
            .map(|(_, line)| Addr::of(line.head()))
    }

    /// The chained statement if there is one, else the next line.
    pub fn next_statement(&self, statement: &Statement) -> Option<Addr> {
        match &statement.next {
            Some(next) => Some(Addr::of(next)),
            None => self.next_line(statement.line),
        }
    }

    pub fn renum(&mut self, new_start: u16, step: u16) -> Result<(), Error> {
        if step == 0 {
            return Err(error!(IllegalFunctionCall; "Renumber step must not be zero."));
        }
        let mut changes: HashMap<u16, u16> = HashMap::default();
        let mut new_num = new_start as u32;
        for ln in self.source.keys().flatten() {
            if new_num > LineNumber::max_value() as u32 {
                return Err(error!(Overflow; "Renumbering exceeds the highest line number."));
            }
            changes.insert(*ln, new_num as u16);
            new_num += step as u32;
        }
        let mut new_source: BTreeMap<LineNumber, Line> = BTreeMap::default();
        for line in self.lines() {
            let line = line.renum(&changes)?;
            new_source.insert(line.number(), line);
        }
        self.source = Arc::from(new_source);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(lines: &[&str]) -> Listing {
        let mut l = Listing::default();
        for s in lines {
            l.load_str(s).unwrap();
        }
        l
    }

    #[test]
    fn test_next_statement_crosses_lines() {
        let l = listing(&["10 a=1: b=2", "30 c=3", "20 d=4"]);
        let first = l.statement(l.first_from(0).unwrap()).unwrap();
        assert_eq!(first.text, "a=1");
        let second = l.statement(l.next_statement(first).unwrap()).unwrap();
        assert_eq!(second.text, "b=2");
        let third = l.statement(l.next_statement(second).unwrap()).unwrap();
        assert_eq!(third.text, "d=4");
        assert_eq!(l.first_from(21).unwrap().line, Some(30));
        assert!(l.next_line(Some(30)).is_none());
    }

    #[test]
    fn test_renum() {
        let mut l = listing(&["5 GOTO 7", "7 GOSUB 5"]);
        l.renum(100, 100).unwrap();
        let text: Vec<String> = l.lines().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["100 GOTO 200", "200 GOSUB 100"]);
        assert!(l.line_start(200).is_some());
    }

    #[test]
    fn test_renum_overflow() {
        let mut l = listing(&["1 REM", "2 REM"]);
        assert!(l.renum(65529, 10).is_err());
    }
}
