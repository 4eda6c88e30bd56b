use super::ast::*;
use super::{Column, Error, Keyword, Lexer, LineNumber, MaxValue, Token};
use crate::error;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

/// ## One line of source
///
/// The normalized text is kept alongside the parsed statement chain so
/// LIST and SAVE reproduce what was typed.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    number: LineNumber,
    body: String,
    head: Statement,
}

/// Validate a numeric constant as a line number.
pub fn line_number(n: f64) -> Option<u16> {
    if n.fract() != 0.0 || n < 0.0 || n > LineNumber::max_value() as f64 {
        None
    } else {
        Some(n as u16)
    }
}

impl Line {
    /// Parse the rest of the lexer's buffer as the body of a line.
    pub fn parse(number: LineNumber, lexer: &mut Lexer) -> Result<Line> {
        let start = lexer.position();
        let body = lexer.slice(start..usize::max_value()).trim().to_string();
        let mut head = super::parse_statement(lexer)?;
        head.locate(number, 0);
        Ok(Line { number, body, head })
    }

    /// Parse a line that must begin with a line number, as found in a
    /// program file. Blank lines yield `None`.
    pub fn load(source: &str) -> Result<Option<Line>> {
        let mut lexer = Lexer::new(source);
        let number = match lexer.next_token() {
            Token::Eol => return Ok(None),
            Token::Constant(n) => match line_number(n) {
                Some(n) => n,
                None => return Err(error!(SyntaxError, ..&lexer.span(); "Illegal line number.")),
            },
            _ => {
                return Err(error!(SyntaxError, ..&lexer.span();
                    "Line failed to start with a line number."))
            }
        };
        if !lexer.has_more_tokens() {
            return Ok(None);
        }
        Line::parse(Some(number), &mut lexer)
            .map(Some)
            .map_err(|e| e.in_line_number(Some(number)))
    }

    pub fn number(&self) -> LineNumber {
        self.number
    }

    pub fn is_direct(&self) -> bool {
        self.number.is_none()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn head(&self) -> &Statement {
        &self.head
    }

    pub fn statement(&self, index: u16) -> Option<&Statement> {
        self.head.find(index)
    }

    /// Rewrite the line number and every GOTO, GOSUB, THEN and ON target
    /// found in `changes`. Targets not in `changes` are left alone.
    pub fn renum(&self, changes: &HashMap<u16, u16>) -> Result<Line> {
        let mut edits: Vec<(Column, u16)> = vec![];
        let mut lexer = Lexer::new(&self.body);
        let mut expect_target = false;
        let mut in_list = false;
        loop {
            match lexer.next_token() {
                Token::Eol | Token::Error(_) | Token::Keyword(Keyword::Rem) => break,
                Token::Symbol('\'') => break,
                Token::Keyword(Keyword::Goto)
                | Token::Keyword(Keyword::Gosub)
                | Token::Keyword(Keyword::Then) => {
                    expect_target = true;
                    in_list = false;
                }
                Token::Constant(n) if expect_target => {
                    if let Some(new) = line_number(n).and_then(|n| changes.get(&n)) {
                        edits.push((lexer.span(), *new));
                    }
                    expect_target = false;
                    in_list = true;
                }
                Token::Symbol(',') if in_list => {
                    expect_target = true;
                    in_list = false;
                }
                _ => {
                    expect_target = false;
                    in_list = false;
                }
            }
        }
        let mut chars: Vec<char> = self.body.chars().collect();
        for (col, new) in edits.iter().rev() {
            chars.splice(col.clone(), new.to_string().chars());
        }
        let body: String = chars.into_iter().collect();
        let number = match self.number {
            Some(n) => Some(*changes.get(&n).unwrap_or(&n)),
            None => None,
        };
        Line::parse(number, &mut Lexer::new(&body))
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.number {
            Some(number) => write!(f, "{} {}", number, self.body),
            None => write!(f, "{}", self.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(s: &str) -> Line {
        Line::load(s).unwrap().unwrap()
    }

    #[test]
    fn test_load_normalizes() {
        let l = line("  10   print 1 : goto 20  ");
        assert_eq!(l.to_string(), "10 print 1 : goto 20");
        assert_eq!(l.number(), Some(10));
        assert_eq!(l.statement(1).unwrap().text, "goto 20");
    }

    #[test]
    fn test_load_requires_number() {
        let e = Line::load("print 1").unwrap_err();
        assert_eq!(e.message_text(), "Line failed to start with a line number.");
        assert!(Line::load("").unwrap().is_none());
    }

    #[test]
    fn test_renum_targets() {
        let mut changes = HashMap::new();
        changes.insert(10, 100);
        changes.insert(20, 200);
        changes.insert(5, 50);
        let l = line("10 IF a THEN 20 : GOSUB 5");
        assert_eq!(l.renum(&changes).unwrap().to_string(), "100 IF a THEN 200 : GOSUB 50");
        let l = line("20 ON x GOTO 5,10, 20");
        assert_eq!(l.renum(&changes).unwrap().to_string(), "200 ON x GOTO 50,100, 200");
        let l = line("5 PRINT 10: REM GOTO 10");
        assert_eq!(l.renum(&changes).unwrap().to_string(), "50 PRINT 10: REM GOTO 10");
    }

    #[test]
    fn test_list_round_trip() {
        let l = line("30 FOR i = 1 TO 10 STEP 2: PRINT i;: NEXT i");
        let again = line(&l.to_string());
        assert_eq!(l, again);
    }
}
