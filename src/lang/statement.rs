use super::parse::Parser;
use super::line::line_number;
use super::{ast::*, token::*, Category, Error, Keyword, Lexer};

type Result<T> = std::result::Result<T, Error>;

/// Parse a chain of colon separated statements up to the end of the line.
pub fn parse_statement(lexer: &mut Lexer) -> Result<Statement> {
    Parser::new(lexer).statement()
}

impl<'a> Parser<'a> {
    fn statement(&mut self) -> Result<Statement> {
        let start = self.lexer.position();
        let t = self.next_token();
        let kind = match t {
            Token::Symbol('?') => self.r#print()?,
            Token::Symbol('\'') => self.r#rem(),
            Token::Ident(_) | Token::Array(..) => {
                self.unget();
                self.r#let()?
            }
            Token::Keyword(kw) => match kw.category() {
                Category::Statement => self.keyword(kw)?,
                Category::Command => {
                    return Err(self.error(&format!("{} is a command, not a statement.", kw)))
                }
                Category::Function => {
                    return Err(self.error(&format!("{} is a function, not a statement.", kw)))
                }
            },
            _ => return Err(self.unexpected(&t, "Unrecognized statement.")),
        };
        let text = self.lexer.slice(start..self.lexer.position());
        let ends_line = matches!(kind, StatementKind::End | StatementKind::Goto(_));
        let mut statement = Statement::new(kind, &text);
        let t = self.next_token();
        match t {
            Token::Eol => {}
            Token::Symbol(':') if !ends_line => {
                statement.next = Some(Box::new(self.statement()?));
            }
            _ => return Err(self.unexpected(&t, "extra input beyond statement end")),
        }
        Ok(statement)
    }

    fn keyword(&mut self, kw: Keyword) -> Result<StatementKind> {
        use Keyword::*;
        match kw {
            Data => self.r#data(),
            Dim => self.r#dim(),
            Do => Ok(StatementKind::Do),
            End => Ok(StatementKind::End),
            For => self.r#for(),
            Gosub => Ok(StatementKind::Gosub(self.line_target(kw)?)),
            Goto => Ok(StatementKind::Goto(self.line_target(kw)?)),
            If => self.r#if(),
            Input => self.r#input(),
            Let => self.r#let(),
            Loop => self.r#loop(),
            Name => self.r#name(),
            Next => self.r#next(),
            On => self.r#on(),
            Print => self.r#print(),
            Randomize => self.r#randomize(),
            Read => Ok(StatementKind::Read(self.variables("READ")?)),
            Rem => Ok(self.r#rem()),
            Restore => Ok(StatementKind::Restore),
            Return => Ok(StatementKind::Return),
            Stop => Ok(StatementKind::Stop),
            Troff => Ok(StatementKind::Troff),
            Tron => Ok(StatementKind::Tron),
            Cls | Color | Say | Splay | Plot | Pline | Pcircle | Pcls | Send | Wakeup | Kill => {
                self.r#invoke(kw)
            }
            _ => Err(self.error(&format!("{} can't begin a statement.", kw))),
        }
    }

    fn variable(&mut self, msg: &str) -> Result<Variable> {
        match self.next_token() {
            Token::Ident(ident) => Ok(Variable::Unary(ident)),
            Token::Array(ident, indices) => Ok(Variable::Array(ident, indices)),
            t => Err(self.unexpected(&t, msg)),
        }
    }

    fn variables(&mut self, name: &str) -> Result<Vec<Variable>> {
        let mut vars = vec![];
        loop {
            vars.push(self.variable(&format!("Variable expected for {}.", name))?);
            if !self.next_token().is_symbol(',') {
                self.unget();
                return Ok(vars);
            }
        }
    }

    fn line_number(&self, n: f64) -> Result<u16> {
        line_number(n).ok_or_else(|| self.error("Illegal line number."))
    }

    fn line_target(&mut self, kw: Keyword) -> Result<Expression> {
        let e = self.expression()?;
        if e.is_string() || e.is_boolean() {
            return Err(self.error(&format!("{} needs a numeric line number.", kw)));
        }
        Ok(e)
    }

    fn r#let(&mut self) -> Result<StatementKind> {
        let var = self.variable("variable expected for LET statement.")?;
        let t = self.next_token();
        if !t.is_operator(Operator::Equal) {
            return Err(self.unexpected(&t, "missing = in assignment statement."));
        }
        let e = self.expression()?;
        if e.is_boolean() {
            return Err(self.error("Boolean expression not allowed in LET."));
        }
        if var.ident().is_string() && !e.is_string() {
            return Err(self.error("String assignment needs string expression."));
        }
        if !var.ident().is_string() && e.is_string() {
            return Err(self.error("Numeric assignment needs numeric expression."));
        }
        Ok(StatementKind::Let(var, e))
    }

    fn r#print(&mut self) -> Result<StatementKind> {
        let mut items = vec![];
        loop {
            let t = self.next_token();
            match t {
                _ if t.is_end() => {
                    self.unget();
                    return Ok(StatementKind::Print(items));
                }
                Token::Symbol(';') => items.push(PrintItem::Semicolon),
                Token::Symbol(',') => items.push(PrintItem::Comma),
                _ => {
                    self.unget();
                    items.push(PrintItem::Expression(self.expression()?));
                    match self.next_token() {
                        Token::Symbol(';') => items.push(PrintItem::Semicolon),
                        Token::Symbol(',') => items.push(PrintItem::Comma),
                        _ => {
                            self.unget();
                            return Ok(StatementKind::Print(items));
                        }
                    }
                }
            }
        }
    }

    fn r#rem(&mut self) -> StatementKind {
        self.lexer.rest_of_line();
        StatementKind::Rem
    }

    fn r#if(&mut self) -> Result<StatementKind> {
        let condition = self.expression()?;
        if condition.is_string() {
            return Err(self.error("IF needs a numeric or boolean condition."));
        }
        let t = self.next_token();
        if !t.is_keyword(Keyword::Then) {
            return Err(self.unexpected(&t, "Missing THEN keyword in IF statement."));
        }
        let then = match self.next_token() {
            Token::Constant(n) => Then::Line(self.line_number(n)?),
            _ => {
                self.unget();
                let chain = self.statement()?;
                // The chain consumed the end of the line; hand it back.
                self.unget();
                Then::Chain(Box::new(chain))
            }
        };
        Ok(StatementKind::If(condition, then))
    }

    fn r#for(&mut self) -> Result<StatementKind> {
        let var = match self.next_token() {
            Token::Ident(ident) if !ident.is_string() => ident,
            t => return Err(self.unexpected(&t, "Numeric variable required for FOR statement.")),
        };
        let t = self.next_token();
        if !t.is_operator(Operator::Equal) {
            return Err(self.unexpected(&t, "Missing = in FOR statement"));
        }
        let start = self.for_value()?;
        let t = self.next_token();
        if !t.is_keyword(Keyword::To) {
            return Err(self.unexpected(&t, "Missing TO in FOR statement."));
        }
        let end = self.for_value()?;
        let step = if self.next_token().is_keyword(Keyword::Step) {
            Some(self.for_value()?)
        } else {
            self.unget();
            None
        };
        Ok(StatementKind::For(var, start, end, step))
    }

    fn for_value(&mut self) -> Result<Expression> {
        let e = self.expression()?;
        if e.is_string() || e.is_boolean() {
            return Err(self.error("FOR needs numeric bounds."));
        }
        Ok(e)
    }

    fn r#next(&mut self) -> Result<StatementKind> {
        match self.next_token() {
            Token::Ident(ident) if !ident.is_string() => Ok(StatementKind::Next(Some(ident))),
            t if t.is_end() => {
                self.unget();
                Ok(StatementKind::Next(None))
            }
            t => Err(self.unexpected(&t, "Numeric variable expected for NEXT.")),
        }
    }

    fn r#loop(&mut self) -> Result<StatementKind> {
        let t = self.next_token();
        let guard = if t.is_keyword(Keyword::While) {
            Some(Guard::While(self.condition("LOOP WHILE")?))
        } else if t.is_keyword(Keyword::Until) {
            Some(Guard::Until(self.condition("LOOP UNTIL")?))
        } else {
            self.unget();
            None
        };
        Ok(StatementKind::Loop(guard))
    }

    fn condition(&mut self, what: &str) -> Result<Expression> {
        let e = self.expression()?;
        if e.is_string() {
            return Err(self.error(&format!("{} needs a numeric or boolean condition.", what)));
        }
        Ok(e)
    }

    fn r#input(&mut self) -> Result<StatementKind> {
        let prompt = match self.next_token() {
            Token::Str(s) => {
                let t = self.next_token();
                if !t.is_symbol(';') && !t.is_symbol(',') {
                    return Err(self.unexpected(&t, "Missing ; or , after INPUT prompt."));
                }
                Some(s)
            }
            _ => {
                self.unget();
                None
            }
        };
        Ok(StatementKind::Input(prompt, self.variables("INPUT")?))
    }

    fn r#data(&mut self) -> Result<StatementKind> {
        let mut items = vec![];
        loop {
            let t = self.next_token();
            let item = match t {
                Token::Constant(n) => Literal::Number(n),
                Token::Str(s) => Literal::String(s),
                Token::Operator(Operator::Subtract) => match self.next_token() {
                    Token::Constant(n) => Literal::Number(-n),
                    t => return Err(self.unexpected(&t, "Illegal constant in DATA statement.")),
                },
                _ => return Err(self.unexpected(&t, "Illegal constant in DATA statement.")),
            };
            items.push(item);
            if !self.next_token().is_symbol(',') {
                self.unget();
                return Ok(StatementKind::Data(items));
            }
        }
    }

    fn r#dim(&mut self) -> Result<StatementKind> {
        let mut arrays = vec![];
        loop {
            match self.next_token() {
                Token::Array(ident, bounds) => arrays.push((ident, bounds)),
                Token::Ident(_) => return Err(self.error("Non-array declaration.")),
                t if t.is_end() && arrays.is_empty() => {
                    return Err(self.error("No arrays declared!"))
                }
                t => return Err(self.unexpected(&t, "Array declaration expected.")),
            }
            if !self.next_token().is_symbol(',') {
                self.unget();
                return Ok(StatementKind::Dim(arrays));
            }
        }
    }

    fn r#on(&mut self) -> Result<StatementKind> {
        let selector = self.expression()?;
        if selector.is_string() || selector.is_boolean() {
            return Err(self.error("ON needs a numeric selector."));
        }
        let gosub = match self.next_token() {
            Token::Keyword(Keyword::Gosub) => true,
            Token::Keyword(Keyword::Goto) => false,
            t => return Err(self.unexpected(&t, "ON requires GOTO or GOSUB.")),
        };
        let mut targets = vec![];
        loop {
            match self.next_token() {
                Token::Constant(n) => targets.push(self.line_number(n)?),
                t => return Err(self.unexpected(&t, "Line number expected.")),
            }
            if !self.next_token().is_symbol(',') {
                self.unget();
                return Ok(StatementKind::On(selector, gosub, targets));
            }
        }
    }

    fn r#randomize(&mut self) -> Result<StatementKind> {
        if self.next_token().is_end() {
            self.unget();
            return Ok(StatementKind::Randomize(None));
        }
        self.unget();
        let e = self.expression()?;
        if e.is_string() {
            return Err(self.error("RANDOMIZE needs a numeric seed."));
        }
        Ok(StatementKind::Randomize(Some(e)))
    }

    fn r#name(&mut self) -> Result<StatementKind> {
        let e = self.expression()?;
        if !e.is_string() {
            return Err(self.error("NAME requires a string expression."));
        }
        Ok(StatementKind::Name(e))
    }

    fn r#invoke(&mut self, kw: Keyword) -> Result<StatementKind> {
        let mut args = vec![];
        if self.next_token().is_end() {
            self.unget();
            return Ok(StatementKind::Invoke(kw, args));
        }
        self.unget();
        loop {
            args.push(self.expression()?);
            if !self.next_token().is_symbol(',') {
                self.unget();
                return Ok(StatementKind::Invoke(kw, args));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Ident;

    fn parse(s: &str) -> Result<Statement> {
        parse_statement(&mut Lexer::new(s))
    }

    fn message(s: &str) -> String {
        parse(s).unwrap_err().message_text().to_string()
    }

    #[test]
    fn test_implicit_let() {
        let s = parse("a = 5").unwrap();
        assert_eq!(
            s.kind,
            StatementKind::Let(
                Variable::Unary(Ident::new("a")),
                Expression::Number(5.0)
            )
        );
        assert_eq!(s.text, "a = 5");
    }

    #[test]
    fn test_chain() {
        let s = parse("PRINT 1: PRINT 2 :REM x").unwrap();
        assert_eq!(s.text, "PRINT 1");
        let n = s.next.as_ref().unwrap();
        assert_eq!(n.text, "PRINT 2");
        assert_eq!(n.next.as_ref().unwrap().kind, StatementKind::Rem);
    }

    #[test]
    fn test_shorthands() {
        assert!(matches!(parse("?1").unwrap().kind, StatementKind::Print(_)));
        assert_eq!(parse("' anything: at all").unwrap().kind, StatementKind::Rem);
    }

    #[test]
    fn test_extra_input() {
        assert_eq!(message("PRINT 1 )"), "extra input beyond statement end");
        assert_eq!(message("PRINT 1 2"), "extra input beyond statement end");
        assert_eq!(message("END : PRINT"), "extra input beyond statement end");
    }

    #[test]
    fn test_let_errors() {
        assert_eq!(message("LET 5 = 1"), "variable expected for LET statement.");
        assert_eq!(message("a 1"), "missing = in assignment statement.");
        assert_eq!(message("a$ = 1"), "String assignment needs string expression.");
        assert_eq!(message("a = b = 1"), "Boolean expression not allowed in LET.");
    }

    #[test]
    fn test_if_forms() {
        let s = parse("IF a THEN 100").unwrap();
        assert!(matches!(s.kind, StatementKind::If(_, Then::Line(100))));
        let mut s = parse("IF a THEN PRINT 1: PRINT 2").unwrap();
        s.locate(Some(10), 0);
        match &s.kind {
            StatementKind::If(_, Then::Chain(then)) => {
                assert_eq!(then.index, 1);
                assert_eq!(then.next.as_ref().unwrap().index, 2);
            }
            _ => panic!(),
        }
        assert!(s.next.is_none());
        assert_eq!(s.find(2).unwrap().text, "PRINT 2");
        assert_eq!(message("IF a PRINT"), "Missing THEN keyword in IF statement.");
    }

    #[test]
    fn test_for_errors() {
        assert_eq!(message("FOR a$ = 1 TO 2"), "Numeric variable required for FOR statement.");
        assert_eq!(message("FOR i 1 TO 2"), "Missing = in FOR statement");
        assert_eq!(message("FOR i = 1, 2"), "Missing TO in FOR statement.");
        let s = parse("FOR i = 1 TO 10 STEP 2").unwrap();
        assert!(matches!(s.kind, StatementKind::For(_, _, _, Some(_))));
    }

    #[test]
    fn test_data() {
        let s = parse("DATA 1, \"two\", -3").unwrap();
        assert_eq!(
            s.kind,
            StatementKind::Data(vec![
                Literal::Number(1.0),
                Literal::String("two".into()),
                Literal::Number(-3.0)
            ])
        );
    }

    #[test]
    fn test_dim_errors() {
        assert_eq!(message("DIM"), "No arrays declared!");
        assert_eq!(message("DIM a"), "Non-array declaration.");
    }

    #[test]
    fn test_on() {
        let s = parse("ON x GOSUB 10, 20, 30").unwrap();
        assert!(matches!(s.kind, StatementKind::On(_, true, ref v) if v == &[10, 20, 30]));
    }

    #[test]
    fn test_command_is_not_statement() {
        assert_eq!(message("RUN"), "RUN is a command, not a statement.");
    }
}
