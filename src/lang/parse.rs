use super::{ast::*, token::*, Error, Keyword, Lexer};
use crate::error;

type Result<T> = std::result::Result<T, Error>;

/// Parse one expression from the lexer, leaving the lexer on the first
/// token that is not part of it.
pub fn parse_expression(lexer: &mut Lexer) -> Result<Expression> {
    Parser::new(lexer).expression()
}

pub(super) struct Parser<'a> {
    pub lexer: &'a mut Lexer,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: &'a mut Lexer) -> Parser<'a> {
        Parser { lexer }
    }

    pub fn next_token(&mut self) -> Token {
        self.lexer.next_token()
    }

    pub fn unget(&mut self) {
        self.lexer.unget_token()
    }

    pub fn error(&self, msg: &str) -> Error {
        error!(SyntaxError, ..&self.lexer.span(); msg)
    }

    /// Report a lexer error token, or `msg` for anything else.
    pub fn unexpected(&self, token: &Token, msg: &str) -> Error {
        match token {
            Token::Error(m) => self.error(m),
            _ => self.error(msg),
        }
    }

    pub fn expect_symbol(&mut self, ch: char, msg: &str) -> Result<()> {
        let t = self.next_token();
        if t.is_symbol(ch) {
            Ok(())
        } else {
            Err(self.unexpected(&t, msg))
        }
    }

    pub fn expression(&mut self) -> Result<Expression> {
        let mut lhs = self.relation()?;
        loop {
            let op = match self.next_token() {
                Token::Operator(op @ Operator::And)
                | Token::Operator(op @ Operator::Or)
                | Token::Operator(op @ Operator::Xor) => op,
                _ => {
                    self.unget();
                    return Ok(lhs);
                }
            };
            let rhs = self.relation()?;
            if lhs.is_string() || rhs.is_string() {
                return Err(self.error("Boolean operators need numeric operands."));
            }
            let (l, r) = (Box::new(lhs), Box::new(rhs));
            lhs = match op {
                Operator::And => Expression::And(l, r),
                Operator::Or => Expression::Or(l, r),
                _ => Expression::Xor(l, r),
            };
        }
    }

    fn relation(&mut self) -> Result<Expression> {
        let lhs = self.concat()?;
        let op = match self.next_token() {
            Token::Operator(op) if op.is_relational() => op,
            _ => {
                self.unget();
                return Ok(lhs);
            }
        };
        let rhs = self.concat()?;
        if lhs.is_string() != rhs.is_string() {
            return Err(self.error("Can't compare strings and numbers."));
        }
        let (l, r) = (Box::new(lhs), Box::new(rhs));
        Ok(match op {
            Operator::Equal => Expression::Equal(l, r),
            Operator::NotEqual => Expression::NotEqual(l, r),
            Operator::Less => Expression::Less(l, r),
            Operator::LessEqual => Expression::LessEqual(l, r),
            Operator::Greater => Expression::Greater(l, r),
            _ => Expression::GreaterEqual(l, r),
        })
    }

    fn concat(&mut self) -> Result<Expression> {
        let mut lhs = self.logic()?;
        if !lhs.is_string() {
            return Ok(lhs);
        }
        loop {
            match self.next_token() {
                Token::Operator(Operator::Add) => {
                    let rhs = self.logic()?;
                    if !rhs.is_string() {
                        return Err(self.error("Can't add a number to a string."));
                    }
                    lhs = Expression::Concat(Box::new(lhs), Box::new(rhs));
                }
                Token::Operator(op) if !op.is_relational() && !self.is_connective(op) => {
                    return Err(self.error("Only add is allowed in string expressions."));
                }
                _ => {
                    self.unget();
                    return Ok(lhs);
                }
            }
        }
    }

    fn is_connective(&self, op: Operator) -> bool {
        matches!(op, Operator::And | Operator::Or | Operator::Xor)
    }

    /// Operands of arithmetic must be numeric. A string on the left is
    /// left for the concatenation level to deal with.
    fn numeric(&self, e: &Expression) -> Result<()> {
        if e.is_string() {
            Err(self.error("Only add is allowed in string expressions."))
        } else {
            Ok(())
        }
    }

    fn logic(&mut self) -> Result<Expression> {
        let mut lhs = self.sum()?;
        loop {
            let op = match self.next_token() {
                Token::Operator(op @ Operator::BitAnd)
                | Token::Operator(op @ Operator::BitOr)
                | Token::Operator(op @ Operator::BitXor) => op,
                _ => {
                    self.unget();
                    return Ok(lhs);
                }
            };
            self.numeric(&lhs)?;
            let rhs = self.sum()?;
            self.numeric(&rhs)?;
            let (l, r) = (Box::new(lhs), Box::new(rhs));
            lhs = match op {
                Operator::BitAnd => Expression::BitAnd(l, r),
                Operator::BitOr => Expression::BitOr(l, r),
                _ => Expression::BitXor(l, r),
            };
        }
    }

    fn sum(&mut self) -> Result<Expression> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.next_token() {
                Token::Operator(op @ Operator::Add) | Token::Operator(op @ Operator::Subtract)
                    if !lhs.is_string() =>
                {
                    op
                }
                _ => {
                    self.unget();
                    return Ok(lhs);
                }
            };
            let rhs = self.term()?;
            self.numeric(&rhs)?;
            let (l, r) = (Box::new(lhs), Box::new(rhs));
            lhs = match op {
                Operator::Add => Expression::Add(l, r),
                _ => Expression::Subtract(l, r),
            };
        }
    }

    fn term(&mut self) -> Result<Expression> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.next_token() {
                Token::Operator(op @ Operator::Multiply)
                | Token::Operator(op @ Operator::Divide) => op,
                _ => {
                    self.unget();
                    return Ok(lhs);
                }
            };
            self.numeric(&lhs)?;
            let rhs = self.factor()?;
            self.numeric(&rhs)?;
            let (l, r) = (Box::new(lhs), Box::new(rhs));
            lhs = match op {
                Operator::Multiply => Expression::Multiply(l, r),
                _ => Expression::Divide(l, r),
            };
        }
    }

    fn factor(&mut self) -> Result<Expression> {
        let lhs = self.primary()?;
        if !self.next_token().is_operator(Operator::Power) {
            self.unget();
            return Ok(lhs);
        }
        self.numeric(&lhs)?;
        let rhs = self.factor()?;
        self.numeric(&rhs)?;
        Ok(Expression::Power(Box::new(lhs), Box::new(rhs)))
    }

    fn primary(&mut self) -> Result<Expression> {
        match self.next_token() {
            Token::Operator(Operator::Subtract) => {
                let e = self.primary()?;
                self.numeric(&e)?;
                Ok(Expression::Negation(Box::new(e)))
            }
            Token::Operator(Operator::BitNot) => {
                let e = self.primary()?;
                self.numeric(&e)?;
                Ok(Expression::BitNot(Box::new(e)))
            }
            Token::Operator(Operator::Not) => {
                let e = self.primary()?;
                self.numeric(&e)?;
                Ok(Expression::Not(Box::new(e)))
            }
            _ => {
                self.unget();
                self.element()
            }
        }
    }

    fn element(&mut self) -> Result<Expression> {
        let t = self.next_token();
        match t {
            Token::Symbol('(') => {
                let e = self.expression()?;
                self.expect_symbol(')', "Missing closing parenthesis.")?;
                Ok(e)
            }
            Token::Constant(n) => Ok(Expression::Number(n)),
            Token::Str(s) => Ok(Expression::String(s)),
            Token::Ident(ident) => Ok(Expression::Var(ident)),
            Token::Array(ident, indices) => Ok(Expression::Array(ident, indices)),
            Token::Keyword(kw) if kw.category() == super::Category::Function => self.function(kw),
            Token::Eol => Err(self.error("Expression expected.")),
            _ => Err(self.unexpected(&t, "Unexpected symbol in expression.")),
        }
    }

    fn value_arg(&mut self, kw: Keyword) -> Result<Expression> {
        let e = self.expression()?;
        if e.is_boolean() {
            return Err(self.error(&format!(
                "{} function cannot accept boolean expression.",
                kw
            )));
        }
        Ok(e)
    }

    fn numeric_arg(&mut self, kw: Keyword) -> Result<Expression> {
        let e = self.value_arg(kw)?;
        if e.is_string() {
            return Err(self.error(&format!("{} requires a numeric argument.", kw)));
        }
        Ok(e)
    }

    fn string_arg(&mut self, kw: Keyword) -> Result<Expression> {
        let e = self.value_arg(kw)?;
        if !e.is_string() {
            return Err(self.error(&format!("{} requires a string valued argument.", kw)));
        }
        Ok(e)
    }

    fn function(&mut self, kw: Keyword) -> Result<Expression> {
        use Keyword::*;
        if let InkeyS | Time | NameS = kw {
            return Ok(Expression::Function(kw, None, vec![]));
        }
        let t = self.next_token();
        if !t.is_symbol('(') {
            if let Tid | Rnd = kw {
                self.unget();
                return Ok(Expression::Function(kw, None, vec![Expression::Number(1.0)]));
            }
            return Err(self.unexpected(&t, "Missing argument for function."));
        }
        let result = match kw {
            Rnd | Int | Sin | Cos | Tan | Atn | Sqr | Abs | ChrS | StrS | SpcS | Tab | Log
            | Sgn | Tid => Expression::Function(kw, None, vec![self.numeric_arg(kw)?]),
            Val | Len | IpS => Expression::Function(kw, None, vec![self.string_arg(kw)?]),
            Max | Min => {
                let a = self.numeric_arg(kw)?;
                self.expect_symbol(',', &format!("{} function expects two arguments.", kw))?;
                let b = self.numeric_arg(kw)?;
                Expression::Function(kw, None, vec![a, b])
            }
            LeftS | RightS => {
                let subject = self.string_arg(kw)?;
                self.expect_symbol(',', &format!("{} function requires two arguments.", kw))?;
                let n = self.numeric_arg(kw)?;
                Expression::Function(kw, Some(Box::new(subject)), vec![n])
            }
            MidS => {
                let subject = self.string_arg(kw)?;
                self.expect_symbol(
                    ',',
                    &format!("{} function requires at least two arguments.", kw),
                )?;
                let start = self.numeric_arg(kw)?;
                let t = self.next_token();
                let len = if t.is_symbol(',') {
                    self.numeric_arg(kw)?
                } else if t.is_symbol(')') {
                    self.unget();
                    Expression::Number(1.0)
                } else {
                    return Err(self.unexpected(
                        &t,
                        &format!("{} unexpected symbol in expression.", kw),
                    ));
                };
                Expression::Function(kw, Some(Box::new(subject)), vec![start, len])
            }
            _ => return Err(self.error("Unknown function on input.")),
        };
        self.expect_symbol(')', "Missing closing parenthesis for function.")?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Expression> {
        parse_expression(&mut Lexer::new(s))
    }

    fn n(v: f64) -> Box<Expression> {
        Box::new(Expression::Number(v))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1+2*3").unwrap(),
            Expression::Add(n(1.0), Box::new(Expression::Multiply(n(2.0), n(3.0))))
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(
            parse("2**3**2").unwrap(),
            Expression::Power(n(2.0), Box::new(Expression::Power(n(3.0), n(2.0))))
        );
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(
            parse("8-2-1").unwrap(),
            Expression::Subtract(Box::new(Expression::Subtract(n(8.0), n(2.0))), n(1.0))
        );
    }

    #[test]
    fn test_boolean_tagging() {
        assert!(parse("a=1 AND b<2").unwrap().is_boolean());
        assert!(!parse("a+1").unwrap().is_boolean());
        assert!(parse("NOT a").unwrap().is_boolean());
    }

    #[test]
    fn test_string_typing() {
        assert!(parse("\"a\"+b$").unwrap().is_string());
        assert!(parse("mid$(a$,2)").unwrap().is_string());
        assert!(!parse("len(a$)").unwrap().is_string());
    }

    #[test]
    fn test_string_errors() {
        let e = parse("\"a\"-\"b\"").unwrap_err();
        assert_eq!(e.message_text(), "Only add is allowed in string expressions.");
        let e = parse("\"a\"=1").unwrap_err();
        assert_eq!(e.message_text(), "Can't compare strings and numbers.");
        let e = parse("val(1)").unwrap_err();
        assert_eq!(e.message_text(), "VAL requires a string valued argument.");
        let e = parse("sin(a<1)").unwrap_err();
        assert_eq!(e.message_text(), "SIN function cannot accept boolean expression.");
    }

    #[test]
    fn test_function_forms() {
        assert_eq!(
            parse("rnd").unwrap(),
            Expression::Function(Keyword::Rnd, None, vec![Expression::Number(1.0)])
        );
        assert_eq!(
            parse("time").unwrap(),
            Expression::Function(Keyword::Time, None, vec![])
        );
        let e = parse("max(1)").unwrap_err();
        assert_eq!(e.message_text(), "MAX function expects two arguments.");
    }

    #[test]
    fn test_unget_leaves_trailing_token() {
        let mut lx = Lexer::new("a + 1 THEN 20");
        parse_expression(&mut lx).unwrap();
        assert!(lx.next_token().is_keyword(Keyword::Then));
    }
}
