use super::ast::Expression;
use super::{Ident, Keyword};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    Symbol(char),
    Constant(f64),
    Str(String),
    Ident(Ident),
    Array(Ident, Vec<Expression>),
    Operator(Operator),
    Eol,
    Error(String),
}

impl Token {
    pub fn is_symbol(&self, ch: char) -> bool {
        matches!(self, Token::Symbol(c) if *c == ch)
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == kw)
    }

    pub fn is_operator(&self, op: Operator) -> bool {
        matches!(self, Token::Operator(o) if *o == op)
    }

    /// True for tokens that end a statement.
    pub fn is_end(&self) -> bool {
        matches!(self, Token::Eol | Token::Symbol(':'))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Xor,
    Not,
}

impl Operator {
    pub fn from_word(s: &str) -> Option<Operator> {
        use Operator::*;
        if s.eq_ignore_ascii_case("and") {
            Some(And)
        } else if s.eq_ignore_ascii_case("or") {
            Some(Or)
        } else if s.eq_ignore_ascii_case("xor") {
            Some(Xor)
        } else if s.eq_ignore_ascii_case("not") {
            Some(Not)
        } else {
            None
        }
    }

    pub fn is_relational(self) -> bool {
        use Operator::*;
        matches!(
            self,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        let s = match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Power => "**",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            BitNot => "!",
            Equal => "=",
            NotEqual => "<>",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            And => "AND",
            Or => "OR",
            Xor => "XOR",
            Not => "NOT",
        };
        write!(f, "{}", s)
    }
}
