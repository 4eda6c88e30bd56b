use super::{Ident, Keyword, LineNumber};

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub line: LineNumber,
    /// Pre-order position within its line, including inline THEN branches.
    pub index: u16,
    /// Source text, used for LIST, traces, and runtime error reports.
    pub text: String,
    pub next: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Data(Vec<Literal>),
    Dim(Vec<(Ident, Vec<Expression>)>),
    Do,
    End,
    For(Ident, Expression, Expression, Option<Expression>),
    Gosub(Expression),
    Goto(Expression),
    If(Expression, Then),
    Input(Option<String>, Vec<Variable>),
    Invoke(Keyword, Vec<Expression>),
    Let(Variable, Expression),
    Loop(Option<Guard>),
    Name(Expression),
    Next(Option<Ident>),
    On(Expression, bool, Vec<u16>),
    Print(Vec<PrintItem>),
    Randomize(Option<Expression>),
    Read(Vec<Variable>),
    Rem,
    Restore,
    Return,
    Stop,
    Troff,
    Tron,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Then {
    Line(u16),
    Chain(Box<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    While(Expression),
    Until(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrintItem {
    Expression(Expression),
    Comma,
    Semicolon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    Unary(Ident),
    Array(Ident, Vec<Expression>),
}

impl Variable {
    pub fn ident(&self) -> &Ident {
        match self {
            Variable::Unary(i) | Variable::Array(i, _) => i,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    String(String),
    Var(Ident),
    Array(Ident, Vec<Expression>),
    Function(Keyword, Option<Box<Expression>>, Vec<Expression>),
    Negation(Box<Expression>),
    BitNot(Box<Expression>),
    Not(Box<Expression>),
    Power(Box<Expression>, Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Add(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    Concat(Box<Expression>, Box<Expression>),
    BitAnd(Box<Expression>, Box<Expression>),
    BitOr(Box<Expression>, Box<Expression>),
    BitXor(Box<Expression>, Box<Expression>),
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    Less(Box<Expression>, Box<Expression>),
    LessEqual(Box<Expression>, Box<Expression>),
    Greater(Box<Expression>, Box<Expression>),
    GreaterEqual(Box<Expression>, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Xor(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Whether this evaluates to a string. Decided entirely by the tree.
    pub fn is_string(&self) -> bool {
        use Expression::*;
        match self {
            String(_) | Concat(..) => true,
            Var(ident) | Array(ident, _) => ident.is_string(),
            Function(kw, ..) => matches!(
                kw,
                Keyword::NameS
                    | Keyword::LeftS
                    | Keyword::RightS
                    | Keyword::MidS
                    | Keyword::ChrS
                    | Keyword::StrS
                    | Keyword::SpcS
                    | Keyword::Tab
                    | Keyword::InkeyS
                    | Keyword::IpS
            ),
            _ => false,
        }
    }

    /// Relational and boolean connective nodes.
    pub fn is_boolean(&self) -> bool {
        use Expression::*;
        matches!(
            self,
            Equal(..)
                | NotEqual(..)
                | Less(..)
                | LessEqual(..)
                | Greater(..)
                | GreaterEqual(..)
                | And(..)
                | Or(..)
                | Xor(..)
                | Not(..)
        )
    }
}

impl Statement {
    pub fn new(kind: StatementKind, text: &str) -> Statement {
        Statement {
            kind,
            line: None,
            index: 0,
            text: text.trim().to_string(),
            next: None,
        }
    }

    /// Stamp the line number and pre-order indices on this chain.
    /// Returns the next free index.
    pub fn locate(&mut self, line: LineNumber, index: u16) -> u16 {
        self.line = line;
        self.index = index;
        let mut index = index + 1;
        if let StatementKind::If(_, Then::Chain(then)) = &mut self.kind {
            index = then.locate(line, index);
        }
        if let Some(next) = &mut self.next {
            index = next.locate(line, index);
        }
        index
    }

    /// Find the statement with the given index in this chain.
    pub fn find(&self, index: u16) -> Option<&Statement> {
        if self.index == index {
            return Some(self);
        }
        if let StatementKind::If(_, Then::Chain(then)) = &self.kind {
            if let Some(s) = then.find(index) {
                return Some(s);
            }
        }
        match &self.next {
            Some(next) => next.find(index),
            None => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self.kind, StatementKind::Data(_))
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

pub trait Visitor {
    fn visit_statement(&mut self, _: &Statement) {}
}

pub trait AcceptVisitor {
    fn accept<V: Visitor>(&self, visitor: &mut V);
}

impl AcceptVisitor for Statement {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit_statement(self);
        if let StatementKind::If(_, Then::Chain(then)) = &self.kind {
            then.accept(visitor);
        }
        if let Some(next) = &self.next {
            next.accept(visitor);
        }
    }
}
