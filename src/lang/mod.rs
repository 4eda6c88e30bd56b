/*!
# Rust Language Module

This Rust module provides lexical analysis and parsing of the BASIC language.

*/

pub type LineNumber = Option<u16>;
pub type Column = std::ops::Range<usize>;

pub trait MaxValue<T> {
    fn max_value() -> T;
}

impl MaxValue<u16> for LineNumber {
    fn max_value() -> u16 {
        65529
    }
}

#[macro_use]
mod error;
mod ident;
mod keyword;
mod lex;
mod line;
mod parse;
mod statement;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use ident::Ident;
pub use keyword::{Category, Entry, Keyword};
pub use lex::Lexer;
pub use line::{line_number, Line};
pub use parse::parse_expression;
pub use statement::parse_statement;
pub use token::{Operator, Token};

pub mod ast;
