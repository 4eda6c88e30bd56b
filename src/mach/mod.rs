/*!
## Rust Machine Module

This Rust module runs BASIC. Programs are kept as parsed statement trees
and walked directly.

*/

mod console;
mod eval;
mod exec;
mod function;
mod interrupt;
mod listing;
mod program;
mod runtime;
mod stack;
mod val;
mod var;

pub use console::{unavailable, BufferConsole, Console};
pub use exec::split_input;
pub use function::Function;
pub use interrupt::Interrupt;
pub use listing::{Addr, Listing};
pub use program::{Config, Frame, Program, RunOutcome};
pub use runtime::Interpreter;
pub use stack::Stack;
pub use val::{format_number, Val};
pub use var::Var;
