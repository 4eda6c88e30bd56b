//! # Line BASIC
//!
//! An interactive, line numbered BASIC. Lines typed with a number are
//! stored as the program; anything else runs immediately.
//!
//! ```
//! use basic::mach::{BufferConsole, Interpreter};
//!
//! let mut interpreter = Interpreter::default();
//! let mut console = BufferConsole::new();
//! interpreter.enter("10 FOR I=1 TO 3: PRINT I;: NEXT I: PRINT", &mut console);
//! interpreter.enter("RUN", &mut console);
//! assert_eq!(console.take_output(), "Ready.\n123\nReady.\n");
//! ```
//!
//! The [`lang`] module turns text into statement trees and the [`mach`]
//! module runs them.

pub mod lang;
pub mod mach;
