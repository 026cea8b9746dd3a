/*!
## Rust Machine Module

This Rust module is the PAL abstract machine: tagged values,
a data stack of activation records, and the instruction interpreter.

*/

pub type Address = usize;

mod config;
mod datum;
mod host;
mod instruction;
mod operation;
mod runtime;
mod stack;

pub use config::Config;
pub use datum::Datum;
pub use host::{BufferHost, Host, IoHost, StdHost};
pub use instruction::{Instruction, Mnemonic, Operand};
pub use operation::Operation;
pub use runtime::Event;
pub use runtime::Runtime;
pub use stack::Stack;
