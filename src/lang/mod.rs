/*!
# Language Module

This Rust module loads PAL source listings into instructions
and defines the error type shared with the machine.

*/

pub type LineNumber = Option<u32>;

#[macro_use]
mod error;
mod listing;

pub use error::Error;
pub use error::ErrorCode;
pub use listing::{Listing, DEFAULT_CODE_SIZE};
