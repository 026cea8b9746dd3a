//! # PAL
//!
//! The PAL abstract machine: a stack machine with nested activation
//! records, static and dynamic scoping, and program level exceptions.
//!
//! Programs are listings of three-field instructions, one per line.
//! ```text
//! LCI 0 5
//! LCI 0 3
//! OPR 0 3
//! OPR 0 20
//! JMP 0 0
//! ```
//! Run a listing with `pal FILE`. Without a file name the machine
//! loads `CODE` from the current directory.
//!
//! The machine can also be embedded:
//! ```
//! use pal::lang::Listing;
//! use pal::mach::{BufferHost, Config, Event, Runtime};
//!
//! let code = Listing::default()
//!     .load_str("LCS 0 'hi'\nOPR 0 20\nJMP 0 0")
//!     .unwrap();
//! let mut runtime = Runtime::new(code, &Config::default(), BufferHost::with_input("")).unwrap();
//! assert_eq!(runtime.run(), Event::Stopped);
//! assert_eq!(runtime.host().output(), "hi");
//! ```

pub mod lang;
pub mod mach;
