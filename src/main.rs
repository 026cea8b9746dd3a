//! # PAL
//!
//! Command line front end for the PAL abstract machine.
//!

mod term;

fn main() {
    std::process::exit(term::main());
}
