use crate::lang::DEFAULT_CODE_SIZE;

pub const DEFAULT_STACK_SIZE: usize = 500;
pub const DEFAULT_SOURCE_ID: &str = "CODE";

/// ## Machine limits and identity
///
/// A size of 0 means unbounded.

#[derive(Debug, Clone)]
pub struct Config {
    pub stack_size: usize,
    pub code_size: usize,
    /// Names the listing in runtime error reports.
    pub source_id: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            stack_size: DEFAULT_STACK_SIZE,
            code_size: DEFAULT_CODE_SIZE,
            source_id: DEFAULT_SOURCE_ID.to_string(),
        }
    }
}
