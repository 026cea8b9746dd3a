use crate::error;
use crate::lang::Error;
use crate::mach::{Instruction, Mnemonic, Operand};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

type Result<T> = std::result::Result<T, Error>;

pub const DEFAULT_CODE_SIZE: usize = 1000;

/// ## PAL source loader
///
/// One instruction per line: `MNEMONIC FIRST SECOND`.
/// Blank lines are skipped but still count toward line numbers.
/// Any malformed line aborts the whole load.

#[derive(Debug, Clone)]
pub struct Listing {
    max_lines: usize,
}

impl Default for Listing {
    fn default() -> Listing {
        Listing::new(DEFAULT_CODE_SIZE)
    }
}

impl Listing {
    /// A `max_lines` of 0 removes the code storage limit.
    pub fn new(max_lines: usize) -> Listing {
        Listing { max_lines }
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Instruction>> {
        let reader = match File::open(path.as_ref()) {
            Ok(file) => BufReader::new(file),
            Err(error) => {
                let msg = format!("{}: {}", path.as_ref().display(), error);
                match error.kind() {
                    ErrorKind::NotFound => return Err(error!(FileNotFound; msg)),
                    _ => return Err(error!(IoError; msg)),
                }
            }
        };
        let mut code = vec![];
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(instruction) = self.load_line(&line, index + 1)? {
                code.push(instruction);
            }
        }
        log::info!("loaded {} instructions", code.len());
        Ok(code)
    }

    pub fn load_str(&self, source: &str) -> Result<Vec<Instruction>> {
        let mut code = vec![];
        for (index, line) in source.lines().enumerate() {
            if let Some(instruction) = self.load_line(line, index + 1)? {
                code.push(instruction);
            }
        }
        log::info!("loaded {} instructions", code.len());
        Ok(code)
    }

    fn load_line(&self, line: &str, lineno: usize) -> Result<Option<Instruction>> {
        if self.max_lines != 0 && lineno > self.max_lines {
            return Err(error!(SyntaxError;
                format!("Exceeded code storage limit at line {}", lineno)));
        }
        let mut tokens = line.split_whitespace();
        let mnemonic = match tokens.next() {
            Some(token) => token,
            None => return Ok(None),
        };
        let (first, second) = match (tokens.next(), tokens.next()) {
            (Some(first), Some(second)) => (first, second),
            _ => {
                return Err(error!(SyntaxError;
                    format!("Not enough tokens on line {}", lineno)))
            }
        };
        let mnemonic = match Mnemonic::from_str(mnemonic) {
            Some(mnemonic) => mnemonic,
            None => {
                return Err(error!(SyntaxError;
                    format!("Unrecognised mnemonic {} on line {}", mnemonic, lineno)))
            }
        };
        let first = match first.parse::<i32>() {
            Ok(n) => n,
            Err(_) => {
                return Err(error!(SyntaxError;
                    format!("First operand non-integer on line {}", lineno)))
            }
        };
        let second = if second.starts_with('\'') {
            string_literal(line, lineno)?
        } else if let Ok(n) = second.parse::<i32>() {
            Operand::Integer(n)
        } else if let Ok(n) = second.parse::<f32>() {
            Operand::Real(n)
        } else {
            return Err(error!(SyntaxError;
                format!("Unrecognised second operand on line {}", lineno)));
        };
        Ok(Some(Instruction::new(mnemonic, first, second, lineno as u32)))
    }
}

/// String literals may contain whitespace, so they are cut from the raw
/// line rather than the token stream. Quotes are kept.
fn string_literal(line: &str, lineno: usize) -> Result<Operand> {
    let start = line.find('\'');
    let end = start.and_then(|start| line[start + 1..].find('\'').map(|end| start + 1 + end));
    match (start, end) {
        (Some(start), Some(end)) => Ok(Operand::String(line[start..=end].to_string())),
        _ => Err(error!(SyntaxError;
            format!("Unterminated string literal on line {}", lineno))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_basic_line() {
        let code = Listing::default().load_str("LCI 0 5\n\nOPR 0 20\n").unwrap();
        assert_eq!(code.len(), 2);
        assert_eq!(code[0], Instruction::new(Mnemonic::Lci, 0, Operand::Integer(5), 1));
        assert_eq!(code[1].line, 3);
        assert_eq!(code[1].to_string(), "OPR 0 20");
    }

    #[test]
    fn test_string_literal_keeps_spaces_and_quotes() {
        let code = Listing::default().load_str("LCS 0 'hello  world' ignored").unwrap();
        assert_eq!(code[0].second, Operand::String("'hello  world'".to_string()));
    }

    #[test]
    fn test_real_operand() {
        let code = Listing::default().load_str("LCR 0 2.5").unwrap();
        assert_eq!(code[0].second, Operand::Real(2.5));
    }

    #[test]
    fn test_not_enough_tokens() {
        let err = Listing::default().load_str("LCI 0 1\nLCI 5").unwrap_err();
        assert_eq!(err.description(), "Not enough tokens on line 2");
    }

    #[test]
    fn test_first_operand_non_integer() {
        let err = Listing::default().load_str("LCI x 1").unwrap_err();
        assert_eq!(err.description(), "First operand non-integer on line 1");
    }

    #[test]
    fn test_unrecognised_second_operand() {
        let err = Listing::default().load_str("LCS 0 hello").unwrap_err();
        assert_eq!(err.description(), "Unrecognised second operand on line 1");
    }

    #[test]
    fn test_unknown_mnemonic() {
        let err = Listing::default().load_str("XYZ 0 0").unwrap_err();
        assert_eq!(err.description(), "Unrecognised mnemonic XYZ on line 1");
    }

    #[test]
    fn test_unterminated_string() {
        let err = Listing::default().load_str("LCS 0 'oops").unwrap_err();
        assert_eq!(err.description(), "Unterminated string literal on line 1");
    }

    #[test]
    fn test_code_storage_limit() {
        let err = Listing::new(2).load_str("LDU 0 0\nLDU 0 0\nLDU 0 0").unwrap_err();
        assert_eq!(err.description(), "Exceeded code storage limit at line 3");
    }
}
