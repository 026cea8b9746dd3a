use super::LineNumber;
use std::borrow::Cow;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    line_number: LineNumber,
    message: Cow<'static, str>,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            line_number: None,
            message: Cow::Borrowed(""),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    /// Errors raised before the program started running have no instruction to blame.
    pub fn is_runtime(&self) -> bool {
        self.line_number.is_some()
    }

    pub fn in_line_number(self, line: LineNumber) -> Error {
        debug_assert!(self.line_number.is_none());
        Error {
            line_number: line,
            ..self
        }
    }

    pub fn message<T: Into<Cow<'static, str>>>(self, message: T) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            message: message.into(),
            ..self
        }
    }

    /// The explicit message if one was attached, otherwise the code's title.
    pub fn description(&self) -> &str {
        if self.message.is_empty() {
            self.title()
        } else {
            &self.message
        }
    }

    fn title(&self) -> &'static str {
        match self.code {
            2 => "SYNTAX ERROR",
            3 => "TYPE MISMATCH",
            5 => "ILLEGAL OPERATION",
            7 => "OUT OF STACK SPACE",
            8 => "JUMP OUT OF RANGE",
            9 => "ADDRESS OUT OF BOUNDS",
            10 => "STACK UNDERFLOW",
            11 => "DIVISION BY ZERO",
            12 => "PROGRAM ABORT",
            13 => "EXCEPTION NEVER HANDLED",
            14 => "NO TERMINATION",
            15 => "INTERRUPTED",
            51 => "INTERNAL ERROR",
            53 => "FILE NOT FOUND",
            57 => "I/O ERROR",
            _ => "",
        }
    }
}

pub enum ErrorCode {
    SyntaxError = 2,
    TypeMismatch = 3,
    IllegalOperation = 5,
    OutOfStackSpace = 7,
    JumpOutOfRange = 8,
    AddressOutOfBounds = 9,
    StackUnderflow = 10,
    DivisionByZero = 11,
    ProgramAbort = 12,
    UnhandledException = 13,
    NoTermination = 14,
    Interrupted = 15,
    InternalError = 51,
    FileNotFound = 53,
    IoError = 57,
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        error!(IoError; error.to_string())
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = self.title();
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" {}", line_number));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            if suffix.is_empty() {
                write!(f, "MACHINE ERROR {}", self.code)
            } else {
                write!(f, "MACHINE ERROR {} IN{}", self.code, suffix)
            }
        } else if suffix.is_empty() {
            write!(f, "{}", code_str)
        } else {
            write!(f, "{} IN{}", code_str, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error;

    #[test]
    fn test_display_with_line_and_message() {
        let e = error!(TypeMismatch, Some(12); "Top of stack must be a boolean.");
        assert_eq!(
            e.to_string(),
            "TYPE MISMATCH IN 12; Top of stack must be a boolean."
        );
        assert_eq!(e.description(), "Top of stack must be a boolean.");
        assert!(e.is_runtime());
    }

    #[test]
    fn test_description_falls_back_to_title() {
        let e = error!(StackUnderflow);
        assert_eq!(e.description(), "STACK UNDERFLOW");
        assert_eq!(e.to_string(), "STACK UNDERFLOW");
        assert!(!e.is_runtime());
    }
}
