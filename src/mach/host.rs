use std::io::{self, BufRead, BufReader, Cursor, Stdin, Stdout, Write};

/// ## Host I/O for the machine
///
/// `RDI`/`RDR` read whole lines, `OPR 19` peeks for end of input
/// without consuming anything, and `OPR 20`/`OPR 21` print.

pub trait Host {
    /// `None` at end of input. The line terminator is removed.
    fn read_line(&mut self) -> io::Result<Option<String>>;
    fn at_eof(&mut self) -> io::Result<bool>;
    fn print(&mut self, s: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

pub struct IoHost<R, W> {
    reader: R,
    writer: W,
}

pub type StdHost = IoHost<BufReader<Stdin>, Stdout>;
pub type BufferHost = IoHost<Cursor<Vec<u8>>, Vec<u8>>;

impl<R: BufRead, W: Write> IoHost<R, W> {
    pub fn new(reader: R, writer: W) -> IoHost<R, W> {
        IoHost { reader, writer }
    }
}

impl StdHost {
    pub fn stdio() -> StdHost {
        IoHost::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl BufferHost {
    pub fn with_input(input: &str) -> BufferHost {
        IoHost::new(Cursor::new(input.as_bytes().to_vec()), vec![])
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.writer).into_owned()
    }
}

impl<R: BufRead, W: Write> Host for IoHost<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn at_eof(&mut self) -> io::Result<bool> {
        self.writer.flush()?;
        Ok(self.reader.fill_buf()?.is_empty())
    }

    fn print(&mut self, s: &str) -> io::Result<()> {
        self.writer.write_all(s.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_lines_and_eof() {
        let mut host = BufferHost::with_input("12\r\n3.5\nlast");
        assert_eq!(host.at_eof().unwrap(), false);
        assert_eq!(host.read_line().unwrap(), Some("12".to_string()));
        assert_eq!(host.read_line().unwrap(), Some("3.5".to_string()));
        assert_eq!(host.at_eof().unwrap(), false);
        assert_eq!(host.read_line().unwrap(), Some("last".to_string()));
        assert_eq!(host.at_eof().unwrap(), true);
        assert_eq!(host.read_line().unwrap(), None);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut host = BufferHost::with_input("7\n");
        assert!(!host.at_eof().unwrap());
        assert!(!host.at_eof().unwrap());
        assert_eq!(host.read_line().unwrap(), Some("7".to_string()));
    }

    #[test]
    fn test_print_captured() {
        let mut host = BufferHost::with_input("");
        host.print("8").unwrap();
        host.print("\n").unwrap();
        assert_eq!(host.output(), "8\n");
    }
}
