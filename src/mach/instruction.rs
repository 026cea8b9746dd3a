use super::datum::format_real;

/// ## PAL machine instruction set
///
/// The PAL machine has no registers. Every operation works on the
/// data stack, addressed either absolutely or by a static level
/// difference and an offset into that level's activation record.
///
/// For example: `x := x + 1` at level 0, offset 0 assembles to
/// `[LDV 0 0, LCI 0 1, OPR 0 3, STO 0 0]`

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    /// Call: `first` argument slots sit above the stack mark.
    Cal,
    /// Advance the stack top, filling with undefined values.
    Inc,
    /// Pop a boolean, branch when false.
    Jif,
    /// Unconditional branch. Target 0 halts the machine.
    Jmp,
    Lci,
    Lcr,
    Lcs,
    /// Push the absolute address of (level, offset).
    Lda,
    /// Pop an address, push a copy of the value stored there.
    Ldi,
    Ldu,
    /// Push a copy of the value at (level, offset).
    Ldv,
    /// Mark the stack ahead of a call.
    Mst,
    /// One of the 32 built-in operations.
    Opr,
    Rdi,
    Rdr,
    /// Register an exception handler in the current frame.
    Reh,
    /// Raise an exception. Code 0 re-raises the current one.
    Sig,
    /// Pop address then value, store the value at the address.
    Sti,
    /// Pop a value, store it at (level, offset).
    Sto,
}

impl Mnemonic {
    pub fn from_str(s: &str) -> Option<Mnemonic> {
        use Mnemonic::*;
        Some(match s {
            "CAL" => Cal,
            "INC" => Inc,
            "JIF" => Jif,
            "JMP" => Jmp,
            "LCI" => Lci,
            "LCR" => Lcr,
            "LCS" => Lcs,
            "LDA" => Lda,
            "LDI" => Ldi,
            "LDU" => Ldu,
            "LDV" => Ldv,
            "MST" => Mst,
            "OPR" => Opr,
            "RDI" => Rdi,
            "RDR" => Rdr,
            "REH" => Reh,
            "SIG" => Sig,
            "STI" => Sti,
            "STO" => Sto,
            _ => return None,
        })
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Mnemonic::*;
        let s = match self {
            Cal => "CAL",
            Inc => "INC",
            Jif => "JIF",
            Jmp => "JMP",
            Lci => "LCI",
            Lcr => "LCR",
            Lcs => "LCS",
            Lda => "LDA",
            Ldi => "LDI",
            Ldu => "LDU",
            Ldv => "LDV",
            Mst => "MST",
            Opr => "OPR",
            Rdi => "RDI",
            Rdr => "RDR",
            Reh => "REH",
            Sig => "SIG",
            Sti => "STI",
            Sto => "STO",
        };
        write!(f, "{}", s)
    }
}

/// The second operand as written in the listing. String operands
/// keep their single-quote delimiters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i32),
    Real(f32),
    String(String),
}

impl Operand {
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Operand::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Operand::Integer(n) => write!(f, "{}", n),
            Operand::Real(n) => write!(f, "{}", format_real(*n)),
            Operand::String(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub first: i32,
    pub second: Operand,
    pub line: u32,
}

impl Instruction {
    pub fn new(mnemonic: Mnemonic, first: i32, second: Operand, line: u32) -> Instruction {
        Instruction {
            mnemonic,
            first,
            second,
            line,
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} {}", self.mnemonic, self.first, self.second)
    }
}
