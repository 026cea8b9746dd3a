use super::stack::{DYNAMIC_LINK, HANDLER_ADDRESS, MARK_SIZE, RETURN_ADDRESS, STATIC_LINK};
use super::{Address, Config, Datum, Host, Instruction, Mnemonic, Operand, Operation, Stack};
use crate::error;
use crate::lang::Error;
use ansi_term::Style;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Exception codes the machine raises itself.
pub const RERAISE: i32 = 0;
pub const PROGRAM_ABORT: i32 = 1;
pub const TYPE_MISMATCH: i32 = 3;
pub const REACHED_EOF: i32 = 4;

/// ## PAL instruction interpreter
///
/// Executes a loaded program against its own data stack and host.
/// Nothing is shared between runtimes, so any number can coexist.

pub struct Runtime<H: Host> {
    code: Rc<[Instruction]>,
    stack: Stack,
    pc: Address,
    current: Option<Address>,
    exception: i32,
    interrupted: bool,
    finished: Option<Event>,
    source_id: String,
    host: H,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The cycle budget ran out with the program still going.
    Running,
    /// `JMP 0 0` was executed.
    Stopped,
    Errors(Error),
}

impl Event {
    pub fn exit_code(&self) -> i32 {
        match self {
            Event::Stopped => 0,
            _ => 1,
        }
    }
}

impl<H: Host> Runtime<H> {
    pub fn new(code: Vec<Instruction>, config: &Config, host: H) -> Result<Runtime<H>> {
        Ok(Runtime {
            code: Rc::from(code),
            stack: Stack::new(config.stack_size)?,
            pc: 0,
            current: None,
            exception: 0,
            interrupted: false,
            finished: None,
            source_id: config.source_id.clone(),
            host,
        })
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn exception(&self) -> i32 {
        self.exception
    }

    /// Stops the program at the start of the next `execute`.
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    /// Runs until the program stops or faults.
    pub fn run(&mut self) -> Event {
        loop {
            match self.execute(5000) {
                Event::Running => continue,
                event => return event,
            }
        }
    }

    /// Runs at most `cycles` instructions.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(event) = &self.finished {
            return event.clone();
        }
        if self.interrupted {
            self.interrupted = false;
            let line = self.current.map(|addr| self.code[addr].line);
            return self.finish(Event::Errors(error!(Interrupted, line; "Interrupted.")));
        }
        let code = Rc::clone(&self.code);
        for _ in 0..cycles {
            let instruction = match code.get(self.pc) {
                Some(instruction) => instruction,
                None => {
                    return self.finish(Event::Errors(error!(NoTermination;
                        "Program failed to execute a termination instruction (JMP 0 0).")))
                }
            };
            self.current = Some(self.pc);
            self.pc += 1;
            log::trace!("{:>4}: {}", self.pc, instruction);
            match self.step(instruction) {
                Ok(false) => {}
                Ok(true) => {
                    log::info!("program terminated normally");
                    return self.finish(Event::Stopped);
                }
                Err(error) => {
                    let error = error.in_line_number(Some(instruction.line));
                    log::info!("program faulted: {}", error);
                    return self.finish(Event::Errors(error));
                }
            }
        }
        Event::Running
    }

    fn finish(&mut self, event: Event) -> Event {
        let event = match (self.host.flush(), event) {
            (Err(error), Event::Stopped) => Event::Errors(error.into()),
            (_, event) => event,
        };
        self.finished = Some(event.clone());
        event
    }

    /// The text written to standard error for a fault. Faults raised
    /// while running include the offending instruction and a stack dump.
    pub fn report(&self, error: &Error, bold: bool) -> String {
        let line = match error.line_number() {
            Some(line) => line,
            None => return format!("{}\n", error.description()),
        };
        let header = if bold {
            Style::new().bold().paint("Runtime Error:").to_string()
        } else {
            "Runtime Error:".to_string()
        };
        let instruction = match self.current {
            Some(addr) => self.code[addr].to_string(),
            None => String::new(),
        };
        format!(
            "\n{}\n{}:{}:{}\n{}\n\nStack dump:\n----------\n{}",
            header,
            self.source_id,
            line,
            error.description(),
            instruction,
            self.stack
        )
    }

    /// Returns `Ok(true)` when the program has terminated.
    fn step(&mut self, instruction: &Instruction) -> Result<bool> {
        use Mnemonic::*;
        let first = instruction.first;
        let second = &instruction.second;
        match instruction.mnemonic {
            Cal => {
                let target = self.target(integer_operand(second, "CAL")?, "CAL")?;
                if first < 0 {
                    return Err(error!(AddressOutOfBounds; "CAL - negative argument count."));
                }
                let top = self.stack.top() as i64;
                let return_slot = top - first as i64 - 2;
                *self.stack.get_mut(return_slot)? = Datum::Integer(self.pc as i32);
                self.stack.set_base((top - first as i64) as Address);
                log::debug!("call {} with base {}", target + 1, self.stack.base());
                self.pc = target;
            }
            Inc => {
                let amount = integer_operand(second, "INC")?;
                if let Ok(amount) = usize::try_from(amount) {
                    self.stack.inc_top(amount)?;
                }
            }
            Jif => {
                let target = integer_operand(second, "JIF")?;
                let tos = self.stack.pop()?;
                let condition = match tos.as_boolean() {
                    Some(condition) => condition,
                    None => {
                        return self.restore(
                            vec![tos],
                            error!(TypeMismatch; "JIF - top of stack not a boolean."),
                        )
                    }
                };
                if !condition {
                    match self.target(target, "JIF") {
                        Ok(target) => self.pc = target,
                        Err(error) => return self.restore(vec![tos], error),
                    }
                }
            }
            Jmp => {
                let target = integer_operand(second, "JMP")?;
                if target == 0 {
                    return Ok(true);
                }
                self.pc = self.target(target, "JMP")?;
            }
            Lci => {
                let n = integer_operand(second, "LCI")?;
                self.stack.push(Datum::Integer(n))?;
            }
            Lcr => match second {
                Operand::Integer(n) => self.stack.push(Datum::Real(*n as f32))?,
                Operand::Real(n) => self.stack.push(Datum::Real(*n))?,
                _ => return Err(error!(TypeMismatch; "Argument to LCR must be a real.")),
            },
            Lcs => match second {
                Operand::String(s) => {
                    if s.len() < 2 || !s.starts_with('\'') || !s.ends_with('\'') {
                        return Err(error!(IllegalOperation;
                            "String must be delimited by single-quotes."));
                    }
                    self.stack.push(Datum::String(s[1..s.len() - 1].to_string()))?;
                }
                _ => return Err(error!(TypeMismatch; "Argument to LCS must be a string.")),
            },
            Lda => {
                let offset = integer_operand(second, "LDA")?;
                let address = self.stack.address(first, offset)?;
                self.stack.push(Datum::Integer(address as i32))?;
            }
            Ldi => {
                let tos = self.stack.pop()?;
                let address = match tos.as_integer() {
                    Some(address) => address,
                    None => {
                        return self.restore(
                            vec![tos],
                            error!(TypeMismatch; "LDI - top of stack must be an integer."),
                        )
                    }
                };
                let value = match self.stack.get(address as i64) {
                    Ok(value) => value.clone(),
                    Err(error) => return self.restore(vec![tos], error),
                };
                self.stack.push(value)?;
            }
            Ldu => self.stack.push(Datum::Undefined)?,
            Ldv => {
                let offset = integer_operand(second, "LDV")?;
                let value = self.stack.get_at(first, offset)?.clone();
                self.stack.push(value)?;
            }
            Mst => {
                let static_link = self.stack.address(first, 0)?;
                let dynamic_link = self.stack.base();
                self.stack
                    .mark_stack(static_link as i32, dynamic_link as i32)?;
            }
            Opr => {
                let opr = integer_operand(second, "OPR")?;
                self.operate(opr)?;
            }
            Rdi => {
                let offset = integer_operand(second, "RDI")?;
                if let Some(line) = self.read_line()? {
                    match line.parse::<i32>() {
                        Ok(n) => *self.stack.get_at_mut(first, offset)? = Datum::Integer(n),
                        Err(_) => self.signal(TYPE_MISMATCH)?,
                    }
                }
            }
            Rdr => {
                let offset = integer_operand(second, "RDR")?;
                if let Some(line) = self.read_line()? {
                    match line.trim().parse::<f32>() {
                        Ok(n) => *self.stack.get_at_mut(first, offset)? = Datum::Real(n),
                        Err(_) => self.signal(TYPE_MISMATCH)?,
                    }
                }
            }
            Reh => {
                let handler = integer_operand(second, "REH")?;
                log::debug!("handler {} registered at base {}", handler, self.stack.base());
                self.stack.set_mark(HANDLER_ADDRESS, handler)?;
            }
            Sig => {
                let code = integer_operand(second, "SIG")?;
                if code == RERAISE {
                    // The handler that re-raises must not catch its own exception.
                    self.stack.set_mark(HANDLER_ADDRESS, 0)?;
                } else {
                    self.exception = code;
                }
                self.raise()?;
            }
            Sti => {
                let tos = self.stack.pop()?;
                let address = match tos.as_integer() {
                    Some(address) => address,
                    None => {
                        return self.restore(
                            vec![tos],
                            error!(TypeMismatch; "STI - top of stack must be an integer."),
                        )
                    }
                };
                let value = match self.stack.pop() {
                    Ok(value) => value,
                    Err(error) => return self.restore(vec![tos], error),
                };
                match self.stack.get_mut(address as i64) {
                    Ok(slot) => *slot = value,
                    Err(error) => return self.restore(vec![value, tos], error),
                }
            }
            Sto => {
                let offset = integer_operand(second, "STO")?;
                let value = self.stack.pop()?;
                match self.stack.get_at_mut(first, offset) {
                    Ok(slot) => *slot = value,
                    Err(error) => return self.restore(vec![value], error),
                }
            }
        }
        Ok(false)
    }

    fn operate(&mut self, opr: i32) -> Result<()> {
        match opr {
            0 => {
                self.pc = self.pop_frame()?;
            }
            1 => {
                let result = self.stack.pop()?;
                match self.pop_frame() {
                    Ok(pc) => self.pc = pc,
                    Err(error) => {
                        self.stack.restore(result);
                        return Err(error);
                    }
                }
                self.stack.push(result)?;
            }
            2 => {
                let tos = self.stack.peek()?;
                let negated = Operation::negate(tos)?;
                *self.stack.peek_mut()? = negated;
            }
            3 => self.binary(Operation::sum)?,
            4 => self.binary(Operation::subtract)?,
            5 => self.binary(Operation::multiply)?,
            6 => self.binary(Operation::divide)?,
            7 => self.binary(Operation::power)?,
            8 => self.binary(Operation::concatenate)?,
            9 => self.unary(Operation::is_odd)?,
            10 => self.binary(Operation::equal)?,
            11 => self.binary(Operation::not_equal)?,
            12 => self.binary(Operation::less)?,
            13 => self.binary(Operation::greater_equal)?,
            14 => self.binary(Operation::greater)?,
            15 => self.binary(Operation::less_equal)?,
            16 => self.unary(Operation::not)?,
            17 => self.stack.push(Datum::Boolean(true))?,
            18 => self.stack.push(Datum::Boolean(false))?,
            19 => {
                let eof = self.host.at_eof()?;
                self.stack.push(Datum::Boolean(eof))?;
            }
            20 => {
                match self.stack.peek()? {
                    Datum::Boolean(_) | Datum::Undefined => {
                        return Err(error!(TypeMismatch;
                            "OPR 20 can only print values of type integer, real or string."))
                    }
                    _ => {}
                }
                let tos = self.stack.pop()?;
                self.host.print(&tos.to_string())?;
            }
            21 => self.host.print("\n")?,
            22 => {
                let (ntos, tos) = self.stack.pop_2()?;
                self.stack.push(tos)?;
                self.stack.push(ntos)?;
            }
            23 => {
                let copy = self.stack.peek()?.clone();
                self.stack.push(copy)?;
            }
            24 => {
                self.stack.pop()?;
            }
            25 => self.unary(Operation::to_real)?,
            26 => self.unary(Operation::to_integer)?,
            27 => self.unary(Operation::integer_to_string)?,
            28 => self.unary(Operation::real_to_string)?,
            29 => self.binary(Operation::and)?,
            30 => self.binary(Operation::or)?,
            31 => {
                let tos = self.stack.pop()?;
                let code = match tos.as_integer() {
                    Some(code) => code,
                    None => {
                        self.stack.restore(tos);
                        return Err(error!(TypeMismatch;
                            "OPR 31 expects an integer value on top of the stack."));
                    }
                };
                self.stack.push(Datum::Boolean(code == self.exception))?;
            }
            _ => return Err(error!(IllegalOperation; "Argument to OPR must be in range 0-31.")),
        }
        Ok(())
    }

    fn unary(&mut self, op: fn(&Datum) -> Result<Datum>) -> Result<()> {
        let tos = self.stack.pop()?;
        match op(&tos) {
            Ok(result) => self.stack.push(result),
            Err(error) => {
                self.stack.restore(tos);
                Err(error)
            }
        }
    }

    fn binary(&mut self, op: fn(&Datum, &Datum) -> Result<Datum>) -> Result<()> {
        let (ntos, tos) = self.stack.pop_2()?;
        match op(&ntos, &tos) {
            Ok(result) => self.stack.push(result),
            Err(error) => {
                self.stack.restore(ntos);
                self.stack.restore(tos);
                Err(error)
            }
        }
    }

    /// Puts popped operands back, lowest first, so the stack dump shows
    /// what the failing instruction saw.
    fn restore(&mut self, operands: Vec<Datum>, error: Error) -> Result<bool> {
        for datum in operands {
            self.stack.restore(datum);
        }
        Err(error)
    }

    fn target(&self, target: i32, mnemonic: &str) -> Result<Address> {
        if target < 1 || target as usize > self.code.len() {
            Err(error!(JumpOutOfRange;
                format!("{} - attempt to jump outside code.", mnemonic)))
        } else {
            Ok(target as Address - 1)
        }
    }

    /// Discards the current activation record, mark included, and makes
    /// the caller's frame current. Returns the saved return address.
    fn pop_frame(&mut self) -> Result<Address> {
        let mark = self.stack.address(0, STATIC_LINK)?;
        if mark <= 0 {
            return Err(error!(StackUnderflow; "Cannot return from the main program."));
        }
        let return_address = self.stack.mark(RETURN_ADDRESS)?;
        let dynamic_link = self.stack.mark(DYNAMIC_LINK)?;
        if return_address < 0 || return_address as usize > self.code.len() {
            return Err(error!(JumpOutOfRange; "Return address outside code."));
        }
        if dynamic_link < MARK_SIZE || dynamic_link as i64 > mark {
            return Err(error!(AddressOutOfBounds; "Dynamic link out of bounds."));
        }
        self.stack.truncate(mark as Address)?;
        self.stack.set_base(dynamic_link as Address);
        log::debug!("frame popped, base now {}", dynamic_link);
        Ok(return_address as Address)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        match self.host.read_line()? {
            Some(line) => Ok(Some(line)),
            None => {
                self.signal(REACHED_EOF)?;
                Ok(None)
            }
        }
    }

    fn signal(&mut self, code: i32) -> Result<()> {
        self.exception = code;
        self.raise()
    }

    /// Searches the call chain, innermost frame first, for a registered
    /// handler. Frames without one are discarded. The outermost frame's
    /// mark sits at address 0, and no other mark can start there.
    fn raise(&mut self) -> Result<()> {
        log::debug!("exception {} raised", self.exception);
        if self.exception == PROGRAM_ABORT {
            return Err(error!(ProgramAbort; "A Program Abort signal was raised."));
        }
        loop {
            let handler = self.stack.mark(HANDLER_ADDRESS)?;
            if handler < 0 || handler as usize > self.code.len() {
                return Err(error!(JumpOutOfRange;
                    "Exception handler address out of code range."));
            }
            if handler != 0 {
                log::debug!("exception {} handled at {}", self.exception, handler);
                self.pc = handler as Address - 1;
                return Ok(());
            }
            if self.stack.address(0, STATIC_LINK)? == 0 {
                return Err(error!(UnhandledException;
                    format!("Exception #{} never handled!", self.exception)));
            }
            self.pop_frame()?;
        }
    }
}

fn integer_operand(operand: &Operand, mnemonic: &str) -> Result<i32> {
    match operand.as_integer() {
        Some(n) => Ok(n),
        None => Err(error!(TypeMismatch;
            format!("Argument to {} must be an integer.", mnemonic))),
    }
}
