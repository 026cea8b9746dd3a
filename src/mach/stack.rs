use super::{Address, Datum};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Slots in a stack mark, directly below a frame's base.
pub const MARK_SIZE: i32 = 4;
pub const STATIC_LINK: i32 = -4;
pub const DYNAMIC_LINK: i32 = -3;
pub const RETURN_ADDRESS: i32 = -2;
pub const HANDLER_ADDRESS: i32 = -1;

/// ## Size limited data stack with activation records
///
/// Every frame begins with a four slot mark: static link, dynamic link,
/// return address and exception handler address. The outermost mark is
/// laid down at construction, so the outermost frame's base is 4.

pub struct Stack {
    vec: Vec<Datum>,
    frame_base: Address,
    max_size: usize,
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

/// Top to bottom, one slot per line.
impl std::fmt::Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for datum in self.vec.iter().rev() {
            writeln!(f, "{}", datum)?;
        }
        Ok(())
    }
}

impl Stack {
    /// A `max_size` of 0 leaves the stack unbounded.
    pub fn new(max_size: usize) -> Result<Stack> {
        let mut stack = Stack {
            vec: vec![],
            frame_base: 0,
            max_size,
        };
        stack.mark_stack(0, 0)?;
        stack.set_base(stack.top());
        Ok(stack)
    }

    fn overflow_error() -> Error {
        error!(OutOfStackSpace; "PAL Stack out of memory.")
    }

    fn underflow_error() -> Error {
        error!(StackUnderflow; "PAL Stack underflow.")
    }

    fn bounds_error() -> Error {
        error!(AddressOutOfBounds; "PAL address out of bounds.")
    }

    pub fn top(&self) -> Address {
        self.vec.len()
    }

    pub fn base(&self) -> Address {
        self.frame_base
    }

    pub fn set_base(&mut self, address: Address) {
        self.frame_base = address;
    }

    pub fn push(&mut self, datum: Datum) -> Result<()> {
        if self.max_size != 0 && self.vec.len() + 1 >= self.max_size {
            return Err(Stack::overflow_error());
        }
        self.vec.push(datum);
        Ok(())
    }

    /// Pushes back a value that was just popped. Skips the size check,
    /// the slot was already accounted for.
    pub fn restore(&mut self, datum: Datum) {
        self.vec.push(datum);
    }

    pub fn pop(&mut self) -> Result<Datum> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(Stack::underflow_error()),
        }
    }

    pub fn peek(&self) -> Result<&Datum> {
        match self.vec.last() {
            Some(v) => Ok(v),
            None => Err(Stack::underflow_error()),
        }
    }

    pub fn peek_mut(&mut self) -> Result<&mut Datum> {
        self.vec.last_mut().ok_or_else(Stack::underflow_error)
    }

    /// Checks an address from a program value or computation against `0..top`.
    pub fn resolve(&self, address: i64) -> Result<Address> {
        if address < 0 || address >= self.vec.len() as i64 {
            Err(Stack::bounds_error())
        } else {
            Ok(address as Address)
        }
    }

    pub fn get(&self, address: i64) -> Result<&Datum> {
        let address = self.resolve(address)?;
        Ok(&self.vec[address])
    }

    pub fn get_mut(&mut self, address: i64) -> Result<&mut Datum> {
        let address = self.resolve(address)?;
        Ok(&mut self.vec[address])
    }

    pub fn get_at(&self, level_diff: i32, offset: i32) -> Result<&Datum> {
        let address = self.address(level_diff, offset)?;
        self.get(address)
    }

    pub fn get_at_mut(&mut self, level_diff: i32, offset: i32) -> Result<&mut Datum> {
        let address = self.address(level_diff, offset)?;
        self.get_mut(address)
    }

    /// Walks `level_diff` static links from the current frame, then adds
    /// `offset`. Each hop is bounds checked; the final address is only
    /// checked when something reads or writes it, since a frame with no
    /// locals yet has its base at `top`.
    pub fn address(&self, level_diff: i32, offset: i32) -> Result<i64> {
        let mut base = self.frame_base as i64;
        for _ in 0..level_diff {
            base = match self.get(base + STATIC_LINK as i64)? {
                Datum::Integer(link) => *link as i64,
                _ => {
                    return Err(error!(TypeMismatch; "Static link must be an integer."))
                }
            };
        }
        Ok(base + offset as i64)
    }

    /// Reads an integer bookkeeping slot of the current frame's mark.
    pub fn mark(&self, slot: i32) -> Result<i32> {
        match self.get_at(0, slot)? {
            Datum::Integer(n) => Ok(*n),
            _ => Err(error!(TypeMismatch; "Stack mark entries must be integers.")),
        }
    }

    pub fn set_mark(&mut self, slot: i32, value: i32) -> Result<()> {
        *self.get_at_mut(0, slot)? = Datum::Integer(value);
        Ok(())
    }

    pub fn inc_top(&mut self, amount: usize) -> Result<()> {
        if self.max_size != 0 && self.vec.len() + amount > self.max_size {
            return Err(Stack::overflow_error());
        }
        self.vec.resize(self.vec.len() + amount, Datum::Undefined);
        Ok(())
    }

    /// Lays down a four slot mark. The frame base is left alone; the
    /// call sequence sets it once the argument count is known.
    pub fn mark_stack(&mut self, static_link: i32, dynamic_link: i32) -> Result<()> {
        self.push(Datum::Integer(static_link))?;
        self.push(Datum::Integer(dynamic_link))?;
        self.push(Datum::Integer(0))?;
        self.push(Datum::Integer(0))
    }

    /// Discards everything from `address` upward.
    pub fn truncate(&mut self, address: Address) -> Result<()> {
        if address > self.vec.len() {
            return Err(Stack::bounds_error());
        }
        self.vec.truncate(address);
        Ok(())
    }

    pub fn pop_2(&mut self) -> Result<(Datum, Datum)> {
        if self.vec.len() < 2 {
            return Err(Stack::underflow_error());
        }
        let two = self.pop()?;
        let one = self.pop()?;
        Ok((one, two))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mimics `MST level` followed by `CAL 0`.
    fn enter(stack: &mut Stack, level: i32) {
        let static_link = stack.address(level, 0).unwrap() as i32;
        let dynamic_link = stack.base() as i32;
        stack.mark_stack(static_link, dynamic_link).unwrap();
        stack.set_base(stack.top());
    }

    #[test]
    fn test_outermost_frame() {
        let stack = Stack::new(0).unwrap();
        assert_eq!(stack.top(), 4);
        assert_eq!(stack.base(), 4);
        assert_eq!(stack.mark(STATIC_LINK).unwrap(), 0);
        assert_eq!(stack.mark(HANDLER_ADDRESS).unwrap(), 0);
    }

    #[test]
    fn test_static_chain_matches_manual_walk() {
        let mut stack = Stack::new(0).unwrap();
        stack.inc_top(2).unwrap();
        for _ in 0..3 {
            enter(&mut stack, 0);
            stack.inc_top(1).unwrap();
        }
        for level in 0..4 {
            let mut manual = stack.base() as i64;
            for _ in 0..level {
                manual = stack.get(manual - 4).unwrap().as_integer().unwrap() as i64;
            }
            assert_eq!(stack.address(level, 1).unwrap(), manual + 1);
        }
        assert_eq!(stack.address(3, 0).unwrap(), 4);
    }

    #[test]
    fn test_sibling_static_link() {
        let mut stack = Stack::new(0).unwrap();
        enter(&mut stack, 0);
        let inner = stack.base();
        enter(&mut stack, 1);
        assert_eq!(stack.address(1, 0).unwrap(), 4);
        assert_eq!(stack.mark(DYNAMIC_LINK).unwrap() as usize, inner);
    }

    #[test]
    fn test_out_of_bounds() {
        let stack = Stack::new(0).unwrap();
        assert!(stack.get(4).is_err());
        assert!(stack.get(-1).is_err());
        assert!(stack.get_at(0, 0).is_err());
        assert!(stack.get_at(0, -4).is_ok());
    }

    #[test]
    fn test_max_size() {
        let mut stack = Stack::new(8).unwrap();
        stack.inc_top(3).unwrap();
        let err = stack.push(Datum::Integer(1)).unwrap_err();
        assert!(err.is(crate::lang::ErrorCode::OutOfStackSpace));
        assert!(stack.inc_top(2).is_err());
        assert!(stack.inc_top(1).is_ok());
    }

    #[test]
    fn test_underflow() {
        let mut stack = Stack::new(0).unwrap();
        stack.truncate(0).unwrap();
        assert!(stack.pop().is_err());
        assert!(stack.peek().is_err());
    }
}
