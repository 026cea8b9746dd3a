use super::Datum;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Value operations behind `OPR`
///
/// No operation coerces. Operands of the wrong type produce a
/// TypeMismatch and the caller restores the stack before reporting.

pub struct Operation {}

fn same_numeric_type(lhs: &Datum, rhs: &Datum) -> Result<()> {
    if std::mem::discriminant(lhs) != std::mem::discriminant(rhs) {
        return Err(error!(TypeMismatch;
            "Values for arithmetic operations must be of same type."));
    }
    match lhs {
        Datum::Integer(_) | Datum::Real(_) => Ok(()),
        _ => Err(error!(TypeMismatch;
            "Values for arithmetic operations must be of type integer or real.")),
    }
}

impl Operation {
    pub fn negate(val: &Datum) -> Result<Datum> {
        use Datum::*;
        match val {
            Integer(n) => Ok(Integer(n.wrapping_neg())),
            Real(n) => Ok(Real(-n)),
            _ => Err(error!(TypeMismatch; "Cannot negate boolean, string or UNDEF value.")),
        }
    }

    pub fn sum(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        use Datum::*;
        same_numeric_type(lhs, rhs)?;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => Ok(Integer(l.wrapping_add(*r))),
            (Real(l), Real(r)) => Ok(Real(l + r)),
            _ => Err(error!(InternalError)),
        }
    }

    pub fn subtract(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        use Datum::*;
        same_numeric_type(lhs, rhs)?;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => Ok(Integer(l.wrapping_sub(*r))),
            (Real(l), Real(r)) => Ok(Real(l - r)),
            _ => Err(error!(InternalError)),
        }
    }

    pub fn multiply(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        use Datum::*;
        same_numeric_type(lhs, rhs)?;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => Ok(Integer(l.wrapping_mul(*r))),
            (Real(l), Real(r)) => Ok(Real(l * r)),
            _ => Err(error!(InternalError)),
        }
    }

    pub fn divide(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        use Datum::*;
        same_numeric_type(lhs, rhs)?;
        match (lhs, rhs) {
            (Integer(_), Integer(0)) => Err(error!(DivisionByZero; "Attempt to divide by zero.")),
            (Integer(l), Integer(r)) => Ok(Integer(l.wrapping_div(*r))),
            (Real(_), Real(r)) if *r == 0.0 => {
                Err(error!(DivisionByZero; "Attempt to divide by zero."))
            }
            (Real(l), Real(r)) => Ok(Real(l / r)),
            _ => Err(error!(InternalError)),
        }
    }

    /// Integer exponent; the base keeps its own type.
    pub fn power(base: &Datum, exponent: &Datum) -> Result<Datum> {
        use Datum::*;
        let exponent = match exponent {
            Integer(n) => *n,
            _ => return Err(error!(TypeMismatch; "Exponent must be of type integer.")),
        };
        match base {
            Integer(b) => Ok(Integer((*b as f64).powi(exponent) as i32)),
            Real(b) => Ok(Real((*b as f64).powi(exponent) as f32)),
            _ => Err(error!(TypeMismatch; "Base must be of type integer or real.")),
        }
    }

    pub fn concatenate(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        use Datum::*;
        match (lhs, rhs) {
            (String(l), String(r)) => Ok(String(format!("{}{}", l, r))),
            _ => Err(error!(TypeMismatch; "Both arguments to OPR 8 must be of type string.")),
        }
    }

    pub fn is_odd(val: &Datum) -> Result<Datum> {
        match val {
            Datum::Integer(n) => Ok(Datum::Boolean(n % 2 != 0)),
            _ => Err(error!(TypeMismatch; "Argument to OPR 9 must be of type integer.")),
        }
    }

    pub fn equal(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        Operation::compare(lhs, rhs, |l, r| l == r, |l, r| l == r)
    }

    pub fn not_equal(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        Operation::compare(lhs, rhs, |l, r| l != r, |l, r| l != r)
    }

    pub fn less(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        Operation::compare(lhs, rhs, |l, r| l < r, |l, r| l < r)
    }

    pub fn greater_equal(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        Operation::compare(lhs, rhs, |l, r| l >= r, |l, r| l >= r)
    }

    pub fn greater(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        Operation::compare(lhs, rhs, |l, r| l > r, |l, r| l > r)
    }

    pub fn less_equal(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        Operation::compare(lhs, rhs, |l, r| l <= r, |l, r| l <= r)
    }

    fn compare(
        lhs: &Datum,
        rhs: &Datum,
        int: fn(i32, i32) -> bool,
        real: fn(f32, f32) -> bool,
    ) -> Result<Datum> {
        use Datum::*;
        same_numeric_type(lhs, rhs)?;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => Ok(Boolean(int(*l, *r))),
            (Real(l), Real(r)) => Ok(Boolean(real(*l, *r))),
            _ => Err(error!(InternalError)),
        }
    }

    pub fn not(val: &Datum) -> Result<Datum> {
        match val {
            Datum::Boolean(b) => Ok(Datum::Boolean(!b)),
            _ => Err(error!(TypeMismatch; "Top of stack must be a boolean.")),
        }
    }

    pub fn and(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        match (lhs, rhs) {
            (Datum::Boolean(l), Datum::Boolean(r)) => Ok(Datum::Boolean(*l && *r)),
            _ => Err(error!(TypeMismatch;
                "Logical and can only be performed on values of type boolean.")),
        }
    }

    pub fn or(lhs: &Datum, rhs: &Datum) -> Result<Datum> {
        match (lhs, rhs) {
            (Datum::Boolean(l), Datum::Boolean(r)) => Ok(Datum::Boolean(*l || *r)),
            _ => Err(error!(TypeMismatch;
                "Logical or can only be performed on values of type boolean.")),
        }
    }

    pub fn to_real(val: &Datum) -> Result<Datum> {
        match val {
            Datum::Integer(n) => Ok(Datum::Real(*n as f32)),
            _ => Err(error!(TypeMismatch;
                "Integer to real conversion can only be performed on a value of type integer.")),
        }
    }

    /// Truncates toward zero, saturating at the integer range.
    pub fn to_integer(val: &Datum) -> Result<Datum> {
        match val {
            Datum::Real(n) => Ok(Datum::Integer(*n as i32)),
            _ => Err(error!(TypeMismatch;
                "Real to integer conversion can only be performed on a value of type real.")),
        }
    }

    pub fn integer_to_string(val: &Datum) -> Result<Datum> {
        match val {
            Datum::Integer(_) => Ok(Datum::String(val.to_string())),
            _ => Err(error!(TypeMismatch;
                "Integer to string conversion can only be performed on a value of type integer.")),
        }
    }

    pub fn real_to_string(val: &Datum) -> Result<Datum> {
        match val {
            Datum::Real(_) => Ok(Datum::String(val.to_string())),
            _ => Err(error!(TypeMismatch;
                "Real to string conversion can only be performed on value of type real.")),
        }
    }
}
