/// ## Tagged stack value
///
/// Every stack slot holds one `Datum`. Reads that produce an operand
/// clone the slot so later stores never alias an earlier copy.

#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Integer(i32),
    Real(f32),
    String(String),
    Boolean(bool),
    Undefined,
}

impl Datum {
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Datum::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Datum::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl Default for Datum {
    fn default() -> Datum {
        Datum::Undefined
    }
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Datum::*;
        match self {
            Integer(n) => write!(f, "{}", n),
            Real(n) => write!(f, "{}", format_real(*n)),
            String(s) => write!(f, "{}", s),
            Boolean(b) => write!(f, "{}", b),
            Undefined => write!(f, "UNDEF"),
        }
    }
}

/// Reals always show a fractional digit and switch to `E` notation
/// outside of 10^-3..10^7.
pub fn format_real(n: f32) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let abs = n.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        let mut s = format!("{}", n);
        if !s.contains('.') {
            s.push_str(".0");
        }
        return s;
    }
    let s = format!("{:e}", n);
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            if mantissa.contains('.') {
                format!("{}E{}", mantissa, exponent)
            } else {
                format!("{}.0E{}", mantissa, exponent)
            }
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_formatting() {
        assert_eq!(format_real(3.0), "3.0");
        assert_eq!(format_real(-2.5), "-2.5");
        assert_eq!(format_real(0.0), "0.0");
        assert_eq!(format_real(1e10), "1.0E10");
        assert_eq!(format_real(1.5e-5), "1.5E-5");
        assert_eq!(format_real(1234567.0), "1234567.0");
    }

    #[test]
    fn test_display() {
        assert_eq!(Datum::Integer(-7).to_string(), "-7");
        assert_eq!(Datum::String("hi".into()).to_string(), "hi");
        assert_eq!(Datum::Boolean(true).to_string(), "true");
        assert_eq!(Datum::Undefined.to_string(), "UNDEF");
    }

    #[test]
    fn test_clone_does_not_alias() {
        let original = Datum::String("abc".into());
        let mut copy = original.clone();
        if let Datum::String(s) = &mut copy {
            s.push('d');
        }
        assert_eq!(original, Datum::String("abc".into()));
    }
}
