/// ## Runtime values

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Number(f64),
    String(String),
}

impl Val {
    pub fn is_string(&self) -> bool {
        matches!(self, Val::String(_))
    }
}

/// Numbers print with at most eight fractional digits, no exponent and
/// no leading zero: `.5`, `-.25`, `1234567`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    let mut s = format!("{:.8}", n);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" || s.is_empty() {
        return "0".into();
    }
    if let Some(rest) = s.strip_prefix("0.") {
        return format!(".{}", rest);
    }
    if let Some(rest) = s.strip_prefix("-0.") {
        return format!("-.{}", rest);
    }
    s
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Number(n) => write!(f, "{}", format_number(*n)),
            Val::String(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(15.0), "15");
        assert_eq!(format_number(0.5), ".5");
        assert_eq!(format_number(-0.25), "-.25");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.0 / 3.0), ".33333333");
        assert_eq!(format_number(2.5e-10), "0");
        assert_eq!(format_number(1e12), "1000000000000");
        assert_eq!(format_number(-3.14159), "-3.14159");
    }
}
