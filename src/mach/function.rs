use super::val::format_number;
use super::{Console, Program};
use crate::error;
use crate::lang::ast::Expression;
use crate::lang::{Error, Keyword};
use chrono::Local;
use rand::Rng;
use std::net::ToSocketAddrs;

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in functions
///
/// Argument count and types were checked by the parser.
pub struct Function {}

fn illegal(kw: Keyword) -> Error {
    error!(IllegalFunctionCall; format!("Illegal argument to {}.", kw))
}

fn arg(args: &[Expression], n: usize) -> Result<&Expression> {
    match args.get(n) {
        Some(e) => Ok(e),
        None => Err(error!(InternalError; "Missing function argument.")),
    }
}

impl Function {
    pub fn value(
        p: &mut Program,
        console: &mut dyn Console,
        kw: Keyword,
        subject: Option<&Expression>,
        args: &[Expression],
    ) -> Result<f64> {
        use Keyword::*;
        debug_assert!(subject.is_none());
        match kw {
            Time => return Ok((Local::now() - p.basetime).num_milliseconds() as f64),
            Tid => return Ok(p.id as f64),
            Len => {
                let s = p.string_value(arg(args, 0)?, p.column, console)?;
                return Ok(s.chars().count() as f64);
            }
            Val => {
                let s = p.string_value(arg(args, 0)?, p.column, console)?;
                return Function::val(&s);
            }
            _ => {}
        }
        let x = p.value(arg(args, 0)?, console)?;
        match kw {
            Rnd => Ok(p.rng.gen::<f64>() * x),
            Int => Ok(x.floor()),
            Sin => Ok(x.sin()),
            Cos => Ok(x.cos()),
            Tan => Ok(x.tan()),
            Atn => Ok(x.atan()),
            Sqr if x < 0.0 => Err(illegal(kw)),
            Sqr => Ok(x.sqrt()),
            Abs => Ok(x.abs()),
            Log if x <= 0.0 => Err(illegal(kw)),
            Log => Ok(x.ln()),
            Sgn => Ok(Function::sgn(x)),
            Max => Ok(x.max(p.value(arg(args, 1)?, console)?)),
            Min => Ok(x.min(p.value(arg(args, 1)?, console)?)),
            _ => Err(error!(TypeMismatch; format!("{} is not a numeric function.", kw))),
        }
    }

    pub fn string(
        p: &mut Program,
        console: &mut dyn Console,
        kw: Keyword,
        subject: Option<&Expression>,
        args: &[Expression],
        column: usize,
    ) -> Result<String> {
        use Keyword::*;
        let subject = match subject {
            Some(e) => Some(p.string_value(e, column, console)?),
            None => None,
        };
        let subject = subject.as_deref().unwrap_or("");
        match kw {
            NameS => return Ok(p.name.clone()),
            InkeyS => return Ok(console.last_key().map(String::from).unwrap_or_default()),
            IpS => {
                let host = p.string_value(arg(args, 0)?, column, console)?;
                return Ok(Function::ip(&host));
            }
            _ => {}
        }
        let n = p.value(arg(args, 0)?, console)?;
        match kw {
            LeftS => Function::left(subject, n).ok_or_else(|| illegal(kw)),
            RightS => Function::right(subject, n).ok_or_else(|| illegal(kw)),
            MidS => {
                let len = p.value(arg(args, 1)?, console)?;
                Function::mid(subject, n, len).ok_or_else(|| illegal(kw))
            }
            ChrS => Function::chr(n).ok_or_else(|| illegal(kw)),
            StrS => Ok(format_number(n)),
            SpcS | Tab if !n.is_finite() => Err(illegal(kw)),
            SpcS => Ok(" ".repeat(n.max(0.0) as usize)),
            Tab => Ok(" ".repeat((n.max(0.0) as usize).saturating_sub(column))),
            _ => Err(error!(TypeMismatch; format!("{} is not a string function.", kw))),
        }
    }

    pub fn sgn(x: f64) -> f64 {
        if x < 0.0 {
            -1.0
        } else if x > 0.0 {
            1.0
        } else {
            0.0
        }
    }

    pub fn val(s: &str) -> Result<f64> {
        match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(error!(IllegalFunctionCall; "Invalid string for VAL function.")),
        }
    }

    pub fn left(s: &str, n: f64) -> Option<String> {
        if !n.is_finite() || n < 0.0 {
            return None;
        }
        Some(s.chars().take(n as usize).collect())
    }

    pub fn right(s: &str, n: f64) -> Option<String> {
        if !n.is_finite() || n < 0.0 {
            return None;
        }
        let len = s.chars().count();
        Some(s.chars().skip(len.saturating_sub(n as usize)).collect())
    }

    /// One-based `start`, `len` characters.
    pub fn mid(s: &str, start: f64, len: f64) -> Option<String> {
        if !start.is_finite() || !len.is_finite() || start < 1.0 || len < 0.0 {
            return None;
        }
        Some(s.chars().skip(start as usize - 1).take(len as usize).collect())
    }

    pub fn chr(n: f64) -> Option<String> {
        if !n.is_finite() || n < 0.0 {
            return None;
        }
        std::char::from_u32(n as u32).map(String::from)
    }

    pub fn ip(host: &str) -> String {
        match (host, 0).to_socket_addrs() {
            Ok(mut addrs) => match addrs.next() {
                Some(addr) => addr.ip().to_string(),
                None => "unknown".into(),
            },
            Err(_) => "unknown".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substrings() {
        assert_eq!(Function::left("hello", 2.0).unwrap(), "he");
        assert_eq!(Function::left("hello", 99.0).unwrap(), "hello");
        assert_eq!(Function::right("hello", 3.0).unwrap(), "llo");
        assert_eq!(Function::mid("hello", 2.0, 3.0).unwrap(), "ell");
        assert_eq!(Function::mid("hello", 5.0, 1.0).unwrap(), "o");
        assert!(Function::mid("hello", 0.0, 1.0).is_none());
        assert!(Function::left("hello", -1.0).is_none());
        assert!(Function::mid("hello", f64::NAN, 1.0).is_none());
        assert!(Function::right("hello", f64::NAN).is_none());
        assert!(Function::chr(f64::INFINITY).is_none());
    }

    #[test]
    fn test_val() {
        assert_eq!(Function::val(" 12.5 ").unwrap(), 12.5);
        assert_eq!(Function::val("1e3").unwrap(), 1000.0);
        assert_eq!(
            Function::val("abc").unwrap_err().to_string(),
            "Invalid string for VAL function."
        );
    }

    #[test]
    fn test_chr_sgn() {
        assert_eq!(Function::chr(65.0).unwrap(), "A");
        assert_eq!(Function::sgn(-4.0), -1.0);
        assert_eq!(Function::sgn(0.0), 0.0);
    }

    #[test]
    fn test_ip_unknown() {
        assert_eq!(Function::ip("no such host.invalid"), "unknown");
    }
}
