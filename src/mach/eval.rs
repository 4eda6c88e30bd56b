use super::{Console, Program, Val};
use crate::error;
use crate::lang::ast::Expression;
use crate::lang::Error;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn finite(n: f64) -> Result<f64> {
    if n.is_infinite() {
        Err(error!(Overflow; "Overflow"))
    } else {
        Ok(n)
    }
}

impl Program {
    /// Evaluate array indices to numbers.
    pub(super) fn indices(
        &mut self,
        indices: &[Expression],
        console: &mut dyn Console,
    ) -> Result<Vec<f64>> {
        indices.iter().map(|e| self.value(e, console)).collect()
    }

    pub fn value(&mut self, expr: &Expression, console: &mut dyn Console) -> Result<f64> {
        use Expression::*;
        let n = match expr {
            Number(n) => *n,
            Var(ident) => match self.vars.fetch(ident)? {
                Val::Number(n) => n,
                Val::String(_) => return Err(error!(TypeMismatch)),
            },
            Array(ident, indices) => {
                let indices = self.indices(indices, console)?;
                match self.vars.fetch_array(ident, &indices)? {
                    Val::Number(n) => n,
                    Val::String(_) => return Err(error!(TypeMismatch)),
                }
            }
            Function(kw, subject, args) => {
                return super::Function::value(self, console, *kw, subject.as_deref(), args)
            }
            Negation(e) => -self.value(e, console)?,
            BitNot(e) => !(self.value(e, console)? as i64) as f64,
            Not(e) => truth(self.value(e, console)? != 1.0),
            Power(l, r) => finite(self.value(l, console)?.powf(self.value(r, console)?))?,
            Multiply(l, r) => finite(self.value(l, console)? * self.value(r, console)?)?,
            Divide(l, r) => {
                let l = self.value(l, console)?;
                let r = self.value(r, console)?;
                if r == 0.0 {
                    return Err(error!(DivisionByZero; "divide by zero"));
                }
                finite(l / r)?
            }
            Add(l, r) => finite(self.value(l, console)? + self.value(r, console)?)?,
            Subtract(l, r) => finite(self.value(l, console)? - self.value(r, console)?)?,
            BitAnd(l, r) | And(l, r) => {
                ((self.value(l, console)? as i64) & (self.value(r, console)? as i64)) as f64
            }
            BitOr(l, r) | Or(l, r) => {
                ((self.value(l, console)? as i64) | (self.value(r, console)? as i64)) as f64
            }
            BitXor(l, r) | Xor(l, r) => {
                ((self.value(l, console)? as i64) ^ (self.value(r, console)? as i64)) as f64
            }
            Equal(l, r) => truth(self.compare(l, r, console)? == Some(Ordering::Equal)),
            NotEqual(l, r) => truth(self.compare(l, r, console)? != Some(Ordering::Equal)),
            Less(l, r) => truth(self.compare(l, r, console)? == Some(Ordering::Less)),
            LessEqual(l, r) => truth(matches!(
                self.compare(l, r, console)?,
                Some(Ordering::Less) | Some(Ordering::Equal)
            )),
            Greater(l, r) => truth(self.compare(l, r, console)? == Some(Ordering::Greater)),
            GreaterEqual(l, r) => truth(matches!(
                self.compare(l, r, console)?,
                Some(Ordering::Greater) | Some(Ordering::Equal)
            )),
            String(_) | Concat(..) => return Err(error!(TypeMismatch)),
        };
        Ok(n)
    }

    /// Strings compare lexicographically, numbers numerically. NaN is
    /// unordered, so only `<>` holds for it.
    fn compare(
        &mut self,
        l: &Expression,
        r: &Expression,
        console: &mut dyn Console,
    ) -> Result<Option<Ordering>> {
        if l.is_string() {
            let l = self.string_value(l, self.column, console)?;
            let r = self.string_value(r, self.column, console)?;
            Ok(Some(l.cmp(&r)))
        } else {
            let l = self.value(l, console)?;
            let r = self.value(r, console)?;
            Ok(l.partial_cmp(&r))
        }
    }

    /// `column` is the output column the result will be printed at; only
    /// TAB cares.
    pub fn string_value(
        &mut self,
        expr: &Expression,
        column: usize,
        console: &mut dyn Console,
    ) -> Result<String> {
        use Expression::*;
        match expr {
            String(s) => Ok(s.clone()),
            Var(ident) => match self.vars.fetch(ident)? {
                Val::String(s) => Ok(s),
                Val::Number(_) => Err(error!(TypeMismatch)),
            },
            Array(ident, indices) => {
                let indices = self.indices(indices, console)?;
                match self.vars.fetch_array(ident, &indices)? {
                    Val::String(s) => Ok(s),
                    Val::Number(_) => Err(error!(TypeMismatch)),
                }
            }
            Concat(l, r) => {
                let mut s = self.string_value(l, column, console)?;
                let column = column + s.chars().count();
                s.push_str(&self.string_value(r, column, console)?);
                Ok(s)
            }
            Function(kw, subject, args) => {
                super::Function::string(self, console, *kw, subject.as_deref(), args, column)
            }
            _ => Err(error!(TypeMismatch)),
        }
    }

    /// Evaluate to whichever kind of value the expression produces.
    pub fn eval(&mut self, expr: &Expression, console: &mut dyn Console) -> Result<Val> {
        if expr.is_string() {
            Ok(Val::String(self.string_value(expr, self.column, console)?))
        } else {
            Ok(Val::Number(self.value(expr, console)?))
        }
    }
}
