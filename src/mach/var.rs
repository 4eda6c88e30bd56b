use super::val::{format_number, Val};
use crate::error;
use crate::lang::{Error, Ident};
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, Error>;

/// ## Variable memory
///
/// Scalars spring into existence on first assignment. Arrays must be
/// declared with DIM and are indexed from 1.

#[derive(Debug, Default)]
pub struct Var {
    scalars: BTreeMap<Ident, Val>,
    arrays: BTreeMap<Ident, Array>,
}

#[derive(Debug)]
struct Array {
    bounds: Vec<usize>,
    data: Vec<Val>,
}

fn default_for(ident: &Ident) -> Val {
    if ident.is_string() {
        Val::String(String::new())
    } else {
        Val::Number(0.0)
    }
}

fn coerce(ident: &Ident, value: Val) -> Result<Val> {
    match (ident, value) {
        (Ident::String(_), v @ Val::String(_)) => Ok(v),
        (Ident::Integer(_), Val::Number(n)) => Ok(Val::Number(n.trunc())),
        (Ident::Plain(_), v @ Val::Number(_)) => Ok(v),
        _ => Err(error!(TypeMismatch)),
    }
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.scalars.clear();
        self.arrays.clear();
    }

    pub fn fetch(&self, ident: &Ident) -> Result<Val> {
        match self.scalars.get(ident) {
            Some(val) => Ok(val.clone()),
            None => Err(error!(UndefinedVariable;
                format!("Undefined variable '{}'", ident))),
        }
    }

    pub fn store(&mut self, ident: &Ident, value: Val) -> Result<()> {
        let value = coerce(ident, value)?;
        self.scalars.insert(ident.clone(), value);
        Ok(())
    }

    pub fn dimension_array(&mut self, ident: &Ident, bounds: Vec<usize>) -> Result<()> {
        if ident.name().starts_with("fn") {
            return Err(error!(IllegalFunctionCall; "FN... not allowed as array name"));
        }
        if self.arrays.contains_key(ident) {
            return Err(error!(RedimensionedArray;
                format!("Array '{}' is already dimensioned.", ident)));
        }
        let mut size: usize = 1;
        for bound in &bounds {
            size = match size.checked_mul(*bound) {
                Some(s) if s <= u16::max_value() as usize * 16 => s,
                _ => return Err(error!(OutOfMemory; "Array too large.")),
            };
        }
        let data = vec![default_for(ident); size];
        self.arrays.insert(ident.clone(), Array { bounds, data });
        Ok(())
    }

    fn offset(&self, ident: &Ident, indices: &[f64]) -> Result<usize> {
        let array = match self.arrays.get(ident) {
            Some(array) => array,
            None => {
                return Err(error!(SubscriptOutOfRange;
                    "Array must be declared in a DIM statement"))
            }
        };
        if indices.len() != array.bounds.len() {
            return Err(error!(SubscriptOutOfRange; "Wrong number of indices."));
        }
        let mut offset = 0;
        for (index, bound) in indices.iter().zip(&array.bounds) {
            let index = index.trunc();
            if !index.is_finite() || index < 1.0 || index > *bound as f64 {
                return Err(error!(SubscriptOutOfRange; "Index out of range."));
            }
            offset = offset * bound + (index as usize - 1);
        }
        Ok(offset)
    }

    pub fn fetch_array(&self, ident: &Ident, indices: &[f64]) -> Result<Val> {
        let offset = self.offset(ident, indices)?;
        match self.arrays.get(ident) {
            Some(array) => Ok(array.data[offset].clone()),
            None => Err(error!(InternalError)),
        }
    }

    pub fn store_array(&mut self, ident: &Ident, indices: &[f64], value: Val) -> Result<()> {
        let offset = self.offset(ident, indices)?;
        let value = coerce(ident, value)?;
        match self.arrays.get_mut(ident) {
            Some(array) => {
                array.data[offset] = value;
                Ok(())
            }
            None => Err(error!(InternalError)),
        }
    }

    /// One line per variable, scalars first, ordered by name.
    pub fn dump(&self) -> Vec<String> {
        let show = |v: &Val| match v {
            Val::String(s) => format!("\"{}\"", s),
            Val::Number(n) => format_number(*n),
        };
        let mut lines: Vec<String> = self
            .scalars
            .iter()
            .map(|(k, v)| format!("{} = {}", k, show(v)))
            .collect();
        for (k, array) in &self.arrays {
            let bounds: Vec<String> = array.bounds.iter().map(|b| b.to_string()).collect();
            let values: Vec<String> = array.data.iter().map(show).collect();
            lines.push(format!("{}({}) = {}", k, bounds.join(","), values.join(", ")));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined() {
        let var = Var::new();
        let e = var.fetch(&Ident::new("a")).unwrap_err();
        assert_eq!(e.to_string(), "Undefined variable 'a'");
    }

    #[test]
    fn test_integer_truncates() {
        let mut var = Var::new();
        let i = Ident::new("i%");
        var.store(&i, Val::Number(3.7)).unwrap();
        assert_eq!(var.fetch(&i).unwrap(), Val::Number(3.0));
    }

    #[test]
    fn test_array_row_major() {
        let mut var = Var::new();
        let a = Ident::new("a");
        var.dimension_array(&a, vec![2, 3]).unwrap();
        var.store_array(&a, &[2.0, 1.0], Val::Number(7.0)).unwrap();
        assert_eq!(var.fetch_array(&a, &[2.0, 1.0]).unwrap(), Val::Number(7.0));
        assert_eq!(var.fetch_array(&a, &[1.0, 3.0]).unwrap(), Val::Number(0.0));
        assert_eq!(
            var.fetch_array(&a, &[3.0, 1.0]).unwrap_err().message_text(),
            "Index out of range."
        );
        assert_eq!(
            var.fetch_array(&a, &[1.0]).unwrap_err().message_text(),
            "Wrong number of indices."
        );
        assert!(var.dimension_array(&a, vec![1]).is_err());
    }

    #[test]
    fn test_undeclared_array() {
        let var = Var::new();
        let e = var.fetch_array(&Ident::new("b$"), &[1.0]).unwrap_err();
        assert_eq!(e.message_text(), "Array must be declared in a DIM statement");
    }

    #[test]
    fn test_dump() {
        let mut var = Var::new();
        var.store(&Ident::new("s$"), Val::String("hi".into())).unwrap();
        var.store(&Ident::new("a"), Val::Number(0.5)).unwrap();
        assert_eq!(var.dump(), vec!["a = .5", "s$ = \"hi\""]);
    }
}
