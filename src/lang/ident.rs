// Used in both Token and Ast

/// A variable name. The trailing sigil fixes the kind of value it holds
/// and is kept as part of the name, so `a`, `a%` and `a$` are distinct.
#[derive(Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub enum Ident {
    Plain(String),
    String(String),
    Integer(String),
}

impl Ident {
    /// Build from a lowercased name including any sigil.
    pub fn new(name: &str) -> Ident {
        if name.ends_with('$') {
            Ident::String(name.to_string())
        } else if name.ends_with('%') {
            Ident::Integer(name.to_string())
        } else {
            Ident::Plain(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        use Ident::*;
        match self {
            Plain(s) | String(s) | Integer(s) => s,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Ident::String(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Ident::Integer(_))
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_sigil() {
        assert!(Ident::new("a$").is_string());
        assert!(Ident::new("i%").is_integer());
        assert_eq!(Ident::new("x1"), Ident::Plain("x1".into()));
        assert_ne!(Ident::new("a"), Ident::new("a$"));
    }
}
