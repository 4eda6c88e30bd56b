use super::ast::Expression;
use super::parse::parse_expression;
use super::{token::*, Column, Ident, Keyword};

fn is_basic_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r' || c == '\n'
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic()
}

const MAX_INDICES: usize = 4;

/// ## Tokenizer for one line of BASIC
///
/// Tokens are produced on demand. Exactly one token of pushback is
/// supported through `unget_token`.
#[derive(Debug, Default)]
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    previous: usize,
}

impl Lexer {
    pub fn new(line: &str) -> Lexer {
        let mut lexer = Lexer::default();
        lexer.feed(line);
        lexer
    }

    /// Replace the buffer and rewind.
    pub fn feed(&mut self, line: &str) {
        self.chars = line.chars().collect();
        self.pos = 0;
        self.previous = 0;
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Columns covered by the most recent token.
    pub fn span(&self) -> Column {
        self.previous..self.pos
    }

    pub fn slice(&self, range: Column) -> String {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Everything not yet consumed. The buffer is left at its end.
    pub fn rest_of_line(&mut self) -> String {
        self.previous = self.pos;
        let s = self.slice(self.pos..self.chars.len());
        self.pos = self.chars.len();
        s
    }

    pub fn has_more_tokens(&mut self) -> bool {
        let save = (self.pos, self.previous);
        let more = self.next_token() != Token::Eol;
        self.pos = save.0;
        self.previous = save.1;
        more
    }

    pub fn unget_token(&mut self) {
        self.pos = self.previous;
    }

    /// The buffered line with a caret under the start of the last token.
    pub fn show_error(&self) -> String {
        let line: String = self.chars.iter().collect();
        format!("{}\n{}^", line.trim_end(), "-".repeat(self.previous))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !is_basic_whitespace(ch) {
                break;
            }
            self.pos += 1;
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.previous = self.pos;
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Token::Eol,
        };
        if is_basic_digit(ch) || (ch == '.' && self.peek_at(1).map_or(false, is_basic_digit)) {
            return self.number();
        }
        if ch == '"' {
            return self.string();
        }
        if let Some(token) = self.symbol(ch) {
            return token;
        }
        if is_basic_alphabetic(ch) {
            return self.alphabetic();
        }
        self.pos += 1;
        Token::Error("Unrecognized input.".into())
    }

    fn symbol(&mut self, ch: char) -> Option<Token> {
        use Operator::*;
        let next = self.peek_at(1);
        let (token, len) = match ch {
            '*' if next == Some('*') => (Token::Operator(Power), 2),
            '<' if next == Some('=') => (Token::Operator(LessEqual), 2),
            '<' if next == Some('>') => (Token::Operator(NotEqual), 2),
            '>' if next == Some('=') => (Token::Operator(GreaterEqual), 2),
            '>' if next == Some('<') => (Token::Operator(NotEqual), 2),
            '+' => (Token::Operator(Add), 1),
            '-' => (Token::Operator(Subtract), 1),
            '*' => (Token::Operator(Multiply), 1),
            '/' => (Token::Operator(Divide), 1),
            '&' => (Token::Operator(BitAnd), 1),
            '|' => (Token::Operator(BitOr), 1),
            '^' => (Token::Operator(BitXor), 1),
            '!' => (Token::Operator(BitNot), 1),
            '=' => (Token::Operator(Equal), 1),
            '<' => (Token::Operator(Less), 1),
            '>' => (Token::Operator(Greater), 1),
            '(' | ')' | '\'' | '?' | ':' | ';' | ',' => (Token::Symbol(ch), 1),
            _ => return None,
        };
        self.pos += len;
        Some(token)
    }

    fn digits(&mut self, mantissa: &mut f64) -> usize {
        let mut count = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            *mantissa = *mantissa * 10.0 + d as f64;
            self.pos += 1;
            count += 1;
        }
        count
    }

    fn number(&mut self) -> Token {
        let mut mantissa = 0.0;
        self.digits(&mut mantissa);
        let mut scale: i32 = 0;
        if self.peek() == Some('.') {
            self.pos += 1;
            scale = -(self.digits(&mut mantissa) as i32);
        }
        if let Some('e') | Some('E') = self.peek() {
            let signed = matches!(self.peek_at(1), Some('+') | Some('-'));
            let first = if signed { self.peek_at(2) } else { self.peek_at(1) };
            if first.map_or(false, is_basic_digit) {
                let negative = self.peek_at(1) == Some('-');
                self.pos += if signed { 2 } else { 1 };
                let mut exp = 0.0;
                self.digits(&mut exp);
                let exp = if negative { -exp } else { exp };
                if exp.abs() > 400.0 {
                    return Token::Error("Illegal numeric constant.".into());
                }
                scale += exp as i32;
            }
        }
        let value = if scale >= 0 {
            mantissa * 10f64.powi(scale)
        } else {
            mantissa / 10f64.powi(-scale)
        };
        if value.is_finite() {
            Token::Constant(value)
        } else {
            Token::Error("Illegal numeric constant.".into())
        }
    }

    fn string(&mut self) -> Token {
        let mut s = String::new();
        self.pos += 1;
        loop {
            match self.peek() {
                None => return Token::Error("Missing end quote.".into()),
                Some('"') => {
                    self.pos += 1;
                    if self.peek() == Some('"') {
                        s.push('"');
                        self.pos += 1;
                    } else {
                        return Token::Str(s);
                    }
                }
                Some(ch) => {
                    s.push(ch);
                    self.pos += 1;
                }
            }
        }
    }

    fn alphabetic(&mut self) -> Token {
        let start = self.pos;
        let mut s = String::new();
        while let Some(ch) = self.peek() {
            if !is_basic_alphabetic(ch) && !is_basic_digit(ch) {
                break;
            }
            s.push(ch.to_ascii_lowercase());
            self.pos += 1;
        }
        if let Some(op) = Operator::from_word(&s) {
            return Token::Operator(op);
        }
        if let Some(sigil @ '$') | Some(sigil @ '%') = self.peek() {
            s.push(sigil);
            self.pos += 1;
        }
        if let Some(kw) = Keyword::lookup(&s) {
            return Token::Keyword(kw);
        }
        let ident = Ident::new(&s);
        let after_name = self.pos;
        self.skip_whitespace();
        if self.peek() != Some('(') {
            self.pos = after_name;
            return Token::Ident(ident);
        }
        self.pos += 1;
        let token = match self.indices() {
            Ok(indices) => Token::Array(ident, indices),
            Err(msg) => Token::Error(msg),
        };
        self.previous = start;
        token
    }

    fn indices(&mut self) -> Result<Vec<Expression>, String> {
        let mut v = vec![];
        loop {
            let expr = parse_expression(self).map_err(|e| e.message_text().to_string())?;
            if expr.is_string() {
                return Err("Array index must be numeric.".into());
            }
            v.push(expr);
            let t = self.next_token();
            if t.is_symbol(')') {
                return Ok(v);
            }
            if !t.is_symbol(',') {
                return Err("Missing closing parenthesis for array index.".into());
            }
            if v.len() == MAX_INDICES {
                return Err("Too many array indices.".into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponent_overflow() {
        let mut lx = Lexer::new("1E999");
        assert_eq!(
            lx.next_token(),
            Token::Error("Illegal numeric constant.".into())
        );
    }

    #[test]
    fn test_unget_after_array() {
        let mut lx = Lexer::new("a(1, 2) = 3");
        let first = lx.next_token();
        assert!(matches!(first, Token::Array(_, ref v) if v.len() == 2));
        lx.unget_token();
        assert_eq!(lx.next_token(), first);
        assert_eq!(lx.next_token(), Token::Operator(Operator::Equal));
    }

    #[test]
    fn test_show_error() {
        let mut lx = Lexer::new("print 1 $");
        lx.next_token();
        lx.next_token();
        assert_eq!(lx.next_token(), Token::Error("Unrecognized input.".into()));
        assert_eq!(lx.show_error(), "print 1 $\n--------^");
    }
}
