use basic::lang::{Keyword, Lexer, Operator, Token};

fn tokens(s: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(s);
    let mut v = vec![];
    loop {
        let t = lexer.next_token();
        if t == Token::Eol {
            return v;
        }
        v.push(t);
    }
}

#[test]
fn test_keywords_any_case() {
    assert_eq!(
        tokens("print Goto"),
        vec![
            Token::Keyword(Keyword::Print),
            Token::Keyword(Keyword::Goto)
        ]
    );
}

#[test]
fn test_two_char_operators() {
    assert_eq!(
        tokens("<= <> >= ** <"),
        vec![
            Token::Operator(Operator::LessEqual),
            Token::Operator(Operator::NotEqual),
            Token::Operator(Operator::GreaterEqual),
            Token::Operator(Operator::Power),
            Token::Operator(Operator::Less),
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("12 3.25 1E3 2.5e-1"),
        vec![
            Token::Constant(12.0),
            Token::Constant(3.25),
            Token::Constant(1000.0),
            Token::Constant(0.25),
        ]
    );
}

#[test]
fn test_strings() {
    assert_eq!(tokens(r#""a""b""#), vec![Token::Str("a\"b".into())]);
    assert_eq!(
        tokens(r#""open"#),
        vec![Token::Error("Missing end quote.".into())]
    );
}

#[test]
fn test_boolean_words() {
    assert_eq!(
        tokens("and OR xor not"),
        vec![
            Token::Operator(Operator::And),
            Token::Operator(Operator::Or),
            Token::Operator(Operator::Xor),
            Token::Operator(Operator::Not),
        ]
    );
}

#[test]
fn test_unget_and_caret() {
    let mut lexer = Lexer::new("LET X = 1");
    lexer.next_token();
    assert!(matches!(lexer.next_token(), Token::Ident(_)));
    lexer.unget_token();
    assert!(matches!(lexer.next_token(), Token::Ident(_)));
    assert_eq!(lexer.show_error(), "LET X = 1\n----^");
}

#[test]
fn test_array_reference() {
    match tokens("a(1, i+1)").as_slice() {
        [Token::Array(ident, indices)] => {
            assert_eq!(ident.name(), "a");
            assert_eq!(indices.len(), 2);
        }
        other => panic!("unexpected {:?}", other),
    }
}
