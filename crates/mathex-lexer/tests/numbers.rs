use mathex_lexer::{tokenize_detailed, Token};

fn lexemes(src: &str) -> Vec<(Token, String)> {
    tokenize_detailed(src)
        .into_iter()
        .map(|t| (t.token, t.lexeme))
        .collect()
}

#[test]
fn plain_and_fractional() {
    assert_eq!(lexemes("42"), vec![(Token::Number, "42".into())]);
    assert_eq!(lexemes("3.14"), vec![(Token::Number, "3.14".into())]);
    assert_eq!(lexemes("3."), vec![(Token::Number, "3.".into())]);
    assert_eq!(lexemes(".2"), vec![(Token::Number, ".2".into())]);
}

#[test]
fn exponents() {
    assert_eq!(lexemes("2e3"), vec![(Token::Number, "2e3".into())]);
    assert_eq!(lexemes("2.3e-4"), vec![(Token::Number, "2.3e-4".into())]);
    assert_eq!(lexemes("1E+10"), vec![(Token::Number, "1E+10".into())]);
}

#[test]
fn malformed_literals_stay_one_token() {
    // Rejected when the parser consumes them, not here.
    assert_eq!(lexemes("3.2.2"), vec![(Token::Number, "3.2.2".into())]);
    assert_eq!(lexemes("32e"), vec![(Token::Number, "32e".into())]);
}

#[test]
fn lone_dot_is_an_error() {
    assert_eq!(lexemes("."), vec![(Token::Error, ".".into())]);
}

#[test]
fn dot_star_is_not_a_number() {
    assert_eq!(
        lexemes("a.*2"),
        vec![
            (Token::Ident, "a".into()),
            (Token::DotStar, ".*".into()),
            (Token::Number, "2".into()),
        ]
    );
}

#[test]
fn spans_are_byte_offsets() {
    let toks = tokenize_detailed("ab + 1");
    assert_eq!(toks[0].start, 0);
    assert_eq!(toks[0].end, 2);
    assert_eq!(toks[1].start, 3);
    assert_eq!(toks[2].start, 5);
}
