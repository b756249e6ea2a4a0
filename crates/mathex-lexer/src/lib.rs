use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
// Skip spaces, tabs and carriage returns, but NOT newlines; newlines are
// statement terminators. '#' comments run to end of line and are discarded.
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Number literals. The pattern deliberately also swallows malformed
    // tails ("3.2.2", "32e") so the parser rejects the whole lexeme when it
    // consumes the token, instead of silently splitting it.
    #[regex(r"(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:\.[0-9]*)*(?:[eE][+-]?[0-9]*)?")]
    Number,

    // Identifiers. Keyword operators (to, in, mod, and, or, not, xor) are
    // NOT resolved here; the parser promotes them in operator position.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // Double-quoted string, no escape processing.
    #[regex(r#""[^"\n]*""#)]
    Str,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,

    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<<")]
    LeftShift,
    #[token(">>")]
    RightShift,
    #[token(".*")]
    DotStar,
    #[token("./")]
    DotSlash,
    #[token(".^")]
    DotCaret,
    #[token(".'")]
    DotApostrophe,
    #[token("->")]
    Arrow,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("'")]
    Apostrophe,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Assign,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,

    // Consecutive newlines collapse into one separator.
    #[regex(r"\n+")]
    Newline,

    // Synthetic: emitted for input no rule matches.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub lexeme: String,
    /// Byte offset of the first character in the source.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

pub fn tokenize(input: &str) -> Vec<Token> {
    tokenize_detailed(input)
        .into_iter()
        .map(|t| t.token)
        .collect()
}

pub fn tokenize_detailed(input: &str) -> Vec<SpannedToken> {
    let mut lex = Token::lexer(input);
    let mut out = Vec::new();
    while let Some(res) = lex.next() {
        let span = lex.span();
        let token = match res {
            Ok(tok) => tok,
            Err(()) => Token::Error,
        };
        out.push(SpannedToken {
            token,
            lexeme: lex.slice().to_string(),
            start: span.start,
            end: span.end,
        });
    }
    out
}
