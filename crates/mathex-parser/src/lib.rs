use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use mathex_lexer::{tokenize_detailed, Token};

mod error;
mod node;

pub use error::ParseError;
pub use node::{BlockEntry, ConstantKind, CustomNode, CustomRef, Node};

/// Builds a custom node from its parsed argument list.
pub type CustomNodeFactory = Rc<dyn Fn(Vec<Node>) -> Node>;

/// Parser configuration. `nodes` maps a name to a factory invoked when the
/// name is encountered as a function call or bare identifier.
#[derive(Clone, Default)]
pub struct ParseOptions {
    pub nodes: HashMap<String, CustomNodeFactory>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, name: &str, factory: CustomNodeFactory) -> Self {
        self.nodes.insert(name.to_string(), factory);
        self
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ParseOptions").field("nodes", &names).finish()
    }
}

pub fn parse(source: &str) -> Result<Node, ParseError> {
    parse_with(source, &ParseOptions::default())
}

/// Parses a sequence of sources into a sequence of trees, failing on the
/// first syntax error.
pub fn parse_all(sources: &[&str]) -> Result<Vec<Node>, ParseError> {
    sources.iter().map(|s| parse(s)).collect()
}

pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Node, ParseError> {
    let tokens = prepare_tokens(source)?;
    log::trace!("parsing {} tokens", tokens.len());
    let mut parser = Parser {
        tokens,
        pos: 0,
        source,
        options,
        nesting_level: 0,
        conditional_level: None,
    };
    parser.parse_program()
}

#[derive(Clone)]
struct TokenInfo {
    token: Token,
    lexeme: String,
    start: usize,
}

/// 1-based character offset of a byte position in the source.
fn char_offset(source: &str, byte: usize) -> usize {
    source[..byte.min(source.len())].chars().count() + 1
}

/// Binary operator tokens whose right operand may continue on the next line.
/// Keyword operators count: they are `Ident` tokens until the parser
/// promotes them.
fn awaits_operand(prev: &TokenInfo) -> bool {
    if prev.token == Token::Ident {
        return matches!(
            prev.lexeme.as_str(),
            "to" | "mod" | "and" | "or" | "xor" | "not"
        );
    }
    matches!(
        prev.token,
        Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Caret
            | Token::Percent
            | Token::DotStar
            | Token::DotSlash
            | Token::DotCaret
            | Token::Equal
            | Token::NotEqual
            | Token::Less
            | Token::Greater
            | Token::LessEqual
            | Token::GreaterEqual
            | Token::LeftShift
            | Token::RightShift
            | Token::Amp
            | Token::Pipe
            | Token::Assign
            | Token::Colon
            | Token::Question
    )
}

/// Tokenizes and applies the line-continuation rule: newlines inside a
/// balanced bracket pair, or directly after a binary operator, are dropped.
/// Leading and trailing newlines carry no statements and are trimmed.
fn prepare_tokens(source: &str) -> Result<Vec<TokenInfo>, ParseError> {
    let mut tokens: Vec<TokenInfo> = Vec::new();
    let mut depth = 0usize;
    for t in tokenize_detailed(source) {
        match t.token {
            Token::Error => {
                return Err(ParseError::SyntaxInPart {
                    part: t.lexeme,
                    char: char_offset(source, t.start),
                })
            }
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
            Token::Newline => {
                let continued = depth > 0
                    || tokens.last().map(awaits_operand).unwrap_or(true);
                if continued {
                    continue;
                }
            }
            _ => {}
        }
        tokens.push(TokenInfo {
            token: t.token,
            lexeme: t.lexeme,
            start: t.start,
        });
    }
    while tokens.last().map(|t| t.token) == Some(Token::Newline) {
        tokens.pop();
    }
    Ok(tokens)
}

const KEYWORD_OPERATORS: &[&str] = &["to", "in", "mod", "and", "or", "not", "xor"];

fn is_keyword_op(name: &str) -> bool {
    KEYWORD_OPERATORS.contains(&name)
}

struct Parser<'a> {
    tokens: Vec<TokenInfo>,
    pos: usize,
    source: &'a str,
    options: &'a ParseOptions,
    /// Incremented inside parentheses and brackets; used together with
    /// `conditional_level` to decide whether `:` belongs to a range or to
    /// the enclosing conditional.
    nesting_level: usize,
    conditional_level: Option<usize>,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|t| t.token)
    }

    fn current_lexeme(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|t| t.lexeme.as_str())
    }

    fn peek_at(&self, offset: usize) -> Option<Token> {
        self.tokens.get(self.pos + offset).map(|t| t.token)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn consume(&mut self, token: Token) -> bool {
        if self.current() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn take_lexeme(&mut self) -> String {
        let lexeme = self.tokens[self.pos].lexeme.clone();
        self.pos += 1;
        lexeme
    }

    fn current_keyword(&self, keyword: &str) -> bool {
        self.current() == Some(Token::Ident) && self.current_lexeme() == Some(keyword)
    }

    fn consume_keyword(&mut self, keyword: &str) -> bool {
        if self.current_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// 1-based char offset of the current token, or one past the input.
    fn char_pos(&self) -> usize {
        match self.tokens.get(self.pos) {
            Some(t) => char_offset(self.source, t.start),
            None => self.source.chars().count() + 1,
        }
    }

    fn can_start_expr(token: Option<Token>) -> bool {
        matches!(
            token,
            Some(
                Token::Number
                    | Token::Ident
                    | Token::Str
                    | Token::LParen
                    | Token::LBracket
                    | Token::Plus
                    | Token::Minus
            )
        )
    }

    fn binary(op: &str, fn_name: &str, lhs: Node, rhs: Node) -> Node {
        Node::Operator {
            op: op.to_string(),
            fn_name: fn_name.to_string(),
            args: vec![lhs, rhs],
        }
    }

    fn unary(op: &str, fn_name: &str, arg: Node) -> Node {
        Node::Operator {
            op: op.to_string(),
            fn_name: fn_name.to_string(),
            args: vec![arg],
        }
    }

    /// Block tier: statements separated by `;` (invisible) or newline
    /// (visible). A lone expression with no separators stays a bare node.
    fn parse_program(&mut self) -> Result<Node, ParseError> {
        let mut entries: Vec<BlockEntry> = Vec::new();
        let mut pending: Option<Node> = None;
        let mut saw_separator = false;
        loop {
            match self.current() {
                None => break,
                Some(Token::Newline) | Some(Token::Semicolon) => {
                    saw_separator = true;
                    let visible = self.current() == Some(Token::Newline);
                    if let Some(node) = pending.take() {
                        entries.push(BlockEntry { node, visible });
                    }
                    self.advance();
                }
                Some(_) => {
                    if pending.is_some() {
                        return Err(ParseError::UnexpectedPart {
                            part: self.current_lexeme().unwrap_or_default().to_string(),
                        });
                    }
                    pending = Some(self.parse_assignment()?);
                }
            }
        }
        if pending.is_some() && entries.is_empty() && !saw_separator {
            return Ok(pending.unwrap());
        }
        if let Some(node) = pending {
            entries.push(BlockEntry {
                node,
                visible: true,
            });
        }
        if entries.is_empty() && !saw_separator {
            return Err(ParseError::UnexpectedEnd {
                char: self.char_pos(),
            });
        }
        Ok(Node::Block { entries })
    }

    /// Assignment tier, right-associative. The left side must be a bare
    /// symbol, a call whose arguments are all bare symbols (function
    /// assignment), or an index expression rooted at a symbol (update).
    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        let node = self.parse_conditional()?;
        if self.current() != Some(Token::Assign) {
            return Ok(node);
        }
        let eq_char = self.char_pos();
        self.advance();
        match node {
            Node::Symbol { name } => {
                let value = self.parse_assignment()?;
                Ok(Node::Assignment {
                    name,
                    value: Box::new(value),
                })
            }
            Node::FunctionCall { name, args } => {
                let mut params = Vec::with_capacity(args.len());
                for arg in &args {
                    match arg {
                        Node::Symbol { name } => params.push(name.clone()),
                        _ => return Err(ParseError::InvalidAssignmentLhs { char: eq_char }),
                    }
                }
                let body = self.parse_assignment()?;
                let syntax = format!("{}({})", name, params.join(", "));
                Ok(Node::FunctionAssignment {
                    name,
                    params,
                    body: Box::new(body),
                    syntax,
                })
            }
            Node::Index { object, dims, .. } => {
                let name = match *object {
                    Node::Symbol { name } => name,
                    _ => return Err(ParseError::InvalidAssignmentLhs { char: eq_char }),
                };
                let value = self.parse_assignment()?;
                let index = Node::Index {
                    object: Box::new(Node::Symbol { name: name.clone() }),
                    dims,
                    is_assignment: true,
                };
                Ok(Node::Update {
                    name,
                    index: Box::new(index),
                    value: Box::new(value),
                })
            }
            _ => Err(ParseError::InvalidAssignmentLhs { char: eq_char }),
        }
    }

    /// Conditional tier, right-associative, mandatory false part. While the
    /// true part is being parsed, `:` at the same nesting level belongs to
    /// this conditional, not to a range.
    fn parse_conditional(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_logical_or()?;
        while self.current() == Some(Token::Question) {
            let prev = self.conditional_level;
            self.conditional_level = Some(self.nesting_level);
            self.advance();
            let true_expr = self.parse_assignment()?;
            if !self.consume(Token::Colon) {
                self.conditional_level = prev;
                return Err(ParseError::FalsePartExpected);
            }
            self.conditional_level = None;
            let false_expr = self.parse_assignment()?;
            self.conditional_level = prev;
            node = Node::Conditional {
                condition: Box::new(node),
                true_expr: Box::new(true_expr),
                false_expr: Box::new(false_expr),
            };
        }
        Ok(node)
    }

    fn parse_logical_or(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_logical_xor()?;
        while self.consume_keyword("or") {
            let rhs = self.parse_logical_xor()?;
            node = Self::binary("or", "or", node, rhs);
        }
        Ok(node)
    }

    fn parse_logical_xor(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_logical_and()?;
        while self.consume_keyword("xor") {
            let rhs = self.parse_logical_and()?;
            node = Self::binary("xor", "xor", node, rhs);
        }
        Ok(node)
    }

    fn parse_logical_and(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_bitwise_or()?;
        while self.consume_keyword("and") {
            let rhs = self.parse_bitwise_or()?;
            node = Self::binary("and", "and", node, rhs);
        }
        Ok(node)
    }

    fn parse_bitwise_or(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_bitwise_and()?;
        while self.consume(Token::Pipe) {
            let rhs = self.parse_bitwise_and()?;
            node = Self::binary("|", "bitOr", node, rhs);
        }
        Ok(node)
    }

    fn parse_bitwise_and(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_range()?;
        while self.consume(Token::Amp) {
            let rhs = self.parse_range()?;
            node = Self::binary("&", "bitAnd", node, rhs);
        }
        Ok(node)
    }

    /// Range tier: `start:end` or `start:step:end`. A colon is refused when
    /// it terminates the true part of an enclosing conditional.
    fn parse_range(&mut self) -> Result<Node, ParseError> {
        let node = self.parse_conversion()?;
        if self.current() != Some(Token::Colon) || self.conditional_level == Some(self.nesting_level)
        {
            return Ok(node);
        }
        let mut parts = vec![node];
        while self.current() == Some(Token::Colon)
            && self.conditional_level != Some(self.nesting_level)
            && parts.len() < 3
        {
            self.advance();
            parts.push(self.parse_conversion()?);
        }
        let node = if parts.len() == 3 {
            let end = parts.pop().unwrap();
            let step = parts.pop().unwrap();
            let start = parts.pop().unwrap();
            Node::Range {
                start: Box::new(start),
                end: Box::new(end),
                step: Some(Box::new(step)),
            }
        } else {
            let end = parts.pop().unwrap();
            let start = parts.pop().unwrap();
            Node::Range {
                start: Box::new(start),
                end: Box::new(end),
                step: None,
            }
        };
        Ok(node)
    }

    /// Conversion tier. `to` always converts; `in` converts only when the
    /// following token can start an expression, otherwise it is the inch
    /// unit and binds as an implicit multiplication.
    fn parse_conversion(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_relational()?;
        loop {
            if self.consume_keyword("to") {
                let rhs = self.parse_relational()?;
                node = Self::binary("to", "to", node, rhs);
            } else if self.current_keyword("in") {
                let is_unit_position = !Self::can_start_expr(self.peek_at(1))
                    && matches!(
                        node,
                        Node::Constant {
                            kind: ConstantKind::Number,
                            ..
                        }
                    );
                self.advance();
                if is_unit_position {
                    // a trailing `in` after a number literal is the inch unit
                    node = Self::binary("*", "multiply", node, Node::Symbol { name: "in".into() });
                } else {
                    let rhs = self.parse_relational()?;
                    node = Self::binary("in", "to", node, rhs);
                }
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn parse_relational(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_shift()?;
        loop {
            let (op, fn_name) = match self.current() {
                Some(Token::Equal) => ("==", "equal"),
                Some(Token::NotEqual) => ("!=", "unequal"),
                Some(Token::Less) => ("<", "smaller"),
                Some(Token::Greater) => (">", "larger"),
                Some(Token::LessEqual) => ("<=", "smallerEq"),
                Some(Token::GreaterEqual) => (">=", "largerEq"),
                _ => break,
            };
            self.advance();
            let rhs = self.parse_shift()?;
            node = Self::binary(op, fn_name, node, rhs);
        }
        Ok(node)
    }

    fn parse_shift(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_additive()?;
        loop {
            let (op, fn_name) = match self.current() {
                Some(Token::LeftShift) => ("<<", "leftShift"),
                Some(Token::RightShift) => (">>", "rightArithShift"),
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive()?;
            node = Self::binary(op, fn_name, node, rhs);
        }
        Ok(node)
    }

    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_multiplicative()?;
        loop {
            let (op, fn_name) = match self.current() {
                Some(Token::Plus) => ("+", "add"),
                Some(Token::Minus) => ("-", "subtract"),
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            node = Self::binary(op, fn_name, node, rhs);
        }
        Ok(node)
    }

    /// Multiplicative tier. Implicit multiplication lives here (same
    /// precedence as `*`): adjacency with a symbol, parenthesised
    /// expression or matrix literal multiplies, provided the left side is
    /// not a function call. Two adjacent bare numbers are not
    /// multiplication; they fall out as `Unexpected part`, and so does
    /// anything adjacent to a call.
    fn parse_multiplicative(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_unary()?;
        loop {
            match self.current() {
                Some(Token::Star) => {
                    self.advance();
                    let rhs = self.parse_unary()?;
                    node = Self::binary("*", "multiply", node, rhs);
                }
                Some(Token::Slash) => {
                    self.advance();
                    let rhs = self.parse_unary()?;
                    node = Self::binary("/", "divide", node, rhs);
                }
                Some(Token::DotStar) => {
                    self.advance();
                    let rhs = self.parse_unary()?;
                    node = Self::binary(".*", "dotMultiply", node, rhs);
                }
                Some(Token::DotSlash) => {
                    self.advance();
                    let rhs = self.parse_unary()?;
                    node = Self::binary("./", "dotDivide", node, rhs);
                }
                Some(Token::Percent) => {
                    self.advance();
                    let rhs = self.parse_unary()?;
                    node = Self::binary("%", "mod", node, rhs);
                }
                Some(Token::Ident) if self.current_lexeme() == Some("mod") => {
                    self.advance();
                    let rhs = self.parse_unary()?;
                    node = Self::binary("mod", "mod", node, rhs);
                }
                Some(Token::Ident)
                    if !is_keyword_op(self.current_lexeme().unwrap_or_default())
                        && !matches!(node, Node::FunctionCall { .. }) =>
                {
                    let rhs = self.parse_unary()?;
                    node = Self::binary("*", "multiply", node, rhs);
                }
                Some(Token::LParen) | Some(Token::LBracket)
                    if !matches!(node, Node::FunctionCall { .. }) =>
                {
                    let rhs = self.parse_unary()?;
                    node = Self::binary("*", "multiply", node, rhs);
                }
                _ => break,
            }
        }
        Ok(node)
    }

    /// Unary prefix tier: binds tighter than multiplication but looser than
    /// power, so `-3^2` is `-(3^2)`.
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        if self.consume(Token::Minus) {
            let arg = self.parse_unary()?;
            return Ok(Self::unary("-", "unaryMinus", arg));
        }
        if self.consume(Token::Plus) {
            let arg = self.parse_unary()?;
            return Ok(Self::unary("+", "unaryPlus", arg));
        }
        if self.consume_keyword("not") {
            let arg = self.parse_unary()?;
            return Ok(Self::unary("not", "not", arg));
        }
        self.parse_pow()
    }

    /// Power tier, right-associative; a unary prefix is accepted on the
    /// right operand (`2^-2`).
    fn parse_pow(&mut self) -> Result<Node, ParseError> {
        let node = self.parse_postfix()?;
        let (op, fn_name) = match self.current() {
            Some(Token::Caret) => ("^", "pow"),
            Some(Token::DotCaret) => (".^", "dotPow"),
            _ => return Ok(node),
        };
        self.advance();
        let rhs = self.parse_unary()?;
        Ok(Self::binary(op, fn_name, node, rhs))
    }

    /// Postfix tier: factorial and transpose, left-associative, chainable.
    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_atom()?;
        loop {
            if self.consume(Token::Bang) {
                node = Self::unary("!", "factorial", node);
            } else if self.consume(Token::Apostrophe) {
                node = Self::unary("'", "transpose", node);
            } else if self.consume(Token::DotApostrophe) {
                node = Self::unary(".'", "transpose", node);
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn parse_atom(&mut self) -> Result<Node, ParseError> {
        let Some(token) = self.current() else {
            return Err(ParseError::UnexpectedEnd {
                char: self.char_pos(),
            });
        };
        match token {
            Token::Number => {
                let char = self.char_pos();
                let lexeme = self.take_lexeme();
                if lexeme.parse::<f64>().is_err() {
                    return Err(ParseError::SyntaxInPart { part: lexeme, char });
                }
                Ok(Node::Constant {
                    value: lexeme,
                    kind: ConstantKind::Number,
                })
            }
            Token::Str => {
                let lexeme = self.take_lexeme();
                let inner = lexeme[1..lexeme.len() - 1].to_string();
                Ok(Node::Constant {
                    value: inner,
                    kind: ConstantKind::String,
                })
            }
            Token::Ident => self.parse_symbol(),
            Token::LParen => {
                self.advance();
                self.nesting_level += 1;
                let inner = self.parse_assignment()?;
                if !self.consume(Token::RParen) {
                    return Err(ParseError::ParenExpected);
                }
                self.nesting_level -= 1;
                Ok(Node::Parenthesis {
                    inner: Box::new(inner),
                })
            }
            Token::LBracket => self.parse_matrix(),
            _ => Err(ParseError::ValueExpected {
                char: self.char_pos(),
            }),
        }
    }

    /// Symbol atoms: named constants, custom nodes, function calls, plain
    /// symbols; each of the latter two may take an index suffix.
    fn parse_symbol(&mut self) -> Result<Node, ParseError> {
        let name = self.take_lexeme();
        if let Some(factory) = self.options.nodes.get(&name).cloned() {
            let args = if self.current() == Some(Token::LParen) {
                self.parse_call_args()?
            } else {
                Vec::new()
            };
            return Ok(factory(args));
        }
        match name.as_str() {
            "true" | "false" => {
                return Ok(Node::Constant {
                    value: name,
                    kind: ConstantKind::Boolean,
                })
            }
            "null" | "undefined" => {
                return Ok(Node::Constant {
                    value: name,
                    kind: ConstantKind::Undefined,
                })
            }
            "NaN" | "Infinity" => {
                return Ok(Node::Constant {
                    value: name,
                    kind: ConstantKind::Number,
                })
            }
            _ => {}
        }
        let node = if self.current() == Some(Token::LParen) {
            let args = self.parse_call_args()?;
            Node::FunctionCall { name, args }
        } else {
            Node::Symbol { name }
        };
        self.parse_index_suffix(node)
    }

    fn parse_call_args(&mut self) -> Result<Vec<Node>, ParseError> {
        self.advance(); // '('
        self.nesting_level += 1;
        let mut args = Vec::new();
        if !self.consume(Token::RParen) {
            loop {
                args.push(self.parse_assignment()?);
                if self.consume(Token::Comma) {
                    continue;
                }
                break;
            }
            if !self.consume(Token::RParen) {
                return Err(ParseError::ParenExpected);
            }
        }
        self.nesting_level -= 1;
        Ok(args)
    }

    /// Index suffix: `a[dim, ...]`, chainable. A bare `:` dimension is the
    /// full-range shortcut `1:end`.
    fn parse_index_suffix(&mut self, mut node: Node) -> Result<Node, ParseError> {
        while self.current() == Some(Token::LBracket) {
            self.advance();
            self.nesting_level += 1;
            let mut dims = Vec::new();
            if self.current() != Some(Token::RBracket) {
                loop {
                    dims.push(self.parse_index_dim()?);
                    if self.consume(Token::Comma) {
                        continue;
                    }
                    break;
                }
            }
            if !self.consume(Token::RBracket) {
                return Err(ParseError::BracketExpected);
            }
            self.nesting_level -= 1;
            node = Node::Index {
                object: Box::new(node),
                dims,
                is_assignment: false,
            };
        }
        Ok(node)
    }

    fn parse_index_dim(&mut self) -> Result<Node, ParseError> {
        if self.current() == Some(Token::Colon)
            && matches!(self.peek_at(1), Some(Token::Comma) | Some(Token::RBracket))
        {
            self.advance();
            return Ok(Node::Range {
                start: Box::new(Node::Constant {
                    value: "1".to_string(),
                    kind: ConstantKind::Number,
                }),
                end: Box::new(Node::Symbol {
                    name: "end".to_string(),
                }),
                step: None,
            });
        }
        self.parse_assignment()
    }

    /// Matrix literal: rows separated by `;`, columns by `,`. All rows must
    /// have the same number of columns.
    fn parse_matrix(&mut self) -> Result<Node, ParseError> {
        self.advance(); // '['
        self.nesting_level += 1;
        if self.consume(Token::RBracket) {
            self.nesting_level -= 1;
            return Ok(Node::Array { rows: Vec::new() });
        }
        let mut rows: Vec<Vec<Node>> = Vec::new();
        loop {
            let mut row = Vec::new();
            loop {
                row.push(self.parse_assignment()?);
                if !self.consume(Token::Comma) {
                    break;
                }
            }
            rows.push(row);
            if !self.consume(Token::Semicolon) {
                break;
            }
        }
        if !self.consume(Token::RBracket) {
            return Err(ParseError::EndOfMatrixExpected);
        }
        self.nesting_level -= 1;
        if rows.len() > 1 {
            let cols = rows[0].len();
            if rows.iter().any(|row| row.len() != cols) {
                return Err(ParseError::ColumnDimensionsMismatch);
            }
        }
        Ok(Node::Array { rows })
    }
}
