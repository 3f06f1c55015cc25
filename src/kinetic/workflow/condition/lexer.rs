//! Tokenizer for condition expressions
//!
//! Variable references (`${NAME}` and `{{NAME}}`) become [`TokenKind::Variable`]
//! tokens. Nothing is substituted here; lookup happens during evaluation.
//!
//! Number literals are plain decimals (`42`, `-2.5`): exponents (`1e3`) and
//! a bare leading dot (`.5`) are rejected as unexpected characters.

use super::ast::{BinaryOp, UnaryOp};
use super::error::{ConditionEvaluationError, SyntaxErrorKind};

/// Operator token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Binary(BinaryOp),
    Unary(UnaryOp),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Boolean(bool),
    Null,
    Undefined,
    Variable(String),
    Operator(Operator),
    LParen,
    RParen,
}

/// A lexed token with its source text and byte offset
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    /// Tokens after which a `-` must be the binary operator
    fn ends_operand(&self) -> bool {
        !matches!(self.kind, TokenKind::Operator(_) | TokenKind::LParen)
    }
}

/// Longest first, so `===` wins over a shorter prefix
const OPERATORS: &[(&str, Operator)] = &[
    ("===", Operator::Binary(BinaryOp::Eq)),
    ("!==", Operator::Binary(BinaryOp::NotEq)),
    (">=", Operator::Binary(BinaryOp::Gte)),
    ("<=", Operator::Binary(BinaryOp::Lte)),
    ("&&", Operator::Binary(BinaryOp::And)),
    ("||", Operator::Binary(BinaryOp::Or)),
    (">", Operator::Binary(BinaryOp::Gt)),
    ("<", Operator::Binary(BinaryOp::Lt)),
    ("!", Operator::Unary(UnaryOp::Not)),
    ("+", Operator::Binary(BinaryOp::Add)),
    ("-", Operator::Binary(BinaryOp::Sub)),
    ("*", Operator::Binary(BinaryOp::Mul)),
    ("/", Operator::Binary(BinaryOp::Div)),
];

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("true", TokenKind::Boolean(true)),
    ("false", TokenKind::Boolean(false)),
    ("null", TokenKind::Null),
    ("undefined", TokenKind::Undefined),
];

/// Split `input` into tokens
pub fn tokenize(input: &str) -> Result<Vec<Token>, ConditionEvaluationError> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            text: self.src[start..self.pos].to_string(),
            position: start,
        });
    }

    fn error(&self, kind: SyntaxErrorKind, message: String) -> ConditionEvaluationError {
        ConditionEvaluationError::syntax(kind, message, self.src)
    }

    fn run(mut self) -> Result<Vec<Token>, ConditionEvaluationError> {
        while let Some(c) = self.peek() {
            let start = self.pos;

            if c.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }

            if c.is_ascii_digit() || (c == '-' && self.negative_number_ahead()) {
                self.lex_number(start)?;
                continue;
            }

            if c == '"' || c == '\'' {
                self.lex_string(c, start)?;
                continue;
            }

            if self.lex_variable(start) || self.lex_keyword(start) || self.lex_operator(start) {
                continue;
            }

            match c {
                '(' => {
                    self.pos += 1;
                    self.push(TokenKind::LParen, start);
                }
                ')' => {
                    self.pos += 1;
                    self.push(TokenKind::RParen, start);
                }
                _ => {
                    return Err(self.error(
                        SyntaxErrorKind::UnexpectedCharacter,
                        format!("Unexpected character '{c}' at position {start}"),
                    ))
                }
            }
        }

        Ok(self.tokens)
    }

    /// `-` starts a number only where an operand is expected
    fn negative_number_ahead(&self) -> bool {
        let follows_operand = self.tokens.last().is_some_and(Token::ends_operand);
        !follows_operand
            && self.rest()[1..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
    }

    fn lex_number(&mut self, start: usize) -> Result<(), ConditionEvaluationError> {
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        self.eat_digits();
        if self.peek() == Some('.') && self.rest()[1..].starts_with(|c: char| c.is_ascii_digit())
        {
            self.pos += 1;
            self.eat_digits();
        }

        let text = &self.src[start..self.pos];
        let n: f64 = text.parse().map_err(|_| {
            self.error(
                SyntaxErrorKind::UnexpectedCharacter,
                format!("Invalid number '{text}' at position {start}"),
            )
        })?;
        self.push(TokenKind::Number(n), start);
        Ok(())
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn lex_string(&mut self, quote: char, start: usize) -> Result<(), ConditionEvaluationError> {
        self.pos += 1;
        let mut value = String::new();
        let mut chars = self.rest().char_indices();

        while let Some((offset, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped)) if escaped == quote || escaped == '\\' => {
                        value.push(escaped)
                    }
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                c if c == quote => {
                    self.pos += offset + 1;
                    self.push(TokenKind::Str(value), start);
                    return Ok(());
                }
                c => value.push(c),
            }
        }

        Err(self.error(
            SyntaxErrorKind::UnterminatedString,
            format!("Unterminated string starting at position {start}"),
        ))
    }

    /// `${IDENT}` or `{{IDENT}}`
    fn lex_variable(&mut self, start: usize) -> bool {
        let rest = self.rest();
        let (open, close) = if rest.starts_with("${") {
            ("${", "}")
        } else if rest.starts_with("{{") {
            ("{{", "}}")
        } else {
            return false;
        };

        let body = &rest[open.len()..];
        let ident_len = identifier_len(body);
        if ident_len == 0 || !body[ident_len..].starts_with(close) {
            return false;
        }

        let name = body[..ident_len].to_string();
        self.pos += open.len() + ident_len + close.len();
        self.push(TokenKind::Variable(name), start);
        true
    }

    fn lex_keyword(&mut self, start: usize) -> bool {
        let rest = self.rest();
        let word_len = identifier_len(rest);
        if word_len == 0 {
            return false;
        }

        let word = &rest[..word_len];
        match KEYWORDS.iter().find(|(kw, _)| *kw == word) {
            Some((_, kind)) => {
                self.pos += word_len;
                self.push(kind.clone(), start);
                true
            }
            None => false,
        }
    }

    fn lex_operator(&mut self, start: usize) -> bool {
        let rest = self.rest();
        match OPERATORS.iter().find(|(text, _)| rest.starts_with(text)) {
            Some((text, op)) => {
                self.pos += text.len();
                self.push(TokenKind::Operator(*op), start);
                true
            }
            None => false,
        }
    }
}

/// Length of the `[A-Za-z_][A-Za-z0-9_]*` prefix of `s`
fn identifier_len(s: &str) -> usize {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    1 + chars
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .count()
}
