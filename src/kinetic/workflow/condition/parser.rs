//! Condition expression parser
//!
//! Precedence climbing over the token stream, loosest first:
//! `||`, `&&`, `=== !==`, `> < >= <=`, `+ -`, `* /`, prefix `!`, primary.
//! All binary levels are left-associative.
//!
//! Parenthesis and `!` nesting is limited by a configurable depth, itself
//! clamped to [`MAX_DEPTH_CEILING`]. Tree height is capped separately at
//! [`MAX_TREE_HEIGHT`], which bounds the evaluator's recursion.

use super::ast::{BinaryOp, Expression, UnaryOp};
use super::error::{ConditionEvaluationError, SyntaxErrorKind};
use super::lexer::{tokenize, Operator, Token, TokenKind};
use super::value::Value;

/// Default limit on parenthesis and `!` nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Upper bound applied to any configured nesting limit
pub const MAX_DEPTH_CEILING: usize = 128;

/// Hard cap on tree height, long operator chains included
pub const MAX_TREE_HEIGHT: usize = 128;

/// Parse a condition expression string into an AST
pub fn parse(input: &str) -> Result<Expression, ConditionEvaluationError> {
    parse_with_depth(input, DEFAULT_MAX_DEPTH)
}

/// Parse with an explicit nesting limit
///
/// Limits above [`MAX_DEPTH_CEILING`] are clamped to it.
pub fn parse_with_depth(
    input: &str,
    max_depth: usize,
) -> Result<Expression, ConditionEvaluationError> {
    if max_depth > MAX_DEPTH_CEILING {
        log::debug!(
            "Clamping nesting limit {} to {}",
            max_depth,
            MAX_DEPTH_CEILING
        );
    }
    let max_depth = max_depth.min(MAX_DEPTH_CEILING);

    let tokens = tokenize(input)?;
    let mut parser = Parser {
        condition: input,
        tokens: &tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };

    let (expr, _) = parser.parse_binary(BinaryOp::Or.precedence())?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(parser.unexpected(token)),
    }
}

struct Parser<'a> {
    condition: &'a str,
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

type Parsed = Result<(Expression, usize), ConditionEvaluationError>;

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        match self.peek()?.kind {
            TokenKind::Operator(Operator::Binary(op)) => Some(op),
            _ => None,
        }
    }

    /// Parse operators binding at least as tight as `min_prec`; returns tree height too
    fn parse_binary(&mut self, min_prec: u8) -> Parsed {
        let (mut left, mut height) = self.parse_unary()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let (right, right_height) = self.parse_binary(prec + 1)?;
            height = self.check_height(height.max(right_height) + 1)?;
            left = Expression::binary(op, left, right);
        }

        Ok((left, height))
    }

    fn parse_unary(&mut self) -> Parsed {
        if let Some(Token {
            kind: TokenKind::Operator(Operator::Unary(UnaryOp::Not)),
            ..
        }) = self.peek()
        {
            self.advance();
            self.enter()?;
            let (operand, height) = self.parse_unary()?;
            self.depth -= 1;
            let height = self.check_height(height + 1)?;
            return Ok((Expression::not(operand), height));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Parsed {
        let token = match self.advance() {
            Some(token) => token,
            None => {
                return Err(ConditionEvaluationError::syntax(
                    SyntaxErrorKind::UnexpectedEnd,
                    "Unexpected end of condition, expected a value",
                    self.condition,
                ))
            }
        };

        let expr = match &token.kind {
            TokenKind::Number(n) => Expression::Literal(Value::Number(*n)),
            TokenKind::Str(s) => Expression::Literal(Value::Str(s.clone())),
            TokenKind::Boolean(b) => Expression::Literal(Value::Bool(*b)),
            TokenKind::Null => Expression::Literal(Value::Null),
            TokenKind::Undefined => Expression::Literal(Value::Undefined),
            TokenKind::Variable(name) => Expression::Variable(name.clone()),
            TokenKind::LParen => return self.parse_group(token),
            TokenKind::RParen | TokenKind::Operator(_) => return Err(self.unexpected(token)),
        };

        Ok((expr, 1))
    }

    /// Body of `( ... )`, with the opening paren already consumed
    fn parse_group(&mut self, open: &Token) -> Parsed {
        self.enter()?;
        let (inner, height) = self.parse_binary(BinaryOp::Or.precedence())?;

        match self.advance() {
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => {
                self.depth -= 1;
                Ok((inner, self.check_height(height)?))
            }
            Some(token) => Err(self.unexpected(token)),
            None => Err(ConditionEvaluationError::syntax(
                SyntaxErrorKind::UnexpectedEnd,
                format!("Missing ')' for '(' at position {}", open.position),
                self.condition,
            )),
        }
    }

    fn enter(&mut self) -> Result<(), ConditionEvaluationError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.too_deep());
        }
        Ok(())
    }

    fn check_height(&self, height: usize) -> Result<usize, ConditionEvaluationError> {
        if height > MAX_TREE_HEIGHT {
            return Err(ConditionEvaluationError::syntax(
                SyntaxErrorKind::NestingTooDeep,
                format!("Condition exceeds maximum expression height of {MAX_TREE_HEIGHT}"),
                self.condition,
            ));
        }
        Ok(height)
    }

    fn too_deep(&self) -> ConditionEvaluationError {
        ConditionEvaluationError::syntax(
            SyntaxErrorKind::NestingTooDeep,
            format!("Condition nesting exceeds maximum depth of {}", self.max_depth),
            self.condition,
        )
    }

    fn unexpected(&self, token: &Token) -> ConditionEvaluationError {
        ConditionEvaluationError::syntax(
            SyntaxErrorKind::UnexpectedToken,
            format!(
                "Unexpected token '{}' at position {}",
                token.text, token.position
            ),
            self.condition,
        )
    }
}
