// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree for condition expressions
//!
//! The node set is closed: there is no call, member access or assignment
//! node, so no parse of any input can express one.

use super::value::Value;

/// A condition expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Number, string, boolean, null or undefined literal
    Literal(Value),
    /// `${NAME}` / `{{NAME}}` reference
    Variable(String),
    /// Prefix operator
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    /// Infix operator
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// !
    Not,
}

/// Infix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// ||
    Or,
    /// &&
    And,
    /// ===
    Eq,
    /// !==
    NotEq,
    /// >
    Gt,
    /// >=
    Gte,
    /// <
    Lt,
    /// <=
    Lte,
    /// +
    Add,
    /// -
    Sub,
    /// *
    Mul,
    /// /
    Div,
}

impl BinaryOp {
    /// Binding strength, higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::NotEq => 3,
            BinaryOp::Gt | BinaryOp::Gte | BinaryOp::Lt | BinaryOp::Lte => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div => 6,
        }
    }
}

impl Expression {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn not(operand: Expression) -> Self {
        Expression::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Or => write!(f, "||"),
            BinaryOp::And => write!(f, "&&"),
            BinaryOp::Eq => write!(f, "==="),
            BinaryOp::NotEq => write!(f, "!=="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::Gte => write!(f, ">="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Lte => write!(f, "<="),
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
        }
    }
}

/// Fully parenthesized rendering, handy when tracing how a condition parsed
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(v) => write!(f, "{v}"),
            Expression::Variable(name) => write!(f, "${{{name}}}"),
            Expression::Unary { op, operand } => write!(f, "{op}{operand}"),
            Expression::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}
