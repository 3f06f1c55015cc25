//! Typed errors for condition evaluation
//!
//! Every failure, whatever stage produced it, surfaces as a single
//! [`ConditionEvaluationError`] that carries the original condition text.

use std::fmt;
use thiserror::Error;

/// Which stage rejected a condition, and why
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Blank or whitespace-only input
    EmptyCondition,
    /// Rejected by the security guard before tokenizing
    DangerousPattern,
    /// Tokenizer or parser could not build an AST
    Syntax(SyntaxErrorKind),
    /// Strict-mode lookup of an unbound variable
    VariableNotFound,
    /// Operator applied to operands it does not support
    TypeError,
    /// Valid expression whose final value is not a boolean
    NonBooleanResult,
    /// Binding holds a host value with no condition counterpart (array, object)
    UnsupportedValue,
}

/// Finer classification of syntax errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnterminatedString,
    UnexpectedCharacter,
    UnexpectedToken,
    UnexpectedEnd,
    NestingTooDeep,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::EmptyCondition => write!(f, "empty condition"),
            ErrorKind::DangerousPattern => write!(f, "dangerous pattern"),
            ErrorKind::Syntax(kind) => write!(f, "syntax error ({kind:?})"),
            ErrorKind::VariableNotFound => write!(f, "variable not found"),
            ErrorKind::TypeError => write!(f, "type error"),
            ErrorKind::NonBooleanResult => write!(f, "non-boolean result"),
            ErrorKind::UnsupportedValue => write!(f, "unsupported value"),
        }
    }
}

/// Error raised while checking, parsing or evaluating a condition
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ConditionEvaluationError {
    message: String,
    condition: String,
    kind: ErrorKind,
}

impl ConditionEvaluationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            condition: condition.into(),
            kind,
        }
    }

    pub fn empty(condition: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::EmptyCondition,
            "Condition cannot be empty",
            condition,
        )
    }

    pub fn dangerous_pattern(pattern: &str, condition: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::DangerousPattern,
            format!("Condition contains dangerous pattern: {pattern}"),
            condition,
        )
    }

    pub fn syntax(
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::Syntax(kind), message, condition)
    }

    pub fn variable_not_found(name: &str, condition: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::VariableNotFound,
            format!("Variable not found: {name}"),
            condition,
        )
    }

    pub fn type_error(message: impl Into<String>, condition: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message, condition)
    }

    pub fn non_boolean(type_name: &str, condition: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::NonBooleanResult,
            format!("Condition must evaluate to boolean, got {type_name}"),
            condition,
        )
    }

    pub fn unsupported_value(name: &str, type_name: &str, condition: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::UnsupportedValue,
            format!("Variable {name} holds an unsupported {type_name} value"),
            condition,
        )
    }

    /// Human-readable description of the failure
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The condition text exactly as the caller supplied it
    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}
