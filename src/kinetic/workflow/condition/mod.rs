// SPDX-License-Identifier: MIT

//! Condition evaluation for workflow steps and branches
//!
//! Conditions are short boolean expressions over workflow variables:
//! - `${intent} === 'search'`
//! - `${confidence} > 0.8`
//! - `(${retries} < 3 && !${aborted}) || {{force}} === true`
//!
//! Evaluation runs in four stages: a guard rejects forbidden words in the
//! raw text, the lexer produces tokens, the parser builds an [`Expression`],
//! and the evaluator walks it, looking variables up as it goes. The grammar
//! has no calls, member access or assignment, so there is nothing for
//! hostile input to reach beyond the bindings it was given.

mod ast;
mod bindings;
mod error;
mod evaluator;
mod guard;
pub mod helpers;
mod lexer;
mod options;
mod parser;
mod substitute;
mod value;

pub use ast::{BinaryOp, Expression, UnaryOp};
pub use bindings::{Binding, VariableBindings};
pub use error::{ConditionEvaluationError, ErrorKind, SyntaxErrorKind};
pub use evaluator::{evaluate, evaluate_condition};
pub use lexer::{tokenize, Operator, Token, TokenKind};
pub use options::EvaluationOptions;
pub use parser::{
    parse, parse_with_depth, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING, MAX_TREE_HEIGHT,
};
pub use substitute::{has_variables, substitute_variables};
pub use value::Value;
