// SPDX-License-Identifier: MIT

//! Sandboxed condition expressions for kinetic workflows
//!
//! ```
//! use kinetic_condition::{evaluate_condition, EvaluationOptions};
//! use serde_json::json;
//!
//! let state = json!({"A": 10, "B": 5});
//! let hit = evaluate_condition("${A} + ${B} === 15", &state, EvaluationOptions::default());
//! assert_eq!(hit, Ok(true));
//! ```

pub mod kinetic;

pub use kinetic::workflow::branch::{select_branch, should_run, Branch};
pub use kinetic::workflow::condition::{
    evaluate_condition, helpers, substitute_variables, Binding, ConditionEvaluationError,
    ErrorKind, EvaluationOptions, SyntaxErrorKind, Value, VariableBindings,
};
