// SPDX-License-Identifier: MIT

//! Evaluation policy knobs

use serde::{Deserialize, Serialize};

use super::parser::DEFAULT_MAX_DEPTH;

/// Options for [`evaluate_condition`](super::evaluate_condition)
///
/// Deserializes with every field optional, so a workflow file can embed
/// just the knobs it changes:
///
/// ```yaml
/// condition_options:
///   strict_mode: false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Unbound variables are errors (true) or resolve to `undefined` (false)
    pub strict_mode: bool,
    /// Propagate errors (true) or report them as a `false` result (false)
    pub throw_on_error: bool,
    /// Maximum parenthesis / `!` nesting, clamped to
    /// [`MAX_DEPTH_CEILING`](super::MAX_DEPTH_CEILING) when parsing
    pub max_depth: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            strict_mode: true,
            throw_on_error: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvaluationOptions {
    /// Non-strict and non-throwing: unknown variables are `undefined`, errors are `false`
    pub fn lenient() -> Self {
        Self {
            strict_mode: false,
            throw_on_error: false,
            ..Self::default()
        }
    }

    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    pub fn with_throw_on_error(mut self, throw_on_error: bool) -> Self {
        self.throw_on_error = throw_on_error;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EvaluationOptions::default();
        assert!(options.strict_mode);
        assert!(options.throw_on_error);
        assert_eq!(options.max_depth, 64);
    }

    #[test]
    fn test_partial_yaml() {
        let options: EvaluationOptions = serde_yaml::from_str("strict_mode: false").unwrap();
        assert!(!options.strict_mode);
        assert!(options.throw_on_error);
        assert_eq!(options.max_depth, 64);
    }

    #[test]
    fn test_builders() {
        let options = EvaluationOptions::default()
            .with_strict_mode(false)
            .with_max_depth(8);
        assert!(!options.strict_mode);
        assert_eq!(options.max_depth, 8);
        assert_eq!(
            EvaluationOptions::lenient(),
            EvaluationOptions::default()
                .with_strict_mode(false)
                .with_throw_on_error(false)
        );
    }
}
