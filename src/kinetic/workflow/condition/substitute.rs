//! Textual variable substitution for logs and traces
//!
//! The output is for people to read. It is never fed back into the
//! evaluator; evaluation resolves variables on the AST instead.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::bindings::VariableBindings;
use super::error::ConditionEvaluationError;

/// `${NAME}` or `{{NAME}}`
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").unwrap()
});

/// Replace every variable reference in `condition` with a literal rendering
///
/// Numbers render in decimal form, strings single-quoted, booleans and
/// `null` bare. An unbound variable renders as `undefined`, or fails with
/// the same error evaluation raises when `strict` is set.
pub fn substitute_variables<B>(
    condition: &str,
    variables: &B,
    strict: bool,
) -> Result<String, ConditionEvaluationError>
where
    B: VariableBindings + ?Sized,
{
    let mut result = String::with_capacity(condition.len());
    let mut last = 0;

    for caps in VARIABLE_PATTERN.captures_iter(condition) {
        let (full, name) = match (caps.get(0), variable_name(&caps)) {
            (Some(full), Some(name)) => (full, name),
            _ => continue,
        };

        let rendered = match variables.lookup(name) {
            Some(binding) => binding.render(),
            None if strict => {
                return Err(ConditionEvaluationError::variable_not_found(
                    name, condition,
                ))
            }
            None => "undefined".to_string(),
        };

        result.push_str(&condition[last..full.start()]);
        result.push_str(&rendered);
        last = full.end();
    }

    result.push_str(&condition[last..]);
    log::trace!("Substituted '{}' -> '{}'", condition, result);
    Ok(result)
}

/// True if `text` still contains a variable reference
pub fn has_variables(text: &str) -> bool {
    VARIABLE_PATTERN.is_match(text)
}

fn variable_name<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}
