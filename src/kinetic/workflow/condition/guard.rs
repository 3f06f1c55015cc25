//! Static rejection of forbidden words in raw condition text
//!
//! The grammar has no way to call functions or reach host objects, so this
//! check is a second line only. It runs on the untouched input, before the
//! tokenizer sees it.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::ConditionEvaluationError;

/// Whole-word, case-insensitive forbidden identifiers
static FORBIDDEN_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(eval|function|window|process|require|import|this)\b").unwrap()
});

static FUNCTION_CONSTRUCTOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)new\s+Function").unwrap());

/// Reject `condition` if it contains a forbidden pattern
pub fn check(condition: &str) -> Result<(), ConditionEvaluationError> {
    // Checked first so `new Function(...)` reports the constructor, not the bare word.
    if let Some(m) = FUNCTION_CONSTRUCTOR.find(condition) {
        log::warn!("Rejected condition '{}': found '{}'", condition, m.as_str());
        return Err(ConditionEvaluationError::dangerous_pattern(
            m.as_str(),
            condition,
        ));
    }

    if let Some(m) = FORBIDDEN_WORDS.find(condition) {
        log::warn!("Rejected condition '{}': found '{}'", condition, m.as_str());
        return Err(ConditionEvaluationError::dangerous_pattern(
            m.as_str(),
            condition,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinetic::workflow::condition::error::ErrorKind;

    fn rejected(condition: &str) -> bool {
        matches!(check(condition), Err(e) if e.kind() == ErrorKind::DangerousPattern)
    }

    #[test]
    fn test_rejects_forbidden_words() {
        assert!(rejected("eval(\"x\")"));
        assert!(rejected("window.location === \"x\""));
        assert!(rejected("process.env.X === \"x\""));
        assert!(rejected("require('fs')"));
        assert!(rejected("import('x')"));
        assert!(rejected("this.constructor"));
        assert!(rejected("function() { return 1 }"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(rejected("EVAL(1)"));
        assert!(rejected("Window === 1"));
    }

    #[test]
    fn test_function_constructor() {
        let err = check("new   Function(\"return true\")").unwrap_err();
        assert!(err.message().contains("dangerous pattern"));
        assert!(err.message().contains("new   Function"));
    }

    #[test]
    fn test_whole_word_only() {
        assert!(check("${EVALUATION} === true").is_ok());
        assert!(check("${PROCESS_COUNT} > 2").is_ok());
        assert!(check("${thistle} === \"x\"").is_ok());
    }

    #[test]
    fn test_inside_string_literal_still_rejected() {
        assert!(rejected("${NAME} === \"eval\""));
    }

    #[test]
    fn test_plain_condition_passes() {
        assert!(check("10 > 5 && 5 < 10").is_ok());
    }
}
