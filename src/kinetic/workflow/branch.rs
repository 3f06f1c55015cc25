//! Step gating and branch selection on top of condition evaluation

use serde::{Deserialize, Serialize};

use super::condition::{
    evaluate_condition, ConditionEvaluationError, EvaluationOptions, VariableBindings,
};

/// One conditional path out of a branch step
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Branch {
    /// Condition guarding this path
    pub when: String,
    /// Step to continue with when the condition holds
    pub target: String,
}

impl Branch {
    pub fn new(when: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            when: when.into(),
            target: target.into(),
        }
    }
}

/// Whether a step guarded by an optional `when` condition should run
///
/// Steps without a condition always run.
pub fn should_run<B>(
    when: Option<&str>,
    variables: &B,
    options: EvaluationOptions,
) -> Result<bool, ConditionEvaluationError>
where
    B: VariableBindings + ?Sized,
{
    match when {
        None => Ok(true),
        Some(condition) => evaluate_condition(condition, variables, options),
    }
}

/// Pick the first branch whose condition holds, falling back to `default`
pub fn select_branch<'a, B>(
    branches: &'a [Branch],
    default: &'a str,
    variables: &B,
    options: EvaluationOptions,
) -> Result<&'a str, ConditionEvaluationError>
where
    B: VariableBindings + ?Sized,
{
    for branch in branches {
        if evaluate_condition(&branch.when, variables, options)? {
            log::debug!("Branch '{}' selected by '{}'", branch.target, branch.when);
            return Ok(&branch.target);
        }
    }

    log::debug!("No branch matched, using default '{}'", default);
    Ok(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinetic::workflow::condition::ErrorKind;
    use serde_json::json;

    fn routes() -> Vec<Branch> {
        vec![
            Branch::new("${intent} === 'bug' && ${priority} > 3", "escalate"),
            Branch::new("${intent} === 'bug'", "triage"),
            Branch::new("${intent} === 'search'", "search"),
        ]
    }

    #[test]
    fn test_should_run_without_condition() {
        assert!(should_run(None, &json!({}), EvaluationOptions::default()).unwrap());
    }

    #[test]
    fn test_should_run_with_condition() {
        let state = json!({"confidence": 0.9});
        let options = EvaluationOptions::default();
        assert!(should_run(Some("${confidence} > 0.8"), &state, options).unwrap());
        assert!(!should_run(Some("${confidence} > 0.95"), &state, options).unwrap());
    }

    #[test]
    fn test_first_match_wins() {
        let branches = routes();
        let state = json!({"intent": "bug", "priority": 5});
        assert_eq!(
            select_branch(&branches, "done", &state, EvaluationOptions::default()).unwrap(),
            "escalate"
        );

        let state = json!({"intent": "bug", "priority": 1});
        assert_eq!(
            select_branch(&branches, "done", &state, EvaluationOptions::default()).unwrap(),
            "triage"
        );
    }

    #[test]
    fn test_default_when_nothing_matches() {
        let state = json!({"intent": "chat", "priority": 1});
        assert_eq!(
            select_branch(&routes(), "done", &state, EvaluationOptions::default()).unwrap(),
            "done"
        );
    }

    #[test]
    fn test_errors_propagate_unless_suppressed() {
        let state = json!({"priority": 5});
        let err = select_branch(&routes(), "done", &state, EvaluationOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VariableNotFound);

        let options = EvaluationOptions::default().with_throw_on_error(false);
        assert_eq!(
            select_branch(&routes(), "done", &state, options).unwrap(),
            "done"
        );
    }

    #[test]
    fn test_short_circuit_keeps_later_branches_reachable() {
        let state = json!({"intent": "search"});
        assert_eq!(
            select_branch(&routes(), "done", &state, EvaluationOptions::default()).unwrap(),
            "search"
        );
    }

    #[test]
    fn test_branches_from_yaml() {
        let yaml = r#"
            - when: "${score} >= 0.5"
              target: accept
            - when: "true"
              target: reject
        "#;
        let branches: Vec<Branch> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(
            select_branch(&branches, "none", &json!({"score": 0.2}), EvaluationOptions::default())
                .unwrap(),
            "reject"
        );
    }
}
