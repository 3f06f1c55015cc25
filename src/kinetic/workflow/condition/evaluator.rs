//! Condition expression evaluator

use super::ast::{BinaryOp, Expression, UnaryOp};
use super::bindings::VariableBindings;
use super::error::ConditionEvaluationError;
use super::guard;
use super::options::EvaluationOptions;
use super::parser::parse_with_depth;
use super::value::Value;

/// Check, parse and evaluate `condition` against `variables`
///
/// With `throw_on_error` disabled every failure, including strict-mode
/// lookups of unbound variables, is logged and reported as `Ok(false)`.
pub fn evaluate_condition<B>(
    condition: &str,
    variables: &B,
    options: EvaluationOptions,
) -> Result<bool, ConditionEvaluationError>
where
    B: VariableBindings + ?Sized,
{
    match check_and_evaluate(condition, variables, options) {
        Ok(result) => {
            log::debug!("Condition '{}' evaluated to {}", condition, result);
            Ok(result)
        }
        Err(e) if !options.throw_on_error => {
            log::warn!(
                "Condition '{}' failed to evaluate, treating as false: {}",
                condition,
                e
            );
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn check_and_evaluate<B>(
    condition: &str,
    variables: &B,
    options: EvaluationOptions,
) -> Result<bool, ConditionEvaluationError>
where
    B: VariableBindings + ?Sized,
{
    if condition.trim().is_empty() {
        return Err(ConditionEvaluationError::empty(condition));
    }

    guard::check(condition)?;
    let expr = parse_with_depth(condition, options.max_depth)?;

    let value = evaluate(&expr, variables, options.strict_mode, condition)?;
    value
        .as_bool()
        .ok_or_else(|| ConditionEvaluationError::non_boolean(value.type_name(), condition))
}

/// Evaluate a parsed expression to a value
///
/// `condition` is only used to label errors.
pub fn evaluate<B>(
    expr: &Expression,
    variables: &B,
    strict_mode: bool,
    condition: &str,
) -> Result<Value, ConditionEvaluationError>
where
    B: VariableBindings + ?Sized,
{
    Evaluator {
        variables,
        strict_mode,
        condition,
    }
    .eval(expr)
}

struct Evaluator<'a, B: ?Sized> {
    variables: &'a B,
    strict_mode: bool,
    condition: &'a str,
}

impl<B: VariableBindings + ?Sized> Evaluator<'_, B> {
    fn eval(&self, expr: &Expression) -> Result<Value, ConditionEvaluationError> {
        match expr {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Variable(name) => self.resolve(name),
            Expression::Unary { op, operand } => self.eval_unary(*op, operand),
            Expression::Binary { op, left, right } => self.eval_binary(*op, left, right),
        }
    }

    fn resolve(&self, name: &str) -> Result<Value, ConditionEvaluationError> {
        match self.variables.lookup(name) {
            Some(binding) => binding.to_value().map_err(|type_name| {
                ConditionEvaluationError::unsupported_value(name, type_name, self.condition)
            }),
            None if self.strict_mode => Err(ConditionEvaluationError::variable_not_found(
                name,
                self.condition,
            )),
            None => Ok(Value::Undefined),
        }
    }

    fn eval_unary(
        &self,
        op: UnaryOp,
        operand: &Expression,
    ) -> Result<Value, ConditionEvaluationError> {
        match op {
            UnaryOp::Not => match self.eval(operand)? {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(ConditionEvaluationError::type_error(
                    format!(
                        "Operator '{op}' requires a boolean operand, got {}",
                        other.type_name()
                    ),
                    self.condition,
                )),
            },
        }
    }

    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
    ) -> Result<Value, ConditionEvaluationError> {
        match op {
            // `&&` / `||` short-circuit: the right side is only evaluated when needed.
            BinaryOp::And => Ok(Value::Bool(
                self.eval_bool(op, left)? && self.eval_bool(op, right)?,
            )),
            BinaryOp::Or => Ok(Value::Bool(
                self.eval_bool(op, left)? || self.eval_bool(op, right)?,
            )),
            BinaryOp::Eq => {
                let (lhs, rhs) = (self.eval(left)?, self.eval(right)?);
                Ok(Value::Bool(lhs.strict_eq(&rhs)))
            }
            BinaryOp::NotEq => {
                let (lhs, rhs) = (self.eval(left)?, self.eval(right)?);
                Ok(Value::Bool(!lhs.strict_eq(&rhs)))
            }
            BinaryOp::Gt | BinaryOp::Gte | BinaryOp::Lt | BinaryOp::Lte => {
                let (a, b) = self.numbers(op, left, right)?;
                Ok(Value::Bool(compare(op, a, b)))
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                let (a, b) = self.numbers(op, left, right)?;
                Ok(Value::Number(arithmetic(op, a, b)))
            }
        }
    }

    fn eval_bool(&self, op: BinaryOp, expr: &Expression) -> Result<bool, ConditionEvaluationError> {
        let value = self.eval(expr)?;
        value.as_bool().ok_or_else(|| {
            ConditionEvaluationError::type_error(
                format!(
                    "Operator '{op}' requires boolean operands, got {}",
                    value.type_name()
                ),
                self.condition,
            )
        })
    }

    fn numbers(
        &self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
    ) -> Result<(f64, f64), ConditionEvaluationError> {
        let (lhs, rhs) = (self.eval(left)?, self.eval(right)?);
        match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(ConditionEvaluationError::type_error(
                format!(
                    "Operator '{op}' requires number operands, got {} and {}",
                    lhs.type_name(),
                    rhs.type_name()
                ),
                self.condition,
            )),
        }
    }
}

fn compare(op: BinaryOp, a: f64, b: f64) -> bool {
    match op {
        BinaryOp::Gt => a > b,
        BinaryOp::Gte => a >= b,
        BinaryOp::Lt => a < b,
        _ => a <= b,
    }
}

fn arithmetic(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        _ => a / b,
    }
}
