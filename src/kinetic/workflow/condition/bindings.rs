// SPDX-License-Identifier: MIT

//! Variable bindings supplied by the workflow executor

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use super::value::{format_number, quote_single, Value};

/// A bound variable, borrowed from the caller's store
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding<'a> {
    /// Host JSON value, converted on use
    Json(&'a serde_json::Value),
    /// Value already in condition form
    Value(&'a Value),
}

impl Binding<'_> {
    /// Convert into a condition value; `Err` carries the unsupported host type name
    pub fn to_value(&self) -> Result<Value, &'static str> {
        match self {
            Binding::Value(v) => Ok((*v).clone()),
            Binding::Json(json) => Value::from_json(json).ok_or(match json {
                serde_json::Value::Array(_) => "array",
                _ => "object",
            }),
        }
    }

    /// Literal text used by textual substitution
    pub fn render(&self) -> String {
        match self {
            Binding::Value(v) => v.to_string(),
            Binding::Json(json) => match json {
                serde_json::Value::Null => "null".to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => match n.as_f64() {
                    Some(f) if n.is_f64() => format_number(f),
                    _ => n.to_string(),
                },
                serde_json::Value::String(s) => quote_single(s),
                other => other.to_string(),
            },
        }
    }
}

/// Read-only lookup of workflow variables by case-sensitive name
pub trait VariableBindings {
    fn lookup(&self, name: &str) -> Option<Binding<'_>>;
}

impl<S: BuildHasher> VariableBindings for HashMap<String, serde_json::Value, S> {
    fn lookup(&self, name: &str) -> Option<Binding<'_>> {
        self.get(name).map(Binding::Json)
    }
}

impl VariableBindings for BTreeMap<String, serde_json::Value> {
    fn lookup(&self, name: &str) -> Option<Binding<'_>> {
        self.get(name).map(Binding::Json)
    }
}

impl VariableBindings for serde_json::Map<String, serde_json::Value> {
    fn lookup(&self, name: &str) -> Option<Binding<'_>> {
        self.get(name).map(Binding::Json)
    }
}

/// Only JSON objects bind anything
impl VariableBindings for serde_json::Value {
    fn lookup(&self, name: &str) -> Option<Binding<'_>> {
        self.as_object().and_then(|obj| obj.get(name)).map(Binding::Json)
    }
}

impl<S: BuildHasher> VariableBindings for HashMap<String, Value, S> {
    fn lookup(&self, name: &str) -> Option<Binding<'_>> {
        self.get(name).map(Binding::Value)
    }
}

impl<T: VariableBindings + ?Sized> VariableBindings for &T {
    fn lookup(&self, name: &str) -> Option<Binding<'_>> {
        (**self).lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_object_lookup() {
        let vars = json!({"COUNT": 3, "NAME": "build"});
        assert_eq!(
            vars.lookup("COUNT").map(|b| b.to_value()),
            Some(Ok(Value::Number(3.0)))
        );
        assert!(vars.lookup("count").is_none());
        assert!(json!([1, 2]).lookup("0").is_none());
    }

    #[test]
    fn test_unsupported_host_values() {
        let mut vars = HashMap::new();
        vars.insert("TAGS".to_string(), json!(["a"]));
        vars.insert("META".to_string(), json!({"k": 1}));
        assert_eq!(vars.lookup("TAGS").unwrap().to_value(), Err("array"));
        assert_eq!(vars.lookup("META").unwrap().to_value(), Err("object"));
    }

    #[test]
    fn test_explicit_undefined() {
        let mut vars: HashMap<String, Value> = HashMap::new();
        vars.insert("LATER".to_string(), Value::Undefined);
        assert_eq!(
            vars.lookup("LATER").unwrap().to_value(),
            Ok(Value::Undefined)
        );
    }

    #[test]
    fn test_render() {
        assert_eq!(Binding::Json(&json!(10)).render(), "10");
        assert_eq!(Binding::Json(&json!(2.5)).render(), "2.5");
        assert_eq!(Binding::Json(&json!("test")).render(), "'test'");
        assert_eq!(Binding::Json(&json!(true)).render(), "true");
        assert_eq!(Binding::Json(&json!(null)).render(), "null");
        assert_eq!(Binding::Json(&json!(["a", 1])).render(), r#"["a",1]"#);
        assert_eq!(Binding::Value(&Value::Undefined).render(), "undefined");
    }
}
