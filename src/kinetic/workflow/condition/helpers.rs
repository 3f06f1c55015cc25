//! Standalone predicates over workflow values
//!
//! These work on host JSON values directly and never go through the parser.
//! Arguments are `Option<&serde_json::Value>` so the result of a map lookup
//! can be passed straight in; `None` plays the role of `undefined`.
//!
//! **Equality here is loose.** [`eq`] and [`ne`] coerce across kinds the way
//! JavaScript's `==` does: `eq(5, "5")` and
//! `eq(null, undefined)` are both true. Inside condition expressions `===`
//! is strict and the same comparisons are false. Do not mix the two up when
//! porting a check from one form to the other.
//!
//! None of these functions fail: a type mismatch is simply `false`.

use serde_json::Value as Json;

use super::value::format_number;

/// Loose equality with cross-kind coercion
///
/// `null` and `undefined` equal each other and nothing else. Between a
/// number and a string the string is converted to a number; booleans become
/// `1`/`0`; arrays and objects compare against primitives through their
/// string form (`[1,2]` is `"1,2"`). Two arrays or two objects compare
/// structurally.
pub fn eq(a: Option<&Json>, b: Option<&Json>) -> bool {
    match (a, b) {
        (None | Some(Json::Null), None | Some(Json::Null)) => true,
        (None | Some(Json::Null), _) | (_, None | Some(Json::Null)) => false,
        (Some(x), Some(y)) => loose_eq(x, y),
    }
}

pub fn ne(a: Option<&Json>, b: Option<&Json>) -> bool {
    !eq(a, b)
}

pub fn gt(a: Option<&Json>, b: Option<&Json>) -> bool {
    compare_numbers(a, b, |x, y| x > y)
}

pub fn lt(a: Option<&Json>, b: Option<&Json>) -> bool {
    compare_numbers(a, b, |x, y| x < y)
}

pub fn gte(a: Option<&Json>, b: Option<&Json>) -> bool {
    compare_numbers(a, b, |x, y| x >= y)
}

pub fn lte(a: Option<&Json>, b: Option<&Json>) -> bool {
    compare_numbers(a, b, |x, y| x <= y)
}

/// `0`, `""`, `null`, `undefined` and `false` are falsy; everything else,
/// empty arrays and objects included, is truthy
pub fn truthy(value: Option<&Json>) -> bool {
    match value {
        None | Some(Json::Null) => false,
        Some(Json::Bool(b)) => *b,
        Some(Json::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Json::String(s)) => !s.is_empty(),
        Some(Json::Array(_)) | Some(Json::Object(_)) => true,
    }
}

pub fn falsy(value: Option<&Json>) -> bool {
    !truthy(value)
}

pub fn is_null_or_undefined(value: Option<&Json>) -> bool {
    matches!(value, None | Some(Json::Null))
}

/// Substring test for strings, membership test for arrays, `false` otherwise
///
/// A non-string needle is searched for in its string form. Array membership
/// compares numbers numerically and everything else structurally.
pub fn contains(container: Option<&Json>, item: Option<&Json>) -> bool {
    match container {
        Some(Json::String(haystack)) => haystack.contains(to_js_string(item).as_str()),
        Some(Json::Array(items)) => match item {
            Some(needle) => items.iter().any(|candidate| same_value(candidate, needle)),
            None => false,
        },
        _ => false,
    }
}

fn compare_numbers<F>(a: Option<&Json>, b: Option<&Json>, cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (a.and_then(Json::as_f64), b.and_then(Json::as_f64)) {
        (Some(x), Some(y)) => cmp(x, y),
        _ => false,
    }
}

/// Primitive a non-null value reduces to for mixed-kind comparison
enum Primitive {
    Number(f64),
    Text(String),
}

fn to_primitive(value: &Json) -> Primitive {
    match value {
        Json::Bool(b) => Primitive::Number(if *b { 1.0 } else { 0.0 }),
        Json::Number(n) => Primitive::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Primitive::Text(s.clone()),
        other => Primitive::Text(to_js_string(Some(other))),
    }
}

fn loose_eq(x: &Json, y: &Json) -> bool {
    match (x, y) {
        (Json::Number(_), Json::Number(_)) => x.as_f64() == y.as_f64(),
        (Json::String(a), Json::String(b)) => a == b,
        (Json::Bool(a), Json::Bool(b)) => a == b,
        (Json::Array(_) | Json::Object(_), Json::Array(_) | Json::Object(_)) => {
            same_value(x, y)
        }
        _ => match (to_primitive(x), to_primitive(y)) {
            (Primitive::Number(a), Primitive::Number(b)) => a == b,
            (Primitive::Text(a), Primitive::Text(b)) => a == b,
            (Primitive::Number(n), Primitive::Text(s))
            | (Primitive::Text(s), Primitive::Number(n)) => n == string_to_number(&s),
        },
    }
}

/// Structural equality where numbers compare by value (`1` equals `1.0`)
fn same_value(x: &Json, y: &Json) -> bool {
    match (x, y) {
        (Json::Number(a), Json::Number(b)) => a.as_f64() == b.as_f64(),
        (Json::Array(a), Json::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(l, r)| same_value(l, r))
        }
        (Json::Object(a), Json::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| same_value(v, other)))
        }
        _ => x == y,
    }
}

/// String conversion used by coercion (`[1,[2]]` is `"1,2"`, objects are opaque)
fn to_js_string(value: Option<&Json>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Json::Null) => "null".to_string(),
        Some(Json::Bool(b)) => b.to_string(),
        Some(Json::Number(n)) => n
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| n.to_string()),
        Some(Json::String(s)) => s.clone(),
        Some(Json::Array(items)) => items
            .iter()
            .map(|item| match item {
                Json::Null => String::new(),
                other => to_js_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Json::Object(_)) => "[object Object]".to_string(),
    }
}

/// Numeric reading of a string: blank is `0`, anything unparseable is `NaN`
fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    // Rust also accepts "inf" and "nan"; only plain decimal notation counts here.
    let decimal = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !decimal {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn j(value: Json) -> Option<Json> {
        Some(value)
    }

    #[test]
    fn test_eq_is_loose() {
        assert!(eq(j(json!(5)).as_ref(), j(json!("5")).as_ref()));
        assert!(eq(j(json!(1)).as_ref(), j(json!(true)).as_ref()));
        assert!(eq(j(json!(0)).as_ref(), j(json!("")).as_ref()));
        assert!(eq(j(json!("1,2")).as_ref(), j(json!([1, 2])).as_ref()));
        assert!(eq(j(json!(0)).as_ref(), j(json!([])).as_ref()));
        assert!(eq(None, j(json!(null)).as_ref()));
        assert!(eq(j(json!(2.0)).as_ref(), j(json!(2)).as_ref()));
        assert!(!eq(j(json!(null)).as_ref(), j(json!(0)).as_ref()));
        assert!(!eq(None, j(json!(false)).as_ref()));
        assert!(!eq(j(json!("abc")).as_ref(), j(json!(0)).as_ref()));
        assert!(!eq(j(json!("true")).as_ref(), j(json!(true)).as_ref()));
        assert!(ne(j(json!("a")).as_ref(), j(json!("b")).as_ref()));
    }

    #[test]
    fn test_eq_hex_and_whitespace_strings() {
        assert!(eq(j(json!(16)).as_ref(), j(json!("0x10")).as_ref()));
        assert!(eq(j(json!(3)).as_ref(), j(json!("  3  ")).as_ref()));
        assert!(!eq(j(json!(0)).as_ref(), j(json!("nan")).as_ref()));
    }

    #[test]
    fn test_numeric_comparisons() {
        let five = json!(5);
        let three = json!(3.0);
        assert!(gt(Some(&five), Some(&three)));
        assert!(gte(Some(&five), Some(&five)));
        assert!(lt(Some(&three), Some(&five)));
        assert!(lte(Some(&three), Some(&three)));
    }

    #[test]
    fn test_comparisons_reject_non_numbers() {
        let five = json!(5);
        let text = json!("10");
        assert!(!gt(Some(&text), Some(&five)));
        assert!(!lt(Some(&five), Some(&text)));
        assert!(!gte(None, Some(&five)));
        assert!(!lte(Some(&json!(null)), Some(&five)));
    }

    #[test]
    fn test_truthiness() {
        for value in [json!(0), json!(""), json!(null), json!(false)] {
            assert!(falsy(Some(&value)), "{value} should be falsy");
        }
        assert!(falsy(None));

        for value in [json!(1), json!("0"), json!(true), json!([]), json!({})] {
            assert!(truthy(Some(&value)), "{value} should be truthy");
        }
    }

    #[test]
    fn test_is_null_or_undefined() {
        assert!(is_null_or_undefined(None));
        assert!(is_null_or_undefined(Some(&json!(null))));
        assert!(!is_null_or_undefined(Some(&json!(0))));
        assert!(!is_null_or_undefined(Some(&json!(""))));
    }

    #[test]
    fn test_contains_string() {
        let message = json!("hello world");
        assert!(contains(Some(&message), Some(&json!("world"))));
        assert!(!contains(Some(&message), Some(&json!("foo"))));
        assert!(contains(Some(&json!("v2 build")), Some(&json!(2))));
    }

    #[test]
    fn test_contains_array() {
        let tags = json!(["bug", "urgent", 3]);
        assert!(contains(Some(&tags), Some(&json!("bug"))));
        assert!(contains(Some(&tags), Some(&json!(3.0))));
        assert!(!contains(Some(&tags), Some(&json!("3"))));
        assert!(!contains(Some(&tags), None));
    }

    #[test]
    fn test_contains_other_containers() {
        let obj = json!({"bug": true});
        assert!(!contains(Some(&obj), Some(&json!("bug"))));
        assert!(!contains(Some(&json!(42)), Some(&json!(4))));
        assert!(!contains(None, Some(&json!("x"))));
    }

    #[test]
    fn test_helpers_take_map_lookups() {
        let state = json!({"RETRIES": 0, "STATUS": "done"});
        let obj = state.as_object().unwrap();
        assert!(falsy(obj.get("RETRIES")));
        assert!(eq(obj.get("STATUS"), Some(&json!("done"))));
        assert!(is_null_or_undefined(obj.get("MISSING")));
    }
}
