//! Filter evaluation for fixture records
//!
//! Understands `[field, operator, value]` terms combined with the prefix
//! operators `&`, `|` and `!`; top-level terms are joined by an implicit
//! AND. A filter containing anything else matches every record.

use std::cmp::Ordering;
use std::slice;

use list_export::prelude::RecordRow;
use serde_json::Value;

/// Whether `record` satisfies `domain`
pub fn matches(record: &RecordRow, domain: &Value) -> bool {
    let terms = match domain {
        Value::Null => return true,
        Value::Array(terms) => terms,
        other => {
            log::warn!("ignoring filter {other}");
            return true;
        }
    };

    let mut tokens = terms.iter();
    let mut result = true;
    while tokens.len() > 0 {
        match evaluate(record, &mut tokens) {
            Some(matched) => result &= matched,
            None => {
                log::warn!("ignoring filter {domain}");
                return true;
            }
        }
    }
    result
}

/// Evaluate the next expression; `None` when it cannot be interpreted
fn evaluate(record: &RecordRow, tokens: &mut slice::Iter<'_, Value>) -> Option<bool> {
    match tokens.next()? {
        Value::String(op) if op == "&" => {
            let left = evaluate(record, tokens)?;
            let right = evaluate(record, tokens)?;
            Some(left && right)
        }
        Value::String(op) if op == "|" => {
            let left = evaluate(record, tokens)?;
            let right = evaluate(record, tokens)?;
            Some(left || right)
        }
        Value::String(op) if op == "!" => evaluate(record, tokens).map(|matched| !matched),
        Value::Array(parts) => match parts.as_slice() {
            [Value::String(field), Value::String(op), expected] => {
                compare(record.json(field), op, expected)
            }
            _ => None,
        },
        _ => None,
    }
}

/// `None` when the operator or its operand is not understood
fn compare(actual: Option<&Value>, op: &str, expected: &Value) -> Option<bool> {
    let key = actual.map_or(Value::Bool(false), key_of);
    let result = match op {
        "=" | "==" => loose_eq(&key, expected),
        "!=" | "<>" => !loose_eq(&key, expected),
        "in" => expected.as_array()?.iter().any(|x| loose_eq(&key, x)),
        "not in" => !expected.as_array()?.iter().any(|x| loose_eq(&key, x)),
        "<" => ordering(&key, expected) == Some(Ordering::Less),
        "<=" => matches!(
            ordering(&key, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        ">" => ordering(&key, expected) == Some(Ordering::Greater),
        ">=" => matches!(
            ordering(&key, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        "ilike" => {
            let haystack = actual.map(text_of).unwrap_or_default().to_lowercase();
            haystack.contains(&text_of(expected).to_lowercase())
        }
        _ => return None,
    };
    Some(result)
}

/// Comparable part of a stored value: the id of an `[id, name]` pair
fn key_of(value: &Value) -> Value {
    match value {
        Value::Array(pair) if pair.len() == 2 && pair[1].is_string() => pair[0].clone(),
        Value::Null => Value::Bool(false),
        other => other.clone(),
    }
}

/// Searchable text of a stored value: the name of an `[id, name]` pair
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(pair) if pair.len() == 2 && pair[1].is_string() => {
            pair[1].as_str().unwrap_or_default().to_string()
        }
        Value::Null | Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn ordering(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
