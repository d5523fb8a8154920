//! Stage 6: null policy and literal substitution.

use super::literal::map_code;
use crate::dialect::EngineMode;
use crate::value::Value;

/// Coerce nulls to empty strings unless native NULLs are allowed.
pub fn apply_null_policy(params: Vec<Value>, allow_nulls: bool) -> Vec<Value> {
    if allow_nulls {
        return params;
    }
    params
        .into_iter()
        .map(|value| match value {
            Value::Null => Value::String(String::new()),
            other => other,
        })
        .collect()
}

/// Render one value as an inline SQL literal.
pub fn literal(value: &Value, quote: &dyn Fn(&str) -> String) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::String(s) => quote(s),
    }
}

/// Substitute every `?` outside literals with its quoted value.
///
/// Markers beyond the end of `params` are left in place.
pub fn prepare(
    query: &str,
    params: &[Value],
    mode: EngineMode,
    quote: &dyn Fn(&str) -> String,
) -> String {
    let mut values = params.iter();
    map_code(query, mode, |code| {
        let mut out = String::with_capacity(code.len());
        for c in code.chars() {
            if c != '?' {
                out.push(c);
                continue;
            }
            match values.next() {
                Some(value) => out.push_str(&literal(value, quote)),
                None => out.push('?'),
            }
        }
        out
    })
}
