//! Stages 4 and 5: named-marker normalization and list expansion.

use super::literal::{Segment, count_placeholders, map_code, segments};
use crate::dialect::EngineMode;
use crate::error::{SqlError, SqlResult};
use crate::value::{Param, Params, Value};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NAMED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?[A-Za-z0-9_]").expect("static pattern"));
static ANY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?([A-Za-z0-9_]+)?").expect("static pattern"));
static IN_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(NOT\s+)?IN\s*$").expect("static pattern"));
static IN_KEYWORD_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(NOT\s+)?IN\s*\(\s*$").expect("static pattern"));

/// Turn `?name` markers into bare `?` and order the parameters to match.
///
/// Without any named marker the positional list is returned unchanged.
/// Otherwise each bare `?` takes the next positional value and each
/// `?name` takes the named value, in marker order.
pub fn normalize_named(
    query: &str,
    params: Params,
    mode: EngineMode,
) -> SqlResult<(String, Vec<Param>)> {
    let (positional, named) = params.into_parts();
    let has_named = segments(query, mode)
        .iter()
        .any(|segment| matches!(segment, Segment::Code(code) if NAMED_MARKER.is_match(code)));
    if !has_named {
        return Ok((query.to_string(), positional));
    }

    let mut positional = positional.into_iter();
    let mut ordered = Vec::new();
    let mut missing: Option<String> = None;

    let query = map_code(query, mode, |code| {
        ANY_MARKER
            .replace_all(code, |caps: &Captures| {
                match caps.get(1) {
                    Some(name) => match named.get(name.as_str()) {
                        Some(param) => ordered.push(param.clone()),
                        None => {
                            missing.get_or_insert_with(|| name.as_str().to_string());
                        }
                    },
                    None => ordered.extend(positional.next()),
                }
                "?".to_string()
            })
            .into_owned()
    });

    if let Some(name) = missing {
        return Err(SqlError::invalid(format!(
            "named parameter '{name}' was not supplied"
        )));
    }

    // Unconsumed positional values surface as a parity error in stage 5.
    ordered.extend(positional);
    Ok((query, ordered))
}

/// Expand list parameters and return the flat, one-per-marker list.
///
/// A list of two or more values becomes `(?,?,...)`. A single-value list
/// stays one marker and turns a preceding `IN`/`NOT IN` into `=`/`<>`.
/// An empty list is treated as `[false]`.
pub fn expand_lists(
    query: &str,
    params: Vec<Param>,
    mode: EngineMode,
) -> SqlResult<(String, Vec<Value>)> {
    let placeholders = count_placeholders(query, mode);
    let supplied = params.len();
    if placeholders != supplied {
        return Err(SqlError::PlaceholderMismatch {
            placeholders,
            params: supplied,
        });
    }

    let mut params = params.into_iter();
    let mut flat = Vec::with_capacity(supplied);
    let mut out = String::with_capacity(query.len());

    for segment in segments(query, mode) {
        match segment {
            Segment::Literal(lit) => out.push_str(lit),
            Segment::Code(code) => {
                let mut rest = code;
                while let Some(pos) = rest.find('?') {
                    out.push_str(&rest[..pos]);
                    rest = &rest[pos + 1..];
                    match params.next() {
                        Some(Param::Value(value)) => {
                            out.push('?');
                            flat.push(value);
                        }
                        Some(Param::List(values)) => {
                            rest = expand_list(values, rest, &mut out, &mut flat);
                        }
                        None => out.push('?'),
                    }
                }
                out.push_str(rest);
            }
        }
    }

    let expanded = count_placeholders(&out, mode);
    if expanded != flat.len() {
        return Err(SqlError::PlaceholderMismatch {
            placeholders: expanded,
            params: flat.len(),
        });
    }

    Ok((out, flat))
}

/// Emit the markers for one list parameter; returns the unconsumed query text.
fn expand_list<'q>(
    values: Vec<Value>,
    rest: &'q str,
    out: &mut String,
    flat: &mut Vec<Value>,
) -> &'q str {
    let values = if values.is_empty() {
        tracing::warn!("empty list parameter bound as a single false value");
        vec![Value::Bool(false)]
    } else {
        values
    };

    let after = rest.trim_start();
    let wrapped = after.starts_with(')') && out.trim_end().ends_with('(');

    if values.len() == 1 {
        let keyword = if wrapped { &IN_KEYWORD_PAREN } else { &IN_KEYWORD };
        let found = keyword
            .captures(out.as_str())
            .and_then(|caps| Some((caps.get(0)?.start(), caps.get(1).is_some())));
        emit_single(values, found, out, flat);
        return match found {
            Some(_) if wrapped => &after[1..],
            _ => rest,
        };
    }

    let rest = if wrapped {
        let trimmed = out.trim_end().len();
        out.truncate(trimmed - 1);
        &after[1..]
    } else {
        rest
    };

    out.push('(');
    out.push_str(&vec!["?"; values.len()].join(","));
    out.push(')');
    flat.extend(values);
    rest
}

fn emit_single(
    values: Vec<Value>,
    keyword: Option<(usize, bool)>,
    out: &mut String,
    flat: &mut Vec<Value>,
) {
    if let Some((start, negated)) = keyword {
        out.truncate(start);
        out.push_str(if negated { "<> " } else { "= " });
    }
    out.push('?');
    flat.extend(values);
}
