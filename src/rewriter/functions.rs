//! Stage 2: canonical function and pagination translation.

use super::literal::map_code;
use crate::dialect::Dialect;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ISNULL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bISNULL\s*\(").expect("static pattern"));
static SUBSTR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bSUBSTR\s*\(").expect("static pattern"));
static FETCH_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bFETCH\s+FIRST\s+(\d+)\s+ROWS?\s+ONLY\b").expect("static pattern")
});

/// Rewrite `ISNULL(`, `SUBSTR(` and `FETCH FIRST n ROWS ONLY` to native forms.
pub fn translate_functions(query: &str, dialect: &dyn Dialect) -> String {
    map_code(query, dialect.mode(), |code| {
        let code = ISNULL.replace_all(code, format!("{}(", dialect.isnull_function()));
        let code = SUBSTR.replace_all(&code, format!("{}(", dialect.substr_function()));
        FETCH_FIRST
            .replace_all(&code, |caps: &Captures| {
                caps[1]
                    .parse::<u64>()
                    .ok()
                    .and_then(|rows| dialect.limit_clause(rows))
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    })
}
