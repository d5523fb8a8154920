//! Stage 1: identifier-quote translation.

use super::literal::map_code;
use crate::dialect::EngineMode;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// One span pattern per mode, matching `open content close`.
static QUOTE_SPANS: Lazy<Vec<(EngineMode, Regex)>> = Lazy::new(|| {
    EngineMode::ALL
        .iter()
        .map(|mode| {
            let (open, close) = mode.dialect().quote_pair();
            let (o, c) = (
                regex::escape(&open.to_string()),
                regex::escape(&close.to_string()),
            );
            let pattern = format!(r"{o}([^{o}{c}\r\n]+){c}");
            (*mode, Regex::new(&pattern).expect("static quote pattern"))
        })
        .collect()
});

/// Rewrite every other dialect's quoted identifiers to `mode`'s quotes.
pub fn translate_quotes(query: &str, mode: EngineMode) -> String {
    let (cur_open, cur_close) = mode.dialect().quote_pair();
    let mut checked = vec![(cur_open, cur_close)];
    let mut query = query.to_string();

    for (other, pattern) in QUOTE_SPANS.iter() {
        let pair = other.dialect().quote_pair();
        if checked.contains(&pair) {
            continue;
        }
        checked.push(pair);

        query = map_code(&query, mode, |code| {
            pattern
                .replace_all(code, |caps: &Captures| {
                    let content = &caps[1];
                    // Numeric subscripts such as arr[1] are not identifiers.
                    if content.chars().all(|c| c.is_ascii_digit()) {
                        caps[0].to_string()
                    } else {
                        format!("{cur_open}{content}{cur_close}")
                    }
                })
                .into_owned()
        });
    }

    query
}
