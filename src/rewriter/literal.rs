//! Literal-span scanner.
//!
//! Splits a query into code and single-quoted literal segments so every
//! rewrite stage can leave literal contents untouched.
//!
//! ```text
//! SELECT * FROM t WHERE a = 'it''s ?' AND b = ?
//! └──── code ─────────────┘└─lit─┘└lit─┘└─ code ─┘
//! ```
//!
//! A doubled quote simply splits into two adjacent literals, which keeps
//! its contents opaque. On dialects with backslash escapes (MySQL) `\'`
//! stays inside the literal. An unterminated literal runs to the end of
//! input.

use crate::dialect::EngineMode;
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{anychar, char},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{pair, tuple},
    IResult,
};

/// One span of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Code(&'a str),
    Literal(&'a str),
}

/// Parse a single-quoted literal, quotes included.
fn parse_literal(input: &str) -> IResult<&str, Segment<'_>> {
    map(
        recognize(tuple((
            char('\''),
            take_while(|c: char| c != '\''),
            opt(char('\'')),
        ))),
        Segment::Literal,
    )(input)
}

/// Parse a single-quoted literal where `\x` is one escaped character.
fn parse_escaped_literal(input: &str) -> IResult<&str, Segment<'_>> {
    map(
        recognize(tuple((
            char('\''),
            many0(alt((
                recognize(pair(char('\\'), anychar)),
                take_while1(|c: char| c != '\'' && c != '\\'),
            ))),
            opt(char('\'')),
        ))),
        Segment::Literal,
    )(input)
}

/// Parse a run of code up to the next quote.
fn parse_code(input: &str) -> IResult<&str, Segment<'_>> {
    map(take_while1(|c: char| c != '\''), Segment::Code)(input)
}

/// Split `query` into code and literal segments for `mode`.
pub fn segments(query: &str, mode: EngineMode) -> Vec<Segment<'_>> {
    let parsed = if mode.dialect().backslash_escapes() {
        many0(alt((parse_escaped_literal, parse_code)))(query)
    } else {
        many0(alt((parse_literal, parse_code)))(query)
    };
    match parsed {
        Ok(("", segments)) => segments,
        // Both parsers consume at least one char, so this only guards the API.
        _ => vec![Segment::Code(query)],
    }
}

/// Rebuild `query`, passing every code segment through `f`.
pub fn map_code<F>(query: &str, mode: EngineMode, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(query.len());
    for segment in segments(query, mode) {
        match segment {
            Segment::Code(code) => out.push_str(&f(code)),
            Segment::Literal(lit) => out.push_str(lit),
        }
    }
    out
}

/// Count `?` markers outside literals.
pub fn count_placeholders(query: &str, mode: EngineMode) -> usize {
    segments(query, mode)
        .iter()
        .map(|segment| match segment {
            Segment::Code(code) => code.matches('?').count(),
            Segment::Literal(_) => 0,
        })
        .sum()
}

/// Replace each `?` marker outside literals with `marker(n)` (1-based).
pub fn number_placeholders<F>(query: &str, mode: EngineMode, mut marker: F) -> String
where
    F: FnMut(usize) -> String,
{
    let mut index = 0;
    map_code(query, mode, |code| {
        let mut out = String::with_capacity(code.len());
        for c in code.chars() {
            if c == '?' {
                index += 1;
                out.push_str(&marker(index));
            } else {
                out.push(c);
            }
        }
        out
    })
}
