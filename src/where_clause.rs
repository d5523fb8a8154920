//! WHERE / ORDER BY / field-list builders.
//!
//! Builders emit engine-quoted identifiers and bare `?` markers; the
//! parameters come back alongside in marker order.

use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;

/// A comparison applied to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(Value),
    NotEqualTo(Value),
    LessThan(Value),
    GreaterThan(Value),
    /// Also spelled `NotLessThan`.
    GreaterThanOrEqualTo(Value),
    NotGreaterThan(Value),
    Like(Value),
    NotLike(Value),
    Between(Value, Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
}

impl Condition {
    pub fn not_less_than(value: impl Into<Value>) -> Self {
        Condition::GreaterThanOrEqualTo(value.into())
    }

    pub fn between(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Condition::Between(low.into(), high.into())
    }

    /// Build a condition from an operator tag and its operands.
    ///
    /// Tags are matched case-insensitively; both symbolic (`>=`) and named
    /// (`not_less_than`) spellings are accepted.
    pub fn from_tag(tag: &str, operands: Vec<Value>) -> SqlResult<Self> {
        let tag = tag.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        let single = |operands: Vec<Value>| -> SqlResult<Value> {
            let mut operands = operands.into_iter();
            match (operands.next(), operands.next()) {
                (Some(value), None) => Ok(value),
                _ => Err(SqlError::invalid(format!(
                    "operator '{tag}' takes exactly one operand"
                ))),
            }
        };

        let condition = match tag.as_str() {
            "=" | "equals" => Condition::Equals(single(operands)?),
            "<>" | "!=" | "not_equal_to" => Condition::NotEqualTo(single(operands)?),
            "<" | "less_than" => Condition::LessThan(single(operands)?),
            ">" | "greater_than" => Condition::GreaterThan(single(operands)?),
            ">=" | "greater_than_or_equal_to" | "not_less_than" => {
                Condition::GreaterThanOrEqualTo(single(operands)?)
            }
            "<=" | "not_greater_than" => Condition::NotGreaterThan(single(operands)?),
            "like" => Condition::Like(single(operands)?),
            "not_like" => Condition::NotLike(single(operands)?),
            "between" => match <[Value; 2]>::try_from(operands) {
                Ok([low, high]) => Condition::Between(low, high),
                Err(_) => {
                    return Err(SqlError::invalid(
                        "operator 'between' takes exactly two operands",
                    ));
                }
            },
            "in" => Condition::In(operands),
            "not_in" => Condition::NotIn(operands),
            other => {
                return Err(SqlError::invalid(format!(
                    "unknown where operator '{other}'"
                )));
            }
        };
        Ok(condition)
    }

    /// Render `field <op> ?` and push this condition's operands.
    fn render(&self, field: &str, params: &mut Vec<Value>) -> String {
        let (op, value) = match self {
            Condition::Equals(v) => ("=", v),
            Condition::NotEqualTo(v) => ("<>", v),
            Condition::LessThan(v) => ("<", v),
            Condition::GreaterThan(v) => (">", v),
            Condition::GreaterThanOrEqualTo(v) => (">=", v),
            Condition::NotGreaterThan(v) => ("<=", v),
            Condition::Like(v) => ("LIKE", v),
            Condition::NotLike(v) => ("NOT LIKE", v),
            Condition::Between(low, high) => {
                params.push(low.clone());
                params.push(high.clone());
                return format!("{} BETWEEN ? AND ?", field);
            }
            Condition::In(values) => return render_set(field, "IN", "=", values, params),
            Condition::NotIn(values) => return render_set(field, "NOT IN", "<>", values, params),
        };
        params.push(value.clone());
        format!("{} {} ?", field, op)
    }
}

/// `IN`/`NOT IN` degrade to `=`/`<>` for one value, matching list expansion.
fn render_set(
    field: &str,
    set_op: &str,
    single_op: &str,
    values: &[Value],
    params: &mut Vec<Value>,
) -> String {
    match values {
        [] => {
            params.push(Value::Bool(false));
            format!("{} {} ?", field, single_op)
        }
        [value] => {
            params.push(value.clone());
            format!("{} {} ?", field, single_op)
        }
        values => {
            params.extend(values.iter().cloned());
            format!("{} {} ({})", field, set_op, vec!["?"; values.len()].join(","))
        }
    }
}

macro_rules! condition_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Condition {
                fn from(v: $ty) -> Self {
                    Condition::Equals(v.into())
                }
            }
        )*
    };
}

condition_from_scalar!(Value, bool, i32, u32, i64, f64, &str, String);

impl<T: Into<Value>> From<Option<T>> for Condition {
    fn from(v: Option<T>) -> Self {
        Condition::Equals(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Condition {
    fn from(v: Vec<T>) -> Self {
        Condition::In(v.into_iter().map(Into::into).collect())
    }
}

/// Ordered field → condition list, joined with `AND`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    terms: Vec<(String, Condition)>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, field: impl Into<String>, condition: impl Into<Condition>) -> Self {
        self.terms.push((field.into(), condition.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Condition)> {
        self.terms.iter()
    }
}

impl<K: Into<String>, C: Into<Condition>> FromIterator<(K, C)> for Where {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        Where {
            terms: iter
                .into_iter()
                .map(|(k, c)| (k.into(), c.into()))
                .collect(),
        }
    }
}

/// Quote a possibly dotted field name part by part.
pub fn quote_field(field: &str, dialect: &dyn Dialect) -> String {
    field
        .split('.')
        .map(|part| dialect.quote_identifier(part))
        .collect::<Vec<_>>()
        .join(".")
}

/// Build the body of a WHERE clause.
///
/// Each term is followed by a space, so the fragment can be concatenated
/// directly into a larger query.
pub fn build_where(conditions: &Where, dialect: &dyn Dialect) -> (String, Vec<Value>) {
    let mut params = Vec::new();
    let terms: Vec<String> = conditions
        .iter()
        .map(|(field, condition)| {
            let term = condition.render(&quote_field(field, dialect), &mut params);
            format!("{} ", term)
        })
        .collect();
    (terms.join("AND "), params)
}

/// Build an `ORDER BY` clause from `field` / `field DESC` entries.
pub fn order_by<S: AsRef<str>>(fields: &[S], dialect: &dyn Dialect) -> String {
    let terms: Vec<String> = fields
        .iter()
        .map(|entry| {
            let entry = entry.as_ref().trim();
            let (field, direction) = match entry.rsplit_once(char::is_whitespace) {
                Some((field, dir)) if dir.eq_ignore_ascii_case("desc") => (field.trim(), " DESC"),
                Some((field, dir)) if dir.eq_ignore_ascii_case("asc") => (field.trim(), ""),
                _ => (entry, ""),
            };
            format!("{}{}", quote_field(field, dialect), direction)
        })
        .collect();

    if terms.is_empty() {
        String::new()
    } else {
        format!("ORDER BY {}", terms.join(", "))
    }
}

/// Build a SELECT field list; `*` when empty.
///
/// Entries that are already expressions (`*`, function calls, aliases) are
/// kept verbatim.
pub fn select_fields<S: AsRef<str>>(fields: &[S], dialect: &dyn Dialect) -> String {
    if fields.is_empty() {
        return "*".to_string();
    }
    fields
        .iter()
        .map(|field| {
            let field = field.as_ref().trim();
            if field == "*" || field.contains(['(', ' ', '*']) {
                field.to_string()
            } else {
                quote_field(field, dialect)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
