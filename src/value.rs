//! Scalar values and query parameter lists.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A scalar bound to one placeholder or read back from one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One input parameter: a scalar, or a list that expands a single marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Value(Value),
    List(Vec<Value>),
}

macro_rules! param_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Param {
                fn from(v: $ty) -> Self {
                    Param::Value(v.into())
                }
            }
        )*
    };
}

param_from_scalar!(Value, bool, i32, u32, i64, f64, &str, String);

impl<T: Into<Value>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        Param::Value(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Param {
    fn from(v: Vec<T>) -> Self {
        Param::List(v.into_iter().map(Into::into).collect())
    }
}

/// The parameters supplied with one query.
///
/// Positional entries are consumed in order by bare `?` markers; named
/// entries are looked up by `?name` markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    positional: Vec<Param>,
    named: HashMap<String, Param>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional parameter.
    pub fn push(mut self, param: impl Into<Param>) -> Self {
        self.positional.push(param.into());
        self
    }

    /// Set a named parameter.
    pub fn named(mut self, name: impl Into<String>, param: impl Into<Param>) -> Self {
        self.named.insert(name.into(), param.into());
        self
    }

    pub fn positional(&self) -> &[Param] {
        &self.positional
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.named.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    pub(crate) fn into_parts(self) -> (Vec<Param>, HashMap<String, Param>) {
        (self.positional, self.named)
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Params::default()
    }
}

impl<P: Into<Param>> From<Vec<P>> for Params {
    fn from(v: Vec<P>) -> Self {
        Params {
            positional: v.into_iter().map(Into::into).collect(),
            named: HashMap::new(),
        }
    }
}

impl<P: Into<Param>, const N: usize> From<[P; N]> for Params {
    fn from(v: [P; N]) -> Self {
        Params {
            positional: v.into_iter().map(Into::into).collect(),
            named: HashMap::new(),
        }
    }
}

impl<K: Into<String>, P: Into<Param>> FromIterator<(K, P)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        Params {
            positional: Vec::new(),
            named: iter.into_iter().map(|(k, p)| (k.into(), p.into())).collect(),
        }
    }
}
