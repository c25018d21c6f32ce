//! Typed frontmatter values
//!
//! Every scalar or array in a header is one of a closed set of variants.
//! [`parse_value`] turns a raw token into a [`Value`] using an ordered
//! inference cascade; the first rule that matches wins.

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").unwrap());
static FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?$").unwrap());

/// A value that can appear in a frontmatter header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    DateTime(DateTime<FixedOffset>),
    String(String),
    Array(Vec<String>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to floating point
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Short name of the active variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::DateTime(_) => "datetime",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::Array(items)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

/// Strip one layer of matching single or double quotes.
///
/// Returns `None` when the token is not quoted.
pub fn unquote(token: &str) -> Option<&str> {
    if token.len() < 2 {
        return None;
    }
    ['"', '\'']
        .into_iter()
        .find_map(|q| token.strip_prefix(q).and_then(|t| t.strip_suffix(q)))
}

/// Infer the type of a single trimmed token.
///
/// Quoted tokens are always strings. Otherwise integer, float, boolean and
/// RFC 3339 date-time are tried in that order before falling back to a
/// plain string. This never fails.
pub fn parse_value(token: &str) -> Value {
    if let Some(inner) = unquote(token) {
        return Value::String(inner.to_string());
    }

    if INTEGER.is_match(token) {
        if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        }
    }

    if FLOAT.is_match(token) {
        if let Ok(d) = token.parse::<f64>() {
            if d.is_finite() {
                return Value::Double(d);
            }
        }
    }

    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Value::DateTime(dt);
    }

    Value::String(token.to_string())
}

/// Split an inline bracketed list such as `[a, b]` into trimmed items.
///
/// Returns `None` if the text is not bracketed. Empty segments are dropped,
/// so `[]` yields an empty list.
pub fn parse_inline_list(text: &str) -> Option<Vec<String>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .split(',')
            .map(|item| {
                let item = item.trim();
                unquote(item).unwrap_or(item).to_string()
            })
            .filter(|item| !item.is_empty())
            .collect(),
    )
}
