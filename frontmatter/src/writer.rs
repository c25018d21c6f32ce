//! Header rendering
//!
//! [`HeaderWriter`] accumulates `key: value` lines and wraps them in
//! delimiters. The free functions here are the formatting rules shared by
//! every record type; each is total, so rendering never fails.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

use crate::parser::DELIMITER;
use crate::value::{parse_value, unquote, Value};

/// Format for instants: local time, fractional seconds, `+hh:mm` offset
pub const MOMENT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Format for day-only fields
pub const DAY_FORMAT: &str = "%Y-%m-%d";

static TRAILING_ZEROS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.?0+$").unwrap());

/// Render a string, double-quoting it when it would not survive a re-parse
/// as the same string.
///
/// Line breaks become spaces, since a header value is a single line.
/// Quotes are added for `:` and `#`, a leading `@`, empty or padded text,
/// and text that would otherwise infer as a number, boolean or date-time.
pub fn format_string(s: &str) -> String {
    let s = single_line(s);
    let needs_quotes =
        needs_structural_quotes(&s) || parse_value(&s) != Value::String(s.to_string());
    quote_if(s, needs_quotes)
}

/// Render a block list item. Items are never type-inferred on parse, so
/// only text that would change shape (`:`, `#`, leading `@`, surrounding
/// quotes, padding, empty) is quoted.
pub fn format_item(s: &str) -> String {
    let s = single_line(s);
    let needs_quotes = needs_structural_quotes(&s) || unquote(&s).is_some();
    quote_if(s, needs_quotes)
}

fn needs_structural_quotes(s: &str) -> bool {
    s.is_empty() || s.contains(':') || s.contains('#') || s.starts_with('@') || s.trim() != s
}

fn quote_if(s: Cow<'_, str>, quote: bool) -> String {
    if quote {
        format!("\"{}\"", s)
    } else {
        s.into_owned()
    }
}

/// Replace `\r\n`, `\n` and `\r` with a single space
fn single_line(s: &str) -> Cow<'_, str> {
    if !s.contains(['\n', '\r']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace("\r\n", " ").replace(['\r', '\n'], " "))
}

/// Whole numbers render without a fraction; anything else keeps at most two
/// decimal places with trailing zeros removed.
pub fn format_double(d: f64) -> String {
    if d.fract() == 0.0 {
        return format!("{:.0}", d);
    }
    let fixed = format!("{:.2}", d);
    TRAILING_ZEROS.replace(&fixed, "").into_owned()
}

/// Always exactly one decimal place (`2.0`, `21.4`)
pub fn format_one_decimal(d: f64) -> String {
    format!("{:.1}", d)
}

/// Render an instant in the local time zone
pub fn format_moment<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    dt.with_timezone(&Local).format(MOMENT_FORMAT).to_string()
}

/// Render a calendar day as `YYYY-MM-DD`
pub fn format_day(day: &NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Render a typed value the way an unknown field is written
pub fn format_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(format_string(s)),
        Value::Int(i) => Some(i.to_string()),
        Value::Double(d) => Some(format_double(*d)),
        Value::Bool(b) => Some(b.to_string()),
        Value::DateTime(dt) => Some(format_moment(dt)),
        Value::Array(_) => None,
    }
}

/// Builds the header block line by line
#[derive(Debug, Default)]
pub struct HeaderWriter {
    out: String,
}

impl HeaderWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `key: text`, with `text` already formatted
    pub fn scalar(&mut self, key: &str, text: &str) {
        self.out.push_str(key);
        self.out.push_str(": ");
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// A block list. Items are quoted only where the line would change shape.
    pub fn list(&mut self, key: &str, items: &[String]) {
        if items.is_empty() {
            self.empty(key);
            return;
        }
        self.out.push_str(key);
        self.out.push_str(":\n");
        for item in items {
            self.out.push_str("  - ");
            self.out.push_str(&format_item(item));
            self.out.push('\n');
        }
    }

    /// `key:` with nothing after it
    pub fn empty(&mut self, key: &str) {
        self.out.push_str(key);
        self.out.push_str(":\n");
    }

    /// `key: []`
    pub fn empty_list(&mut self, key: &str) {
        self.out.push_str(key);
        self.out.push_str(": []\n");
    }

    /// Write a typed value using the generic rules
    pub fn value(&mut self, key: &str, value: &Value) {
        match value {
            Value::Array(items) => self.list(key, items),
            other => {
                if let Some(text) = format_scalar(other) {
                    self.scalar(key, &text);
                }
            }
        }
    }

    /// Header text without delimiters
    pub fn header(&self) -> &str {
        &self.out
    }

    /// Wrap the header in delimiters and append the body
    pub fn finish(self, body: &str) -> String {
        format!(
            "{DELIMITER}\n{}{DELIMITER}\n\n{}\n",
            self.out,
            body.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(3.0), "3");
        assert_eq!(format_double(3.14159), "3.14");
        assert_eq!(format_double(2.5), "2.5");
        assert_eq!(format_double(-1.10), "-1.1");
        assert_eq!(format_double(0.001), "0");
        assert_eq!(format_double(120.0), "120");
    }

    #[test]
    fn test_one_decimal() {
        assert_eq!(format_one_decimal(2.0), "2.0");
        assert_eq!(format_one_decimal(21.44), "21.4");
        assert_eq!(format_one_decimal(-3.0), "-3.0");
    }

    #[test]
    fn test_string_quoting() {
        assert_eq!(format_string("plain text"), "plain text");
        assert_eq!(format_string("a: b"), "\"a: b\"");
        assert_eq!(format_string("issue #4"), "\"issue #4\"");
        assert_eq!(format_string("@sam"), "\"@sam\"");
        assert_eq!(format_string("sam@example.com"), "sam@example.com");
        assert_eq!(format_string("42"), "\"42\"");
        assert_eq!(format_string("TRUE"), "\"TRUE\"");
        assert_eq!(format_string(""), "\"\"");
    }

    #[test]
    fn test_quoted_strings_reparse_as_strings() {
        for s in ["a: b", "#tag", "@handle", "42", "3.5", "false", ""] {
            assert_eq!(parse_value(&format_string(s)), Value::String(s.into()));
        }
    }

    #[test]
    fn test_line_breaks_are_flattened() {
        assert_eq!(format_string("66 Mint St\nSan Francisco"), "66 Mint St San Francisco");
        assert_eq!(format_string("a\r\nb\rc"), "a b c");
        assert_eq!(format_string("x\nrelationship: family"), "\"x relationship: family\"");
        assert_eq!(format_item("one\ntwo: three"), "\"one two: three\"");
    }

    #[test]
    fn test_item_quoting() {
        assert_eq!(format_item("2024"), "2024");
        assert_eq!(format_item("true"), "true");
        assert_eq!(format_item("late night"), "late night");
        assert_eq!(format_item("@sam"), "\"@sam\"");
        assert_eq!(format_item("a: b"), "\"a: b\"");
        assert_eq!(format_item("'quoted'"), "\"'quoted'\"");
        assert_eq!(format_item(" padded"), "\" padded\"");
        assert_eq!(format_item(""), "\"\"");
    }

    #[test]
    fn test_moment_roundtrip() {
        let dt = DateTime::parse_from_rfc3339("2024-01-15T10:00:00-08:00").unwrap();
        let text = format_moment(&dt);
        assert!(text.contains(".000"));
        let back = DateTime::parse_from_rfc3339(&text).unwrap();
        assert_eq!(back, dt);
        assert_eq!(back.with_timezone(&FixedOffset::east_opt(0).unwrap()), dt);
    }

    #[test]
    fn test_writer_output() {
        let mut w = HeaderWriter::new();
        w.scalar("title", "Hello");
        w.list("tags", &["a".to_string(), "b c".to_string()]);
        w.empty("birthday");
        w.empty_list("aliases");
        w.value("count", &Value::Int(3));
        w.value("ratio", &Value::Double(3.0));

        let text = w.finish("Body\n\n");
        assert_eq!(
            text,
            "---\ntitle: Hello\ntags:\n  - a\n  - b c\nbirthday:\naliases: []\ncount: 3\nratio: 3\n---\n\nBody\n"
        );
    }

    #[test]
    fn test_empty_array_value_writes_bare_key() {
        let mut w = HeaderWriter::new();
        w.value("pending", &Value::Array(vec![]));
        assert_eq!(w.header(), "pending:\n");
    }
}
