//! Frontmatter block parser
//!
//! Splits a file into header lines and body text, then walks the header
//! with a two-state machine (idle / accumulating an array). Parsing is
//! lenient: lines that fit neither grammar rule are skipped.

use nom::{
    bytes::complete::{tag, take_till},
    character::complete::char,
    combinator::rest,
    sequence::{preceded, separated_pair},
    IResult,
};
use tracing::debug;

use crate::value::{parse_value, unquote, Value};

/// The header delimiter line
pub const DELIMITER: &str = "---";

/// A parsed header plus the body that followed it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, Value)>,
    /// Body text after the closing delimiter, trimmed
    pub body: String,
}

impl Document {
    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Keys in the order they first appeared
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into ordered entries and body
    pub fn into_parts(self) -> (Vec<(String, Value)>, String) {
        (self.entries, self.body)
    }

    /// Record a value. A repeated key keeps its first position but takes
    /// the newer value.
    fn insert(&mut self, key: String, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

/// One classified header line
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Item(&'a str),
    Pair(&'a str, &'a str),
    Other,
}

fn array_item(input: &str) -> IResult<&str, &str> {
    preceded(tag("- "), rest)(input)
}

fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_till(|c| c == ':'), char(':'), rest)(input)
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim();
    if let Ok((_, item)) = array_item(line) {
        return Line::Item(item.trim());
    }
    match key_value(line) {
        Ok((_, (key, value))) if !key.trim().is_empty() => Line::Pair(key.trim(), value.trim()),
        _ => Line::Other,
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Parse a full file body.
///
/// Returns `None` when the text does not open with a delimiter line, is
/// shorter than three lines, or never closes the header. Lines are split on
/// `\n`, so a trailing newline counts as a final empty line. Callers treat
/// that as "no frontmatter", not as an error.
pub fn parse(content: &str) -> Option<Document> {
    let lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.len() < 3 || !is_delimiter(lines[0]) {
        debug!("no opening frontmatter delimiter");
        return None;
    }

    let Some(close) = lines.iter().skip(1).position(|l| is_delimiter(l)).map(|i| i + 1) else {
        debug!("unclosed frontmatter header");
        return None;
    };

    let mut doc = parse_header(&lines[1..close]);
    doc.body = lines[close + 1..].join("\n").trim().to_string();
    Some(doc)
}

/// Parse header lines (without delimiters) into an ordered document
pub fn parse_header(lines: &[&str]) -> Document {
    let mut doc = Document::default();
    let mut current_key: Option<String> = None;
    let mut items: Vec<String> = Vec::new();
    let mut accumulating = false;

    for (number, raw) in lines.iter().enumerate() {
        match classify(raw) {
            Line::Item(item) => {
                if current_key.is_some() {
                    items.push(unquote(item).unwrap_or(item).to_string());
                    accumulating = true;
                } else {
                    debug!(line = number + 1, "array item without a key, skipping");
                }
            }
            Line::Pair(key, value) => {
                if let Some(pending) = current_key.take() {
                    doc.insert(pending, Value::Array(std::mem::take(&mut items)));
                }
                accumulating = false;

                if value.is_empty() {
                    current_key = Some(key.to_string());
                } else {
                    doc.insert(key.to_string(), parse_value(value));
                }
            }
            Line::Other => {
                if !raw.trim().is_empty() {
                    debug!(line = number + 1, "unrecognized header line, skipping");
                }
            }
        }
    }

    if let Some(pending) = current_key {
        if accumulating {
            debug!(key = %pending, items = items.len(), "flushing trailing array");
        }
        doc.insert(pending, Value::Array(items));
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_body() {
        let content = r#"---
title: Hello World
count: 42
tags:
  - rust
  - journal
---

# Heading

Some content here.
"#;

        let doc = parse(content).unwrap();
        assert_eq!(doc.get("title"), Some(&Value::String("Hello World".into())));
        assert_eq!(doc.get("count"), Some(&Value::Int(42)));
        assert_eq!(
            doc.get("tags"),
            Some(&Value::Array(vec!["rust".into(), "journal".into()]))
        );
        assert_eq!(doc.body, "# Heading\n\nSome content here.");
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["title", "count", "tags"]);
    }

    #[test]
    fn test_empty_header() {
        let doc = parse("---\n---\n\nBody").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_newline_terminated_empty_header() {
        let doc = parse("---\n---\n").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.body, "");

        let doc = parse("---\r\nmood: 3\r\n---\r\n\r\nBody\r\n").unwrap();
        assert_eq!(doc.get("mood"), Some(&Value::Int(3)));
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_missing_frontmatter() {
        assert!(parse("# Just a document\n\nNo header.").is_none());
        assert!(parse("---\n---").is_none());
        assert!(parse("---\ntitle: x\n").is_none());
        assert!(parse("---\ntitle: x\nno close").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn test_empty_key_becomes_empty_array() {
        let doc = parse("---\nbirthday:\nname: x\n---\n").unwrap();
        assert_eq!(doc.get("birthday"), Some(&Value::Array(vec![])));
        assert_eq!(doc.get("name"), Some(&Value::String("x".into())));
    }

    #[test]
    fn test_trailing_empty_key() {
        let doc = parse("---\na: 1\nlast:\n---\n").unwrap();
        assert_eq!(doc.get("last"), Some(&Value::Array(vec![])));
    }

    #[test]
    fn test_duplicate_keys_keep_first_position() {
        let doc = parse("---\na: 1\nb: 2\na: 3\n---\n").unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(doc.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let doc = parse("---\njust words\n: orphan\n- stray\nkey: value\n---\nBody").unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("key"), Some(&Value::String("value".into())));
    }

    #[test]
    fn test_value_split_at_first_colon() {
        let doc = parse("---\nurl: \"https://example.com\"\ntime: 10:30\n---\n").unwrap();
        assert_eq!(
            doc.get("url"),
            Some(&Value::String("https://example.com".into()))
        );
        assert_eq!(doc.get("time"), Some(&Value::String("10:30".into())));
    }

    #[test]
    fn test_array_items_are_unquoted() {
        let doc = parse("---\npeople:\n  - \"@sam\"\n  - 'Alex'\n---\n").unwrap();
        assert_eq!(
            doc.get("people"),
            Some(&Value::Array(vec!["@sam".into(), "Alex".into()]))
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("  - item "), Line::Item("item"));
        assert_eq!(classify("key: value"), Line::Pair("key", "value"));
        assert_eq!(classify("key:"), Line::Pair("key", ""));
        assert_eq!(classify("-"), Line::Other);
        assert_eq!(classify("plain"), Line::Other);
    }
}
