//! Line-oriented frontmatter for daybook records
//!
//! Records are stored as plain text: a header of `key: value` lines between
//! two `---` delimiters, a blank line, then free-form body text.
//!
//! ```markdown
//! ---
//! date_created: 2024-01-15T10:00:00.000-08:00
//! tags:
//!   - travel
//!   - family
//! temperature: 21.0
//! ---
//!
//! Walked along the harbour.
//! ```
//!
//! # Dialect
//!
//! Deliberately smaller than YAML:
//!
//! - `key: value` scalars, type inferred per token (see [`parse_value`])
//! - `key:` followed by `  - item` lines for string arrays
//! - `key: [a, b]` inline lists are kept as strings here; record schemas
//!   decide whether to split them (see [`parse_inline_list`])
//! - anything else in the header is ignored
//!
//! Nested maps, anchors and multi-line scalars are not supported.

mod parser;
mod value;
mod writer;

pub use parser::{parse, parse_header, Document, DELIMITER};
pub use value::{parse_inline_list, parse_value, unquote, Value};
pub use writer::{
    format_day, format_double, format_item, format_moment, format_one_decimal, format_scalar,
    format_string, HeaderWriter, DAY_FORMAT, MOMENT_FORMAT,
};

/// Render an ordered document back to text using the generic value rules
pub fn render(doc: &Document) -> String {
    let mut writer = HeaderWriter::new();
    for (key, value) in doc.iter() {
        writer.value(key, value);
    }
    writer.finish(&doc.body)
}
