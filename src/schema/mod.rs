//! Record schemas
//!
//! Each record type describes its known header keys as a static table of
//! [`FieldSpec`]s: the key, how to decode a [`Value`] into the typed slot,
//! how to render the slot back, and what to write when it is empty. Keys
//! that are not in the table are kept in [`UnknownFields`] and written back
//! untouched, in their original position.
//!
//! Parsing walks the header in file order and dispatches each key through
//! the table. Serialization walks the recorded key order first, then
//! appends any known key that was never read (new records) in table order.

pub mod fields;
mod unknown;

pub use fields::{Birthday, Coordinates};
pub use unknown::UnknownFields;

use daybook_frontmatter::{self as frontmatter, Document, HeaderWriter, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::paths::{file_stem, Layout, RecordPath, DEFAULT_EXTENSION};

/// The four record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Entry,
    Person,
    Place,
    Media,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Entry => "entry",
            RecordKind::Person => "person",
            RecordKind::Place => "place",
            RecordKind::Media => "media",
        }
    }

    /// Top-level folder for this kind
    pub fn directory<'a>(&self, layout: &'a Layout) -> &'a str {
        match self {
            RecordKind::Entry => &layout.entries,
            RecordKind::Person => &layout.people,
            RecordKind::Place => &layout.places,
            RecordKind::Media => &layout.media,
        }
    }
}

/// What a known field renders to when it has a value
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Already-formatted scalar text
    Text(String),
    /// Block list; items are quoted by the writer as needed
    List(Vec<String>),
}

/// What to write for a known field with no value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// Leave the key out
    Omit,
    /// `key:` so the field name stays visible when editing by hand
    Placeholder,
    /// `key: []`
    EmptyList,
}

/// Decode a header value into a record. Returns the value back if it does
/// not fit the field.
pub type Decoder<R> = fn(&mut R, Value) -> Result<(), Value>;

/// Render a field, or `None` when it is empty
pub type Encoder<R> = fn(&R) -> Option<Field>;

/// One known header key
pub struct FieldSpec<R: 'static> {
    pub key: &'static str,
    pub decode: Decoder<R>,
    pub encode: Encoder<R>,
    pub when_empty: EmptyPolicy,
}

impl<R> std::fmt::Debug for FieldSpec<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("when_empty", &self.when_empty)
            .finish()
    }
}

/// A record stored as a frontmatter file
pub trait Record: Sized + 'static {
    const KIND: RecordKind;

    /// Known keys, in the order they are appended to new files
    const FIELDS: &'static [FieldSpec<Self>];

    /// An empty record for the given file stem. Record types with required
    /// header keys read them from `doc` and return `None` if they are missing.
    fn blank(stem: &str, doc: &Document) -> Option<Self>;

    /// Stable identity, also the file stem
    fn id(&self) -> &str;

    fn body(&self) -> &str;

    fn set_body(&mut self, body: String);

    fn unknown(&self) -> &UnknownFields;

    fn unknown_mut(&mut self) -> &mut UnknownFields;

    /// Canonical storage location
    fn location(&self, layout: &Layout) -> RecordPath;

    /// Where a record with identity `id` is stored, for record types whose
    /// location follows from the identity alone. Used to find the old file
    /// when the content-derived location has moved away from it.
    fn stored_location(_id: &str, _layout: &Layout) -> Option<RecordPath> {
        None
    }

    /// Table entry for a key, if it is known
    fn field(key: &str) -> Option<&'static FieldSpec<Self>> {
        Self::FIELDS.iter().find(|spec| spec.key == key)
    }
}

/// Parse a record from file text. `file_name` may be a bare name or a path;
/// a trailing `.md` is dropped to get the stem.
pub fn parse_record<R: Record>(text: &str, file_name: &str) -> Option<R> {
    parse_with_stem(text, file_stem(file_name, DEFAULT_EXTENSION))
}

/// Parse a record whose identity is already known
pub fn parse_with_stem<R: Record>(text: &str, stem: &str) -> Option<R> {
    let Some(doc) = frontmatter::parse(text) else {
        debug!(kind = R::KIND.as_str(), stem, "no frontmatter");
        return None;
    };
    from_document(doc, stem)
}

/// Build a record from an already-parsed document
pub fn from_document<R: Record>(doc: Document, stem: &str) -> Option<R> {
    let mut record = R::blank(stem, &doc)?;
    let (entries, body) = doc.into_parts();

    for (key, value) in entries {
        match R::field(&key) {
            Some(spec) => match (spec.decode)(&mut record, value) {
                Ok(()) => record.unknown_mut().note_key(&key),
                Err(raw) => {
                    warn!(
                        kind = R::KIND.as_str(),
                        key = %key,
                        found = raw.type_name(),
                        "value does not fit known field, keeping it as written"
                    );
                    record.unknown_mut().insert(key, raw);
                }
            },
            None => record.unknown_mut().insert(key, value),
        }
    }

    record.set_body(body);
    Some(record)
}

/// Render a record to file text
pub fn serialize_record<R: Record>(record: &R) -> String {
    let mut writer = HeaderWriter::new();
    let unknown = record.unknown();
    let mut written: HashSet<&str> = HashSet::new();

    for key in unknown.order() {
        if !written.insert(key.as_str()) {
            continue;
        }
        match R::field(key) {
            Some(spec) => write_known(&mut writer, record, spec),
            None => {
                if let Some(value) = unknown.get(key) {
                    writer.value(key, value);
                }
            }
        }
    }

    for spec in R::FIELDS {
        if !written.contains(spec.key) {
            write_known(&mut writer, record, spec);
        }
    }

    writer.finish(record.body())
}

fn write_known<R: Record>(writer: &mut HeaderWriter, record: &R, spec: &FieldSpec<R>) {
    match (spec.encode)(record) {
        Some(Field::Text(text)) => writer.scalar(spec.key, &text),
        Some(Field::List(items)) => writer.list(spec.key, &items),
        None => match record.unknown().get(spec.key) {
            Some(raw) => writer.value(spec.key, raw),
            None => match spec.when_empty {
                EmptyPolicy::Omit => {}
                EmptyPolicy::Placeholder => writer.empty(spec.key),
                EmptyPolicy::EmptyList => writer.empty_list(spec.key),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal record exercising each empty policy
    #[derive(Debug, Default, PartialEq)]
    struct Note {
        id: String,
        title: Option<String>,
        score: Option<i64>,
        aliases: Vec<String>,
        unknown: UnknownFields,
        body: String,
    }

    impl Record for Note {
        const KIND: RecordKind = RecordKind::Media;
        const FIELDS: &'static [FieldSpec<Self>] = &[
            FieldSpec {
                key: "title",
                decode: |n, v| fields::decode_string(v).map(|s| n.title = Some(s)),
                encode: |n| n.title.as_deref().map(fields::text),
                when_empty: EmptyPolicy::Placeholder,
            },
            FieldSpec {
                key: "score",
                decode: |n, v| fields::decode_int(v).map(|i| n.score = Some(i)),
                encode: |n| n.score.map(|i| Field::Text(i.to_string())),
                when_empty: EmptyPolicy::Omit,
            },
            FieldSpec {
                key: "aliases",
                decode: |n, v| fields::decode_list(v).map(|l| n.aliases = l),
                encode: |n| fields::list(&n.aliases),
                when_empty: EmptyPolicy::EmptyList,
            },
        ];

        fn blank(stem: &str, _doc: &Document) -> Option<Self> {
            Some(Self {
                id: stem.to_string(),
                ..Default::default()
            })
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn body(&self) -> &str {
            &self.body
        }

        fn set_body(&mut self, body: String) {
            self.body = body;
        }

        fn unknown(&self) -> &UnknownFields {
            &self.unknown
        }

        fn unknown_mut(&mut self) -> &mut UnknownFields {
            &mut self.unknown
        }

        fn location(&self, layout: &Layout) -> RecordPath {
            RecordPath::new(&layout.media, &self.id)
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let text = "---\nzeta: 1\nscore: 5\nalpha: x\ntitle: Hi\n---\n\nBody\n";
        let note: Note = parse_record(text, "note.md").unwrap();
        assert_eq!(note.id, "note");
        assert_eq!(note.score, Some(5));
        assert_eq!(note.title.as_deref(), Some("Hi"));
        assert_eq!(note.unknown.get("zeta"), Some(&Value::Int(1)));

        let out = serialize_record(&note);
        assert_eq!(
            out,
            "---\nzeta: 1\nscore: 5\nalpha: x\ntitle: Hi\naliases: []\n---\n\nBody\n"
        );
    }

    #[test]
    fn test_new_record_uses_fallback_order() {
        let note = Note {
            id: "fresh".into(),
            score: Some(2),
            ..Default::default()
        };
        assert_eq!(
            serialize_record(&note),
            "---\ntitle:\nscore: 2\naliases: []\n---\n\n\n"
        );
    }

    #[test]
    fn test_undecodable_known_value_is_kept() {
        let text = "---\nscore: lots\ntitle: Hi\n---\n";
        let note: Note = parse_record(text, "n.md").unwrap();
        assert_eq!(note.score, None);

        let out = serialize_record(&note);
        assert!(out.starts_with("---\nscore: lots\ntitle: Hi\n"));
    }

    #[test]
    fn test_typed_value_overrides_kept_raw() {
        let mut note: Note = parse_record("---\nscore: lots\n---\n", "n.md").unwrap();
        note.score = Some(9);
        assert!(serialize_record(&note).starts_with("---\nscore: 9\n"));
    }

    #[test]
    fn test_removed_unknown_is_dropped() {
        let mut note: Note = parse_record("---\nold: 1\ntitle: Hi\n---\n", "n.md").unwrap();
        note.unknown.remove("old");
        assert!(serialize_record(&note).starts_with("---\ntitle: Hi\n"));
    }

    #[test]
    fn test_empty_header_boundary() {
        let note: Note = parse_record("---\n---\n\nBody", "n.md").unwrap();
        assert_eq!(note.title, None);
        assert_eq!(note.score, None);
        assert!(note.aliases.is_empty());
        assert!(note.unknown.is_empty());
        assert_eq!(note.body, "Body");
    }

    #[test]
    fn test_no_frontmatter_is_absent() {
        assert!(parse_record::<Note>("just text", "n.md").is_none());
    }
}
