//! Media: books, films, albums and the like
//!
//! Stored as `Media/{title}.md`.

use chrono::NaiveDate;
use daybook_frontmatter::{Document, Value};
use serde::Serialize;

use crate::paths::{Layout, RecordPath};
use crate::schema::fields;
use crate::schema::{EmptyPolicy, Field, FieldSpec, Record, RecordKind, UnknownFields};
use crate::validation::{identity_for, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Book,
    Movie,
    Show,
    Album,
    Podcast,
    Game,
    Article,
    #[default]
    Other,
}

impl MediaType {
    pub const ALL: [MediaType; 8] = [
        MediaType::Book,
        MediaType::Movie,
        MediaType::Show,
        MediaType::Album,
        MediaType::Podcast,
        MediaType::Game,
        MediaType::Article,
        MediaType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Book => "book",
            MediaType::Movie => "movie",
            MediaType::Show => "show",
            MediaType::Album => "album",
            MediaType::Podcast => "podcast",
            MediaType::Game => "game",
            MediaType::Article => "article",
            MediaType::Other => "other",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag.trim()))
            .unwrap_or_default()
    }
}

/// A piece of media
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Media {
    /// Sanitized title, also the file stem
    pub id: String,
    pub media_type: MediaType,
    pub creator: Option<String>,
    pub year: Option<i64>,
    /// Written with one decimal
    pub rating: Option<f64>,
    pub status: Option<String>,
    pub started: Option<NaiveDate>,
    pub finished: Option<NaiveDate>,
    pub url: Option<String>,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub unknown: UnknownFields,
    pub body: String,
}

impl Media {
    pub fn new(title: &str, media_type: MediaType) -> Result<Self, ValidationError> {
        let mut media = Self::with_id(identity_for(title)?);
        media.media_type = media_type;
        Ok(media)
    }

    fn with_id(id: String) -> Self {
        Self {
            id,
            media_type: MediaType::Other,
            creator: None,
            year: None,
            rating: None,
            status: None,
            started: None,
            finished: None,
            url: None,
            aliases: Vec::new(),
            tags: Vec::new(),
            unknown: UnknownFields::new(),
            body: String::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.id
    }

    /// Days between starting and finishing, when both are known
    pub fn days_taken(&self) -> Option<i64> {
        Some((self.finished? - self.started?).num_days())
    }
}

impl Record for Media {
    const KIND: RecordKind = RecordKind::Media;

    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            key: "type",
            decode: |m, v| {
                m.media_type = match &v {
                    Value::String(tag) => MediaType::from_tag(tag),
                    _ => MediaType::Other,
                };
                Ok(())
            },
            encode: |m| Some(Field::Text(m.media_type.as_str().to_string())),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "creator",
            decode: |m, v| fields::optional(v, fields::decode_string).map(|c| m.creator = c),
            encode: |m| m.creator.as_deref().map(fields::text),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "year",
            decode: |m, v| fields::optional(v, fields::decode_int).map(|y| m.year = y),
            encode: |m| m.year.map(fields::int),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "rating",
            decode: |m, v| fields::optional(v, fields::decode_double).map(|r| m.rating = r),
            encode: |m| m.rating.map(fields::one_decimal),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "status",
            decode: |m, v| fields::optional(v, fields::decode_string).map(|s| m.status = s),
            encode: |m| m.status.as_deref().map(fields::text),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "started",
            decode: |m, v| fields::optional(v, fields::decode_day).map(|d| m.started = d),
            encode: |m| m.started.as_ref().map(fields::day),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "finished",
            decode: |m, v| fields::optional(v, fields::decode_day).map(|d| m.finished = d),
            encode: |m| m.finished.as_ref().map(fields::day),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "url",
            decode: |m, v| fields::optional(v, fields::decode_string).map(|u| m.url = u),
            encode: |m| m.url.as_deref().map(fields::text),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "aliases",
            decode: |m, v| fields::decode_list(v).map(|a| m.aliases = a),
            encode: |m| fields::list(&m.aliases),
            when_empty: EmptyPolicy::EmptyList,
        },
        FieldSpec {
            key: "tags",
            decode: |m, v| fields::decode_list(v).map(|t| m.tags = t),
            encode: |m| fields::list(&m.tags),
            when_empty: EmptyPolicy::Omit,
        },
    ];

    fn blank(stem: &str, _doc: &Document) -> Option<Self> {
        Some(Self::with_id(stem.to_string()))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{parse_record, serialize_record};

    #[test]
    fn test_new_media() {
        let mut book = Media::new("The Hobbit", MediaType::Book).unwrap();
        book.creator = Some("J.R.R. Tolkien".into());
        book.year = Some(1937);
        book.rating = Some(5.0);
        book.url = Some("https://example.com/hobbit".into());

        assert_eq!(
            serialize_record(&book),
            "---\ntype: book\ncreator: J.R.R. Tolkien\nyear: 1937\nrating: 5.0\nurl: \"https://example.com/hobbit\"\naliases: []\n---\n\n\n"
        );
    }

    #[test]
    fn test_parse_media() {
        let text = "---\ntype: Movie\nrating: 4.26\nstarted: 2024-02-01\nfinished: 2024-02-03\nwatched_with:\n  - Sam\n---\n\nGreat score.\n";
        let m: Media = parse_record(text, "Dune.md").unwrap();
        assert_eq!(m.title(), "Dune");
        assert_eq!(m.media_type, MediaType::Movie);
        assert_eq!(m.rating, Some(4.26));
        assert_eq!(m.days_taken(), Some(2));
        assert_eq!(
            m.unknown.get("watched_with"),
            Some(&Value::Array(vec!["Sam".into()]))
        );

        let out = serialize_record(&m);
        assert_eq!(
            out,
            "---\ntype: movie\nrating: 4.3\nstarted: 2024-02-01\nfinished: 2024-02-03\nwatched_with:\n  - Sam\naliases: []\n---\n\nGreat score.\n"
        );
    }

    #[test]
    fn test_roundtrip_is_stable() {
        let text = "---\ntype: album\ncreator: \"Sigur Rós: live\"\nyear: 2005\nrating: 4\nscore: 3.14159\nloved: TRUE\n---\n\nNotes\n";
        let first: Media = parse_record(text, "Takk.md").unwrap();
        let once = serialize_record(&first);
        let second: Media = parse_record(&once, "Takk.md").unwrap();
        assert_eq!(first.creator, second.creator);
        assert_eq!(first.rating, second.rating);
        assert_eq!(serialize_record(&second), once);
        assert!(once.contains("score: 3.14\n"));
        assert!(once.contains("loved: true\n"));
        assert!(once.contains("rating: 4.0\n"));
    }
}
