//! Journal entries
//!
//! An entry's identity is its creation minute: the file is named
//! `yyyyMMddHHmm` and filed under `Entries/{year}/{MM-Month}/{dd}`.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use daybook_frontmatter::{Document, Value};
use serde::Serialize;

use crate::paths::{entry_directory, entry_stem, Layout, RecordPath, ENTRY_STEM_FORMAT};
use crate::schema::fields::{self, Coordinates};
use crate::schema::{EmptyPolicy, Field, FieldSpec, Record, RecordKind, UnknownFields};
use crate::transcript::{self, TimeRange};

/// Header key holding the creation moment
pub const CREATED_KEY: &str = "date_created";

/// A journal entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Stem of the stored file; `yyyyMMddHHmm` of the creation time once saved
    pub id: String,
    pub created: DateTime<Local>,
    pub modified: Option<DateTime<Local>>,
    pub tags: Vec<String>,
    pub people: Vec<String>,
    pub place: Option<String>,
    pub location: Option<Coordinates>,
    pub weather: Option<String>,
    /// Degrees, always written with one decimal
    pub temperature: Option<f64>,
    pub mood: Option<i64>,
    pub steps: Option<i64>,
    /// File name of the attached recording
    pub audio: Option<String>,
    /// Segments of the recording's transcript
    pub transcript: Vec<TimeRange>,
    pub unknown: UnknownFields,
    pub body: String,
}

impl Entry {
    pub fn new(created: DateTime<Local>) -> Self {
        Self {
            id: entry_stem(&created),
            created,
            modified: None,
            tags: Vec::new(),
            people: Vec::new(),
            place: None,
            location: None,
            weather: None,
            temperature: None,
            mood: None,
            steps: None,
            audio: None,
            transcript: Vec::new(),
            unknown: UnknownFields::new(),
            body: String::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Change the creation time. `id` keeps naming the stored file, so that
    /// saving moves it to the new location.
    pub fn set_created(&mut self, created: DateTime<Local>) {
        self.created = created;
    }

    /// Whether the stored file name no longer matches the creation time
    pub fn needs_move(&self) -> bool {
        self.id != entry_stem(&self.created)
    }
}

/// Creation time from the file stem, read as local time
fn created_from_stem(stem: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(stem, ENTRY_STEM_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}

impl Record for Entry {
    const KIND: RecordKind = RecordKind::Entry;

    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            key: CREATED_KEY,
            decode: |e, v| fields::decode_moment(v).map(|dt| e.created = dt),
            encode: |e| Some(fields::moment(&e.created)),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "date_modified",
            decode: |e, v| fields::optional(v, fields::decode_moment).map(|dt| e.modified = dt),
            encode: |e| e.modified.as_ref().map(fields::moment),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "tags",
            decode: |e, v| fields::decode_list(v).map(|tags| e.tags = tags),
            encode: |e| fields::list(&e.tags),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "people",
            decode: |e, v| fields::decode_list(v).map(|people| e.people = people),
            encode: |e| fields::list(&e.people),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "place",
            decode: |e, v| fields::optional(v, fields::decode_string).map(|p| e.place = p),
            encode: |e| e.place.as_deref().map(fields::text),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "location",
            decode: |e, v| fields::optional(v, fields::decode_coordinates).map(|c| e.location = c),
            encode: |e| e.location.map(|c| Field::Text(c.to_string())),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "weather",
            decode: |e, v| fields::optional(v, fields::decode_string).map(|w| e.weather = w),
            encode: |e| e.weather.as_deref().map(fields::text),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "temperature",
            decode: |e, v| fields::optional(v, fields::decode_double).map(|t| e.temperature = t),
            encode: |e| e.temperature.map(fields::one_decimal),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "mood",
            decode: |e, v| fields::optional(v, fields::decode_int).map(|m| e.mood = m),
            encode: |e| e.mood.map(fields::int),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "steps",
            decode: |e, v| fields::optional(v, fields::decode_int).map(|s| e.steps = s),
            encode: |e| e.steps.map(fields::int),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "audio",
            decode: |e, v| fields::optional(v, fields::decode_string).map(|a| e.audio = a),
            encode: |e| e.audio.as_deref().map(fields::text),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "transcript",
            decode: decode_transcript,
            encode: |e| {
                if e.transcript.is_empty() {
                    None
                } else {
                    Some(fields::text(&transcript::encode(&e.transcript)))
                }
            },
            when_empty: EmptyPolicy::Omit,
        },
    ];

    fn blank(stem: &str, doc: &Document) -> Option<Self> {
        let created = doc
            .get(CREATED_KEY)
            .cloned()
            .and_then(|v| fields::decode_moment(v).ok())
            .or_else(|| created_from_stem(stem))?;

        let mut entry = Entry::new(created);
        entry.id = stem.to_string();
        Some(entry)
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
        RecordPath::new(entry_directory(layout, &self.created), entry_stem(&self.created))
    }

    fn stored_location(id: &str, layout: &Layout) -> Option<RecordPath> {
        let created = created_from_stem(id)?;
        Some(RecordPath::new(entry_directory(layout, &created), id))
    }
}

/// Segments from the sidecar string. A non-empty string with no readable
/// segment is kept as written.
fn decode_transcript(entry: &mut Entry, value: Value) -> Result<(), Value> {
    let text = fields::optional(value, fields::decode_string)?;
    let Some(text) = text else {
        entry.transcript.clear();
        return Ok(());
    };
    let ranges = transcript::decode(&text);
    if ranges.is_empty() {
        return Err(Value::String(text));
    }
    entry.transcript = ranges;
    Ok(())
}
