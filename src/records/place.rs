//! Places
//!
//! Stored as `Places/{name}.md`. The `callout` key picks the kind of place
//! from a fixed vocabulary and falls back to `place`.

use daybook_frontmatter::{Document, Value};
use serde::Serialize;

use crate::paths::{Layout, RecordPath};
use crate::schema::fields::{self, Coordinates};
use crate::schema::{EmptyPolicy, Field, FieldSpec, Record, RecordKind, UnknownFields};
use crate::validation::{identity_for, ValidationError};

/// Kind of place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Callout {
    #[default]
    Place,
    Home,
    Work,
    Restaurant,
    Cafe,
    Bar,
    Shop,
    Park,
    School,
    Health,
    Gym,
    Travel,
}

impl Callout {
    pub const ALL: [Callout; 12] = [
        Callout::Place,
        Callout::Home,
        Callout::Work,
        Callout::Restaurant,
        Callout::Cafe,
        Callout::Bar,
        Callout::Shop,
        Callout::Park,
        Callout::School,
        Callout::Health,
        Callout::Gym,
        Callout::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Callout::Place => "place",
            Callout::Home => "home",
            Callout::Work => "work",
            Callout::Restaurant => "restaurant",
            Callout::Cafe => "cafe",
            Callout::Bar => "bar",
            Callout::Shop => "shop",
            Callout::Park => "park",
            Callout::School => "school",
            Callout::Health => "health",
            Callout::Gym => "gym",
            Callout::Travel => "travel",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(tag.trim()))
            .unwrap_or_default()
    }
}

/// A place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    /// Sanitized name, also the file stem
    pub id: String,
    pub callout: Callout,
    pub location: Option<Coordinates>,
    pub address: Option<String>,
    /// Geofence radius in metres
    pub radius: Option<i64>,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub unknown: UnknownFields,
    pub body: String,
}

impl Place {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self::with_id(identity_for(name)?))
    }

    fn with_id(id: String) -> Self {
        Self {
            id,
            callout: Callout::Place,
            location: None,
            address: None,
            radius: None,
            aliases: Vec::new(),
            tags: Vec::new(),
            unknown: UnknownFields::new(),
            body: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.id
    }

    /// Whether `name` refers to this place, by name or alias
    pub fn answers_to(&self, name: &str) -> bool {
        self.id.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

impl Record for Place {
    const KIND: RecordKind = RecordKind::Place;

    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            key: "callout",
            decode: |p, v| {
                p.callout = match &v {
                    Value::String(tag) => Callout::from_tag(tag),
                    _ => Callout::Place,
                };
                Ok(())
            },
            encode: |p| Some(Field::Text(p.callout.as_str().to_string())),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "location",
            decode: |p, v| fields::optional(v, fields::decode_coordinates).map(|c| p.location = c),
            encode: |p| p.location.map(|c| Field::Text(c.to_string())),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "address",
            decode: |p, v| fields::optional(v, fields::decode_string).map(|a| p.address = a),
            encode: |p| p.address.as_deref().map(fields::text),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "radius",
            decode: |p, v| fields::optional(v, fields::decode_int).map(|r| p.radius = r),
            encode: |p| p.radius.map(fields::int),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "aliases",
            decode: |p, v| fields::decode_list(v).map(|a| p.aliases = a),
            encode: |p| fields::list(&p.aliases),
            when_empty: EmptyPolicy::EmptyList,
        },
        FieldSpec {
            key: "tags",
            decode: |p, v| fields::decode_list(v).map(|t| p.tags = t),
            encode: |p| fields::list(&p.tags),
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
        RecordPath::new(&layout.places, &self.id)
    }
}
