//! People
//!
//! Stored as `People/{name}.md`. Contact fields are always written, empty
//! or not, so that a person's file doubles as a fill-in template when it is
//! opened in a plain editor.

use chrono::NaiveDate;
use daybook_frontmatter::{Document, Value};
use serde::Serialize;

use crate::paths::{Layout, RecordPath};
use crate::schema::fields::{self, Birthday};
use crate::schema::{EmptyPolicy, Field, FieldSpec, Record, RecordKind, UnknownFields};
use crate::validation::{identity_for, ValidationError};

/// How a person relates to the journal's author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Family,
    Partner,
    Friend,
    Colleague,
    Acquaintance,
    #[default]
    Other,
}

impl Relationship {
    pub const ALL: [Relationship; 6] = [
        Relationship::Family,
        Relationship::Partner,
        Relationship::Friend,
        Relationship::Colleague,
        Relationship::Acquaintance,
        Relationship::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Family => "family",
            Relationship::Partner => "partner",
            Relationship::Friend => "friend",
            Relationship::Colleague => "colleague",
            Relationship::Acquaintance => "acquaintance",
            Relationship::Other => "other",
        }
    }

    /// Match a tag case-insensitively; anything unrecognized is `Other`
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(tag.trim()))
            .unwrap_or_default()
    }
}

/// A person
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    /// Sanitized name, also the file stem
    pub id: String,
    pub relationship: Relationship,
    pub birthday: Option<Birthday>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub last_contact: Option<NaiveDate>,
    pub unknown: UnknownFields,
    pub body: String,
}

impl Person {
    /// A new person named `name`. Fails if nothing usable is left of the
    /// name once filesystem-reserved characters are removed.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self::with_id(identity_for(name)?))
    }

    fn with_id(id: String) -> Self {
        Self {
            id,
            relationship: Relationship::Other,
            birthday: None,
            phone: None,
            email: None,
            aliases: Vec::new(),
            tags: Vec::new(),
            last_contact: None,
            unknown: UnknownFields::new(),
            body: String::new(),
        }
    }

    /// Display name; the identity is the name
    pub fn name(&self) -> &str {
        &self.id
    }

    /// Age on `today`, when the birth year is known
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birthday.as_ref()?.age_on(today)
    }
}

impl Record for Person {
    const KIND: RecordKind = RecordKind::Person;

    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            key: "relationship",
            decode: |p, v| {
                p.relationship = match &v {
                    Value::String(tag) => Relationship::from_tag(tag),
                    _ => Relationship::Other,
                };
                Ok(())
            },
            encode: |p| Some(Field::Text(p.relationship.as_str().to_string())),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "birthday",
            decode: |p, v| fields::optional(v, fields::decode_birthday).map(|b| p.birthday = b),
            encode: |p| p.birthday.map(|b| Field::Text(b.to_string())),
            when_empty: EmptyPolicy::Placeholder,
        },
        FieldSpec {
            key: "phone",
            decode: |p, v| fields::optional(v, fields::decode_string).map(|n| p.phone = n),
            encode: |p| p.phone.as_deref().map(fields::text),
            when_empty: EmptyPolicy::Placeholder,
        },
        FieldSpec {
            key: "email",
            decode: |p, v| fields::optional(v, fields::decode_string).map(|e| p.email = e),
            encode: |p| p.email.as_deref().map(fields::text),
            when_empty: EmptyPolicy::Placeholder,
        },
        FieldSpec {
            key: "aliases",
            decode: |p, v| fields::decode_list(v).map(|a| p.aliases = a),
            encode: |p| fields::list(&p.aliases),
            when_empty: EmptyPolicy::Placeholder,
        },
        FieldSpec {
            key: "tags",
            decode: |p, v| fields::decode_list(v).map(|t| p.tags = t),
            encode: |p| fields::list(&p.tags),
            when_empty: EmptyPolicy::Omit,
        },
        FieldSpec {
            key: "last_contact",
            decode: |p, v| fields::optional(v, fields::decode_day).map(|d| p.last_contact = d),
            encode: |p| p.last_contact.as_ref().map(fields::day),
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
        RecordPath::new(&layout.people, &self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{parse_record, serialize_record};

    #[test]
    fn test_new_person_template() {
        let person = Person::new("  Jane   Doe ").unwrap();
        assert_eq!(person.id, "Jane Doe");
        assert_eq!(
            serialize_record(&person),
            "---\nrelationship: other\nbirthday:\nphone:\nemail:\naliases:\n---\n\n\n"
        );
    }

    #[test]
    fn test_invalid_name() {
        assert!(Person::new("///").is_err());
    }

    #[test]
    fn test_relationship_default() {
        let p: Person = parse_record("---\nrelationship: Cousin\n---\n", "Sam.md").unwrap();
        assert_eq!(p.relationship, Relationship::Other);
        let p: Person = parse_record("---\nrelationship: Friend\n---\n", "Sam.md").unwrap();
        assert_eq!(p.relationship, Relationship::Friend);
        let p: Person = parse_record("---\n---\n", "Sam.md").unwrap();
        assert_eq!(p.relationship, Relationship::Other);
    }

    #[test]
    fn test_birthday_year_is_preserved() {
        let legacy: Person = parse_record("---\nbirthday: 05-20\n---\n", "A.md").unwrap();
        assert_eq!(legacy.birthday.unwrap().year, None);
        assert!(serialize_record(&legacy).contains("birthday: 05-20\n"));

        let full: Person = parse_record("---\nbirthday: 1990-05-20\n---\n", "B.md").unwrap();
        assert_eq!(full.birthday.unwrap().year, Some(1990));
        assert!(serialize_record(&full).contains("birthday: 1990-05-20\n"));

        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(legacy.age_on(today), None);
        assert_eq!(full.age_on(today), Some(34));
    }

    #[test]
    fn test_numeric_phone_reads_as_text() {
        let p: Person = parse_record("---\nphone: 5551234\n---\n", "Sam.md").unwrap();
        assert_eq!(p.phone.as_deref(), Some("5551234"));
        assert!(serialize_record(&p).contains("phone: \"5551234\"\n"));
    }

    #[test]
    fn test_placeholders_roundtrip() {
        let text = "---\nrelationship: friend\nbirthday:\nphone:\nemail: sam@example.com\naliases:\n---\n\nMet at university.\n";
        let p: Person = parse_record(text, "Sam.md").unwrap();
        assert_eq!(p.email.as_deref(), Some("sam@example.com"));
        assert_eq!(p.birthday, None);
        assert_eq!(serialize_record(&p), text);
    }

    #[test]
    fn test_aliases_and_handles() {
        let text = "---\naliases: [Sammy, \"@sam\"]\n---\n";
        let p: Person = parse_record(text, "Sam.md").unwrap();
        assert_eq!(p.aliases, vec!["Sammy", "@sam"]);
        assert!(serialize_record(&p).contains("aliases:\n  - Sammy\n  - \"@sam\"\n"));
    }

    #[test]
    fn test_line_break_cannot_add_keys() {
        let mut person = Person::new("Sam").unwrap();
        person.email = Some("x\nrelationship: family".into());
        person.aliases = vec!["Sammy\nbirthday: 01-01".into()];

        let back: Person = parse_record(&serialize_record(&person), "Sam.md").unwrap();
        assert_eq!(back.relationship, Relationship::Other);
        assert_eq!(back.birthday, None);
        assert_eq!(back.email.as_deref(), Some("x relationship: family"));
        assert_eq!(back.aliases, vec!["Sammy birthday: 01-01"]);
    }

    #[test]
    fn test_newline_terminated_empty_header() {
        let p: Person = parse_record("---\n---\n", "Sam.md").unwrap();
        assert_eq!(p.name(), "Sam");
        assert!(p.body.is_empty());
    }
}
