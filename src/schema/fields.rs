//! Shared field codecs
//!
//! Decoders take ownership of the header [`Value`] and hand it back
//! unchanged when it does not fit, so the caller can keep it as written.
//! Encoders produce a [`Field`] or `None` when the slot is empty.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use daybook_frontmatter::{
    format_day, format_moment, format_one_decimal, format_string, parse_inline_list, Value,
    DAY_FORMAT,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Field;

// =============================================================================
// Decoders
// =============================================================================

/// A bare `key:` line parses as an empty array; typed scalar fields read it
/// as "no value".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Decode an optional field, treating a blank value as absent
pub fn optional<T>(
    value: Value,
    decode: fn(Value) -> Result<T, Value>,
) -> Result<Option<T>, Value> {
    if is_blank(&value) {
        return Ok(None);
    }
    decode(value).map(Some)
}

/// Strings, and integers read as text (phone numbers, years in titles)
pub fn decode_string(value: Value) -> Result<String, Value> {
    match value {
        Value::String(s) => Ok(s),
        Value::Int(i) => Ok(i.to_string()),
        other => Err(other),
    }
}

pub fn decode_int(value: Value) -> Result<i64, Value> {
    match value {
        Value::Int(i) => Ok(i),
        other => Err(other),
    }
}

pub fn decode_double(value: Value) -> Result<f64, Value> {
    match value.as_f64() {
        Some(d) => Ok(d),
        None => Err(value),
    }
}

/// A list from either a block array or an inline `[a, b]` string.
///
/// A lone scalar counts as a one-item list.
pub fn decode_list(value: Value) -> Result<Vec<String>, Value> {
    match value {
        Value::Array(items) => Ok(clean_items(items)),
        Value::String(s) => match parse_inline_list(&s) {
            Some(items) => Ok(items),
            None if s.trim().is_empty() => Ok(Vec::new()),
            None => Ok(vec![s.trim().to_string()]),
        },
        Value::Int(i) => Ok(vec![i.to_string()]),
        Value::Bool(b) => Ok(vec![b.to_string()]),
        other => Err(other),
    }
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// An instant. A bare `YYYY-MM-DD` is read as local midnight.
pub fn decode_moment(value: Value) -> Result<DateTime<Local>, Value> {
    match value {
        Value::DateTime(dt) => Ok(dt.with_timezone(&Local)),
        Value::String(s) => local_midnight(&s).ok_or(Value::String(s)),
        other => Err(other),
    }
}

fn local_midnight(s: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDate::parse_from_str(s, DAY_FORMAT).ok()?.and_hms_opt(0, 0, 0)?;
    Local.from_local_datetime(&naive).earliest()
}

/// A calendar day. Full timestamps keep their local date.
pub fn decode_day(value: Value) -> Result<NaiveDate, Value> {
    match value {
        Value::String(s) => match NaiveDate::parse_from_str(&s, DAY_FORMAT) {
            Ok(day) => Ok(day),
            Err(_) => Err(Value::String(s)),
        },
        Value::DateTime(dt) => Ok(dt.with_timezone(&Local).date_naive()),
        other => Err(other),
    }
}

pub fn decode_coordinates(value: Value) -> Result<Coordinates, Value> {
    match value.as_str().and_then(Coordinates::parse) {
        Some(c) => Ok(c),
        None => Err(value),
    }
}

pub fn decode_birthday(value: Value) -> Result<Birthday, Value> {
    match value {
        Value::String(s) => Birthday::parse(&s).ok_or(Value::String(s)),
        Value::DateTime(dt) => Ok(Birthday::from_date(dt.with_timezone(&Local).date_naive())),
        other => Err(other),
    }
}

// =============================================================================
// Encoders
// =============================================================================

/// A string, quoted if needed
pub fn text(s: &str) -> Field {
    Field::Text(format_string(s))
}

/// A block list, or `None` when empty
pub fn list(items: &[String]) -> Option<Field> {
    if items.is_empty() {
        None
    } else {
        Some(Field::List(items.to_vec()))
    }
}

pub fn int(i: i64) -> Field {
    Field::Text(i.to_string())
}

pub fn one_decimal(d: f64) -> Field {
    Field::Text(format_one_decimal(d))
}

pub fn moment(dt: &DateTime<Local>) -> Field {
    Field::Text(format_moment(dt))
}

pub fn day(d: &NaiveDate) -> Field {
    Field::Text(format_day(d))
}

// =============================================================================
// Coordinates
// =============================================================================

/// A latitude/longitude pair, stored as `"lat,lon"` with five decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse `lat,lon`. Anything other than two finite numbers is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return None;
        }
        let latitude = parts[0].trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        let longitude = parts[1].trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(Self::new(latitude, longitude))
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

// =============================================================================
// Birthday
// =============================================================================

/// Month and day of birth, with the year when it is known.
///
/// Written `YYYY-MM-DD`, or `MM-DD` when the year is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthday {
    pub year: Option<i32>,
    pub month: u32,
    pub day: u32,
}

/// Leap year used to validate year-less dates so that Feb 29 is allowed
const PLACEHOLDER_YEAR: i32 = 2000;

impl Birthday {
    pub fn new(year: Option<i32>, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year.unwrap_or(PLACEHOLDER_YEAR), month, day)?;
        Some(Self { year, month, day })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: Some(date.year()),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Parse `MM-DD` or `YYYY-MM-DD`
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        match parts.as_slice() {
            [month, day] => Self::new(None, month.parse().ok()?, day.parse().ok()?),
            [year, month, day] if year.len() == 4 => Self::new(
                Some(year.parse().ok()?),
                month.parse().ok()?,
                day.parse().ok()?,
            ),
            _ => None,
        }
    }

    /// Full date, only when the year is known
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month, self.day)
    }

    /// Age in whole years on `today`. `None` without a birth year.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let born = self.date()?;
        let mut age = today.year() - born.year();
        if (today.month(), today.day()) < (self.month, self.day) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{:04}-{:02}-{:02}", year, self.month, self.day),
            None => write!(f, "{:02}-{:02}", self.month, self.day),
        }
    }
}
