//! Time ranges for audio transcripts
//!
//! A transcript is a list of segments, each covering `[start, end)` seconds
//! of the recording. The compact sidecar form stored in an entry header is
//! `start-end` pairs joined by commas:
//!
//! ```text
//! transcript: 0-5,5.5-9,9-12.25
//! ```
//!
//! The compact form has no slot for segment text, so decoded ranges always
//! carry an empty `text`.

use serde::{Deserialize, Serialize};

/// One transcribed segment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            text: String::new(),
            start,
            end,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open: the end instant belongs to the next segment
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// `start-end` using the default float rendering
    pub fn encode(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }

    /// Parse one `start-end` segment; both halves must be numbers
    pub fn decode(segment: &str) -> Option<Self> {
        let parts: Vec<&str> = segment.split('-').collect();
        if parts.len() != 2 {
            return None;
        }
        let start = parts[0].trim().parse::<f64>().ok()?;
        let end = parts[1].trim().parse::<f64>().ok()?;
        Some(Self::new(start, end))
    }
}

/// Join ranges into the compact sidecar form
pub fn encode(ranges: &[TimeRange]) -> String {
    ranges.iter().map(TimeRange::encode).collect::<Vec<_>>().join(",")
}

/// Decode the compact form, skipping segments that do not parse
pub fn decode(text: &str) -> Vec<TimeRange> {
    text.split(',')
        .filter_map(|segment| TimeRange::decode(segment.trim()))
        .collect()
}

/// The segment playing at `t` seconds, if any
pub fn segment_at(ranges: &[TimeRange], t: f64) -> Option<&TimeRange> {
    ranges.iter().find(|r| r.contains(t))
}
