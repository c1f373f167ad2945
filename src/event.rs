use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One timestamped calendar entry used as the anchor for generated review sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEvent {
    /// Start of the original course or lecture. Clock time is naive local time.
    pub start: NaiveDateTime,
    /// Course title taken from the calendar SUMMARY property.
    pub summary: String,
}

impl SourceEvent {
    pub fn new(start: NaiveDateTime, summary: impl Into<String>) -> Self {
        Self {
            start,
            summary: summary.into(),
        }
    }
}
