use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SESSION_MINUTES: i64 = 10;
pub const MAX_SESSION_MINUTES: i64 = 120;

/// Start of the fixed daily lunch exclusion. The interval is half-open:
/// a session at exactly 14:00 is allowed, one at exactly 12:00 is not.
pub fn lunch_start() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

pub fn lunch_end() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 0, 0).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowValidationError {
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    DurationOutOfBounds { minutes: i64 },
}

impl fmt::Display for WindowValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowValidationError::StartAfterEnd { start, end } => write!(
                f,
                "range start {start} must be on or before range end {end}"
            ),
            WindowValidationError::DurationOutOfBounds { minutes } => write!(
                f,
                "session duration {minutes} minutes is outside the allowed range {MIN_SESSION_MINUTES}-{MAX_SESSION_MINUTES}"
            ),
        }
    }
}

impl std::error::Error for WindowValidationError {}

/// Caller-supplied constraints shaping a generation run.
///
/// An inverted daily window (`day_start > day_end`) is not an error; it
/// simply admits no candidate. Only the date range and the session duration
/// are validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingWindow {
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub session_duration_minutes: i64,
}

/// Serializable mirror of [`SchedulingWindow`] used for JSON config files and
/// API payloads. Daily hours and duration fall back to defaults when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingWindowConfig {
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    #[serde(default)]
    pub day_start: Option<NaiveTime>,
    #[serde(default)]
    pub day_end: Option<NaiveTime>,
    #[serde(default)]
    pub session_duration_minutes: Option<i64>,
}

impl Default for SchedulingWindow {
    fn default() -> Self {
        Self {
            range_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            range_end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            session_duration_minutes: 30,
        }
    }
}

impl SchedulingWindow {
    pub fn new(range_start: NaiveDate, range_end: NaiveDate) -> Result<Self, WindowValidationError> {
        let window = Self {
            range_start,
            range_end,
            ..Self::default()
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), WindowValidationError> {
        if self.range_start > self.range_end {
            return Err(WindowValidationError::StartAfterEnd {
                start: self.range_start,
                end: self.range_end,
            });
        }
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&self.session_duration_minutes) {
            return Err(WindowValidationError::DurationOutOfBounds {
                minutes: self.session_duration_minutes,
            });
        }
        Ok(())
    }

    pub fn from_config(config: &SchedulingWindowConfig) -> Result<Self, WindowValidationError> {
        let defaults = Self::default();
        let window = Self {
            range_start: config.range_start,
            range_end: config.range_end,
            day_start: config.day_start.unwrap_or(defaults.day_start),
            day_end: config.day_end.unwrap_or(defaults.day_end),
            session_duration_minutes: config
                .session_duration_minutes
                .unwrap_or(defaults.session_duration_minutes),
        };
        window.validate()?;
        Ok(window)
    }

    pub fn to_config(&self) -> SchedulingWindowConfig {
        SchedulingWindowConfig {
            range_start: self.range_start,
            range_end: self.range_end,
            day_start: Some(self.day_start),
            day_end: Some(self.day_end),
            session_duration_minutes: Some(self.session_duration_minutes),
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.range_start <= date && date <= self.range_end
    }

    /// Inside the daily hours (inclusive both ends) and outside the lunch break.
    pub fn admits_time(&self, time: NaiveTime) -> bool {
        self.day_start <= time
            && time <= self.day_end
            && !(lunch_start() <= time && time < lunch_end())
    }

    pub fn admits(&self, at: NaiveDateTime) -> bool {
        self.contains_date(at.date()) && self.admits_time(at.time())
    }
}

impl Default for SchedulingWindowConfig {
    fn default() -> Self {
        SchedulingWindow::default().to_config()
    }
}
