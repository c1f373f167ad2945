use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::event::SourceEvent;
use crate::method::RevisionMethod;
use crate::session::ReviewSession;
use crate::window::{SchedulingWindow, WindowValidationError, lunch_end, lunch_start};

pub const REPETITIONS_PER_EVENT: i64 = 5;

/// Counters describing one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSummary {
    pub event_count: usize,
    pub candidate_count: usize,
    pub session_count: usize,
    pub outside_date_range: usize,
    pub outside_daily_hours: usize,
    pub during_lunch_break: usize,
}

impl GenerateSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("events={}", self.event_count));
        parts.push(format!("sessions={}", self.session_count));
        if self.outside_date_range > 0 {
            parts.push(format!("dropped_date={}", self.outside_date_range));
        }
        if self.outside_daily_hours > 0 {
            parts.push(format!("dropped_hours={}", self.outside_daily_hours));
        }
        if self.during_lunch_break > 0 {
            parts.push(format!("dropped_lunch={}", self.during_lunch_break));
        }
        parts.join(", ")
    }
}

/// Expand each source event into up to five review sessions.
///
/// Output order is generation order: events in input order, repetition index
/// 1..=5 inside each event. The sequence is never re-sorted chronologically
/// and never deduplicated.
pub fn generate_schedule(
    events: &[SourceEvent],
    method: RevisionMethod,
    window: &SchedulingWindow,
) -> Result<Vec<ReviewSession>, WindowValidationError> {
    generate_schedule_with_summary(events, method, window).map(|(sessions, _)| sessions)
}

pub fn generate_schedule_with_summary(
    events: &[SourceEvent],
    method: RevisionMethod,
    window: &SchedulingWindow,
) -> Result<(Vec<ReviewSession>, GenerateSummary), WindowValidationError> {
    window.validate()?;

    let mut summary = GenerateSummary {
        event_count: events.len(),
        candidate_count: 0,
        session_count: 0,
        outside_date_range: 0,
        outside_daily_hours: 0,
        during_lunch_break: 0,
    };

    let mut sessions = Vec::with_capacity(events.len() * REPETITIONS_PER_EVENT as usize);
    for event in events {
        for repetition in 1..=REPETITIONS_PER_EVENT {
            summary.candidate_count += 1;
            // Only the date shifts; the clock time stays that of the source event.
            let candidate = event.start + Duration::days(method.offset_days(repetition));

            if !window.contains_date(candidate.date()) {
                summary.outside_date_range += 1;
                continue;
            }
            let time = candidate.time();
            if time < window.day_start || time > window.day_end {
                summary.outside_daily_hours += 1;
                continue;
            }
            if lunch_start() <= time && time < lunch_end() {
                summary.during_lunch_break += 1;
                continue;
            }

            sessions.push(ReviewSession::new(
                candidate,
                event.summary.clone(),
                method,
                window.session_duration_minutes,
            ));
        }
    }

    summary.session_count = sessions.len();
    Ok((sessions, summary))
}
