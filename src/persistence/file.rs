use super::{PersistenceError, PersistenceResult};
use crate::event::SourceEvent;
use crate::ics;
use crate::method::RevisionMethod;
use crate::plan::RevisionPlan;
use crate::session::ReviewSession;
use crate::window::{SchedulingWindow, SchedulingWindowConfig};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::Path;

const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the exported plan table. The serde renames pin the header to
/// exactly `Date,Cours,Méthode,Durée (minutes)`.
#[derive(Serialize, Deserialize)]
struct SessionCsvRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Cours")]
    course: String,
    #[serde(rename = "Méthode")]
    method: String,
    #[serde(rename = "Durée (minutes)")]
    duration_minutes: i64,
}

impl From<&ReviewSession> for SessionCsvRecord {
    fn from(session: &ReviewSession) -> Self {
        Self {
            date: session.scheduled_at.format(CSV_DATETIME_FORMAT).to_string(),
            course: session.source_title.clone(),
            method: session.method.display_name().to_string(),
            duration_minutes: session.duration_minutes,
        }
    }
}

impl SessionCsvRecord {
    fn into_session(self) -> PersistenceResult<ReviewSession> {
        let scheduled_at = NaiveDateTime::parse_from_str(self.date.trim(), CSV_DATETIME_FORMAT)
            .map_err(|e| {
                PersistenceError::InvalidData(format!("invalid date '{}': {e}", self.date))
            })?;
        let method = RevisionMethod::from_display_name(&self.method)
            .or_else(|| RevisionMethod::from_key(&self.method))
            .ok_or_else(|| {
                PersistenceError::InvalidData(format!(
                    "unknown revision method '{}'",
                    self.method
                ))
            })?;
        Ok(ReviewSession {
            scheduled_at,
            source_title: self.course,
            method,
            duration_minutes: self.duration_minutes,
        })
    }
}

/// Encode the session sequence as the user-facing CSV table, in order.
pub fn sessions_to_csv_bytes(sessions: &[ReviewSession]) -> PersistenceResult<Vec<u8>> {
    super::validate_sessions(sessions)?;
    let mut writer = csv::Writer::from_writer(Vec::new());
    for session in sessions {
        writer.serialize(SessionCsvRecord::from(session))?;
    }
    writer
        .into_inner()
        .map_err(|err| PersistenceError::Io(err.into_error()))
}

pub fn save_plan_to_csv<P: AsRef<Path>>(plan: &RevisionPlan, path: P) -> PersistenceResult<()> {
    let sessions = plan.sessions()?;
    fs::write(path, sessions_to_csv_bytes(&sessions)?)?;
    Ok(())
}

pub fn load_sessions_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<ReviewSession>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut sessions = Vec::new();
    for record in reader.deserialize::<SessionCsvRecord>() {
        sessions.push(record?.into_session()?);
    }
    super::validate_sessions(&sessions)?;
    Ok(sessions)
}

#[derive(Serialize, Deserialize)]
struct PlanSnapshot {
    window: SchedulingWindowConfig,
    method: RevisionMethod,
    events: Vec<SourceEvent>,
    sessions: Vec<ReviewSession>,
}

impl PlanSnapshot {
    fn from_plan(plan: &RevisionPlan) -> PersistenceResult<Self> {
        let sessions = plan.sessions()?;
        super::validate_sessions(&sessions)?;
        super::validate_events(plan.events())?;
        Ok(Self {
            window: plan.window_config(),
            method: plan.method(),
            events: plan.events().to_vec(),
            sessions,
        })
    }

    fn into_plan(self) -> PersistenceResult<RevisionPlan> {
        let window = SchedulingWindow::from_config(&self.window)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        super::validate_events(&self.events)?;
        super::validate_sessions(&self.sessions)?;
        let mut plan = RevisionPlan::from_parts(self.events, window, self.method);
        plan.replace_sessions(&self.sessions)?;
        Ok(plan)
    }
}

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &RevisionPlan, path: P) -> PersistenceResult<()> {
    let snapshot = PlanSnapshot::from_plan(plan)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<RevisionPlan> {
    let file = File::open(path)?;
    let snapshot: PlanSnapshot = serde_json::from_reader(file)?;
    snapshot.into_plan()
}

pub fn save_plan_to_ics<P: AsRef<Path>>(plan: &RevisionPlan, path: P) -> PersistenceResult<()> {
    let sessions = plan.sessions()?;
    super::validate_sessions(&sessions)?;
    fs::write(path, ics::write_calendar(&sessions))?;
    Ok(())
}

pub fn load_events_from_ics<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<SourceEvent>> {
    let bytes = fs::read(path)?;
    let events =
        ics::parse_calendar(&bytes).map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
    super::validate_events(&events)?;
    Ok(events)
}
