use crate::event::SourceEvent;
use crate::plan::RevisionPlan;
use crate::session::ReviewSession;
use crate::session_validation;
use polars::prelude::PolarsError;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    DataFrame(PolarsError),
    Io(io::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    Csv(csv::Error),
    InvalidData(String),
    NotFound,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::DataFrame(err) => write!(f, "dataframe conversion error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::NotFound => write!(f, "no plan stored"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<PolarsError> for PersistenceError {
    fn from(value: PolarsError) -> Self {
        Self::DataFrame(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait PlanStore {
    fn save_plan(&self, plan: &RevisionPlan) -> PersistenceResult<()>;
    fn load_plan(&self) -> PersistenceResult<Option<RevisionPlan>>;
}

pub fn validate_sessions(sessions: &[ReviewSession]) -> PersistenceResult<()> {
    session_validation::validate_session_collection(sessions)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub fn validate_events(events: &[SourceEvent]) -> PersistenceResult<()> {
    session_validation::validate_source_events(events)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub fn validate_plan(plan: &RevisionPlan) -> PersistenceResult<()> {
    validate_events(plan.events())?;
    let sessions = plan.sessions()?;
    validate_sessions(&sessions)
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_events_from_ics, load_plan_from_json, load_sessions_from_csv, save_plan_to_csv,
    save_plan_to_ics, save_plan_to_json, sessions_to_csv_bytes,
};
