use crate::event::SourceEvent;
use crate::session::ReviewSession;
use crate::window::{MAX_SESSION_MINUTES, MIN_SESSION_MINUTES};
use std::fmt;

#[derive(Debug, Clone)]
pub struct SessionValidationError {
    message: String,
}

impl SessionValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SessionValidationError {}

pub fn validate_session(session: &ReviewSession) -> Result<(), SessionValidationError> {
    if session.source_title.trim().is_empty() {
        return Err(SessionValidationError::new(format!(
            "session at {} has an empty course title",
            session.scheduled_at
        )));
    }
    if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&session.duration_minutes) {
        return Err(SessionValidationError::new(format!(
            "session at {} has duration {} minutes outside the allowed range {}-{}",
            session.scheduled_at, session.duration_minutes, MIN_SESSION_MINUTES, MAX_SESSION_MINUTES
        )));
    }
    Ok(())
}

// Duplicate sessions are legal: the generator never deduplicates, so a
// collection check is per-session only.
pub fn validate_session_collection(
    sessions: &[ReviewSession],
) -> Result<(), SessionValidationError> {
    for session in sessions {
        validate_session(session)?;
    }
    Ok(())
}

pub fn validate_source_event(event: &SourceEvent) -> Result<(), SessionValidationError> {
    if event.summary.trim().is_empty() {
        return Err(SessionValidationError::new(format!(
            "source event at {} has an empty summary",
            event.start
        )));
    }
    Ok(())
}

pub fn validate_source_events(events: &[SourceEvent]) -> Result<(), SessionValidationError> {
    for event in events {
        validate_source_event(event)?;
    }
    Ok(())
}
