use crate::event::SourceEvent;
use crate::generator::{self, GenerateSummary};
use crate::method::RevisionMethod;
use crate::session::ReviewSession;
use crate::session_validation::{self, SessionValidationError};
use crate::window::{SchedulingWindow, SchedulingWindowConfig, WindowValidationError};
use chrono::{NaiveDate, NaiveTime};
use polars::prelude::PlSmallStr;
use polars::prelude::*;

/// The current revision plan: imported source events, the scheduling window
/// and method, and the generated session table.
///
/// The session DataFrame is the tabular artifact the user sees and exports;
/// it is rebuilt from scratch on every [`RevisionPlan::generate`] call.
#[derive(Debug)]
pub struct RevisionPlan {
    df: DataFrame,
    events: Vec<SourceEvent>,
    window: SchedulingWindow,
    method: RevisionMethod,
}

impl RevisionPlan {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), SchedulingWindow::default(), RevisionMethod::default())
    }

    pub(crate) fn from_parts(
        events: Vec<SourceEvent>,
        window: SchedulingWindow,
        method: RevisionMethod,
    ) -> Self {
        let schema = Self::default_schema();
        Self {
            df: DataFrame::empty_with_schema(&schema),
            events,
            window,
            method,
        }
    }

    fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new(
                "Date".into(),
                DataType::Datetime(TimeUnit::Milliseconds, None),
            ),
            Field::new("Cours".into(), DataType::String),
            Field::new("Méthode".into(), DataType::String),
            Field::new("Durée (minutes)".into(), DataType::Int64),
        ])
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn events(&self) -> &[SourceEvent] {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Replace the imported events. The session table keeps its previous
    /// content until the next generation run.
    pub fn set_events(&mut self, events: Vec<SourceEvent>) {
        self.events = events;
    }

    /// Render the imported events as a two-column table for display.
    pub fn events_dataframe(&self) -> PolarsResult<DataFrame> {
        let starts: Vec<i64> = self
            .events
            .iter()
            .map(|event| event.start.and_utc().timestamp_millis())
            .collect();
        let summaries: Vec<&str> = self
            .events
            .iter()
            .map(|event| event.summary.as_str())
            .collect();
        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static("start"), starts)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .into_column(),
            Series::new(PlSmallStr::from_static("summary"), summaries).into_column(),
        ])
    }

    pub fn window(&self) -> &SchedulingWindow {
        &self.window
    }

    pub fn window_config(&self) -> SchedulingWindowConfig {
        self.window.to_config()
    }

    pub fn set_window(&mut self, window: SchedulingWindow) -> Result<(), WindowValidationError> {
        window.validate()?;
        self.window = window;
        Ok(())
    }

    pub fn set_window_from_config(
        &mut self,
        config: &SchedulingWindowConfig,
    ) -> Result<(), WindowValidationError> {
        let window = SchedulingWindow::from_config(config)?;
        self.set_window(window)
    }

    fn update_window_with<F>(&mut self, mutator: F) -> Result<(), WindowValidationError>
    where
        F: FnOnce(&mut SchedulingWindow),
    {
        let mut window = self.window.clone();
        mutator(&mut window);
        self.set_window(window)
    }

    pub fn set_date_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), WindowValidationError> {
        self.update_window_with(|window| {
            window.range_start = start;
            window.range_end = end;
        })
    }

    pub fn set_daily_hours(
        &mut self,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<(), WindowValidationError> {
        self.update_window_with(|window| {
            window.day_start = start;
            window.day_end = end;
        })
    }

    pub fn set_session_duration(&mut self, minutes: i64) -> Result<(), WindowValidationError> {
        self.update_window_with(|window| {
            window.session_duration_minutes = minutes;
        })
    }

    pub fn reset_window_to_default(&mut self) {
        self.window = SchedulingWindow::default();
    }

    pub fn method(&self) -> RevisionMethod {
        self.method
    }

    pub fn set_method(&mut self, method: RevisionMethod) {
        self.method = method;
    }

    fn validation_error(err: WindowValidationError) -> PolarsError {
        PolarsError::ComputeError(err.to_string().into())
    }

    fn session_error(err: SessionValidationError) -> PolarsError {
        PolarsError::ComputeError(err.to_string().into())
    }

    /// Run the generator over the current events, window, and method, and
    /// rebuild the session table from scratch.
    pub fn generate(&mut self) -> Result<GenerateSummary, PolarsError> {
        let (sessions, summary) =
            generator::generate_schedule_with_summary(&self.events, self.method, &self.window)
                .map_err(Self::validation_error)?;
        self.replace_sessions(&sessions)?;
        Ok(summary)
    }

    pub fn sessions(&self) -> PolarsResult<Vec<ReviewSession>> {
        let mut sessions = Vec::with_capacity(self.df.height());
        for idx in 0..self.df.height() {
            sessions.push(ReviewSession::from_dataframe_row(&self.df, idx)?);
        }
        Ok(sessions)
    }

    pub fn find_session(&self, index: usize) -> PolarsResult<Option<ReviewSession>> {
        if index >= self.df.height() {
            return Ok(None);
        }
        ReviewSession::from_dataframe_row(&self.df, index).map(Some)
    }

    pub fn session_count(&self) -> usize {
        self.df.height()
    }

    /// Replace the session table wholesale. Row order is the sequence order
    /// of `sessions`, which is also the generation order.
    pub fn replace_sessions(&mut self, sessions: &[ReviewSession]) -> PolarsResult<()> {
        session_validation::validate_session_collection(sessions)
            .map_err(Self::session_error)?;
        let mut df = DataFrame::empty_with_schema(&Self::default_schema());
        for session in sessions {
            let row = session.to_dataframe_row()?;
            df = df.vstack(&row)?;
        }
        self.df = df;
        Ok(())
    }

    pub fn clear_sessions(&mut self) {
        self.df = DataFrame::empty_with_schema(&Self::default_schema());
    }
}

impl Default for RevisionPlan {
    fn default() -> Self {
        Self::new()
    }
}
