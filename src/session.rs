use crate::method::RevisionMethod;
use chrono::{DateTime, Duration, NaiveDateTime};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One generated spaced-repetition study slot derived from a source event.
/// Never mutated after creation; a generation run rebuilds the full sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSession {
    pub scheduled_at: NaiveDateTime,
    pub source_title: String,
    pub method: RevisionMethod,
    pub duration_minutes: i64,
}

impl ReviewSession {
    pub fn new(
        scheduled_at: NaiveDateTime,
        source_title: impl Into<String>,
        method: RevisionMethod,
        duration_minutes: i64,
    ) -> Self {
        Self {
            scheduled_at,
            source_title: source_title.into(),
            method,
            duration_minutes,
        }
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.scheduled_at + Duration::minutes(self.duration_minutes)
    }

    /// Column names match the exported plan table, so the DataFrame renders
    /// and serializes exactly as the user-facing artifact.
    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(4);

        let date_data: [i64; 1] = [Self::datetime_to_i64(self.scheduled_at)];
        columns.push(
            Series::new(PlSmallStr::from_static("Date"), date_data)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .into_column(),
        );

        let course_data: [&str; 1] = [self.source_title.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("Cours"), course_data).into_column());

        let method_data: [&str; 1] = [self.method.display_name()];
        columns.push(Series::new(PlSmallStr::from_static("Méthode"), method_data).into_column());

        let duration_data: [i64; 1] = [self.duration_minutes];
        columns.push(
            Series::new(PlSmallStr::from_static("Durée (minutes)"), duration_data).into_column(),
        );

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let millis = df
            .column("Date")?
            .datetime()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("session row missing Date".into()))?;
        let scheduled_at = Self::datetime_from_i64(millis)?;

        let source_title = df
            .column("Cours")?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let method_name = df.column("Méthode")?.str()?.get(row_idx).unwrap_or("");
        let method = RevisionMethod::from_display_name(method_name).ok_or_else(|| {
            PolarsError::ComputeError(
                format!("session row has unknown revision method '{method_name}'").into(),
            )
        })?;

        let duration_minutes = df
            .column("Durée (minutes)")?
            .i64()?
            .get(row_idx)
            .unwrap_or(0);

        Ok(Self {
            scheduled_at,
            source_title,
            method,
            duration_minutes,
        })
    }

    fn datetime_to_i64(at: NaiveDateTime) -> i64 {
        at.and_utc().timestamp_millis()
    }

    fn datetime_from_i64(millis: i64) -> PolarsResult<NaiveDateTime> {
        DateTime::from_timestamp_millis(millis)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| {
                PolarsError::ComputeError(format!("timestamp {millis} out of range").into())
            })
    }
}
