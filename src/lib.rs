pub mod event;
pub mod generator;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod ics;
pub mod method;
pub mod persistence;
pub mod plan;
pub mod session;
pub(crate) mod session_validation;
pub mod window;

pub use event::SourceEvent;
pub use generator::{
    GenerateSummary, REPETITIONS_PER_EVENT, generate_schedule, generate_schedule_with_summary,
};
pub use ics::{ParseError, parse_calendar, write_calendar};
pub use method::RevisionMethod;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqlitePlanStore;
pub use persistence::{
    PersistenceError, PlanStore, load_events_from_ics, load_plan_from_json,
    load_sessions_from_csv, save_plan_to_csv, save_plan_to_ics, save_plan_to_json,
    sessions_to_csv_bytes, validate_plan, validate_sessions,
};
pub use plan::RevisionPlan;
pub use session::ReviewSession;
pub use window::{
    MAX_SESSION_MINUTES, MIN_SESSION_MINUTES, SchedulingWindow, SchedulingWindowConfig,
    WindowValidationError,
};
