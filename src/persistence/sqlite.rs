use super::{PersistenceError, PersistenceResult, PlanStore};
use crate::event::SourceEvent;
use crate::method::RevisionMethod;
use crate::plan::RevisionPlan;
use crate::session::ReviewSession;
use crate::window::{SchedulingWindow, SchedulingWindowConfig};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

/// Whole-plan replace on every save. Events and sessions are keyed by their
/// position in the sequence so generation order survives a round trip.
pub struct SqlitePlanStore {
    connection: Mutex<Connection>,
}

impl SqlitePlanStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS plan_settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                window_json TEXT NOT NULL,
                method TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS source_events (
                position INTEGER PRIMARY KEY,
                event_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS review_sessions (
                position INTEGER PRIMARY KEY,
                session_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_settings(&self, tx: &rusqlite::Transaction, plan: &RevisionPlan) -> PersistenceResult<()> {
        let window_json = serde_json::to_string(&plan.window_config())?;
        tx.execute("DELETE FROM plan_settings", [])?;
        tx.execute(
            "INSERT INTO plan_settings (id, window_json, method) VALUES (1, ?1, ?2)",
            params![window_json, plan.method().key()],
        )?;
        Ok(())
    }

    fn save_events(&self, tx: &rusqlite::Transaction, plan: &RevisionPlan) -> PersistenceResult<()> {
        tx.execute("DELETE FROM source_events", [])?;
        let mut stmt =
            tx.prepare("INSERT INTO source_events (position, event_json) VALUES (?1, ?2)")?;
        for (position, event) in plan.events().iter().enumerate() {
            let json = serde_json::to_string(event)?;
            stmt.execute(params![position as i64, json])?;
        }
        Ok(())
    }

    fn save_sessions(
        &self,
        tx: &rusqlite::Transaction,
        sessions: &[ReviewSession],
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM review_sessions", [])?;
        let mut stmt =
            tx.prepare("INSERT INTO review_sessions (position, session_json) VALUES (?1, ?2)")?;
        for (position, session) in sessions.iter().enumerate() {
            let json = serde_json::to_string(session)?;
            stmt.execute(params![position as i64, json])?;
        }
        Ok(())
    }
}

impl PlanStore for SqlitePlanStore {
    fn save_plan(&self, plan: &RevisionPlan) -> PersistenceResult<()> {
        super::validate_plan(plan)?;
        let sessions = plan.sessions()?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        self.save_settings(&tx, plan)?;
        self.save_events(&tx, plan)?;
        self.save_sessions(&tx, &sessions)?;
        tx.commit()?;
        Ok(())
    }

    fn load_plan(&self) -> PersistenceResult<Option<RevisionPlan>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare("SELECT window_json, method FROM plan_settings WHERE id = 1")?;
        let settings: Option<(String, String)> = stmt
            .query_row([], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        let Some((window_json, method_key)) = settings else {
            return Ok(None);
        };

        let config: SchedulingWindowConfig = serde_json::from_str(&window_json)?;
        let window = SchedulingWindow::from_config(&config)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        let method = RevisionMethod::from_key(&method_key).ok_or_else(|| {
            PersistenceError::InvalidData(format!("unknown revision method '{method_key}'"))
        })?;

        let mut stmt =
            conn.prepare("SELECT event_json FROM source_events ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut events = Vec::new();
        for json in rows {
            let event: SourceEvent = serde_json::from_str(&json?)?;
            events.push(event);
        }

        let mut stmt =
            conn.prepare("SELECT session_json FROM review_sessions ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut sessions = Vec::new();
        for json in rows {
            let session: ReviewSession = serde_json::from_str(&json?)?;
            sessions.push(session);
        }

        super::validate_events(&events)?;
        super::validate_sessions(&sessions)?;

        let mut plan = RevisionPlan::from_parts(events, window, method);
        plan.replace_sessions(&sessions)?;
        Ok(Some(plan))
    }
}
