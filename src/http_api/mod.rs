use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::generator::GenerateSummary;
use crate::ics;
use crate::method::RevisionMethod;
use crate::persistence;
use crate::plan::RevisionPlan;
use crate::session::ReviewSession;
use crate::window::SchedulingWindowConfig;

#[derive(Clone)]
pub struct AppState {
    plan: Arc<RwLock<RevisionPlan>>,
}

impl AppState {
    pub fn new(plan: RevisionPlan) -> Self {
        Self {
            plan: Arc::new(RwLock::new(plan)),
        }
    }

    pub fn with_shared(plan: Arc<RwLock<RevisionPlan>>) -> Self {
        Self { plan }
    }

    fn plan(&self) -> Arc<RwLock<RevisionPlan>> {
        self.plan.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<polars::prelude::PolarsError> for ApiError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MethodPayload {
    method: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/window", get(get_window).put(update_window))
        .route("/method", get(get_method).put(update_method))
        .route("/events", get(list_events).post(import_events))
        .route("/generate", post(generate))
        .route("/plan", get(list_sessions))
        .route("/plan.csv", get(export_csv))
        .route("/plan.ics", get(export_ics))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, plan: RevisionPlan) -> std::io::Result<()> {
    let state = AppState::new(plan);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_window(State(state): State<AppState>) -> Json<SchedulingWindowConfig> {
    let plan = state.plan();
    let config = {
        let guard = plan.read();
        guard.window_config()
    };
    Json(config)
}

async fn update_window(
    State(state): State<AppState>,
    Json(config): Json<SchedulingWindowConfig>,
) -> Result<Json<SchedulingWindowConfig>, ApiError> {
    let plan = state.plan();
    let current = {
        let mut guard = plan.write();
        guard
            .set_window_from_config(&config)
            .map_err(|err| ApiError::invalid(err.to_string()))?;
        guard.window_config()
    };
    Ok(Json(current))
}

fn method_body(method: RevisionMethod) -> serde_json::Value {
    json!({ "method": method.key(), "display_name": method.display_name() })
}

async fn get_method(State(state): State<AppState>) -> Json<serde_json::Value> {
    let plan = state.plan();
    let method = {
        let guard = plan.read();
        guard.method()
    };
    Json(method_body(method))
}

async fn update_method(
    State(state): State<AppState>,
    Json(payload): Json<MethodPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let method = RevisionMethod::from_key(payload.method.trim()).ok_or_else(|| {
        ApiError::invalid(format!("unknown revision method '{}'", payload.method))
    })?;
    let plan = state.plan();
    {
        let mut guard = plan.write();
        guard.set_method(method);
    }
    Ok(Json(method_body(method)))
}

async fn list_events(State(state): State<AppState>) -> Json<Vec<crate::SourceEvent>> {
    let plan = state.plan();
    let events = {
        let guard = plan.read();
        guard.events().to_vec()
    };
    Json(events)
}

async fn import_events(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let events =
        ics::parse_calendar(&body).map_err(|err| ApiError::invalid(err.to_string()))?;
    let imported = events.len();
    let plan = state.plan();
    {
        let mut guard = plan.write();
        guard.set_events(events);
    }
    tracing::info!(imported, "imported source events from calendar upload");
    Ok(Json(json!({ "imported": imported })))
}

async fn generate(State(state): State<AppState>) -> Result<Json<GenerateSummary>, ApiError> {
    let plan = state.plan();
    let summary = {
        let mut guard = plan.write();
        guard.generate().map_err(ApiError::from)?
    };
    tracing::info!(sessions = summary.session_count, "generated revision plan");
    Ok(Json(summary))
}

async fn list_sessions(State(state): State<AppState>) -> Result<Json<Vec<ReviewSession>>, ApiError> {
    let plan = state.plan();
    let sessions = {
        let guard = plan.read();
        guard.sessions()?
    };
    Ok(Json(sessions))
}

async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let plan = state.plan();
    let sessions = {
        let guard = plan.read();
        guard.sessions()?
    };
    let bytes = persistence::sessions_to_csv_bytes(&sessions)
        .map_err(|err| ApiError::internal(err.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"planning_revisions.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn export_ics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let plan = state.plan();
    let sessions = {
        let guard = plan.read();
        guard.sessions()?
    };
    let bytes = ics::write_calendar(&sessions);
    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"planning_revisions.ics\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
