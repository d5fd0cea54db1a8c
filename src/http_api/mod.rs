use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{Schedule, ScheduleError, ScheduleRequest, ServiceConfig, compute_schedules};

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn max_tasks(&self) -> usize {
        self.config.max_tasks
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    ids: Vec<String>,
}

impl From<&ScheduleError> for ErrorBody {
    fn from(err: &ScheduleError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
            ids: err.ids(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum BatchOutcome {
    Ok(Schedule),
    Error(ErrorBody),
}

#[derive(Debug)]
enum ApiError {
    Schedule(ScheduleError),
    TooManyTasks { count: usize, max: usize },
    Internal(String),
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        ApiError::Schedule(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Schedule(err) => {
                let body = Json(ErrorBody::from(&err));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            ApiError::TooManyTasks { count, max } => {
                let body = Json(ErrorBody {
                    error: "too_many_tasks",
                    message: format!("request has {count} tasks; the limit is {max}"),
                    ids: Vec::new(),
                });
                (StatusCode::PAYLOAD_TOO_LARGE, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                    ids: Vec::new(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", post(compute_one))
        .route("/schedule/batch", post(compute_batch))
        .with_state(state)
}

pub async fn serve(config: ServiceConfig) -> std::io::Result<()> {
    let addr = config.addr;
    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "cpm-schedule HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

fn check_size(state: &AppState, request: &ScheduleRequest) -> Result<(), ApiError> {
    let count = request.tasks.len();
    if count > state.max_tasks() {
        return Err(ApiError::TooManyTasks {
            count,
            max: state.max_tasks(),
        });
    }
    Ok(())
}

async fn compute_one(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<Schedule>, ApiError> {
    check_size(&state, &request)?;
    debug!(tasks = request.tasks.len(), "schedule requested");
    let schedule = tokio::task::spawn_blocking(move || request.compute())
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(schedule))
}

async fn compute_batch(
    State(state): State<AppState>,
    Json(requests): Json<Vec<ScheduleRequest>>,
) -> Result<Json<Vec<BatchOutcome>>, ApiError> {
    for request in &requests {
        check_size(&state, request)?;
    }
    debug!(requests = requests.len(), "schedule batch requested");
    let results = tokio::task::spawn_blocking(move || compute_schedules(&requests))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    let outcomes = results
        .into_iter()
        .map(|result| match result {
            Ok(schedule) => BatchOutcome::Ok(schedule),
            Err(err) => BatchOutcome::Error(ErrorBody::from(&err)),
        })
        .collect();
    Ok(Json(outcomes))
}
