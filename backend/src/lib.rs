use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;
use valentine_core::{DayStatus, Progress, ProgressError, ProgressEvent};

#[derive(Clone, Default)]
pub struct AppState {
    store: Arc<RwLock<StoreData>>,
    persist_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StoreData {
    progress: Option<ProgressRecord>,
    status_checks: Vec<StatusCheck>,
}

impl AppState {
    pub async fn with_persistence(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut state = Self::default();
        state.persist_path = Some(path.clone());
        if let Ok(bytes) = tokio::fs::read(&path).await {
            if let Ok(saved) = serde_json::from_slice::<StoreData>(&bytes) {
                let mut store = state.store.write().await;
                *store = saved;
            }
        }
        state
    }

    async fn persist(&self) {
        if let Some(path) = &self.persist_path {
            let snapshot = {
                let store = self.store.read().await;
                store.clone()
            };
            if let Ok(json) = serde_json::to_vec_pretty(&snapshot) {
                if let Err(err) = tokio::fs::write(path, json).await {
                    error!("persist error: {err}");
                }
            }
        }
    }
}

/// The single stored progress record: the core `Progress` fields plus the
/// persistence envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: String,
    pub days: Vec<DayStatus>,
    pub replay_mode: bool,
    pub all_completed: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

impl ProgressRecord {
    fn new(now: u64) -> Self {
        let progress = Progress::new();
        Self {
            user_id: Uuid::new_v4().to_string(),
            days: progress.days,
            replay_mode: progress.replay_mode,
            all_completed: progress.all_completed,
            created_at: now,
            updated_at: now,
        }
    }

    fn to_progress(&self) -> Progress {
        Progress {
            days: self.days.clone(),
            replay_mode: self.replay_mode,
            all_completed: self.all_completed,
        }
    }

    fn apply(&mut self, progress: Progress, now: u64) {
        self.days = progress.days;
        self.replay_mode = progress.replay_mode;
        self.all_completed = progress.all_completed;
        self.updated_at = now;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: u64,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(root))
        .route(
            "/api/status",
            get(list_status_checks).post(create_status_check),
        )
        .route("/api/progress", get(get_progress))
        .route("/api/progress/complete", post(complete_day))
        .route("/api/progress/reset", post(reset_progress))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Valentine's Week App API" }))
}

#[derive(Deserialize)]
struct StatusCheckRequest {
    client_name: String,
}

async fn create_status_check(
    State(state): State<AppState>,
    Json(payload): Json<StatusCheckRequest>,
) -> impl IntoResponse {
    let check = StatusCheck {
        id: Uuid::new_v4().to_string(),
        client_name: payload.client_name,
        timestamp: now_millis(),
    };

    let mut store = state.store.write().await;
    store.status_checks.push(check.clone());
    drop(store);
    state.persist().await;

    (StatusCode::OK, Json(check)).into_response()
}

async fn list_status_checks(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(store.status_checks.clone())
}

async fn get_progress(State(state): State<AppState>) -> impl IntoResponse {
    let mut store = state.store.write().await;
    let created = store.progress.is_none();
    let record = store
        .progress
        .get_or_insert_with(|| ProgressRecord::new(now_millis()))
        .clone();
    drop(store);

    if created {
        info!(user_id = %record.user_id, "created initial progress record");
        state.persist().await;
    }

    (StatusCode::OK, Json(record)).into_response()
}

#[derive(Deserialize)]
struct CompleteDayRequest {
    day_number: u32,
}

#[derive(Debug, thiserror::Error)]
enum ProgressApiError {
    #[error("progress not found")]
    NotFound,
    #[error(transparent)]
    Invalid(#[from] ProgressError),
}

impl IntoResponse for ProgressApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ProgressApiError::NotFound => StatusCode::NOT_FOUND,
            ProgressApiError::Invalid(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

async fn complete_day(
    State(state): State<AppState>,
    Json(payload): Json<CompleteDayRequest>,
) -> Result<Json<ProgressRecord>, ProgressApiError> {
    let record = apply_complete(&state, payload.day_number).await?;
    Ok(Json(record))
}

async fn apply_complete(
    state: &AppState,
    day_number: u32,
) -> Result<ProgressRecord, ProgressApiError> {
    let mut store = state.store.write().await;
    let record = store.progress.as_mut().ok_or(ProgressApiError::NotFound)?;

    let now = now_millis();
    let mut progress = record.to_progress();
    let events = progress.complete_day(day_number, now)?;
    record.apply(progress, now);
    let updated = record.clone();
    drop(store);

    for event in &events {
        match event {
            ProgressEvent::DayCompleted { day_number } => {
                info!(day_number = *day_number, "day completed");
            }
            ProgressEvent::AllDaysCompleted => {
                info!("all days completed; replay mode enabled");
            }
        }
    }
    state.persist().await;

    Ok(updated)
}

async fn reset_progress(State(state): State<AppState>) -> impl IntoResponse {
    let mut store = state.store.write().await;
    store.progress = None;
    drop(store);
    state.persist().await;

    info!("progress reset");
    Json(serde_json::json!({ "message": "Progress reset successfully" }))
}
