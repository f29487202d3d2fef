// 🌐 Web Server - dashboard page + JSON API over the shared Dashboard
//
// Every request takes the dashboard lock and runs to completion, so actions are
// applied one at a time in arrival order.

use crate::dashboard::{ActionStatus, Dashboard, DashboardView, EntryForm};
use crate::record::Record;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Dashboard>, ApiError> {
        self.dashboard
            .lock()
            .map_err(|_| ApiError(anyhow::anyhow!("dashboard state poisoned by an earlier panic")))
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// Wrap a view; a rejected action answers 422 with the message in `error`
fn view_response(view: DashboardView) -> Response {
    if view.status == ActionStatus::Rejected {
        let error = Some(view.error.clone());
        let body = ApiResponse {
            success: false,
            data: view,
            error,
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    } else {
        (StatusCode::OK, Json(ApiResponse::ok(view))).into_response()
    }
}

/// Failure that is not the user's fault (storage, poisoned lock)
struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {:#}", self.0);
        let body = ApiResponse {
            success: false,
            data: (),
            error: Some(format!("{:#}", self.0)),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(err)
    }
}

#[derive(Debug, Deserialize)]
struct RemoveRequest {
    #[serde(default)]
    date: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/records - All records, ascending by date
async fn get_records(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Record>>>, ApiError> {
    let dashboard = state.lock()?;
    Ok(Json(ApiResponse::ok(dashboard.store().all_sorted().to_vec())))
}

/// GET /api/dashboard - Charts, messages and totals
async fn get_dashboard(State(state): State<AppState>) -> Result<Response, ApiError> {
    let dashboard = state.lock()?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(dashboard.view()))).into_response())
}

/// POST /api/records - Add an entry
async fn add_record(
    State(state): State<AppState>,
    Json(form): Json<EntryForm>,
) -> Result<Response, ApiError> {
    let mut dashboard = state.lock()?;
    let view = dashboard.add(&form)?;
    Ok(view_response(view))
}

/// POST /api/records/remove - Remove entries by the date in the body
async fn remove_records(
    State(state): State<AppState>,
    Json(req): Json<RemoveRequest>,
) -> Result<Response, ApiError> {
    let mut dashboard = state.lock()?;
    let view = dashboard.remove(req.date.as_deref())?;
    Ok(view_response(view))
}

/// DELETE /api/records/:date - Remove entries by date
async fn remove_records_by_path(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Response, ApiError> {
    // Decode URL-encoded date (e.g. "2023-09-09%2000:00:00")
    let decoded_date = urlencoding::decode(&date)
        .unwrap_or_else(|_| date.clone().into())
        .into_owned();

    let mut dashboard = state.lock()?;
    let view = dashboard.remove(Some(&decoded_date))?;
    Ok(view_response(view))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/records", get(get_records).post(add_record))
        .route("/records/remove", post(remove_records))
        .route("/records/:date", delete(remove_records_by_path))
        .route("/dashboard", get(get_dashboard))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
