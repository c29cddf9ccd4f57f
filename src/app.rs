#![cfg(feature = "web")]

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::cell::CellRef;
use crate::config::ServerConfig;
use crate::error::SessionError;
use crate::session::ReviewSession;
use crate::transfer::MemoryTransfer;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state: the single document under review.
#[derive(Default)]
pub struct AppState {
    session: Mutex<ReviewSession>,
}

impl AppState {
    pub fn new() -> Self {
        AppState::default()
    }

    // A panic while holding the lock cannot leave the session half-updated.
    fn session(&self) -> MutexGuard<'_, ReviewSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Deserialize)]
struct SelectSheet {
    sheet: String,
}

/// Either `cell` in A1 notation or explicit zero-based `row`/`col`.
#[derive(Deserialize)]
struct CellUpdate {
    cell: Option<String>,
    row: Option<usize>,
    col: Option<usize>,
    value: String,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

#[derive(Serialize)]
struct SessionStatus {
    open: bool,
    dirty: bool,
    source: Option<String>,
    active_sheet: Option<String>,
    message: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_review))
        .route("/api/status", get(get_status))
        .route("/api/open", post(open_document))
        .route("/api/sheet", get(get_sheet))
        .route("/api/select_sheet", post(select_sheet))
        .route("/api/update_cell", post(update_cell))
        .route("/api/export", post(export_document))
        .route("/api/clear", post(clear_document))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(AppState::new()));

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("listening on http://{}", config.bind_address());
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_review() -> Html<&'static str> {
    Html(include_str!("./static/review.html"))
}

async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session();
    let document = session.document();
    Json(SessionStatus {
        open: document.is_some(),
        dirty: session.is_dirty(),
        source: document.map(|doc| doc.source_name().to_string()),
        active_sheet: session.active_sheet().map(str::to_string),
        message: session.status_message().map(str::to_string),
    })
}

async fn open_document(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        };
        if field.name() != Some("spreadsheet") {
            continue;
        }
        let filename = field.file_name().unwrap_or("spreadsheet.xlsx").to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((filename, bytes.to_vec())),
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }

    let Some((filename, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No file data received".to_string());
    };

    let mut session = state.session();
    match session.open(&bytes, &filename) {
        Ok(()) => Json(session.view()).into_response(),
        Err(e) => session_error(&session, e),
    }
}

async fn get_sheet(State(state): State<Arc<AppState>>) -> Response {
    match state.session().view() {
        Some(view) => Json(view).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No document is open".to_string()),
    }
}

async fn select_sheet(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectSheet>,
) -> Response {
    let mut session = state.session();
    match session.select_sheet(&payload.sheet) {
        Ok(()) => Json(session.view()).into_response(),
        Err(e) => session_error(&session, e),
    }
}

async fn update_cell(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CellUpdate>,
) -> Response {
    let target = match (&payload.cell, payload.row, payload.col) {
        (Some(name), _, _) => CellRef::parse(name),
        (None, Some(row), Some(col)) => Some(CellRef::new(row, col)),
        _ => None,
    };
    let Some(target) = target.filter(CellRef::is_within_limits) else {
        return error_response(StatusCode::BAD_REQUEST, "invalid cell".to_string());
    };

    let mut session = state.session();
    match session.write_cell(target.row, target.col, &payload.value) {
        Ok(()) => Json(serde_json::json!({
            "status": "ok",
            "cell": target.to_string(),
            "value": session.read_cell(target.row, target.col),
            "dirty": session.is_dirty(),
        }))
        .into_response(),
        Err(e) => session_error(&session, e),
    }
}

async fn export_document(State(state): State<Arc<AppState>>) -> Response {
    let mut session = state.session();
    let mut transfer = MemoryTransfer::new();

    if let Err(e) = session.export(&mut transfer) {
        return session_error(&session, e);
    }
    let Some((filename, bytes)) = transfer.take() else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Export produced no file".to_string());
    };

    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(&filename)
    );
    (
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

async fn clear_document(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.session().clear();
    Json(StatusResponse {
        status: "ok".to_string(),
        message: None,
    })
}

fn session_error(session: &ReviewSession, error: SessionError) -> Response {
    let status = match error {
        SessionError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::UnknownSheet(_) => StatusCode::NOT_FOUND,
        SessionError::Encode(_) | SessionError::NoDocument => StatusCode::CONFLICT,
        SessionError::OutOfBounds { .. } => StatusCode::BAD_REQUEST,
    };
    let message = session
        .status_message()
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    error_response(status, message)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(StatusResponse {
            status: "error".to_string(),
            message: Some(message),
        }),
    )
        .into_response()
}
