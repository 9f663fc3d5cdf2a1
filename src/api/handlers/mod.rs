use std::io::ErrorKind;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;
use crate::canvas::{InputEvent, ViewResponse, ViewSnapshot};
use crate::error::CushionsError;
use crate::layout::sidecar_path;
use crate::models::*;
use crate::settings::LAST_DIR_UPLOAD;
use crate::upload::{spawn_upload, UploadMonitor, UploadPipeline, UploadRequest};

// ============================================================
// Error Handling
// ============================================================

/// Map a domain error to a status code and a message safe to show the user.
///
/// Remote failures are logged in full and reported as a bad gateway; the
/// rest are caller mistakes or conflicts and keep their message.
fn error_response(e: CushionsError) -> (StatusCode, String) {
    let status = match &e {
        CushionsError::File { source, .. } if source.kind() == ErrorKind::NotFound => {
            StatusCode::NOT_FOUND
        }
        CushionsError::File { .. }
        | CushionsError::EmptyDocument(_)
        | CushionsError::NoDocument
        | CushionsError::Credentials(_) => StatusCode::BAD_REQUEST,
        CushionsError::UploadInProgress => StatusCode::CONFLICT,
        CushionsError::Remote(_) => {
            tracing::error!("Remote error: {}", e);
            return (StatusCode::BAD_GATEWAY, e.to_string());
        }
    };
    tracing::warn!("Request rejected: {}", e);
    (status, e.to_string())
}

/// Log an internal error and return it as a 500.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    let msg = e.to_string();
    tracing::error!("Internal error: {}", msg);
    (StatusCode::INTERNAL_SERVER_ERROR, msg)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Documents
// ============================================================

pub async fn load_document(
    State(state): State<AppState>,
    Json(input): Json<LoadDocumentInput>,
) -> Result<Json<DocumentView>, (StatusCode, String)> {
    let nodes = {
        let mut workspace = state.workspace();
        workspace.open(&input.path).map_err(error_response)?.to_vec()
    };

    let settings = state.settings();
    if let Err(e) = settings.set_last_opened_file(&input.path) {
        tracing::warn!("Failed to record last opened file: {:#}", e);
    }
    if let Err(e) = settings.set_directory_of(LAST_DIR_UPLOAD, &input.path) {
        tracing::warn!("Failed to record document directory: {:#}", e);
    }

    Ok(Json(DocumentView {
        sidecar: Some(sidecar_path(&input.path)),
        path: Some(input.path),
        nodes,
    }))
}

pub async fn current_document(State(state): State<AppState>) -> Json<DocumentView> {
    let workspace = state.workspace();
    let path = workspace.document().map(|p| p.to_path_buf());
    Json(DocumentView {
        sidecar: path.as_deref().map(sidecar_path),
        path,
        nodes: workspace.canvas().board().nodes().to_vec(),
    })
}

pub async fn save_document(
    State(state): State<AppState>,
) -> Result<Json<SaveDocumentResult>, (StatusCode, String)> {
    let saved = state.workspace().save().map_err(|e| match e {
        CushionsError::File { .. } => internal_error(e),
        other => error_response(other),
    })?;

    if !saved.layout_saved {
        tracing::warn!("Layout for {} was not saved", saved.path.display());
    }
    Ok(Json(SaveDocumentResult {
        path: saved.path,
        sidecar: saved.sidecar,
        layout_saved: saved.layout_saved,
    }))
}

// ============================================================
// Nodes
// ============================================================

pub async fn list_nodes(State(state): State<AppState>) -> Json<Vec<Node>> {
    Json(state.workspace().canvas().board().nodes().to_vec())
}

pub async fn move_node(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(position): Json<Position>,
) -> Result<Json<Node>, (StatusCode, String)> {
    let mut workspace = state.workspace();
    let board = workspace.canvas_mut().board_mut();
    if !board.move_node(id, position) {
        return Err((StatusCode::NOT_FOUND, "Node not found".to_string()));
    }
    board
        .get(id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Node not found".to_string()))
}

// ============================================================
// Canvas
// ============================================================

/// Result of dispatching one input event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOutcome {
    pub response: ViewResponse,
    pub view: ViewSnapshot,
    pub dragging: Option<u32>,
}

pub async fn get_canvas(State(state): State<AppState>) -> Json<ViewSnapshot> {
    Json(state.workspace().canvas().view().snapshot())
}

pub async fn dispatch_event(
    State(state): State<AppState>,
    Json(event): Json<InputEvent>,
) -> Json<EventOutcome> {
    let mut workspace = state.workspace();
    let canvas = workspace.canvas_mut();
    let response = canvas.dispatch(&event);
    Json(EventOutcome {
        response,
        view: canvas.view().snapshot(),
        dragging: canvas.dragged_node(),
    })
}

pub async fn set_sensitivity(
    State(state): State<AppState>,
    Json(input): Json<SensitivityInput>,
) -> Result<Json<ViewSnapshot>, (StatusCode, String)> {
    if !(1..=20).contains(&input.slider) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Slider must be between 1 and 20".to_string(),
        ));
    }
    let mut workspace = state.workspace();
    let view = workspace.canvas_mut().view_mut();
    view.set_sensitivity_slider(input.slider);
    Ok(Json(view.snapshot()))
}

// ============================================================
// Uploads
// ============================================================

pub async fn start_upload(
    State(state): State<AppState>,
    Json(input): Json<StartUploadInput>,
) -> Result<(StatusCode, Json<UploadStarted>), (StatusCode, String)> {
    let mut request = UploadRequest::new(input.path.clone());
    if let Some(board) = input.board.filter(|name| !name.trim().is_empty()) {
        request = request.with_board(board);
    }
    if let Some(list) = input.list.filter(|name| !name.trim().is_empty()) {
        request = request.with_list(list);
    }

    let (pipeline, events) = UploadPipeline::new(state.trello_client(), state.pacing);
    let handle = spawn_upload(state.uploads(), pipeline, request).map_err(error_response)?;

    let job_id = Uuid::new_v4();
    tracing::info!("Upload {} started for {}", job_id, input.path.display());
    state.monitor().reset(job_id);

    let monitor: UploadMonitor = state.monitor().clone();
    tokio::spawn(async move {
        monitor.follow(job_id, events).await;
        match handle.await {
            Ok(Ok(summary)) => tracing::info!(
                "Upload {} finished: {} created, {} skipped",
                job_id,
                summary.created,
                summary.skipped
            ),
            Ok(Err(e)) => tracing::warn!("Upload {} failed: {}", job_id, e),
            Err(e) => {
                tracing::error!("Upload task {} aborted: {}", job_id, e);
                monitor.apply(
                    job_id,
                    &UploadEvent::Failed {
                        message: e.to_string(),
                    },
                );
            }
        }
    });

    if let Err(e) = state.settings().set_directory_of(LAST_DIR_UPLOAD, &input.path) {
        tracing::warn!("Failed to record upload directory: {:#}", e);
    }

    Ok((StatusCode::ACCEPTED, Json(UploadStarted { job_id })))
}

pub async fn upload_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.monitor().snapshot())
}

// ============================================================
// Credentials
// ============================================================

pub async fn verify_credentials(
    State(state): State<AppState>,
) -> Result<Json<CredentialStatus>, (StatusCode, String)> {
    let client = state.trello_client();
    if !client.credentials().is_complete() {
        return Ok(Json(CredentialStatus { valid: false }));
    }
    client
        .verify_credentials()
        .await
        .map(|valid| Json(CredentialStatus { valid }))
        .map_err(|e| error_response(e.into()))
}
