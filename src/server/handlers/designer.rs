//! Designer session API handlers.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::designer::Designer;
use crate::form::{FormEdit, FormState};
use crate::logo;
use crate::options::QrOptions;
use crate::render::{FileExtension, TargetStats};

use super::super::state::{AppState, SharedSession};

type ApiError = (StatusCode, String);

/// Snapshot of a session returned by every designer endpoint.
#[derive(Debug, Serialize)]
pub struct DesignerResponse {
    pub id: Uuid,
    pub state: FormState,
    pub options: QrOptions,
    pub rebuilds: u64,
    pub target: TargetStats,
}

impl DesignerResponse {
    fn new(id: Uuid, designer: &Designer) -> Self {
        Self {
            id,
            state: designer.form().clone(),
            options: designer.options(),
            rebuilds: designer.rebuild_count(),
            target: designer.target().stats(),
        }
    }
}

/// Request body for the update endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub edits: Vec<FormEdit>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    #[serde(flatten)]
    pub designer: DesignerResponse,
    /// How many of the edits caused a rebuild.
    pub rebuilt: usize,
}

/// Query parameters for the download endpoint.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub format: FileExtension,
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid session ID".to_string()))
}

async fn find(state: &AppState, id: &str) -> Result<(Uuid, SharedSession), ApiError> {
    let id = parse_id(id)?;
    let session = state.session(&id).await.ok_or_else(not_found)?;
    Ok((id, session))
}

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        "Session not found or expired".to_string(),
    )
}

/// POST /api/designer - Open a new designer with default values.
pub async fn create(State(state): State<Arc<AppState>>) -> Json<DesignerResponse> {
    let id = Uuid::new_v4();
    let designer = state.new_designer();
    let response = DesignerResponse::new(id, &designer);

    state.insert_session(id, designer).await;
    debug!(%id, "designer session opened");

    Json(response)
}

/// GET /api/designer/:id - Current state and options.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DesignerResponse>, ApiError> {
    let (id, shared) = find(&state, &id).await?;
    let mut session = shared.lock().await;
    session.touch();
    Ok(Json(DesignerResponse::new(id, &session.designer)))
}

/// PATCH /api/designer/:id - Apply field edits in order.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let (id, shared) = find(&state, &id).await?;
    let mut session = shared.lock().await;
    session.touch();

    let mut rebuilt = 0;
    for edit in req.edits {
        if session.designer.update(edit) {
            rebuilt += 1;
        }
    }

    Ok(Json(UpdateResponse {
        designer: DesignerResponse::new(id, &session.designer),
        rebuilt,
    }))
}

/// GET /api/designer/:id/preview - The currently mounted output.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let (_, shared) = find(&state, &id).await?;
    let mut session = shared.lock().await;
    session.touch();

    let node = session
        .designer
        .target()
        .current()
        .ok_or((StatusCode::NOT_FOUND, "Nothing rendered".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, node.content_type()),
            (header::CACHE_CONTROL, "no-store"),
        ],
        node.bytes().to_vec(),
    )
        .into_response())
}

/// POST /api/designer/:id/logo - Upload a logo (multipart field `logo`).
///
/// The file is read and encoded before the session lock is taken, so when
/// two uploads overlap the one that finishes last wins. A request without a
/// file leaves the current logo in place.
pub async fn upload_logo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<DesignerResponse>, ApiError> {
    let id = parse_id(&id)?;

    let mut data_url: Option<String> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("logo") {
            continue;
        }
        let mime = field
            .content_type()
            .map(str::to_string)
            .or_else(|| {
                field
                    .file_name()
                    .and_then(|name| mime_guess::from_path(name).first())
                    .map(|m| m.essence_str().to_string())
            })
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read logo: {}", e)))?;
        if !bytes.is_empty() {
            data_url = Some(logo::encode_data_url(&bytes, &mime));
        }
        break;
    }

    let shared = state.session(&id).await.ok_or_else(not_found)?;
    let mut session = shared.lock().await;
    session.touch();

    if let Some(url) = data_url {
        session.designer.ingest_logo(Ok(url));
    }

    Ok(Json(DesignerResponse::new(id, &session.designer)))
}

/// GET /api/designer/:id/download - Export `qr-code.<format>` (PNG by default).
///
/// Responds 204 when there is no renderer to export from.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let (_, shared) = find(&state, &id).await?;
    let mut session = shared.lock_owned().await;
    session.touch();

    // Encoding runs on the blocking pool; the session stays locked until it ends
    let format = query.format;
    let file = tokio::task::spawn_blocking(move || session.designer.download_as(format))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Export task failed: {}", e)))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Export failed: {}", e)))?;

    Ok(match file {
        Some(file) => (
            [
                (header::CONTENT_TYPE, file.mime.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.file_name),
                ),
            ],
            file.bytes,
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// POST /api/designer/:id/save - Pass the content to the save callback.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (_, shared) = find(&state, &id).await?;
    let mut session = shared.lock().await;
    session.touch();

    session.designer.save();

    Ok(Json(serde_json::json!({
        "success": true,
        "content": session.designer.form().content,
    })))
}

/// DELETE /api/designer/:id - Close a session.
pub async fn close(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state
        .sessions
        .write()
        .await
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}
