//! Saved content API handlers.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::super::state::{AppState, SavedCode};

/// GET /api/saved - Everything handed to the save callback, oldest first.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<SavedCode>> {
    Json(state.saved_codes())
}
