//! Event store endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use tourbook_core::Event;
use tourbook_core::TourbookError;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/events/{key}", get(get_event))
}

/// GET /api/events - List all events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.events()?;
    tracing::info!(count = events.len(), "Listing events");

    Ok(Json(events.as_ref().clone()))
}

/// GET /api/events/{key} - One event by id or slug
async fn get_event(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Event>, AppError> {
    let events = state.events()?;

    let event = events
        .iter()
        .find(|e| e.matches_key(&key))
        .cloned()
        .ok_or_else(|| TourbookError::NotFound(format!("event '{key}'")))?;

    Ok(Json(event))
}
