//! Free-text search endpoint

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use tourbook_core::Event;
use tourbook_core::search::{Collection, filter_events};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/search", get(search))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub collection: Collection,
    /// Where the routed collection is listed
    pub path: String,
    /// Matching events when the query routes to events
    pub events: Vec<Event>,
}

/// GET /api/search?q= - Route a phrase to a collection
#[tracing::instrument(skip(state))]
async fn search(
    State(state): State<AppState>,
    Query(SearchParams { q }): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let collection = state.query_router().route(&q);

    let events = match collection {
        Collection::Events => {
            let all = state.events()?;
            filter_events(&all, &q).into_iter().cloned().collect()
        }
        _ => Vec::new(),
    };

    tracing::info!(%collection, matches = events.len(), "Routed search");

    Ok(Json(SearchResponse {
        query: q,
        collection,
        path: collection.api_path(),
        events,
    }))
}
