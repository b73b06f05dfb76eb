//! Calendar endpoints: month markers and day lookups

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::NaiveDate;
use serde::Serialize;

use tourbook_core::calendar::{MarkerKind, events_on, month_view};
use tourbook_core::{Event, YearMonth};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/calendar/{year}/{month}", get(month))
        .route("/api/calendar/day/{date}", get(day))
}

/// One marked day, with its events resolved
#[derive(Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub kind: MarkerKind,
    pub events: Vec<Event>,
}

#[derive(Serialize)]
pub struct CalendarMonth {
    pub month: YearMonth,
    pub days: Vec<CalendarDay>,
}

/// GET /api/calendar/{year}/{month} - Marked days of a month
#[tracing::instrument(skip(state))]
async fn month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<CalendarMonth>, AppError> {
    let month = YearMonth::new(year, month)?;
    let events = state.events()?;

    let view = month_view(&events, month);
    let days = view
        .days
        .into_iter()
        .map(|marker| CalendarDay {
            date: marker.date,
            kind: marker.kind,
            events: marker
                .event_ids
                .iter()
                .filter_map(|id| events.iter().find(|e| &e.id == id).cloned())
                .collect(),
        })
        .collect::<Vec<_>>();

    tracing::info!(marked_days = days.len(), "Built month view");

    Ok(Json(CalendarMonth { month, days }))
}

/// GET /api/calendar/day/{date} - Events occurring on YYYY-MM-DD
#[tracing::instrument(skip(state))]
async fn day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Event>>, AppError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("Invalid date '{date}'. Expected YYYY-MM-DD")))?;
    let events = state.events()?;

    let found: Vec<Event> = events_on(&events, date).into_iter().cloned().collect();

    Ok(Json(found))
}
