pub mod calendar;
pub mod events;
pub mod search;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tourbook_core::TourbookError;

use crate::state::AppState;

/// Every API route, bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(events::router())
        .merge(calendar::router())
        .merge(search::router())
        .route("/api/cache/invalidate", post(invalidate_cache))
        .with_state(state)
}

#[derive(Serialize)]
pub struct InvalidateResponse {
    pub invalidated: bool,
}

/// POST /api/cache/invalidate - Drop cached store reads
async fn invalidate_cache(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let invalidated = state.invalidate();
    tracing::info!(invalidated, "Query cache invalidated");
    Json(InvalidateResponse { invalidated })
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert errors to HTTP responses
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!(message.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.error, "Request failed");
        }
        let body = Json(ErrorResponse {
            error: self.error.to_string(),
        });
        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let error = err.into();
        let status = match error.downcast_ref::<TourbookError>() {
            Some(TourbookError::NotFound(_)) => StatusCode::NOT_FOUND,
            Some(TourbookError::InvalidMonth(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::Value;
    use tourbook_core::search::QueryRouter;
    use tourbook_core::store::MemoryStore;
    use tourbook_core::{Event, RecurrencePattern};
    use tower::ServiceExt;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap()
    }

    fn test_app() -> Router {
        let mut concert = Event::new("1", "Riverside Concert", at(2024, 1, 15), at(2024, 1, 15));
        concert.location = Some("Riverside Park".into());
        let trivia = Event::new("2", "Trivia Night", at(2024, 1, 1), at(2024, 1, 31))
            .recurring(RecurrencePattern::Weekly);

        let store = MemoryStore::new(vec![concert, trivia]);
        app(AppState::new(Arc::new(store), QueryRouter::default()))
    }

    async fn request(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_and_get_events() {
        let (status, body) = request(test_app(), "GET", "/api/events").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = request(test_app(), "GET", "/api/events/trivia-night").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "2");
        assert_eq!(body["recurrencePattern"], "weekly");

        let (status, body) = request(test_app(), "GET", "/api/events/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn test_calendar_month() {
        let (status, body) = request(test_app(), "GET", "/api/calendar/2024/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["month"], "2024-01");

        let days = body["days"].as_array().unwrap();
        let dates: Vec<&str> = days.iter().map(|d| d["date"].as_str().unwrap()).collect();
        assert_eq!(
            dates,
            vec!["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22", "2024-01-29"]
        );

        let mid = &days[2];
        assert_eq!(mid["kind"], "recurring");
        assert_eq!(mid["events"].as_array().unwrap().len(), 2);
        assert_eq!(mid["events"][0]["id"], "1");
    }

    #[tokio::test]
    async fn test_calendar_month_rejects_bad_month() {
        let (status, body) = request(test_app(), "GET", "/api/calendar/2024/13").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_calendar_day() {
        let (status, body) = request(test_app(), "GET", "/api/calendar/day/2024-01-15").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);

        let (status, body) = request(test_app(), "GET", "/api/calendar/day/2024-01-16").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Array(vec![]));

        let (status, _) = request(test_app(), "GET", "/api/calendar/day/tomorrow").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_routes_and_filters() {
        let (status, body) =
            request(test_app(), "GET", "/api/search?q=riverside%20concert").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["collection"], "events");
        assert_eq!(body["path"], "/api/events");
        assert_eq!(body["events"].as_array().unwrap().len(), 1);

        let (_, body) = request(test_app(), "GET", "/api/search?q=cozy%20cabin%20getaway").await;
        assert_eq!(body["collection"], "cabins");
        assert_eq!(body["events"], Value::Array(vec![]));

        let (_, body) = request(test_app(), "GET", "/api/search?q=hidden%20waterfall").await;
        assert_eq!(body["collection"], "destinations");
    }

    #[tokio::test]
    async fn test_cache_invalidate() {
        let app = test_app();

        let (_, body) = request(app.clone(), "POST", "/api/cache/invalidate").await;
        assert_eq!(body["invalidated"], false);

        request(app.clone(), "GET", "/api/events").await;

        let (status, body) = request(app, "POST", "/api/cache/invalidate").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["invalidated"], true);
    }
}
