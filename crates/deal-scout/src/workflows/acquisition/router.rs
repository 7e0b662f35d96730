use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::dashboard::CandidateFilter;
use super::domain::{ListingId, RawListing};
use super::repository::CandidateRepository;
use super::service::{ScoutService, ScoutServiceError};

/// Router exposing stored candidates and ad-hoc scoring.
pub fn candidate_router<R>(service: Arc<ScoutService<R>>) -> Router
where
    R: CandidateRepository + 'static,
{
    Router::new()
        .route("/api/v1/candidates", get(list_handler::<R>))
        .route("/api/v1/candidates/:listing_id", get(detail_handler::<R>))
        .route("/api/v1/financing", get(financing_handler::<R>))
        .route("/api/v1/score", post(score_handler::<R>))
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ScoutService<R>>>,
    Query(filter): Query<CandidateFilter>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    match service.candidates(&filter) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<ScoutService<R>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    match service.candidate(&ListingId(listing_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn financing_handler<R>(
    State(service): State<Arc<ScoutService<R>>>,
    Query(filter): Query<CandidateFilter>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    match service.financing(&filter) {
        Ok(rows) => (StatusCode::OK, Json(json!({ "candidates": rows }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<ScoutService<R>>>,
    Json(listings): Json<Vec<RawListing>>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    let scored = service.score_batch(listings);
    (StatusCode::OK, Json(scored)).into_response()
}

fn error_response(error: ScoutServiceError) -> Response {
    let status = match &error {
        ScoutServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ScoutServiceError::Filter(_) => StatusCode::BAD_REQUEST,
        ScoutServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(%error, "candidate request failed");
    }
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
