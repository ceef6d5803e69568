use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::error::ApiResult;
use crate::feed::{IngestReport, Newsfeed};
use crate::ingest::types::Event;
use crate::scoring::ScoredRecord;

#[derive(Clone)]
pub struct AppState {
    pub feed: Newsfeed,
}

impl AppState {
    pub fn new(feed: Newsfeed) -> Self {
        Self { feed }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "OK" }))
        .route("/ingest", post(ingest))
        .route("/retrieve", get(retrieve))
        .route("/retrieve/scored", get(retrieve_scored))
        .route("/debug/store", get(debug_store))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct Message {
    message: &'static str,
}

async fn root() -> Json<Message> {
    tracing::info!("root endpoint called");
    Json(Message {
        message: "Hello World",
    })
}

/// Accepts a JSON array of events. A body that does not deserialize (wrong field
/// types, bad timestamps) rejects the whole batch before anything is stored.
async fn ingest(
    State(state): State<AppState>,
    payload: Result<Json<Vec<Event>>, JsonRejection>,
) -> ApiResult<Json<IngestReport>> {
    let Json(events) = payload?;
    tracing::info!(count = events.len(), "/ingest called");
    let report = state.feed.ingest(events)?;
    Ok(Json(report))
}

async fn retrieve(State(state): State<AppState>) -> ApiResult<Json<Vec<Event>>> {
    tracing::info!("/retrieve called");
    Ok(Json(state.feed.retrieve()?))
}

async fn retrieve_scored(State(state): State<AppState>) -> ApiResult<Json<Vec<ScoredRecord>>> {
    Ok(Json(state.feed.retrieve_scored()?))
}

#[derive(serde::Serialize)]
struct StoreInfo {
    count: usize,
}

async fn debug_store(State(state): State<AppState>) -> Json<StoreInfo> {
    Json(StoreInfo {
        count: state.feed.store().count(),
    })
}

