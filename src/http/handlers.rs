use crate::datetoken;
use crate::engine::ScanEngine;
use crate::fetch::Observation;
use crate::http::error::ApiError;
use crate::partition::PartitionId;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

/// Handler for GET /dayscan/{calendarDate}
///
/// Parses the MMDDYYYY token, resolves the partition name and reads the
/// whole partition. Rejections never reach the store.
#[tracing::instrument(
    name = "handler_day_scan",
    skip(engine),
    fields(monarchdb.partition = tracing::field::Empty)
)]
pub async fn day_scan_handler(
    State(engine): State<Arc<ScanEngine>>,
    Path(calendar_date): Path<String>,
) -> Result<Json<Vec<Observation>>, ApiError> {
    let parts = datetoken::parse(&calendar_date).map_err(|e| {
        error!(token = %calendar_date, "Rejected date token: {}", e);
        ApiError::from(e)
    })?;

    let partition = engine.resolver().resolve(&parts).map_err(|e| {
        error!(token = %calendar_date, "Rejected date token: {}", e);
        ApiError::from(e)
    })?;

    tracing::Span::current().record("monarchdb.partition", partition.as_str());

    let records = fetch_partition(&engine, &partition).await?;
    Ok(Json(records))
}

/// Handler for GET /allscan; always the fixed demo partition.
#[tracing::instrument(name = "handler_all_scan", skip(engine))]
pub async fn all_scan_handler(
    State(engine): State<Arc<ScanEngine>>,
) -> Result<Json<Vec<Observation>>, ApiError> {
    let records = fetch_partition(&engine, &PartitionId::demo()).await?;
    Ok(Json(records))
}

async fn fetch_partition(
    engine: &ScanEngine,
    partition: &PartitionId,
) -> Result<Vec<Observation>, ApiError> {
    let records = engine.fetcher().fetch_typed(partition).await.map_err(|e| {
        error!(partition = %partition, "Partition fetch failed: {}", e);
        ApiError::from(e)
    })?;

    info!(partition = %partition, rows = records.len(), "Partition scan complete");
    Ok(records)
}

/// Handler for GET /
pub async fn greeting_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html")],
        "This is the server for the monarch butterflies app. It's written in Rust.",
    )
}

/// Handler for GET /favicon.ico
pub async fn favicon_handler(State(engine): State<Arc<ScanEngine>>) -> Response {
    let path = engine.static_dir().join("butterfly_net.ico");
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/x-icon")], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Handler for GET /health
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "monarchdb"
        })),
    )
}
