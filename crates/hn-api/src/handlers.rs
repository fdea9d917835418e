use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use hn_core::{Dataset, Engine, SchemaVersion};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::ApiError;
use crate::metrics::ApiMetrics;

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    pub engine: Engine,
    pub metrics: ApiMetrics,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(engine: Engine, max_body_bytes: usize) -> Self {
        Self {
            engine,
            metrics: ApiMetrics::new(),
            max_body_bytes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ParseQuery {
    /// Force a parser; the document must declare the same version.
    pub schema: Option<String>,
}

/// POST /parse
pub async fn parse(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ParseQuery>,
    body: Bytes,
) -> Result<Json<Dataset>, ApiError> {
    // An unknown `?schema=` is reported like an unknown declared version.
    let requested = query
        .schema
        .as_deref()
        .map(str::parse::<SchemaVersion>)
        .transpose()?;

    let outcome = state.engine.parse_slice(&body, requested);
    state.metrics.record(&outcome);

    match outcome {
        Ok(dataset) => {
            info!(
                version = %dataset.version(),
                stories = dataset.story_count(),
                comments = dataset.comment_count(),
                "Parsed snapshot"
            );
            Ok(Json(dataset))
        }
        Err(err) => {
            info!(kind = %err.kind(), path = err.path(), "Rejected snapshot: {err}");
            Err(err.into())
        }
    }
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// GET /
pub async fn index() -> Json<Value> {
    let versions: Vec<&str> = SchemaVersion::ALL.iter().map(|v| v.as_str()).collect();
    Json(json!({
        "message": "hn-parser API",
        "health": "/health",
        "versions": versions,
    }))
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], body).into_response(),
        Err(err) => {
            error!("Failed to encode metrics: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
