//! Axum route handlers for the Query API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::result::{ResultPayload, StoredResult};
use crate::query::classifier::SearchContext;
use crate::query::pipeline::AnswerMode;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitQueryRequest {
    pub query: Option<String>,
    /// Return the rows instead of a narrative summary.
    #[serde(default)]
    pub raw: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitQueryResponse {
    pub status: &'static str,
    pub request_id: Uuid,
    pub context: Option<SearchContext>,
    pub response: ResultPayload,
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub response: ResultPayload,
}

impl From<StoredResult> for ResultResponse {
    fn from(stored: StoredResult) -> Self {
        Self {
            request_id: Some(stored.request_id),
            sql: stored.sql,
            created_at: Some(stored.created_at),
            response: stored.payload,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/query
///
/// Runs the pipeline synchronously, records the result under a fresh request id
/// and returns both. Pipeline failures come back as "No result available".
pub async fn handle_submit_query(
    State(state): State<AppState>,
    payload: Result<Json<SubmitQueryRequest>, JsonRejection>,
) -> Result<Json<SubmitQueryResponse>, AppError> {
    let Json(request) = payload?;
    let query = request.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::EmptyQuery);
    }

    info!("Received query: {query}");

    let mode = if request.raw {
        AnswerMode::Rows
    } else {
        AnswerMode::Summary
    };
    let outcome = state.pipeline.respond(query, mode).await;
    let stored = StoredResult::new(query, &outcome);

    let response = SubmitQueryResponse {
        status: "Query processed",
        request_id: stored.request_id,
        context: stored.context,
        response: stored.payload.clone(),
    };

    state.results.insert(stored).await;

    Ok(Json(response))
}

/// GET /api/result
///
/// Most recent submission's result, or the no-result sentinel.
pub async fn handle_latest_result(State(state): State<AppState>) -> Json<ResultResponse> {
    let response = match state.results.latest().await {
        Some(stored) => stored.into(),
        None => ResultResponse {
            request_id: None,
            sql: None,
            created_at: None,
            response: ResultPayload::NoResult,
        },
    };
    Json(response)
}

/// GET /api/result/:request_id
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<ResultResponse>, AppError> {
    let stored = state
        .results
        .get(request_id)
        .await
        .ok_or(AppError::ResultNotFound(request_id))?;

    Ok(Json(stored.into()))
}
