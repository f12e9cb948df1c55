//! Query endpoint with RAG and citations

use axum::{extract::State, Json};
use serde::Serialize;
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AnswerRecord, QueryRequest};

/// Answer plus timing
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    #[serde(flatten)]
    pub record: AnswerRecord,
    pub processing_time_ms: u64,
}

/// POST /api/query - Answer a question from the indexed documents
pub async fn query_rag(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();
    tracing::info!("Query: \"{}\"", request.question);

    state.require_llm().await?;
    let record = state.session().ask(&request.question).await?;

    Ok(Json(QueryResponse {
        record,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
