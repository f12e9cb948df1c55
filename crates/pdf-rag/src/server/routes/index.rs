//! Index rebuild endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::IndexSummary;

/// POST /api/index - Rebuild the index from the documents directory
pub async fn rebuild_index(State(state): State<AppState>) -> Result<Json<IndexSummary>> {
    state.require_llm().await?;

    let summary = state.session().reindex().await?;
    Ok(Json(summary))
}
