//! API routes for the RAG server

pub mod documents;
pub mod index;
pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(documents::status))
        .route("/documents", get(documents::list_documents))
        .route("/index", post(index::rebuild_index))
        .route("/query", post(query::query_rag))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "pdf-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Question answering over a folder of PDF files with page citations",
        "endpoints": {
            "GET /api/status": "Index, document and model server state",
            "GET /api/documents": "PDF files in the documents directory",
            "POST /api/index": "Rebuild the index from the documents directory",
            "POST /api/query": "Answer a question with citations"
        }
    }))
}
