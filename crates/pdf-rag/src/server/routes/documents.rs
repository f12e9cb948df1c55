//! Document listing and session status

use axum::{extract::State, Json};
use serde::Serialize;

use crate::pipeline::SessionStatus;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct DocumentList {
    pub directory: String,
    pub documents: Vec<String>,
}

/// GET /api/documents - PDF files in the documents directory
pub async fn list_documents(State(state): State<AppState>) -> Json<DocumentList> {
    Json(DocumentList {
        directory: state.config().paths.documents_dir.display().to_string(),
        documents: state.session().documents(),
    })
}

/// GET /api/status - Index, document and provider state
pub async fn status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.session().status().await)
}
