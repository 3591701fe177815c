use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, AppJson};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StoreDocumentRequest {
    pub content: Option<String>,
}

#[derive(Serialize)]
pub struct StoreDocumentResponse {
    pub id: String,
}

#[derive(Deserialize)]
pub struct FetchDocumentQuery {
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct FetchDocumentResponse {
    pub content: String,
}

/// POST /api/document
pub async fn handle_store_document(
    State(state): State<AppState>,
    AppJson(req): AppJson<StoreDocumentRequest>,
) -> Result<Json<StoreDocumentResponse>, AppError> {
    let content = req
        .content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation("Content is required".to_string()))?;

    let id = state.store.put(&content)?;
    info!("Stored document {id} ({} bytes)", content.len());

    Ok(Json(StoreDocumentResponse { id }))
}

/// GET /api/document?id=...
pub async fn handle_fetch_document(
    State(state): State<AppState>,
    Query(params): Query<FetchDocumentQuery>,
) -> Result<Json<FetchDocumentResponse>, AppError> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Document ID is required".to_string()))?;

    let content = state.store.get(&id)?;

    Ok(Json(FetchDocumentResponse { content }))
}
