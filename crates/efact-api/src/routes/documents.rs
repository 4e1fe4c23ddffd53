//! # Document Routes
//!
//! - `GET    /v1/documents`: every stored document, ordered by id.
//! - `PUT    /v1/documents/{document_id}`: store an unsigned document.
//! - `GET    /v1/documents/{document_id}`: fetch a stored document.
//! - `DELETE /v1/documents/{document_id}`: remove a stored document.
//! - `POST   /v1/documents/{document_id}/process`: validate, sign if valid,
//!   attach the record, persist, and return the record.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use efact_core::{Document, ValidationRecord};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/documents", get(list_documents))
        .route(
            "/v1/documents/{document_id}",
            get(get_document).put(put_document).delete(delete_document),
        )
        .route("/v1/documents/{document_id}/process", post(process_document))
}

async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<Document>>, AppError> {
    Ok(Json(state.processor.store().find_all()?))
}

async fn put_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    body: Result<Json<Document>, JsonRejection>,
) -> Result<Json<Document>, AppError> {
    let mut document = extract_json(body)?;
    if document.document_id != document_id {
        return Err(AppError::Validation(format!(
            "documentId {:?} does not match path {:?}",
            document.document_id, document_id
        )));
    }
    // Verdicts are produced by processing only; a client-supplied record is
    // discarded.
    document.validation = None;

    state.processor.store().save(document.clone())?;
    tracing::info!(document_id = %document.document_id, "document stored");
    Ok(Json(document))
}

async fn get_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Document>, AppError> {
    state
        .processor
        .store()
        .find_by_document_id(&document_id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("document {document_id}")))
}

async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.processor.store().delete(&document_id)? {
        return Err(AppError::NotFound(format!("document {document_id}")));
    }
    tracing::info!(document_id = %document_id, "document deleted");
    Ok(StatusCode::OK)
}

async fn process_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<ValidationRecord>, AppError> {
    // RSA signing is CPU-bound; keep it off the async workers.
    let processor = state.processor.clone();
    let record = tokio::task::spawn_blocking(move || processor.process_document(&document_id))
        .await
        .map_err(|e| AppError::Internal(format!("processing task failed: {e}")))??;
    Ok(Json(record))
}
