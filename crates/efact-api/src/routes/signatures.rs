//! # Signature Routes
//!
//! - `POST /v1/signatures/verify`: check a document against a signature
//!   token under the service's public key.
//! - `GET  /v1/keys/public`: publish that public key.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use efact_core::Document;
use efact_crypto::SIGNATURE_ALGORITHM;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

pub const SIGNATURE_VALID_MESSAGE: &str = "signature valid and document unmodified";
pub const SIGNATURE_INVALID_MESSAGE: &str = "signature invalid or document modified";

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub document: Document,
    pub signature: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyResponse {
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    pub algorithm: String,
    pub public_key: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/signatures/verify", post(verify_signature))
        .route("/v1/keys/public", get(public_key))
}

async fn verify_signature(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let request = extract_json(body)?;
    let processor = state.processor.clone();
    let valid = tokio::task::spawn_blocking(move || {
        processor.verify_document_signature(&request.document, &request.signature)
    })
    .await
    .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?;

    let message = if valid {
        SIGNATURE_VALID_MESSAGE
    } else {
        SIGNATURE_INVALID_MESSAGE
    };
    Ok(Json(VerifyResponse {
        valid,
        message: message.to_string(),
    }))
}

async fn public_key(State(state): State<AppState>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse {
        algorithm: SIGNATURE_ALGORITHM.to_string(),
        public_key: state.processor.public_key_base64().to_string(),
    })
}
