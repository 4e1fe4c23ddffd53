//! # Integration Tests for efact-api
//!
//! Exercises the router in-process with `tower::ServiceExt::oneshot`:
//! health probes, document storage, processing, verification, public key
//! publication, error bodies, and the metrics endpoint.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use efact_api::routes::signatures::{PublicKeyResponse, VerifyResponse};
use efact_api::AppState;
use efact_crypto::{DocumentSigner, RsaKeyPair, DEFAULT_KEY_BITS};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

fn signer() -> DocumentSigner {
    static SIGNER: OnceLock<DocumentSigner> = OnceLock::new();
    SIGNER
        .get_or_init(|| DocumentSigner::new(RsaKeyPair::generate(DEFAULT_KEY_BITS).unwrap()))
        .clone()
}

fn test_app() -> axum::Router {
    efact_api::app(AppState::in_memory(signer()), None)
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn reference_document(id: &str) -> Value {
    json!({
        "documentId": id,
        "uuid": "550e8400-e29b-41d4-a716-446655440000",
        "issuerTaxId": "20123456789",
        "receiverTaxId": "20987654321",
        "issueDate": "2026-02-12T10:00:00Z",
        "netAmount": 20.00,
        "taxAmount": 3.60,
        "totalAmount": 23.60,
        "items": [
            {"description": "Producto A", "unitPrice": 10.00, "quantity": 2,
             "lineSubtotal": 20.00, "lineTax": 3.60}
        ]
    })
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = test_app().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Documents ----------------------------------------------------------------

#[tokio::test]
async fn test_put_then_get_document() {
    let app = test_app();
    let doc = reference_document("F001-00000001");

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/v1/documents/F001-00000001", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/v1/documents/F001-00000001")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stored = body_json(response).await;
    assert_eq!(stored["documentId"], "F001-00000001");
    // Amounts come back in canonical decimal text.
    assert_eq!(stored["totalAmount"], "23.6");
    assert!(stored.get("validation").is_none());
}

#[tokio::test]
async fn test_put_discards_client_validation_record() {
    let app = test_app();
    let mut doc = reference_document("F001-00000002");
    doc["validation"] = json!({
        "timestamp": "2026-02-12T10:05:00Z",
        "status": "VALID",
        "signature": "Zm9yZ2Vk"
    });

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/v1/documents/F001-00000002", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.get("validation").is_none());
}

#[tokio::test]
async fn test_put_rejects_id_mismatch() {
    let doc = reference_document("F001-00000003");
    let response = test_app()
        .oneshot(json_request("PUT", "/v1/documents/OTHER-1", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_put_rejects_malformed_body() {
    let response = test_app()
        .oneshot(json_request(
            "PUT",
            "/v1/documents/F001-1",
            &json!({"documentId": "F001-1", "netAmount": "twenty"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_get_missing_document_is_404() {
    let response = test_app().oneshot(get("/v1/documents/NOPE-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_documents_ordered_by_id() {
    let app = test_app();
    let response = app.clone().oneshot(get("/v1/documents")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    for id in ["F001-00000012", "F001-00000010", "F001-00000011"] {
        let uri = format!("/v1/documents/{id}");
        app.clone()
            .oneshot(json_request("PUT", &uri, &reference_document(id)))
            .await
            .unwrap();
    }

    let response = app.oneshot(get("/v1/documents")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["documentId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["F001-00000010", "F001-00000011", "F001-00000012"]);
}

#[tokio::test]
async fn test_delete_document() {
    let app = test_app();
    let doc = reference_document("F001-00000013");
    app.clone()
        .oneshot(json_request("PUT", "/v1/documents/F001-00000013", &doc))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(delete("/v1/documents/F001-00000013"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/v1/documents/F001-00000013"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A second delete finds nothing.
    let response = app
        .oneshot(delete("/v1/documents/F001-00000013"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_document_is_404() {
    let response = test_app().oneshot(delete("/v1/documents/NOPE-3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "not found: document NOPE-3");
}

// -- Processing ---------------------------------------------------------------

#[tokio::test]
async fn test_process_valid_document_then_verify() {
    let app = test_app();
    let doc = reference_document("F001-00000004");
    app.clone()
        .oneshot(json_request("PUT", "/v1/documents/F001-00000004", &doc))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_empty("/v1/documents/F001-00000004/process"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["status"], "VALID");
    let signature = record["signature"].as_str().unwrap().to_string();

    // The stored document now carries the record.
    let stored = body_json(
        app.clone()
            .oneshot(get("/v1/documents/F001-00000004"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(stored["validation"]["signature"], signature.as_str());

    // Verify using the stored document, record and all.
    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/signatures/verify",
            &json!({"document": stored, "signature": signature}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let verdict: VerifyResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(verdict.valid);
    assert_eq!(verdict.message, "signature valid and document unmodified");
}

#[tokio::test]
async fn test_process_invalid_document() {
    let app = test_app();
    let mut doc = reference_document("F001-00000005");
    doc["items"] = json!([]);
    app.clone()
        .oneshot(json_request("PUT", "/v1/documents/F001-00000005", &doc))
        .await
        .unwrap();

    let response = app
        .oneshot(post_empty("/v1/documents/F001-00000005/process"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["status"], "INVALID");
    assert_eq!(record["reason"], "no items");
    assert!(record.get("signature").is_none());
}

#[tokio::test]
async fn test_process_missing_document_is_404() {
    let response = test_app()
        .oneshot(post_empty("/v1/documents/NOPE-2/process"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signing_failure_is_500_without_detail() {
    // A 256-bit modulus is too short for any SHA-256 PKCS#1 v1.5 signature.
    let undersized = DocumentSigner::new(RsaKeyPair::generate(256).unwrap());
    let app = efact_api::app(AppState::in_memory(undersized), None);
    let doc = reference_document("F001-00000014");
    app.clone()
        .oneshot(json_request("PUT", "/v1/documents/F001-00000014", &doc))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_empty("/v1/documents/F001-00000014/process"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    let parsed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(parsed["error"]["message"], "An internal error occurred");
    assert!(!body.contains("too long"));
    assert!(!body.contains("signing failed"));

    // Nothing was attached to the stored document.
    let stored = body_json(
        app.oneshot(get("/v1/documents/F001-00000014"))
            .await
            .unwrap(),
    )
    .await;
    assert!(stored.get("validation").is_none());
}

// -- Verification -------------------------------------------------------------

#[tokio::test]
async fn test_verify_tampered_document() {
    let app = test_app();
    let doc = reference_document("F001-00000006");
    app.clone()
        .oneshot(json_request("PUT", "/v1/documents/F001-00000006", &doc))
        .await
        .unwrap();
    let record = body_json(
        app.clone()
            .oneshot(post_empty("/v1/documents/F001-00000006/process"))
            .await
            .unwrap(),
    )
    .await;

    let mut tampered = doc;
    tampered["totalAmount"] = json!(24.60);
    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/signatures/verify",
            &json!({"document": tampered, "signature": record["signature"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let verdict: VerifyResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(!verdict.valid);
    assert_eq!(verdict.message, "signature invalid or document modified");
}

#[tokio::test]
async fn test_verify_garbage_signature_is_false_not_error() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/v1/signatures/verify",
            &json!({"document": reference_document("F001-7"), "signature": "!!not base64!!"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["valid"], false);
}

#[tokio::test]
async fn test_verify_malformed_body_is_422() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/v1/signatures/verify",
            &json!({"signature": "abc"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Keys ---------------------------------------------------------------------

#[tokio::test]
async fn test_public_key_endpoint() {
    let response = test_app().oneshot(get("/v1/keys/public")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let key: PublicKeyResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(key.algorithm, "RS256-PKCS1v15");
    assert_eq!(key.public_key, signer().public_key_base64());
}

// -- Metrics ------------------------------------------------------------------

#[tokio::test]
async fn test_metrics_route_absent_without_handle() {
    let response = test_app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_route_present_with_handle() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let app = efact_api::app(AppState::in_memory(signer()), Some(handle));
    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
