//! Full lifecycle through the service API: store an unsigned document,
//! process it by id, reprocess it, verify the stored signature, and detect
//! tampering.

use std::sync::{Arc, OnceLock};

use efact_core::{Document, ValidationStatus};
use efact_crypto::{DocumentSigner, RsaKeyPair, DEFAULT_KEY_BITS};
use efact_service::{DocumentProcessor, DocumentStore, InMemoryDocumentStore};

fn signer() -> DocumentSigner {
    static SIGNER: OnceLock<DocumentSigner> = OnceLock::new();
    SIGNER
        .get_or_init(|| DocumentSigner::new(RsaKeyPair::generate(DEFAULT_KEY_BITS).unwrap()))
        .clone()
}

fn document(id: &str, total: &str) -> Document {
    serde_json::from_value(serde_json::json!({
        "documentId": id,
        "uuid": "7d444840-9dc0-11d1-b245-5ffdce74fad2",
        "issuerTaxId": "20123456789",
        "receiverTaxId": "20987654321",
        "issueDate": "2026-02-12",
        "netAmount": "1000.00",
        "taxAmount": "180.00",
        "totalAmount": total,
        "items": [
            {"description": "Servicio", "unitPrice": "100.00", "quantity": "5",
             "lineSubtotal": "500.00", "lineTax": "90.00"},
            {"description": "Licencia", "unitPrice": "50.00", "quantity": "10",
             "lineSubtotal": "500.00", "lineTax": "90.00"}
        ]
    }))
    .unwrap()
}

fn setup() -> (DocumentProcessor, InMemoryDocumentStore) {
    let store = InMemoryDocumentStore::new();
    let processor = DocumentProcessor::new(signer(), Arc::new(store.clone()));
    (processor, store)
}

#[test]
fn stored_document_is_signed_and_verifiable() {
    let (processor, store) = setup();
    store.save(document("F001-00000001", "1180.00")).unwrap();

    let record = processor.process_document("F001-00000001").unwrap();
    assert_eq!(record.status(), ValidationStatus::Valid);

    let stored = store.find_by_document_id("F001-00000001").unwrap().unwrap();
    let token = stored.validation.as_ref().unwrap().signature().unwrap();
    assert!(processor.verify_document_signature(&stored, token));
}

#[test]
fn reprocessing_replaces_the_record_with_the_same_signature() {
    let (processor, store) = setup();
    store.save(document("F001-00000002", "1180.00")).unwrap();

    let first = processor.process_document("F001-00000002").unwrap();
    let second = processor.process_document("F001-00000002").unwrap();
    assert_eq!(first.signature(), second.signature());

    let stored = store.find_by_document_id("F001-00000002").unwrap().unwrap();
    assert_eq!(stored.validation.as_ref(), Some(&second));
}

#[test]
fn rejected_document_is_persisted_with_reason() {
    let (processor, store) = setup();
    store.save(document("F001-00000003", "1190.00")).unwrap();

    let record = processor.process_document("F001-00000003").unwrap();
    assert_eq!(record.status(), ValidationStatus::Invalid);
    assert_eq!(
        record.reason(),
        Some("totalAmount mismatch, expected 1180, got 1190")
    );

    let stored = store.find_by_document_id("F001-00000003").unwrap().unwrap();
    assert!(stored.validation.unwrap().signature().is_none());
}

#[test]
fn tampering_after_signing_is_detected() {
    let (processor, store) = setup();
    store.save(document("F001-00000004", "1180.00")).unwrap();
    let record = processor.process_document("F001-00000004").unwrap();
    let token = record.signature().unwrap();

    let mut tampered = store.find_by_document_id("F001-00000004").unwrap().unwrap();
    tampered.total_amount = "1181.00".parse().unwrap();
    assert!(!processor.verify_document_signature(&tampered, token));
}

#[test]
fn signature_from_another_document_is_rejected() {
    let (processor, _) = setup();
    let a = document("F001-00000005", "1180.00");
    let b = document("F001-00000006", "1180.00");
    let token_a = processor
        .process_for_validation_and_signature(&a)
        .unwrap()
        .signature()
        .unwrap()
        .to_string();
    assert!(!processor.verify_document_signature(&b, &token_a));
}

#[test]
fn concurrent_processing_of_distinct_documents() {
    let (processor, store) = setup();
    for i in 0..8 {
        store.save(document(&format!("F002-{i:08}"), "1180.00")).unwrap();
    }

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let p = processor.clone();
            std::thread::spawn(move || p.process_document(&format!("F002-{i:08}")))
        })
        .collect();

    for handle in handles {
        let record = handle.join().unwrap().unwrap();
        assert!(record.is_valid());
    }
    assert_eq!(store.len(), 8);
}
