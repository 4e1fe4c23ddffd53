//! Processing counters.
//!
//! Recorded through the `metrics` facade. Without an installed recorder the
//! calls are no-ops; the API binary installs a Prometheus exporter.

use efact_core::ValidationStatus;

pub const DOCUMENTS_PROCESSED: &str = "efact_documents_processed_total";
pub const SIGNING_FAILURES: &str = "efact_signing_failures_total";
pub const SIGNATURE_VERIFICATIONS: &str = "efact_signature_verifications_total";

pub(crate) fn document_processed(status: ValidationStatus) {
    let label = match status {
        ValidationStatus::Valid => "valid",
        ValidationStatus::Invalid => "invalid",
    };
    metrics::counter!(DOCUMENTS_PROCESSED, "status" => label).increment(1);
}

pub(crate) fn signing_failed() {
    metrics::counter!(SIGNING_FAILURES).increment(1);
}

pub(crate) fn signature_verified(valid: bool) {
    let label = if valid { "valid" } else { "invalid" };
    metrics::counter!(SIGNATURE_VERIFICATIONS, "result" => label).increment(1);
}
