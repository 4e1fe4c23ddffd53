//! # efact-validation — Document Consistency Rules
//!
//! Decides whether a document's declared monetary values are internally
//! consistent. The engine is a pure function of the document: no state, no
//! I/O, no retries.
//!
//! ## Checks, in order
//!
//! 1. The document has at least one item.
//! 2. Every item, in sequence: non-negative price and quantity, then
//!    `lineSubtotal ≈ unitPrice × quantity`, then
//!    `lineTax ≈ unitPrice × quantity × TAX_RATE`.
//! 3. Document totals against the sum of *declared* line subtotals:
//!    `netAmount`, then `taxAmount`, then `totalAmount`.
//!
//! The first failing check decides the verdict. `≈` is [`rules::are_equal`]
//! with [`rules::TOLERANCE`], a strict comparison shared by every check.
//!
//! A failed check is not an error. It is reported as
//! [`Verdict::Invalid`] with a [`Rejection`] describing which check failed
//! and the expected and actual values.

pub mod engine;
pub mod rules;

pub use engine::{ItemField, Rejection, TotalField, ValidationEngine, Verdict};
pub use rules::{are_equal, TAX_RATE, TOLERANCE};
