//! # Validation Engine
//!
//! Runs the checks described in the crate docs and produces a [`Verdict`].

use std::fmt;

use efact_core::{Amount, Document, Item, ValidationStatus};
use rust_decimal::Decimal;

use crate::rules::{are_equal, checked_sum, line_subtotal, tax_on, TOLERANCE};

/// Item field named in a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    UnitPrice,
    Quantity,
    LineSubtotal,
    LineTax,
}

impl ItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnitPrice => "unitPrice",
            Self::Quantity => "quantity",
            Self::LineSubtotal => "lineSubtotal",
            Self::LineTax => "lineTax",
        }
    }
}

/// Document-level field named in a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TotalField {
    NetAmount,
    TaxAmount,
    TotalAmount,
}

impl TotalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetAmount => "netAmount",
            Self::TaxAmount => "taxAmount",
            Self::TotalAmount => "totalAmount",
        }
    }
}

/// Why a document failed validation. Only the first failing check is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The document has no items.
    NoItems,
    /// An item carries a negative price or quantity.
    NegativeItemValue {
        index: usize,
        field: ItemField,
        value: Amount,
    },
    /// A declared line value differs from the recomputed one.
    ItemMismatch {
        index: usize,
        field: ItemField,
        expected: Amount,
        actual: Amount,
    },
    /// A declared document total differs from the recomputed one.
    TotalMismatch {
        field: TotalField,
        expected: Amount,
        actual: Amount,
    },
    /// A recomputed value does not fit the decimal range.
    Overflow { context: String },
}

impl Rejection {
    /// Index of the offending item, for item-level rejections.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::NegativeItemValue { index, .. } | Self::ItemMismatch { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoItems => f.write_str("no items"),
            Self::NegativeItemValue {
                index,
                field,
                value,
            } => write!(f, "item {index}: {} must not be negative, got {value}", field.as_str()),
            Self::ItemMismatch {
                index,
                field,
                expected,
                actual,
            } => write!(
                f,
                "item {index}: {} mismatch, expected {expected}, got {actual}",
                field.as_str()
            ),
            Self::TotalMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{} mismatch, expected {expected}, got {actual}",
                field.as_str()
            ),
            Self::Overflow { context } => write!(f, "arithmetic overflow computing {context}"),
        }
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Rejection),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn status(&self) -> ValidationStatus {
        match self {
            Self::Valid => ValidationStatus::Valid,
            Self::Invalid(_) => ValidationStatus::Invalid,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Valid => None,
            Self::Invalid(r) => Some(r),
        }
    }
}

/// Stateless checker for document consistency.
///
/// Holds no data; one instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Validate a document's declared values.
    pub fn validate(&self, document: &Document) -> Verdict {
        tracing::debug!(document_id = %document.document_id, "validating document");

        let verdict = match check_document(document) {
            Ok(()) => Verdict::Valid,
            Err(rejection) => Verdict::Invalid(rejection),
        };

        match &verdict {
            Verdict::Valid => {
                tracing::info!(document_id = %document.document_id, "document validation passed");
            }
            Verdict::Invalid(rejection) => {
                tracing::warn!(
                    document_id = %document.document_id,
                    reason = %rejection,
                    "document validation failed"
                );
            }
        }
        verdict
    }
}

fn check_document(document: &Document) -> Result<(), Rejection> {
    if document.items.is_empty() {
        return Err(Rejection::NoItems);
    }
    for (index, item) in document.items.iter().enumerate() {
        check_item(index, item)?;
    }
    check_totals(document)
}

fn check_item(index: usize, item: &Item) -> Result<(), Rejection> {
    for (field, value) in [
        (ItemField::UnitPrice, item.unit_price),
        (ItemField::Quantity, item.quantity),
    ] {
        if value.is_negative() {
            return Err(Rejection::NegativeItemValue {
                index,
                field,
                value,
            });
        }
    }

    let expected_subtotal = line_subtotal(item.unit_price.as_decimal(), item.quantity.as_decimal())
        .ok_or_else(|| overflow(format!("item {index} subtotal")))?;
    let expected_tax =
        tax_on(expected_subtotal).ok_or_else(|| overflow(format!("item {index} tax")))?;

    compare_item(index, ItemField::LineSubtotal, expected_subtotal, item.line_subtotal)?;
    compare_item(index, ItemField::LineTax, expected_tax, item.line_tax)
}

fn check_totals(document: &Document) -> Result<(), Rejection> {
    // Declared subtotals, not recomputed ones: each was already held within
    // tolerance of its recomputed value by the item check.
    let expected_net = checked_sum(document.items.iter().map(|i| i.line_subtotal.as_decimal()))
        .ok_or_else(|| overflow("net amount".to_string()))?;
    let expected_tax = tax_on(expected_net).ok_or_else(|| overflow("tax amount".to_string()))?;
    let expected_total = expected_net
        .checked_add(expected_tax)
        .ok_or_else(|| overflow("total amount".to_string()))?;

    compare_total(TotalField::NetAmount, expected_net, document.net_amount)?;
    compare_total(TotalField::TaxAmount, expected_tax, document.tax_amount)?;
    compare_total(TotalField::TotalAmount, expected_total, document.total_amount)
}

fn compare_item(
    index: usize,
    field: ItemField,
    expected: Decimal,
    actual: Amount,
) -> Result<(), Rejection> {
    if are_equal(actual.as_decimal(), expected, TOLERANCE) {
        Ok(())
    } else {
        Err(Rejection::ItemMismatch {
            index,
            field,
            expected: Amount::new(expected),
            actual,
        })
    }
}

fn compare_total(field: TotalField, expected: Decimal, actual: Amount) -> Result<(), Rejection> {
    if are_equal(actual.as_decimal(), expected, TOLERANCE) {
        Ok(())
    } else {
        Err(Rejection::TotalMismatch {
            field,
            expected: Amount::new(expected),
            actual,
        })
    }
}

fn overflow(context: String) -> Rejection {
    Rejection::Overflow { context }
}
