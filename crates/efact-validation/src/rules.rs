//! # Tax and Tolerance Rules
//!
//! The constants and arithmetic primitives behind every check. All values
//! are exact decimals, so the tolerance boundary is exact: a difference of
//! precisely `0.01` is a mismatch, never a rounding accident.

use rust_decimal::Decimal;

/// Tax rate applied uniformly to every line and to the document net (18%).
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Absolute tolerance for every equality check (0.01).
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// `|a − b| < tolerance`. Strict: a difference equal to the tolerance is
/// unequal. A difference too large to represent is unequal.
pub fn are_equal(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    a.checked_sub(b)
        .map(|diff| diff.abs() < tolerance)
        .unwrap_or(false)
}

/// `unit_price × quantity`, or `None` on overflow.
pub fn line_subtotal(unit_price: Decimal, quantity: Decimal) -> Option<Decimal> {
    unit_price.checked_mul(quantity)
}

/// `base × TAX_RATE`, or `None` on overflow.
pub fn tax_on(base: Decimal) -> Option<Decimal> {
    base.checked_mul(TAX_RATE)
}

/// Sum of the given values, or `None` on overflow.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}
