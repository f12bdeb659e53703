//! Shared money rounding and formatting helpers.
//!
//! All currency arithmetic in Smokehaus goes through [`rust_decimal`] and the
//! two rounding helpers below. Both round **half away from zero**, and both
//! the delivery-fee calculator and the billing display use them, so the two
//! can never disagree on rounding.
//!
//! Display strings produced here are never parsed back into numbers; the
//! `Decimal` value is always the source of truth.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol used across the storefront. Single-currency by design.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Round to two decimal places, half away from zero.
///
/// Used for tax amounts and any displayed paise-precision value.
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to the nearest whole currency unit, half away from zero.
///
/// Delivery fees are billed in whole rupees.
#[must_use]
pub fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount the way item lines show it: `₹500`, `₹502.5`.
///
/// Trailing zero decimals are dropped (a whole-rupee amount renders without
/// a fraction), matching how line amounts appear in the order message.
#[must_use]
pub fn format_rupees(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{}", amount.normalize())
}

/// Format an amount with exactly two decimal places: `₹590.00`.
///
/// Used for the grand total.
#[must_use]
pub fn format_rupees_fixed(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{:.2}", round2(amount))
}
