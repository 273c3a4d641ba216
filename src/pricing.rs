//! Pricing

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::cart::CartLineItem;

/// Errors that can occur while converting an amount to money.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount does not fit in the currency's minor units.
    #[error("amount {0} is out of range for {1}")]
    OutOfRange(Decimal, &'static str),
}

/// Calculates the total price of a list of line-items.
///
/// Each line contributes `unit_price × quantity`. The sum is exact; no
/// rounding is applied here.
pub fn total_price(items: &[CartLineItem]) -> Decimal {
    items.iter().map(CartLineItem::line_total).sum()
}

/// Rounds `amount` to the currency's minor unit, half away from zero.
pub fn round_to_currency(amount: Decimal, currency: &Currency) -> Decimal {
    amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a decimal amount into money in the given currency.
///
/// # Errors
///
/// Returns [`PricingError::OutOfRange`] if the rounded amount does not fit in
/// 64-bit minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let mut rounded = round_to_currency(amount, currency);
    rounded.rescale(currency.exponent);

    let minor = i64::try_from(rounded.mantissa())
        .map_err(|_err| PricingError::OutOfRange(amount, currency.iso_alpha_code))?;

    Ok(Money::from_minor(minor, currency))
}

/// Formats a decimal amount for display in the given currency.
///
/// # Errors
///
/// Returns [`PricingError::OutOfRange`] if the amount cannot be represented.
pub fn format_price(amount: Decimal, currency: &'static Currency) -> Result<String, PricingError> {
    Ok(to_money(amount, currency)?.to_string())
}
