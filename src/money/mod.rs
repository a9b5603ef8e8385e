//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored and serialized as `f64`, but every calculation runs on
//! `Decimal` and is rounded back to 2 decimal places on the way out.

#[cfg(test)]
mod tests;

use rust_decimal::prelude::*;

use crate::utils::AppError;

/// Rounding: 2 decimal places, midpoint away from zero
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price (R$1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum allowed quantity per item
const MAX_QUANTITY: i64 = 9999;

/// Convert an f64 price into a Decimal for arithmetic
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// One order line: quantity x unit price
pub fn line_total(quantity: i64, unit_price: f64) -> Decimal {
    Decimal::from(quantity) * to_decimal(unit_price)
}

/// Sum of all order lines, rounded for storage
pub fn order_total(lines: &[(i64, f64)]) -> f64 {
    let sum = lines
        .iter()
        .fold(Decimal::ZERO, |acc, (qty, price)| acc + line_total(*qty, *price));
    to_f64(sum)
}

/// Validate a unit price coming in from a request body
pub fn validate_unit_price(value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "unit_price must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "unit_price must be non-negative, got {value}"
        )));
    }
    if value > MAX_PRICE {
        return Err(AppError::validation(format!(
            "unit_price exceeds maximum allowed ({MAX_PRICE}), got {value}"
        )));
    }
    Ok(())
}

/// Validate an item quantity coming in from a request body
pub fn validate_quantity(value: i64) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {value}"
        )));
    }
    if value > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {value}"
        )));
    }
    Ok(())
}
