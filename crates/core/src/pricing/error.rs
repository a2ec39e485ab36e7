//! Error types for pricing calculations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during pricing calculations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The taxable amount is negative.
    #[error("subtotal must not be negative, got {0}")]
    NegativeSubtotal(Decimal),

    /// A line item amount is negative.
    #[error("item amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// A line item unit price is negative.
    #[error("unit price must not be negative, got {0}")]
    NegativeUnitPrice(Decimal),

    /// A line item quantity is negative.
    #[error("quantity must not be negative, got {0}")]
    NegativeQuantity(Decimal),

    /// A tax percentage is outside the 0-100 range.
    #[error("tax percent must be between 0 and 100, got {0}")]
    TaxPercentOutOfRange(Decimal),

    /// A line discount percentage is outside the 0-100 range.
    #[error("discount percent must be between 0 and 100, got {0}")]
    DiscountOutOfRange(Decimal),
}
