//! Error types for payment recording.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The payment amount is zero or negative.
    #[error("payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The payment amount exceeds the remaining balance.
    #[error("payment of {requested} exceeds remaining balance of {balance}")]
    AmountExceedsBalance {
        /// The requested payment amount.
        requested: Decimal,
        /// The remaining balance on the quotation.
        balance: Decimal,
    },

    /// The quotation is already fully paid.
    #[error("quotation is already fully paid")]
    AlreadyFullyPaid,

    /// The quotation has a non-positive total.
    #[error("cannot record a payment against a total of {0}")]
    NonPositiveTotal(Decimal),
}
