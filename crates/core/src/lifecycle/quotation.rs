//! Quotation lifecycle transitions.
//!
//! Quotation status is driven entirely by payment recording:
//! `Performa → PartiallyPaid → FullyPaid`, with `Performa → FullyPaid`
//! when a single payment settles the full amount. `FullyPaid` is
//! terminal.

use rust_decimal::Decimal;

use super::error::LifecycleError;
use super::types::QuotationStatus;

/// Stateless service for quotation lifecycle rules.
pub struct QuotationLifecycle;

impl QuotationLifecycle {
    /// Computes the status a quotation takes after a payment brings its
    /// paid amount to `new_paid`.
    ///
    /// Uses `>=` rather than exact equality: a payment that settles the
    /// whole balance marks the quotation fully paid.
    #[must_use]
    pub fn status_after_payment(new_paid: Decimal, total_amount: Decimal) -> QuotationStatus {
        if new_paid >= total_amount {
            QuotationStatus::FullyPaid
        } else {
            QuotationStatus::PartiallyPaid
        }
    }

    /// Checks whether a status transition is legal.
    ///
    /// Valid transitions:
    /// - `Performa → PartiallyPaid` (partial payment)
    /// - `Performa → FullyPaid` (single settling payment)
    /// - `PartiallyPaid → PartiallyPaid` (further partial payment)
    /// - `PartiallyPaid → FullyPaid` (settling payment)
    #[must_use]
    pub fn is_valid_transition(from: QuotationStatus, to: QuotationStatus) -> bool {
        use QuotationStatus::{FullyPaid, PartiallyPaid, Performa};
        matches!(
            (from, to),
            (Performa | PartiallyPaid, PartiallyPaid | FullyPaid)
        )
    }

    /// Validates that the quotation's financial fields may be edited.
    ///
    /// Editing items or totals is only legal while the quotation is in
    /// `Performa` status with no recorded payments; further money
    /// movements go through the payment path.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::EditLocked` or
    /// `LifecycleError::HasPayments`.
    pub fn validate_can_edit(
        status: QuotationStatus,
        payment_count: usize,
    ) -> Result<(), LifecycleError> {
        if !status.is_editable() {
            return Err(LifecycleError::EditLocked {
                status: status.as_str(),
            });
        }
        if payment_count > 0 {
            return Err(LifecycleError::HasPayments {
                count: payment_count,
            });
        }
        Ok(())
    }

    /// Validates that the quotation may be deleted.
    ///
    /// Deletion is only legal before any payment has been recorded.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::DeleteLocked` or
    /// `LifecycleError::HasPayments`.
    pub fn validate_can_delete(
        status: QuotationStatus,
        payment_count: usize,
    ) -> Result<(), LifecycleError> {
        if status != QuotationStatus::Performa {
            return Err(LifecycleError::DeleteLocked {
                status: status.as_str(),
            });
        }
        if payment_count > 0 {
            return Err(LifecycleError::HasPayments {
                count: payment_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_after_partial_payment() {
        let status = QuotationLifecycle::status_after_payment(dec!(400), dec!(1000));
        assert_eq!(status, QuotationStatus::PartiallyPaid);
    }

    #[test]
    fn test_status_after_settling_payment() {
        let status = QuotationLifecycle::status_after_payment(dec!(1000), dec!(1000));
        assert_eq!(status, QuotationStatus::FullyPaid);
    }

    #[test]
    fn test_status_after_overshoot_is_fully_paid() {
        // `>=` rule: an overshoot still lands on FullyPaid.
        let status = QuotationLifecycle::status_after_payment(dec!(1000.01), dec!(1000));
        assert_eq!(status, QuotationStatus::FullyPaid);
    }

    #[test]
    fn test_valid_transitions() {
        use QuotationStatus::{FullyPaid, PartiallyPaid, Performa};
        assert!(QuotationLifecycle::is_valid_transition(Performa, PartiallyPaid));
        assert!(QuotationLifecycle::is_valid_transition(Performa, FullyPaid));
        assert!(QuotationLifecycle::is_valid_transition(PartiallyPaid, FullyPaid));
        assert!(QuotationLifecycle::is_valid_transition(PartiallyPaid, PartiallyPaid));
    }

    #[test]
    fn test_nothing_leaves_fully_paid() {
        use QuotationStatus::{FullyPaid, PartiallyPaid, Performa};
        assert!(!QuotationLifecycle::is_valid_transition(FullyPaid, Performa));
        assert!(!QuotationLifecycle::is_valid_transition(FullyPaid, PartiallyPaid));
        assert!(!QuotationLifecycle::is_valid_transition(FullyPaid, FullyPaid));
    }

    #[test]
    fn test_edit_allowed_only_for_performa_without_payments() {
        assert!(QuotationLifecycle::validate_can_edit(QuotationStatus::Performa, 0).is_ok());
        assert!(matches!(
            QuotationLifecycle::validate_can_edit(QuotationStatus::PartiallyPaid, 1),
            Err(LifecycleError::EditLocked { .. })
        ));
        assert!(matches!(
            QuotationLifecycle::validate_can_edit(QuotationStatus::FullyPaid, 2),
            Err(LifecycleError::EditLocked { .. })
        ));
        assert!(matches!(
            QuotationLifecycle::validate_can_edit(QuotationStatus::Performa, 1),
            Err(LifecycleError::HasPayments { count: 1 })
        ));
    }

    #[test]
    fn test_delete_blocked_once_paid() {
        assert!(QuotationLifecycle::validate_can_delete(QuotationStatus::Performa, 0).is_ok());
        assert!(matches!(
            QuotationLifecycle::validate_can_delete(QuotationStatus::PartiallyPaid, 1),
            Err(LifecycleError::DeleteLocked { .. })
        ));
        assert!(matches!(
            QuotationLifecycle::validate_can_delete(QuotationStatus::FullyPaid, 3),
            Err(LifecycleError::DeleteLocked { .. })
        ));
    }
}
