//! Payment allocation engine.
//!
//! Splitting money by a ratio and rounding each piece loses cents. The
//! allocator avoids that two ways:
//!
//! - Tax components of non-settling payments are scaled by the payment
//!   ratio and rounded; the settling payment takes the exact remainder
//!   (parent amount minus everything issued so far).
//! - The invoice subtotal is derived as `total - tax - service tax`, so
//!   every invoice is internally additive, and the subtotal series
//!   reconciles because the other three series do.
//! - Line items are allocated from the invoice subtotal by rounding all
//!   but the last share and assigning the last the exact remainder, so
//!   item amounts sum exactly to the invoice subtotal.

use rust_decimal::Decimal;

use atelier_shared::types::round_money;

use crate::lifecycle::{QuotationLifecycle, QuotationStatus};
use crate::pricing::QuotationItem;

use super::error::PaymentError;
use super::types::{
    InvoiceDraft, IssuedToDate, ParentDocument, PaymentInput, PaymentOutcome, PaymentRecord,
};

/// Stateless engine for recording payments against quotations.
pub struct PaymentAllocator;

impl PaymentAllocator {
    /// Validates a payment against a quotation and computes the outcome:
    /// updated paid amount, new status, the payment record, and the
    /// generated child invoice.
    ///
    /// A request without an explicit amount is the pay-remaining
    /// shortcut: it resolves to the full outstanding balance and is
    /// recorded as a single payment.
    ///
    /// Pure: persisting the outcome (atomically, together with the
    /// invoice number allocation) is the store's concern.
    ///
    /// # Errors
    ///
    /// Returns a `PaymentError` if the quotation is already fully paid,
    /// the amount is not positive, or the amount exceeds the remaining
    /// balance. No partial result is produced on error.
    pub fn allocate(
        parent: &ParentDocument,
        input: &PaymentInput,
        issued: &IssuedToDate,
    ) -> Result<PaymentOutcome, PaymentError> {
        if parent.status.is_terminal() {
            return Err(PaymentError::AlreadyFullyPaid);
        }
        if parent.total_amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveTotal(parent.total_amount));
        }

        let balance = parent.balance();
        let amount = round_money(input.amount.unwrap_or(balance));
        if amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount(amount));
        }
        if amount > balance {
            return Err(PaymentError::AmountExceedsBalance {
                requested: amount,
                balance,
            });
        }

        let new_paid = parent.paid_amount + amount;
        let new_status = QuotationLifecycle::status_after_payment(new_paid, parent.total_amount);
        let settling = new_status == QuotationStatus::FullyPaid;

        let tax_amount = Self::component_share(
            parent.tax_amount,
            issued.tax_amount,
            amount,
            parent.total_amount,
            settling,
        );
        let service_tax_amount = Self::component_share(
            parent.service_tax_amount,
            issued.service_tax_amount,
            amount,
            parent.total_amount,
            settling,
        );
        let subtotal = amount - tax_amount - service_tax_amount;

        let items = Self::allocate_items(&parent.items, subtotal);

        let invoice = InvoiceDraft {
            quotation_id: Some(parent.id),
            client_id: parent.client_id,
            date: input.date,
            items,
            currency: parent.currency,
            subtotal,
            tax_label: parent.tax_label.clone(),
            tax_percent: parent.tax_percent,
            tax_amount,
            service_tax_label: parent.service_tax_label.clone(),
            service_tax_percent: parent.service_tax_percent,
            service_tax_amount,
            total_amount: amount,
            paid_amount: amount,
            payment_method: input.method.clone(),
            payment_date: input.date,
        };

        Ok(PaymentOutcome {
            new_paid_amount: new_paid,
            new_status,
            payment: PaymentRecord {
                amount,
                method: input.method.clone(),
                date: input.date,
                notes: input.notes.clone(),
                recorded_at: chrono::Utc::now(),
            },
            invoice,
        })
    }

    /// Share of a parent tax component carried by this payment.
    ///
    /// Non-settling payments take the rounded proportional share, capped
    /// at what is still unissued; the settling payment takes the exact
    /// remainder.
    fn component_share(
        parent_amount: Decimal,
        issued_amount: Decimal,
        payment_amount: Decimal,
        total_amount: Decimal,
        settling: bool,
    ) -> Decimal {
        let remaining = (parent_amount - issued_amount).max(Decimal::ZERO);
        if settling {
            return remaining;
        }
        round_money(parent_amount * payment_amount / total_amount).min(remaining)
    }

    /// Scales the parent's line items to the invoice subtotal.
    ///
    /// All but the last item take their rounded proportional share; the
    /// last item takes the exact remainder, so item amounts always sum
    /// exactly to the subtotal.
    fn allocate_items(items: &[QuotationItem], subtotal: Decimal) -> Vec<QuotationItem> {
        if items.is_empty() {
            return vec![];
        }

        let weight_sum: Decimal = items.iter().map(|i| i.amount).sum();
        let count = Decimal::from(items.len() as u64);

        let mut allocated = Decimal::ZERO;
        let mut amounts = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let amount = if index == items.len() - 1 {
                subtotal - allocated
            } else if weight_sum.is_zero() {
                round_money(subtotal / count)
            } else {
                round_money(subtotal * item.amount / weight_sum)
            };
            allocated += amount;
            amounts.push(amount);
        }

        items
            .iter()
            .zip(amounts)
            .map(|(item, amount)| QuotationItem {
                description: item.description.clone(),
                amount,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use atelier_shared::types::{ClientId, Currency, QuotationId};

    fn parent_1000() -> ParentDocument {
        // subtotal 934.58, 5% tax = 46.73, 2% service = 18.69, total 1000.00
        ParentDocument {
            id: QuotationId::new(),
            client_id: ClientId::new(),
            currency: Currency::Inr,
            items: vec![
                QuotationItem {
                    description: "Modular kitchen".to_string(),
                    amount: dec!(600),
                },
                QuotationItem {
                    description: "Wardrobe".to_string(),
                    amount: dec!(334.58),
                },
            ],
            subtotal: dec!(934.58),
            tax_label: "GST".to_string(),
            tax_percent: dec!(5),
            tax_amount: dec!(46.73),
            service_tax_label: "Service Charge".to_string(),
            service_tax_percent: dec!(2),
            service_tax_amount: dec!(18.69),
            total_amount: dec!(1000.00),
            paid_amount: dec!(0),
            status: QuotationStatus::Performa,
        }
    }

    fn payment(amount: Decimal) -> PaymentInput {
        PaymentInput {
            amount: Some(amount),
            method: "Bank Transfer".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_partial_payment_scales_components() {
        let parent = parent_1000();
        let outcome =
            PaymentAllocator::allocate(&parent, &payment(dec!(400)), &IssuedToDate::default())
                .unwrap();

        assert_eq!(outcome.new_paid_amount, dec!(400));
        assert_eq!(outcome.new_status, QuotationStatus::PartiallyPaid);

        let invoice = &outcome.invoice;
        assert_eq!(invoice.total_amount, dec!(400));
        assert_eq!(invoice.paid_amount, dec!(400));
        // ratio 0.4: tax 46.73 -> 18.69, service 18.69 -> 7.48 (banker's)
        assert_eq!(invoice.tax_amount, dec!(18.69));
        assert_eq!(invoice.service_tax_amount, dec!(7.48));
        assert_eq!(invoice.subtotal, dec!(373.83));
        assert_eq!(
            invoice.subtotal + invoice.tax_amount + invoice.service_tax_amount,
            invoice.total_amount
        );
    }

    #[test]
    fn test_invoice_items_sum_to_subtotal() {
        let parent = parent_1000();
        let outcome =
            PaymentAllocator::allocate(&parent, &payment(dec!(400)), &IssuedToDate::default())
                .unwrap();

        let item_sum: Decimal = outcome.invoice.items.iter().map(|i| i.amount).sum();
        assert_eq!(item_sum, outcome.invoice.subtotal);
        assert_eq!(outcome.invoice.items.len(), 2);
        assert_eq!(outcome.invoice.items[0].description, "Modular kitchen");
    }

    #[test]
    fn test_settling_payment_takes_exact_remainder() {
        let parent = parent_1000();

        // First payment: 400.
        let first =
            PaymentAllocator::allocate(&parent, &payment(dec!(400)), &IssuedToDate::default())
                .unwrap();

        // Second payment settles the quotation.
        let mut after_first = parent.clone();
        after_first.paid_amount = first.new_paid_amount;
        after_first.status = first.new_status;
        let issued = IssuedToDate {
            tax_amount: first.invoice.tax_amount,
            service_tax_amount: first.invoice.service_tax_amount,
        };
        let second = PaymentAllocator::allocate(&after_first, &payment(dec!(600)), &issued).unwrap();

        assert_eq!(second.new_status, QuotationStatus::FullyPaid);
        assert_eq!(second.new_paid_amount, dec!(1000));

        // Each component series reconciles exactly with the parent.
        assert_eq!(
            first.invoice.tax_amount + second.invoice.tax_amount,
            parent.tax_amount
        );
        assert_eq!(
            first.invoice.service_tax_amount + second.invoice.service_tax_amount,
            parent.service_tax_amount
        );
        assert_eq!(
            first.invoice.subtotal + second.invoice.subtotal,
            parent.subtotal
        );
        assert_eq!(
            first.invoice.total_amount + second.invoice.total_amount,
            parent.total_amount
        );
    }

    #[test]
    fn test_pay_remaining_shortcut() {
        let mut parent = parent_1000();
        parent.paid_amount = dec!(400);
        parent.status = QuotationStatus::PartiallyPaid;
        let issued = IssuedToDate {
            tax_amount: dec!(18.69),
            service_tax_amount: dec!(7.48),
        };

        let input = PaymentInput {
            amount: None,
            method: "Cash".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            notes: Some("final settlement".to_string()),
        };
        let outcome = PaymentAllocator::allocate(&parent, &input, &issued).unwrap();

        assert_eq!(outcome.payment.amount, dec!(600));
        assert_eq!(outcome.new_status, QuotationStatus::FullyPaid);
        assert_eq!(outcome.invoice.total_amount, dec!(600));
    }

    #[test]
    fn test_overpayment_rejected() {
        let parent = parent_1000();
        let result =
            PaymentAllocator::allocate(&parent, &payment(dec!(1000.01)), &IssuedToDate::default());
        assert_eq!(
            result,
            Err(PaymentError::AmountExceedsBalance {
                requested: dec!(1000.01),
                balance: dec!(1000.00),
            })
        );
    }

    #[test]
    fn test_overpayment_rejected_after_partial() {
        let mut parent = parent_1000();
        parent.paid_amount = dec!(700);
        parent.status = QuotationStatus::PartiallyPaid;
        let result =
            PaymentAllocator::allocate(&parent, &payment(dec!(301)), &IssuedToDate::default());
        assert!(matches!(
            result,
            Err(PaymentError::AmountExceedsBalance { .. })
        ));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let parent = parent_1000();
        assert!(matches!(
            PaymentAllocator::allocate(&parent, &payment(dec!(0)), &IssuedToDate::default()),
            Err(PaymentError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            PaymentAllocator::allocate(&parent, &payment(dec!(-5)), &IssuedToDate::default()),
            Err(PaymentError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_fully_paid_rejects_further_payments() {
        let mut parent = parent_1000();
        parent.paid_amount = dec!(1000);
        parent.status = QuotationStatus::FullyPaid;
        assert_eq!(
            PaymentAllocator::allocate(&parent, &payment(dec!(1)), &IssuedToDate::default()),
            Err(PaymentError::AlreadyFullyPaid)
        );
    }

    #[test]
    fn test_single_settling_payment_copies_parent_components() {
        let parent = parent_1000();
        let outcome =
            PaymentAllocator::allocate(&parent, &payment(dec!(1000)), &IssuedToDate::default())
                .unwrap();

        assert_eq!(outcome.new_status, QuotationStatus::FullyPaid);
        assert_eq!(outcome.invoice.tax_amount, parent.tax_amount);
        assert_eq!(outcome.invoice.service_tax_amount, parent.service_tax_amount);
        assert_eq!(outcome.invoice.subtotal, parent.subtotal);
        assert_eq!(outcome.invoice.total_amount, parent.total_amount);
    }

    #[test]
    fn test_payment_amount_rounded_to_money_precision() {
        let parent = parent_1000();
        let outcome =
            PaymentAllocator::allocate(&parent, &payment(dec!(400.004)), &IssuedToDate::default())
                .unwrap();
        assert_eq!(outcome.payment.amount, dec!(400.00));
    }
}
