//! Property-based tests for payment allocation.
//!
//! The central property: for any quotation and any sequence of partial
//! payments that ends in full payment, the generated invoices reconcile
//! exactly with the parent - totals, subtotals, tax, and service tax
//! each sum back to the quotation's, and the paid amount equals the sum
//! of recorded payments.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use atelier_shared::types::{ClientId, Currency, QuotationId, round_money};

use crate::lifecycle::QuotationStatus;
use crate::pricing::{Calculator, QuotationItem, TaxConfig};

use super::allocator::PaymentAllocator;
use super::types::{InvoiceDraft, IssuedToDate, ParentDocument, PaymentInput, PaymentRecord};

/// Strategy to generate positive item amounts (1.00 to 100,000.00).
fn item_amount() -> impl Strategy<Value = Decimal> {
    (100i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a tax configuration (0.00% to 30.00% each).
fn tax_config() -> impl Strategy<Value = TaxConfig> {
    ((0i64..=3000i64), any::<bool>(), (0i64..=3000i64)).prop_map(|(tax, enabled, service)| {
        TaxConfig {
            tax_label: "GST".to_string(),
            tax_percent: Decimal::new(tax, 2),
            service_tax_enabled: enabled,
            service_tax_label: "Service Charge".to_string(),
            service_tax_percent: Decimal::new(service, 2),
        }
    })
}

/// Strategy to generate partial-payment fractions (1% to 99% of balance).
fn payment_fractions() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=99, 0..5)
}

fn build_parent(amounts: &[Decimal], config: &TaxConfig) -> ParentDocument {
    let items: Vec<QuotationItem> = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| QuotationItem {
            description: format!("item {i}"),
            amount: *amount,
        })
        .collect();
    let totals = Calculator::quotation_totals(&items, Some(config)).unwrap();

    ParentDocument {
        id: QuotationId::new(),
        client_id: ClientId::new(),
        currency: Currency::Inr,
        items,
        subtotal: totals.subtotal,
        tax_label: totals.tax_label,
        tax_percent: totals.tax_percent,
        tax_amount: totals.tax_amount,
        service_tax_label: totals.service_tax_label,
        service_tax_percent: totals.service_tax_percent,
        service_tax_amount: totals.service_tax_amount,
        total_amount: totals.total_amount,
        paid_amount: Decimal::ZERO,
        status: QuotationStatus::Performa,
    }
}

fn payment_input(amount: Option<Decimal>) -> PaymentInput {
    PaymentInput {
        amount,
        method: "Bank Transfer".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        notes: None,
    }
}

/// Drives a quotation through the given partial payments and a settling
/// payment, returning the generated invoices and recorded payments.
fn pay_off(
    parent: &ParentDocument,
    fractions: &[u8],
) -> (Vec<InvoiceDraft>, Vec<PaymentRecord>, ParentDocument) {
    let mut doc = parent.clone();
    let mut issued = IssuedToDate::default();
    let mut invoices = Vec::new();
    let mut payments = Vec::new();

    for fraction in fractions {
        let balance = doc.balance();
        let amount = round_money(balance * Decimal::from(*fraction) / Decimal::from(100));
        if amount <= Decimal::ZERO || amount >= balance {
            continue;
        }
        let outcome =
            PaymentAllocator::allocate(&doc, &payment_input(Some(amount)), &issued).unwrap();
        issued.tax_amount += outcome.invoice.tax_amount;
        issued.service_tax_amount += outcome.invoice.service_tax_amount;
        doc.paid_amount = outcome.new_paid_amount;
        doc.status = outcome.new_status;
        invoices.push(outcome.invoice);
        payments.push(outcome.payment);
    }

    // Settle the remainder via the pay-remaining shortcut.
    let outcome = PaymentAllocator::allocate(&doc, &payment_input(None), &issued).unwrap();
    doc.paid_amount = outcome.new_paid_amount;
    doc.status = outcome.new_status;
    invoices.push(outcome.invoice);
    payments.push(outcome.payment);

    (invoices, payments, doc)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Invoice-sum invariant: every component series reconciles exactly
    /// with the parent once the quotation is fully paid.
    #[test]
    fn prop_invoice_series_reconciles(
        amounts in prop::collection::vec(item_amount(), 1..5),
        config in tax_config(),
        fractions in payment_fractions(),
    ) {
        let parent = build_parent(&amounts, &config);
        let (invoices, _, doc) = pay_off(&parent, &fractions);

        prop_assert_eq!(doc.status, QuotationStatus::FullyPaid);
        prop_assert_eq!(
            invoices.iter().map(|i| i.total_amount).sum::<Decimal>(),
            parent.total_amount
        );
        prop_assert_eq!(
            invoices.iter().map(|i| i.subtotal).sum::<Decimal>(),
            parent.subtotal
        );
        prop_assert_eq!(
            invoices.iter().map(|i| i.tax_amount).sum::<Decimal>(),
            parent.tax_amount
        );
        prop_assert_eq!(
            invoices.iter().map(|i| i.service_tax_amount).sum::<Decimal>(),
            parent.service_tax_amount
        );
    }

    /// Payment conservation: the paid amount equals the sum of recorded
    /// payments at every step.
    #[test]
    fn prop_payment_conservation(
        amounts in prop::collection::vec(item_amount(), 1..5),
        config in tax_config(),
        fractions in payment_fractions(),
    ) {
        let parent = build_parent(&amounts, &config);
        let (_, payments, doc) = pay_off(&parent, &fractions);

        prop_assert_eq!(
            payments.iter().map(|p| p.amount).sum::<Decimal>(),
            doc.paid_amount
        );
        prop_assert_eq!(doc.paid_amount, parent.total_amount);
    }

    /// Every generated invoice is internally additive and its items sum
    /// exactly to its subtotal.
    #[test]
    fn prop_each_invoice_is_additive(
        amounts in prop::collection::vec(item_amount(), 1..5),
        config in tax_config(),
        fractions in payment_fractions(),
    ) {
        let parent = build_parent(&amounts, &config);
        let (invoices, _, _) = pay_off(&parent, &fractions);

        for invoice in &invoices {
            prop_assert_eq!(
                invoice.subtotal + invoice.tax_amount + invoice.service_tax_amount,
                invoice.total_amount
            );
            prop_assert_eq!(
                invoice.items.iter().map(|i| i.amount).sum::<Decimal>(),
                invoice.subtotal
            );
            prop_assert_eq!(invoice.paid_amount, invoice.total_amount);
        }
    }
}
