//! Property-based tests for pricing calculations.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::Calculator;
use super::types::{BoqItem, QuotationItem, TaxConfig};

/// Strategy to generate non-negative money amounts (0.00 to 1,000,000.00).
fn money_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate tax percentages (0.00 to 100.00).
fn percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy to generate a valid tax configuration.
fn tax_config() -> impl Strategy<Value = TaxConfig> {
    (percent(), any::<bool>(), percent()).prop_map(|(tax, enabled, service)| TaxConfig {
        tax_label: "GST".to_string(),
        tax_percent: tax,
        service_tax_enabled: enabled,
        service_tax_label: "Service Charge".to_string(),
        service_tax_percent: service,
    })
}

/// Strategy to generate BOQ items with valid fields.
fn boq_items() -> impl Strategy<Value = Vec<BoqItem>> {
    prop::collection::vec(
        (money_amount(), 0i64..1000, percent()).prop_map(|(price, qty, discount)| BoqItem {
            description: "item".to_string(),
            category: String::new(),
            area: String::new(),
            unit_price: price,
            quantity: Decimal::from(qty),
            discount_percent: discount,
        }),
        0..8,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Total is always exactly taxable + tax + service tax.
    #[test]
    fn prop_tax_additivity(taxable in money_amount(), config in tax_config()) {
        let breakdown = Calculator::compute(taxable, Some(&config)).unwrap();
        prop_assert_eq!(
            breakdown.total_amount,
            taxable + breakdown.tax_amount + breakdown.service_tax_amount
        );
    }

    /// With no tax configuration the total equals the taxable amount.
    #[test]
    fn prop_zero_tax_identity(taxable in money_amount()) {
        let breakdown = Calculator::compute(taxable, None).unwrap();
        prop_assert_eq!(breakdown.total_amount, taxable);
        prop_assert_eq!(breakdown.tax_amount, Decimal::ZERO);
    }

    /// Tax amounts are never negative for valid inputs.
    #[test]
    fn prop_tax_amounts_non_negative(taxable in money_amount(), config in tax_config()) {
        let breakdown = Calculator::compute(taxable, Some(&config)).unwrap();
        prop_assert!(breakdown.tax_amount >= Decimal::ZERO);
        prop_assert!(breakdown.service_tax_amount >= Decimal::ZERO);
    }

    /// Quotation totals: subtotal equals the item sum and the stored
    /// invariant holds.
    #[test]
    fn prop_quotation_totals_invariant(
        amounts in prop::collection::vec(money_amount(), 0..8),
        config in tax_config(),
    ) {
        let items: Vec<QuotationItem> = amounts
            .into_iter()
            .map(|amount| QuotationItem { description: "item".to_string(), amount })
            .collect();
        let totals = Calculator::quotation_totals(&items, Some(&config)).unwrap();
        prop_assert_eq!(totals.subtotal, items.iter().map(|i| i.amount).sum::<Decimal>());
        prop_assert_eq!(
            totals.total_amount,
            totals.subtotal - totals.total_discount
                + totals.tax_amount
                + totals.service_tax_amount
        );
    }

    /// BOQ totals: the discount never exceeds the subtotal and the stored
    /// invariant holds.
    #[test]
    fn prop_boq_totals_invariant(items in boq_items(), config in tax_config()) {
        let totals = Calculator::boq_totals(&items, Some(&config)).unwrap();
        prop_assert!(totals.total_discount <= totals.subtotal);
        prop_assert_eq!(
            totals.total_amount,
            totals.subtotal - totals.total_discount
                + totals.tax_amount
                + totals.service_tax_amount
        );
    }
}
