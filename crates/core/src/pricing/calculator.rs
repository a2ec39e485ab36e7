//! Tax and totals calculation.

use rust_decimal::Decimal;

use atelier_shared::types::round_money;

use super::error::PricingError;
use super::types::{BoqItem, DocumentTotals, QuotationItem, TaxBreakdown, TaxConfig};

/// Label used when no tax configuration is present.
const DEFAULT_TAX_LABEL: &str = "Tax";
/// Label used when no service tax configuration is present.
const DEFAULT_SERVICE_TAX_LABEL: &str = "Service Tax";

/// Stateless calculator for document totals.
///
/// All methods are pure: the same inputs always produce the same
/// breakdown, and nothing is read from ambient state.
pub struct Calculator;

impl Calculator {
    /// Computes the tax breakdown for a taxable amount.
    ///
    /// With no tax configuration the breakdown is zero tax and
    /// `total_amount == taxable`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::NegativeSubtotal` if `taxable` is negative,
    /// or `PricingError::TaxPercentOutOfRange` if a configured percentage
    /// is outside 0-100.
    pub fn compute(taxable: Decimal, tax: Option<&TaxConfig>) -> Result<TaxBreakdown, PricingError> {
        if taxable < Decimal::ZERO {
            return Err(PricingError::NegativeSubtotal(taxable));
        }

        let Some(config) = tax else {
            return Ok(TaxBreakdown {
                tax_label: DEFAULT_TAX_LABEL.to_string(),
                tax_percent: Decimal::ZERO,
                tax_amount: Decimal::ZERO,
                service_tax_label: DEFAULT_SERVICE_TAX_LABEL.to_string(),
                service_tax_percent: Decimal::ZERO,
                service_tax_amount: Decimal::ZERO,
                total_amount: taxable,
            });
        };

        Self::validate_percent(config.tax_percent)?;
        Self::validate_percent(config.service_tax_percent)?;

        let hundred = Decimal::from(100);
        let tax_amount = round_money(taxable * config.tax_percent / hundred);
        let (service_tax_percent, service_tax_amount) = if config.service_tax_enabled {
            (
                config.service_tax_percent,
                round_money(taxable * config.service_tax_percent / hundred),
            )
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        Ok(TaxBreakdown {
            tax_label: config.tax_label.clone(),
            tax_percent: config.tax_percent,
            tax_amount,
            service_tax_label: config.service_tax_label.clone(),
            service_tax_percent,
            service_tax_amount,
            total_amount: taxable + tax_amount + service_tax_amount,
        })
    }

    /// Computes full document totals for a quotation.
    ///
    /// Quotation items carry a flat amount per line; there is no
    /// quantity/price breakdown and no line discount.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::NegativeAmount` if any item amount is
    /// negative, plus any error from [`Calculator::compute`].
    pub fn quotation_totals(
        items: &[QuotationItem],
        tax: Option<&TaxConfig>,
    ) -> Result<DocumentTotals, PricingError> {
        for item in items {
            if item.amount < Decimal::ZERO {
                return Err(PricingError::NegativeAmount(item.amount));
            }
        }

        let subtotal = round_money(items.iter().map(|i| i.amount).sum());
        let breakdown = Self::compute(subtotal, tax)?;

        Ok(Self::totals_from(subtotal, Decimal::ZERO, breakdown))
    }

    /// Computes full document totals for a BOQ.
    ///
    /// The subtotal is the sum of gross line amounts; line discounts are
    /// summed separately and the tax is applied to the discounted amount.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` for negative unit prices or quantities,
    /// out-of-range discount percentages, plus any error from
    /// [`Calculator::compute`].
    pub fn boq_totals(
        items: &[BoqItem],
        tax: Option<&TaxConfig>,
    ) -> Result<DocumentTotals, PricingError> {
        for item in items {
            if item.unit_price < Decimal::ZERO {
                return Err(PricingError::NegativeUnitPrice(item.unit_price));
            }
            if item.quantity < Decimal::ZERO {
                return Err(PricingError::NegativeQuantity(item.quantity));
            }
            Self::validate_discount(item.discount_percent)?;
        }

        let subtotal = round_money(items.iter().map(BoqItem::gross).sum());
        let total_discount: Decimal = items.iter().map(BoqItem::discount_amount).sum();
        let breakdown = Self::compute(subtotal - total_discount, tax)?;

        Ok(Self::totals_from(subtotal, total_discount, breakdown))
    }

    fn totals_from(
        subtotal: Decimal,
        total_discount: Decimal,
        breakdown: TaxBreakdown,
    ) -> DocumentTotals {
        DocumentTotals {
            subtotal,
            total_discount,
            tax_label: breakdown.tax_label,
            tax_percent: breakdown.tax_percent,
            tax_amount: breakdown.tax_amount,
            service_tax_label: breakdown.service_tax_label,
            service_tax_percent: breakdown.service_tax_percent,
            service_tax_amount: breakdown.service_tax_amount,
            total_amount: breakdown.total_amount,
        }
    }

    fn validate_percent(percent: Decimal) -> Result<(), PricingError> {
        if percent < Decimal::ZERO || percent > Decimal::from(100) {
            return Err(PricingError::TaxPercentOutOfRange(percent));
        }
        Ok(())
    }

    fn validate_discount(percent: Decimal) -> Result<(), PricingError> {
        if percent < Decimal::ZERO || percent > Decimal::from(100) {
            return Err(PricingError::DiscountOutOfRange(percent));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gst_with_service() -> TaxConfig {
        TaxConfig {
            tax_label: "GST".to_string(),
            tax_percent: dec!(5),
            service_tax_enabled: true,
            service_tax_label: "Service Charge".to_string(),
            service_tax_percent: dec!(2),
        }
    }

    #[test]
    fn test_zero_tax_identity() {
        let breakdown = Calculator::compute(dec!(500), None).unwrap();
        assert_eq!(breakdown.total_amount, dec!(500));
        assert_eq!(breakdown.tax_amount, Decimal::ZERO);
        assert_eq!(breakdown.service_tax_amount, Decimal::ZERO);
        assert_eq!(breakdown.tax_label, "Tax");
    }

    #[test]
    fn test_tax_additivity() {
        let breakdown = Calculator::compute(dec!(934.58), Some(&gst_with_service())).unwrap();
        assert_eq!(breakdown.tax_amount, dec!(46.73));
        assert_eq!(breakdown.service_tax_amount, dec!(18.69));
        assert_eq!(
            breakdown.total_amount,
            dec!(934.58) + breakdown.tax_amount + breakdown.service_tax_amount
        );
        assert_eq!(breakdown.total_amount, dec!(1000.00));
    }

    #[test]
    fn test_service_tax_disabled_contributes_nothing() {
        let config = TaxConfig {
            service_tax_enabled: false,
            ..gst_with_service()
        };
        let breakdown = Calculator::compute(dec!(1000), Some(&config)).unwrap();
        assert_eq!(breakdown.tax_amount, dec!(50));
        assert_eq!(breakdown.service_tax_percent, Decimal::ZERO);
        assert_eq!(breakdown.service_tax_amount, Decimal::ZERO);
        assert_eq!(breakdown.total_amount, dec!(1050));
    }

    #[test]
    fn test_negative_subtotal_rejected() {
        let result = Calculator::compute(dec!(-1), None);
        assert!(matches!(result, Err(PricingError::NegativeSubtotal(_))));
    }

    #[test]
    fn test_percent_out_of_range_rejected() {
        let mut config = gst_with_service();
        config.tax_percent = dec!(101);
        assert!(matches!(
            Calculator::compute(dec!(100), Some(&config)),
            Err(PricingError::TaxPercentOutOfRange(_))
        ));

        let mut config = gst_with_service();
        config.service_tax_percent = dec!(-2);
        assert!(matches!(
            Calculator::compute(dec!(100), Some(&config)),
            Err(PricingError::TaxPercentOutOfRange(_))
        ));
    }

    #[test]
    fn test_quotation_totals() {
        let items = vec![
            QuotationItem {
                description: "Modular kitchen".to_string(),
                amount: dec!(600),
            },
            QuotationItem {
                description: "Wardrobe".to_string(),
                amount: dec!(334.58),
            },
        ];
        let totals = Calculator::quotation_totals(&items, Some(&gst_with_service())).unwrap();
        assert_eq!(totals.subtotal, dec!(934.58));
        assert_eq!(totals.total_discount, Decimal::ZERO);
        assert_eq!(totals.total_amount, dec!(1000.00));
    }

    #[test]
    fn test_quotation_negative_item_rejected() {
        let items = vec![QuotationItem {
            description: "Bad".to_string(),
            amount: dec!(-10),
        }];
        assert!(matches!(
            Calculator::quotation_totals(&items, None),
            Err(PricingError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_boq_totals_with_line_discounts() {
        // {price: 100, qty: 2, discount: 10%} and {price: 50, qty: 1, discount: 0}
        let items = vec![
            BoqItem {
                description: "Plywood sheets".to_string(),
                category: "Material".to_string(),
                area: "Living Room".to_string(),
                unit_price: dec!(100),
                quantity: dec!(2),
                discount_percent: dec!(10),
            },
            BoqItem {
                description: "Hinges".to_string(),
                category: "Hardware".to_string(),
                area: "Kitchen".to_string(),
                unit_price: dec!(50),
                quantity: dec!(1),
                discount_percent: dec!(0),
            },
        ];
        assert_eq!(items[0].line_total(), dec!(180));
        assert_eq!(items[1].line_total(), dec!(50));

        let totals = Calculator::boq_totals(&items, None).unwrap();
        assert_eq!(totals.subtotal, dec!(250));
        assert_eq!(totals.total_discount, dec!(20));
        assert_eq!(totals.total_amount, dec!(230));
    }

    #[test]
    fn test_boq_totals_invariant_with_tax() {
        let items = vec![BoqItem {
            description: "False ceiling".to_string(),
            category: String::new(),
            area: String::new(),
            unit_price: dec!(333.33),
            quantity: dec!(3),
            discount_percent: dec!(7.5),
        }];
        let totals = Calculator::boq_totals(&items, Some(&gst_with_service())).unwrap();
        assert_eq!(
            totals.total_amount,
            totals.subtotal - totals.total_discount
                + totals.tax_amount
                + totals.service_tax_amount
        );
    }

    #[test]
    fn test_boq_discount_out_of_range_rejected() {
        let items = vec![BoqItem {
            description: "Bad".to_string(),
            category: String::new(),
            area: String::new(),
            unit_price: dec!(100),
            quantity: dec!(1),
            discount_percent: dec!(110),
        }];
        assert!(matches!(
            Calculator::boq_totals(&items, None),
            Err(PricingError::DiscountOutOfRange(_))
        ));
    }

    #[test]
    fn test_empty_items_yield_zero_totals() {
        let totals = Calculator::quotation_totals(&[], Some(&gst_with_service())).unwrap();
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total_amount, Decimal::ZERO);
    }
}
