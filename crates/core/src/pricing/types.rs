//! Pricing domain types.
//!
//! These types model the financial shape of quotations, BOQs, and
//! invoices: line items, the tax configuration snapshot, and the derived
//! totals stored on every document.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use atelier_shared::types::round_money;

/// Tax configuration snapshot used at calculation time.
///
/// A copy of the tax settings is taken when a document's totals are
/// computed. Later changes to the global tax settings never alter
/// documents that were already priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Display label for the primary tax (e.g., "GST").
    pub tax_label: String,
    /// Primary tax percentage (0-100).
    pub tax_percent: Decimal,
    /// Whether the secondary service tax applies.
    pub service_tax_enabled: bool,
    /// Display label for the service tax.
    pub service_tax_label: String,
    /// Service tax percentage (0-100).
    pub service_tax_percent: Decimal,
}

/// A quotation line item: free-text description with a flat amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationItem {
    /// Description of the work or deliverable.
    pub description: String,
    /// Flat amount for this line.
    pub amount: Decimal,
}

/// A BOQ line item with quantity, unit price, and an optional line discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoqItem {
    /// Description of the material or work.
    pub description: String,
    /// Category tag (e.g., "Furniture", "Electrical").
    #[serde(default)]
    pub category: String,
    /// Area tag (e.g., "Living Room").
    #[serde(default)]
    pub area: String,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Quantity (defaults to 1).
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    /// Line discount percentage (0-100).
    #[serde(default)]
    pub discount_percent: Decimal,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

impl BoqItem {
    /// Gross amount for the line before discount.
    #[must_use]
    pub fn gross(&self) -> Decimal {
        self.unit_price * self.quantity
    }

    /// Discount amount for the line, rounded to money precision.
    #[must_use]
    pub fn discount_amount(&self) -> Decimal {
        round_money(self.gross() * self.discount_percent / Decimal::from(100))
    }

    /// Net amount for the line after discount.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        round_money(self.gross()) - self.discount_amount()
    }
}

/// Tax breakdown computed from a taxable amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Display label for the primary tax.
    pub tax_label: String,
    /// Primary tax percentage applied.
    pub tax_percent: Decimal,
    /// Primary tax amount.
    pub tax_amount: Decimal,
    /// Display label for the service tax.
    pub service_tax_label: String,
    /// Service tax percentage applied (0 when disabled).
    pub service_tax_percent: Decimal,
    /// Service tax amount (0 when disabled).
    pub service_tax_amount: Decimal,
    /// Taxable amount plus both taxes.
    pub total_amount: Decimal,
}

/// Complete derived totals stored on a document.
///
/// Invariant: `total_amount == subtotal - total_discount + tax_amount +
/// service_tax_amount`, exactly (Decimal arithmetic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of line amounts before discount.
    pub subtotal: Decimal,
    /// Sum of line discounts (0 for quotations).
    pub total_discount: Decimal,
    /// Display label for the primary tax.
    pub tax_label: String,
    /// Primary tax percentage applied.
    pub tax_percent: Decimal,
    /// Primary tax amount.
    pub tax_amount: Decimal,
    /// Display label for the service tax.
    pub service_tax_label: String,
    /// Service tax percentage applied (0 when disabled).
    pub service_tax_percent: Decimal,
    /// Service tax amount (0 when disabled).
    pub service_tax_amount: Decimal,
    /// Grand total payable.
    pub total_amount: Decimal,
}
