//! Payment domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use atelier_shared::types::{ClientId, Currency, QuotationId};

use crate::lifecycle::QuotationStatus;
use crate::pricing::QuotationItem;

/// Snapshot of the quotation a payment is being recorded against.
///
/// The allocator works on this value; loading it (under an exclusive
/// row lock) and persisting the outcome are the store's concern.
#[derive(Debug, Clone)]
pub struct ParentDocument {
    /// The quotation ID.
    pub id: QuotationId,
    /// The client the quotation belongs to.
    pub client_id: ClientId,
    /// Document currency.
    pub currency: Currency,
    /// Line items (flat amounts).
    pub items: Vec<QuotationItem>,
    /// Sum of line amounts.
    pub subtotal: Decimal,
    /// Display label for the primary tax.
    pub tax_label: String,
    /// Primary tax percentage.
    pub tax_percent: Decimal,
    /// Primary tax amount.
    pub tax_amount: Decimal,
    /// Display label for the service tax.
    pub service_tax_label: String,
    /// Service tax percentage.
    pub service_tax_percent: Decimal,
    /// Service tax amount.
    pub service_tax_amount: Decimal,
    /// Grand total payable.
    pub total_amount: Decimal,
    /// Amount paid so far.
    pub paid_amount: Decimal,
    /// Current lifecycle status.
    pub status: QuotationStatus,
}

impl ParentDocument {
    /// Remaining balance on the quotation.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }
}

/// A payment request against a quotation.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    /// Payment amount. `None` means "pay the remaining balance".
    pub amount: Option<Decimal>,
    /// Payment method (e.g., "Bank Transfer", "Cash", "UPI").
    pub method: String,
    /// Date the payment was received.
    pub date: NaiveDate,
    /// Optional free-text notes.
    pub notes: Option<String>,
}

/// Component totals already issued on child invoices of a quotation.
///
/// Used for remainder assignment on the settling payment so that the
/// invoice series reconciles exactly with the parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssuedToDate {
    /// Sum of tax amounts on previously generated invoices.
    pub tax_amount: Decimal,
    /// Sum of service tax amounts on previously generated invoices.
    pub service_tax_amount: Decimal,
}

/// A resolved payment ready to be appended to the quotation.
///
/// Payments are append-only: once recorded they are never edited or
/// removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRecord {
    /// Payment amount (always explicit, shortcut resolved).
    pub amount: Decimal,
    /// Payment method.
    pub method: String,
    /// Date the payment was received.
    pub date: NaiveDate,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Timestamp the payment was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// A generated invoice, not yet numbered or persisted.
///
/// The invoice number is assigned by the store from the atomic invoice
/// counter when the draft is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    /// Back-reference to the parent quotation (`None` for direct invoices).
    pub quotation_id: Option<QuotationId>,
    /// The client billed.
    pub client_id: ClientId,
    /// Invoice date.
    pub date: NaiveDate,
    /// Line items, scaled copies of the parent's.
    pub items: Vec<QuotationItem>,
    /// Document currency.
    pub currency: Currency,
    /// Invoice subtotal.
    pub subtotal: Decimal,
    /// Display label for the primary tax.
    pub tax_label: String,
    /// Primary tax percentage.
    pub tax_percent: Decimal,
    /// Primary tax amount.
    pub tax_amount: Decimal,
    /// Display label for the service tax.
    pub service_tax_label: String,
    /// Service tax percentage.
    pub service_tax_percent: Decimal,
    /// Service tax amount.
    pub service_tax_amount: Decimal,
    /// Invoice total, equal to the payment amount.
    pub total_amount: Decimal,
    /// Paid amount, always equal to `total_amount`: an invoice
    /// represents money actually received.
    pub paid_amount: Decimal,
    /// Payment method.
    pub payment_method: String,
    /// Date the payment was received.
    pub payment_date: NaiveDate,
}

/// The result of recording a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    /// The quotation's paid amount after this payment.
    pub new_paid_amount: Decimal,
    /// The quotation's status after this payment.
    pub new_status: QuotationStatus,
    /// The payment to append to the quotation.
    pub payment: PaymentRecord,
    /// The generated child invoice.
    pub invoice: InvoiceDraft,
}
