//! Invoice repository for database operations.
//!
//! Invoices are immutable: they are inserted (either directly or by
//! payment recording) and read, never updated. There is no delete
//! operation - an invoice represents money actually received.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use atelier_core::numbering::DocumentKind;
use atelier_core::pricing::QuotationItem;
use atelier_shared::types::PageRequest;

use crate::entities::{clients, invoices};
use crate::repositories::counter::CounterRepository;

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Referenced client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Item payload could not be encoded.
    #[error("failed to encode invoice items: {0}")]
    Encode(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Filter by client.
    pub client_id: Option<Uuid>,
    /// Filter by parent quotation.
    pub quotation_id: Option<Uuid>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Input for creating a direct invoice (no parent quotation).
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// The client billed.
    pub client_id: Uuid,
    /// Invoice date.
    pub date: NaiveDate,
    /// Line items.
    pub items: Vec<QuotationItem>,
    /// Document currency code.
    pub currency: String,
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
    /// Invoice total.
    pub total_amount: Decimal,
    /// Payment method.
    pub payment_method: String,
    /// Date the payment was received.
    pub payment_date: NaiveDate,
    /// Number prefix from general settings.
    pub number_prefix: String,
}

/// Invoice repository for read and insert operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists invoices with filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &InvoiceFilter,
        page: &PageRequest,
    ) -> Result<(Vec<invoices::Model>, u64), InvoiceError> {
        let mut query = invoices::Entity::find()
            .order_by_desc(invoices::Column::Date)
            .order_by_desc(invoices::Column::CreatedAt);

        if let Some(client_id) = filter.client_id {
            query = query.filter(invoices::Column::ClientId.eq(client_id));
        }
        if let Some(quotation_id) = filter.quotation_id {
            query = query.filter(invoices::Column::QuotationId.eq(quotation_id));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(invoices::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(invoices::Column::Date.lte(to));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((models, total))
    }

    /// Finds an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<invoices::Model>, InvoiceError> {
        Ok(invoices::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Creates a direct invoice, allocating its number atomically in the
    /// same transaction as the insert.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::ClientNotFound` if the client does not
    /// exist, or a database error.
    pub async fn create_direct(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<invoices::Model, InvoiceError> {
        let txn = self.db.begin().await?;

        let client = clients::Entity::find_by_id(input.client_id)
            .one(&txn)
            .await?
            .ok_or(InvoiceError::ClientNotFound(input.client_id))?;

        let invoice_number = CounterRepository::next_number(
            &txn,
            DocumentKind::Invoice,
            &input.number_prefix,
            input.date.year(),
        )
        .await?;

        let model = invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            invoice_number: Set(invoice_number.clone()),
            quotation_id: Set(None),
            client_id: Set(client.id),
            date: Set(input.date),
            items: Set(serde_json::to_value(&input.items)?),
            currency: Set(input.currency),
            subtotal: Set(input.subtotal),
            tax_label: Set(input.tax_label),
            tax_percent: Set(input.tax_percent),
            tax_amount: Set(input.tax_amount),
            service_tax_label: Set(input.service_tax_label),
            service_tax_percent: Set(input.service_tax_percent),
            service_tax_amount: Set(input.service_tax_amount),
            total_amount: Set(input.total_amount),
            // An invoice always represents money actually received.
            paid_amount: Set(input.total_amount),
            payment_method: Set(input.payment_method),
            payment_date: Set(input.payment_date),
            created_at: Set(chrono::Utc::now().into()),
        };

        let invoice = model.insert(&txn).await?;
        txn.commit().await?;

        info!(invoice_id = %invoice.id, number = %invoice_number, "Direct invoice created");
        Ok(invoice)
    }
}
