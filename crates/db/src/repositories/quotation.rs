//! Quotation repository for database operations.
//!
//! Payment recording is the critical path here: it must read the
//! current paid amount, validate the payment, append the payment row,
//! update the quotation, and insert the generated invoice as one atomic
//! unit. The implementation uses a database transaction, an exclusive
//! row lock on the quotation, and an optimistic version check, so two
//! concurrent payments can never both pass the balance check and
//! jointly overpay.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::str::FromStr;
use tracing::{info, instrument};
use uuid::Uuid;

use atelier_core::lifecycle::{LifecycleError, QuotationLifecycle, QuotationStatus};
use atelier_core::numbering::DocumentKind;
use atelier_core::payment::{
    IssuedToDate, ParentDocument, PaymentAllocator, PaymentError, PaymentInput,
};
use atelier_core::pricing::{DocumentTotals, QuotationItem};
use atelier_shared::types::{ClientId, Currency, PageRequest, QuotationId};

use crate::entities::{clients, invoices, quotation_payments, quotations, sea_orm_active_enums};
use crate::repositories::counter::CounterRepository;

/// Error types for quotation operations.
#[derive(Debug, thiserror::Error)]
pub enum QuotationError {
    /// Quotation not found.
    #[error("Quotation not found: {0}")]
    NotFound(Uuid),

    /// Referenced client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Payment rule violation.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Lifecycle rule violation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Concurrent modification detected.
    #[error("Concurrent modification detected for quotation {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Stored document data could not be decoded.
    #[error("stored data for quotation {id} is invalid: {reason}")]
    CorruptDocument {
        /// The quotation ID.
        id: Uuid,
        /// What failed to decode.
        reason: String,
    },

    /// Item payload could not be encoded.
    #[error("failed to encode quotation items: {0}")]
    Encode(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing quotations.
#[derive(Debug, Clone, Default)]
pub struct QuotationFilter {
    /// Filter by client.
    pub client_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<QuotationStatus>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Input for creating a quotation.
#[derive(Debug, Clone)]
pub struct CreateQuotationInput {
    /// The client the quotation is for.
    pub client_id: Uuid,
    /// Quotation date.
    pub date: NaiveDate,
    /// Line items.
    pub items: Vec<QuotationItem>,
    /// Document currency code.
    pub currency: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Totals computed by the pricing module.
    pub totals: DocumentTotals,
    /// Number prefix from general settings.
    pub number_prefix: String,
}

/// Input for updating a quotation. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateQuotationInput {
    /// Quotation date.
    pub date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<Option<String>>,
    /// Replacement items together with freshly computed totals.
    pub items: Option<(Vec<QuotationItem>, DocumentTotals)>,
}

/// Result of recording a payment: the updated quotation, the appended
/// payment row, and the generated invoice.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// The quotation after the payment.
    pub quotation: quotations::Model,
    /// The recorded payment.
    pub payment: quotation_payments::Model,
    /// The generated invoice.
    pub invoice: invoices::Model,
}

/// Quotation repository for CRUD and payment recording.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    db: DatabaseConnection,
}

impl QuotationRepository {
    /// Creates a new quotation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists quotations with filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &QuotationFilter,
        page: &PageRequest,
    ) -> Result<(Vec<quotations::Model>, u64), QuotationError> {
        let mut query = quotations::Entity::find()
            .order_by_desc(quotations::Column::Date)
            .order_by_desc(quotations::Column::CreatedAt);

        if let Some(client_id) = filter.client_id {
            query = query.filter(quotations::Column::ClientId.eq(client_id));
        }
        if let Some(status) = filter.status {
            let db_status: sea_orm_active_enums::QuotationStatus = status.into();
            query = query.filter(quotations::Column::Status.eq(db_status));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(quotations::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(quotations::Column::Date.lte(to));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((models, total))
    }

    /// Finds a quotation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<quotations::Model>, QuotationError> {
        Ok(quotations::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Finds a quotation together with its payments, oldest payment
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_payments(
        &self,
        id: Uuid,
    ) -> Result<Option<(quotations::Model, Vec<quotation_payments::Model>)>, QuotationError> {
        let Some(quotation) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let payments = quotation_payments::Entity::find()
            .filter(quotation_payments::Column::QuotationId.eq(id))
            .order_by_asc(quotation_payments::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(Some((quotation, payments)))
    }

    /// Creates a quotation in `Performa` status with a zero paid amount,
    /// allocating its number atomically in the same transaction as the
    /// insert.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::ClientNotFound` if the client does not
    /// exist, or a database error.
    pub async fn create(
        &self,
        input: CreateQuotationInput,
    ) -> Result<quotations::Model, QuotationError> {
        let txn = self.db.begin().await?;

        let client = clients::Entity::find_by_id(input.client_id)
            .one(&txn)
            .await?
            .ok_or(QuotationError::ClientNotFound(input.client_id))?;

        let quotation_number = CounterRepository::next_number(
            &txn,
            DocumentKind::Quotation,
            &input.number_prefix,
            input.date.year(),
        )
        .await?;

        let now = chrono::Utc::now().into();
        let totals = input.totals;
        let model = quotations::ActiveModel {
            id: Set(Uuid::now_v7()),
            quotation_number: Set(quotation_number.clone()),
            client_id: Set(client.id),
            date: Set(input.date),
            items: Set(serde_json::to_value(&input.items)?),
            currency: Set(input.currency),
            subtotal: Set(totals.subtotal),
            total_discount: Set(totals.total_discount),
            tax_label: Set(totals.tax_label),
            tax_percent: Set(totals.tax_percent),
            tax_amount: Set(totals.tax_amount),
            service_tax_label: Set(totals.service_tax_label),
            service_tax_percent: Set(totals.service_tax_percent),
            service_tax_amount: Set(totals.service_tax_amount),
            total_amount: Set(totals.total_amount),
            status: Set(sea_orm_active_enums::QuotationStatus::Performa),
            paid_amount: Set(Decimal::ZERO),
            notes: Set(input.notes),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let quotation = model.insert(&txn).await?;
        txn.commit().await?;

        info!(quotation_id = %quotation.id, number = %quotation_number, "Quotation created");
        Ok(quotation)
    }

    /// Updates a quotation.
    ///
    /// Financial fields are only editable in `Performa` status with no
    /// recorded payments; the lifecycle guard runs before any mutation.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::NotFound` or a lifecycle error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateQuotationInput,
    ) -> Result<quotations::Model, QuotationError> {
        let quotation = self
            .find_by_id(id)
            .await?
            .ok_or(QuotationError::NotFound(id))?;

        if input.items.is_some() {
            let payment_count = self.payment_count(id).await?;
            QuotationLifecycle::validate_can_edit(
                quotation.status.clone().into(),
                payment_count,
            )?;
        }

        let mut model: quotations::ActiveModel = quotation.into();
        if let Some(date) = input.date {
            model.date = Set(date);
        }
        if let Some(notes) = input.notes {
            model.notes = Set(notes);
        }
        if let Some((items, totals)) = input.items {
            model.items = Set(serde_json::to_value(&items)?);
            model.subtotal = Set(totals.subtotal);
            model.total_discount = Set(totals.total_discount);
            model.tax_label = Set(totals.tax_label);
            model.tax_percent = Set(totals.tax_percent);
            model.tax_amount = Set(totals.tax_amount);
            model.service_tax_label = Set(totals.service_tax_label);
            model.service_tax_percent = Set(totals.service_tax_percent);
            model.service_tax_amount = Set(totals.service_tax_amount);
            model.total_amount = Set(totals.total_amount);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a quotation. Only legal in `Performa` status with no
    /// recorded payments.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::NotFound` or a lifecycle error.
    pub async fn delete(&self, id: Uuid) -> Result<(), QuotationError> {
        let quotation = self
            .find_by_id(id)
            .await?
            .ok_or(QuotationError::NotFound(id))?;

        let payment_count = self.payment_count(id).await?;
        QuotationLifecycle::validate_can_delete(quotation.status.clone().into(), payment_count)?;

        quotations::Entity::delete_by_id(quotation.id)
            .exec(&self.db)
            .await?;
        info!(quotation_id = %id, "Quotation deleted");
        Ok(())
    }

    /// Records a payment against a quotation and generates the child
    /// invoice, as one atomic unit.
    ///
    /// Within a single database transaction:
    /// 1. the quotation row is read under an exclusive lock;
    /// 2. the payment is validated and allocated by the core engine;
    /// 3. the invoice number is taken from the atomic counter;
    /// 4. the payment row is inserted;
    /// 5. the quotation is updated with a version check;
    /// 6. the invoice is inserted.
    ///
    /// Any failure rolls the whole unit back - there is no state in
    /// which the quotation is updated but the invoice is missing, or
    /// vice versa.
    ///
    /// # Errors
    ///
    /// Returns a payment error for rule violations (overpayment,
    /// non-positive amount, already fully paid), or
    /// `QuotationError::ConcurrentModification` when the version check
    /// fails.
    #[instrument(skip(self, input), fields(quotation_id = %id))]
    pub async fn record_payment(
        &self,
        id: Uuid,
        input: &PaymentInput,
        invoice_prefix: &str,
    ) -> Result<PaymentReceipt, QuotationError> {
        let txn = self.db.begin().await?;

        let quotation = quotations::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(QuotationError::NotFound(id))?;

        // Component totals already issued on this quotation's invoices,
        // for remainder assignment on the settling payment.
        let children = invoices::Entity::find()
            .filter(invoices::Column::QuotationId.eq(id))
            .all(&txn)
            .await?;
        let issued = IssuedToDate {
            tax_amount: children.iter().map(|i| i.tax_amount).sum(),
            service_tax_amount: children.iter().map(|i| i.service_tax_amount).sum(),
        };

        let parent = Self::parent_from_model(&quotation)?;
        let outcome = PaymentAllocator::allocate(&parent, input, &issued)?;

        let invoice_number = CounterRepository::next_number(
            &txn,
            DocumentKind::Invoice,
            invoice_prefix,
            input.date.year(),
        )
        .await?;

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let payment_model = quotation_payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            quotation_id: Set(id),
            amount: Set(outcome.payment.amount),
            payment_method: Set(outcome.payment.method.clone()),
            payment_date: Set(outcome.payment.date),
            notes: Set(outcome.payment.notes.clone()),
            created_at: Set(now),
        };
        let payment = payment_model.insert(&txn).await?;

        let new_status: sea_orm_active_enums::QuotationStatus = outcome.new_status.into();
        let update = quotations::ActiveModel {
            paid_amount: Set(outcome.new_paid_amount),
            status: Set(new_status),
            version: Set(quotation.version + 1),
            updated_at: Set(now),
            ..Default::default()
        };
        let result = quotations::Entity::update_many()
            .set(update)
            .filter(quotations::Column::Id.eq(id))
            .filter(quotations::Column::Version.eq(quotation.version))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(QuotationError::ConcurrentModification(id));
        }

        let draft = outcome.invoice;
        let invoice_model = invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            invoice_number: Set(invoice_number.clone()),
            quotation_id: Set(draft.quotation_id.map(QuotationId::into_inner)),
            client_id: Set(draft.client_id.into_inner()),
            date: Set(draft.date),
            items: Set(serde_json::to_value(&draft.items)?),
            currency: Set(draft.currency.code().to_string()),
            subtotal: Set(draft.subtotal),
            tax_label: Set(draft.tax_label),
            tax_percent: Set(draft.tax_percent),
            tax_amount: Set(draft.tax_amount),
            service_tax_label: Set(draft.service_tax_label),
            service_tax_percent: Set(draft.service_tax_percent),
            service_tax_amount: Set(draft.service_tax_amount),
            total_amount: Set(draft.total_amount),
            paid_amount: Set(draft.paid_amount),
            payment_method: Set(draft.payment_method),
            payment_date: Set(draft.payment_date),
            created_at: Set(now),
        };
        let invoice = invoice_model.insert(&txn).await?;

        let updated = quotations::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(QuotationError::NotFound(id))?;

        txn.commit().await?;

        info!(
            quotation_id = %id,
            invoice_number = %invoice_number,
            amount = %payment.amount,
            status = outcome.new_status.as_str(),
            "Payment recorded"
        );

        Ok(PaymentReceipt {
            quotation: updated,
            payment,
            invoice,
        })
    }

    /// Builds the allocator's parent snapshot from a stored row.
    fn parent_from_model(model: &quotations::Model) -> Result<ParentDocument, QuotationError> {
        let items: Vec<QuotationItem> =
            serde_json::from_value(model.items.clone()).map_err(|e| {
                QuotationError::CorruptDocument {
                    id: model.id,
                    reason: format!("items: {e}"),
                }
            })?;
        let currency = Currency::from_str(&model.currency).map_err(|e| {
            QuotationError::CorruptDocument {
                id: model.id,
                reason: format!("currency: {e}"),
            }
        })?;

        Ok(ParentDocument {
            id: QuotationId::from_uuid(model.id),
            client_id: ClientId::from_uuid(model.client_id),
            currency,
            items,
            subtotal: model.subtotal,
            tax_label: model.tax_label.clone(),
            tax_percent: model.tax_percent,
            tax_amount: model.tax_amount,
            service_tax_label: model.service_tax_label.clone(),
            service_tax_percent: model.service_tax_percent,
            service_tax_amount: model.service_tax_amount,
            total_amount: model.total_amount,
            paid_amount: model.paid_amount,
            status: model.status.clone().into(),
        })
    }

    async fn payment_count(&self, id: Uuid) -> Result<usize, QuotationError> {
        let count = quotation_payments::Entity::find()
            .filter(quotation_payments::Column::QuotationId.eq(id))
            .count(&self.db)
            .await?;
        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }
}
