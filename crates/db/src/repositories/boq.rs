//! BOQ repository for database operations.
//!
//! Status transitions go through the core lifecycle service; edit and
//! delete guards are enforced here, before any mutation touches a row.

use chrono::{Datelike, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use atelier_core::lifecycle::{BoqLifecycle, BoqStatus, LifecycleError};
use atelier_core::numbering::DocumentKind;
use atelier_core::pricing::{BoqItem, DocumentTotals};
use atelier_shared::types::PageRequest;

use crate::entities::{boqs, clients, sea_orm_active_enums};
use crate::repositories::counter::CounterRepository;

/// Error types for BOQ operations.
#[derive(Debug, thiserror::Error)]
pub enum BoqError {
    /// BOQ not found.
    #[error("BOQ not found: {0}")]
    NotFound(Uuid),

    /// Referenced client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Lifecycle rule violation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Concurrent modification detected.
    #[error("Concurrent modification detected for BOQ {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Item payload could not be encoded.
    #[error("failed to encode BOQ items: {0}")]
    Encode(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing BOQs.
#[derive(Debug, Clone, Default)]
pub struct BoqFilter {
    /// Filter by client.
    pub client_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<BoqStatus>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Input for creating a BOQ.
#[derive(Debug, Clone)]
pub struct CreateBoqInput {
    /// The client the BOQ is for.
    pub client_id: Uuid,
    /// BOQ date.
    pub date: NaiveDate,
    /// Line items.
    pub items: Vec<BoqItem>,
    /// Document currency code.
    pub currency: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Totals computed by the pricing module.
    pub totals: DocumentTotals,
    /// Number prefix from general settings.
    pub number_prefix: String,
}

/// Input for updating a BOQ. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateBoqInput {
    /// BOQ date.
    pub date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<Option<String>>,
    /// Replacement items together with freshly computed totals.
    pub items: Option<(Vec<BoqItem>, DocumentTotals)>,
}

/// BOQ repository for CRUD and transitions.
#[derive(Debug, Clone)]
pub struct BoqRepository {
    db: DatabaseConnection,
}

impl BoqRepository {
    /// Creates a new BOQ repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists BOQs with filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &BoqFilter,
        page: &PageRequest,
    ) -> Result<(Vec<boqs::Model>, u64), BoqError> {
        let mut query = boqs::Entity::find()
            .order_by_desc(boqs::Column::Date)
            .order_by_desc(boqs::Column::CreatedAt);

        if let Some(client_id) = filter.client_id {
            query = query.filter(boqs::Column::ClientId.eq(client_id));
        }
        if let Some(status) = filter.status {
            let db_status: sea_orm_active_enums::BoqStatus = status.into();
            query = query.filter(boqs::Column::Status.eq(db_status));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(boqs::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(boqs::Column::Date.lte(to));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((models, total))
    }

    /// Finds a BOQ by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<boqs::Model>, BoqError> {
        Ok(boqs::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Creates a BOQ in `Draft` status, allocating its number atomically
    /// in the same transaction as the insert.
    ///
    /// # Errors
    ///
    /// Returns `BoqError::ClientNotFound` if the client does not exist,
    /// or a database error.
    pub async fn create(&self, input: CreateBoqInput) -> Result<boqs::Model, BoqError> {
        let txn = self.db.begin().await?;

        let client = clients::Entity::find_by_id(input.client_id)
            .one(&txn)
            .await?
            .ok_or(BoqError::ClientNotFound(input.client_id))?;

        let boq_number = CounterRepository::next_number(
            &txn,
            DocumentKind::Boq,
            &input.number_prefix,
            input.date.year(),
        )
        .await?;

        let now = chrono::Utc::now().into();
        let totals = input.totals;
        let model = boqs::ActiveModel {
            id: Set(Uuid::now_v7()),
            boq_number: Set(boq_number.clone()),
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
            status: Set(sea_orm_active_enums::BoqStatus::Draft),
            notes: Set(input.notes),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let boq = model.insert(&txn).await?;
        txn.commit().await?;

        info!(boq_id = %boq.id, number = %boq_number, "BOQ created");
        Ok(boq)
    }

    /// Updates a BOQ.
    ///
    /// Approved BOQs are immutable; the lifecycle guard runs before any
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns `BoqError::NotFound` or a lifecycle error.
    pub async fn update(&self, id: Uuid, input: UpdateBoqInput) -> Result<boqs::Model, BoqError> {
        let boq = self.find_by_id(id).await?.ok_or(BoqError::NotFound(id))?;

        BoqLifecycle::validate_can_edit(boq.status.clone().into())?;

        let mut model: boqs::ActiveModel = boq.into();
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

    /// Marks a draft BOQ as sent.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle error for illegal transitions.
    pub async fn send(&self, id: Uuid) -> Result<boqs::Model, BoqError> {
        self.transition(id, BoqLifecycle::send).await
    }

    /// Marks a sent BOQ as approved. Approved BOQs become immutable.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle error for illegal transitions.
    pub async fn approve(&self, id: Uuid) -> Result<boqs::Model, BoqError> {
        self.transition(id, BoqLifecycle::approve).await
    }

    /// Marks a BOQ as rejected.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle error for illegal transitions.
    pub async fn reject(&self, id: Uuid) -> Result<boqs::Model, BoqError> {
        self.transition(id, BoqLifecycle::reject).await
    }

    /// Deletes a BOQ. Approved BOQs cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns `BoqError::NotFound` or a lifecycle error.
    pub async fn delete(&self, id: Uuid) -> Result<(), BoqError> {
        let boq = self.find_by_id(id).await?.ok_or(BoqError::NotFound(id))?;

        BoqLifecycle::validate_can_delete(boq.status.clone().into())?;

        boqs::Entity::delete_by_id(boq.id).exec(&self.db).await?;
        info!(boq_id = %id, "BOQ deleted");
        Ok(())
    }

    /// Applies a lifecycle transition under an exclusive row lock with a
    /// version check.
    async fn transition(
        &self,
        id: Uuid,
        apply: fn(BoqStatus) -> Result<BoqStatus, LifecycleError>,
    ) -> Result<boqs::Model, BoqError> {
        let txn = self.db.begin().await?;

        let boq = boqs::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BoqError::NotFound(id))?;

        let new_status = apply(boq.status.clone().into())?;
        let db_status: sea_orm_active_enums::BoqStatus = new_status.into();

        let update = boqs::ActiveModel {
            status: Set(db_status),
            version: Set(boq.version + 1),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        let result = boqs::Entity::update_many()
            .set(update)
            .filter(boqs::Column::Id.eq(id))
            .filter(boqs::Column::Version.eq(boq.version))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(BoqError::ConcurrentModification(id));
        }

        let updated = boqs::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(BoqError::NotFound(id))?;
        txn.commit().await?;

        info!(boq_id = %id, status = new_status.as_str(), "BOQ transitioned");
        Ok(updated)
    }
}
