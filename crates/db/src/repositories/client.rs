//! Client repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;
use uuid::Uuid;

use atelier_shared::types::PageRequest;

use crate::entities::{boqs, clients, invoices, quotations};

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(Uuid),

    /// Client still has documents and cannot be deleted.
    #[error("Client {0} has documents and cannot be deleted")]
    HasDocuments(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a client.
#[derive(Debug, Clone)]
pub struct CreateClientInput {
    /// Client name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Input for updating a client. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateClientInput {
    /// Client name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<Option<String>>,
    /// Contact phone number.
    pub phone: Option<Option<String>>,
    /// Postal address.
    pub address: Option<Option<String>>,
    /// Free-text notes.
    pub notes: Option<Option<String>>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists clients, optionally filtered by a name search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<clients::Model>, u64), ClientError> {
        let mut query = clients::Entity::find().order_by_asc(clients::Column::Name);
        if let Some(term) = search {
            query = query.filter(clients::Column::Name.contains(term));
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((models, total))
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<clients::Model>, ClientError> {
        Ok(clients::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateClientInput) -> Result<clients::Model, ClientError> {
        let now = chrono::Utc::now().into();
        let model = clients::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let client = model.insert(&self.db).await?;
        info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    /// Updates a client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the client does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateClientInput,
    ) -> Result<clients::Model, ClientError> {
        let client = self
            .find_by_id(id)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let mut model: clients::ActiveModel = client.into();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(email) = input.email {
            model.email = Set(email);
        }
        if let Some(phone) = input.phone {
            model.phone = Set(phone);
        }
        if let Some(address) = input.address {
            model.address = Set(address);
        }
        if let Some(notes) = input.notes {
            model.notes = Set(notes);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a client.
    ///
    /// Deletion is refused while any quotation, invoice, or BOQ still
    /// references the client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::HasDocuments`.
    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let client = self
            .find_by_id(id)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let quotation_count = quotations::Entity::find()
            .filter(quotations::Column::ClientId.eq(id))
            .count(&self.db)
            .await?;
        let invoice_count = invoices::Entity::find()
            .filter(invoices::Column::ClientId.eq(id))
            .count(&self.db)
            .await?;
        let boq_count = boqs::Entity::find()
            .filter(boqs::Column::ClientId.eq(id))
            .count(&self.db)
            .await?;

        if quotation_count + invoice_count + boq_count > 0 {
            return Err(ClientError::HasDocuments(id));
        }

        clients::Entity::delete_by_id(client.id).exec(&self.db).await?;
        info!(client_id = %id, "Client deleted");
        Ok(())
    }
}
