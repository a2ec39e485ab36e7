//! Bank account repository for database operations.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::bank_accounts;

/// Error types for bank account operations.
#[derive(Debug, thiserror::Error)]
pub enum BankAccountError {
    /// Bank account not found.
    #[error("Bank account not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a bank account.
#[derive(Debug, Clone)]
pub struct CreateBankAccountInput {
    /// Account holder name.
    pub account_name: String,
    /// Bank name.
    pub bank_name: String,
    /// Account number.
    pub account_number: String,
    /// IFSC code.
    pub ifsc_code: Option<String>,
    /// Branch name.
    pub branch: Option<String>,
    /// Whether this account is the default for printing on invoices.
    pub is_default: bool,
}

/// Input for updating a bank account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateBankAccountInput {
    /// Account holder name.
    pub account_name: Option<String>,
    /// Bank name.
    pub bank_name: Option<String>,
    /// Account number.
    pub account_number: Option<String>,
    /// IFSC code.
    pub ifsc_code: Option<Option<String>>,
    /// Branch name.
    pub branch: Option<Option<String>>,
}

/// Bank account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BankAccountRepository {
    db: DatabaseConnection,
}

impl BankAccountRepository {
    /// Creates a new bank account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all bank accounts, default account first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<bank_accounts::Model>, BankAccountError> {
        Ok(bank_accounts::Entity::find()
            .order_by_desc(bank_accounts::Column::IsDefault)
            .order_by_asc(bank_accounts::Column::AccountName)
            .all(&self.db)
            .await?)
    }

    /// Finds a bank account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<bank_accounts::Model>, BankAccountError> {
        Ok(bank_accounts::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Creates a new bank account.
    ///
    /// When the new account is marked default, the flag is cleared on
    /// every other account in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateBankAccountInput,
    ) -> Result<bank_accounts::Model, BankAccountError> {
        let txn = self.db.begin().await?;

        if input.is_default {
            Self::clear_default(&txn).await?;
        }

        let now = chrono::Utc::now().into();
        let model = bank_accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_name: Set(input.account_name),
            bank_name: Set(input.bank_name),
            account_number: Set(input.account_number),
            ifsc_code: Set(input.ifsc_code),
            branch: Set(input.branch),
            is_default: Set(input.is_default),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = model.insert(&txn).await?;
        txn.commit().await?;

        info!(bank_account_id = %account.id, "Bank account created");
        Ok(account)
    }

    /// Updates a bank account.
    ///
    /// # Errors
    ///
    /// Returns `BankAccountError::NotFound` if the account does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateBankAccountInput,
    ) -> Result<bank_accounts::Model, BankAccountError> {
        let account = self
            .find_by_id(id)
            .await?
            .ok_or(BankAccountError::NotFound(id))?;

        let mut model: bank_accounts::ActiveModel = account.into();
        if let Some(account_name) = input.account_name {
            model.account_name = Set(account_name);
        }
        if let Some(bank_name) = input.bank_name {
            model.bank_name = Set(bank_name);
        }
        if let Some(account_number) = input.account_number {
            model.account_number = Set(account_number);
        }
        if let Some(ifsc_code) = input.ifsc_code {
            model.ifsc_code = Set(ifsc_code);
        }
        if let Some(branch) = input.branch {
            model.branch = Set(branch);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Marks an account as the default, clearing the flag on all others.
    ///
    /// # Errors
    ///
    /// Returns `BankAccountError::NotFound` if the account does not exist.
    pub async fn make_default(&self, id: Uuid) -> Result<bank_accounts::Model, BankAccountError> {
        let txn = self.db.begin().await?;

        let account = bank_accounts::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(BankAccountError::NotFound(id))?;

        Self::clear_default(&txn).await?;

        let mut model: bank_accounts::ActiveModel = account.into();
        model.is_default = Set(true);
        model.updated_at = Set(chrono::Utc::now().into());
        let account = model.update(&txn).await?;

        txn.commit().await?;
        Ok(account)
    }

    /// Deletes a bank account.
    ///
    /// # Errors
    ///
    /// Returns `BankAccountError::NotFound` if the account does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), BankAccountError> {
        let account = self
            .find_by_id(id)
            .await?
            .ok_or(BankAccountError::NotFound(id))?;

        bank_accounts::Entity::delete_by_id(account.id)
            .exec(&self.db)
            .await?;
        info!(bank_account_id = %id, "Bank account deleted");
        Ok(())
    }

    async fn clear_default<C: sea_orm::ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
        bank_accounts::Entity::update_many()
            .col_expr(bank_accounts::Column::IsDefault, Expr::value(false))
            .filter(bank_accounts::Column::IsDefault.eq(true))
            .exec(conn)
            .await?;
        Ok(())
    }
}
