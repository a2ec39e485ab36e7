//! Bank account routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiResult};
use atelier_db::entities::bank_accounts;
use atelier_db::repositories::{
    BankAccountRepository, CreateBankAccountInput, UpdateBankAccountInput,
};
use atelier_shared::AppError;

/// Creates the bank account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bank-accounts", get(list_bank_accounts))
        .route("/bank-accounts", post(create_bank_account))
        .route("/bank-accounts/{id}", get(get_bank_account))
        .route("/bank-accounts/{id}", patch(update_bank_account))
        .route("/bank-accounts/{id}", delete(delete_bank_account))
        .route("/bank-accounts/{id}/default", post(make_default))
}

/// Request body for creating a bank account.
#[derive(Debug, Deserialize)]
pub struct CreateBankAccountRequest {
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
    #[serde(default)]
    pub is_default: bool,
}

/// Request body for updating a bank account. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateBankAccountRequest {
    /// Account holder name.
    pub account_name: Option<String>,
    /// Bank name.
    pub bank_name: Option<String>,
    /// Account number.
    pub account_number: Option<String>,
    /// IFSC code.
    pub ifsc_code: Option<String>,
    /// Branch name.
    pub branch: Option<String>,
}

/// Response for a bank account.
#[derive(Debug, Serialize)]
pub struct BankAccountResponse {
    /// Bank account ID.
    pub id: Uuid,
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
    /// Whether this account is the default.
    pub is_default: bool,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<bank_accounts::Model> for BankAccountResponse {
    fn from(model: bank_accounts::Model) -> Self {
        Self {
            id: model.id,
            account_name: model.account_name,
            bank_name: model.bank_name,
            account_number: model.account_number,
            ifsc_code: model.ifsc_code,
            branch: model.branch,
            is_default: model.is_default,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// GET /bank-accounts - List bank accounts.
async fn list_bank_accounts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<BankAccountResponse>>> {
    let repo = BankAccountRepository::new((*state.db).clone());
    let accounts = repo.list().await?;
    Ok(Json(
        accounts.into_iter().map(BankAccountResponse::from).collect(),
    ))
}

/// POST /bank-accounts - Create a bank account.
async fn create_bank_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateBankAccountRequest>,
) -> ApiResult<(StatusCode, Json<BankAccountResponse>)> {
    let repo = BankAccountRepository::new((*state.db).clone());
    let account = repo
        .create(CreateBankAccountInput {
            account_name: payload.account_name,
            bank_name: payload.bank_name,
            account_number: payload.account_number,
            ifsc_code: payload.ifsc_code,
            branch: payload.branch,
            is_default: payload.is_default,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET /bank-accounts/{id} - Get a bank account.
async fn get_bank_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BankAccountResponse>> {
    let repo = BankAccountRepository::new((*state.db).clone());
    let account = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("bank account {id}")))?;

    Ok(Json(account.into()))
}

/// PATCH /bank-accounts/{id} - Update a bank account.
async fn update_bank_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBankAccountRequest>,
) -> ApiResult<Json<BankAccountResponse>> {
    let repo = BankAccountRepository::new((*state.db).clone());
    let account = repo
        .update(
            id,
            UpdateBankAccountInput {
                account_name: payload.account_name,
                bank_name: payload.bank_name,
                account_number: payload.account_number,
                ifsc_code: payload.ifsc_code.map(Some),
                branch: payload.branch.map(Some),
            },
        )
        .await?;

    Ok(Json(account.into()))
}

/// POST /bank-accounts/{id}/default - Make an account the default.
async fn make_default(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BankAccountResponse>> {
    let repo = BankAccountRepository::new((*state.db).clone());
    let account = repo.make_default(id).await?;
    Ok(Json(account.into()))
}

/// DELETE /bank-accounts/{id} - Delete a bank account.
async fn delete_bank_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = BankAccountRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
