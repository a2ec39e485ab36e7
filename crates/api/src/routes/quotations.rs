//! Quotation (Performa invoice) routes.
//!
//! Totals are always computed server-side from the submitted items and
//! the tax settings snapshot taken at write time. Payment recording is
//! the only financial mutation once a quotation has payments.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::routes::invoices::{InvoiceResponse, ItemRequest};
use crate::routes::{load_general_settings, load_tax_settings, parse_decimal};
use crate::{AppState, error::ApiResult};
use atelier_core::lifecycle::QuotationStatus;
use atelier_core::numbering::DocumentKind;
use atelier_core::payment::PaymentInput;
use atelier_core::pricing::{Calculator, QuotationItem};
use atelier_db::entities::{quotation_payments, quotations};
use atelier_db::repositories::{
    CreateQuotationInput, QuotationFilter, QuotationRepository, UpdateQuotationInput,
};
use atelier_shared::AppError;
use atelier_shared::types::{PageRequest, PageResponse};

/// Creates the quotation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotations", get(list_quotations))
        .route("/quotations", post(create_quotation))
        .route("/quotations/{id}", get(get_quotation))
        .route("/quotations/{id}", patch(update_quotation))
        .route("/quotations/{id}", delete(delete_quotation))
        .route("/quotations/{id}/payments", post(record_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing quotations.
#[derive(Debug, Deserialize)]
pub struct ListQuotationsQuery {
    /// Filter by client.
    pub client: Option<Uuid>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating a quotation.
#[derive(Debug, Deserialize)]
pub struct CreateQuotationRequest {
    /// The client the quotation is for.
    pub client_id: Uuid,
    /// Quotation date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Line items.
    pub items: Vec<ItemRequest>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Request body for updating a quotation. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateQuotationRequest {
    /// Quotation date (YYYY-MM-DD).
    pub date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Replacement line items; totals are recomputed.
    pub items: Option<Vec<ItemRequest>>,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// Payment amount (decimal string). Absent means "pay the remaining
    /// balance".
    pub amount: Option<String>,
    /// Payment method; defaults from general settings.
    pub method: Option<String>,
    /// Date the payment was received; defaults to today.
    pub date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Response for a quotation.
#[derive(Debug, Serialize)]
pub struct QuotationResponse {
    /// Quotation ID.
    pub id: Uuid,
    /// Quotation number.
    pub quotation_number: String,
    /// Client ID.
    pub client_id: Uuid,
    /// Quotation date.
    pub date: String,
    /// Line items.
    pub items: serde_json::Value,
    /// Currency code.
    pub currency: String,
    /// Subtotal.
    pub subtotal: String,
    /// Total discount.
    pub total_discount: String,
    /// Primary tax label.
    pub tax_label: String,
    /// Primary tax percentage.
    pub tax_percent: String,
    /// Primary tax amount.
    pub tax_amount: String,
    /// Service tax label.
    pub service_tax_label: String,
    /// Service tax percentage.
    pub service_tax_percent: String,
    /// Service tax amount.
    pub service_tax_amount: String,
    /// Grand total.
    pub total_amount: String,
    /// Lifecycle status.
    pub status: String,
    /// Amount paid so far.
    pub paid_amount: String,
    /// Remaining balance.
    pub balance: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<quotations::Model> for QuotationResponse {
    fn from(model: quotations::Model) -> Self {
        let status: QuotationStatus = model.status.clone().into();
        let balance = model.total_amount - model.paid_amount;
        Self {
            id: model.id,
            quotation_number: model.quotation_number,
            client_id: model.client_id,
            date: model.date.to_string(),
            items: model.items,
            currency: model.currency,
            subtotal: model.subtotal.to_string(),
            total_discount: model.total_discount.to_string(),
            tax_label: model.tax_label,
            tax_percent: model.tax_percent.to_string(),
            tax_amount: model.tax_amount.to_string(),
            service_tax_label: model.service_tax_label,
            service_tax_percent: model.service_tax_percent.to_string(),
            service_tax_amount: model.service_tax_amount.to_string(),
            total_amount: model.total_amount.to_string(),
            status: status.as_str().to_string(),
            paid_amount: model.paid_amount.to_string(),
            balance: balance.to_string(),
            notes: model.notes,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// Response for a recorded payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Payment amount.
    pub amount: String,
    /// Payment method.
    pub payment_method: String,
    /// Date the payment was received.
    pub payment_date: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Timestamp the payment was recorded.
    pub created_at: String,
}

impl From<quotation_payments::Model> for PaymentResponse {
    fn from(model: quotation_payments::Model) -> Self {
        Self {
            id: model.id,
            amount: model.amount.to_string(),
            payment_method: model.payment_method,
            payment_date: model.payment_date.to_string(),
            notes: model.notes,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response for a quotation with its payment history.
#[derive(Debug, Serialize)]
pub struct QuotationDetailResponse {
    /// The quotation.
    #[serde(flatten)]
    pub quotation: QuotationResponse,
    /// Recorded payments, oldest first.
    pub payments: Vec<PaymentResponse>,
}

/// Response for a recorded payment: the updated quotation, the payment,
/// and the generated invoice.
#[derive(Debug, Serialize)]
pub struct RecordPaymentResponse {
    /// The quotation after the payment.
    pub quotation: QuotationResponse,
    /// The recorded payment.
    pub payment: PaymentResponse,
    /// The generated invoice.
    pub invoice: InvoiceResponse,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /quotations - List quotations with filters.
async fn list_quotations(
    State(state): State<AppState>,
    Query(query): Query<ListQuotationsQuery>,
) -> ApiResult<Json<PageResponse<QuotationResponse>>> {
    let status = match query.status.as_deref() {
        Some(s) => Some(
            QuotationStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("unknown status '{s}'")))?,
        ),
        None => None,
    };

    let repo = QuotationRepository::new((*state.db).clone());
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = QuotationFilter {
        client_id: query.client,
        status,
        date_from: query.from,
        date_to: query.to,
    };

    let (models, total) = repo.list(&filter, &page).await?;
    let data = models.into_iter().map(QuotationResponse::from).collect();
    Ok(Json(PageResponse::new(data, page.page, page.per_page, total)))
}

/// POST /quotations - Create a quotation.
async fn create_quotation(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuotationRequest>,
) -> ApiResult<(StatusCode, Json<QuotationResponse>)> {
    let items = parse_items(&payload.items)?;

    let tax = load_tax_settings(&state).await?;
    let general = load_general_settings(&state).await?;
    let totals = Calculator::quotation_totals(&items, Some(&tax.to_tax_config()))?;

    let repo = QuotationRepository::new((*state.db).clone());
    let quotation = repo
        .create(CreateQuotationInput {
            client_id: payload.client_id,
            date: payload.date,
            items,
            currency: general.currency.code().to_string(),
            notes: payload.notes,
            totals,
            number_prefix: general.prefix_for(DocumentKind::Quotation).to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(quotation.into())))
}

/// GET /quotations/{id} - Get a quotation with its payments.
async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<QuotationDetailResponse>> {
    let repo = QuotationRepository::new((*state.db).clone());
    let (quotation, payments) = repo
        .find_with_payments(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("quotation {id}")))?;

    Ok(Json(QuotationDetailResponse {
        quotation: quotation.into(),
        payments: payments.into_iter().map(PaymentResponse::from).collect(),
    }))
}

/// PATCH /quotations/{id} - Update a quotation.
///
/// Items (and therefore totals) are only editable while the quotation is
/// in `performa` status with no recorded payments.
async fn update_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuotationRequest>,
) -> ApiResult<Json<QuotationResponse>> {
    let items = match payload.items {
        Some(ref raw) => {
            let items = parse_items(raw)?;
            let tax = load_tax_settings(&state).await?;
            let totals = Calculator::quotation_totals(&items, Some(&tax.to_tax_config()))?;
            Some((items, totals))
        }
        None => None,
    };

    let repo = QuotationRepository::new((*state.db).clone());
    let quotation = repo
        .update(
            id,
            UpdateQuotationInput {
                date: payload.date,
                notes: payload.notes.map(Some),
                items,
            },
        )
        .await?;

    Ok(Json(quotation.into()))
}

/// DELETE /quotations/{id} - Delete a quotation.
///
/// Only legal before any payment has been recorded.
async fn delete_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = QuotationRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /quotations/{id}/payments - Record a payment.
///
/// Omitting `amount` pays the remaining balance. Exactly one invoice is
/// generated per successful call; the quotation update and the invoice
/// insert commit atomically.
async fn record_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> ApiResult<(StatusCode, Json<RecordPaymentResponse>)> {
    let amount = match payload.amount.as_deref() {
        Some(raw) => Some(parse_decimal("amount", raw)?),
        None => None,
    };

    let general = load_general_settings(&state).await?;
    let input = PaymentInput {
        amount,
        method: payload
            .method
            .unwrap_or_else(|| general.default_payment_method.clone()),
        date: payload.date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
        notes: payload.notes,
    };

    let repo = QuotationRepository::new((*state.db).clone());
    let receipt = repo
        .record_payment(
            id,
            &input,
            general.prefix_for(DocumentKind::Invoice),
        )
        .await?;

    tracing::info!(
        operator = auth.username(),
        quotation_id = %id,
        invoice = %receipt.invoice.invoice_number,
        "Payment recorded via API"
    );

    Ok((
        StatusCode::CREATED,
        Json(RecordPaymentResponse {
            quotation: receipt.quotation.into(),
            payment: receipt.payment.into(),
            invoice: receipt.invoice.into(),
        }),
    ))
}

fn parse_items(raw: &[ItemRequest]) -> ApiResult<Vec<QuotationItem>> {
    let mut items = Vec::with_capacity(raw.len());
    for item in raw {
        items.push(QuotationItem {
            description: item.description.clone(),
            amount: parse_decimal("items.amount", &item.amount)?,
        });
    }
    Ok(items)
}
