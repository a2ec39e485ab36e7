//! Invoice routes.
//!
//! Invoices are immutable: they can be listed, fetched, and created
//! directly (for money received outside a quotation), but never updated
//! or deleted. Invoices generated from quotation payments are created by
//! the payment route.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::{load_general_settings, load_tax_settings, parse_decimal};
use crate::{AppState, error::ApiResult};
use atelier_core::pricing::{Calculator, QuotationItem};
use atelier_db::entities::invoices;
use atelier_db::repositories::{CreateInvoiceInput, InvoiceFilter, InvoiceRepository};
use atelier_shared::types::{PageRequest, PageResponse};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route("/invoices/{id}", get(get_invoice))
}

/// A line item in a request body.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// Description of the work or deliverable.
    pub description: String,
    /// Flat amount for this line (decimal string).
    pub amount: String,
}

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Filter by client.
    pub client: Option<Uuid>,
    /// Filter by parent quotation.
    pub quotation: Option<Uuid>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating a direct invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// The client billed.
    pub client_id: Uuid,
    /// Invoice date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Line items.
    pub items: Vec<ItemRequest>,
    /// Payment method; defaults from general settings.
    pub payment_method: Option<String>,
    /// Date the payment was received; defaults to the invoice date.
    pub payment_date: Option<NaiveDate>,
}

/// Response for an invoice.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Invoice number.
    pub invoice_number: String,
    /// Parent quotation ID, if generated from a payment.
    pub quotation_id: Option<Uuid>,
    /// Client ID.
    pub client_id: Uuid,
    /// Invoice date.
    pub date: String,
    /// Line items.
    pub items: serde_json::Value,
    /// Currency code.
    pub currency: String,
    /// Subtotal.
    pub subtotal: String,
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
    /// Invoice total.
    pub total_amount: String,
    /// Paid amount (always equals the total).
    pub paid_amount: String,
    /// Payment method.
    pub payment_method: String,
    /// Payment date.
    pub payment_date: String,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<invoices::Model> for InvoiceResponse {
    fn from(model: invoices::Model) -> Self {
        Self {
            id: model.id,
            invoice_number: model.invoice_number,
            quotation_id: model.quotation_id,
            client_id: model.client_id,
            date: model.date.to_string(),
            items: model.items,
            currency: model.currency,
            subtotal: model.subtotal.to_string(),
            tax_label: model.tax_label,
            tax_percent: model.tax_percent.to_string(),
            tax_amount: model.tax_amount.to_string(),
            service_tax_label: model.service_tax_label,
            service_tax_percent: model.service_tax_percent.to_string(),
            service_tax_amount: model.service_tax_amount.to_string(),
            total_amount: model.total_amount.to_string(),
            paid_amount: model.paid_amount.to_string(),
            payment_method: model.payment_method,
            payment_date: model.payment_date.to_string(),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// GET /invoices - List invoices with filters.
async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> ApiResult<Json<PageResponse<InvoiceResponse>>> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = InvoiceFilter {
        client_id: query.client,
        quotation_id: query.quotation,
        date_from: query.from,
        date_to: query.to,
    };

    let (models, total) = repo.list(&filter, &page).await?;
    let data = models.into_iter().map(InvoiceResponse::from).collect();
    Ok(Json(PageResponse::new(data, page.page, page.per_page, total)))
}

/// GET /invoices/{id} - Get an invoice.
async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InvoiceResponse>> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| atelier_shared::AppError::NotFound(format!("invoice {id}")))?;

    Ok(Json(invoice.into()))
}

/// POST /invoices - Create a direct invoice.
///
/// Totals are computed server-side from the items and the tax settings
/// snapshot taken now; later tax changes never alter this invoice.
async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<InvoiceResponse>)> {
    let mut items = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        items.push(QuotationItem {
            description: item.description.clone(),
            amount: parse_decimal("items.amount", &item.amount)?,
        });
    }

    let tax = load_tax_settings(&state).await?;
    let general = load_general_settings(&state).await?;
    let totals = Calculator::quotation_totals(&items, Some(&tax.to_tax_config()))?;

    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo
        .create_direct(CreateInvoiceInput {
            client_id: payload.client_id,
            date: payload.date,
            items,
            currency: general.currency.code().to_string(),
            subtotal: totals.subtotal,
            tax_label: totals.tax_label,
            tax_percent: totals.tax_percent,
            tax_amount: totals.tax_amount,
            service_tax_label: totals.service_tax_label,
            service_tax_percent: totals.service_tax_percent,
            service_tax_amount: totals.service_tax_amount,
            total_amount: totals.total_amount,
            payment_method: payload
                .payment_method
                .unwrap_or_else(|| general.default_payment_method.clone()),
            payment_date: payload.payment_date.unwrap_or(payload.date),
            number_prefix: general
                .prefix_for(atelier_core::numbering::DocumentKind::Invoice)
                .to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(invoice.into())))
}
