//! BOQ (bill of quantities) routes.
//!
//! BOQs carry per-line discounts and their own lifecycle
//! (`draft → sent → approved/rejected`), driven by the status route.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::{load_general_settings, load_tax_settings, parse_decimal};
use crate::{AppState, error::ApiResult};
use atelier_core::lifecycle::BoqStatus;
use atelier_core::numbering::DocumentKind;
use atelier_core::pricing::{BoqItem, Calculator};
use atelier_db::entities::boqs;
use atelier_db::repositories::{BoqFilter, BoqRepository, CreateBoqInput, UpdateBoqInput};
use atelier_shared::AppError;
use atelier_shared::types::{PageRequest, PageResponse};

/// Creates the BOQ routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/boqs", get(list_boqs))
        .route("/boqs", post(create_boq))
        .route("/boqs/{id}", get(get_boq))
        .route("/boqs/{id}", patch(update_boq))
        .route("/boqs/{id}", delete(delete_boq))
        .route("/boqs/{id}/status", post(transition_boq))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A BOQ line item in a request body.
#[derive(Debug, Deserialize)]
pub struct BoqItemRequest {
    /// Description of the material or work.
    pub description: String,
    /// Category tag.
    #[serde(default)]
    pub category: String,
    /// Area tag.
    #[serde(default)]
    pub area: String,
    /// Price per unit (decimal string).
    pub unit_price: String,
    /// Quantity (decimal string, defaults to 1).
    pub quantity: Option<String>,
    /// Line discount percentage (decimal string, defaults to 0).
    pub discount_percent: Option<String>,
}

/// Query parameters for listing BOQs.
#[derive(Debug, Deserialize)]
pub struct ListBoqsQuery {
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

/// Request body for creating a BOQ.
#[derive(Debug, Deserialize)]
pub struct CreateBoqRequest {
    /// The client the BOQ is for.
    pub client_id: Uuid,
    /// BOQ date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Line items.
    pub items: Vec<BoqItemRequest>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Request body for updating a BOQ. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateBoqRequest {
    /// BOQ date (YYYY-MM-DD).
    pub date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Replacement line items; totals are recomputed.
    pub items: Option<Vec<BoqItemRequest>>,
}

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
pub struct TransitionBoqRequest {
    /// The transition to apply: "send", "approve", or "reject".
    pub action: String,
}

/// Response for a BOQ.
#[derive(Debug, Serialize)]
pub struct BoqResponse {
    /// BOQ ID.
    pub id: Uuid,
    /// BOQ number.
    pub boq_number: String,
    /// Client ID.
    pub client_id: Uuid,
    /// BOQ date.
    pub date: String,
    /// Line items.
    pub items: serde_json::Value,
    /// Currency code.
    pub currency: String,
    /// Subtotal before discounts.
    pub subtotal: String,
    /// Sum of line discounts.
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
    /// Free-text notes.
    pub notes: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<boqs::Model> for BoqResponse {
    fn from(model: boqs::Model) -> Self {
        let status: BoqStatus = model.status.clone().into();
        Self {
            id: model.id,
            boq_number: model.boq_number,
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
            notes: model.notes,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /boqs - List BOQs with filters.
async fn list_boqs(
    State(state): State<AppState>,
    Query(query): Query<ListBoqsQuery>,
) -> ApiResult<Json<PageResponse<BoqResponse>>> {
    let status = match query.status.as_deref() {
        Some(s) => Some(
            BoqStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("unknown status '{s}'")))?,
        ),
        None => None,
    };

    let repo = BoqRepository::new((*state.db).clone());
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = BoqFilter {
        client_id: query.client,
        status,
        date_from: query.from,
        date_to: query.to,
    };

    let (models, total) = repo.list(&filter, &page).await?;
    let data = models.into_iter().map(BoqResponse::from).collect();
    Ok(Json(PageResponse::new(data, page.page, page.per_page, total)))
}

/// POST /boqs - Create a BOQ.
async fn create_boq(
    State(state): State<AppState>,
    Json(payload): Json<CreateBoqRequest>,
) -> ApiResult<(StatusCode, Json<BoqResponse>)> {
    let items = parse_items(&payload.items)?;

    let tax = load_tax_settings(&state).await?;
    let general = load_general_settings(&state).await?;
    let totals = Calculator::boq_totals(&items, Some(&tax.to_tax_config()))?;

    let repo = BoqRepository::new((*state.db).clone());
    let boq = repo
        .create(CreateBoqInput {
            client_id: payload.client_id,
            date: payload.date,
            items,
            currency: general.currency.code().to_string(),
            notes: payload.notes,
            totals,
            number_prefix: general.prefix_for(DocumentKind::Boq).to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(boq.into())))
}

/// GET /boqs/{id} - Get a BOQ.
async fn get_boq(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BoqResponse>> {
    let repo = BoqRepository::new((*state.db).clone());
    let boq = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("BOQ {id}")))?;

    Ok(Json(boq.into()))
}

/// PATCH /boqs/{id} - Update a BOQ. Approved BOQs are immutable.
async fn update_boq(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBoqRequest>,
) -> ApiResult<Json<BoqResponse>> {
    let items = match payload.items {
        Some(ref raw) => {
            let items = parse_items(raw)?;
            let tax = load_tax_settings(&state).await?;
            let totals = Calculator::boq_totals(&items, Some(&tax.to_tax_config()))?;
            Some((items, totals))
        }
        None => None,
    };

    let repo = BoqRepository::new((*state.db).clone());
    let boq = repo
        .update(
            id,
            UpdateBoqInput {
                date: payload.date,
                notes: payload.notes.map(Some),
                items,
            },
        )
        .await?;

    Ok(Json(boq.into()))
}

/// DELETE /boqs/{id} - Delete a BOQ. Approved BOQs cannot be deleted.
async fn delete_boq(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = BoqRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /boqs/{id}/status - Apply a lifecycle transition.
async fn transition_boq(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionBoqRequest>,
) -> ApiResult<Json<BoqResponse>> {
    let repo = BoqRepository::new((*state.db).clone());
    let boq = match payload.action.as_str() {
        "send" => repo.send(id).await?,
        "approve" => repo.approve(id).await?,
        "reject" => repo.reject(id).await?,
        other => {
            return Err(AppError::Validation(format!(
                "unknown action '{other}', expected send, approve, or reject"
            ))
            .into());
        }
    };

    Ok(Json(boq.into()))
}

fn parse_items(raw: &[BoqItemRequest]) -> ApiResult<Vec<BoqItem>> {
    let mut items = Vec::with_capacity(raw.len());
    for item in raw {
        let quantity = match item.quantity.as_deref() {
            Some(q) => parse_decimal("items.quantity", q)?,
            None => Decimal::ONE,
        };
        let discount_percent = match item.discount_percent.as_deref() {
            Some(d) => parse_decimal("items.discount_percent", d)?,
            None => Decimal::ZERO,
        };
        items.push(BoqItem {
            description: item.description.clone(),
            category: item.category.clone(),
            area: item.area.clone(),
            unit_price: parse_decimal("items.unit_price", &item.unit_price)?,
            quantity,
            discount_percent,
        });
    }
    Ok(items)
}
