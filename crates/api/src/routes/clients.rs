//! Client management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiResult};
use atelier_db::entities::clients;
use atelier_db::repositories::{ClientRepository, CreateClientInput, UpdateClientInput};
use atelier_shared::types::{PageRequest, PageResponse};

/// Creates the client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/clients", post(create_client))
        .route("/clients/{id}", get(get_client))
        .route("/clients/{id}", patch(update_client))
        .route("/clients/{id}", delete(delete_client))
}

/// Query parameters for listing clients.
#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    /// Name search term.
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl ListClientsQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Request body for creating a client.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
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

/// Request body for updating a client. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    /// Client name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Response for a client.
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    /// Client ID.
    pub id: Uuid,
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
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<clients::Model> for ClientResponse {
    fn from(model: clients::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            notes: model.notes,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// GET /clients - List clients.
async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> ApiResult<Json<PageResponse<ClientResponse>>> {
    let repo = ClientRepository::new((*state.db).clone());
    let page = query.page_request();
    let (models, total) = repo.list(query.search.as_deref(), &page).await?;

    let data = models.into_iter().map(ClientResponse::from).collect();
    Ok(Json(PageResponse::new(data, page.page, page.per_page, total)))
}

/// POST /clients - Create a client.
async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<ClientResponse>)> {
    let repo = ClientRepository::new((*state.db).clone());
    let client = repo
        .create(CreateClientInput {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            notes: payload.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(client.into())))
}

/// GET /clients/{id} - Get a client.
async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ClientResponse>> {
    let repo = ClientRepository::new((*state.db).clone());
    let client = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| atelier_shared::AppError::NotFound(format!("client {id}")))?;

    Ok(Json(client.into()))
}

/// PATCH /clients/{id} - Update a client.
async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> ApiResult<Json<ClientResponse>> {
    let repo = ClientRepository::new((*state.db).clone());
    let client = repo
        .update(
            id,
            UpdateClientInput {
                name: payload.name,
                email: payload.email.map(Some),
                phone: payload.phone.map(Some),
                address: payload.address.map(Some),
                notes: payload.notes.map(Some),
            },
        )
        .await?;

    Ok(Json(client.into()))
}

/// DELETE /clients/{id} - Delete a client.
async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = ClientRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
