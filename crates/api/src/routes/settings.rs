//! Settings routes for the organization, tax, and general singletons.
//!
//! Every write invalidates the settings cache for its key before the
//! response is sent, so the next calculation reads the fresh value.
//! Documents priced before a settings change keep their stored snapshot.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use rust_decimal::Decimal;

use crate::routes::{load_general_settings, load_tax_settings};
use crate::{AppState, error::ApiResult};
use atelier_core::settings::{
    GeneralSettings, OrganizationSettings, SettingsDocument, SettingsKey, TaxSettings,
};
use atelier_db::SettingsRepository;
use atelier_shared::AppError;

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings/organization", get(get_organization))
        .route("/settings/organization", put(put_organization))
        .route("/settings/tax", get(get_tax))
        .route("/settings/tax", put(put_tax))
        .route("/settings/general", get(get_general))
        .route("/settings/general", put(put_general))
}

/// GET /settings/organization - Get the organization profile.
async fn get_organization(State(state): State<AppState>) -> ApiResult<Json<OrganizationSettings>> {
    if let Some(SettingsDocument::Organization(settings)) =
        state.settings.get(SettingsKey::Organization)
    {
        return Ok(Json(settings));
    }

    let repo = SettingsRepository::new((*state.db).clone());
    let settings = repo.get_organization().await?;
    state
        .settings
        .insert(SettingsDocument::Organization(settings.clone()));
    Ok(Json(settings))
}

/// PUT /settings/organization - Replace the organization profile.
async fn put_organization(
    State(state): State<AppState>,
    Json(payload): Json<OrganizationSettings>,
) -> ApiResult<Json<OrganizationSettings>> {
    let repo = SettingsRepository::new((*state.db).clone());
    repo.put(&SettingsDocument::Organization(payload.clone()))
        .await?;
    state.settings.invalidate(SettingsKey::Organization);

    Ok(Json(payload))
}

/// GET /settings/tax - Get the tax settings.
async fn get_tax(State(state): State<AppState>) -> ApiResult<Json<TaxSettings>> {
    Ok(Json(load_tax_settings(&state).await?))
}

/// PUT /settings/tax - Replace the tax settings.
///
/// Percentages outside 0-100 are rejected before any write.
async fn put_tax(
    State(state): State<AppState>,
    Json(payload): Json<TaxSettings>,
) -> ApiResult<Json<TaxSettings>> {
    validate_percent("tax_percent", payload.tax_percent)?;
    validate_percent("service_tax_percent", payload.service_tax_percent)?;

    let repo = SettingsRepository::new((*state.db).clone());
    repo.put(&SettingsDocument::Tax(payload.clone())).await?;
    state.settings.invalidate(SettingsKey::Tax);

    Ok(Json(payload))
}

/// GET /settings/general - Get the general settings.
async fn get_general(State(state): State<AppState>) -> ApiResult<Json<GeneralSettings>> {
    Ok(Json(load_general_settings(&state).await?))
}

/// PUT /settings/general - Replace the general settings.
async fn put_general(
    State(state): State<AppState>,
    Json(payload): Json<GeneralSettings>,
) -> ApiResult<Json<GeneralSettings>> {
    let repo = SettingsRepository::new((*state.db).clone());
    repo.put(&SettingsDocument::General(payload.clone())).await?;
    state.settings.invalidate(SettingsKey::General);

    Ok(Json(payload))
}

fn validate_percent(field: &str, value: Decimal) -> ApiResult<()> {
    if value < Decimal::ZERO || value > Decimal::from(100) {
        return Err(AppError::Validation(format!(
            "{field} must be between 0 and 100, got {value}"
        ))
        .into());
    }
    Ok(())
}
