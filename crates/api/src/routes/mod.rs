//! API route definitions.

use axum::{Router, middleware};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::{AppState, error::ApiResult, middleware::auth::auth_middleware};
use atelier_core::settings::{GeneralSettings, SettingsDocument, SettingsKey, TaxSettings};
use atelier_db::SettingsRepository;
use atelier_shared::AppError;

pub mod auth;
pub mod bank_accounts;
pub mod boqs;
pub mod clients;
pub mod health;
pub mod invoices;
pub mod quotations;
pub mod settings;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(clients::routes())
        .merge(quotations::routes())
        .merge(invoices::routes())
        .merge(boqs::routes())
        .merge(bank_accounts::routes())
        .merge(settings::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Parses a decimal amount from its request-body string form.
pub(crate) fn parse_decimal(field: &str, value: &str) -> ApiResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| AppError::Validation(format!("invalid amount for {field}: '{value}'")).into())
}

/// Loads the tax settings through the cache.
///
/// On a cache miss the repository is read and the cache filled; writes
/// invalidate synchronously, so a hit is never staler than the TTL.
pub(crate) async fn load_tax_settings(state: &AppState) -> ApiResult<TaxSettings> {
    if let Some(SettingsDocument::Tax(settings)) = state.settings.get(SettingsKey::Tax) {
        return Ok(settings);
    }

    let repo = SettingsRepository::new((*state.db).clone());
    let settings = repo.get_tax().await?;
    state
        .settings
        .insert(SettingsDocument::Tax(settings.clone()));
    Ok(settings)
}

/// Loads the general settings through the cache.
pub(crate) async fn load_general_settings(state: &AppState) -> ApiResult<GeneralSettings> {
    if let Some(SettingsDocument::General(settings)) = state.settings.get(SettingsKey::General) {
        return Ok(settings);
    }

    let repo = SettingsRepository::new((*state.db).clone());
    let settings = repo.get_general().await?;
    state
        .settings
        .insert(SettingsDocument::General(settings.clone()));
    Ok(settings)
}
