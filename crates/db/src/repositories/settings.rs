//! Settings repository for the singleton settings documents.
//!
//! Organization, tax, and general settings live as JSONB values under
//! fixed keys in `app_settings`. Reads fall back to typed defaults when
//! a singleton has not been written yet.

use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};
use tracing::info;

use atelier_core::settings::{
    GeneralSettings, OrganizationSettings, SettingsDocument, SettingsKey, TaxSettings,
};

use crate::entities::app_settings;

/// Error types for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A stored settings value could not be decoded.
    #[error("stored settings for '{key}' are invalid: {source}")]
    InvalidValue {
        /// The singleton key.
        key: &'static str,
        /// The decode error.
        source: serde_json::Error,
    },

    /// A settings value could not be encoded.
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Settings repository for singleton get/put operations.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the organization profile, defaulting when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored value is invalid.
    pub async fn get_organization(&self) -> Result<OrganizationSettings, SettingsError> {
        self.get_typed(SettingsKey::Organization).await
    }

    /// Loads the tax settings, defaulting when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored value is invalid.
    pub async fn get_tax(&self) -> Result<TaxSettings, SettingsError> {
        self.get_typed(SettingsKey::Tax).await
    }

    /// Loads the general settings, defaulting when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored value is invalid.
    pub async fn get_general(&self) -> Result<GeneralSettings, SettingsError> {
        self.get_typed(SettingsKey::General).await
    }

    /// Writes a settings singleton.
    ///
    /// The caller must invalidate the settings cache for the document's
    /// key synchronously after this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the upsert fails.
    pub async fn put(&self, document: &SettingsDocument) -> Result<(), SettingsError> {
        let key = document.key();
        let value = match document {
            SettingsDocument::Organization(settings) => serde_json::to_value(settings)?,
            SettingsDocument::Tax(settings) => serde_json::to_value(settings)?,
            SettingsDocument::General(settings) => serde_json::to_value(settings)?,
        };

        let model = app_settings::ActiveModel {
            key: Set(key.as_str().to_string()),
            value: Set(value),
            updated_at: Set(chrono::Utc::now().into()),
        };

        app_settings::Entity::insert(model)
            .on_conflict(
                OnConflict::column(app_settings::Column::Key)
                    .update_columns([
                        app_settings::Column::Value,
                        app_settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        info!(key = key.as_str(), "Settings updated");

        Ok(())
    }

    async fn get_typed<T>(&self, key: SettingsKey) -> Result<T, SettingsError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let row = app_settings::Entity::find_by_id(key.as_str().to_string())
            .one(&self.db)
            .await?;

        match row {
            Some(model) => serde_json::from_value(model.value).map_err(|source| {
                SettingsError::InvalidValue {
                    key: key.as_str(),
                    source,
                }
            }),
            None => Ok(T::default()),
        }
    }
}
