//! Typed settings documents and the settings cache.
//!
//! Organization profile, tax configuration, and general settings are
//! singleton documents in the store. Reads go through an explicit
//! [`SettingsCache`] with a bounded staleness window; every settings
//! write invalidates the cache synchronously before the write is
//! acknowledged, so no calculation ever sees a stale tax rate after an
//! update.

pub mod cache;
pub mod types;

pub use cache::SettingsCache;
pub use types::{
    GeneralSettings, OrganizationSettings, SettingsDocument, SettingsKey, TaxSettings,
};
