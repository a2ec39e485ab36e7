//! Settings cache with bounded staleness.
//!
//! Reads of the settings singletons tolerate a short staleness window
//! (5 minutes by default). Writes must call [`SettingsCache::invalidate`]
//! synchronously, before the write is acknowledged, so subsequent
//! calculations never price a document against a stale tax rate.
//!
//! The cache is an explicit value passed into its consumers, not a
//! module-level global.

use moka::sync::Cache;
use std::time::Duration;

use super::types::{SettingsDocument, SettingsKey};

/// Default time-to-live for cached settings (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Number of settings singletons.
const CAPACITY: u64 = 3;

/// Cache for the settings singletons.
///
/// Thread-safe and cheap to clone; suitable for sharing across request
/// handlers.
#[derive(Clone)]
pub struct SettingsCache {
    cache: Cache<SettingsKey, SettingsDocument>,
}

impl SettingsCache {
    /// Creates a cache with the default 5-minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL_SECS)
    }

    /// Creates a cache with a custom TTL in seconds.
    #[must_use]
    pub fn with_ttl(ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(CAPACITY)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Returns the cached document for a key, if present and fresh.
    #[must_use]
    pub fn get(&self, key: SettingsKey) -> Option<SettingsDocument> {
        self.cache.get(&key)
    }

    /// Stores a freshly loaded document.
    pub fn insert(&self, document: SettingsDocument) {
        self.cache.insert(document.key(), document);
    }

    /// Invalidates one settings key.
    ///
    /// Must be called synchronously whenever the corresponding singleton
    /// is written.
    pub fn invalidate(&self, key: SettingsKey) {
        self.cache.invalidate(&key);
        self.cache.run_pending_tasks();
    }

    /// Invalidates all cached settings.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }
}

impl Default for SettingsCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::types::{GeneralSettings, TaxSettings};
    use rust_decimal_macros::dec;

    fn tax_document(percent: rust_decimal::Decimal) -> SettingsDocument {
        SettingsDocument::Tax(TaxSettings {
            tax_percent: percent,
            ..TaxSettings::default()
        })
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = SettingsCache::new();
        assert!(cache.get(SettingsKey::Tax).is_none());

        cache.insert(tax_document(dec!(18)));
        let cached = cache.get(SettingsKey::Tax).unwrap();
        assert!(matches!(cached, SettingsDocument::Tax(t) if t.tax_percent == dec!(18)));
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = SettingsCache::new();
        cache.insert(tax_document(dec!(18)));

        assert!(cache.get(SettingsKey::Tax).is_some());
        assert!(cache.get(SettingsKey::General).is_none());
        assert!(cache.get(SettingsKey::Organization).is_none());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = SettingsCache::new();
        cache.insert(tax_document(dec!(18)));
        cache.insert(SettingsDocument::General(GeneralSettings::default()));

        cache.invalidate(SettingsKey::Tax);

        assert!(cache.get(SettingsKey::Tax).is_none());
        assert!(cache.get(SettingsKey::General).is_some());
    }

    #[test]
    fn test_invalidate_all() {
        let cache = SettingsCache::new();
        cache.insert(tax_document(dec!(18)));
        cache.insert(SettingsDocument::General(GeneralSettings::default()));

        cache.invalidate_all();

        assert!(cache.get(SettingsKey::Tax).is_none());
        assert!(cache.get(SettingsKey::General).is_none());
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = SettingsCache::new();
        cache.insert(tax_document(dec!(18)));
        cache.insert(tax_document(dec!(5)));

        let cached = cache.get(SettingsKey::Tax).unwrap();
        assert!(matches!(cached, SettingsDocument::Tax(t) if t.tax_percent == dec!(5)));
    }
}
