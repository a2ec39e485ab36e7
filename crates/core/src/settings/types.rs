//! Settings document types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use atelier_shared::types::Currency;

use crate::numbering::DocumentKind;
use crate::pricing::TaxConfig;

/// Keys identifying the settings singletons in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsKey {
    /// Organization profile.
    Organization,
    /// Tax configuration.
    Tax,
    /// General settings (currency, prefixes, terms).
    General,
}

impl SettingsKey {
    /// Returns the fixed row key for this singleton.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Tax => "tax",
            Self::General => "general",
        }
    }

    /// Parse a key from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "organization" => Some(Self::Organization),
            "tax" => Some(Self::Tax),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

/// Organization profile printed on documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSettings {
    /// Studio name.
    #[serde(default)]
    pub name: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Website URL.
    #[serde(default)]
    pub website: String,
}

/// Tax configuration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Display label for the primary tax.
    #[serde(default = "default_tax_label")]
    pub tax_label: String,
    /// Primary tax percentage (0-100).
    #[serde(default)]
    pub tax_percent: Decimal,
    /// Tax registration number printed on documents.
    #[serde(default)]
    pub tax_id: String,
    /// Whether the secondary service tax applies.
    #[serde(default)]
    pub service_tax_enabled: bool,
    /// Display label for the service tax.
    #[serde(default = "default_service_tax_label")]
    pub service_tax_label: String,
    /// Service tax percentage (0-100).
    #[serde(default)]
    pub service_tax_percent: Decimal,
}

fn default_tax_label() -> String {
    "Tax".to_string()
}

fn default_service_tax_label() -> String {
    "Service Tax".to_string()
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            tax_label: default_tax_label(),
            tax_percent: Decimal::ZERO,
            tax_id: String::new(),
            service_tax_enabled: false,
            service_tax_label: default_service_tax_label(),
            service_tax_percent: Decimal::ZERO,
        }
    }
}

impl TaxSettings {
    /// Builds the immutable tax snapshot used at calculation time.
    #[must_use]
    pub fn to_tax_config(&self) -> TaxConfig {
        TaxConfig {
            tax_label: self.tax_label.clone(),
            tax_percent: self.tax_percent,
            service_tax_enabled: self.service_tax_enabled,
            service_tax_label: self.service_tax_label.clone(),
            service_tax_percent: self.service_tax_percent,
        }
    }
}

/// General settings: currency, number prefixes, terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Document currency.
    #[serde(default = "default_currency")]
    pub currency: Currency,
    /// Number prefix for quotations.
    #[serde(default = "default_quotation_prefix")]
    pub quotation_prefix: String,
    /// Number prefix for invoices.
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,
    /// Number prefix for BOQs.
    #[serde(default = "default_boq_prefix")]
    pub boq_prefix: String,
    /// Days a quotation remains valid after issue.
    #[serde(default = "default_valid_days")]
    pub quotation_valid_days: u32,
    /// Default payment method offered when recording payments.
    #[serde(default = "default_payment_method")]
    pub default_payment_method: String,
}

fn default_currency() -> Currency {
    Currency::Inr
}

fn default_quotation_prefix() -> String {
    DocumentKind::Quotation.default_prefix().to_string()
}

fn default_invoice_prefix() -> String {
    DocumentKind::Invoice.default_prefix().to_string()
}

fn default_boq_prefix() -> String {
    DocumentKind::Boq.default_prefix().to_string()
}

fn default_valid_days() -> u32 {
    30
}

fn default_payment_method() -> String {
    "Bank Transfer".to_string()
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            quotation_prefix: default_quotation_prefix(),
            invoice_prefix: default_invoice_prefix(),
            boq_prefix: default_boq_prefix(),
            quotation_valid_days: default_valid_days(),
            default_payment_method: default_payment_method(),
        }
    }
}

impl GeneralSettings {
    /// Returns the configured number prefix for a document class,
    /// falling back to the class default when blank.
    #[must_use]
    pub fn prefix_for(&self, kind: DocumentKind) -> &str {
        let configured = match kind {
            DocumentKind::Quotation => &self.quotation_prefix,
            DocumentKind::Invoice => &self.invoice_prefix,
            DocumentKind::Boq => &self.boq_prefix,
        };
        if configured.trim().is_empty() {
            kind.default_prefix()
        } else {
            configured
        }
    }
}

/// A typed settings document, tagged by its singleton key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SettingsDocument {
    /// Organization profile.
    Organization(OrganizationSettings),
    /// Tax configuration.
    Tax(TaxSettings),
    /// General settings.
    General(GeneralSettings),
}

impl SettingsDocument {
    /// Returns the singleton key this document belongs under.
    #[must_use]
    pub const fn key(&self) -> SettingsKey {
        match self {
            Self::Organization(_) => SettingsKey::Organization,
            Self::Tax(_) => SettingsKey::Tax,
            Self::General(_) => SettingsKey::General,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_settings_key_round_trip() {
        for key in [
            SettingsKey::Organization,
            SettingsKey::Tax,
            SettingsKey::General,
        ] {
            assert_eq!(SettingsKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SettingsKey::parse("unknown"), None);
    }

    #[test]
    fn test_tax_settings_defaults() {
        let settings = TaxSettings::default();
        assert_eq!(settings.tax_label, "Tax");
        assert_eq!(settings.tax_percent, Decimal::ZERO);
        assert!(!settings.service_tax_enabled);
    }

    #[test]
    fn test_tax_settings_to_config() {
        let settings = TaxSettings {
            tax_label: "GST".to_string(),
            tax_percent: dec!(18),
            tax_id: "29ABCDE1234F1Z5".to_string(),
            service_tax_enabled: true,
            service_tax_label: "Service Charge".to_string(),
            service_tax_percent: dec!(5),
        };
        let config = settings.to_tax_config();
        assert_eq!(config.tax_label, "GST");
        assert_eq!(config.tax_percent, dec!(18));
        assert!(config.service_tax_enabled);
        assert_eq!(config.service_tax_percent, dec!(5));
    }

    #[test]
    fn test_general_settings_defaults() {
        let settings = GeneralSettings::default();
        assert_eq!(settings.currency, Currency::Inr);
        assert_eq!(settings.quotation_prefix, "QT");
        assert_eq!(settings.invoice_prefix, "INV");
        assert_eq!(settings.boq_prefix, "BOQ");
        assert_eq!(settings.quotation_valid_days, 30);
    }

    #[test]
    fn test_prefix_fallback_when_blank() {
        let settings = GeneralSettings {
            quotation_prefix: String::new(),
            ..GeneralSettings::default()
        };
        assert_eq!(settings.prefix_for(DocumentKind::Quotation), "QT");

        let settings = GeneralSettings {
            quotation_prefix: "PRF".to_string(),
            ..GeneralSettings::default()
        };
        assert_eq!(settings.prefix_for(DocumentKind::Quotation), "PRF");
    }

    #[test]
    fn test_settings_document_key() {
        assert_eq!(
            SettingsDocument::Tax(TaxSettings::default()).key(),
            SettingsKey::Tax
        );
        assert_eq!(
            SettingsDocument::General(GeneralSettings::default()).key(),
            SettingsKey::General
        );
    }

    #[test]
    fn test_tax_settings_deserializes_with_missing_fields() {
        let settings: TaxSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, TaxSettings::default());
    }
}
