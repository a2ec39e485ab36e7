//! Sequential document number formatting.
//!
//! Document numbers are human-readable identifiers of the form
//! `{prefix}-{year}-{sequence}` with the sequence zero-padded to four
//! digits (e.g., `QT-2024-0008`). Sequences restart each year per
//! document class.
//!
//! This module only formats numbers. Allocation of the underlying
//! sequence is the store's responsibility: a per-(class, year) atomic
//! counter, not a count of existing rows, so numbers stay unique under
//! concurrent creation and after deletions.

use serde::{Deserialize, Serialize};

/// The classes of documents that receive sequential numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Performa (quotation) invoice.
    Quotation,
    /// Final invoice.
    Invoice,
    /// Bill of quantities.
    Boq,
}

impl DocumentKind {
    /// Returns the stable key used for counter rows.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quotation => "quotation",
            Self::Invoice => "invoice",
            Self::Boq => "boq",
        }
    }

    /// Returns the default number prefix for this document class.
    ///
    /// General settings may override the prefix per class.
    #[must_use]
    pub const fn default_prefix(&self) -> &'static str {
        match self {
            Self::Quotation => "QT",
            Self::Invoice => "INV",
            Self::Boq => "BOQ",
        }
    }
}

/// Formats a document number from its parts.
///
/// The sequence is zero-padded to four digits; longer sequences extend
/// naturally.
#[must_use]
pub fn format_number(prefix: &str, year: i32, sequence: u64) -> String {
    format!("{prefix}-{year}-{sequence:04}")
}

/// Returns the next document number after `prior_count` existing
/// documents of the class.
#[must_use]
pub fn next_number(prefix: &str, year: i32, prior_count: u64) -> String {
    format_number(prefix, year, prior_count + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_number_format() {
        assert_eq!(next_number("QT", 2024, 7), "QT-2024-0008");
    }

    #[test]
    fn test_format_number_zero_pads_to_four_digits() {
        assert_eq!(format_number("INV", 2026, 1), "INV-2026-0001");
        assert_eq!(format_number("INV", 2026, 42), "INV-2026-0042");
        assert_eq!(format_number("INV", 2026, 999), "INV-2026-0999");
    }

    #[test]
    fn test_format_number_grows_past_four_digits() {
        assert_eq!(format_number("BOQ", 2026, 10000), "BOQ-2026-10000");
    }

    #[test]
    fn test_default_prefixes() {
        assert_eq!(DocumentKind::Quotation.default_prefix(), "QT");
        assert_eq!(DocumentKind::Invoice.default_prefix(), "INV");
        assert_eq!(DocumentKind::Boq.default_prefix(), "BOQ");
    }

    #[test]
    fn test_counter_keys() {
        assert_eq!(DocumentKind::Quotation.as_str(), "quotation");
        assert_eq!(DocumentKind::Invoice.as_str(), "invoice");
        assert_eq!(DocumentKind::Boq.as_str(), "boq");
    }
}
