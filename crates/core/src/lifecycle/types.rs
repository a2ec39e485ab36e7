//! Lifecycle status types.

use serde::{Deserialize, Serialize};

/// Status of a quotation (Performa invoice).
///
/// Quotations progress from `Performa` through payment recording to
/// `FullyPaid`. No transition leaves `FullyPaid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    /// Issued, no payment recorded yet. The only editable status.
    Performa,
    /// At least one payment recorded, balance remaining.
    PartiallyPaid,
    /// Paid in full (terminal).
    FullyPaid,
}

impl QuotationStatus {
    /// Parse a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "performa" => Some(Self::Performa),
            "partially_paid" => Some(Self::PartiallyPaid),
            "fully_paid" => Some(Self::FullyPaid),
            _ => None,
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Performa => "performa",
            Self::PartiallyPaid => "partially_paid",
            Self::FullyPaid => "fully_paid",
        }
    }

    /// Returns true if financial fields can still be edited.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Performa)
    }

    /// Returns true if no further payment can be recorded.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FullyPaid)
    }
}

/// Status of a bill of quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoqStatus {
    /// Being drafted.
    Draft,
    /// Sent to the client for review.
    Sent,
    /// Accepted by the client (terminal, edit/delete locked).
    Approved,
    /// Declined by the client (terminal).
    Rejected,
}

impl BoqStatus {
    /// Parse a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotation_status_round_trip() {
        for status in [
            QuotationStatus::Performa,
            QuotationStatus::PartiallyPaid,
            QuotationStatus::FullyPaid,
        ] {
            assert_eq!(QuotationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(QuotationStatus::parse("draft"), None);
    }

    #[test]
    fn test_boq_status_round_trip() {
        for status in [
            BoqStatus::Draft,
            BoqStatus::Sent,
            BoqStatus::Approved,
            BoqStatus::Rejected,
        ] {
            assert_eq!(BoqStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BoqStatus::parse("performa"), None);
    }

    #[test]
    fn test_editability() {
        assert!(QuotationStatus::Performa.is_editable());
        assert!(!QuotationStatus::PartiallyPaid.is_editable());
        assert!(!QuotationStatus::FullyPaid.is_editable());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(QuotationStatus::FullyPaid.is_terminal());
        assert!(!QuotationStatus::PartiallyPaid.is_terminal());
        assert!(BoqStatus::Approved.is_terminal());
        assert!(BoqStatus::Rejected.is_terminal());
        assert!(!BoqStatus::Sent.is_terminal());
    }
}
