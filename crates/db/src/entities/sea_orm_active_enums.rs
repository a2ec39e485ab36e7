//! Postgres enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use atelier_core::lifecycle;

/// Quotation lifecycle status (`quotation_status` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "quotation_status")]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    /// Issued, no payment recorded yet.
    #[sea_orm(string_value = "performa")]
    Performa,
    /// At least one payment recorded, balance remaining.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// Paid in full.
    #[sea_orm(string_value = "fully_paid")]
    FullyPaid,
}

impl From<lifecycle::QuotationStatus> for QuotationStatus {
    fn from(status: lifecycle::QuotationStatus) -> Self {
        match status {
            lifecycle::QuotationStatus::Performa => Self::Performa,
            lifecycle::QuotationStatus::PartiallyPaid => Self::PartiallyPaid,
            lifecycle::QuotationStatus::FullyPaid => Self::FullyPaid,
        }
    }
}

impl From<QuotationStatus> for lifecycle::QuotationStatus {
    fn from(status: QuotationStatus) -> Self {
        match status {
            QuotationStatus::Performa => Self::Performa,
            QuotationStatus::PartiallyPaid => Self::PartiallyPaid,
            QuotationStatus::FullyPaid => Self::FullyPaid,
        }
    }
}

/// BOQ lifecycle status (`boq_status` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "boq_status")]
#[serde(rename_all = "snake_case")]
pub enum BoqStatus {
    /// Being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Sent to the client for review.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Accepted by the client.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Declined by the client.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<lifecycle::BoqStatus> for BoqStatus {
    fn from(status: lifecycle::BoqStatus) -> Self {
        match status {
            lifecycle::BoqStatus::Draft => Self::Draft,
            lifecycle::BoqStatus::Sent => Self::Sent,
            lifecycle::BoqStatus::Approved => Self::Approved,
            lifecycle::BoqStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<BoqStatus> for lifecycle::BoqStatus {
    fn from(status: BoqStatus) -> Self {
        match status {
            BoqStatus::Draft => Self::Draft,
            BoqStatus::Sent => Self::Sent,
            BoqStatus::Approved => Self::Approved,
            BoqStatus::Rejected => Self::Rejected,
        }
    }
}
