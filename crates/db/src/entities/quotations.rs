//! `SeaORM` Entity for the quotations (Performa invoices) table.
//!
//! Line items are stored as a JSONB document on the row; payments live
//! in the `quotation_payments` table. The `version` column backs the
//! optimistic-concurrency check used by payment recording.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::QuotationStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "quotations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub quotation_number: String,
    pub client_id: Uuid,
    pub date: Date,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    pub currency: String,
    pub subtotal: Decimal,
    pub total_discount: Decimal,
    pub tax_label: String,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub service_tax_label: String,
    pub service_tax_percent: Decimal,
    pub service_tax_amount: Decimal,
    pub total_amount: Decimal,
    pub status: QuotationStatus,
    pub paid_amount: Decimal,
    pub notes: Option<String>,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
    #[sea_orm(has_many = "super::quotation_payments::Entity")]
    QuotationPayments,
    #[sea_orm(has_many = "super::invoices::Entity")]
    Invoices,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::quotation_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationPayments.def()
    }
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
