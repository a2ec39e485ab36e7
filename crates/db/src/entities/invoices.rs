//! `SeaORM` Entity for the invoices table.
//!
//! Invoices are immutable once created. Generated invoices carry a
//! back-reference to their parent quotation; direct invoices have none.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub quotation_id: Option<Uuid>,
    pub client_id: Uuid,
    pub date: Date,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    pub currency: String,
    pub subtotal: Decimal,
    pub tax_label: String,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub service_tax_label: String,
    pub service_tax_percent: Decimal,
    pub service_tax_amount: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub payment_method: String,
    pub payment_date: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
    #[sea_orm(
        belongs_to = "super::quotations::Entity",
        from = "Column::QuotationId",
        to = "super::quotations::Column::Id"
    )]
    Quotations,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::quotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
