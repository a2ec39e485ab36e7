//! `SeaORM` Entity for the boqs (bills of quantities) table.
//!
//! BOQ line items (with quantity, unit price, and line discount) are
//! stored as a JSONB document on the row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::BoqStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "boqs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub boq_number: String,
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
    pub status: BoqStatus,
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
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
