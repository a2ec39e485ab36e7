//! `SeaORM` entity definitions.

pub mod app_settings;
pub mod bank_accounts;
pub mod boqs;
pub mod clients;
pub mod document_counters;
pub mod invoices;
pub mod quotation_payments;
pub mod quotations;
pub mod sea_orm_active_enums;
