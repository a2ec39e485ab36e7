//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod bank_account;
pub mod boq;
pub mod client;
pub mod counter;
pub mod invoice;
pub mod quotation;
pub mod settings;

pub use bank_account::{
    BankAccountError, BankAccountRepository, CreateBankAccountInput, UpdateBankAccountInput,
};
pub use boq::{BoqError, BoqFilter, BoqRepository, CreateBoqInput, UpdateBoqInput};
pub use client::{ClientError, ClientRepository, CreateClientInput, UpdateClientInput};
pub use counter::CounterRepository;
pub use invoice::{CreateInvoiceInput, InvoiceError, InvoiceFilter, InvoiceRepository};
pub use quotation::{
    CreateQuotationInput, PaymentReceipt, QuotationError, QuotationFilter, QuotationRepository,
    UpdateQuotationInput,
};
pub use settings::{SettingsError, SettingsRepository};
