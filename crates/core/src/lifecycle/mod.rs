//! Document lifecycle state machines.
//!
//! This module implements the legal status transitions for quotations
//! and BOQs, and the edit/delete locks tied to each status. The
//! transition functions here are the sole authority on what a document
//! may do next; route handlers and repositories call them before any
//! mutation.

pub mod boq;
pub mod error;
pub mod quotation;
pub mod types;

pub use boq::BoqLifecycle;
pub use error::LifecycleError;
pub use quotation::QuotationLifecycle;
pub use types::{BoqStatus, QuotationStatus};
